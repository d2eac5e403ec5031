use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid document URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("schema has no $ref")]
    MissingRef,

    #[error("array schema has no items.$ref")]
    MissingItemsRef,

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("definition {0} has no properties object")]
    MissingProperties(String),
}

/// An entry of the document with an unexpected shape. Logged and skipped.
#[derive(Debug, Error)]
pub enum MalformedEntry {
    #[error("{path} {method}: parameter #{index} is not an object")]
    ParameterNotObject {
        path: String,
        method: String,
        index: usize,
    },

    #[error("{path} {method}: parameter #{index} has no string name")]
    ParameterWithoutName {
        path: String,
        method: String,
        index: usize,
    },

    #[error("{path} {method}: operation is not an object")]
    OperationNotObject { path: String, method: String },

    #[error("{path} {method}: parameters is not an array")]
    ParametersNotArray { path: String, method: String },

    #[error("{path}: path item is not an object")]
    PathItemNotObject { path: String },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write case to stream: {0}")]
    Stream(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
