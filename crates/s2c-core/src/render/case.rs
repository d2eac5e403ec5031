use indexmap::IndexMap;
use minijinja::{AutoEscape, Environment, context};

use crate::classify::ClassifiedParams;
use crate::error::RenderError;

use super::block::{REQUEST_DEPTH, RequestBlock};

const CASE_TEMPLATE: &str = "case.yaml.j2";

/// Characters that may not start a plain YAML scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Render `value` as a double-quoted YAML scalar. JSON string escapes are valid
/// inside YAML double quotes.
fn quote_yaml(value: String) -> String {
    serde_json::Value::String(value).to_string()
}

/// Leave `value` as a plain scalar when YAML reads it back unchanged, quote it
/// otherwise.
fn escape_yaml(value: String) -> String {
    if needs_quotes(&value) {
        quote_yaml(value)
    } else {
        value
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(char::is_control)
}

/// One rendered test case, ready to print or persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCase {
    pub title: String,
    pub method: String,
    pub url_path: String,
    pub param_block: String,
    pub content: String,
}

/// Renders HttpRunner test cases from classified operation parameters.
pub struct CaseRenderer {
    env: Environment<'static>,
    headers: Vec<(String, String)>,
}

impl CaseRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("quote_yaml", quote_yaml);
        env.add_filter("escape_yaml", escape_yaml);
        env.add_template(CASE_TEMPLATE, include_str!("../../templates/case.yaml.j2"))?;
        Ok(Self {
            env,
            headers: Vec::new(),
        })
    }

    /// Headers written under `config.headers` of every case, in map order.
    pub fn with_headers(mut self, headers: &IndexMap<String, String>) -> Self {
        self.headers = headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        self
    }

    pub fn render(
        &self,
        method: &str,
        url_path: &str,
        params: &ClassifiedParams,
    ) -> Result<RenderedCase, RenderError> {
        let title = format!("{url_path} api test");
        let method = method.to_uppercase();
        let param_block = RequestBlock::from_params(params).render(REQUEST_DEPTH);

        let tmpl = self.env.get_template(CASE_TEMPLATE)?;
        let content = tmpl.render(context! {
            title => &title,
            method => &method,
            url => url_path,
            params => &param_block,
            headers => &self.headers,
        })?;

        Ok(RenderedCase {
            title,
            method,
            url_path: url_path.to_string(),
            param_block,
            content,
        })
    }
}
