use std::fs;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::fetch::HttpOptions;

/// Project configuration loaded from `.s2c.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct S2cConfig {
    /// Destination directory used when the command line names none.
    pub output: Option<String>,
    /// Written under `config.headers` of every generated case.
    pub headers: IndexMap<String, String>,
    pub http: HttpConfig,
}

/// Transport settings for fetching the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            insecure: false,
        }
    }
}

impl HttpConfig {
    pub fn options(&self) -> HttpOptions {
        HttpOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            insecure: self.insecure,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".s2c.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<S2cConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: S2cConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# s2c configuration
# output: testcases      # write one <path>.yaml per API path instead of printing

headers: {}
  # Hrp-Test: ${GetRandomString()}
  # content-type: application/json;charset=UTF-8
  # authorization: Bearer ${authToken}

http:
  timeout_secs: 30
  insecure: false       # accept invalid TLS certificates
"#
}
