use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub stash: StashConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Connection settings for a running Stash server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StashConfig {
    /// `http` or `https`
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Sent as the `ApiKey` header when set
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of matches requested by a search (default: 10)
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

fn default_scheme() -> String {
    "http".to_string()
}
fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    9999
}
fn default_timeout() -> u64 {
    30
}
fn default_search_limit() -> u32 {
    10
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            api_key: None,
            timeout_secs: default_timeout(),
            search_limit: default_search_limit(),
        }
    }
}

impl StashConfig {
    /// GraphQL endpoint of the configured server.
    pub fn graphql_url(&self) -> String {
        format!("{}://{}:{}/graphql", self.scheme, self.host, self.port)
    }
}

/// Defaults for the generated files. Command-line flags can only switch
/// these on.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Indent the XML body
    #[serde(default)]
    pub pretty: bool,

    /// Write base64 image payloads next to the NFO
    #[serde(default)]
    pub extract_images: bool,

    /// Replace existing NFO files
    #[serde(default)]
    pub overwrite: bool,
}
