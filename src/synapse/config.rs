use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const CONFIG_FILE_NAME: &str = ".synapseConfig";
pub const DEFAULT_REPO_ENDPOINT: &str = "https://repo-prod.prod.sagebase.org/repo/v1";
pub const AUTH_TOKEN_ENV: &str = "SYNAPSE_AUTH_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed configuration at line {line_no}: {line}")]
    Malformed { line_no: usize, line: String },

    #[error("Invalid repoEndpoint {0:?}")]
    InvalidEndpoint(String),
}

/// Credentials and endpoints read from a `.synapseConfig` file.
#[derive(Clone, Debug)]
pub struct SynapseConfig {
    pub source: String,
    pub username: Option<String>,
    pub auth_token: Option<String>,
    pub repo_endpoint: Url,
}

impl SynapseConfig {
    /// `~/.synapseConfig`, if a home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Load the configuration from `path`, or from the default location.
    ///
    /// A missing default file yields an empty configuration. A missing
    /// explicit file is an error. The token falls back to `SYNAPSE_AUTH_TOKEN`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                Some(path) => {
                    debug!("No configuration file at {}", path.display());
                    Self::parse(&path.display().to_string(), "")?
                }
                None => Self::parse(CONFIG_FILE_NAME, "")?,
            },
        };
        Ok(config.with_env_token(std::env::var(AUTH_TOKEN_ENV).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read configuration from {}", path.display());
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse INI text. `source` only labels where the text came from.
    pub fn parse(source: &str, text: &str) -> Result<Self, ConfigError> {
        let sections = parse_ini(text)?;
        let value = |section: &str, key: &str| {
            sections
                .get(section)
                .and_then(|entries| entries.get(key))
                .filter(|v| !v.is_empty())
                .cloned()
        };

        let repo_endpoint = match value("endpoints", "repoendpoint") {
            Some(endpoint) => parse_endpoint(&endpoint)?,
            None => parse_endpoint(DEFAULT_REPO_ENDPOINT)?,
        };

        Ok(SynapseConfig {
            source: source.to_string(),
            username: value("authentication", "username"),
            auth_token: value("authentication", "authtoken"),
            repo_endpoint,
        })
    }

    /// Use `token` only when the file did not provide one.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if self.auth_token.is_none() {
            self.auth_token = token.filter(|t| !t.trim().is_empty());
        }
        self
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    match Url::parse(endpoint) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint(endpoint.to_string())),
    }
}

type Sections = HashMap<String, HashMap<String, String>>;

/// Parse the subset of `configparser` syntax used by `.synapseConfig`:
/// section headers, `=`/`:` pairs, full-line comments, and indented
/// continuation lines. Inline comments and interpolation are not supported.
fn parse_ini(text: &str) -> Result<Sections, ConfigError> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;
    let mut last_key: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let malformed = || ConfigError::Malformed {
            line_no: idx + 1,
            line: raw.to_string(),
        };

        // Indented lines extend the previous value.
        if raw.starts_with([' ', '\t']) {
            if let (Some(section), Some(key)) = (&current, &last_key) {
                if let Some(value) = sections.get_mut(section).and_then(|s| s.get_mut(key)) {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line);
                    continue;
                }
            }
        }

        // Anything after the closing bracket is ignored.
        if let Some(close) = line.strip_prefix('[').and_then(|_| line.rfind(']')) {
            let name = line[1..close].trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            last_key = None;
            continue;
        }

        let split = line.find(['=', ':']).ok_or_else(malformed)?;
        let key = line[..split].trim().to_lowercase();
        let value = line[split + 1..].trim().to_string();
        if key.is_empty() {
            return Err(malformed());
        }
        // Keys before any section header.
        let section = current.as_ref().ok_or_else(malformed)?;
        sections
            .entry(section.clone())
            .or_default()
            .insert(key.clone(), value);
        last_key = Some(key);
    }

    Ok(sections)
}
