//! Token sources
//!
//! Where a bearer token comes from. Sources fail with [`Error::Auth`] when
//! they have no credential to offer.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "FLOWCTL_TOKEN";

/// Directory (project-local or under `$HOME`) that holds flowctl files
pub const CREDENTIALS_DIR: &str = ".flowctl";

/// Credentials file name inside [`CREDENTIALS_DIR`]
pub const CREDENTIALS_FILE: &str = "credentials";

/// Something that can produce an API token
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Load the token, failing with [`Error::Auth`] if none is configured
    async fn load_token(&self) -> Result<String>;

    /// Human-readable description used in error messages
    fn describe(&self) -> String;
}

/// A fixed token
#[derive(Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn load_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(Error::auth("static token is empty"));
        }
        Ok(self.token.clone())
    }

    fn describe(&self) -> String {
        "static token".to_string()
    }
}

/// Reads the token from an environment variable at load time
#[derive(Debug, Clone)]
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenSource {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

#[async_trait]
impl TokenSource for EnvTokenSource {
    async fn load_token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(Error::auth(format!("{} is not set", self.var))),
        }
    }

    fn describe(&self) -> String {
        format!("${}", self.var)
    }
}

/// Reads the token from a credentials file
///
/// The file holds either a YAML/JSON map with a `token` key or the bare
/// token on its first non-empty line.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the credentials file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(contents: &str) -> Option<String> {
        // A bare token containing ": " also parses as a mapping
        if let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_str(contents) {
            if let Some(token) = map.get("token") {
                return token
                    .as_str()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from);
            }
        }

        contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(String::from)
    }
}

#[async_trait]
impl TokenSource for FileTokenSource {
    async fn load_token(&self) -> Result<String> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::auth(format!("{} does not exist", self.path.display())));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Self::parse(&contents)
            .ok_or_else(|| Error::auth(format!("no token in {}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Tries each source in order; the first one with a token wins
pub struct ChainTokenSource {
    sources: Vec<Box<dyn TokenSource>>,
}

impl ChainTokenSource {
    pub fn new(sources: Vec<Box<dyn TokenSource>>) -> Self {
        Self { sources }
    }

    /// Environment variable, then `<cwd>/.flowctl/credentials`, then
    /// `<home>/.flowctl/credentials`
    pub fn default_chain(cwd: Option<&Path>, home: Option<&Path>) -> Self {
        let mut sources: Vec<Box<dyn TokenSource>> = vec![Box::new(EnvTokenSource::default())];
        for dir in [cwd, home].into_iter().flatten() {
            sources.push(Box::new(FileTokenSource::new(
                dir.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
            )));
        }
        Self::new(sources)
    }
}

impl std::fmt::Debug for ChainTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainTokenSource")
            .field("sources", &self.describe())
            .finish()
    }
}

#[async_trait]
impl TokenSource for ChainTokenSource {
    async fn load_token(&self) -> Result<String> {
        for source in &self.sources {
            match source.load_token().await {
                Ok(token) => {
                    debug!(source = %source.describe(), "Loaded API token");
                    return Ok(token);
                }
                Err(Error::Auth { message }) => {
                    debug!(source = %source.describe(), "No token: {message}");
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::auth(format!(
            "no API token found (checked {})",
            self.describe()
        )))
    }

    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
