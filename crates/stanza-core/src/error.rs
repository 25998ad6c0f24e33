use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // ── Node project detection ──
    #[error("package.json not found in {dir} — stanza needs a Node.js project root")]
    ManifestNotFound { dir: PathBuf },

    #[error("failed to read {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Whether this error rejects the configuration itself (as opposed to I/O).
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
