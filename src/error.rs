//! Custom error types for calver-release.

use thiserror::Error;

use crate::plugin::LifecycleStage;

/// Main error type for calver-release operations.
#[derive(Error, Debug)]
pub enum CalverError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    // Lifecycle errors
    #[error("Plugin '{plugin}' failed during {stage}: {message}")]
    HookFailed {
        stage: LifecycleStage,
        plugin: String,
        message: String,
    },

    // Version control errors
    #[error("Version control operation failed: {0}")]
    VcsError(String),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Parsing and rendering errors
    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using CalverError
pub type Result<T> = std::result::Result<T, CalverError>;

impl CalverError {
    /// Create a version control error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        Self::VcsError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a hook failure attributed to a plugin and lifecycle stage
    pub fn hook_failed(
        stage: LifecycleStage,
        plugin: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::HookFailed {
            stage,
            plugin: plugin.into(),
            message: msg.into(),
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for CalverError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}
