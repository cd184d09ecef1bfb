use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in DriveSeal.
#[derive(Debug, Error)]
pub enum DriveSealError {
    // --- Core crypto errors ---
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidInputLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Authentication failed: invalid password or corrupted file")]
    AuthenticationFailure,

    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("Metadata field '{field}' must decode to {expected} bytes, got {actual}")]
    ValidationFailure {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    // --- Supporting crypto errors ---
    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParameters(String),

    #[error("Unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Integrity check failed: content hash does not match")]
    IntegrityMismatch,

    #[error("Background crypto worker failed: {0}")]
    WorkerFailed(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Refusing to overwrite existing file at {0} (use --force)")]
    FileExists(PathBuf),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Stable, text-free classification of a [`DriveSealError`].
///
/// Callers that translate failures into their own user-facing messages
/// should match on this rather than on the `Display` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInputLength,
    AuthenticationFailure,
    MalformedMetadata,
    ValidationFailure,
    RandomSourceUnavailable,
    InvalidKdfParameters,
    UnsupportedAlgorithm,
    EncryptionFailed,
    IntegrityMismatch,
    WorkerFailed,
    Config,
    Io,
    Cli,
}

impl DriveSealError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInputLength { .. } => ErrorKind::InvalidInputLength,
            Self::AuthenticationFailure => ErrorKind::AuthenticationFailure,
            Self::MalformedMetadata(_) => ErrorKind::MalformedMetadata,
            Self::ValidationFailure { .. } => ErrorKind::ValidationFailure,
            Self::RandomSourceUnavailable(_) => ErrorKind::RandomSourceUnavailable,
            Self::InvalidKdfParameters(_) => ErrorKind::InvalidKdfParameters,
            Self::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Self::EncryptionFailed(_) => ErrorKind::EncryptionFailed,
            Self::IntegrityMismatch => ErrorKind::IntegrityMismatch,
            Self::WorkerFailed(_) => ErrorKind::WorkerFailed,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::Io(_) | Self::FileNotFound(_) | Self::FileExists(_) => ErrorKind::Io,
            Self::CommandFailed(_) => ErrorKind::Cli,
        }
    }
}

/// Convenience type alias for DriveSeal results.
pub type Result<T> = std::result::Result<T, DriveSealError>;
