use thiserror::Error;

/// Unified error type for iwtui
#[derive(Error, Debug)]
pub enum WmError {
    #[error("backend command failed: {0}")]
    Backend(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no wireless devices available")]
    NoDevices,

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("config error (line {line}): {message}")]
    Config { line: usize, message: String },

    #[error("provisioning error: {0}")]
    Provision(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl WmError {
    pub fn config(line: usize, message: impl Into<String>) -> Self {
        Self::Config {
            line,
            message: message.into(),
        }
    }
}

pub type WmResult<T> = Result<T, WmError>;
