//! Client errors.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`ClientError::System`] | the terminal cannot be initialised; no game is started |
//! | [`ClientError::Terminal`] | drawing, flushing or a UI task fails after start |
//! | [`ClientError::Config`] | an environment variable holds an unusable value |
//!
//! Unmapped keys and closed channels are not errors.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("system error: {message}")]
    System {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("terminal error: {message}")]
    Terminal {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

impl ClientError {
    pub fn system(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::System {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn terminal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Terminal {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}
