use thiserror::Error;

use jimpl_reflect::{CollectError, ProviderError};
use jimpl_toolchain::ToolchainError;

use crate::eligibility::IneligibleReason;

/// Everything that can terminate a synthesis run. All variants are terminal
/// for the current target; nothing is retried.
#[derive(Debug, Error)]
pub enum ImplementError {
    #[error("a non-empty type name is required")]
    InvalidRequest,

    #[error("type `{0}` not found on the classpath")]
    TypeNotFound(String),

    #[error("type `{name}` is not supported: {reason}")]
    UnsupportedType {
        name: String,
        reason: IneligibleReason,
    },

    #[error("class `{0}` has no usable constructor")]
    NoUsableConstructor(String),

    #[error(transparent)]
    Resolve(#[from] ProviderError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}

impl ImplementError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ImplementError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<CollectError> for ImplementError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::NoUsableConstructor(name) => ImplementError::NoUsableConstructor(name),
            CollectError::Provider(err) => ImplementError::Resolve(err),
        }
    }
}
