use crate::properties::PropertiesError;
use thiserror::Error;

/// Top-level error type for the layered-props library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("properties error: {0}")]
    Properties(#[from] PropertiesError),

    #[error("scoped properties require a property store")]
    MissingStore,
}
