//! Error type for generator configuration.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GeneratorError {
    /// Schema name not recognised
    #[error("Unknown event schema: {0} (expected shopping-mall or auto-click)")]
    UnknownSchema(String),

    /// Client reuse probability outside `[0, 1]`
    #[error("Client reuse probability must be within [0, 1], got {0}")]
    InvalidReuseProbability(f64),
}
