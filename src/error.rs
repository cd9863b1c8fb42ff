//! Errors from generating and exporting geometry.

use lattice::{BuildError, FormatError};

/// Errors related to generating and exporting geometry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The generator rejected its parameters.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The geometry couldn't be written.
    #[error(transparent)]
    Format(#[from] FormatError),
}
