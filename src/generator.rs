//! Procedural geometry generators.

mod plane;
pub use plane::*;

use std::path::Path;

use lattice::{
    ser::{self, WriteOptions},
    DataBuilder, GeometryData,
};

use crate::Error;

/// Something which turns a set of parameters into geometry.
///
/// Implementors only need to provide [populate](Generator::populate); the provided methods handle
/// finalizing and exporting the result.
pub trait Generator {
    /// Fill `builder` with geometry.
    ///
    /// Parameters must be validated before anything is staged. On invalid parameters, record the
    /// reason with [DataBuilder::set_error] and return immediately.
    fn populate(&self, builder: &mut DataBuilder);

    /// Generate geometry.
    ///
    /// # Errors
    ///
    /// * [`Build`](Error::Build) if the generator rejected its parameters
    fn generate(&self) -> Result<GeometryData, Error> {
        let mut builder = DataBuilder::new();
        self.populate(&mut builder);
        Ok(builder.build()?)
    }

    /// Generate geometry and write it to `path`.
    ///
    /// # Errors
    ///
    /// * any error from [generate](Generator::generate)
    /// * [`Format`](Error::Format) if the geometry couldn't be written
    fn export(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<GeometryData, Error>
    where
        Self: Sized,
    {
        let data = self.generate()?;
        ser::write(&data, path, options)?;
        Ok(data)
    }
}
