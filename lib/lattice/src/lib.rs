#![doc = include_str!("../README.md")]

#[cfg(feature = "deserialize")]
pub mod de;

#[cfg(feature = "serialize")]
pub mod ser;

pub mod format;

mod error;
pub use error::*;

mod data;
pub use data::*;
