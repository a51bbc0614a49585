//! Document-type classification by signature pattern tables.
//!
//! Pure and infallible: no match is a valid `"unknown"` classification with
//! confidence 0, not an error.

pub mod types;
pub mod signatures;
pub mod classifier;

pub use types::*;
pub use signatures::{DocumentSignature, SignatureTable};
pub use classifier::*;
