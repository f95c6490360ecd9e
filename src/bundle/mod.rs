//! Gateway to the external minifier used for single files and page bundles.

pub mod minifier;

pub use minifier::{Esbuild, Minifier, minify};

#[cfg(test)]
pub(crate) mod testing;
