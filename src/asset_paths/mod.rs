//! Helpers for classifying and deriving asset paths declared in manifests.
//!
//! Remote detection, suffix derivation and bundle naming live in separate submodules so the
//! string rules can be tested without touching the filesystem. Nothing here performs I/O.

mod bundle;
mod candidates;
mod filters;

pub use bundle::{normalize_slashes, page_bundle_path};
pub use candidates::{append_suffix, has_kind_suffix, minified_variant, unminified_variant};
pub use filters::is_remote_reference;
