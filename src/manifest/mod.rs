//! Reading, validating and writing library and page manifests.

mod parsing;
mod store;

pub use parsing::{EntryShape, parse_entry};
pub use store::{
  load_library_manifest, load_page_manifest, save_library_manifest, save_page_manifest,
};
