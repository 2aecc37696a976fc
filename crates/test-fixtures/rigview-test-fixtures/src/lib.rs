//! Shared test fixtures for the rigview workspace: a recording mock of the
//! rendering backend traits plus canned file-set payloads.

mod assets;
mod mock;

pub use assets::{
    files_loaded, files_loaded_binary, files_missing_page, skeleton_json, two_page_atlas,
};
pub use mock::{MockBackend, MockHandle, RigCall};
