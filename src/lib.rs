pub mod error;
pub mod git_log;
pub mod notes;
pub mod version;

pub use error::{ReleaseToolsError, Result};
