//! Local implementations of the path and icon collaborators.

mod icon_cache;
mod local_fs;

pub use icon_cache::CachedIconSource;
pub use local_fs::{default_icon_for_extension, LocalFs};
