pub mod format;
pub mod paths;
pub mod time;
