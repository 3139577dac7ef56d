pub mod archive;
pub mod config;
pub mod debounce;
pub mod error;
pub mod generation;
pub mod notice;
pub mod platform;
pub mod policy;
pub mod preference;

// Re-export common error type
pub use error::{PostlabError, Result};
