pub mod model;
pub mod store;

pub use model::{PreferenceRecord, PreferenceSnapshot, SessionState};
pub use store::PreferenceStore;
