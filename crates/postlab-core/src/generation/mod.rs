pub mod backend;
pub mod model;
pub mod view;

pub use backend::GenerationBackend;
pub use model::{
    BatchOutcome, Draft, ErrorKind, GenerationRequest, PlatformOutcome, PlatformResult,
    PlatformStatus,
};
pub use view::PlatformViewState;
