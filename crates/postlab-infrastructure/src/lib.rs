pub mod api_client;
pub mod config_service;
pub mod dto;

pub use crate::api_client::ContentApiClient;
pub use crate::config_service::ConfigService;
