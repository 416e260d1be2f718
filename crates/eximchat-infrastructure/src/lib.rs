pub mod auth_store;
pub mod config_service;
pub mod http_gateway;
pub mod paths;

pub use crate::auth_store::FileAuthStore;
pub use crate::config_service::ConfigService;
pub use crate::http_gateway::HttpChatGateway;
pub use crate::paths::EximPaths;
