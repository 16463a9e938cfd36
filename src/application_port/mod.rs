mod auth_service;
mod content_service;

pub use auth_service::*;
pub use content_service::*;
