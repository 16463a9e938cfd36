mod auth_service_fake;
mod auth_service_impl;
mod content_service_impl;

pub use auth_service_fake::*;
pub use auth_service_impl::*;
pub use content_service_impl::*;
