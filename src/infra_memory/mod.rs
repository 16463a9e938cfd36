mod content_repo_memory;
mod expiring_store;
mod response_cache;
mod session_store_memory;

pub use content_repo_memory::*;
pub use expiring_store::*;
pub use response_cache::*;
pub use session_store_memory::*;
