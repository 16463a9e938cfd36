// store

mod session_store;

pub use session_store::*;

// repo

mod content_repo;

pub use content_repo::*;
