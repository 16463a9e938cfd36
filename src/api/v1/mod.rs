mod error;
mod handler;
mod router;
mod validate;

pub use error::recover_error;
pub use router::routes;
