mod content;
mod page;
mod subject;

pub use content::*;
pub use page::*;
pub use subject::*;
