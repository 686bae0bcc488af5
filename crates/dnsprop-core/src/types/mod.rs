mod record;
mod result;
mod summary;

pub use record::*;
pub use result::*;
pub use summary::*;
