mod attribute;
mod binary_format;
mod class;
mod constants;
mod member;
mod writer;

pub use attribute::*;
pub use binary_format::*;
pub use class::*;
pub use constants::*;
pub use member::*;
pub use writer::*;
