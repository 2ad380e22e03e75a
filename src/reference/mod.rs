//! What a module needs from the environment it is applied to
//!
//! References are extracted statically from a module's helper classes by the
//! [`ReferenceCollector`] and merged into one [`ReferenceModel`] per module.

mod collector;
mod errors;
mod flags;
mod model;
mod symbol;

pub use collector::*;
pub use errors::*;
pub use flags::*;
pub use model::*;
pub use symbol::*;
