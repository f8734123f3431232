mod binding;
mod core;
mod field;

pub use self::core::*;
pub use binding::*;
pub use field::*;
