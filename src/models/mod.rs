pub mod card;
pub mod character;
pub mod portrait;

pub use card::*;
pub use character::*;
pub use portrait::*;
