pub mod beacon;
pub mod proof;

pub use beacon::*;
pub use proof::*;
