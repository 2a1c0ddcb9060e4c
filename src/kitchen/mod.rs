//! Kitchen: meals assembled step by step, and the restaurant that directs them.

pub mod meal;
pub mod restaurant;

pub use meal::*;
pub use restaurant::*;
