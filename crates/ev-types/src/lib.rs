pub mod errors;
pub mod front;
pub mod problem;
pub mod solution;

pub use errors::*;
pub use front::*;
pub use problem::*;
pub use solution::*;
