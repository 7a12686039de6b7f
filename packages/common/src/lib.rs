pub mod normalize;
pub mod stats;
pub mod visitor;

pub use normalize::*;
pub use stats::*;
pub use visitor::*;
