pub mod ballot;
pub mod common;
pub mod location;
pub mod results;
pub mod vote;

pub use ballot::*;
pub use common::*;
pub use location::*;
pub use results::*;
pub use vote::*;
