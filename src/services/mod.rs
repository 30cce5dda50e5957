pub mod location_service;
pub mod results_service;
pub mod vote_service;

pub use location_service::*;
pub use results_service::*;
pub use vote_service::*;
