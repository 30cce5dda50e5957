pub mod cors;
pub mod results_key;

pub use cors::create_cors;
pub use results_key::ResultsKeyGuard;
