pub mod csv_export;
pub mod token;

pub use csv_export::{csv_escape, results_to_csv, RESULT_HEADER};
pub use token::generate_submission_token;
