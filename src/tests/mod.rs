mod consolidate_tests;
pub mod utils;
