pub mod db;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod query;

#[cfg(test)]
mod tests;
