pub mod connection;
pub mod store;

pub use connection::{init_db, Database};
pub use store::{execute, execute_count, execute_prices, PriceRow, QueryOutput};
