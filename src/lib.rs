pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod logging;
pub mod routes;
pub mod state;
pub mod test_helpers;
