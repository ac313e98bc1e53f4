pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod process;
pub mod schema;
pub mod update;
