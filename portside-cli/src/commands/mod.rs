pub mod azure;
pub mod config;
pub mod endpoints;
pub mod pool;
