pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod parallel;
pub mod server;
