pub mod analysis;
pub mod config;
pub mod data;
pub mod logging;
pub mod model;
pub mod render;
pub mod sample;
pub mod server;
pub mod table;
