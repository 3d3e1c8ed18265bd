pub mod config;
pub mod directory;
pub mod history;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod pairing;
pub mod preferences;
pub mod records;
pub mod render;
pub mod report;
pub mod sleeper;
pub mod standings;
pub mod stats_cache;
pub mod stats_engine;
pub mod stats_loader;
pub mod store;
