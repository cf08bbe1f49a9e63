pub mod compare;
pub mod config;
pub mod export;
pub mod headers;
pub mod loader;
pub mod logging;
pub mod markdown;
pub mod outliers;
pub mod pairing;
pub mod ranking;
pub mod report;
pub mod table;
pub mod win_pattern;
