pub mod config;
pub mod discord;
pub mod emoji_cache;
pub mod errors;
pub mod fingerprint;
pub mod models;
pub mod observability;
pub mod progress;
pub mod scanner;
pub mod sync;
