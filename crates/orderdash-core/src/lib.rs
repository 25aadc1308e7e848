pub mod aggregate;
pub mod config;
pub mod decode;
pub mod error;
pub mod listing;
pub mod record;
pub mod role;
