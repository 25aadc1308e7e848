/// Re-export `Config` from `orderdash-core` for use within this crate.
///
/// Environment parsing lives in the core crate so integration tests can build
/// a config without the server binary.
pub use orderdash_core::config::Config;
