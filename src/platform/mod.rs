// JobBoard - platform/mod.rs
//
// Platform abstraction layer: key-value storage backends, platform
// directories, config.toml.
// Must NOT depend on: app.

pub mod config;
pub mod storage;
