// JobBoard - lib.rs
//
// Library entry point, exposing the store, catalogue and storage backends
// for the command-line front end, integration tests and embedding.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
