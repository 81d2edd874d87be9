// JobBoard - core/mod.rs
//
// Core domain layer: account and listing types, search, ids, passwords.
// Must NOT depend on: app, platform, or perform I/O.

pub mod ids;
pub mod jobs;
pub mod model;
pub mod password;
