// JobBoard - app/mod.rs
//
// Application layer: the profile store, the job catalogue, preferences and
// the dashboard view built from them.
// Dependencies: core, platform::storage.

pub mod board;
pub mod dashboard;
pub mod prefs;
pub mod store;
