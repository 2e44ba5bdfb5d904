// pwgen-client shared type definitions
// Each submodule defines types used across the crate.

pub mod config;
pub mod cookie;
pub mod errors;
pub mod generation;
pub mod settings;
