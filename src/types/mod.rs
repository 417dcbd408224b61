// Downloads shared type definitions
// Each submodule defines types used across the crate.

pub mod command;
pub mod download;
pub mod errors;
pub mod settings;
pub mod view_item;
