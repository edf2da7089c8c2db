// NPC shell shared type definitions
// Each submodule defines types used across the shell.

pub mod config;
pub mod errors;
pub mod message;
pub mod script;
pub mod signal;
pub mod theme;
