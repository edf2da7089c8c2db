// NPC shell services
// Stateless helpers and file-backed stores used by the shell.

pub mod config_engine;
pub mod host_channel;
pub mod script_bridge;
pub mod script_evaluator;
pub mod theme_store;
