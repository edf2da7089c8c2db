// NPC shell managers
// Stateful components owned by the shell for the process lifetime.

pub mod signal_registry;
