//! NPC shell: a native window around a locally served web application.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod backend;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
