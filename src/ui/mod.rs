//! NPC shell UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! The application itself is the web page served at the configured URL; this layer
//! only hosts it and carries messages between page script and the shell.

pub mod webview_app;
