// NPC shell script bridge
// Initialization script that gives the page its named message channels.
//
// Pages written against WebKit post with
// `window.webkit.messageHandlers.<name>.postMessage(body)`; the bridge keeps that
// call shape and forwards it over the web view IPC as an `IpcEnvelope`.

use crate::types::errors::ChannelError;
use crate::types::message::IpcEnvelope;
use crate::types::signal::Signal;

/// Builds the initialization script exposing `channels` and routing `window.close()`.
pub fn bridge_script(channels: &[String]) -> String {
    let names = serde_json::to_string(channels).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(function () {{
  if (!window.ipc || typeof window.ipc.postMessage !== "function") return;
  var send = function (envelope) {{ window.ipc.postMessage(JSON.stringify(envelope)); }};
  window.webkit = window.webkit || {{}};
  window.webkit.messageHandlers = window.webkit.messageHandlers || {{}};
  {names}.forEach(function (name) {{
    try {{
      window.webkit.messageHandlers[name] = {{
        postMessage: function (body) {{
          send({{ kind: "message", channel: name, body: body === undefined ? null : body }});
        }}
      }};
    }} catch (e) {{}}
  }});
  window.close = function () {{ send({{ kind: "close" }}); }};
}})();"#,
        names = names
    )
}

/// Turns one raw IPC body into the signal the shell dispatches.
///
/// Messages for channels that were never registered are rejected.
pub fn route_ipc(raw: &str, channels: &[String]) -> Result<Signal, ChannelError> {
    match IpcEnvelope::parse(raw)? {
        IpcEnvelope::Message { channel, body } => {
            if !channels.iter().any(|c| *c == channel) {
                return Err(ChannelError::UnknownChannel(channel));
            }
            Ok(Signal::ScriptMessage { channel, body })
        }
        IpcEnvelope::Close => Ok(Signal::SurfaceCloseRequested),
    }
}
