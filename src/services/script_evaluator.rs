// NPC shell script evaluator
// Fire-and-forget evaluation of page script with a logged, tagged outcome.
//
// The submitted text is wrapped so the engine always hands back a small JSON
// envelope: `{"ok": <value>}` or `{"error": "<message>"}`. That is what lets the
// completion tell an exception apart from a result on every platform.

use serde_json::Value;

use crate::backend::{RawScriptResult, ShellBackend};
use crate::types::errors::{ScriptError, ShellError};
use crate::types::script::ScriptOutcome;

/// Wraps `script` so its completion value or exception comes back as an envelope.
///
/// The text runs through indirect `eval`, so on a page whose Content-Security-Policy
/// lacks `'unsafe-eval'` every evaluation completes as a `Failure` carrying the
/// engine's CSP error.
pub fn wrap_script(script: &str) -> String {
    // JSON string literals are valid JS string literals.
    let source = serde_json::to_string(script).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(function(){{try{{var r=(0,eval)({});return {{ok:r===undefined?null:r}};}}\
         catch(e){{return {{error:String(e&&e.message!==undefined?e.message:e)}};}}}})()",
        source
    )
}

/// Classifies a raw completion from the web surface.
pub fn parse_completion(raw: RawScriptResult) -> ScriptOutcome {
    let json = match raw {
        Ok(json) => json,
        Err(engine_message) => return ScriptOutcome::Failure(ScriptError::Engine(engine_message)),
    };

    let envelope: Value = match serde_json::from_str(&json) {
        Ok(v) => v,
        Err(_) => return ScriptOutcome::Failure(ScriptError::MalformedResult(json)),
    };

    // An exception wins over any value that came with it.
    if let Some(error) = envelope.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return ScriptOutcome::Failure(ScriptError::Engine(message));
    }

    match envelope.get("ok") {
        Some(Value::String(text)) => ScriptOutcome::Text(text.clone()),
        Some(other) => ScriptOutcome::Unexpected(other.clone()),
        None => ScriptOutcome::Unexpected(envelope),
    }
}

/// Submits `script` and logs its outcome when the engine completes it.
///
/// Nothing is returned to the caller: a submission failure is logged as a warning
/// like any other script failure.
pub fn evaluate_script_and_log<B: ShellBackend>(backend: &mut B, script: &str) {
    if let Err(e) = submit(backend, script, |outcome| outcome.log()) {
        log::warn!("{}", e);
    }
}

/// Submits `script` and hands the classified outcome to `on_outcome`, exactly once.
pub fn submit<B, F>(backend: &mut B, script: &str, on_outcome: F) -> Result<(), ShellError>
where
    B: ShellBackend,
    F: FnOnce(ScriptOutcome) + Send + 'static,
{
    let wrapped = wrap_script(script);
    log::debug!("evaluating script ({} bytes)", script.len());
    backend.evaluate_script(
        &wrapped,
        Box::new(move |raw| on_outcome(parse_completion(raw))),
    )
}
