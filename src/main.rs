//! NPC shell: a native window hosting the locally served NPC web application.
//!
//! Entry point: opens the window and runs the event loop until it closes.
//! When built without the `gui` feature, runs the shell against the headless
//! backend and prints what it would have done.

#[cfg(feature = "gui")]
fn main() {
    npc_shell::logging::init("info");
    let code = npc_shell::ui::webview_app::start(std::env::args().collect());
    std::process::exit(code);
}

#[cfg(not(feature = "gui"))]
fn main() {
    npc_shell::logging::init("warn");

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              NPC Shell v{} - Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║     Headless run of the window / web view lifecycle         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo::run(std::env::args().collect());
}

#[cfg(not(feature = "gui"))]
mod demo {
    use npc_shell::app::AppShell;
    use npc_shell::backend::{BackendAction, HeadlessBackend};
    use npc_shell::services::config_engine;
    use npc_shell::services::theme_store::ThemeStore;
    use npc_shell::types::signal::{LoadStage, Signal};
    use serde_json::json;

    fn section(name: &str) {
        println!("───────────────────────────────────────────────────────────────");
        println!("  📦 {}", name);
        println!("───────────────────────────────────────────────────────────────");
    }

    pub fn run(args: Vec<String>) {
        section("Configuration");
        let config = config_engine::load_startup_config();
        println!("  Window: {} ({}x{})", config.window.title, config.window.width, config.window.height);
        println!("  URL:    {}", config.url);
        println!("  Channels: {}", config.channel_names().join(", "));
        println!();

        let theme_path = std::env::temp_dir().join("npc-shell-demo-theme.json");
        let mut shell = match AppShell::new(
            config.clone(),
            HeadlessBackend::new(),
            ThemeStore::new(Some(theme_path)),
        ) {
            Ok(shell) => shell,
            Err(e) => {
                println!("  ✗ {}", e);
                return;
            }
        };

        section("Activation");
        if let Err(e) = shell.start(&args) {
            println!("  ✗ {}", e);
            return;
        }
        println!("  Phase: {:?}", shell.phase());
        println!();

        section("Page Events");
        shell.dispatch(Signal::LoadChanged {
            stage: LoadStage::Finished,
            url: config.url.clone(),
        });
        if let Some(host) = config.channels.host.clone() {
            shell.dispatch(Signal::ScriptMessage {
                channel: host,
                body: json!({
                    "type": "themeChanged",
                    "values": {
                        "type": "dark",
                        "values": { "colors": {
                            "editorGroupHeader.tabsBackground": "#1e1e1e",
                            "foreground": "#cccccc"
                        }}
                    }
                }),
            });
        }
        shell.dispatch(Signal::ScriptMessage {
            channel: config.channels.command.clone(),
            body: json!("quit"),
        });
        println!();

        section("Recorded Backend Calls");
        for action in shell.context().backend().actions() {
            println!("  {}", describe(action));
        }
        println!();

        println!("═══════════════════════════════════════════════════════════════");
        println!("  Phase: {:?}, exit code {}", shell.phase(), shell.exit_code());
        println!("═══════════════════════════════════════════════════════════════");
    }

    fn describe(action: &BackendAction) -> String {
        match action {
            BackendAction::CreateWindow(spec) => {
                format!("create window \"{}\" {}x{}", spec.title, spec.width, spec.height)
            }
            BackendAction::CreateSurface(spec) => {
                format!("create web surface (channels: {})", spec.channels.join(", "))
            }
            BackendAction::AttachSurface => "attach surface to window".to_string(),
            BackendAction::Navigate(url) => format!("navigate to {}", url),
            BackendAction::Show => "show window".to_string(),
            BackendAction::DestroyWindow => "destroy window".to_string(),
            BackendAction::Quit(code) => format!("quit ({})", code),
            BackendAction::EvaluateScript(script) => format!("evaluate script ({} bytes)", script.len()),
            BackendAction::SetBackground((r, g, b, a)) => {
                format!("set background rgba({}, {}, {}, {})", r, g, b, a)
            }
        }
    }
}
