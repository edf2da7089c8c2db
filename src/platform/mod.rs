// NPC shell platform paths
// Where the shell keeps its config file and the theme state reported by the page.
//
// Linux:   $XDG_CONFIG_HOME/npc-shell, $XDG_DATA_HOME/npc-shell
// macOS:   ~/Library/Application Support/NPC-Shell (both)
// Windows: %APPDATA%/NPC-Shell (both)

use std::env;
use std::path::PathBuf;

/// Directory name used on Linux.
pub const APP_DIR_UNIX: &str = "npc-shell";
/// Directory name used on macOS and Windows.
pub const APP_DIR_DESKTOP: &str = "NPC-Shell";

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolves an XDG base directory: `$xdg/npc-shell`, else `$HOME/<fallback>/npc-shell`.
pub fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    match xdg {
        Some(base) => PathBuf::from(base).join(APP_DIR_UNIX),
        None => {
            let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
            for part in fallback {
                path.push(part);
            }
            path.join(APP_DIR_UNIX)
        }
    }
}

/// Returns the platform-specific configuration directory.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        macos_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows_appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir(var("XDG_CONFIG_HOME"), var("HOME"), &[".config"])
    }
}

/// Returns the platform-specific data directory.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        macos_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows_appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir(var("XDG_DATA_HOME"), var("HOME"), &[".local", "share"])
    }
}

#[cfg(target_os = "macos")]
fn macos_support_dir() -> PathBuf {
    PathBuf::from(var("HOME").unwrap_or_else(|| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join(APP_DIR_DESKTOP)
}

#[cfg(target_os = "windows")]
fn windows_appdata_dir() -> PathBuf {
    let appdata =
        var("APPDATA").unwrap_or_else(|| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join(APP_DIR_DESKTOP)
}
