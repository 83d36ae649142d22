//! Clipboard access through the platform's command-line tools

use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

/// Detect the current display server (Wayland or X11) on Linux systems
fn detect_display_server() -> DisplayServer {
    if let Ok(session_type) = env::var("XDG_SESSION_TYPE") {
        match session_type.to_lowercase().as_str() {
            "wayland" => return DisplayServer::Wayland,
            "x11" => return DisplayServer::X11,
            _ => {}
        }
    }

    if env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Candidate tools in the order they should be tried
fn clipboard_tools(display_server: DisplayServer) -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        return vec![("pbcopy", vec![])];
    }
    if cfg!(target_os = "windows") {
        return vec![("clip", vec![])];
    }

    let wayland = ("wl-copy", vec![]);
    let xclip = ("xclip", vec!["-selection", "clipboard"]);
    let xsel = ("xsel", vec!["--clipboard", "--input"]);

    match display_server {
        DisplayServer::X11 => vec![xclip, xsel, wayland],
        DisplayServer::Wayland | DisplayServer::Unknown => vec![wayland, xclip, xsel],
    }
}

fn pipe_to(tool: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {}", tool))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {}", tool))?;
    }
    // Close stdin so the tool sees EOF
    drop(child.stdin.take());

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {}", tool))?;
    if !status.success() {
        return Err(anyhow::anyhow!("{} failed", tool));
    }
    Ok(())
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let display_server = detect_display_server();
    let mut last_error = None;

    for (tool, args) in clipboard_tools(display_server) {
        match pipe_to(tool, &args, text) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::debug!(tool, error = %e, "Clipboard tool failed");
                last_error = Some(e);
            }
        }
    }

    let hint = match display_server {
        DisplayServer::Wayland => "install wl-clipboard",
        DisplayServer::X11 => "install xclip or xsel",
        DisplayServer::Unknown => "install wl-clipboard or xclip",
    };
    Err(last_error
        .unwrap_or_else(|| anyhow::anyhow!("No clipboard tool available"))
        .context(format!("Could not copy to clipboard ({})", hint)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn test_tool_order_follows_display_server() {
        let names = |server| {
            clipboard_tools(server)
                .into_iter()
                .map(|(tool, _)| tool)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(DisplayServer::X11), vec!["xclip", "xsel", "wl-copy"]);
        assert_eq!(names(DisplayServer::Wayland)[0], "wl-copy");
    }
}
