use crate::utils::output::OutputStyle;
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent},
    execute, style,
    terminal::{self, ClearType},
};
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process::Command;

pub fn prompt_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Like [`prompt_input`] but keeps `current` when the answer is empty
pub fn prompt_with_default(label: &str, current: &str) -> Result<String> {
    let prompt = if current.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, OutputStyle::muted(current))
    };
    let input = prompt_input(&prompt)?;
    Ok(if input.is_empty() {
        current.to_string()
    } else {
        input
    })
}

/// The remainder of the first suggestion that extends `input`
fn completion_for<'a>(input: &str, suggestions: &'a [String]) -> &'a str {
    if input.chars().count() < 2 {
        return "";
    }
    suggestions
        .iter()
        .filter(|s| s.as_str() != input)
        .find_map(|s| s.strip_prefix(input))
        .unwrap_or("")
}

pub fn prompt_input_with_autocomplete(prompt: &str, suggestions: &[String]) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;

    let result: Result<String> = (|| {
        let mut input = String::new();

        loop {
            match event::read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => {
                    input.push(c);
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Tab, ..
                }) => {
                    let completion = completion_for(&input, suggestions).to_string();
                    input.push_str(&completion);
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Backspace,
                    ..
                }) => {
                    input.pop();
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Enter,
                    ..
                }) => break,
                Event::Key(KeyEvent {
                    code: KeyCode::Esc, ..
                }) => {
                    return Err(anyhow::anyhow!("Input cancelled by user"));
                }
                _ => continue,
            }

            let completion = completion_for(&input, suggestions);
            execute!(
                io::stdout(),
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                style::Print(prompt),
                style::Print(&input),
                style::Print(OutputStyle::muted(completion))
            )?;
            let width = completion.chars().count() as u16;
            if width > 0 {
                execute!(io::stdout(), cursor::MoveLeft(width))?;
            }
            io::stdout().flush()?;
        }
        Ok(input.trim().to_string())
    })();

    terminal::disable_raw_mode()?;
    println!();
    result
}

/// Read several lines of text. Enter submits, Ctrl+J or Shift+Enter starts a
/// new line and pasted text keeps its line breaks.
pub fn prompt_multiline(prompt: &str) -> Result<String> {
    println!("{}", prompt);

    terminal::enable_raw_mode()?;

    let _ = execute!(io::stdout(), EnableBracketedPaste);

    let result: Result<String> = (|| {
        let mut lines: Vec<String> = Vec::new();
        let mut current_line = String::new();

        loop {
            match event::read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('j'),
                    modifiers: event::KeyModifiers::CONTROL,
                    ..
                })
                | Event::Key(KeyEvent {
                    code: KeyCode::Enter,
                    modifiers: event::KeyModifiers::SHIFT,
                    ..
                }) => {
                    lines.push(std::mem::take(&mut current_line));
                    print!("\r\n");
                    io::stdout().flush()?;
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Enter,
                    modifiers: event::KeyModifiers::NONE,
                    ..
                }) => {
                    lines.push(current_line.clone());
                    break;
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => {
                    current_line.push(c);
                    print!("{}", c);
                    io::stdout().flush()?;
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Backspace,
                    ..
                }) => {
                    if current_line.pop().is_some() {
                        execute!(
                            io::stdout(),
                            cursor::MoveLeft(1),
                            terminal::Clear(ClearType::UntilNewLine)
                        )?;
                    } else if let Some(previous) = lines.pop() {
                        current_line = previous;
                        execute!(
                            io::stdout(),
                            cursor::MoveUp(1),
                            cursor::MoveToColumn(0),
                            terminal::Clear(ClearType::UntilNewLine),
                            style::Print(&current_line)
                        )?;
                    }
                    io::stdout().flush()?;
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Esc, ..
                }) => {
                    return Err(anyhow::anyhow!("Input cancelled by user"));
                }
                Event::Paste(pasted_text) => {
                    let mut pasted_lines = pasted_text.lines().peekable();
                    while let Some(line) = pasted_lines.next() {
                        current_line.push_str(line);
                        if pasted_lines.peek().is_some() {
                            lines.push(std::mem::take(&mut current_line));
                            print!("{}\r\n", line);
                        } else {
                            print!("{}", line);
                        }
                    }
                    io::stdout().flush()?;
                }
                _ => {}
            }
        }
        Ok(lines.join("\n"))
    })();

    let _ = execute!(io::stdout(), DisableBracketedPaste);
    let _ = terminal::disable_raw_mode();

    println!();
    result
}

/// Read a yes/no answer, `default` on empty input. `None` if unrecognised.
pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub fn prompt_yes_no(prompt: &str) -> Result<bool> {
    prompt_yes_no_default(prompt, false)
}

/// Yes/no question where Enter keeps `default`
pub fn prompt_yes_no_default(prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let input = prompt_input(&format!("{} {}: ", prompt, hint))?;
        match parse_yes_no(&input, default) {
            Some(answer) => return Ok(answer),
            None => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Arrow-key selection over `items`; `None` when the user backs out
pub fn select_from_list(header: &str, items: &[String]) -> Result<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();

    let mut selected = 0;
    let result: Result<Option<usize>> = (|| loop {
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        execute!(
            stdout,
            style::Print(OutputStyle::header(header)),
            style::Print("\r\n"),
            style::Print(OutputStyle::muted(
                "↑/↓ to move, Enter to select, q or Esc to go back"
            )),
            style::Print("\r\n\r\n")
        )?;

        for (i, item) in items.iter().enumerate() {
            if i == selected {
                execute!(
                    stdout,
                    style::Print("> "),
                    style::Print(OutputStyle::info(item)),
                    style::Print("\r\n")
                )?;
            } else {
                execute!(stdout, style::Print("  "), style::Print(item), style::Print("\r\n"))?;
            }
        }

        match event::read()? {
            Event::Key(KeyEvent {
                code: KeyCode::Up, ..
            }) => {
                selected = selected.saturating_sub(1);
            }
            Event::Key(KeyEvent {
                code: KeyCode::Down,
                ..
            }) => {
                if selected + 1 < items.len() {
                    selected += 1;
                }
            }
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }) => return Ok(Some(selected)),
            Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                ..
            })
            | Event::Key(KeyEvent {
                code: KeyCode::Esc, ..
            }) => return Ok(None),
            _ => {}
        }
    })();

    terminal::disable_raw_mode()?;
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    result
}

/// Read all of stdin when it is piped rather than a terminal
pub fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read prompt from stdin")?;
    Ok(Some(buffer).filter(|text| !text.trim().is_empty()))
}

/// Pick an editor: explicit choice, then `$EDITOR`, then the first one installed
pub fn detect_editor(preferred: Option<&str>) -> String {
    preferred
        .filter(|e| !e.trim().is_empty())
        .map(|e| e.to_string())
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| {
            if cfg!(windows) {
                return "notepad".to_string();
            }
            ["nvim", "vim", "nano"]
                .into_iter()
                .find(|e| {
                    Path::new("/usr/bin").join(e).exists()
                        || Path::new("/usr/local/bin").join(e).exists()
                })
                .unwrap_or("vi")
                .to_string()
        })
}

fn run_editor(editor: &str, path: &Path) -> Result<()> {
    // Allow values like "code --wait"
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("Editor command is empty"))?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to execute editor: {}", editor))?;

    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with non-zero status"));
    }
    Ok(())
}

/// Open `content` in a temporary file and return what the user saved
pub fn open_editor(content: Option<&str>, editor_cmd: Option<&str>) -> Result<String> {
    let editor = detect_editor(editor_cmd);
    let temp_file = std::env::temp_dir().join(format!("promptvault_{}.md", std::process::id()));

    std::fs::write(&temp_file, content.unwrap_or(""))
        .with_context(|| format!("Failed to create {}", temp_file.display()))?;

    let outcome = run_editor(&editor, &temp_file)
        .and_then(|_| std::fs::read_to_string(&temp_file).map_err(anyhow::Error::from));
    let _ = std::fs::remove_file(&temp_file);

    Ok(outcome?.trim().to_string())
}

/// Edit a file in place, used for the config file
pub fn edit_file_direct(file_path: &Path, editor_cmd: Option<&str>) -> Result<()> {
    run_editor(&detect_editor(editor_cmd), file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_for() {
        let suggestions = vec![
            "writing".to_string(),
            "work".to_string(),
            "café menu".to_string(),
        ];
        assert_eq!(completion_for("w", &suggestions), "");
        assert_eq!(completion_for("wr", &suggestions), "iting");
        assert_eq!(completion_for("work", &suggestions), "");
        assert_eq!(completion_for("café", &suggestions), " menu");
        assert_eq!(completion_for("zz", &suggestions), "");
    }

    #[test]
    fn test_parse_yes_no_keeps_default_on_enter() {
        assert_eq!(parse_yes_no("", true), Some(true));
        assert_eq!(parse_yes_no("  ", false), Some(false));
        assert_eq!(parse_yes_no("Y", false), Some(true));
        assert_eq!(parse_yes_no("no", true), Some(false));
        assert_eq!(parse_yes_no("maybe", true), None);
    }

    #[test]
    fn test_detect_editor_prefers_explicit_choice() {
        assert_eq!(detect_editor(Some("hx")), "hx");
        assert!(!detect_editor(None).is_empty());
        assert!(!detect_editor(Some("  ")).is_empty());
    }
}
