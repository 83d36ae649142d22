use crate::utils::error::{AppError, AppResult};
use crossterm::terminal;
use std::io::IsTerminal;

/// Visible rows of the attached terminal, if there is one
fn terminal_rows() -> Option<u16> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    terminal::size().ok().map(|(_, rows)| rows)
}

/// Content taller than two thirds of the screen goes through the pager
pub fn needs_pager(content: &str, rows: u16) -> bool {
    content.lines().count() > usize::from(rows) * 2 / 3
}

fn page(content: &str) -> AppResult<()> {
    let pager = minus::Pager::new();
    pager
        .set_prompt("promptvault (q to quit)")
        .and_then(|_| pager.push_str(content))
        .map_err(|e| AppError::System(format!("Pager setup failed: {}", e)))?;

    match minus::page_all(pager) {
        Ok(()) => Ok(()),
        // q / Ctrl+C before the end
        Err(e) if e.to_string().to_lowercase().contains("abort") => Ok(()),
        Err(e) => Err(AppError::System(format!("Pager failed: {}", e))),
    }
}

/// Print `content`, paging it when it does not fit the terminal
pub fn print_paged(content: &str) -> AppResult<()> {
    match terminal_rows() {
        Some(rows) if needs_pager(content, rows) => page(content),
        _ => {
            println!("{}", content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_pager() {
        let short = "one\ntwo\nthree";
        let long = "line\n".repeat(40);
        assert!(!needs_pager(short, 30));
        assert!(needs_pager(&long, 30));
        assert!(!needs_pager(&long, u16::MAX));
    }
}
