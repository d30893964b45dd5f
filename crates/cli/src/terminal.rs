//! Terminal chat surface.

use agent::Event;
use console::{Term, measure_text_width, style};
use session::{Role, Surface, Turn};
use std::io::Write;
use termimad::MadSkin;

/// Draws the chat on stdout.
pub struct Terminal {
    term: Term,
    skin: MadSkin,
    /// Tokens drawn since the last complete event.
    streamed: String,
}

impl Terminal {
    /// A surface on stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            skin: MadSkin::default(),
            streamed: String::new(),
        }
    }

    /// Clear the screen.
    pub fn clear(&self) {
        self.term.clear_screen().ok();
    }

    /// Erase the streamed draft; the event that follows prints it in full.
    fn end_stream(&mut self) {
        if self.streamed.is_empty() {
            return;
        }

        let (_, columns) = self.term.size();
        let count = rows(&self.streamed, usize::from(columns));
        self.streamed.clear();
        self.term.write_line("").ok();
        self.term.clear_last_lines(count).ok();
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Terminal {
    fn turn(&mut self, turn: &Turn) {
        self.end_stream();
        match turn.role {
            Role::User => {
                let line = format!("{} {}", style(">").cyan().bold(), turn.text);
                self.term.write_line(&line).ok();
            }
            Role::Assistant => {
                self.term
                    .write_line(&style("assistant").green().bold().to_string())
                    .ok();
                self.skin.print_text(&turn.text);
            }
        }
    }

    fn trace(&mut self, event: &Event) {
        if let Event::Token(token) = event {
            if self.term.is_term() {
                self.streamed.push_str(token);
                write!(self.term, "{}", style(token).dim()).ok();
                self.term.flush().ok();
            }
            return;
        }

        self.end_stream();
        let text = match event {
            Event::Finish(_) => return,
            Event::ParseError { .. } => style(event.to_string()).yellow(),
            _ => style(event.to_string()).dim(),
        };
        self.term.write_line(&text.to_string()).ok();
    }

    fn info(&mut self, message: &str) {
        self.end_stream();
        self.term
            .write_line(&style(message).blue().to_string())
            .ok();
    }

    fn error(&mut self, message: &str) {
        self.end_stream();
        self.term.write_line(&style(message).red().to_string()).ok();
    }
}

/// Screen rows taken by `text` on a terminal `columns` wide.
fn rows(text: &str, columns: usize) -> usize {
    let columns = columns.max(1);
    text.split('\n')
        .map(|line| measure_text_width(line).div_ceil(columns).max(1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::rows;

    #[test]
    fn counts_wrapped_rows() {
        assert_eq!(rows("", 80), 1);
        assert_eq!(rows("short answer", 80), 1);
        assert_eq!(rows(&"x".repeat(81), 80), 2);
        assert_eq!(rows(&"x".repeat(80), 80), 1);
        assert_eq!(rows("a\nb\n", 80), 3);
        assert_eq!(rows("abc", 0), 3);
    }
}
