//! Loading indicator for terminal output.
//!
//! Follows the review session's transitions and draws a short status on
//! stderr while a request is in flight. Designed for interactive
//! terminals; silenced with `--no-progress`, `--quiet` or JSON output.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use colored::Colorize;

use crate::models::{ProviderId, ReviewInput, ReviewMode};
use crate::session::{SessionObserver, SessionState};

/// Renders session transitions to stderr.
///
/// Thread-safe; registered on a session via `Arc`.
pub struct ProgressReporter {
    inner: Mutex<ProgressState>,
    /// If false, all output is suppressed.
    enabled: bool,
}

struct ProgressState {
    /// Header text, e.g. `python project (12 files) with Ollama`.
    label: String,
    /// Number of lines we last printed (for clearing).
    rendered_lines: usize,
    /// Last transition seen.
    last: SessionState,
}

impl ProgressReporter {
    pub fn new(input: &ReviewInput, provider: ProviderId, enabled: bool) -> Self {
        let subject = match input.mode() {
            ReviewMode::Snippet => format!("{} snippet", input.language()),
            ReviewMode::Project => {
                format!("{} project ({} file(s))", input.language(), input.file_count())
            }
        };
        Self {
            inner: Mutex::new(ProgressState {
                label: format!("{subject} with {}", provider.display_name()),
                rendered_lines: 0,
                last: SessionState::Idle,
            }),
            enabled,
        }
    }

    /// The last state this reporter was told about.
    pub fn last_state(&self) -> SessionState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last
            .clone()
    }

    fn render(state: &mut ProgressState) {
        Self::clear_lines(state.rendered_lines);
        state.rendered_lines = 0;

        let stderr = io::stderr();
        let mut handle = stderr.lock();
        match &state.last {
            SessionState::Idle => {}
            SessionState::Loading => {
                let _ = writeln!(
                    handle,
                    "  {} Reviewing {}",
                    "▸".cyan().bold(),
                    state.label.dimmed(),
                );
                let _ = writeln!(
                    handle,
                    "    {} {}",
                    "◌".cyan().bold(),
                    "waiting for the model…".cyan(),
                );
                state.rendered_lines = 2;
            }
            SessionState::Success(_) => {
                let _ = writeln!(
                    handle,
                    "  {} {} {}\n",
                    "✔".green().bold(),
                    state.label.dimmed(),
                    "done".green(),
                );
            }
            SessionState::Failed(_) => {
                let _ = writeln!(
                    handle,
                    "  {} {} {}\n",
                    "✖".red().bold(),
                    state.label.dimmed(),
                    "failed".red(),
                );
            }
        }
        let _ = handle.flush();
    }

    /// Move cursor up and clear `n` lines.
    fn clear_lines(n: usize) {
        if n == 0 {
            return;
        }
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for _ in 0..n {
            let _ = write!(handle, "\x1b[1A\x1b[2K");
        }
        let _ = handle.flush();
    }
}

impl SessionObserver for ProgressReporter {
    fn on_transition(&self, state: &SessionState) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.last = state.clone();
        if self.enabled {
            Self::render(&mut inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_disabled_no_panic() {
        let input = ReviewInput::snippet("x", "rust");
        let reporter = ProgressReporter::new(&input, ProviderId::Gemini, false);
        reporter.on_transition(&SessionState::Loading);
        reporter.on_transition(&SessionState::Failed("nope".into()));
        assert_eq!(reporter.last_state(), SessionState::Failed("nope".into()));
    }

    #[test]
    fn reporter_label_describes_review() {
        let input = ReviewInput::project(
            vec![
                crate::models::ProjectFile::new("p/a.ts", ""),
                crate::models::ProjectFile::new("p/b.ts", ""),
            ],
            "typescript",
        );
        let reporter = ProgressReporter::new(&input, ProviderId::LmStudio, false);
        let state = reporter.inner.lock().unwrap();
        assert_eq!(state.label, "typescript project (2 file(s)) with LM Studio");
        assert_eq!(state.rendered_lines, 0);
    }
}
