use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::config::GradingPolicy;
use crate::entry::{EntryFlow, Feedback, Phase, SessionOutcome};
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Entry,
    Report,
}

#[derive(Debug, Default)]
pub struct ReportViewState {
    pub scroll_offset: usize,
}

/// State behind the full-screen front end.
#[derive(Debug)]
pub struct App {
    pub flow: EntryFlow,
    pub state: AppState,
    /// Line being typed for the current prompt.
    pub input: String,
    pub last_feedback: Option<Feedback>,
    pub report: Option<Report>,
    pub report_view: ReportViewState,
    pub should_quit: bool,
}

impl App {
    pub fn new(policy: GradingPolicy) -> Self {
        Self {
            flow: EntryFlow::new(policy),
            state: AppState::Entry,
            input: String::new(),
            last_feedback: None,
            report: None,
            report_view: ReportViewState::default(),
            should_quit: false,
        }
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.flow.outcome()
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.flow.abort();
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Entry => self.on_entry_key(key),
            AppState::Report => self.on_report_key(key),
        }
    }

    fn on_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.last_feedback = Some(self.flow.abort());
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                let feedback = self.flow.submit(&line);
                debug!(%feedback, "entry feedback");
                self.last_feedback = Some(feedback);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            _ => {}
        }

        match self.flow.phase() {
            Phase::Finalized => match self.flow.report() {
                Some(report) => {
                    self.report = Some(report);
                    self.report_view = ReportViewState::default();
                    self.state = AppState::Report;
                }
                None => self.should_quit = true,
            },
            Phase::Terminated => self.should_quit = true,
            Phase::AwaitingDecision | Phase::Entering(_) => {}
        }
    }

    fn on_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.report_view.scroll_offset = self.report_view.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                // clamped against the table height when rendering
                self.report_view.scroll_offset += 1;
            }
            KeyCode::PageUp => {
                self.report_view.scroll_offset = self.report_view.scroll_offset.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.report_view.scroll_offset += 10;
            }
            KeyCode::Home => {
                self.report_view.scroll_offset = 0;
            }
            _ => {}
        }
    }
}
