use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::report_view::render_report,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Entry screen - renders prompts and recorded assignments using the App widget
pub struct EntryScreen;

impl Screen for EntryScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Report screen - uses the dedicated renderer
pub struct ReportScreen;

impl Screen for ReportScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_report(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Entry => Box::new(EntryScreen),
        AppState::Report => Box::new(ReportScreen),
    }
}
