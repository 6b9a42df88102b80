pub mod report_view;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Widget, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    app::App,
    assignment::{Category, Field},
    entry::{Feedback, Phase},
    session::FULL_WEIGHT,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const NAME_COLUMN_WIDTH: u16 = 24;

/// Draw whichever screen the app is on.
pub fn draw(app: &mut App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

/// Cut `s` so it fits in `max` terminal columns, marking the cut with an ellipsis.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub(crate) fn category_color(category: Category) -> Color {
    match category {
        Category::Formative => Color::Cyan,
        Category::Summative => Color::Magenta,
    }
}

/// The entry screen: header, weight gauge, recorded assignments, prompt.
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.flow.session();
        let policy = session.policy();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // weight gauge
                Constraint::Min(3),    // recorded assignments
                Constraint::Length(1), // running totals
                Constraint::Length(3), // prompt
                Constraint::Length(2), // feedback
                Constraint::Length(1), // legend
            ])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled("GRADE CALCULATOR", bold_style)),
            Line::from(Span::styled(
                format!(
                    "Passing requires >={:.1}% in both categories",
                    policy.pass_threshold
                ),
                italic_style,
            )),
        ])
        .alignment(Alignment::Center);
        title.render(chunks[0], buf);

        let used = session.total_weight();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Weight used"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio((used / FULL_WEIGHT).clamp(0.0, 1.0))
            .label(format!("{}% of {}%", used, FULL_WEIGHT));
        gauge.render(chunks[1], buf);

        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("Name"),
            Cell::from("Category"),
            Cell::from("Weight"),
            Cell::from("Grade"),
            Cell::from("Contribution"),
        ])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        // newest entries stay visible when the list outgrows the box
        let visible = chunks[2].height.saturating_sub(3) as usize;
        let skip = session.assignments().len().saturating_sub(visible);
        let rows: Vec<Row> = session
            .assignments()
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(idx, a)| {
                Row::new(vec![
                    Cell::from((idx + 1).to_string()),
                    Cell::from(truncate_to_width(&a.name, NAME_COLUMN_WIDTH as usize)),
                    Cell::from(a.category.to_string())
                        .style(Style::default().fg(category_color(a.category))),
                    Cell::from(format!("{}%", a.weight)),
                    Cell::from(format!("{}%", a.grade)),
                    Cell::from(format!("{:.2}%", a.contribution())),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(NAME_COLUMN_WIDTH),
                Constraint::Length(11),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(13),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Assignments"));
        table.render(chunks[2], buf);

        let totals = Paragraph::new(Span::styled(
            format!(
                "Formative {:.1}%   Summative {:.1}%   Remaining weight {}%",
                session.formative_total(),
                session.summative_total(),
                session.remaining_capacity()
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        totals.render(chunks[3], buf);

        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(self.flow.prompt(), bold_style),
            Span::raw(self.input.as_str()),
            Span::styled("█", dim_style),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
        prompt.render(chunks[4], buf);

        if let Some(feedback) = &self.last_feedback {
            let style = match feedback {
                Feedback::Rejected(_) | Feedback::Unrecognized(_) => {
                    Style::default().fg(Color::Red)
                }
                Feedback::Recorded { .. } => Style::default().fg(Color::Green),
                _ => Style::default().fg(Color::Gray),
            };
            let text: Vec<Line> = feedback
                .to_string()
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), style)))
                .collect();
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[5], buf);
        }

        let legend = match self.flow.phase() {
            Phase::Entering(Field::Name) => "(enter) submit / (esc) abort",
            Phase::Entering(_) => "(enter) submit / 'cancel' discards this entry / (esc) abort",
            _ => "(enter) submit / (esc) abort",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}
