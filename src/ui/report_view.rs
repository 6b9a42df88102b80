use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::{
    app::App,
    report::{Report, Status},
    ui::{category_color, truncate_to_width},
};

/// Largest offset that still fills a table of `table_height` rows.
pub fn max_scroll(total_rows: usize, table_height: usize) -> usize {
    total_rows.saturating_sub(table_height)
}

fn summary_lines(report: &Report) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let status_style = match report.status {
        Status::Pass => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Status::Fail => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    let mut lines = vec![
        Line::from(format!("{:<20}{:>10.2}%", "Formative Total:", report.formative_total)),
        Line::from(format!("{:<20}{:>10.2}%", "Summative Total:", report.summative_total)),
        Line::from(Span::styled(
            format!("{:<20}{:>10.2}%", "COURSE TOTAL:", report.total),
            bold,
        )),
        Line::from(Span::styled(
            format!("{:<20}{:>10.2}/{:.1}", "GPA:", report.gpa, report.gpa_scale),
            bold,
        )),
        Line::from(vec![
            Span::raw("STATUS: "),
            Span::styled(report.status.to_string(), status_style),
        ]),
    ];
    if !report.shortfalls.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("REASON: {}", report.reason()),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

pub fn render_report(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let Some(report) = app.report.as_ref() else {
        let no_data = Paragraph::new("No report available.")
            .block(Block::default().borders(Borders::ALL).title("No Data"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(no_data, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(8), // Summary
            Constraint::Min(0),    // Breakdown table
            Constraint::Length(3), // Instructions
        ])
        .split(area);

    let title = Paragraph::new("FINAL GRADE REPORT")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let summary = Paragraph::new(summary_lines(report))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(summary, chunks[1]);

    // Account for borders and header
    let table_height = chunks[2].height.saturating_sub(3) as usize;
    let total_rows = report.assignments.len();
    let max = max_scroll(total_rows, table_height);
    if app.report_view.scroll_offset > max {
        app.report_view.scroll_offset = max;
    }
    let offset = app.report_view.scroll_offset;

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Category"),
        Cell::from("Weight"),
        Cell::from("Grade"),
        Cell::from("Contribution"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = report
        .assignments
        .iter()
        .enumerate()
        .skip(offset)
        .take(table_height)
        .map(|(idx, line)| {
            let a = &line.assignment;
            Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(truncate_to_width(&a.name, 24)),
                Cell::from(a.category.to_string())
                    .style(Style::default().fg(category_color(a.category))),
                Cell::from(format!("{}%", a.weight)),
                Cell::from(format!("{}%", a.grade)),
                Cell::from(format!("{:.2}%", line.contribution)),
            ])
        })
        .collect();

    // Show scroll position in title if there are more rows than visible
    let scroll_info = if total_rows > table_height {
        format!(
            " ({}/{} rows)",
            offset + rows.len().min(table_height),
            total_rows
        )
    } else {
        String::new()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(24),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Assignment Details{}", scroll_info)),
    );
    f.render_widget(table, chunks[2]);

    let instructions = Paragraph::new("↑/↓ PgUp/PgDn Home scroll | (q)uit (esc)ape")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}
