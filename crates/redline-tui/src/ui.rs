use crate::app::{App, InputMode};
use redline_core::view::{ChunkRow, QueueView};
use redline_core::{ChunkStatus, RenderedSpan, SelectAllState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Error / bulk bar
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let view = app.session.view();

    draw_header(f, app, view.as_ref(), chunks[0]);
    draw_notice(f, app, view.as_ref(), chunks[1]);
    draw_main(f, app, view.as_ref(), chunks[2]);
    draw_footer(f, app, chunks[3]);

    match app.input_mode {
        InputMode::ConfirmBulk(action) => {
            let count = view.as_ref().and_then(|v| v.bulk_bar.as_ref()).map(|b| b.chunk_ids.len()).unwrap_or(0);
            draw_popup(
                f,
                " Confirm ",
                format!("{} {} selected chunk{}? (y/n)", action.verb(), count, if count == 1 { "" } else { "s" }),
            );
        }
        InputMode::ShowingHelp => draw_popup(f, " Help ", HELP_TEXT.to_string()),
        InputMode::Normal => {}
    }
}

const HELP_TEXT: &str = "\
j/k, arrows  move between chunks
space        select/deselect chunk
A            select all / none
a            approve chunk
x            reject chunk
B            approve all selected
X            reject all selected
r            refresh queue
l            toggle redaction legend
PgUp/PgDn    scroll text
?            close help
q            quit";

/// Convert a `#rrggbb` palette entry to a terminal color
pub fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::Reset)
}

fn status_style(status: ChunkStatus) -> Style {
    Style::default().fg(hex_color(status.color()))
}

/// Lay out rendered spans as terminal lines, breaking on embedded newlines
pub fn highlighted_lines(spans: &[RenderedSpan]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];

    for span in spans {
        let style = match span {
            RenderedSpan::Plain { .. } => Style::default(),
            RenderedSpan::Highlighted { background, .. } => Style::default()
                .fg(Color::Black)
                .bg(hex_color(background))
                .add_modifier(Modifier::BOLD),
        };

        for (i, part) in span.text().split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !part.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.spans.push(Span::styled(part.to_string(), style));
                }
            }
        }
    }

    lines
}

fn draw_header(f: &mut Frame, app: &App, view: Option<&QueueView<'_>>, area: Rect) {
    let mut title = vec![Span::styled(
        "redline - Review Queue",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(view) = view {
        title.push(Span::raw("  "));
        title.push(Span::raw(view.summary.clone()));
    }
    if let Some(snapshot) = app.session.snapshot() {
        let counts = snapshot.status_counts();
        title.push(Span::raw("  "));
        title.push(Span::styled(format!("{} pending", counts.pending), status_style(ChunkStatus::Pending)));
        title.push(Span::raw(" / "));
        title.push(Span::styled(format!("{} approved", counts.approved), status_style(ChunkStatus::Approved)));
        title.push(Span::raw(" / "));
        title.push(Span::styled(format!("{} rejected", counts.rejected), status_style(ChunkStatus::Rejected)));
    }
    if app.session.is_loading() {
        title.push(Span::raw("  Loading..."));
    }

    let header = Paragraph::new(Line::from(title)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Error line takes precedence over the bulk-action bar
fn draw_notice(f: &mut Frame, app: &App, view: Option<&QueueView<'_>>, area: Rect) {
    let line = if let Some(error) = app.session.error() {
        Line::from(Span::styled(error, Style::default().fg(Color::Red)))
    } else if let Some(bar) = view.and_then(|v| v.bulk_bar.as_ref()) {
        let style = if bar.enabled {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::styled(format!(" {} ", bar.label), style.add_modifier(Modifier::BOLD)),
            Span::styled("B", style),
            Span::raw(":approve all "),
            Span::styled("X", style),
            Span::raw(":reject all"),
        ])
    } else {
        Line::default()
    };

    f.render_widget(Paragraph::new(line), area);
}

fn draw_main(f: &mut Frame, app: &App, view: Option<&QueueView<'_>>, area: Rect) {
    let Some(view) = view else {
        let message = if app.session.is_loading() { "Loading..." } else { "Queue not loaded. Press r to retry." };
        let paragraph = Paragraph::new(message).block(Block::default().borders(Borders::ALL).title(" Chunks "));
        f.render_widget(paragraph, area);
        return;
    };

    if view.is_empty() {
        let paragraph = Paragraph::new(view.summary.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Chunks "));
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Chunk list
            Constraint::Percentage(60), // Highlighted text
        ])
        .split(area);

    draw_chunk_list(f, app, view, chunks[0]);
    if let Some(row) = view.rows.get(app.cursor) {
        draw_detail(f, app, row, chunks[1]);
    }
}

fn checkbox(row: &ChunkRow<'_>) -> &'static str {
    match (row.show_controls, row.selected) {
        (false, _) => "   ",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    }
}

fn draw_chunk_list(f: &mut Frame, app: &App, view: &QueueView<'_>, area: Rect) {
    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| {
            let mut style = Style::default();
            if row.show_controls && !row.controls_enabled {
                style = style.fg(Color::DarkGray);
            }
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", checkbox(row)), style),
                Span::raw(row.chunk.chunk_id.clone()),
                Span::raw("  "),
                Span::styled(row.status().label(), status_style(row.status())),
            ]))
        })
        .collect();

    let title = match view.select_all {
        Some(control) => {
            let mark = match control.state {
                SelectAllState::Checked => "[x]",
                SelectAllState::Indeterminate => "[-]",
                SelectAllState::Unchecked => "[ ]",
            };
            format!(" {} Select all ", mark)
        }
        None => " Chunks ".to_string(),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &App, row: &ChunkRow<'_>, area: Rect) {
    let mut lines = highlighted_lines(&row.spans);

    if let Some(redaction_line) = &row.redaction_line {
        lines.push(Line::default());
        lines.push(Line::styled(redaction_line.clone(), Style::default().fg(Color::DarkGray)));
    }

    if app.show_legend && !row.chunk.redactions.is_empty() {
        lines.push(Line::default());
        for redaction in &row.chunk.redactions {
            let palette = redaction.source.palette();
            lines.push(Line::from(vec![
                Span::styled(
                    redaction.placeholder.clone(),
                    Style::default().fg(Color::Black).bg(hex_color(palette.background)),
                ),
                Span::raw("  "),
                Span::styled(redaction.tooltip(), Style::default().fg(hex_color(palette.border))),
            ]));
        }
    }

    let title = format!(" {} ({}) ", row.chunk.chunk_id, row.chunk.document_id);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let status = if app.session.controller().is_in_flight() {
        "Working...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "Ready".to_string()
    };

    let help_text = vec![
        Span::raw(status),
        Span::raw(" | "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit "),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(":move "),
        Span::styled("space", Style::default().fg(Color::Yellow)),
        Span::raw(":select "),
        Span::styled("a/x", Style::default().fg(Color::Yellow)),
        Span::raw(":approve/reject "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(":refresh "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(":help"),
    ];

    let footer = Paragraph::new(Line::from(help_text)).block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn draw_popup(f: &mut Frame, title: &str, body: String) {
    let area = centered_rect(60, 40, f.area());
    let paragraph = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
