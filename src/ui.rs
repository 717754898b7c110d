use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;
use std::time::SystemTime;

use crate::app::{App, Fetch, InputMode, View};
use crate::model::{format_distance, FilterFormField, Flight, FlightField, Units};

struct Theme {
    accent: Color,
    warn: Color,
    danger: Color,
    dim: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    header_bg: Color,
}

fn theme() -> Theme {
    Theme {
        accent: Color::Cyan,
        warn: Color::Yellow,
        danger: Color::Red,
        dim: Color::DarkGray,
        highlight_fg: Color::Black,
        highlight_bg: Color::Cyan,
        header_bg: Color::Rgb(20, 30, 40),
    }
}

const LIST_COLUMNS: [&str; 12] = [
    "Date",
    "Origin",
    "Destination",
    "Departure Time",
    "Arrival Time",
    "Duration",
    "Distance",
    "Seat",
    "Class",
    "Airplane",
    "Airline",
    "Flight Number",
];

pub fn ui(f: &mut Frame, app: &mut App) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, chunks[0], app);

    match app.view {
        View::List => render_list(f, chunks[1], app),
        View::Detail(_) => render_detail(f, chunks[1], app),
    }

    render_footer(f, chunks[2], app);

    if app.input_mode == InputMode::Filter {
        render_filter_form(f, size, app);
    }
    if app.input_mode == InputMode::Edit {
        render_edit_form(f, size, app);
    }
    if app.input_mode == InputMode::ConfirmDelete {
        render_confirm_delete(f, size, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    let title = match app.view {
        View::List => {
            let count = app.flights.loaded().map(Vec::len);
            match count {
                Some(n) => format!("FLIGHTS {n}"),
                None => "FLIGHTS".to_string(),
            }
        }
        View::Detail(_) => match app.flight.loaded() {
            Some(flight) => flight_heading(flight),
            None => "FLIGHT".to_string(),
        },
    };

    let mut spans = vec![
        Span::styled(
            "FLIGHT LOG",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(title),
        Span::raw(" | "),
        Span::raw(format!("UNITS {}", app.units.suffix())),
    ];
    if app.edit_mode {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("EDITING ({} staged)", app.patch.len()),
            Style::default().fg(theme.warn).add_modifier(Modifier::BOLD),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("LOGBOOK");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// What the list body shows for a given fetch state. An empty loaded
/// list is a notice, never a table.
#[derive(Debug, PartialEq)]
enum ListContent<'a> {
    Notice(&'static str),
    Failure(&'a str),
    Table(&'a [Flight]),
}

fn list_content(flights: &Fetch<Vec<Flight>>) -> ListContent<'_> {
    match flights {
        Fetch::Unloaded | Fetch::Pending { .. } => ListContent::Notice("Loading..."),
        Fetch::Failed(message) => ListContent::Failure(message),
        Fetch::Loaded(flights) if flights.is_empty() => ListContent::Notice("No flights!"),
        Fetch::Loaded(flights) => ListContent::Table(flights),
    }
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    match list_content(&app.flights) {
        ListContent::Notice(text) => {
            let color = if text == "No flights!" {
                theme().warn
            } else {
                theme().dim
            };
            render_notice(f, area, text, color);
        }
        ListContent::Failure(message) => render_failure(f, area, message),
        ListContent::Table(flights) => {
            render_table(f, area, app.units, &mut app.table_state, flights);
        }
    }
}

fn render_table(
    f: &mut Frame,
    area: Rect,
    units: Units,
    table_state: &mut TableState,
    flights: &[Flight],
) {
    let theme = theme();
    let header_cells = LIST_COLUMNS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(theme.accent)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(theme.header_bg))
        .height(1);

    let rows = flights.iter().map(|flight| {
        let cells = vec![
            Cell::from(opt_text(flight.date.as_deref())),
            Cell::from(flight.origin.table_label()),
            Cell::from(flight.destination.table_label()),
            Cell::from(opt_text(flight.departure_time.as_deref())),
            Cell::from(opt_text(flight.arrival_time.as_deref())),
            Cell::from(duration_text(flight.duration)),
            Cell::from(distance_text(flight.distance, units)),
            Cell::from(opt_text(flight.seat.as_deref())),
            Cell::from(opt_text(flight.ticket_class.as_deref())),
            Cell::from(opt_text(flight.airplane.as_deref())),
            Cell::from(opt_text(flight.airline.as_deref())),
            Cell::from(opt_text(flight.flight_number.as_deref())),
        ];
        Row::new(cells)
    });

    let constraints = [
        Constraint::Length(10),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(13),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .title("FLIGHTS");

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(1)
        .highlight_style(
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(table, area, table_state);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    match &app.flight {
        Fetch::Unloaded | Fetch::Pending { .. } => {
            render_notice(f, area, "Loading...", theme.dim);
            return;
        }
        Fetch::Failed(message) => {
            render_failure(f, area, message);
            return;
        }
        Fetch::Loaded(_) => {}
    }
    let Some(flight) = app.flight.loaded() else {
        return;
    };

    let section = |label: &'static str| {
        Line::from(Span::styled(
            label,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
    };
    let item = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<16}"), Style::default().fg(theme.dim)),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} | {}", flight_heading(flight), opt_text(flight.date.as_deref())),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Timings"),
        item("Departure", opt_text(flight.departure_time.as_deref())),
        item("Arrival", opt_text(flight.arrival_time.as_deref())),
        item("Arrival Date", opt_text(flight.arrival_date.as_deref())),
        item("Duration", duration_text(flight.duration)),
        Line::from(""),
        section("Airports"),
        item("Origin", airport_text(&flight.origin)),
        item("", flight.origin.location_line()),
        item("Destination", airport_text(&flight.destination)),
        item("", flight.destination.location_line()),
        item("Distance", distance_text(flight.distance, app.units)),
        Line::from(""),
        section("Other"),
        item("Seat", opt_text(flight.seat.as_deref())),
        item("Class", opt_text(flight.ticket_class.as_deref())),
        item("Airplane", opt_text(flight.airplane.as_deref())),
        item("Tail Number", opt_text(flight.tail_number.as_deref())),
        item("Airline", opt_text(flight.airline.as_deref())),
        item("Flight Number", opt_text(flight.flight_number.as_deref())),
        item("Notes", opt_text(flight.notes.as_deref())),
    ];

    if !app.patch.is_empty() && !app.edit_mode {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} unsaved change(s). e edit, ctrl-s save.", app.patch.len()),
            Style::default().fg(theme.warn).add_modifier(Modifier::BOLD),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("FLIGHT");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_filter_form(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    let height = (FilterFormField::ALL.len() + 4) as u16;
    let popup = centered_rect(50, height, area);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (i, field) in FilterFormField::ALL.iter().enumerate() {
        let value = app.filter_form.value(*field);
        let shown = if value.is_empty() {
            format!(" {:<10} ({})", field.label(), field.hint())
        } else {
            format!(" {:<10} {}", field.label(), value)
        };
        let line = if i == app.filter_cursor {
            Line::from(Span::styled(
                shown,
                Style::default()
                    .fg(theme.highlight_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if value.is_empty() {
            Line::from(Span::styled(shown, Style::default().fg(theme.dim)))
        } else {
            Line::from(Span::raw(shown))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down move • Enter apply • Ctrl+U clear field • Esc cancel",
        Style::default().fg(theme.dim),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("FILTERS");
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

fn render_edit_form(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    let height = (FlightField::ALL.len() + 6) as u16;
    let popup = centered_rect(60, height, area);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (i, field) in FlightField::ALL.iter().enumerate() {
        let staged = app.patch.staged(*field);
        let marker = if staged.is_some() { "*" } else { " " };
        let shown = if i == app.field_cursor {
            format!("{marker} {:<14} {}_", field.label(), app.field_input)
        } else {
            match staged {
                Some(value) => format!("{marker} {:<14} {value}", field.label()),
                None => format!("{marker} {:<14} ({})", field.label(), field.hint()),
            }
        };
        let line = if i == app.field_cursor {
            Line::from(Span::styled(
                shown,
                Style::default()
                    .fg(theme.highlight_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if app.patch.staged(*field).is_some() {
            Line::from(Span::styled(shown, Style::default().fg(theme.warn)))
        } else {
            Line::from(Span::styled(shown, Style::default().fg(theme.dim)))
        };
        lines.push(line);
    }

    lines.push(Line::from(""));
    let save_hint = if app.can_save() {
        Span::styled(
            format!("Ctrl+S save ({} fields)", app.patch.len()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("Nothing to save", Style::default().fg(theme.dim))
    };
    lines.push(Line::from(save_hint));
    lines.push(Line::from(Span::styled(
        "Up/Down move • Enter stage (blank clears) • Esc close",
        Style::default().fg(theme.dim),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("EDIT FLIGHT");
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

fn render_confirm_delete(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    let popup = centered_rect(44, 6, area);
    f.render_widget(Clear, popup);

    let id = match app.view {
        View::Detail(id) => id,
        View::List => return,
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("Delete flight {id}?"),
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter confirm • n/Esc cancel",
            Style::default().fg(theme.dim),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("CONFIRM");
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = theme();
    let help = match app.view {
        View::List => format!(
            "q quit  ↑/↓ move  Enter open  / filters  r refresh  {}",
            limit_hint(app.effective_limit())
        ),
        View::Detail(_) => {
            "q quit  e edit  d delete  r reload  Esc back".to_string()
        }
    };

    let mut spans = vec![Span::styled(help, Style::default().fg(theme.dim))];
    if let Some(status) = app.status_line(SystemTime::now()) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(theme.warn).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_notice(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .title("FLIGHTS");
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block);
    f.render_widget(paragraph, area);
}

fn render_failure(f: &mut Frame, area: Rect, message: &str) {
    let theme = theme();
    let lines = vec![
        Line::from(Span::styled(
            format!("Request failed: {message}"),
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry.",
            Style::default().fg(theme.dim),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .title("FLIGHTS");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height.saturating_sub(2)).max(3);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    let vertical = popup_layout[1];
    let width = (vertical.width * percent_x / 100).max(20);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(width),
            Constraint::Min(1),
        ])
        .split(vertical);
    horizontal[1]
}

fn opt_text(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "N/A".to_string(),
    }
}

fn duration_text(value: Option<i64>) -> String {
    match value {
        Some(minutes) => format!("{minutes} min"),
        None => "N/A".to_string(),
    }
}

fn distance_text(value: Option<i64>, units: Units) -> String {
    match value {
        Some(distance) => format_distance(distance, units),
        None => "N/A".to_string(),
    }
}

/// "LHR to JFK" with municipality fallbacks for airports without codes.
fn flight_heading(flight: &Flight) -> String {
    format!(
        "{} to {}",
        flight.origin.heading_label(),
        flight.destination.heading_label()
    )
}

fn airport_text(airport: &crate::model::Airport) -> String {
    match &airport.name {
        Some(name) if !name.is_empty() => format!("{name} [{}]", airport.code_pair()),
        _ => airport.code_pair(),
    }
}

/// Footer hint with the limit actually in effect, never the raw form text.
fn limit_hint(limit: u64) -> String {
    format!("Showing at most {limit} flights. Adjust filters for more.")
}
