// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use medorders_app::{
    DebounceTicket, EditableField, LoadOutcome, LoadRequest, LoadTicket, Location, MedicationId,
    MedicationRecord, NavHistory, OptionalColumn, PageItem, TableCommand, TableEvent, TableState,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SKELETON_ROWS: usize = 5;
const LIVE_CURSOR: &str = "▏";
const FIELD_MARKER: &str = "›";

/// Side effects the table needs from its host: running fetches off the UI
/// thread and reacting to saves.
pub trait TableRuntime {
    /// Starts a fetch that eventually sends exactly one
    /// `InternalEvent::FetchFinished` for `request.ticket`.
    fn spawn_fetch(&mut self, request: LoadRequest, tx: Sender<InternalEvent>) -> Result<()>;
    fn cancel_fetch(&mut self, _ticket: LoadTicket) -> Result<()> {
        Ok(())
    }
    fn notify_saved(&mut self, _rows: &[MedicationId]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    FetchFinished {
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
    SearchDebounced {
        token: u64,
    },
    ClearStatus {
        token: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Browse,
    Search,
    Cell {
        id: MedicationId,
        field: EditableField,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    cursor_row: usize,
    cursor_field: usize,
    input: InputMode,
    configurator_visible: bool,
    history: NavHistory,
    status_line: Option<String>,
    status_token: u64,
}

impl ViewData {
    fn new(initial: Location) -> Self {
        Self {
            cursor_row: 0,
            cursor_field: 0,
            input: InputMode::Browse,
            configurator_visible: false,
            history: NavHistory::new(initial),
            status_line: None,
            status_token: 0,
        }
    }

    fn current_field(&self) -> EditableField {
        EditableField::ALL[self.cursor_field.min(EditableField::ALL.len() - 1)]
    }
}

pub fn run_app<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    initial: Location,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (internal_tx, internal_rx) = mpsc::channel();
    let mut view_data = ViewData::new(initial.clone());
    start_session(state, runtime, &mut view_data, &internal_tx, initial);

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_session<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    initial: Location,
) {
    log::info!("opening table at {initial}");
    dispatch(state, runtime, view_data, tx, TableCommand::Navigate(initial));
}

fn process_internal_events<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::FetchFinished { ticket, outcome } => {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    tx,
                    TableCommand::LoadFinished { ticket, outcome },
                );
            }
            InternalEvent::SearchDebounced { token } => {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    tx,
                    TableCommand::SearchTimerFired(token),
                );
            }
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn dispatch<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: TableCommand,
) {
    let events = state.dispatch(command);
    apply_events(state, runtime, view_data, tx, events);
}

fn apply_events<R: TableRuntime>(
    state: &TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<TableEvent>,
) {
    for event in events {
        match event {
            TableEvent::FetchRequested(request) => {
                let ticket = request.ticket;
                if let Err(error) = runtime.spawn_fetch(request, tx.clone()) {
                    let _ = tx.send(InternalEvent::FetchFinished {
                        ticket,
                        outcome: LoadOutcome::Failed(format!("{error:#}")),
                    });
                }
            }
            TableEvent::FetchCancelled(ticket) => {
                if let Err(error) = runtime.cancel_fetch(ticket) {
                    log::warn!("cancel load {}: {error:#}", ticket.get());
                }
            }
            TableEvent::SearchScheduled(ticket) => schedule_search_commit(tx, ticket),
            TableEvent::LocationChanged(location) => view_data.history.push(location),
            TableEvent::PageLoaded { .. } | TableEvent::LoadFailed(_) => {
                view_data.cursor_row = view_data
                    .cursor_row
                    .min(state.records().len().saturating_sub(1));
                if matches!(view_data.input, InputMode::Cell { .. }) {
                    view_data.input = InputMode::Browse;
                }
            }
            TableEvent::ChangesSaved { rows } => {
                if let Err(error) = runtime.notify_saved(&rows) {
                    log::warn!("save notification failed: {error:#}");
                }
                emit_status(view_data, tx, saved_message(rows.len()));
            }
            TableEvent::EditModeChanged(false) => {
                if matches!(view_data.input, InputMode::Cell { .. }) {
                    view_data.input = InputMode::Browse;
                }
            }
            TableEvent::CellEditChanged {
                id,
                field,
                live: false,
            } if view_data.input == (InputMode::Cell { id, field }) => {
                view_data.input = InputMode::Browse;
            }
            _ => {}
        }
    }
}

fn saved_message(rows: usize) -> String {
    if rows == 1 {
        "Changes saved (1 row)".to_owned()
    } else {
        format!("Changes saved ({rows} rows)")
    }
}

fn schedule_search_commit(internal_tx: &Sender<InternalEvent>, ticket: DebounceTicket) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(ticket.delay);
        let _ = sender.send(InternalEvent::SearchDebounced {
            token: ticket.token,
        });
    });
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match view_data.input {
        InputMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        InputMode::Cell { id, field } => {
            handle_cell_key(state, runtime, view_data, internal_tx, key, id, field);
            return false;
        }
        InputMode::Browse => {}
    }

    if view_data.configurator_visible {
        handle_configurator_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    let row_id = current_row_id(state, view_data);
    let command = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            move_row(state, view_data, 1);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_row(state, view_data, -1);
            None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            view_data.cursor_field = (view_data.cursor_field + 1).min(EditableField::ALL.len() - 1);
            None
        }
        KeyCode::Char('h') | KeyCode::Left => {
            view_data.cursor_field = view_data.cursor_field.saturating_sub(1);
            None
        }
        KeyCode::Char(' ') => row_id.map(TableCommand::ToggleRowSelection),
        KeyCode::Char('a') => Some(TableCommand::ToggleAllRows),
        KeyCode::Char('e') => {
            if state.selection_count() == 0 {
                emit_status(view_data, internal_tx, "select rows with space before editing");
                None
            } else {
                Some(TableCommand::StartEditing)
            }
        }
        KeyCode::Enter => {
            if let Some(id) = row_id {
                start_cell_edit(state, runtime, view_data, internal_tx, id);
            }
            None
        }
        KeyCode::Esc if state.is_editing() && !state.is_loading() => {
            emit_status(view_data, internal_tx, "edits dismissed");
            Some(TableCommand::DismissEdits)
        }
        KeyCode::Char('s') => Some(TableCommand::SaveChanges),
        KeyCode::Char('o') => row_id.map(TableCommand::ToggleExpand),
        KeyCode::Char('/') => {
            view_data.input = InputMode::Search;
            None
        }
        KeyCode::Char('n') | KeyCode::PageDown => {
            Some(TableCommand::GoToPage(i64::from(state.page()) + 1))
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            Some(TableCommand::GoToPage(i64::from(state.page()) - 1))
        }
        KeyCode::Char('[') => view_data.history.back().map(TableCommand::Navigate),
        KeyCode::Char(']') => view_data.history.forward().map(TableCommand::Navigate),
        KeyCode::Char('c') => {
            view_data.configurator_visible = true;
            None
        }
        KeyCode::Char('R') => Some(TableCommand::Reload),
        _ => None,
    };

    if let Some(command) = command {
        dispatch(state, runtime, view_data, internal_tx, command);
    }
    false
}

fn start_cell_edit<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: MedicationId,
) {
    let field = view_data.current_field();
    dispatch(
        state,
        runtime,
        view_data,
        internal_tx,
        TableCommand::StartCellEdit { id, field },
    );
    if state.is_cell_live(id, field) {
        view_data.input = InputMode::Cell { id, field };
    } else if !state.is_editing() {
        emit_status(view_data, internal_tx, "press e to edit the selected rows");
    } else {
        emit_status(view_data, internal_tx, "only selected rows can be edited");
    }
}

fn handle_search_key<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc => {
            view_data.input = InputMode::Browse;
            None
        }
        KeyCode::Enter => {
            view_data.input = InputMode::Browse;
            Some(TableCommand::CommitSearch)
        }
        KeyCode::Backspace => {
            let mut value = state.search_input().to_owned();
            value.pop();
            Some(TableCommand::SetSearchInput(value))
        }
        KeyCode::Char(ch) => {
            let mut value = state.search_input().to_owned();
            value.push(ch);
            Some(TableCommand::SetSearchInput(value))
        }
        _ => None,
    };
    if let Some(command) = command {
        dispatch(state, runtime, view_data, internal_tx, command);
    }
}

fn handle_cell_key<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    id: MedicationId,
    field: EditableField,
) {
    let current = state.effective_value(id, field).unwrap_or_default().to_owned();
    let command = match key.code {
        KeyCode::Esc => Some(TableCommand::CancelFieldEdit { id, field }),
        KeyCode::Enter | KeyCode::Tab => Some(TableCommand::CommitFieldEdit { id, field }),
        KeyCode::Backspace => {
            let mut value = current;
            value.pop();
            Some(TableCommand::ChangeField { id, field, value })
        }
        KeyCode::Char(ch) => {
            let mut value = current;
            value.push(ch);
            Some(TableCommand::ChangeField { id, field, value })
        }
        _ => None,
    };
    if let Some(command) = command {
        dispatch(state, runtime, view_data, internal_tx, command);
    }
}

fn handle_configurator_key<R: TableRuntime>(
    state: &mut TableState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            OptionalColumn::ALL
                .get(index)
                .copied()
                .map(TableCommand::ToggleColumn)
        }
        KeyCode::Char('r') => Some(TableCommand::ResetColumns),
        KeyCode::Char('c') | KeyCode::Esc | KeyCode::Enter => {
            view_data.configurator_visible = false;
            None
        }
        _ => None,
    };
    if let Some(command) = command {
        dispatch(state, runtime, view_data, internal_tx, command);
    }
}

fn current_row_id(state: &TableState, view_data: &ViewData) -> Option<MedicationId> {
    state
        .records()
        .get(view_data.cursor_row)
        .map(|record| record.id)
}

fn move_row(state: &TableState, view_data: &mut ViewData, delta: isize) {
    let len = state.records().len();
    if len == 0 {
        view_data.cursor_row = 0;
        return;
    }
    let next = view_data.cursor_row.saturating_add_signed(delta);
    view_data.cursor_row = next.min(len - 1);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &TableState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data)).block(
        Block::default()
            .title("medication orders")
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    render_body(frame, layout[1], state, view_data);

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, layout[2]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if view_data.configurator_visible {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(configurator_overlay_text(state)).block(
            Block::default()
                .title("columns")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(overlay, area);
    }
}

fn render_body(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &TableState,
    view_data: &ViewData,
) {
    if let Some(message) = body_message(state) {
        let body = Paragraph::new(message).block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, area);
        return;
    }

    let visible = state.columns().visible();
    let mut widths = vec![
        Constraint::Length(3),
        Constraint::Percentage(22),
        Constraint::Percentage(20),
        Constraint::Percentage(22),
        Constraint::Percentage(16),
    ];
    widths.extend(visible.iter().map(|_| Constraint::Min(12)));

    let header = Row::new(header_labels(state)).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row<'_>> = if state.is_loading() {
        (0..SKELETON_ROWS)
            .map(|_| {
                let cells = widths.iter().map(|_| Cell::from("░░░░░░"));
                Row::new(cells)
                    .height(2)
                    .style(Style::default().fg(Color::DarkGray))
            })
            .collect()
    } else {
        let mut rows = Vec::with_capacity(state.records().len());
        for (row_index, record) in state.records().iter().enumerate() {
            let mut style = Style::default();
            if state.is_selected(record.id) {
                style = style.fg(Color::Cyan);
            }
            if row_index == view_data.cursor_row {
                style = style.bg(Color::DarkGray);
            }
            rows.push(
                Row::new(row_cells(state, view_data, row_index, record))
                    .height(2)
                    .style(style),
            );
            if state.is_expanded(record.id) {
                rows.push(
                    Row::new(vec![String::new(), detail_text(record)])
                        .height(2)
                        .style(Style::default().fg(Color::Gray)),
                );
            }
        }
        rows
    };

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_text(state: &TableState, view_data: &ViewData) -> String {
    let cursor = if view_data.input == InputMode::Search {
        LIVE_CURSOR
    } else {
        ""
    };
    format!(
        "{}   search: {}{cursor}",
        state.location(),
        state.search_input()
    )
}

/// Status shown instead of table rows, if any.
fn body_message(state: &TableState) -> Option<String> {
    if state.is_loading() {
        return None;
    }
    if let Some(error) = state.error() {
        return Some(format!("{error}\n\npress R to retry"));
    }
    if state.records().is_empty() {
        return Some("No medication orders found.".to_owned());
    }
    None
}

fn header_labels(state: &TableState) -> Vec<String> {
    let checkbox = if state.all_selected() {
        "[x]"
    } else if state.indeterminate() {
        "[-]"
    } else {
        "[ ]"
    };
    let mut labels = vec![
        checkbox.to_owned(),
        "Name / Dosage".to_owned(),
        "Frequency / Duration".to_owned(),
        "Instructions".to_owned(),
        "Date / Doctor".to_owned(),
    ];
    labels.extend(
        state
            .columns()
            .visible()
            .into_iter()
            .map(|column| column.label().to_owned()),
    );
    labels
}

fn row_cells(
    state: &TableState,
    view_data: &ViewData,
    row_index: usize,
    record: &MedicationRecord,
) -> Vec<String> {
    let field = |field| field_text(state, view_data, row_index, record.id, field);
    let checkbox = if state.is_selected(record.id) {
        "[x]"
    } else {
        "[ ]"
    };

    let mut cells = vec![
        checkbox.to_owned(),
        format!(
            "{}\n{}",
            field(EditableField::Name),
            field(EditableField::Dosage)
        ),
        format!(
            "{}\n{}",
            field(EditableField::Frequency),
            field(EditableField::Duration)
        ),
        field(EditableField::Instructions),
        format!("{}\n{}", record.date, record.doctor),
    ];
    cells.extend(
        state
            .columns()
            .visible()
            .into_iter()
            .map(|column| column.render_cell(record)),
    );
    cells
}

fn field_text(
    state: &TableState,
    view_data: &ViewData,
    row_index: usize,
    id: MedicationId,
    field: EditableField,
) -> String {
    let value = state.effective_value(id, field).unwrap_or_default();
    if state.is_cell_live(id, field) {
        return format!("{value}{LIVE_CURSOR}");
    }
    let focused = state.is_editing()
        && state.is_selected(id)
        && row_index == view_data.cursor_row
        && field == view_data.current_field();
    if focused {
        format!("{FIELD_MARKER}{value}")
    } else {
        value.to_owned()
    }
}

fn detail_text(record: &MedicationRecord) -> String {
    let tags = record.patient_tags();
    let tags = if tags.is_empty() {
        "no tags".to_owned()
    } else {
        tags.join(", ")
    };
    format!(
        "patient: {} ({tags}) · contact: {}\nnotes: {}",
        record.patient_name().unwrap_or("Unknown patient"),
        record.contact,
        record.notes
    )
}

fn pagination_bar_text(state: &TableState) -> String {
    let current = state.page();
    let markers = state
        .pagination_items()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == current => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "…".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{markers}   Page {current} of {} · {} orders",
        state.total_pages(),
        state.total_count()
    )
}

fn footer_text(state: &TableState) -> String {
    let selection = state
        .selection_label()
        .unwrap_or_else(|| "no rows selected".to_owned());
    let actions = if state.is_editing() {
        "EDIT | enter edit cell | s save changes | esc dismiss"
    } else if state.selection_count() > 0 {
        "e edit selected | space toggle | a toggle all"
    } else {
        "space select | a select all"
    };
    format!("{selection} | {actions}\n{}", pagination_bar_text(state))
}

fn status_text(state: &TableState, view_data: &ViewData) -> String {
    let default = match view_data.input {
        InputMode::Search => "type to search | enter apply now | esc back".to_owned(),
        InputMode::Cell { field, .. } => {
            format!("editing {} | enter keep | esc revert", field.label())
        }
        InputMode::Browse => {
            let loading = if state.is_loading() { "loading… | " } else { "" };
            format!(
                "{loading}j/k/h/l move | o expand | / search | n/p page | {}c columns | R retry | q quit",
                history_hint(&view_data.history)
            )
        }
    };
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default,
    }
}

fn history_hint(history: &NavHistory) -> &'static str {
    match (history.can_go_back(), history.can_go_forward()) {
        (true, true) => "[/] history | ",
        (true, false) => "[ back | ",
        (false, true) => "] forward | ",
        (false, false) => "",
    }
}

fn configurator_overlay_text(state: &TableState) -> String {
    let columns = state.columns();
    let mut lines = vec!["Visible columns".to_owned()];
    let visible = columns.visible();
    if visible.is_empty() {
        lines.push("  (none)".to_owned());
    }
    lines.extend(
        visible
            .iter()
            .map(|column| format!("  {}", column.descriptor().label)),
    );
    let hidden = columns.hidden();
    if !hidden.is_empty() {
        let labels: Vec<&str> = hidden.iter().map(|column| column.label()).collect();
        lines.push(format!("  hidden: {}", labels.join(", ")));
    }
    lines.push(String::new());
    lines.push("Available columns".to_owned());
    for (index, column) in OptionalColumn::ALL.iter().enumerate() {
        let mark = if columns.is_visible(*column) { "x" } else { " " };
        let descriptor = column.descriptor();
        lines.push(format!(
            "  {}. [{mark}] {} - {}",
            index + 1,
            descriptor.label,
            descriptor.description
        ));
    }
    lines.push(String::new());
    lines.push("1-3 toggle | r reset | esc close".to_owned());
    lines.join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
