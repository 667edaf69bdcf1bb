// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use anyhow::{Result, bail};

use crate::{
    ColumnVisibility, DEFAULT_PAGE_SIZE, DebounceTicket, Debouncer, EditableField, ListPage,
    ListQuery, LoadTicket, Location, MedicationDraft, MedicationId, MedicationRecord,
    OptionalColumn, PageItem, build_pagination_range, clamp_page, total_pages,
};

pub const FETCH_ERROR_MESSAGE: &str = "Unable to load medication orders. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading(LoadTicket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub query: ListQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(ListPage),
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    LoadPage {
        page: i64,
        search: String,
    },
    Reload,
    LoadFinished {
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
    ToggleRowSelection(MedicationId),
    ToggleAllRows,
    StartEditing,
    StartCellEdit {
        id: MedicationId,
        field: EditableField,
    },
    ChangeField {
        id: MedicationId,
        field: EditableField,
        value: String,
    },
    StopCellEdit {
        id: MedicationId,
        field: EditableField,
    },
    CancelFieldEdit {
        id: MedicationId,
        field: EditableField,
    },
    CommitFieldEdit {
        id: MedicationId,
        field: EditableField,
    },
    SaveChanges,
    DismissEdits,
    ToggleExpand(MedicationId),
    SetSearchInput(String),
    SearchTimerFired(u64),
    CommitSearch,
    GoToPage(i64),
    Navigate(Location),
    ToggleColumn(OptionalColumn),
    ResetColumns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FetchRequested(LoadRequest),
    FetchCancelled(LoadTicket),
    PageLoaded { page: u32, rows: usize, total: u64 },
    LoadFailed(String),
    SelectionChanged(usize),
    EditModeChanged(bool),
    DraftChanged(MedicationId),
    CellEditChanged {
        id: MedicationId,
        field: EditableField,
        live: bool,
    },
    ChangesSaved { rows: Vec<MedicationId> },
    EditsDismissed,
    ExpansionChanged { id: MedicationId, expanded: bool },
    SearchScheduled(DebounceTicket),
    LocationChanged(Location),
    ColumnsChanged(Vec<OptionalColumn>),
}

/// Client-side state for one paginated, searchable medication table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    records: Vec<MedicationRecord>,
    total_count: u64,
    page_size: u32,
    page: u32,
    search_query: String,
    search_input: String,
    status: LoadStatus,
    error: Option<String>,
    selected: BTreeSet<MedicationId>,
    drafts: BTreeMap<MedicationId, MedicationDraft>,
    editing_cells: BTreeMap<MedicationId, BTreeSet<EditableField>>,
    expanded: BTreeSet<MedicationId>,
    editing: bool,
    last_ticket: LoadTicket,
    /// Location of the last completed load, restored when the current
    /// load is cancelled.
    shown: Location,
    search_debounce: Debouncer,
    columns: ColumnVisibility,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, ColumnVisibility::default())
    }
}

impl TableState {
    pub fn new(page_size: u32, columns: ColumnVisibility) -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            page_size: page_size.max(1),
            page: 1,
            search_query: String::new(),
            search_input: String::new(),
            status: LoadStatus::Idle,
            error: None,
            selected: BTreeSet::new(),
            drafts: BTreeMap::new(),
            editing_cells: BTreeMap::new(),
            expanded: BTreeSet::new(),
            editing: false,
            last_ticket: LoadTicket::new(0),
            shown: Location::default(),
            search_debounce: Debouncer::default(),
            columns,
        }
    }

    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search_debounce = Debouncer::new(quiet);
        self
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::LoadPage { page, search } => {
                self.search_debounce.cancel();
                self.page = clamp_page(page, u32::MAX);
                self.search_input = search.clone();
                self.search_query = search;
                self.begin_load()
            }
            TableCommand::Reload => self.begin_load(),
            TableCommand::LoadFinished { ticket, outcome } => self.finish_load(ticket, outcome),
            TableCommand::SetSearchInput(raw) => {
                self.search_input = raw;
                vec![TableEvent::SearchScheduled(self.search_debounce.trigger())]
            }
            TableCommand::SearchTimerFired(token) => {
                if self.search_debounce.fire(token) {
                    self.commit_search()
                } else {
                    Vec::new()
                }
            }
            TableCommand::CommitSearch => {
                self.search_debounce.cancel();
                self.commit_search()
            }
            TableCommand::GoToPage(page) => self.go_to_page(page),
            TableCommand::Navigate(location) => {
                self.search_debounce.cancel();
                self.page = location.page.max(1);
                self.search_input = location.search.clone();
                self.search_query = location.search;
                self.begin_load()
            }
            TableCommand::ToggleColumn(column) => {
                self.columns.toggle(column);
                vec![TableEvent::ColumnsChanged(self.columns.visible())]
            }
            TableCommand::ResetColumns => {
                self.columns.reset();
                vec![TableEvent::ColumnsChanged(self.columns.visible())]
            }
            command if self.is_loading() => {
                log::debug!("ignoring {command:?} while a page is loading");
                Vec::new()
            }
            TableCommand::ToggleRowSelection(id) => self.toggle_row_selection(id),
            TableCommand::ToggleAllRows => self.toggle_all_rows(),
            TableCommand::StartEditing => self.start_editing(),
            TableCommand::StartCellEdit { id, field } => self.start_cell_edit(id, field),
            TableCommand::ChangeField { id, field, value } => self.change_field(id, field, value),
            TableCommand::StopCellEdit { id, field }
            | TableCommand::CommitFieldEdit { id, field } => self.stop_cell_edit(id, field),
            TableCommand::CancelFieldEdit { id, field } => self.cancel_field_edit(id, field),
            TableCommand::SaveChanges => self.save_changes(),
            TableCommand::DismissEdits => self.dismiss_edits(),
            TableCommand::ToggleExpand(id) => self.toggle_expand(id),
        }
    }

    pub fn records(&self) -> &[MedicationRecord] {
        &self.records
    }

    pub fn record(&self, id: MedicationId) -> Option<&MedicationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    pub fn pagination_items(&self) -> Vec<PageItem> {
        build_pagination_range(i64::from(self.page), self.total_pages())
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_selected(&self, id: MedicationId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_selected(&self) -> bool {
        !self.records.is_empty() && self.selected.len() == self.records.len()
    }

    /// Some rows, but not every row, are selected.
    pub fn indeterminate(&self) -> bool {
        !self.selected.is_empty() && self.selected.len() < self.records.len()
    }

    pub fn selection_label(&self) -> Option<String> {
        match self.selected.len() {
            0 => None,
            1 => Some("1 item selected".to_owned()),
            count => Some(format!("{count} items selected")),
        }
    }

    pub fn draft(&self, id: MedicationId) -> Option<&MedicationDraft> {
        self.drafts.get(&id)
    }

    pub fn is_cell_live(&self, id: MedicationId, field: EditableField) -> bool {
        self.editing_cells
            .get(&id)
            .is_some_and(|fields| fields.contains(&field))
    }

    pub fn is_expanded(&self, id: MedicationId) -> bool {
        self.expanded.contains(&id)
    }

    pub const fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn location(&self) -> Location {
        Location::new(self.page, self.search_query.clone())
    }

    /// Value rendered for a cell: the draft while the row is being edited,
    /// the committed record otherwise.
    pub fn effective_value(&self, id: MedicationId, field: EditableField) -> Option<&str> {
        if self.editing && self.selected.contains(&id) {
            if let Some(draft) = self.drafts.get(&id) {
                return Some(draft.field(field));
            }
        }
        self.record(id).map(|record| record.field(field))
    }

    pub fn check_invariants(&self) -> Result<()> {
        if self.page < 1 {
            bail!("page {} is below 1", self.page);
        }
        let loaded: BTreeSet<MedicationId> = self.records.iter().map(|record| record.id).collect();
        if loaded.len() != self.records.len() {
            bail!("loaded page contains duplicate record ids");
        }
        if let Some(id) = self.selected.iter().find(|id| !loaded.contains(id)) {
            bail!("selected id {id} is not on the loaded page");
        }
        if let Some(id) = self.expanded.iter().find(|id| !loaded.contains(id)) {
            bail!("expanded id {id} is not on the loaded page");
        }
        if !self.is_loading() && self.page > self.total_pages() {
            bail!(
                "page {} is past the last page {} while idle",
                self.page,
                self.total_pages()
            );
        }
        if self.editing && self.selected.is_empty() {
            bail!("edit mode is active with an empty selection");
        }
        if !self.editing && !(self.drafts.is_empty() && self.editing_cells.is_empty()) {
            bail!("drafts or live cells remain outside edit mode");
        }
        if let Some(id) = self.drafts.keys().find(|id| !self.selected.contains(id)) {
            bail!("draft for {id} exists but the row is not selected");
        }
        for (id, fields) in &self.editing_cells {
            if fields.is_empty() {
                bail!("empty live-cell entry for {id} was not pruned");
            }
            if !self.drafts.contains_key(id) {
                bail!("live cell for {id} has no draft");
            }
        }
        Ok(())
    }

    fn begin_load(&mut self) -> Vec<TableEvent> {
        let mut events = Vec::new();
        if let LoadStatus::Loading(previous) = self.status {
            events.push(TableEvent::FetchCancelled(previous));
        }

        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.status = LoadStatus::Loading(ticket);
        self.error = None;

        let query = ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search_query.clone(),
        };
        log::debug!(
            "load {} requested: page={} search={:?}",
            ticket.get(),
            query.page,
            query.search
        );
        events.push(TableEvent::FetchRequested(LoadRequest { ticket, query }));
        events
    }

    fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> Vec<TableEvent> {
        if self.status != LoadStatus::Loading(ticket) {
            log::debug!("discarding result of stale load {}", ticket.get());
            return Vec::new();
        }
        self.status = LoadStatus::Idle;

        match outcome {
            LoadOutcome::Cancelled => {
                log::debug!("load {} was cancelled", ticket.get());
                if self.location() == self.shown {
                    return Vec::new();
                }
                self.page = self.shown.page;
                self.search_input = self.shown.search.clone();
                self.search_query = self.shown.search.clone();
                vec![TableEvent::LocationChanged(self.location())]
            }
            LoadOutcome::Loaded(page) => {
                self.records = page.data;
                self.total_count = page.total;
                self.reset_row_state();
                let last_page = self.total_pages();
                if self.page > last_page {
                    log::debug!(
                        "page {} is past the last page {last_page}, loading that instead",
                        self.page
                    );
                    self.page = last_page;
                    let mut events = vec![TableEvent::LocationChanged(self.location())];
                    events.extend(self.begin_load());
                    return events;
                }
                self.shown = self.location();
                vec![TableEvent::PageLoaded {
                    page: self.page,
                    rows: self.records.len(),
                    total: self.total_count,
                }]
            }
            LoadOutcome::Failed(reason) => {
                log::warn!("load {} failed: {reason}", ticket.get());
                self.records.clear();
                self.total_count = 0;
                self.reset_row_state();
                self.error = Some(FETCH_ERROR_MESSAGE.to_owned());
                let mut events = vec![TableEvent::LoadFailed(reason)];
                if self.page != 1 {
                    self.page = 1;
                    events.push(TableEvent::LocationChanged(self.location()));
                }
                self.shown = self.location();
                events
            }
        }
    }

    fn reset_row_state(&mut self) {
        self.selected.clear();
        self.drafts.clear();
        self.editing_cells.clear();
        self.expanded.clear();
        self.editing = false;
    }

    fn commit_search(&mut self) -> Vec<TableEvent> {
        if self.search_input == self.search_query {
            return Vec::new();
        }
        self.search_query = self.search_input.clone();
        self.page = 1;
        let mut events = vec![TableEvent::LocationChanged(self.location())];
        events.extend(self.begin_load());
        events
    }

    fn go_to_page(&mut self, page: i64) -> Vec<TableEvent> {
        let target = clamp_page(page, self.total_pages());
        if target == self.page {
            return Vec::new();
        }
        self.page = target;
        let mut events = vec![TableEvent::LocationChanged(self.location())];
        events.extend(self.begin_load());
        events
    }

    fn toggle_row_selection(&mut self, id: MedicationId) -> Vec<TableEvent> {
        if self.record(id).is_none() {
            return Vec::new();
        }

        if self.selected.remove(&id) {
            self.drafts.remove(&id);
            self.editing_cells.remove(&id);
        } else {
            self.selected.insert(id);
            if self.editing {
                self.seed_draft(id);
            }
        }

        let mut events = vec![TableEvent::SelectionChanged(self.selected.len())];
        if self.selected.is_empty() && self.editing {
            self.exit_edit_mode();
            events.push(TableEvent::EditModeChanged(false));
        }
        events
    }

    fn toggle_all_rows(&mut self) -> Vec<TableEvent> {
        if self.records.is_empty() {
            return Vec::new();
        }

        if self.all_selected() {
            self.selected.clear();
            let mut events = vec![TableEvent::SelectionChanged(0)];
            if self.editing {
                events.push(TableEvent::EditModeChanged(false));
            }
            self.exit_edit_mode();
            return events;
        }

        let ids: Vec<MedicationId> = self.records.iter().map(|record| record.id).collect();
        for id in ids {
            if self.selected.insert(id) && self.editing {
                self.seed_draft(id);
            }
        }
        vec![TableEvent::SelectionChanged(self.selected.len())]
    }

    fn start_editing(&mut self) -> Vec<TableEvent> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        self.drafts.clear();
        self.editing_cells.clear();
        let ids: Vec<MedicationId> = self.selected.iter().copied().collect();
        for id in ids {
            self.seed_draft(id);
        }
        self.editing = true;
        vec![TableEvent::EditModeChanged(true)]
    }

    fn start_cell_edit(&mut self, id: MedicationId, field: EditableField) -> Vec<TableEvent> {
        if !self.can_edit_row(id) {
            return Vec::new();
        }
        self.ensure_draft(id);
        self.editing_cells.entry(id).or_default().insert(field);
        vec![TableEvent::CellEditChanged {
            id,
            field,
            live: true,
        }]
    }

    fn change_field(
        &mut self,
        id: MedicationId,
        field: EditableField,
        value: String,
    ) -> Vec<TableEvent> {
        if !self.can_edit_row(id) {
            return Vec::new();
        }
        self.ensure_draft(id);
        match self.drafts.get_mut(&id) {
            Some(draft) => {
                draft.set_field(field, value);
                vec![TableEvent::DraftChanged(id)]
            }
            None => Vec::new(),
        }
    }

    fn stop_cell_edit(&mut self, id: MedicationId, field: EditableField) -> Vec<TableEvent> {
        let Some(fields) = self.editing_cells.get_mut(&id) else {
            return Vec::new();
        };
        let removed = fields.remove(&field);
        if fields.is_empty() {
            self.editing_cells.remove(&id);
        }
        if !removed {
            return Vec::new();
        }
        vec![TableEvent::CellEditChanged {
            id,
            field,
            live: false,
        }]
    }

    fn cancel_field_edit(&mut self, id: MedicationId, field: EditableField) -> Vec<TableEvent> {
        let mut events = Vec::new();
        if let (Some(draft), Some(record)) = (
            self.drafts.get_mut(&id),
            self.records.iter().find(|record| record.id == id),
        ) {
            draft.revert_field(field, record);
            events.push(TableEvent::DraftChanged(id));
        }
        events.extend(self.stop_cell_edit(id, field));
        events
    }

    fn save_changes(&mut self) -> Vec<TableEvent> {
        if self.drafts.is_empty() {
            if !self.editing {
                return Vec::new();
            }
            self.exit_edit_mode();
            return vec![TableEvent::EditModeChanged(false)];
        }

        let drafts = std::mem::take(&mut self.drafts);
        let mut saved = Vec::with_capacity(drafts.len());
        for record in &mut self.records {
            if let Some(draft) = drafts.get(&record.id) {
                log::debug!(
                    "row {} changed fields: {:?}",
                    record.id,
                    draft.changed_fields(record)
                );
                draft.apply_to(record);
                saved.push(record.id);
            }
        }
        self.exit_edit_mode();
        log::info!("saved edits for {} row(s)", saved.len());
        vec![
            TableEvent::EditModeChanged(false),
            TableEvent::ChangesSaved { rows: saved },
        ]
    }

    fn dismiss_edits(&mut self) -> Vec<TableEvent> {
        let had_edits = self.editing || !self.drafts.is_empty();
        self.exit_edit_mode();
        if !had_edits {
            return Vec::new();
        }
        vec![TableEvent::EditModeChanged(false), TableEvent::EditsDismissed]
    }

    fn toggle_expand(&mut self, id: MedicationId) -> Vec<TableEvent> {
        if self.record(id).is_none() {
            return Vec::new();
        }
        let expanded = if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        };
        vec![TableEvent::ExpansionChanged { id, expanded }]
    }

    fn can_edit_row(&self, id: MedicationId) -> bool {
        self.editing && self.selected.contains(&id)
    }

    fn seed_draft(&mut self, id: MedicationId) {
        if let Some(record) = self.records.iter().find(|record| record.id == id) {
            self.drafts.insert(id, MedicationDraft::from_record(record));
        }
    }

    fn ensure_draft(&mut self, id: MedicationId) {
        if !self.drafts.contains_key(&id) {
            self.seed_draft(id);
        }
    }

    fn exit_edit_mode(&mut self) {
        self.editing = false;
        self.drafts.clear();
        self.editing_cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FETCH_ERROR_MESSAGE, LoadOutcome, LoadRequest, LoadStatus, TableCommand, TableEvent,
        TableState,
    };
    use crate::{
        ColumnVisibility, EditableField, ListPage, ListQuery, LoadTicket, Location, MedicationId,
        MedicationRecord, OptionalColumn, PageItem,
    };
    use anyhow::Result;

    fn record(id: i64) -> MedicationRecord {
        MedicationRecord {
            id: MedicationId::new(id),
            name: format!("Medication {id}"),
            dosage: "20mg · Vial".to_owned(),
            frequency: "Once a day (OD)".to_owned(),
            duration: "5 days · Oral".to_owned(),
            instructions: "Take after meals".to_owned(),
            date: "22-10-2021".to_owned(),
            doctor: "Dr. Kumar Shah".to_owned(),
            contact: "+1 (555) 204-1212".to_owned(),
            notes: String::new(),
            patient: None,
            color: String::new(),
        }
    }

    fn page_of(ids: &[i64], total: u64) -> ListPage {
        ListPage {
            data: ids.iter().copied().map(record).collect(),
            total,
            page: 1,
            page_size: 20,
            total_pages: 0,
        }
    }

    fn id(value: i64) -> MedicationId {
        MedicationId::new(value)
    }

    /// Dispatches and checks every structural invariant afterwards.
    fn apply(state: &mut TableState, command: TableCommand) -> Result<Vec<TableEvent>> {
        let events = state.dispatch(command);
        state.check_invariants()?;
        Ok(events)
    }

    fn requested_ticket(events: &[TableEvent]) -> Option<LoadTicket> {
        events.iter().find_map(|event| match event {
            TableEvent::FetchRequested(LoadRequest { ticket, .. }) => Some(*ticket),
            _ => None,
        })
    }

    fn loaded_state(ids: &[i64], total: u64) -> Result<TableState> {
        let mut state = TableState::default();
        let events = apply(&mut state, TableCommand::Reload)?;
        let ticket = requested_ticket(&events).ok_or_else(|| anyhow::anyhow!("no fetch"))?;
        apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded(page_of(ids, total)),
            },
        )?;
        Ok(state)
    }

    fn select(state: &mut TableState, ids: &[i64]) -> Result<()> {
        for value in ids {
            apply(state, TableCommand::ToggleRowSelection(id(*value)))?;
        }
        Ok(())
    }

    #[test]
    fn load_requests_current_page_and_search() -> Result<()> {
        let mut state = TableState::default();
        let events = apply(
            &mut state,
            TableCommand::LoadPage {
                page: 3,
                search: "ibu".to_owned(),
            },
        )?;

        assert!(state.is_loading());
        assert_eq!(
            events,
            vec![TableEvent::FetchRequested(LoadRequest {
                ticket: LoadTicket::new(1),
                query: ListQuery {
                    page: 3,
                    page_size: 20,
                    search: "ibu".to_owned(),
                },
            })]
        );
        Ok(())
    }

    #[test]
    fn successful_load_replaces_records() -> Result<()> {
        let state = loaded_state(&[1, 2, 3], 45)?;
        assert_eq!(state.records().len(), 3);
        assert_eq!(state.total_count(), 45);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.status(), LoadStatus::Idle);
        assert!(state.error().is_none());
        Ok(())
    }

    #[test]
    fn second_load_supersedes_the_first() -> Result<()> {
        let mut state = TableState::default();
        let first = requested_ticket(&apply(&mut state, TableCommand::Reload)?)
            .ok_or_else(|| anyhow::anyhow!("no first fetch"))?;
        let second_events = apply(&mut state, TableCommand::GoToPage(1))?;
        assert!(second_events.is_empty(), "same page is a no-op");

        let second_events = apply(
            &mut state,
            TableCommand::LoadPage {
                page: 1,
                search: "para".to_owned(),
            },
        )?;
        assert_eq!(second_events.first(), Some(&TableEvent::FetchCancelled(first)));
        let second = requested_ticket(&second_events)
            .ok_or_else(|| anyhow::anyhow!("no second fetch"))?;

        let stale = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket: first,
                outcome: LoadOutcome::Loaded(page_of(&[1, 2], 2)),
            },
        )?;
        assert!(stale.is_empty());
        assert!(state.records().is_empty());
        assert!(state.is_loading());

        apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket: second,
                outcome: LoadOutcome::Loaded(page_of(&[9], 1)),
            },
        )?;
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].id, id(9));
        Ok(())
    }

    #[test]
    fn failure_resets_rows_and_sets_message() -> Result<()> {
        let mut state = loaded_state(&[1, 2, 3], 3)?;
        select(&mut state, &[1, 2])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(&mut state, TableCommand::ToggleExpand(id(3)))?;

        let ticket = requested_ticket(&apply(&mut state, TableCommand::Reload)?)
            .ok_or_else(|| anyhow::anyhow!("no fetch"))?;
        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Failed("connection refused".to_owned()),
            },
        )?;

        assert_eq!(
            events,
            vec![TableEvent::LoadFailed("connection refused".to_owned())]
        );
        assert!(state.records().is_empty());
        assert_eq!(state.total_count(), 0);
        assert_eq!(state.selection_count(), 0);
        assert!(!state.is_editing());
        assert!(!state.is_expanded(id(3)));
        assert_eq!(state.error(), Some(FETCH_ERROR_MESSAGE));
        Ok(())
    }

    #[test]
    fn cancellation_is_not_a_failure() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        select(&mut state, &[1])?;
        let ticket = requested_ticket(&apply(&mut state, TableCommand::Reload)?)
            .ok_or_else(|| anyhow::anyhow!("no fetch"))?;

        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Cancelled,
            },
        )?;
        assert!(events.is_empty());
        assert!(state.error().is_none());
        assert_eq!(state.records().len(), 2);
        assert!(state.is_selected(id(1)));
        assert!(!state.is_loading());
        Ok(())
    }

    #[test]
    fn row_commands_are_ignored_while_loading() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        apply(&mut state, TableCommand::Reload)?;

        for command in [
            TableCommand::ToggleRowSelection(id(1)),
            TableCommand::ToggleAllRows,
            TableCommand::StartEditing,
            TableCommand::ToggleExpand(id(2)),
            TableCommand::SaveChanges,
            TableCommand::DismissEdits,
        ] {
            assert!(apply(&mut state, command)?.is_empty());
        }
        assert_eq!(state.selection_count(), 0);
        assert!(!state.is_expanded(id(2)));
        Ok(())
    }

    #[test]
    fn selecting_outside_edit_mode_creates_no_draft() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        let events = apply(&mut state, TableCommand::ToggleRowSelection(id(1)))?;
        assert_eq!(events, vec![TableEvent::SelectionChanged(1)]);
        assert!(state.draft(id(1)).is_none());
        Ok(())
    }

    #[test]
    fn selecting_in_edit_mode_seeds_draft_from_record() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        select(&mut state, &[2])?;

        let draft = state
            .draft(id(2))
            .ok_or_else(|| anyhow::anyhow!("draft missing"))?;
        for field in EditableField::ALL {
            assert_eq!(draft.field(field), state.records()[1].field(field));
        }
        Ok(())
    }

    #[test]
    fn toggling_unknown_row_is_a_no_op() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        assert!(apply(&mut state, TableCommand::ToggleRowSelection(id(42)))?.is_empty());
        assert!(apply(&mut state, TableCommand::ToggleExpand(id(42)))?.is_empty());
        assert_eq!(state.selection_count(), 0);
        Ok(())
    }

    #[test]
    fn deselecting_discards_draft_and_live_cells() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        select(&mut state, &[1, 2])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::StartCellEdit {
                id: id(1),
                field: EditableField::Name,
            },
        )?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(1),
                field: EditableField::Name,
                value: "Changed".to_owned(),
            },
        )?;

        apply(&mut state, TableCommand::ToggleRowSelection(id(1)))?;
        assert!(state.draft(id(1)).is_none());
        assert!(!state.is_cell_live(id(1), EditableField::Name));
        assert!(state.is_editing());
        Ok(())
    }

    #[test]
    fn emptying_selection_exits_edit_mode() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;

        let events = apply(&mut state, TableCommand::ToggleRowSelection(id(1)))?;
        assert_eq!(
            events,
            vec![
                TableEvent::SelectionChanged(0),
                TableEvent::EditModeChanged(false),
            ]
        );
        assert!(!state.is_editing());
        Ok(())
    }

    #[test]
    fn toggle_all_selects_then_clears() -> Result<()> {
        let mut state = loaded_state(&[1, 2, 3], 3)?;
        select(&mut state, &[2])?;
        assert!(state.indeterminate());

        apply(&mut state, TableCommand::StartEditing)?;
        apply(&mut state, TableCommand::ToggleAllRows)?;
        assert!(state.all_selected());
        assert!(state.draft(id(1)).is_some());
        assert!(state.draft(id(3)).is_some());

        apply(&mut state, TableCommand::ToggleAllRows)?;
        assert_eq!(state.selection_count(), 0);
        assert!(!state.is_editing());
        assert!(state.draft(id(2)).is_none());
        Ok(())
    }

    #[test]
    fn toggle_all_on_empty_page_is_a_no_op() -> Result<()> {
        let mut state = loaded_state(&[], 0)?;
        assert!(apply(&mut state, TableCommand::ToggleAllRows)?.is_empty());
        assert!(!state.all_selected());
        Ok(())
    }

    #[test]
    fn start_editing_requires_selection() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        assert!(apply(&mut state, TableCommand::StartEditing)?.is_empty());
        assert!(!state.is_editing());
        Ok(())
    }

    #[test]
    fn cell_edits_require_edit_mode_and_selection() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        select(&mut state, &[1])?;

        let outside = apply(
            &mut state,
            TableCommand::StartCellEdit {
                id: id(1),
                field: EditableField::Dosage,
            },
        )?;
        assert!(outside.is_empty());

        apply(&mut state, TableCommand::StartEditing)?;
        let unselected = apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(2),
                field: EditableField::Dosage,
                value: "5mg".to_owned(),
            },
        )?;
        assert!(unselected.is_empty());
        assert!(state.draft(id(2)).is_none());
        Ok(())
    }

    #[test]
    fn effective_value_prefers_draft_only_while_editing() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(1),
                field: EditableField::Frequency,
                value: "Twice a day (BID)".to_owned(),
            },
        )?;

        assert_eq!(
            state.effective_value(id(1), EditableField::Frequency),
            Some("Twice a day (BID)")
        );
        assert_eq!(state.records()[0].frequency, "Once a day (OD)");

        apply(&mut state, TableCommand::DismissEdits)?;
        assert_eq!(
            state.effective_value(id(1), EditableField::Frequency),
            Some("Once a day (OD)")
        );
        Ok(())
    }

    #[test]
    fn cancel_field_edit_reverts_and_stops_cell() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        for command in [
            TableCommand::StartCellEdit {
                id: id(1),
                field: EditableField::Name,
            },
            TableCommand::StartCellEdit {
                id: id(1),
                field: EditableField::Duration,
            },
            TableCommand::ChangeField {
                id: id(1),
                field: EditableField::Name,
                value: "Typo".to_owned(),
            },
        ] {
            apply(&mut state, command)?;
        }

        apply(
            &mut state,
            TableCommand::CancelFieldEdit {
                id: id(1),
                field: EditableField::Name,
            },
        )?;
        assert_eq!(
            state.effective_value(id(1), EditableField::Name),
            Some("Medication 1")
        );
        assert!(!state.is_cell_live(id(1), EditableField::Name));
        assert!(state.is_cell_live(id(1), EditableField::Duration));
        Ok(())
    }

    #[test]
    fn commit_field_edit_keeps_typed_value() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::StartCellEdit {
                id: id(1),
                field: EditableField::Instructions,
            },
        )?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(1),
                field: EditableField::Instructions,
                value: "Before bed".to_owned(),
            },
        )?;
        let events = apply(
            &mut state,
            TableCommand::CommitFieldEdit {
                id: id(1),
                field: EditableField::Instructions,
            },
        )?;

        assert_eq!(
            events,
            vec![TableEvent::CellEditChanged {
                id: id(1),
                field: EditableField::Instructions,
                live: false,
            }]
        );
        assert_eq!(
            state.effective_value(id(1), EditableField::Instructions),
            Some("Before bed")
        );
        Ok(())
    }

    #[test]
    fn save_overwrites_drafted_records() -> Result<()> {
        let mut state = loaded_state(&[1, 2, 3], 3)?;
        select(&mut state, &[1, 3])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(3),
                field: EditableField::Dosage,
                value: "40mg · Tablets".to_owned(),
            },
        )?;

        let events = apply(&mut state, TableCommand::SaveChanges)?;
        assert_eq!(
            events,
            vec![
                TableEvent::EditModeChanged(false),
                TableEvent::ChangesSaved {
                    rows: vec![id(1), id(3)],
                },
            ]
        );
        assert_eq!(state.records()[2].dosage, "40mg · Tablets");
        assert_eq!(state.records()[0].name, "Medication 1");
        assert!(!state.is_editing());
        assert!(state.draft(id(3)).is_none());
        assert!(state.is_selected(id(1)), "save keeps the selection");
        Ok(())
    }

    #[test]
    fn save_without_drafts_only_exits_edit_mode() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        assert!(apply(&mut state, TableCommand::SaveChanges)?.is_empty());
        Ok(())
    }

    #[test]
    fn dismiss_never_alters_records() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        let before = state.records().to_vec();
        select(&mut state, &[1, 2])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(2),
                field: EditableField::Name,
                value: "Edited".to_owned(),
            },
        )?;

        let events = apply(&mut state, TableCommand::DismissEdits)?;
        assert_eq!(
            events,
            vec![TableEvent::EditModeChanged(false), TableEvent::EditsDismissed]
        );
        assert_eq!(state.records(), before.as_slice());
        assert_eq!(state.selection_count(), 2);
        Ok(())
    }

    #[test]
    fn expansion_is_independent_of_selection() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        apply(&mut state, TableCommand::ToggleExpand(id(1)))?;
        apply(&mut state, TableCommand::ToggleExpand(id(2)))?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(&mut state, TableCommand::DismissEdits)?;

        assert!(state.is_expanded(id(1)));
        assert!(state.is_expanded(id(2)));

        let events = apply(&mut state, TableCommand::ToggleExpand(id(1)))?;
        assert_eq!(
            events,
            vec![TableEvent::ExpansionChanged {
                id: id(1),
                expanded: false,
            }]
        );
        Ok(())
    }

    #[test]
    fn search_commits_only_for_latest_timer() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        let mut tokens = Vec::new();
        for raw in ["i", "ib", "ibu"] {
            for event in apply(&mut state, TableCommand::SetSearchInput(raw.to_owned()))? {
                if let TableEvent::SearchScheduled(ticket) = event {
                    tokens.push(ticket.token);
                }
            }
        }
        assert_eq!(state.search_input(), "ibu");
        assert_eq!(state.search_query(), "");

        assert!(apply(&mut state, TableCommand::SearchTimerFired(tokens[0]))?.is_empty());
        let events = apply(&mut state, TableCommand::SearchTimerFired(tokens[2]))?;
        assert_eq!(
            events.first(),
            Some(&TableEvent::LocationChanged(Location::new(1, "ibu")))
        );
        assert_eq!(state.search_query(), "ibu");
        assert!(state.is_loading());
        Ok(())
    }

    #[test]
    fn commit_search_resets_page_and_skips_unchanged_term() -> Result<()> {
        let mut state = loaded_state(&[1], 100)?;
        apply(&mut state, TableCommand::GoToPage(3))?;
        let ticket = match state.status() {
            LoadStatus::Loading(ticket) => ticket,
            LoadStatus::Idle => anyhow::bail!("expected a load"),
        };
        apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded(page_of(&[41], 100)),
            },
        )?;

        assert!(apply(&mut state, TableCommand::CommitSearch)?.is_empty());

        apply(&mut state, TableCommand::SetSearchInput("kumar".to_owned()))?;
        apply(&mut state, TableCommand::CommitSearch)?;
        assert_eq!(state.page(), 1);
        assert_eq!(state.location().query_string(), "search=kumar");
        Ok(())
    }

    #[test]
    fn go_to_page_clamps_and_reports_location() -> Result<()> {
        let mut state = loaded_state(&[1], 100)?;
        let events = apply(&mut state, TableCommand::GoToPage(99))?;
        assert_eq!(
            events.first(),
            Some(&TableEvent::LocationChanged(Location::new(5, "")))
        );
        assert_eq!(state.page(), 5);
        assert_eq!(
            state.pagination_items(),
            vec![
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Page(3),
                PageItem::Page(4),
                PageItem::Page(5),
            ]
        );
        Ok(())
    }

    #[test]
    fn navigate_restores_location_without_reporting_it() -> Result<()> {
        let mut state = TableState::default();
        let events = apply(
            &mut state,
            TableCommand::Navigate(Location::parse("?page=2&search=para")),
        )?;

        assert!(
            !events
                .iter()
                .any(|event| matches!(event, TableEvent::LocationChanged(_)))
        );
        assert_eq!(state.page(), 2);
        assert_eq!(state.search_input(), "para");
        assert_eq!(state.search_query(), "para");
        assert!(state.is_loading());
        Ok(())
    }

    #[test]
    fn column_commands_work_during_loading() -> Result<()> {
        let mut state = TableState::new(
            10,
            ColumnVisibility::with_defaults(&[OptionalColumn::Notes]),
        );
        apply(&mut state, TableCommand::Reload)?;

        let events = apply(&mut state, TableCommand::ToggleColumn(OptionalColumn::Contact))?;
        assert_eq!(
            events,
            vec![TableEvent::ColumnsChanged(vec![
                OptionalColumn::Contact,
                OptionalColumn::Notes,
            ])]
        );

        apply(&mut state, TableCommand::ResetColumns)?;
        assert_eq!(state.columns().visible(), vec![OptionalColumn::Notes]);
        Ok(())
    }

    fn current_ticket(state: &TableState) -> Result<LoadTicket> {
        match state.status() {
            LoadStatus::Loading(ticket) => Ok(ticket),
            LoadStatus::Idle => anyhow::bail!("expected a load"),
        }
    }

    #[test]
    fn load_page_keeps_search_input_in_step() -> Result<()> {
        let mut state = loaded_state(&[1], 1)?;
        let pending = apply(&mut state, TableCommand::SetSearchInput("ibu".to_owned()))?;
        let token = match pending.first() {
            Some(TableEvent::SearchScheduled(ticket)) => ticket.token,
            other => anyhow::bail!("expected a scheduled search, got {other:?}"),
        };

        apply(
            &mut state,
            TableCommand::LoadPage {
                page: 2,
                search: "para".to_owned(),
            },
        )?;
        assert_eq!(state.search_input(), "para");
        let ticket = current_ticket(&state)?;
        apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded(page_of(&[21], 100)),
            },
        )?;

        assert!(apply(&mut state, TableCommand::SearchTimerFired(token))?.is_empty());
        assert!(apply(&mut state, TableCommand::CommitSearch)?.is_empty());
        assert_eq!(state.search_query(), "para");
        assert_eq!(state.page(), 2);
        assert_eq!(state.location().query_string(), "page=2&search=para");
        Ok(())
    }

    #[test]
    fn failed_load_returns_to_first_page() -> Result<()> {
        let mut state = loaded_state(&[1], 100)?;
        apply(&mut state, TableCommand::GoToPage(4))?;
        let ticket = current_ticket(&state)?;

        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Failed("timed out".to_owned()),
            },
        )?;
        assert_eq!(
            events,
            vec![
                TableEvent::LoadFailed("timed out".to_owned()),
                TableEvent::LocationChanged(Location::new(1, "")),
            ]
        );
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 1);
        assert!(apply(&mut state, TableCommand::GoToPage(2))?.is_empty());
        Ok(())
    }

    #[test]
    fn page_past_the_end_reloads_last_page() -> Result<()> {
        let mut state = TableState::default();
        apply(&mut state, TableCommand::Navigate(Location::parse("?page=9")))?;
        let ticket = current_ticket(&state)?;

        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Loaded(page_of(&[], 45)),
            },
        )?;
        assert_eq!(
            events.first(),
            Some(&TableEvent::LocationChanged(Location::new(3, "")))
        );
        let retry = events
            .iter()
            .find_map(|event| match event {
                TableEvent::FetchRequested(request) => Some(request.clone()),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("no fetch for the last page"))?;
        assert_eq!(retry.query.page, 3);
        assert!(state.is_loading());

        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket: retry.ticket,
                outcome: LoadOutcome::Loaded(page_of(&[41, 42, 43, 44, 45], 45)),
            },
        )?;
        assert_eq!(
            events,
            vec![TableEvent::PageLoaded {
                page: 3,
                rows: 5,
                total: 45,
            }]
        );
        Ok(())
    }

    #[test]
    fn cancelling_current_load_restores_shown_location() -> Result<()> {
        let mut state = loaded_state(&[1], 100)?;
        apply(&mut state, TableCommand::GoToPage(3))?;
        assert_eq!(state.page(), 3);
        let ticket = current_ticket(&state)?;

        let events = apply(
            &mut state,
            TableCommand::LoadFinished {
                ticket,
                outcome: LoadOutcome::Cancelled,
            },
        )?;
        assert_eq!(
            events,
            vec![TableEvent::LocationChanged(Location::new(1, ""))]
        );
        assert_eq!(state.page(), 1);
        assert_eq!(state.records().len(), 1);
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        Ok(())
    }

    #[test]
    fn select_all_in_edit_mode_keeps_existing_drafts() -> Result<()> {
        let mut state = loaded_state(&[1, 2, 3], 3)?;
        select(&mut state, &[1])?;
        apply(&mut state, TableCommand::StartEditing)?;
        apply(
            &mut state,
            TableCommand::ChangeField {
                id: id(1),
                field: EditableField::Name,
                value: "Edited".to_owned(),
            },
        )?;

        apply(&mut state, TableCommand::ToggleAllRows)?;
        assert!(state.all_selected());
        let kept = state
            .draft(id(1))
            .ok_or_else(|| anyhow::anyhow!("draft for row 1 missing"))?;
        assert_eq!(kept.field(EditableField::Name), "Edited");

        let seeded = state
            .draft(id(2))
            .ok_or_else(|| anyhow::anyhow!("draft for row 2 missing"))?;
        for field in EditableField::ALL {
            assert_eq!(seeded.field(field), state.records()[1].field(field));
        }
        Ok(())
    }

    #[test]
    fn selection_label_pluralizes() -> Result<()> {
        let mut state = loaded_state(&[1, 2], 2)?;
        assert_eq!(state.selection_label(), None);
        select(&mut state, &[1])?;
        assert_eq!(state.selection_label().as_deref(), Some("1 item selected"));
        select(&mut state, &[2])?;
        assert_eq!(state.selection_label().as_deref(), Some("2 items selected"));
        Ok(())
    }
}
