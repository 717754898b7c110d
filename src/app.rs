use std::sync::mpsc::Sender;
use std::time::{Duration, SystemTime};

use ratatui::widgets::TableState;
use tracing::{debug, info, trace, warn};

use crate::api::{ApiCommand, ApiEvent};
use crate::model::{FilterForm, FilterFormField, FilterSpec, Flight, FlightField, FlightPatch, Units};

const STATUS_TTL: Duration = Duration::from_secs(5);

/// Remote data lifecycle. `Failed` is a real state with a message and a
/// retry key, not a stuck spinner.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetch<T> {
    Unloaded,
    Pending { seq: u64 },
    Loaded(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Fetch::Pending { .. })
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetch::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The detail view wins whenever a flight is selected, regardless of any
/// filter state on the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    List,
    Detail(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Edit,
    ConfirmDelete,
}

pub struct App {
    pub(crate) units: Units,
    pub(crate) view: View,
    pub(crate) input_mode: InputMode,

    // list controller
    pub(crate) filter: FilterSpec,
    pub(crate) flights: Fetch<Vec<Flight>>,
    pub(crate) table_state: TableState,
    list_seq: u64,

    // filter form
    pub(crate) filter_form: FilterForm,
    pub(crate) filter_cursor: usize,

    // detail controller
    pub(crate) flight: Fetch<Flight>,
    pub(crate) patch: FlightPatch,
    pub(crate) edit_mode: bool,
    pub(crate) field_cursor: usize,
    pub(crate) field_input: String,
    pub(crate) save_pending: bool,
    detail_seq: u64,
    mutation_seq: u64,

    pub(crate) status: Option<(String, SystemTime)>,
    cmd_tx: Sender<ApiCommand>,
}

impl App {
    pub fn new(units: Units, cmd_tx: Sender<ApiCommand>) -> Self {
        App {
            units,
            view: View::List,
            input_mode: InputMode::Normal,
            filter: FilterSpec::default(),
            flights: Fetch::Unloaded,
            table_state: TableState::default(),
            list_seq: 0,
            filter_form: FilterForm::default(),
            filter_cursor: 0,
            flight: Fetch::Unloaded,
            patch: FlightPatch::default(),
            edit_mode: false,
            field_cursor: 0,
            field_input: String::new(),
            save_pending: false,
            detail_seq: 0,
            mutation_seq: 0,
            status: None,
            cmd_tx,
        }
    }

    // ---- list controller ----

    /// Issues a fresh list fetch under a new sequence number, superseding
    /// any fetch still in flight.
    pub fn refresh_list(&mut self) {
        self.list_seq += 1;
        let seq = self.list_seq;
        self.flights = Fetch::Pending { seq };
        debug!("list fetch issued (seq {seq})");
        let sent = self.cmd_tx.send(ApiCommand::FetchList {
            seq,
            filter: self.filter.clone(),
        });
        if sent.is_err() {
            self.flights = Fetch::Failed("API worker is not running".to_string());
        }
    }

    pub fn open_filters(&mut self) {
        self.filter_cursor = 0;
        self.input_mode = InputMode::Filter;
    }

    pub fn cancel_filters(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Builds the filter spec from only the non-blank form fields and
    /// requeries. Invalid input leaves the old spec untouched.
    pub fn apply_filters(&mut self) {
        match FilterSpec::from_form(&self.filter_form) {
            Ok(spec) => {
                info!("filters applied: {} fields", spec.query_pairs().len());
                self.filter = spec;
                self.input_mode = InputMode::Normal;
                self.table_state.select(None);
                self.refresh_list();
            }
            Err(message) => {
                warn!("filter rejected: {message}");
                self.set_status(message);
            }
        }
    }

    pub fn filter_field(&self) -> FilterFormField {
        FilterFormField::ALL[self.filter_cursor.min(FilterFormField::ALL.len() - 1)]
    }

    pub fn next_filter_field(&mut self) {
        self.filter_cursor = (self.filter_cursor + 1) % FilterFormField::ALL.len();
    }

    pub fn previous_filter_field(&mut self) {
        self.filter_cursor = self
            .filter_cursor
            .checked_sub(1)
            .unwrap_or(FilterFormField::ALL.len() - 1);
    }

    pub fn push_filter_char(&mut self, ch: char) {
        let field = self.filter_field();
        self.filter_form.value_mut(field).push(ch);
    }

    pub fn backspace_filter(&mut self) {
        let field = self.filter_field();
        self.filter_form.value_mut(field).pop();
    }

    pub fn clear_filter_field(&mut self) {
        let field = self.filter_field();
        self.filter_form.value_mut(field).clear();
    }

    pub fn effective_limit(&self) -> u64 {
        self.filter.effective_limit()
    }

    pub fn next_row(&mut self) {
        let len = self.flights.loaded().map(Vec::len).unwrap_or(0);
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn previous_row(&mut self) {
        let len = self.flights.loaded().map(Vec::len).unwrap_or(0);
        if len == 0 {
            return;
        }
        let previous = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(previous));
    }

    pub fn selected_flight_id(&self) -> Option<i64> {
        let flights = self.flights.loaded()?;
        let index = self.table_state.selected()?;
        flights.get(index).map(|flight| flight.id)
    }

    /// Row activation: switch to the detail destination for that flight.
    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_flight_id() {
            self.open_detail(id);
        }
    }

    // ---- detail controller ----

    pub fn open_detail(&mut self, id: i64) {
        info!("opening flight {id}");
        self.view = View::Detail(id);
        self.input_mode = InputMode::Normal;
        self.patch = FlightPatch::default();
        self.edit_mode = false;
        self.field_cursor = 0;
        self.field_input.clear();
        self.save_pending = false;
        self.reload_detail(id);
    }

    fn reload_detail(&mut self, id: i64) {
        self.detail_seq += 1;
        let seq = self.detail_seq;
        self.flight = Fetch::Pending { seq };
        debug!("flight fetch issued (id {id}, seq {seq})");
        if self.cmd_tx.send(ApiCommand::FetchFlight { seq, id }).is_err() {
            self.flight = Fetch::Failed("API worker is not running".to_string());
        }
    }

    pub fn back_to_list(&mut self) {
        self.view = View::List;
        self.input_mode = InputMode::Normal;
        self.flight = Fetch::Unloaded;
        self.patch = FlightPatch::default();
        self.edit_mode = false;
        self.save_pending = false;
        self.refresh_list();
    }

    /// Flips edit mode only. Pending edits survive leaving edit mode.
    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        if self.edit_mode {
            self.input_mode = InputMode::Edit;
            self.field_cursor = 0;
            self.load_field_input();
        } else {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn edit_field(&self) -> FlightField {
        FlightField::ALL[self.field_cursor.min(FlightField::ALL.len() - 1)]
    }

    fn load_field_input(&mut self) {
        self.field_input = self.patch.staged(self.edit_field()).unwrap_or_default();
    }

    pub fn next_edit_field(&mut self) {
        self.field_cursor = (self.field_cursor + 1) % FlightField::ALL.len();
        self.load_field_input();
    }

    pub fn previous_edit_field(&mut self) {
        self.field_cursor = self
            .field_cursor
            .checked_sub(1)
            .unwrap_or(FlightField::ALL.len() - 1);
        self.load_field_input();
    }

    pub fn push_edit_char(&mut self, ch: char) {
        self.field_input.push(ch);
    }

    pub fn backspace_edit(&mut self) {
        self.field_input.pop();
    }

    pub fn clear_edit_input(&mut self) {
        self.field_input.clear();
    }

    /// Stages the input buffer for the selected field. Blank input removes
    /// the field from the patch.
    pub fn commit_field(&mut self) {
        let field = self.edit_field();
        let input = self.field_input.clone();
        match self.patch.set(field, &input) {
            Ok(()) => {
                trace!("staged {} ({} fields)", field.label(), self.patch.len());
            }
            Err(message) => {
                warn!("rejected {}: {message}", field.label());
                self.set_status(message);
            }
        }
    }

    pub fn can_save(&self) -> bool {
        !self.patch.is_empty() && !self.save_pending
    }

    /// Saving an empty patch is a no-op edit session: edit mode turns off
    /// and nothing is sent.
    pub fn save(&mut self) {
        let View::Detail(id) = self.view else {
            return;
        };
        if self.save_pending {
            return;
        }
        if self.patch.is_empty() {
            debug!("empty patch, closing edit mode");
            self.edit_mode = false;
            self.input_mode = InputMode::Normal;
            return;
        }

        self.mutation_seq += 1;
        let seq = self.mutation_seq;
        self.save_pending = true;
        info!("saving {} fields on flight {id} (seq {seq})", self.patch.len());
        self.set_status("Saving...".to_string());
        let _ = self.cmd_tx.send(ApiCommand::SavePatch {
            seq,
            id,
            patch: self.patch.clone(),
        });
    }

    /// First step of deletion: nothing is sent until confirmed.
    pub fn request_delete(&mut self) {
        if matches!(self.view, View::Detail(_)) {
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn confirm_delete(&mut self) {
        let View::Detail(id) = self.view else {
            return;
        };
        self.mutation_seq += 1;
        let seq = self.mutation_seq;
        self.input_mode = InputMode::Normal;
        info!("deleting flight {id} (seq {seq})");
        self.set_status("Deleting...".to_string());
        let _ = self.cmd_tx.send(ApiCommand::DeleteFlight { seq, id });
    }

    /// Manual retry for whichever view is failed (or stale).
    pub fn retry(&mut self) {
        match self.view {
            View::List => self.refresh_list(),
            View::Detail(id) => self.reload_detail(id),
        }
    }

    // ---- event application ----

    /// Applies a worker event. Events carrying a superseded sequence
    /// number are dropped so a late response can never overwrite newer
    /// state.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::List { seq, result } => {
                if seq != self.list_seq {
                    trace!("dropping stale list response (seq {seq} != {})", self.list_seq);
                    return;
                }
                match result {
                    Ok(flights) => {
                        debug!("list loaded: {} flights", flights.len());
                        if flights.is_empty() {
                            self.table_state.select(None);
                        } else {
                            let index = self
                                .table_state
                                .selected()
                                .map(|i| i.min(flights.len() - 1))
                                .unwrap_or(0);
                            self.table_state.select(Some(index));
                        }
                        self.flights = Fetch::Loaded(flights);
                    }
                    Err(message) => {
                        warn!("list fetch failed: {message}");
                        self.flights = Fetch::Failed(message);
                    }
                }
            }
            ApiEvent::Single { seq, result } => {
                if seq != self.detail_seq {
                    trace!(
                        "dropping stale flight response (seq {seq} != {})",
                        self.detail_seq
                    );
                    return;
                }
                match result {
                    Ok(flight) => {
                        debug!("flight {} loaded", flight.id);
                        self.flight = Fetch::Loaded(flight);
                    }
                    Err(message) => {
                        warn!("flight fetch failed: {message}");
                        self.flight = Fetch::Failed(message);
                    }
                }
            }
            ApiEvent::Saved { seq, id, result } => {
                // The save round-trip is over even when the response is
                // superseded; only the state update below is guarded.
                self.save_pending = false;
                if seq != self.mutation_seq {
                    trace!("dropping stale save response (seq {seq})");
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("flight {id} saved");
                        self.set_status("Saved".to_string());
                        self.patch = FlightPatch::default();
                        self.edit_mode = false;
                        if self.input_mode == InputMode::Edit {
                            self.input_mode = InputMode::Normal;
                        }
                        // Re-fetch server truth instead of merging locally.
                        if self.view == View::Detail(id) {
                            self.reload_detail(id);
                        }
                    }
                    Err(message) => {
                        warn!("save failed: {message}");
                        self.set_status(format!("Save failed: {message}"));
                    }
                }
            }
            ApiEvent::Fatal { message } => {
                warn!("api worker failed: {message}");
                self.save_pending = false;
                self.flights = Fetch::Failed(message.clone());
                if matches!(self.view, View::Detail(_)) {
                    self.flight = Fetch::Failed(message);
                }
            }
            ApiEvent::Deleted { seq, id, result } => {
                if seq != self.mutation_seq {
                    trace!("dropping stale delete response (seq {seq})");
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("flight {id} deleted");
                        self.set_status("Flight deleted".to_string());
                        if self.view == View::Detail(id) {
                            self.back_to_list();
                        }
                    }
                    Err(message) => {
                        warn!("delete failed: {message}");
                        self.set_status(format!("Delete failed: {message}"));
                    }
                }
            }
        }
    }

    // ---- status line ----

    pub fn set_status(&mut self, message: String) {
        self.status = Some((message, SystemTime::now()));
    }

    pub fn status_line(&self, now: SystemTime) -> Option<&str> {
        match &self.status {
            Some((message, at)) => {
                let age = now.duration_since(*at).unwrap_or(Duration::ZERO);
                if age <= STATUS_TTL {
                    Some(message.as_str())
                } else {
                    None
                }
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Fetch, InputMode, View};
    use crate::api::{ApiCommand, ApiEvent};
    use crate::model::{Flight, FlightField, SortKey, Units};
    use std::sync::mpsc::{channel, Receiver};
    use std::time::SystemTime;

    fn sample_flight(id: i64) -> Flight {
        Flight {
            id,
            date: Some("2024-05-17".to_string()),
            distance: Some(500),
            ..Flight::default()
        }
    }

    fn drain(rx: &Receiver<ApiCommand>) -> Vec<ApiCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn new_app() -> (App, Receiver<ApiCommand>) {
        let (tx, rx) = channel();
        (App::new(Units::Metric, tx), rx)
    }

    #[test]
    fn empty_save_sends_nothing_and_closes_edit_mode() {
        let (mut app, rx) = new_app();
        app.open_detail(7);
        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(7)),
        });
        drain(&rx);

        app.toggle_edit_mode();
        assert!(app.edit_mode);
        app.save();

        assert!(!app.edit_mode);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn save_sends_patch_and_success_reloads_from_server() {
        let (mut app, rx) = new_app();
        app.open_detail(7);
        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(7)),
        });
        drain(&rx);

        app.toggle_edit_mode();
        while app.edit_field() != FlightField::Seat {
            app.next_edit_field();
        }
        app.field_input = "aisle".to_string();
        app.commit_field();
        assert!(app.can_save());

        app.save();
        let commands = drain(&rx);
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            ApiCommand::SavePatch { id, patch, .. } => {
                assert_eq!(*id, 7);
                assert_eq!(patch.seat.as_deref(), Some("aisle"));
            }
            other => panic!("expected SavePatch, got {other:?}"),
        }

        // While pending, a second save is a no-op.
        app.save();
        assert!(drain(&rx).is_empty());

        app.apply_event(ApiEvent::Saved {
            seq: 1,
            id: 7,
            result: Ok(()),
        });
        assert!(app.patch.is_empty());
        assert!(!app.edit_mode);
        assert!(app.flight.is_pending());
        let commands = drain(&rx);
        assert!(matches!(commands[0], ApiCommand::FetchFlight { id: 7, .. }));
    }

    #[test]
    fn failed_save_keeps_patch_for_retry() {
        let (mut app, rx) = new_app();
        app.open_detail(3);
        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(3)),
        });
        app.toggle_edit_mode();
        while app.edit_field() != FlightField::Airline {
            app.next_edit_field();
        }
        app.field_input = "Delta".to_string();
        app.commit_field();
        app.save();
        drain(&rx);

        app.apply_event(ApiEvent::Saved {
            seq: 1,
            id: 3,
            result: Err("HTTP 500 Internal Server Error".to_string()),
        });
        assert!(!app.patch.is_empty());
        assert!(!app.save_pending);
        assert!(app
            .status_line(SystemTime::now())
            .unwrap()
            .contains("Save failed"));
    }

    #[test]
    fn delete_during_save_does_not_wedge_saving() {
        let (mut app, rx) = new_app();
        app.open_detail(5);
        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(5)),
        });
        app.toggle_edit_mode();
        while app.edit_field() != FlightField::Airline {
            app.next_edit_field();
        }
        app.field_input = "KLM".to_string();
        app.commit_field();
        app.save();
        app.toggle_edit_mode();

        // Deletion confirmed while the save response is still in flight.
        app.request_delete();
        app.confirm_delete();
        drain(&rx);

        // The late save response is superseded: its state update is
        // dropped, but the round-trip is over.
        app.apply_event(ApiEvent::Saved {
            seq: 1,
            id: 5,
            result: Ok(()),
        });
        assert!(!app.save_pending);
        assert!(!app.patch.is_empty());

        app.apply_event(ApiEvent::Deleted {
            seq: 2,
            id: 5,
            result: Err("HTTP 500 Internal Server Error".to_string()),
        });
        assert_eq!(app.view, View::Detail(5));
        assert!(app.can_save());
    }

    #[test]
    fn worker_failure_surfaces_without_a_sequence() {
        let (mut app, rx) = new_app();
        app.refresh_list();
        drain(&rx);
        app.apply_event(ApiEvent::Fatal {
            message: "Client error: bad tls".to_string(),
        });
        assert_eq!(app.flights.error(), Some("Client error: bad tls"));

        let (mut app, rx) = new_app();
        app.open_detail(3);
        drain(&rx);
        app.apply_event(ApiEvent::Fatal {
            message: "Client error: bad tls".to_string(),
        });
        assert_eq!(app.flight.error(), Some("Client error: bad tls"));
    }

    #[test]
    fn fetch_with_dead_worker_fails_instead_of_pending() {
        let (tx, rx) = channel();
        drop(rx);
        let mut app = App::new(Units::Metric, tx);
        app.refresh_list();
        assert!(app.flights.error().is_some());

        app.open_detail(1);
        assert!(app.flight.error().is_some());
    }

    #[test]
    fn stale_list_response_is_dropped() {
        let (mut app, rx) = new_app();
        app.refresh_list();
        app.refresh_list();
        drain(&rx);

        app.apply_event(ApiEvent::List {
            seq: 1,
            result: Ok(vec![sample_flight(1)]),
        });
        assert!(app.flights.is_pending());

        app.apply_event(ApiEvent::List {
            seq: 2,
            result: Ok(Vec::new()),
        });
        assert_eq!(app.flights.loaded().map(Vec::len), Some(0));
    }

    #[test]
    fn stale_detail_response_cannot_overwrite_newer_state() {
        let (mut app, rx) = new_app();
        app.open_detail(1);
        app.open_detail(2);
        drain(&rx);

        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(1)),
        });
        assert!(app.flight.is_pending());

        app.apply_event(ApiEvent::Single {
            seq: 2,
            result: Ok(sample_flight(2)),
        });
        assert_eq!(app.flight.loaded().map(|f| f.id), Some(2));
    }

    #[test]
    fn detail_view_wins_over_filter_state() {
        let (mut app, _rx) = new_app();
        app.filter_form.sort = "date".to_string();
        app.apply_filters();
        assert_eq!(app.filter.sort, Some(SortKey::Date));

        app.open_detail(42);
        assert_eq!(app.view, View::Detail(42));
        // The filter spec is untouched by the navigation.
        assert_eq!(app.filter.sort, Some(SortKey::Date));
    }

    #[test]
    fn delete_needs_confirmation() {
        let (mut app, rx) = new_app();
        app.open_detail(9);
        app.apply_event(ApiEvent::Single {
            seq: 1,
            result: Ok(sample_flight(9)),
        });
        drain(&rx);

        app.request_delete();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert!(drain(&rx).is_empty());

        app.cancel_delete();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(drain(&rx).is_empty());

        app.request_delete();
        app.confirm_delete();
        let commands = drain(&rx);
        assert!(matches!(commands[0], ApiCommand::DeleteFlight { id: 9, .. }));

        app.apply_event(ApiEvent::Deleted {
            seq: 1,
            id: 9,
            result: Ok(()),
        });
        assert_eq!(app.view, View::List);
        let commands = drain(&rx);
        assert!(matches!(commands[0], ApiCommand::FetchList { .. }));
    }

    #[test]
    fn leaving_edit_mode_keeps_pending_edits() {
        let (mut app, _rx) = new_app();
        app.open_detail(4);
        app.toggle_edit_mode();
        app.field_input = "2024-06-01".to_string();
        app.commit_field();
        assert_eq!(app.patch.len(), 1);

        app.toggle_edit_mode();
        assert!(!app.edit_mode);
        assert_eq!(app.patch.len(), 1);

        app.toggle_edit_mode();
        assert!(app.edit_mode);
        assert_eq!(app.field_input, "2024-06-01");
    }

    #[test]
    fn invalid_filter_leaves_spec_untouched() {
        let (mut app, rx) = new_app();
        app.filter_form.limit = "ten".to_string();
        app.apply_filters();
        assert_eq!(app.filter, crate::model::FilterSpec::default());
        assert!(drain(&rx).is_empty());
        assert!(app.status_line(SystemTime::now()).is_some());
    }

    #[test]
    fn apply_filters_requeries_with_spec() {
        let (mut app, rx) = new_app();
        app.filter_form.limit = "10".to_string();
        app.filter_form.sort = "distance".to_string();
        app.apply_filters();

        let commands = drain(&rx);
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            ApiCommand::FetchList { filter, .. } => {
                assert_eq!(filter.limit, Some(10));
                assert_eq!(filter.sort, Some(SortKey::Distance));
            }
            other => panic!("expected FetchList, got {other:?}"),
        }
        assert_eq!(app.effective_limit(), 10);
    }

    #[test]
    fn list_failure_is_a_distinct_state_and_retry_refetches() {
        let (mut app, rx) = new_app();
        app.refresh_list();
        drain(&rx);
        app.apply_event(ApiEvent::List {
            seq: 1,
            result: Err("HTTP 502 Bad Gateway".to_string()),
        });
        assert_eq!(app.flights.error(), Some("HTTP 502 Bad Gateway"));

        app.retry();
        assert!(app.flights.is_pending());
        let commands = drain(&rx);
        assert!(matches!(commands[0], ApiCommand::FetchList { .. }));
    }

    #[test]
    fn row_selection_and_activation() {
        let (mut app, _rx) = new_app();
        app.refresh_list();
        app.apply_event(ApiEvent::List {
            seq: 1,
            result: Ok(vec![sample_flight(1), sample_flight(2), sample_flight(3)]),
        });

        assert_eq!(app.selected_flight_id(), Some(1));
        app.next_row();
        app.next_row();
        assert_eq!(app.selected_flight_id(), Some(3));
        app.next_row();
        assert_eq!(app.selected_flight_id(), Some(1));
        app.previous_row();
        assert_eq!(app.selected_flight_id(), Some(3));

        app.open_selected();
        assert_eq!(app.view, View::Detail(3));
    }

    #[test]
    fn status_line_expires() {
        let (mut app, _rx) = new_app();
        app.set_status("hello".to_string());
        let now = SystemTime::now();
        assert_eq!(app.status_line(now), Some("hello"));
        let later = now + std::time::Duration::from_secs(30);
        assert_eq!(app.status_line(later), None);
    }

    #[test]
    fn fetch_accessors() {
        let fetch: Fetch<Vec<Flight>> = Fetch::Pending { seq: 1 };
        assert!(fetch.is_pending());
        assert!(fetch.loaded().is_none());
        assert!(fetch.error().is_none());

        let fetch: Fetch<Vec<Flight>> = Fetch::Failed("boom".to_string());
        assert_eq!(fetch.error(), Some("boom"));
    }
}
