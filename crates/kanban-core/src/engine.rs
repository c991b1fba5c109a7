//! The board engine: authoritative state, optimistic layers and the
//! operations the UI binds to.
//!
//! All local state changes happen inside short synchronous critical
//! sections. Remote calls are awaited with no lock held, so concurrent
//! gestures on one engine interleave only at those calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::drag::{DragPhase, DropLocation, LocalMove, apply_moves};
use crate::error::{KanbanError, Result};
use crate::filter::{TaskFilters, filter_tasks};
use crate::model::{IssueType, MutationOutcome, Priority, Status, StatusPatch, Task, TaskSize};
use crate::overlay::{PatchOverlay, PatchTicket, Resolution, effective_columns};
use crate::source::{StatusSource, TaskSource};

/// Everything a render pass needs, read in one consistent snapshot.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub board: Arc<Board>,
    pub columns: Vec<Status>,
    pub is_loading: bool,
    pub revision: u64,
}

/// Result of a task drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped where it started.
    NoOp,
    /// The remote update was applied.
    Moved,
    /// The remote update failed; the board was re-fetched.
    RolledBack,
}

#[derive(Default)]
struct EngineState {
    tasks: Vec<Task>,
    registry: Vec<Status>,
    overlay: PatchOverlay,
    filters: TaskFilters,
    moves: Vec<LocalMove>,
    in_flight_move: Option<u64>,
    next_move_generation: u64,
    drag: DragPhase,
    loading: usize,
    revision: u64,
    cache: Option<(u64, Arc<Board>)>,
}

impl EngineState {
    fn touch(&mut self) {
        self.revision += 1;
    }

    fn columns(&self) -> Vec<Status> {
        effective_columns(&self.registry, &self.overlay)
    }

    fn board(&mut self) -> Arc<Board> {
        if let Some((revision, board)) = &self.cache {
            if *revision == self.revision {
                return Arc::clone(board);
            }
        }

        let columns = self.columns();
        let filtered = filter_tasks(&self.tasks, &self.filters);
        let mut board = Board::project(&columns, &filtered);
        apply_moves(&mut board, &self.moves);
        debug!(
            revision = self.revision,
            columns = columns.len(),
            tasks = board.task_count(),
            moves = self.moves.len(),
            "board projected"
        );

        let board = Arc::new(board);
        self.cache = Some((self.revision, Arc::clone(&board)));
        board
    }

    /// Install a fresh task collection. Local moves are superseded, except
    /// the one whose update is still in flight.
    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        let keep = self.in_flight_move;
        self.moves.retain(|m| Some(m.generation) == keep);
        self.touch();
    }

    fn column_by_name(&self, name: &str) -> Option<Status> {
        self.columns().into_iter().find(|s| s.name == name)
    }
}

/// Decrements the loading counter when a refresh finishes or is dropped.
struct LoadingGuard<'a> {
    state: &'a Mutex<EngineState>,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a Mutex<EngineState>) -> Self {
        state.lock().unwrap_or_else(PoisonError::into_inner).loading += 1;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.loading = state.loading.saturating_sub(1);
    }
}

/// Column patches written locally whose remote calls have not settled.
///
/// Tickets still held when the gesture future is dropped are rolled back,
/// so an abandoned call never leaves a patch on screen.
struct PendingPatches<'a> {
    state: &'a Mutex<EngineState>,
    tickets: VecDeque<PatchTicket>,
}

impl<'a> PendingPatches<'a> {
    fn new(state: &'a Mutex<EngineState>, tickets: Vec<PatchTicket>) -> Self {
        Self {
            state,
            tickets: tickets.into(),
        }
    }

    fn front(&self) -> Option<&PatchTicket> {
        self.tickets.front()
    }

    fn pop(&mut self) -> Option<PatchTicket> {
        self.tickets.pop_front()
    }
}

impl Drop for PendingPatches<'_> {
    fn drop(&mut self) {
        if self.tickets.is_empty() {
            return;
        }
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;
        for ticket in self.tickets.drain(..) {
            let resolution = state
                .overlay
                .resolve(&ticket, false, &mut state.registry);
            warn!(
                status_id = %ticket.status_id,
                generation = ticket.generation,
                ?resolution,
                "column update abandoned; reverting"
            );
        }
        state.touch();
    }
}

/// A dropped task whose update is in flight.
///
/// If the gesture future is dropped before the reply, the local move is
/// discarded and the drag returns to `Idle`.
struct InFlightMove<'a> {
    state: &'a Mutex<EngineState>,
    task_id: String,
    generation: u64,
    armed: bool,
}

impl<'a> InFlightMove<'a> {
    fn new(state: &'a Mutex<EngineState>, task_id: &str, generation: u64) -> Self {
        Self {
            state,
            task_id: task_id.to_string(),
            generation,
            armed: true,
        }
    }

    /// The reply arrived; settlement is up to the caller.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightMove<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.drag.reset();
        if state.in_flight_move == Some(self.generation) {
            state.in_flight_move = None;
        }
        let generation = self.generation;
        state.moves.retain(|m| m.generation != generation);
        state.touch();
        warn!(task_id = %self.task_id, "task update abandoned; move discarded");
    }
}

/// Kanban board engine for one team.
///
/// Sources are injected; the engine owns only derived and optimistic
/// state. Methods take `&self` so gestures can run concurrently.
pub struct KanbanEngine {
    team_id: String,
    task_source: Arc<dyn TaskSource>,
    status_source: Arc<dyn StatusSource>,
    state: Mutex<EngineState>,
}

impl KanbanEngine {
    #[must_use]
    pub fn new(
        team_id: impl Into<String>,
        task_source: Arc<dyn TaskSource>,
        status_source: Arc<dyn StatusSource>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            task_source,
            status_source,
            state: Mutex::new(EngineState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load the status registry and the task collection.
    ///
    /// # Errors
    ///
    /// Returns the source error if either list request fails; local state is
    /// left untouched in that case.
    pub async fn refresh(&self) -> Result<()> {
        let _loading = LoadingGuard::new(&self.state);
        let statuses = self.status_source.list_statuses(&self.team_id).await?;
        let tasks = self.task_source.list_tasks(&self.team_id).await?;

        let mut state = self.state();
        info!(
            team = %self.team_id,
            statuses = statuses.len(),
            tasks = tasks.len(),
            "board refreshed"
        );
        state.registry = statuses;
        state.replace_tasks(tasks);
        Ok(())
    }

    /// Reload only the task collection.
    ///
    /// # Errors
    ///
    /// Returns the source error if the list request fails.
    pub async fn refresh_tasks(&self) -> Result<()> {
        let _loading = LoadingGuard::new(&self.state);
        let tasks = self.task_source.list_tasks(&self.team_id).await?;
        debug!(team = %self.team_id, tasks = tasks.len(), "tasks refreshed");
        self.state().replace_tasks(tasks);
        Ok(())
    }

    /// Accept a task collection pushed by the host (e.g. a server event).
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.state().replace_tasks(tasks);
    }

    /// Accept a status registry pushed by the host. Pending patches stay on top.
    pub fn set_statuses(&self, statuses: Vec<Status>) {
        let mut state = self.state();
        state.registry = statuses;
        state.touch();
    }

    /// Insert a newly created task at the top of a column.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` if no column has this name.
    pub fn add_task(&self, mut task: Task, column_name: &str) -> Result<()> {
        let mut state = self.state();
        let column = state
            .column_by_name(column_name)
            .ok_or_else(|| KanbanError::ColumnNotFound {
                name: column_name.to_string(),
            })?;
        task.assign_status(&column);
        state.tasks.retain(|t| t.id != task.id);
        state.tasks.insert(0, task);
        state.touch();
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading > 0
    }

    /// Increases whenever tasks, statuses, patches, filters or local moves change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state().revision
    }

    /// Effective columns (registry plus pending patches) in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<Status> {
        self.state().columns()
    }

    /// The projected board. Unchanged inputs return the same `Arc`.
    #[must_use]
    pub fn board(&self) -> Arc<Board> {
        self.state().board()
    }

    #[must_use]
    pub fn view(&self) -> BoardView {
        let mut state = self.state();
        BoardView {
            board: state.board(),
            columns: state.columns(),
            is_loading: state.loading > 0,
            revision: state.revision,
        }
    }

    /// The authoritative task collection, without filters or local moves.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<Status> {
        self.state().column_by_name(name)
    }

    #[must_use]
    pub fn is_column_collapsed(&self, name: &str) -> bool {
        self.column_by_name(name).is_some_and(|s| s.is_collapsed)
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.state().drag.clone()
    }

    // ========================================================================
    // Filters
    // ========================================================================

    #[must_use]
    pub fn filters(&self) -> TaskFilters {
        self.state().filters.clone()
    }

    /// Edit the filters in place; the revision moves only on a real change.
    pub fn update_filters(&self, edit: impl FnOnce(&mut TaskFilters)) {
        let mut state = self.state();
        let mut filters = state.filters.clone();
        edit(&mut filters);
        if filters != state.filters {
            state.filters = filters;
            state.touch();
        }
    }

    pub fn set_filters(&self, filters: TaskFilters) {
        self.update_filters(|f| *f = filters);
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_filters(|f| f.search_text = text);
    }

    pub fn set_priorities(&self, priorities: impl IntoIterator<Item = Priority>) {
        let priorities = priorities.into_iter().collect();
        self.update_filters(|f| f.priorities = priorities);
    }

    pub fn set_sizes(&self, sizes: impl IntoIterator<Item = TaskSize>) {
        let sizes = sizes.into_iter().collect();
        self.update_filters(|f| f.sizes = sizes);
    }

    pub fn set_labels(&self, labels: impl IntoIterator<Item = String>) {
        let labels = labels.into_iter().collect();
        self.update_filters(|f| f.labels = labels);
    }

    pub fn set_epic_ids(&self, epic_ids: impl IntoIterator<Item = String>) {
        let epic_ids = epic_ids.into_iter().collect();
        self.update_filters(|f| f.epic_ids = epic_ids);
    }

    pub fn set_issue_type(&self, issue_type: Option<IssueType>) {
        self.update_filters(|f| f.issue_type = issue_type);
    }

    pub fn set_employee_name(&self, name: Option<String>) {
        self.update_filters(|f| f.employee_name = name);
    }

    pub fn clear_filters(&self) {
        self.set_filters(TaskFilters::default());
    }

    // ========================================================================
    // Column mutations
    // ========================================================================

    /// Collapse or expand a column optimistically.
    pub async fn set_column_collapsed(&self, status_id: &str, collapsed: bool) -> Resolution {
        self.mutate_column(status_id, StatusPatch::collapsed(collapsed))
            .await
    }

    /// Move a column optimistically.
    pub async fn set_column_order(&self, status_id: &str, order: i32) -> Resolution {
        self.mutate_column(status_id, StatusPatch::order(order)).await
    }

    /// Collapse or expand a column by name.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` if no column has this name.
    pub async fn toggle_column(&self, name: &str, collapsed: bool) -> Result<Resolution> {
        let column = self
            .column_by_name(name)
            .ok_or_else(|| KanbanError::ColumnNotFound {
                name: name.to_string(),
            })?;
        Ok(self.set_column_collapsed(&column.id, collapsed).await)
    }

    /// Move a column to `index` among the effective columns.
    ///
    /// Every column whose position changes gets an order patch, so orders
    /// come out dense and distinct. All patches show before the first remote
    /// call. `None` when no column's order needs to change.
    ///
    /// # Errors
    ///
    /// Returns `StatusNotFound` if no column has this id.
    pub async fn reorder_status(&self, status_id: &str, index: usize) -> Result<Option<Resolution>> {
        let tickets = {
            let mut state = self.state();
            let mut columns = state.columns();
            let from = columns
                .iter()
                .position(|s| s.id == status_id)
                .ok_or_else(|| KanbanError::StatusNotFound {
                    id: status_id.to_string(),
                })?;
            let moved = columns.remove(from);
            let index = index.min(columns.len());
            columns.insert(index, moved);

            let tickets: Vec<PatchTicket> = columns
                .iter()
                .zip(0_i32..)
                .filter(|(status, order)| status.order != *order)
                .map(|(status, order)| state.overlay.write(&status.id, StatusPatch::order(order)))
                .collect();
            if tickets.is_empty() {
                return Ok(None);
            }
            state.touch();
            debug!(status_id, index, patches = tickets.len(), "columns reordered");
            tickets
        };
        Ok(self.send_patches(tickets).await)
    }

    /// Column header drop. `None` when the column is already at that index.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` if no column has this name.
    pub async fn on_column_drop(
        &self,
        name: &str,
        destination_index: usize,
    ) -> Result<Option<Resolution>> {
        let (status_id, current_index) = {
            let state = self.state();
            state
                .columns()
                .iter()
                .enumerate()
                .find(|(_, s)| s.name == name)
                .map(|(index, s)| (s.id.clone(), index))
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    name: name.to_string(),
                })?
        };
        if current_index == destination_index {
            return Ok(None);
        }
        self.reorder_status(&status_id, destination_index).await
    }

    async fn mutate_column(&self, status_id: &str, patch: StatusPatch) -> Resolution {
        let ticket = {
            let mut state = self.state();
            let ticket = state.overlay.write(status_id, patch);
            state.touch();
            ticket
        };
        self.send_patches(vec![ticket])
            .await
            .unwrap_or(Resolution::Superseded)
    }

    /// Send written patches one by one and settle each as its reply lands.
    ///
    /// Any rollback makes the whole gesture `RolledBack`; otherwise any
    /// commit makes it `Committed`.
    async fn send_patches(&self, tickets: Vec<PatchTicket>) -> Option<Resolution> {
        let mut pending = PendingPatches::new(&self.state, tickets);
        let mut combined = None;
        while let Some(ticket) = pending.front() {
            let result = self
                .status_source
                .update_status(&ticket.status_id, &ticket.patch)
                .await;
            let Some(ticket) = pending.pop() else {
                break;
            };
            let resolution = self.settle_column(&ticket, result);
            combined = Some(match (combined, resolution) {
                (Some(Resolution::RolledBack), _) | (_, Resolution::RolledBack) => {
                    Resolution::RolledBack
                }
                (Some(Resolution::Committed), _) | (_, Resolution::Committed) => {
                    Resolution::Committed
                }
                _ => Resolution::Superseded,
            });
        }
        combined
    }

    fn settle_column(&self, ticket: &PatchTicket, result: Result<MutationOutcome>) -> Resolution {
        let applied = match &result {
            Ok(outcome) if outcome.is_applied() => true,
            Ok(_) => {
                warn!(
                    status_id = %ticket.status_id,
                    "column update affected no records; reverting"
                );
                false
            }
            Err(e) => {
                warn!(
                    status_id = %ticket.status_id,
                    error = %e,
                    "column update failed; reverting"
                );
                false
            }
        };

        let mut state = self.state();
        let state = &mut *state;
        let resolution = state
            .overlay
            .resolve(ticket, applied, &mut state.registry);
        if resolution != Resolution::Superseded {
            state.touch();
        }
        debug!(
            status_id = %ticket.status_id,
            generation = ticket.generation,
            ?resolution,
            pending = state.overlay.len(),
            "column patch settled"
        );
        resolution
    }

    // ========================================================================
    // Task drag and drop
    // ========================================================================

    /// Start a visual drag of the task at `source`. Nothing changes yet.
    ///
    /// # Errors
    ///
    /// Returns `NoTaskAtPosition` if the position is empty, or
    /// `DragInProgress` if another gesture is active.
    pub fn start_drag(&self, source: DropLocation) -> Result<()> {
        let mut state = self.state();
        let task_id = task_at(&state.board(), &source)?;
        state.drag.begin(&task_id, source)
    }

    /// Abandon a drag that has not been dropped.
    pub fn cancel_drag(&self) {
        let mut state = self.state();
        if matches!(state.drag, DragPhase::Dragging { .. }) {
            state.drag.reset();
        }
    }

    /// Drop the task at `source` onto `destination`.
    ///
    /// The move shows on the very next read of the board. The task update is
    /// then sent; if it fails, the move is discarded and tasks are re-fetched.
    ///
    /// # Errors
    ///
    /// Gesture errors only: `NoTaskAtPosition`, `ColumnNotFound` or
    /// `DragInProgress`. Remote failures are reported as
    /// [`DropOutcome::RolledBack`].
    pub async fn on_drop(
        &self,
        source: DropLocation,
        destination: DropLocation,
    ) -> Result<DropOutcome> {
        let (task, generation) = {
            let mut state = self.state();

            if source == destination {
                if matches!(state.drag, DragPhase::Dragging { .. }) {
                    state.drag.reset();
                }
                return Ok(DropOutcome::NoOp);
            }

            let board = state.board();
            let task_id = task_at(&board, &source)?;
            let column = state.column_by_name(&destination.column).ok_or_else(|| {
                KanbanError::ColumnNotFound {
                    name: destination.column.clone(),
                }
            })?;

            // Where the task lands once the splice clamps the index.
            let same_column = source.column == destination.column;
            let destination_len = board.get(&destination.column).map_or(0, <[Task]>::len);
            let landing = if same_column {
                destination.index.min(destination_len.saturating_sub(1))
            } else {
                destination.index.min(destination_len)
            };
            if same_column && landing == source.index {
                if matches!(state.drag, DragPhase::Dragging { .. }) {
                    state.drag.reset();
                }
                return Ok(DropOutcome::NoOp);
            }
            let mut task = state
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .cloned()
                .ok_or_else(|| KanbanError::TaskNotFound {
                    id: task_id.clone(),
                })?;
            state.drag.drop_task(&task_id)?;

            state.next_move_generation += 1;
            let generation = state.next_move_generation;
            state.moves.push(LocalMove {
                task_id: task_id.clone(),
                destination: column.clone(),
                index: landing,
                generation,
            });
            state.in_flight_move = Some(generation);
            state.touch();

            debug!(
                task_id = %task_id,
                from = %source.column,
                to = %column.name,
                index = landing,
                "task dropped"
            );
            task.assign_status(&column);
            (task, generation)
        };

        let in_flight = InFlightMove::new(&self.state, &task.id, generation);
        let result = self.task_source.update_task(&task, &task.id).await;
        in_flight.disarm();
        let applied = matches!(&result, Ok(outcome) if outcome.is_applied());

        {
            let mut state = self.state();
            state.drag.reset();
            state.in_flight_move = None;
            if applied {
                if let Some(current) = state.tasks.iter_mut().find(|t| t.id == task.id) {
                    current.task_status_id.clone_from(&task.task_status_id);
                    current.status.clone_from(&task.status);
                }
            } else {
                state.moves.retain(|m| m.generation != generation);
            }
            state.touch();
        }

        if applied {
            return Ok(DropOutcome::Moved);
        }

        match result {
            Ok(_) => warn!(task_id = %task.id, "task update affected no records; re-fetching"),
            Err(e) => warn!(task_id = %task.id, error = %e, "task update failed; re-fetching"),
        }
        if let Err(e) = self.refresh_tasks().await {
            warn!(error = %e, "re-fetch after failed drop failed; showing last known tasks");
        }
        Ok(DropOutcome::RolledBack)
    }
}

fn task_at(board: &Board, location: &DropLocation) -> Result<String> {
    board
        .get(&location.column)
        .ok_or_else(|| KanbanError::ColumnNotFound {
            name: location.column.clone(),
        })?
        .get(location.index)
        .map(|t| t.id.clone())
        .ok_or_else(|| KanbanError::NoTaskAtPosition {
            column: location.column.clone(),
            index: location.index,
        })
}
