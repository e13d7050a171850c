//! Optimistic-update state for one entity collection.
//!
//! Every optimistic change returns a [`Ticket`]. The caller settles it with
//! [`EntitySlice::confirm`] once the server answers, or with
//! [`EntitySlice::rollback`] to restore the previous rows.

use chrono::Utc;
use storedash_core::Entity;
use storedash_core::query::Pagination;

use crate::client::{EntityApi, ListQuery, Page};
use crate::error::{ClientError, ClientResult};

/// Progress of the last list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Handle for one unsettled optimistic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "an optimistic change must be confirmed or rolled back"]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
enum Change<E: Entity> {
    Add { temp_id: E::Id },
    Update { previous: E },
    Delete { index: usize, previous: E },
}

impl<E: Entity> Change<E> {
    fn failure_message(&self) -> String {
        let verb = match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        };
        format!(
            "Failed to {verb} {}",
            E::COLLECTION.entity_name().to_lowercase()
        )
    }
}

/// Loaded rows plus the bookkeeping for unsettled changes.
#[derive(Debug, Clone)]
pub struct EntitySlice<E: Entity> {
    items: Vec<E>,
    status: LoadStatus,
    error: Option<String>,
    operation_error: Option<String>,
    pagination: Option<Pagination>,
    pending: Vec<(Ticket, Change<E>)>,
    next_ticket: u64,
    next_temp_id: i32,
}

impl<E: Entity> Default for EntitySlice<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
            operation_error: None,
            pagination: None,
            pending: Vec::new(),
            next_ticket: 0,
            next_temp_id: -1,
        }
    }
}

impl<E: Entity> EntitySlice<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Friendly message from the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Friendly message from the last rolled-back change.
    #[must_use]
    pub fn operation_error(&self) -> Option<&str> {
        self.operation_error.as_deref()
    }

    pub fn clear_operation_error(&mut self) {
        self.operation_error = None;
    }

    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.items.iter().find(|row| row.id() == id)
    }

    /// Number of unsettled tickets.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    /// Store the result of a list request.
    pub fn finish_load(&mut self, result: Result<Page<E>, &ClientError>) {
        match result {
            Ok(page) => {
                self.items = page.items;
                self.pagination = Some(page.pagination);
                self.status = LoadStatus::Succeeded;
            }
            Err(err) => {
                self.status = LoadStatus::Failed;
                self.error = Some(err.friendly_message(&format!(
                    "Failed to load {}",
                    E::COLLECTION.as_str()
                )));
            }
        }
    }

    /// Put a pending row at the front of the list.
    ///
    /// The row is built with the entity's own defaults and validation under
    /// a negative temporary id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the draft is rejected; the list is unchanged.
    pub fn optimistic_add(&mut self, draft: E::Create) -> ClientResult<Ticket> {
        let temp_id = E::Id::from(self.next_temp_id);
        let row = E::from_create(temp_id, draft, Utc::now())?;
        self.next_temp_id -= 1;
        self.items.insert(0, row);
        Ok(self.track(Change::Add { temp_id }))
    }

    /// Merge a partial update into the loaded row.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` for an unknown id or `Validation` if the merged
    /// row is invalid; the list is unchanged either way.
    pub fn optimistic_update(&mut self, id: E::Id, patch: E::Patch) -> ClientResult<Ticket> {
        let slot = self
            .items
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| ClientError::NotLoaded(id.into()))?;
        let mut updated = slot.clone();
        updated.apply_patch(patch, Utc::now())?;
        let previous = std::mem::replace(slot, updated);
        Ok(self.track(Change::Update { previous }))
    }

    /// Drop the loaded row.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` for an unknown id.
    pub fn optimistic_delete(&mut self, id: E::Id) -> ClientResult<Ticket> {
        let index = self.position(id)?;
        let previous = self.items.remove(index);
        Ok(self.track(Change::Delete { index, previous }))
    }

    /// Settle a ticket with the server's row.
    ///
    /// Adds and updates swap the local row for `server`; deletes ignore it.
    /// Returns `false` for an unknown or already settled ticket.
    pub fn confirm(&mut self, ticket: Ticket, server: Option<E>) -> bool {
        let Some(change) = self.take(ticket) else {
            return false;
        };
        let local_id = match &change {
            Change::Add { temp_id } => Some(*temp_id),
            Change::Update { previous } => Some(previous.id()),
            Change::Delete { .. } => None,
        };
        if let (Some(local_id), Some(row)) = (local_id, server) {
            match self.items.iter_mut().find(|r| r.id() == local_id) {
                Some(slot) => *slot = row,
                None => self.items.insert(0, row),
            }
        }
        true
    }

    /// Undo a ticket's change and record the friendly error.
    ///
    /// Returns `false` for an unknown or already settled ticket.
    pub fn rollback(&mut self, ticket: Ticket, error: &ClientError) -> bool {
        let Some(change) = self.take(ticket) else {
            return false;
        };
        self.operation_error = Some(error.friendly_message(&change.failure_message()));
        match change {
            Change::Add { temp_id } => self.items.retain(|row| row.id() != temp_id),
            Change::Update { previous } => {
                let id = previous.id();
                if let Some(row) = self.items.iter_mut().find(|row| row.id() == id) {
                    *row = previous;
                }
            }
            Change::Delete { index, previous } => {
                let index = index.min(self.items.len());
                self.items.insert(index, previous);
            }
        }
        true
    }

    fn position(&self, id: E::Id) -> ClientResult<usize> {
        self.items
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(|| ClientError::NotLoaded(id.into()))
    }

    fn track(&mut self, change: Change<E>) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.operation_error = None;
        self.pending.push((ticket, change));
        ticket
    }

    fn take(&mut self, ticket: Ticket) -> Option<Change<E>> {
        let index = self.pending.iter().position(|(t, _)| *t == ticket)?;
        Some(self.pending.remove(index).1)
    }
}

/// An [`EntitySlice`] kept in step with the server.
///
/// Each call applies the change locally, sends the request, then confirms or
/// rolls back.
#[derive(Debug, Clone)]
pub struct SliceSync<E: Entity> {
    api: EntityApi<E>,
    slice: EntitySlice<E>,
}

impl<E: Entity> SliceSync<E> {
    #[must_use]
    pub fn new(api: EntityApi<E>) -> Self {
        Self {
            api,
            slice: EntitySlice::new(),
        }
    }

    #[must_use]
    pub const fn slice(&self) -> &EntitySlice<E> {
        &self.slice
    }

    pub const fn slice_mut(&mut self) -> &mut EntitySlice<E> {
        &mut self.slice
    }

    /// Replace the rows with one page from the server.
    ///
    /// # Errors
    ///
    /// Returns the request error; the slice records it as `error`.
    pub async fn load(&mut self, query: &ListQuery) -> ClientResult<()> {
        self.slice.begin_load();
        match self.api.list(query).await {
            Ok(page) => {
                self.slice.finish_load(Ok(page));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(collection = %E::COLLECTION, error = %err, "List load failed");
                self.slice.finish_load(Err(&err));
                Err(err)
            }
        }
    }

    /// Create a record, showing it immediately.
    ///
    /// # Errors
    ///
    /// Returns local validation errors or the request error.
    pub async fn add(&mut self, draft: E::Create) -> ClientResult<E> {
        let ticket = self.slice.optimistic_add(draft.clone())?;
        let result = self.api.create(&draft).await;
        self.settle(ticket, result)
    }

    /// Update a loaded record, showing the merge immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded`, local validation errors or the request error.
    pub async fn update(&mut self, id: E::Id, patch: E::Patch) -> ClientResult<E> {
        let ticket = self.slice.optimistic_update(id, patch.clone())?;
        let result = self.api.update(id, &patch).await;
        self.settle(ticket, result)
    }

    /// Delete a loaded record, hiding it immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` or the request error.
    pub async fn remove(&mut self, id: E::Id) -> ClientResult<()> {
        let ticket = self.slice.optimistic_delete(id)?;
        match self.api.delete(id).await {
            Ok(()) => {
                self.slice.confirm(ticket, None);
                Ok(())
            }
            Err(err) => {
                self.slice.rollback(ticket, &err);
                Err(err)
            }
        }
    }

    fn settle(&mut self, ticket: Ticket, result: ClientResult<E>) -> ClientResult<E> {
        match result {
            Ok(row) => {
                self.slice.confirm(ticket, Some(row.clone()));
                Ok(row)
            }
            Err(err) => {
                tracing::warn!(collection = %E::COLLECTION, error = %err, "Change rolled back");
                self.slice.rollback(ticket, &err);
                Err(err)
            }
        }
    }
}
