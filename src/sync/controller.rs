//! List synchronization and selection tracking
//!
//! The controller owns the ordered snapshot shown by the surface and the
//! currently selected record id. Every intent runs to completion: validate,
//! call the store, then re-read the store so the snapshot matches it.

use crate::record::{Record, WriteOutcome};
use crate::storage::RecordStore;
use crate::{Error, Result};
use super::surface::{Notice, Surface};

/// Id used when delete is submitted with nothing selected.
///
/// AUTOINCREMENT ids start at 1, so this never matches a row.
pub const UNSET_SELECTION: i64 = 0;

/// Selection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selected(i64),
}

pub struct ListSyncController<S: Surface> {
    store: RecordStore,
    surface: S,
    snapshot: Vec<Record>,
    selection: Option<i64>,
}

impl<S: Surface> ListSyncController<S> {
    /// Create a controller with an empty snapshot. Call `refresh` to load it.
    pub fn new(store: RecordStore, surface: S) -> Self {
        Self {
            store,
            surface,
            snapshot: Vec::new(),
            selection: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.snapshot
    }

    pub fn selection(&self) -> Option<i64> {
        self.selection
    }

    pub fn state(&self) -> SelectionState {
        match self.selection {
            Some(id) => SelectionState::Selected(id),
            None => SelectionState::Idle,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Re-read every record from the store and re-render.
    ///
    /// An empty result is reported to the surface; the selection is kept.
    pub fn refresh(&mut self) -> Result<&[Record]> {
        self.snapshot = self.store.read_all()?;
        if self.snapshot.is_empty() {
            self.surface.notify(Notice::EmptyStore);
        }
        self.surface.render(&self.snapshot, self.selection);
        Ok(self.snapshot.as_slice())
    }

    /// Select the record at `index` in the current snapshot
    pub fn on_item_selected(&mut self, index: usize) -> Result<Record> {
        let record = self
            .snapshot
            .get(index)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.snapshot.len(),
            })?;

        self.selection = Some(record.id);
        self.surface.notify(Notice::Selected { record: record.clone() });
        self.surface.populate_field(&record.name);
        Ok(record)
    }

    pub fn on_submit_create(&mut self, name: &str) -> Result<Record> {
        validate_name(name)?;

        let record = self.store.create(name)?;
        self.surface.notify(Notice::Added { record: record.clone() });
        self.surface.populate_field("");
        self.refresh()?;
        Ok(record)
    }

    /// Rename the selected record. Selection is left as is.
    pub fn on_submit_update(&mut self, name: &str) -> Result<WriteOutcome> {
        let id = self.selection.ok_or(Error::NoSelection)?;
        validate_name(name)?;

        let outcome = self.store.update(id, name)?;
        self.surface.notify(match outcome {
            WriteOutcome::Applied => Notice::Updated { id },
            WriteOutcome::NotFound => Notice::NotFound { id },
        });
        self.surface.populate_field("");
        self.refresh()?;
        Ok(outcome)
    }

    /// Delete the selected record and return to `Idle`.
    pub fn on_submit_delete(&mut self) -> Result<WriteOutcome> {
        let id = match self.selection {
            Some(id) => id,
            None => {
                tracing::warn!("Delete submitted with no selection");
                UNSET_SELECTION
            }
        };

        let outcome = self.store.delete(id)?;
        self.selection = None;
        self.surface.notify(match outcome {
            WriteOutcome::Applied => Notice::Deleted { id },
            WriteOutcome::NotFound => Notice::NotFound { id },
        });
        self.surface.populate_field("");
        self.refresh()?;
        Ok(outcome)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("Please enter a name".to_string()));
    }
    Ok(())
}
