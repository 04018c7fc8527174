//! List synchronization - keeps an ordered, selectable view in step with the store

pub mod controller;
pub mod surface;

pub use controller::{ListSyncController, SelectionState, UNSET_SELECTION};
pub use surface::{Notice, RecordingSurface, Surface};
