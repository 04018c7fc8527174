//! The interaction surface the controller renders into

use serde::Serialize;
use crate::record::Record;

/// Transient status messages shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A refresh found no records
    EmptyStore,
    Added { record: Record },
    Updated { id: i64 },
    Deleted { id: i64 },
    /// An update or delete targeted an id with no row
    NotFound { id: i64 },
    Selected { record: Record },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::EmptyStore => "No data to show".to_string(),
            Notice::Added { record } => format!("User added: {}", record.label()),
            Notice::Updated { id } => format!("User {} updated", id),
            Notice::Deleted { id } => format!("User {} deleted", id),
            Notice::NotFound { id } => format!("No user with id {}", id),
            Notice::Selected { record } => format!("Selected item: {}", record.label()),
        }
    }

    /// Whether the notice reports something the user should look at
    pub fn is_warning(&self) -> bool {
        matches!(self, Notice::EmptyStore | Notice::NotFound { .. })
    }
}

/// Receives everything the controller wants shown.
///
/// Implementations render, they never call back into the controller.
pub trait Surface {
    /// Replace the displayed list with a fresh snapshot
    fn render(&mut self, records: &[Record], selection: Option<i64>);

    /// Show a transient status message
    fn notify(&mut self, notice: Notice);

    /// Set the contents of the editable name field
    fn populate_field(&mut self, name: &str);
}

/// Surface that collects everything it receives. Useful for scripting and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub renders: Vec<Vec<Record>>,
    pub notices: Vec<Notice>,
    pub field: String,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_render(&self) -> Option<&[Record]> {
        self.renders.last().map(Vec::as_slice)
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Surface for RecordingSurface {
    fn render(&mut self, records: &[Record], _selection: Option<i64>) {
        self.renders.push(records.to_vec());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn populate_field(&mut self, name: &str) {
        self.field = name.to_string();
    }
}
