use owo_colors::OwoColorize;
use crate::output::{emit_json, is_quiet, OutputMode};
use crate::record::Record;
use crate::sync::{Notice, Surface};
use crate::ui::{dim, records_table, theme, Icons};

/// Surface that prints to the terminal, either styled or as JSON lines.
pub struct TerminalSurface {
    mode: OutputMode,
    render_enabled: bool,
}

impl TerminalSurface {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            render_enabled: true,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Skip list output, e.g. while loading a snapshot only to select from it
    pub fn set_render_enabled(&mut self, enabled: bool) {
        self.render_enabled = enabled;
    }

    pub fn is_render_enabled(&self) -> bool {
        self.render_enabled
    }
}

impl Surface for TerminalSurface {
    fn render(&mut self, records: &[Record], selection: Option<i64>) {
        if !self.render_enabled {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if !records.is_empty() {
                    println!("{}", records_table(records, selection));
                }
            }
            OutputMode::Json => {
                let data = serde_json::json!({ "records": records, "selection": selection });
                if let Err(e) = emit_json("records", data) {
                    tracing::error!("Failed to encode records: {}", e);
                }
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        if is_quiet() {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                let icon = match &notice {
                    Notice::EmptyStore => Icons::EMPTY,
                    Notice::Added { .. } => Icons::NEW,
                    Notice::Updated { .. } => Icons::MOD,
                    Notice::Deleted { .. } => Icons::DEL,
                    Notice::NotFound { .. } => Icons::WARN,
                    Notice::Selected { .. } => Icons::POINTER,
                };
                let style = if notice.is_warning() { &theme().warn } else { &theme().success };
                println!("{} {}", icon, notice.message().style(style.clone()));
            }
            OutputMode::Json => {
                let data = serde_json::to_value(&notice).unwrap_or(serde_json::Value::Null);
                if let Err(e) = emit_json("notice", data) {
                    tracing::error!("Failed to encode notice: {}", e);
                }
            }
        }
    }

    /// The terminal has no editable field; show the name as an editing hint
    fn populate_field(&mut self, name: &str) {
        if name.is_empty() || is_quiet() || !self.mode.is_human() {
            return;
        }
        println!("  {} {}", dim("editing:"), name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_toggle() {
        let mut surface = TerminalSurface::new(OutputMode::Json);
        assert!(surface.is_render_enabled());

        surface.set_render_enabled(false);
        surface.render(&[Record::new(1, "Mostapha")], Some(1));
        assert!(!surface.is_render_enabled());

        surface.set_render_enabled(true);
        assert!(surface.is_render_enabled());
    }

    #[test]
    fn test_populate_field_keeps_no_state() {
        let mut surface = TerminalSurface::new(OutputMode::Json);
        surface.populate_field("Mostapha");
        surface.populate_field("");
        assert_eq!(surface.mode(), OutputMode::Json);
    }
}
