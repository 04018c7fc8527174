use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Suppress transient notices (USERSDB_QUIET=1). Record listings still print.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("USERSDB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How the binary prints results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print one JSON object per line: `{"ok": true, "kind": ..., "data": ...}`
pub fn emit_json(kind: &str, data: serde_json::Value) -> serde_json::Result<()> {
    let line = serde_json::json!({ "ok": true, "kind": kind, "data": data });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

pub fn emit_json_error(message: &str) {
    let line = serde_json::json!({ "ok": false, "error": message });
    println!("{}", line);
}
