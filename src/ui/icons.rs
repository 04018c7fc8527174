pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const NEW: &str = "✨";
    pub const MOD: &str = "📝";
    pub const DEL: &str = "🗑️";
    pub const POINTER: &str = "👉";
    pub const EMPTY: &str = "∅";
}
