pub mod icons;
pub mod output;
pub mod surface;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, dim, error, success};
pub use surface::TerminalSurface;
pub use table::{records_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
