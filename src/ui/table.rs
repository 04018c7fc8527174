use tabled::{settings::Style, Table, Tabled};
use crate::record::Record;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Id")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "")]
    pub marker: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Render records with their list positions; the selected id gets a marker
pub fn records_table(records: &[Record], selected: Option<i64>) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .enumerate()
        .map(|(index, record)| RecordRow {
            index,
            id: record.id,
            name: record.name.clone(),
            marker: if selected == Some(record.id) { "*".to_string() } else { String::new() },
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_table_marks_selection() {
        let records = vec![Record::new(1, "Mostapha"), Record::new(2, "Amine")];
        let table = records_table(&records, Some(2));
        assert!(table.contains("Mostapha"));
        assert!(table.contains("Amine"));
        assert!(table.contains('*'));
        assert!(!records_table(&records, None).contains('*'));
    }

    #[test]
    fn test_empty_tables() {
        assert!(records_table(&[], None).is_empty());
        assert!(TableBuilder::new().build().is_empty());
    }
}
