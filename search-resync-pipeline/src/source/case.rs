//! Column name mapping.

use convert_case::{Case, Casing};
use search_resync_shared::SourceRow;

/// How column names are presented in extracted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnCase {
    /// `snake_case` columns become `camelCase` keys. Columns without an
    /// underscore are kept as they are.
    #[default]
    Camel,
    /// Column names are kept as the database reports them.
    Preserve,
}

impl ColumnCase {
    /// Rename the top-level keys of `row`. Values and key order are kept.
    pub fn apply(self, row: SourceRow) -> SourceRow {
        match self {
            Self::Preserve => row,
            Self::Camel => row
                .into_iter()
                .map(|(column, value)| (camel_case(column), value))
                .collect(),
        }
    }
}

fn camel_case(column: String) -> String {
    if column.contains('_') {
        column.from_case(Case::Snake).to_case(Case::Camel)
    } else {
        column
    }
}
