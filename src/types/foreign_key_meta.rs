use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyMeta {
    pub columns: Vec<String>, // local, in key order
    pub ref_table: String,
    #[serde(default)]
    pub ref_columns: Vec<String>,
}

impl ForeignKeyMeta {
    pub fn new(column: impl Into<String>, ref_table: impl Into<String>) -> Self {
        Self {
            columns: vec![column.into()],
            ref_table: ref_table.into(),
            ref_columns: vec!["id".to_string()],
        }
    }

    /// Relationship accessors bind a single column; composite keys use the first one.
    pub fn local_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}
