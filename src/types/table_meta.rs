use super::column_meta::ColumnMeta;
use super::foreign_key_meta::ForeignKeyMeta;
use crate::naming::derive_class_name;
use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyMeta>,
}

impl TableMeta {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnMeta>,
        foreign_keys: Vec<ForeignKeyMeta>,
    ) -> Self {
        let mut table = Self {
            name: name.into(),
            columns,
            foreign_keys,
        };
        table.mark_foreign_keys();
        table
    }

    /// CamelCase, singular.
    pub fn class_name(&self) -> String {
        derive_class_name(&self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnMeta> {
        self.columns.iter().find(|column| column.is_primary_key)
    }

    pub fn is_foreign_key_column(&self, name: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.columns.iter().any(|column| column == name))
    }

    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKeyMeta> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.columns.iter().any(|c| c == column))
    }

    pub(crate) fn mark_foreign_keys(&mut self) {
        let fk_columns: Vec<String> = self
            .foreign_keys
            .iter()
            .flat_map(|fk| fk.columns.iter().cloned())
            .collect();

        for column in self.columns.iter_mut() {
            column.is_foreign_key = fk_columns.contains(&column.name);
        }
    }
}
