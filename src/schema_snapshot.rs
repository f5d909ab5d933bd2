//! TOML snapshots of a database schema.
//!
//! A snapshot lets the generator run without a live database, and
//! `filamentize dump-schema` writes one from a live database.
//!
//! ```toml
//! [[tables]]
//! name = "products"
//!
//! [[tables.columns]]
//! name = "id"
//! kind = "integer"
//! is_primary_key = true
//!
//! [[tables.columns]]
//! name = "category_id"
//! kind = "integer"
//!
//! [[tables.foreign_keys]]
//! columns = ["category_id"]
//! ref_table = "categories"
//! ```

use crate::database_schema::{DatabaseSchema, SchemaSource};
use crate::error::SchemaError;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

pub struct SnapshotSchemaSource {
    path: PathBuf,
}

impl SnapshotSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait(?Send)]
impl SchemaSource for SnapshotSchemaSource {
    async fn load(&self) -> Result<DatabaseSchema, SchemaError> {
        read_snapshot(&self.path)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}

pub fn read_snapshot(path: &Path) -> Result<DatabaseSchema, SchemaError> {
    let raw = fs::read_to_string(path).map_err(|source| SchemaError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_snapshot(&raw, path)
}

pub fn parse_snapshot(raw: &str, path: &Path) -> Result<DatabaseSchema, SchemaError> {
    let parsed: DatabaseSchema =
        toml::from_str(raw).map_err(|source| SchemaError::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })?;

    DatabaseSchema::new(parsed.tables)
}

pub fn write_snapshot(path: &Path, schema: &DatabaseSchema) -> Result<(), SchemaError> {
    let data = toml::to_string_pretty(schema)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SchemaError::SnapshotWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, data).map_err(|source| SchemaError::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, ColumnMeta, ForeignKeyMeta, TableMeta};

    const SNAPSHOT: &str = r#"
[[tables]]
name = "categories"

[[tables.columns]]
name = "id"
kind = "integer"
is_primary_key = true

[[tables.columns]]
name = "name"
kind = "text"
not_null = true

[[tables]]
name = "products"

[[tables.columns]]
name = "id"
kind = "integer"
is_primary_key = true

[[tables.columns]]
name = "category_id"
kind = "integer"

[[tables.columns]]
name = "title"

[[tables.foreign_keys]]
columns = ["category_id"]
ref_table = "categories"
"#;

    #[test]
    fn parses_tables_columns_and_foreign_keys() {
        let schema = parse_snapshot(SNAPSHOT, Path::new("schema.toml")).unwrap();

        assert_eq!(schema.table_names(), vec!["categories", "products"]);

        let products = schema.table("products").unwrap();
        assert_eq!(products.foreign_keys[0].ref_table, "categories");
        assert!(products.column("category_id").unwrap().is_foreign_key);
        assert_eq!(products.column("title").unwrap().kind, ColumnKind::Other);
        assert!(schema.table("categories").unwrap().column("name").unwrap().not_null);
    }

    #[test]
    fn reports_the_snapshot_path_on_parse_errors() {
        let err = parse_snapshot("[[tables]]\nname = 3\n", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn written_snapshots_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("schema.toml");

        let schema = DatabaseSchema::new(vec![
            TableMeta::new(
                "categories",
                vec![ColumnMeta::new("id", ColumnKind::Integer).primary_key()],
                Vec::new(),
            ),
            TableMeta::new(
                "products",
                vec![
                    ColumnMeta::new("id", ColumnKind::Integer).primary_key(),
                    ColumnMeta::new("category_id", ColumnKind::Integer),
                ],
                vec![ForeignKeyMeta::new("category_id", "categories")],
            ),
        ])
        .unwrap();

        write_snapshot(&path, &schema).unwrap();

        assert_eq!(read_snapshot(&path).unwrap(), schema);
    }
}
