use crate::column_mapping::column_mapping;
use crate::error::SchemaError;
use crate::types::{ColumnMeta, ForeignKeyMeta, TableMeta};
use async_trait::async_trait;
use sea_query::{ForeignKeyCreateStatement, TableCreateStatement, TableForeignKey};
use sea_schema::sqlite::def::{Schema, TableDef};
use sea_schema::sqlite::discovery::SchemaDiscovery;
use serde_derive::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite, SqlitePool};

/// Tables of one database, in the order the source reported them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    #[serde(default)]
    pub tables: Vec<TableMeta>,
}

impl DatabaseSchema {
    /// Checks that every foreign key names columns of its own table and flags
    /// those columns as foreign keys.
    pub fn new(mut tables: Vec<TableMeta>) -> Result<Self, SchemaError> {
        for table in tables.iter_mut() {
            for fk in &table.foreign_keys {
                if let Some(column) = fk
                    .columns
                    .iter()
                    .find(|column| table.column(column).is_none())
                {
                    return Err(SchemaError::UnknownColumn {
                        table: table.name.clone(),
                        column: column.clone(),
                    });
                }
            }
            table.mark_foreign_keys();
        }

        Ok(Self { tables })
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }

    pub fn table(&self, name: &str) -> Option<&TableMeta> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Anything that can list tables, columns and foreign keys.
#[async_trait(?Send)]
pub trait SchemaSource {
    async fn load(&self) -> Result<DatabaseSchema, SchemaError>;

    /// Shown in logs.
    fn describe(&self) -> String;
}

/// Live SQLite database, read through sea-schema discovery.
pub struct SqliteSchemaSource {
    url: String,
}

impl SqliteSchemaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait(?Send)]
impl SchemaSource for SqliteSchemaSource {
    async fn load(&self) -> Result<DatabaseSchema, SchemaError> {
        let connection = SqlitePool::connect(&self.url)
            .await
            .map_err(|source| SchemaError::Connect {
                url: self.url.clone(),
                source,
            })?;

        get_database_schema(connection).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub async fn get_database_schema(connection: Pool<Sqlite>) -> Result<DatabaseSchema, SchemaError> {
    let schema_discovery = SchemaDiscovery::new(connection);

    let schema: Schema = schema_discovery
        .discover()
        .await
        .map_err(|e| SchemaError::Discovery(format!("{:?}", e)))?;

    let tables = schema
        .tables
        .iter()
        .map(|table: &TableDef| -> Result<TableMeta, SchemaError> {
            let table_create_stmt: TableCreateStatement = table.write();

            let columns: Vec<ColumnMeta> = table_create_stmt
                .get_columns()
                .iter()
                .map(column_mapping)
                .collect();

            let foreign_keys: Vec<ForeignKeyMeta> = table_create_stmt
                .get_foreign_key_create_stmts()
                .iter()
                .map(|fk: &ForeignKeyCreateStatement| fk.get_foreign_key())
                .map(|fk: &TableForeignKey| parse_table_fk(&table.name, fk))
                .collect::<Result<_, _>>()?;

            Ok(TableMeta::new(table.name.clone(), columns, foreign_keys))
        })
        .collect::<Result<Vec<TableMeta>, SchemaError>>()?;

    DatabaseSchema::new(tables)
}

fn parse_table_fk(table_name: &str, fk: &TableForeignKey) -> Result<ForeignKeyMeta, SchemaError> {
    let ref_table = fk.get_ref_table().ok_or_else(|| {
        SchemaError::Discovery(format!(
            "foreign key on table '{}' has no referenced table",
            table_name
        ))
    })?;

    Ok(ForeignKeyMeta {
        columns: fk.get_columns(),
        ref_table,
        ref_columns: fk.get_ref_columns(),
    })
}
