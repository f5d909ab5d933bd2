use crate::types::{ColumnKind, ColumnMeta};
use proc_macro2::TokenStream;
use sea_orm_codegen::Column;
use sea_query::{ColumnDef, ColumnSpec};

/// Describes a discovered column. The kind is read off the Rust type
/// sea-orm-codegen would generate for it.
pub fn column_mapping(column: &ColumnDef) -> ColumnMeta {
    let column_spec: &Vec<ColumnSpec> = column.get_column_spec();
    let column_info: Column = Column::from(column);
    let rs_type: TokenStream = column_info.get_rs_type();

    let not_null = column_spec
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::NotNull));
    let is_primary_key = column_spec
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::PrimaryKey));

    ColumnMeta {
        name: column.get_column_name(),
        kind: ColumnKind::from_rs_type(&rs_type.to_string()),
        not_null: not_null || is_primary_key,
        is_primary_key,
        is_foreign_key: false,
    }
}
