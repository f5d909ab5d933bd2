pub mod column_meta;
pub mod table_meta;
pub mod foreign_key_meta;

pub use column_meta::{ColumnKind, ColumnMeta};
pub use table_meta::TableMeta;
pub use foreign_key_meta::ForeignKeyMeta;
