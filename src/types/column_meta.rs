use serde_derive::{Deserialize, Serialize};

/// Coarse storage class of a column, enough to pick a form widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Json,
    Binary,
    Other,
}

impl Default for ColumnKind {
    fn default() -> Self {
        Self::Other
    }
}

impl ColumnKind {
    /// Maps the Rust type sea-orm-codegen picks for a column (`Option < String >`,
    /// `i32`, `DateTimeUtc`, ...) onto a kind.
    pub fn from_rs_type(rs_type: &str) -> Self {
        let compact: String = rs_type.chars().filter(|c| !c.is_whitespace()).collect();
        let inner = compact
            .strip_prefix("Option<")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(&compact);

        match inner {
            "String" => Self::Text,
            "bool" => Self::Boolean,
            "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" => Self::Integer,
            "f32" | "f64" | "Decimal" => Self::Decimal,
            "Date" => Self::Date,
            "Time" => Self::Time,
            "Json" => Self::Json,
            "Vec<u8>" => Self::Binary,
            other if other.starts_with("DateTime") => Self::DateTime,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String, // as reported by the database
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default, skip_serializing)]
    pub is_foreign_key: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            not_null: false,
            is_primary_key: false,
            is_foreign_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.not_null = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// `id`, a primary key, or anything following the `<name>_id` convention.
    pub fn is_id_like(&self) -> bool {
        self.is_primary_key || self.name == "id" || self.name.ends_with("_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_codegen_types_to_kinds() {
        assert_eq!(ColumnKind::from_rs_type("String"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_rs_type("Option < String >"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_rs_type("i64"), ColumnKind::Integer);
        assert_eq!(ColumnKind::from_rs_type("Option < Decimal >"), ColumnKind::Decimal);
        assert_eq!(ColumnKind::from_rs_type("DateTimeUtc"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_rs_type("Date"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_rs_type("Vec < u8 >"), ColumnKind::Binary);
        assert_eq!(ColumnKind::from_rs_type("Uuid"), ColumnKind::Other);
    }

    #[test]
    fn id_like_columns() {
        assert!(ColumnMeta::new("id", ColumnKind::Integer).is_id_like());
        assert!(ColumnMeta::new("category_id", ColumnKind::Integer).is_id_like());
        assert!(ColumnMeta::new("code", ColumnKind::Text).primary_key().is_id_like());
        assert!(!ColumnMeta::new("identifier", ColumnKind::Text).is_id_like());
    }
}
