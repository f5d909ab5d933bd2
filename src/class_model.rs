//! In-memory model of a generated data-model class.
//!
//! Accessors are collected here by the linker and the class is rendered to PHP
//! once, after every relationship is known.

use crate::types::TableMeta;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelationKind {
    BelongsTo,
    HasMany,
}

impl RelationKind {
    /// Declared return type of the accessor.
    pub fn return_type(self) -> &'static str {
        match self {
            Self::BelongsTo => "BelongsTo",
            Self::HasMany => "HasMany",
        }
    }

    fn builder(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasMany => "hasMany",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accessor {
    pub kind: RelationKind,
    pub method_name: String,
    pub target_class: String,
    /// Column holding the key, always on the child table.
    pub foreign_key: String,
}

impl Accessor {
    pub fn belongs_to(
        method_name: impl Into<String>,
        target_class: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            method_name: method_name.into(),
            target_class: target_class.into(),
            foreign_key: foreign_key.into(),
        }
    }

    pub fn has_many(
        method_name: impl Into<String>,
        target_class: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::HasMany,
            method_name: method_name.into(),
            target_class: target_class.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AddAccessor {
    Added,
    /// The same accessor was already present.
    Duplicate,
    /// Another accessor already uses the method name.
    Collision(Accessor),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassModel {
    pub class_name: String,
    pub table_name: String,
    pub accessors: Vec<Accessor>,
}

impl ClassModel {
    pub fn new(class_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            table_name: table_name.into(),
            accessors: Vec::new(),
        }
    }

    pub fn add_accessor(&mut self, accessor: Accessor) -> AddAccessor {
        match self.accessor(&accessor.method_name) {
            Some(existing) if *existing == accessor => AddAccessor::Duplicate,
            Some(existing) => AddAccessor::Collision(existing.clone()),
            None => {
                self.accessors.push(accessor);
                AddAccessor::Added
            }
        }
    }

    pub fn accessor(&self, method_name: &str) -> Option<&Accessor> {
        self.accessors
            .iter()
            .find(|accessor| accessor.method_name == method_name)
    }

    pub fn belongs_to(&self) -> impl Iterator<Item = &Accessor> {
        self.accessors
            .iter()
            .filter(|accessor| accessor.kind == RelationKind::BelongsTo)
    }

    /// The parent lookup bound to `column`, if linking kept one.
    pub fn belongs_to_key(&self, column: &str) -> Option<&Accessor> {
        self.belongs_to().find(|accessor| accessor.foreign_key == column)
    }

    fn uses(&self, kind: RelationKind) -> bool {
        self.accessors.iter().any(|accessor| accessor.kind == kind)
    }

    pub fn render(&self, namespace: &str) -> String {
        let mut out = String::new();

        out.push_str("<?php\n\n");
        let _ = writeln!(out, "namespace {};\n", namespace);
        out.push_str("use Illuminate\\Database\\Eloquent\\Factories\\HasFactory;\n");
        out.push_str("use Illuminate\\Database\\Eloquent\\Model;\n");
        for kind in [RelationKind::BelongsTo, RelationKind::HasMany] {
            if self.uses(kind) {
                let _ = writeln!(
                    out,
                    "use Illuminate\\Database\\Eloquent\\Relations\\{};",
                    kind.return_type()
                );
            }
        }

        let _ = writeln!(out, "\nclass {} extends Model\n{{", self.class_name);
        out.push_str("    use HasFactory;\n\n");
        out.push_str("    protected $guarded = [];\n\n");
        let _ = writeln!(out, "    protected $table = {};", php_string(&self.table_name));

        for accessor in &self.accessors {
            let _ = write!(
                out,
                "\n    public function {}(): {}\n    {{\n        return $this->{}({}::class, {});\n    }}\n",
                accessor.method_name,
                accessor.kind.return_type(),
                accessor.kind.builder(),
                accessor.target_class,
                php_string(&accessor.foreign_key),
            );
        }

        out.push_str("}\n");
        out
    }
}

/// Single-quoted PHP literal.
pub fn php_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Table metadata keyed by derived class name. Holds every table of the
/// schema, reserved classes included, so relationship targets can be looked
/// up without loading generated code.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    tables: BTreeMap<String, TableMeta>,
}

impl ClassRegistry {
    /// Returns the class name the table was already registered under when
    /// two tables derive the same class name. The first one wins.
    pub fn insert(&mut self, table: TableMeta) -> Result<String, String> {
        let class_name = table.class_name();
        if let Some(existing) = self.tables.get(&class_name) {
            return Err(existing.name.clone());
        }
        self.tables.insert(class_name.clone(), table);
        Ok(class_name)
    }

    pub fn table(&self, class_name: &str) -> Option<&TableMeta> {
        self.tables.get(class_name)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.tables.contains_key(class_name)
    }
}
