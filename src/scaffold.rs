//! Admin screen scaffolding.
//!
//! A [`Scaffolder`] turns a class name and its table into the text of a
//! Filament resource. [`BuiltinScaffolder`] renders one in process and
//! [`CommandScaffolder`] shells out to `php artisan make:filament-resource`.
//! Either way the result is a plain first draft. Relationship fields show the
//! related primary key until the screen rewriter picks a label column.

use crate::class_model::{php_string, ClassModel, ClassRegistry};
use crate::error::ScaffoldError;
use crate::naming::{has_many_method, resource_class_name, resource_file_name};
use crate::types::{ColumnKind, ColumnMeta, TableMeta};
use heck::ToUpperCamelCase;
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Columns the framework fills in by itself.
const MANAGED_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

pub struct ScaffoldRequest<'a> {
    /// The linked model; relationship fields use its parent lookups.
    pub class: &'a ClassModel,
    pub table: &'a TableMeta,
    pub registry: &'a ClassRegistry,
    pub models_namespace: &'a str,
    pub resources_namespace: &'a str,
}

impl ScaffoldRequest<'_> {
    pub fn class_name(&self) -> &str {
        &self.class.class_name
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenDefinition {
    /// Relative to the resources directory.
    pub path: PathBuf,
    pub content: String,
}

pub trait Scaffolder {
    fn scaffold(&self, request: &ScaffoldRequest<'_>) -> Result<ScreenDefinition, ScaffoldError>;
}

/// Renders a Filament resource without leaving the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinScaffolder;

impl Scaffolder for BuiltinScaffolder {
    fn scaffold(&self, request: &ScaffoldRequest<'_>) -> Result<ScreenDefinition, ScaffoldError> {
        Ok(ScreenDefinition {
            path: PathBuf::from(resource_file_name(request.class_name())),
            content: render_resource(request),
        })
    }
}

/// Relationship name and displayed column for a foreign key column. Columns
/// whose parent lookup was dropped while linking get none.
fn relationship_field(request: &ScaffoldRequest<'_>, column: &ColumnMeta) -> Option<(String, String)> {
    let accessor = request.class.belongs_to_key(&column.name)?;

    let shown = request
        .registry
        .table(&accessor.target_class)
        .and_then(TableMeta::primary_key)
        .map(|pk| pk.name.clone())
        .or_else(|| {
            request
                .table
                .foreign_key_for(&column.name)
                .and_then(|fk| fk.ref_columns.first().cloned())
        })
        .unwrap_or_else(|| "id".to_string());

    Some((accessor.method_name.clone(), shown))
}

fn form_component(request: &ScaffoldRequest<'_>, column: &ColumnMeta) -> String {
    let name = php_string(&column.name);
    let mut out = match relationship_field(request, column) {
        Some((relationship, shown)) => format!(
            "Forms\\Components\\Select::make({})\n                    ->relationship({}, {})",
            name,
            php_string(&relationship),
            php_string(&shown)
        ),
        None => match column.kind {
            ColumnKind::Boolean => format!("Forms\\Components\\Toggle::make({})", name),
            ColumnKind::Date => format!("Forms\\Components\\DatePicker::make({})", name),
            ColumnKind::DateTime => format!("Forms\\Components\\DateTimePicker::make({})", name),
            ColumnKind::Time => format!("Forms\\Components\\TimePicker::make({})", name),
            ColumnKind::Integer | ColumnKind::Decimal => {
                format!("Forms\\Components\\TextInput::make({})\n                    ->numeric()", name)
            }
            ColumnKind::Json => format!("Forms\\Components\\Textarea::make({})", name),
            ColumnKind::Text => {
                format!("Forms\\Components\\TextInput::make({})\n                    ->maxLength(255)", name)
            }
            ColumnKind::Binary | ColumnKind::Other => {
                format!("Forms\\Components\\TextInput::make({})", name)
            }
        },
    };

    if column.not_null {
        out.push_str("\n                    ->required()");
    }
    out
}

fn table_column(request: &ScaffoldRequest<'_>, column: &ColumnMeta) -> String {
    match relationship_field(request, column) {
        Some((relationship, shown)) => format!(
            "Tables\\Columns\\TextColumn::make({})",
            php_string(&format!("{}.{}", relationship, shown))
        ),
        None => {
            let name = php_string(&column.name);
            match column.kind {
                ColumnKind::Boolean => {
                    format!("Tables\\Columns\\IconColumn::make({})\n                    ->boolean()", name)
                }
                ColumnKind::Date => {
                    format!("Tables\\Columns\\TextColumn::make({})\n                    ->date()", name)
                }
                ColumnKind::DateTime => {
                    format!("Tables\\Columns\\TextColumn::make({})\n                    ->dateTime()", name)
                }
                _ => format!("Tables\\Columns\\TextColumn::make({})", name),
            }
        }
    }
}

fn render_resource(request: &ScaffoldRequest<'_>) -> String {
    let class_name = request.class_name();
    let resource = resource_class_name(class_name);
    let mut out = String::new();

    out.push_str("<?php\n\n");
    let _ = writeln!(out, "namespace {};\n", request.resources_namespace);
    let _ = writeln!(out, "use {}\\{}\\Pages;", request.resources_namespace, resource);
    let _ = writeln!(out, "use {}\\{};", request.models_namespace, class_name);
    out.push_str("use Filament\\Forms;\n");
    out.push_str("use Filament\\Resources\\Form;\n");
    out.push_str("use Filament\\Resources\\Resource;\n");
    out.push_str("use Filament\\Resources\\Table;\n");
    out.push_str("use Filament\\Tables;\n\n");

    let _ = writeln!(out, "class {} extends Resource\n{{", resource);
    let _ = writeln!(out, "    protected static ?string $model = {}::class;\n", class_name);
    out.push_str("    protected static ?string $navigationIcon = 'heroicon-o-collection';\n\n");

    out.push_str("    public static function form(Form $form): Form\n    {\n");
    out.push_str("        return $form\n            ->schema([\n");
    for column in request
        .table
        .columns
        .iter()
        .filter(|c| !c.is_primary_key && !MANAGED_COLUMNS.contains(&c.name.as_str()))
    {
        let _ = writeln!(out, "                {},", form_component(request, column));
    }
    out.push_str("            ]);\n    }\n\n");

    out.push_str("    public static function table(Table $table): Table\n    {\n");
    out.push_str("        return $table\n            ->columns([\n");
    for column in request.table.columns.iter().filter(|c| !c.is_primary_key) {
        let _ = writeln!(out, "                {},", table_column(request, column));
    }
    out.push_str("            ])\n");
    out.push_str("            ->filters([\n                //\n            ])\n");
    out.push_str("            ->actions([\n                Tables\\Actions\\EditAction::make(),\n            ])\n");
    out.push_str("            ->bulkActions([\n                Tables\\Actions\\DeleteBulkAction::make(),\n            ]);\n");
    out.push_str("    }\n\n");

    out.push_str("    public static function getRelations(): array\n    {\n        return [\n            //\n        ];\n    }\n\n");

    out.push_str("    public static function getPages(): array\n    {\n        return [\n");
    let plural = has_many_method(&request.table.name).to_upper_camel_case();
    let _ = writeln!(out, "            'index' => Pages\\List{}::route('/'),", plural);
    let _ = writeln!(out, "            'create' => Pages\\Create{}::route('/create'),", class_name);
    let _ = writeln!(out, "            'edit' => Pages\\Edit{}::route('/{{record}}/edit'),", class_name);
    out.push_str("        ];\n    }\n}\n");

    out
}

/// Runs an external scaffold command, `<program> <args..> <Class> --generate`,
/// in the project root and reads the file it produced.
#[derive(Clone, Debug)]
pub struct CommandScaffolder {
    pub program: String,
    pub args: Vec<String>,
    pub project_root: PathBuf,
    pub resources_dir: PathBuf,
}

impl Scaffolder for CommandScaffolder {
    fn scaffold(&self, request: &ScaffoldRequest<'_>) -> Result<ScreenDefinition, ScaffoldError> {
        tracing::debug!(program = %self.program, class = %request.class_name(), "running scaffold command");

        let output = process::Command::new(&self.program)
            .args(&self.args)
            .arg(request.class_name())
            .arg("--generate")
            .current_dir(&self.project_root)
            .output()
            .map_err(|source| ScaffoldError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScaffoldError::Failed {
                class_name: request.class_name().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let path = PathBuf::from(resource_file_name(request.class_name()));
        let full_path = self.resources_dir.join(&path);
        let content = fs::read_to_string(&full_path).map_err(|source| ScaffoldError::Read {
            path: full_path.clone(),
            source,
        })?;

        Ok(ScreenDefinition { path, content })
    }
}
