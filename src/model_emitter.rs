use crate::class_model::{ClassModel, ClassRegistry};
use crate::database_schema::DatabaseSchema;
use crate::naming::model_file_name;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

/// Classes derived from one schema, in table order.
#[derive(Debug, Default)]
pub struct ModelSet {
    pub classes: Vec<ClassModel>,
    pub registry: ClassRegistry,
    /// Reserved classes that were not emitted.
    pub reserved: Vec<String>,
}

impl ModelSet {
    pub fn class(&self, class_name: &str) -> Option<&ClassModel> {
        self.classes
            .iter()
            .find(|class| class.class_name == class_name)
    }

    pub fn class_mut(&mut self, class_name: &str) -> Option<&mut ClassModel> {
        self.classes
            .iter_mut()
            .find(|class| class.class_name == class_name)
    }

    pub fn is_reserved(&self, class_name: &str) -> bool {
        self.reserved.iter().any(|name| name == class_name)
    }
}

/// One class per table, except those whose derived name is reserved.
pub fn emit_models(schema: &DatabaseSchema, reserved: &[String]) -> ModelSet {
    let mut models = ModelSet::default();

    for table in &schema.tables {
        let class_name = match models.registry.insert(table.clone()) {
            Ok(class_name) => class_name,
            Err(existing) => {
                tracing::warn!(
                    table = %table.name,
                    existing = %existing,
                    "table derives the same class name as an earlier table, skipping"
                );
                continue;
            }
        };

        if reserved.contains(&class_name) {
            tracing::info!(table = %table.name, class = %class_name, "reserved class, not emitted");
            models.reserved.push(class_name);
            continue;
        }

        tracing::debug!(table = %table.name, class = %class_name, "emitting model");
        models.classes.push(ClassModel::new(class_name, table.name.clone()));
    }

    models
}

/// Renders every class into `dir`, creating it if needed. Existing files are
/// overwritten.
pub fn write_models(dir: &Path, namespace: &str, models: &ModelSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(models.classes.len());
    for class in &models.classes {
        let file_path = dir.join(model_file_name(&class.class_name));
        fs::write(&file_path, class.render(namespace).as_bytes())?;
        tracing::info!(path = %file_path.display(), "wrote model");
        written.push(file_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, ColumnMeta, TableMeta};

    fn table(name: &str) -> TableMeta {
        TableMeta::new(
            name,
            vec![ColumnMeta::new("id", ColumnKind::Integer).primary_key()],
            Vec::new(),
        )
    }

    #[test]
    fn emits_one_class_per_table_and_skips_reserved_names() {
        let schema =
            DatabaseSchema::new(vec![table("users"), table("order_items"), table("categories")])
                .unwrap();

        let models = emit_models(&schema, &["User".to_string()]);

        let names: Vec<&str> = models
            .classes
            .iter()
            .map(|class| class.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["OrderItem", "Category"]);
        assert_eq!(models.reserved, vec!["User".to_string()]);
        assert!(models.registry.contains("User"));
        assert_eq!(models.class("OrderItem").unwrap().table_name, "order_items");
    }

    #[test]
    fn writes_and_overwrites_model_files() {
        let dir = tempfile::tempdir().unwrap();
        let models_dir = dir.path().join("app").join("Models");
        let schema = DatabaseSchema::new(vec![table("categories")]).unwrap();
        let models = emit_models(&schema, &[]);

        fs::create_dir_all(&models_dir).unwrap();
        fs::write(models_dir.join("Category.php"), "stale").unwrap();

        let written = write_models(&models_dir, "App\\Models", &models).unwrap();

        assert_eq!(written, vec![models_dir.join("Category.php")]);
        let php = fs::read_to_string(models_dir.join("Category.php")).unwrap();
        assert!(php.contains("class Category extends Model"));
    }
}
