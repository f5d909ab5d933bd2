//! Relationship linking.
//!
//! Pass A adds a parent-lookup accessor to the child for each foreign key.
//! Pass B mirrors every parent lookup as a child collection on the parent.
//! Both read the in-memory [`ModelSet`], so pass B sees exactly what pass A
//! produced.

use crate::class_model::{Accessor, AddAccessor, ClassModel};
use crate::model_emitter::ModelSet;
use crate::naming::{belongs_to_method, derive_class_name, has_many_method};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub belongs_to: usize,
    pub has_many: usize,
    pub skipped: usize,
}

pub fn link_relationships(models: &mut ModelSet) -> LinkSummary {
    let mut summary = LinkSummary::default();
    link_parents(models, &mut summary);
    link_children(models, &mut summary);
    summary
}

fn link_parents(models: &mut ModelSet, summary: &mut LinkSummary) {
    let _span = tracing::info_span!("link_parents").entered();

    for reserved in &models.reserved {
        let Some(table) = models.registry.table(reserved) else {
            continue;
        };
        for fk in &table.foreign_keys {
            tracing::warn!(
                class = %reserved,
                references = %fk.ref_table,
                "reserved class is not generated, parent lookup dropped"
            );
            summary.skipped += 1;
        }
    }

    let ModelSet {
        classes, registry, ..
    } = models;

    for class in classes.iter_mut() {
        let Some(table) = registry.table(&class.class_name) else {
            continue;
        };

        for fk in &table.foreign_keys {
            let Some(column) = fk.local_column() else {
                continue;
            };
            if fk.is_composite() {
                tracing::warn!(
                    class = %class.class_name,
                    columns = ?fk.columns,
                    "composite foreign key, binding the first column only"
                );
            }

            let accessor = Accessor::belongs_to(
                belongs_to_method(&fk.ref_table),
                derive_class_name(&fk.ref_table),
                column,
            );
            if add(class, accessor) {
                summary.belongs_to += 1;
            } else {
                summary.skipped += 1;
            }
        }
    }
}

fn link_children(models: &mut ModelSet, summary: &mut LinkSummary) {
    let _span = tracing::info_span!("link_children").entered();

    let mirrored: Vec<(String, Accessor)> = models
        .classes
        .iter()
        .flat_map(|owner| {
            owner.belongs_to().map(move |parent| {
                (
                    parent.target_class.clone(),
                    Accessor::has_many(
                        has_many_method(&owner.table_name),
                        owner.class_name.clone(),
                        parent.foreign_key.clone(),
                    ),
                )
            })
        })
        .collect();

    for (parent_class, accessor) in mirrored {
        if models.is_reserved(&parent_class) {
            tracing::warn!(
                class = %parent_class,
                method = %accessor.method_name,
                "reserved class is not generated, child collection dropped"
            );
            summary.skipped += 1;
            continue;
        }

        let Some(parent) = models.class_mut(&parent_class) else {
            tracing::warn!(
                class = %parent_class,
                child = %accessor.target_class,
                "referenced table is not part of the schema, child collection dropped"
            );
            summary.skipped += 1;
            continue;
        };

        if add(parent, accessor) {
            summary.has_many += 1;
        } else {
            summary.skipped += 1;
        }
    }
}

fn add(class: &mut ClassModel, accessor: Accessor) -> bool {
    let method = accessor.method_name.clone();
    match class.add_accessor(accessor) {
        AddAccessor::Added => {
            tracing::debug!(class = %class.class_name, method = %method, "added accessor");
            true
        }
        AddAccessor::Duplicate => false,
        AddAccessor::Collision(existing) => {
            tracing::warn!(
                class = %class.class_name,
                method = %method,
                existing_target = %existing.target_class,
                existing_key = %existing.foreign_key,
                "accessor name already taken, dropping the later one"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_model::RelationKind;
    use crate::database_schema::DatabaseSchema;
    use crate::model_emitter::emit_models;
    use crate::types::{ColumnKind, ColumnMeta, ForeignKeyMeta, TableMeta};

    fn id() -> ColumnMeta {
        ColumnMeta::new("id", ColumnKind::Integer).primary_key()
    }

    fn fk_column(name: &str) -> ColumnMeta {
        ColumnMeta::new(name, ColumnKind::Integer)
    }

    fn shop() -> DatabaseSchema {
        DatabaseSchema::new(vec![
            TableMeta::new("users", vec![id()], Vec::new()),
            TableMeta::new("categories", vec![id()], Vec::new()),
            TableMeta::new(
                "products",
                vec![id(), fk_column("category_id")],
                vec![ForeignKeyMeta::new("category_id", "categories")],
            ),
            TableMeta::new(
                "order_items",
                vec![id(), fk_column("product_id"), fk_column("user_id")],
                vec![
                    ForeignKeyMeta::new("product_id", "products"),
                    ForeignKeyMeta::new("user_id", "users"),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn each_foreign_key_gets_one_parent_lookup() {
        let mut models = emit_models(&shop(), &[]);
        link_relationships(&mut models);

        let product = models.class("Product").unwrap();
        let lookups: Vec<&Accessor> = product.belongs_to().collect();
        assert_eq!(
            lookups,
            vec![&Accessor::belongs_to("category", "Category", "category_id")]
        );
    }

    #[test]
    fn each_parent_lookup_is_mirrored_once() {
        let mut models = emit_models(&shop(), &[]);
        let summary = link_relationships(&mut models);

        let category = models.class("Category").unwrap();
        assert_eq!(
            category.accessors,
            vec![Accessor::has_many("products", "Product", "category_id")]
        );

        let product = models.class("Product").unwrap();
        assert_eq!(
            product.accessor("orderItems"),
            Some(&Accessor::has_many("orderItems", "OrderItem", "product_id"))
        );
        assert_eq!(
            summary,
            LinkSummary {
                belongs_to: 3,
                has_many: 3,
                skipped: 0
            }
        );
    }

    #[test]
    fn reserved_parents_keep_the_lookup_but_get_no_collection() {
        let mut models = emit_models(&shop(), &["User".to_string()]);
        let summary = link_relationships(&mut models);

        let order_item = models.class("OrderItem").unwrap();
        assert_eq!(
            order_item.accessor("user").map(|a| a.kind),
            Some(RelationKind::BelongsTo)
        );
        assert!(models.class("User").is_none());
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.has_many, 2);
    }

    #[test]
    fn colliding_lookups_keep_the_first() {
        let schema = DatabaseSchema::new(vec![
            TableMeta::new("users", vec![id()], Vec::new()),
            TableMeta::new(
                "posts",
                vec![id(), fk_column("author_id"), fk_column("editor_id")],
                vec![
                    ForeignKeyMeta::new("author_id", "users"),
                    ForeignKeyMeta::new("editor_id", "users"),
                ],
            ),
        ])
        .unwrap();

        let mut models = emit_models(&schema, &[]);
        let summary = link_relationships(&mut models);

        let post = models.class("Post").unwrap();
        assert_eq!(
            post.accessors,
            vec![Accessor::belongs_to("user", "User", "author_id")]
        );
        let user = models.class("User").unwrap();
        assert_eq!(
            user.accessors,
            vec![Accessor::has_many("posts", "Post", "author_id")]
        );
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn composite_keys_bind_their_first_column() {
        let schema = DatabaseSchema::new(vec![
            TableMeta::new(
                "order_lines",
                vec![id(), fk_column("line_no")],
                Vec::new(),
            ),
            TableMeta::new(
                "shipments",
                vec![id(), fk_column("order_id"), fk_column("line_no")],
                vec![ForeignKeyMeta {
                    columns: vec!["order_id".to_string(), "line_no".to_string()],
                    ref_table: "order_lines".to_string(),
                    ref_columns: vec!["order_id".to_string(), "line_no".to_string()],
                }],
            ),
        ])
        .unwrap();

        let mut models = emit_models(&schema, &[]);
        let summary = link_relationships(&mut models);

        assert_eq!(
            models.class("Shipment").unwrap().accessors,
            vec![Accessor::belongs_to("orderLine", "OrderLine", "order_id")]
        );
        assert_eq!(
            models.class("OrderLine").unwrap().accessors,
            vec![Accessor::has_many("shipments", "Shipment", "order_id")]
        );
        assert_eq!(
            summary,
            LinkSummary {
                belongs_to: 1,
                has_many: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn self_references_link_both_ways_on_one_class() {
        let schema = DatabaseSchema::new(vec![TableMeta::new(
            "categories",
            vec![id(), fk_column("parent_id")],
            vec![ForeignKeyMeta::new("parent_id", "categories")],
        )])
        .unwrap();

        let mut models = emit_models(&schema, &[]);
        link_relationships(&mut models);

        let category = models.class("Category").unwrap();
        assert_eq!(
            category.accessors,
            vec![
                Accessor::belongs_to("category", "Category", "parent_id"),
                Accessor::has_many("categories", "Category", "parent_id"),
            ]
        );
    }

    #[test]
    fn lookups_to_tables_outside_the_schema_are_kept_one_way() {
        let schema = DatabaseSchema::new(vec![TableMeta::new(
            "invoices",
            vec![id(), fk_column("tenant_id")],
            vec![ForeignKeyMeta::new("tenant_id", "tenants")],
        )])
        .unwrap();

        let mut models = emit_models(&schema, &[]);
        let summary = link_relationships(&mut models);

        assert_eq!(models.class("Invoice").unwrap().accessors.len(), 1);
        assert_eq!(summary.skipped, 1);
    }
}
