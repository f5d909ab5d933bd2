//! Name derivation shared by the model emitter, the linker and the scaffolder.
//!
//! Singular and plural forms come from heuristic English inflection. Irregular
//! nouns the `Inflector` rules don't cover come out wrong (`people` stays
//! `people`, for instance).

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use inflector::string::pluralize::to_plural;
use inflector::string::singularize::to_singular;

fn singular_snake(table: &str) -> String {
    to_singular(&table.to_snake_case())
}

/// `order_items` -> `OrderItem`
pub fn derive_class_name(table: &str) -> String {
    singular_snake(table).to_upper_camel_case()
}

/// Method name of the parent-lookup accessor pointing at `ref_table`.
pub fn belongs_to_method(ref_table: &str) -> String {
    singular_snake(ref_table).to_lower_camel_case()
}

/// Method name of the child-collection accessor listing rows of `owner_table`.
pub fn has_many_method(owner_table: &str) -> String {
    to_plural(&singular_snake(owner_table)).to_lower_camel_case()
}

pub fn model_file_name(class_name: &str) -> String {
    format!("{}.php", class_name)
}

pub fn resource_class_name(class_name: &str) -> String {
    format!("{}Resource", class_name)
}

pub fn resource_file_name(class_name: &str) -> String {
    format!("{}.php", resource_class_name(class_name))
}
