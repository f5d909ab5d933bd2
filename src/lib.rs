pub mod class_model;
pub mod column_mapping;
pub mod config;
pub mod database_schema;
pub mod error;
pub mod generator;
pub mod model_emitter;
pub mod naming;
pub mod relations;
pub mod scaffold;
pub mod schema_snapshot;
pub mod screen_rewriter;
pub mod types;

pub use config::GeneratorConfig;
pub use database_schema::{DatabaseSchema, SchemaSource};
pub use generator::{GenerationSummary, Generator};
pub use scaffold::{ScaffoldRequest, Scaffolder, ScreenDefinition};
