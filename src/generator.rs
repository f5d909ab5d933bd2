use crate::config::{GeneratorConfig, ScaffoldMode};
use crate::database_schema::{DatabaseSchema, SchemaSource};
use crate::model_emitter::{emit_models, write_models};
use crate::relations::{link_relationships, LinkSummary};
use crate::scaffold::{BuiltinScaffolder, CommandScaffolder, ScaffoldRequest, Scaffolder};
use crate::screen_rewriter::ScreenRewriter;
use anyhow::Context;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub tables: usize,
    pub models_written: Vec<PathBuf>,
    pub screens_written: Vec<PathBuf>,
    pub reserved: Vec<String>,
    pub links: LinkSummary,
    pub rewritten_lines: usize,
    pub failed_lines: usize,
}

/// The scaffolder `config.scaffold` asks for.
pub fn scaffolder_for(config: &GeneratorConfig) -> Box<dyn Scaffolder> {
    match config.scaffold.mode {
        ScaffoldMode::Builtin => Box::new(BuiltinScaffolder),
        ScaffoldMode::Command => Box::new(CommandScaffolder {
            program: config.scaffold.program.clone(),
            args: config.scaffold.args.clone(),
            project_root: config.project_root(),
            resources_dir: config.resources_dir(),
        }),
    }
}

pub struct Generator {
    config: GeneratorConfig,
    scaffolder: Box<dyn Scaffolder>,
}

impl Generator {
    pub fn new(config: GeneratorConfig, scaffolder: Box<dyn Scaffolder>) -> Self {
        Self { config, scaffolder }
    }

    pub async fn run(&self, source: &dyn SchemaSource) -> anyhow::Result<GenerationSummary> {
        tracing::info!(source = %source.describe(), "loading schema");
        let schema = source
            .load()
            .await
            .with_context(|| format!("failed to load schema from {}", source.describe()))?;

        self.generate(&schema)
    }

    /// Emits models, links them, writes them, then scaffolds and rewrites one
    /// screen per model. Every output file is overwritten.
    pub fn generate(&self, schema: &DatabaseSchema) -> anyhow::Result<GenerationSummary> {
        let config = &self.config;
        let mut summary = GenerationSummary::default();

        let table_names = schema.table_names();
        tracing::info!(count = table_names.len(), tables = ?table_names, "enumerated tables");
        summary.tables = table_names.len();

        let mut models = {
            let _span = tracing::info_span!("emit_models").entered();
            emit_models(schema, &config.models.reserved)
        };
        summary.reserved = models.reserved.clone();

        summary.links = link_relationships(&mut models);
        tracing::info!(
            belongs_to = summary.links.belongs_to,
            has_many = summary.links.has_many,
            skipped = summary.links.skipped,
            "linked relationships"
        );

        let models_dir = config.models_dir();
        summary.models_written = write_models(&models_dir, &config.output.models_namespace, &models)
            .with_context(|| format!("failed to write models to {}", models_dir.display()))?;

        let _span = tracing::info_span!("screens").entered();
        let resources_dir = config.resources_dir();
        let rewriter = ScreenRewriter::new(&models.registry, &config.display.hints);

        for class in &models.classes {
            let Some(table) = models.registry.table(&class.class_name) else {
                continue;
            };

            let screen = self
                .scaffolder
                .scaffold(&ScaffoldRequest {
                    class,
                    table,
                    registry: &models.registry,
                    models_namespace: &config.output.models_namespace,
                    resources_namespace: &config.output.resources_namespace,
                })
                .with_context(|| format!("failed to scaffold screen for {}", class.class_name))?;

            let outcome = rewriter.rewrite(class, &screen.content);
            summary.rewritten_lines += outcome.rewritten_lines;
            summary.failed_lines += outcome.failed_lines;

            let path = resources_dir.join(&screen.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, outcome.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                rewritten = outcome.rewritten_lines,
                "wrote screen"
            );
            summary.screens_written.push(path);
        }

        Ok(summary)
    }
}
