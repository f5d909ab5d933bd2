use clap::{Parser, Subcommand};
use filamentize::config::{GeneratorConfig, ScaffoldMode, DEFAULT_CONFIG_FILE};
use filamentize::database_schema::{SchemaSource, SqliteSchemaSource};
use filamentize::generator::{scaffolder_for, Generator};
use filamentize::schema_snapshot::{write_snapshot, SnapshotSchemaSource};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "filamentize")]
#[command(version)]
#[command(about = "Generate Eloquent models and Filament resources from a database schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Database to inspect, overrides `database.url`
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Schema snapshot to read instead of a database, overrides `database.snapshot`
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models and admin screens for every table
    Generate {
        #[command(flatten)]
        source: SourceArgs,
        /// How admin screens are scaffolded, overrides `scaffold.mode`
        #[arg(long, value_enum)]
        scaffolder: Option<ScaffoldMode>,
    },
    /// Write the schema of a database to a TOML snapshot
    DumpSchema {
        #[command(flatten)]
        source: SourceArgs,
        /// Snapshot file to write
        #[arg(long, default_value = "schema.toml")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// CLI flags win over the config file; a snapshot wins over a database URL.
fn schema_source(args: &SourceArgs, config: &GeneratorConfig) -> anyhow::Result<Box<dyn SchemaSource>> {
    if let Some(snapshot) = &args.snapshot {
        return Ok(Box::new(SnapshotSchemaSource::new(snapshot)));
    }
    if let Some(url) = &args.database_url {
        return Ok(Box::new(SqliteSchemaSource::new(url)));
    }
    if let Some(snapshot) = &config.database.snapshot {
        return Ok(Box::new(SnapshotSchemaSource::new(config.resolve_path(snapshot))));
    }
    if let Some(url) = &config.database.url {
        return Ok(Box::new(SqliteSchemaSource::new(url)));
    }

    anyhow::bail!(
        "no schema source; pass --database-url or --snapshot, or set database.url in {}",
        args.config.display()
    )
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate { source, scaffolder } => {
            let mut config = GeneratorConfig::load_or_default(&source.config)?;
            if let Some(mode) = scaffolder {
                config.scaffold.mode = mode;
            }

            let schema_source = schema_source(&source, &config)?;
            let generator = Generator::new(config.clone(), scaffolder_for(&config));
            let summary = generator.run(schema_source.as_ref()).await?;

            for path in summary.models_written.iter().chain(&summary.screens_written) {
                println!("wrote {}", path.display());
            }
            for class in &summary.reserved {
                println!("skipped reserved class {}", class);
            }
            if summary.failed_lines > 0 {
                println!(
                    "{} relationship field(s) kept their scaffolded column, see warnings above",
                    summary.failed_lines
                );
            }
            Ok(())
        }
        Commands::DumpSchema { source, out } => {
            let config = GeneratorConfig::load_or_default(&source.config)?;
            let schema_source = schema_source(&source, &config)?;
            let schema = schema_source.load().await?;

            write_snapshot(&out, &schema)?;
            println!("wrote {} ({} tables)", out.display(), schema.tables.len());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
