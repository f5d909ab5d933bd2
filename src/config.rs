use anyhow::Context;
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "filamentize.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub models: ModelsConfig,
    pub scaffold: ScaffoldConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub snapshot: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub project_root: String,
    pub models_dir: String,
    pub models_namespace: String,
    pub resources_dir: String,
    pub resources_namespace: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            project_root: ".".to_string(),
            models_dir: "app/Models".to_string(),
            models_namespace: "App\\Models".to_string(),
            resources_dir: "app/Filament/Resources".to_string(),
            resources_namespace: "App\\Filament\\Resources".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Classes that already exist in the host application and are never generated.
    pub reserved: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            reserved: vec!["User".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldMode {
    /// Render resources in process
    Builtin,
    /// Run an external scaffold command per model
    Command,
}

impl Default for ScaffoldMode {
    fn default() -> Self {
        Self::Builtin
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub mode: ScaffoldMode,
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            mode: ScaffoldMode::Builtin,
            program: "php".to_string(),
            args: vec!["artisan".to_string(), "make:filament-resource".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub hints: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hints: vec!["name".to_string(), "title".to_string(), "text".to_string()],
        }
    }
}

impl GeneratorConfig {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        Self::from_toml(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to load config file {}: {e:#}",
                config_path.display()
            )
        })
    }

    /// Falls back to the defaults when `config_path` does not exist.
    pub fn load_or_default(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let mut config: GeneratorConfig = toml::from_str(raw)?;
        config.expand_env()?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn project_root(&self) -> PathBuf {
        PathBuf::from(&self.output.project_root)
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root().join(p)
        }
    }

    pub fn models_dir(&self) -> PathBuf {
        self.resolve_path(&self.output.models_dir)
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.resolve_path(&self.output.resources_dir)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(url) = self.database.url.as_mut() {
            *url = expand_env_vars(url)?;
        }
        if let Some(snapshot) = self.database.snapshot.as_mut() {
            *snapshot = expand_env_vars(snapshot)?;
        }

        let output = &mut self.output;
        for value in [
            &mut output.project_root,
            &mut output.models_dir,
            &mut output.resources_dir,
        ] {
            *value = expand_env_vars(value)?;
        }

        self.scaffold.program = expand_env_vars(&self.scaffold.program)?;
        for arg in &mut self.scaffold.args {
            *arg = expand_env_vars(arg)?;
        }

        Ok(())
    }

    /// Column names are matched lowercased, so the hints are too.
    fn normalize(&mut self) {
        for hint in &mut self.display.hints {
            *hint = hint.trim().to_lowercase();
        }
        self.display.hints.retain(|hint| !hint.is_empty());
    }

    fn validate(&self) -> anyhow::Result<()> {
        let output = &self.output;
        for (key, value) in [
            ("output.project_root", &output.project_root),
            ("output.models_dir", &output.models_dir),
            ("output.models_namespace", &output.models_namespace),
            ("output.resources_dir", &output.resources_dir),
            ("output.resources_namespace", &output.resources_namespace),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{key} must not be empty");
            }
        }

        if self.scaffold.mode == ScaffoldMode::Command && self.scaffold.program.trim().is_empty() {
            anyhow::bail!("scaffold.program must not be empty in command mode");
        }

        if self.display.hints.is_empty() {
            anyhow::bail!("display.hints must list at least one column hint");
        }

        Ok(())
    }
}

/// Replaces each `${VAR}` in `value` with the variable's contents. A bare `$`
/// is kept as is.
fn expand_env_vars(value: &str) -> anyhow::Result<String> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];

        let end = reference
            .find('}')
            .ok_or_else(|| anyhow::anyhow!("unterminated env var reference in {value:?}"))?;
        let name = &reference[..end];
        if name.is_empty() {
            anyhow::bail!("empty env var reference in {value:?}");
        }

        let var = std::env::var(name)
            .with_context(|| format!("config references unset env var {name}"))?;
        expanded.push_str(&var);
        rest = &reference[end + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}
