pub mod check;
pub mod eval;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use groundcrew::FactCheckConfig;

/// Options shared by every command that runs the pipeline.
///
/// Layering: preset, then the JSON file, then flags. The result is validated.
/// `--verbose` can only switch verbose logging on, never off.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Preset: balanced, quality or fast
    #[arg(long, default_value = "balanced")]
    pub preset: String,

    /// JSON file overriding preset fields
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chat model (e.g. gpt-4o-mini, gpt-4)
    #[arg(long)]
    pub model: Option<String>,

    /// Only use wikipedia.org as evidence
    #[arg(long)]
    pub wikipedia_only: bool,
}

impl ConfigArgs {
    pub fn resolve(&self, verbose: bool) -> Result<FactCheckConfig> {
        let mut config = FactCheckConfig::preset(&self.preset)?;

        if let Some(path) = &self.config {
            config = config
                .merge_json_file(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.as_str());
        }
        if self.wikipedia_only {
            config = config.wikipedia_only();
        }
        if verbose {
            config = config.with_verbose(true);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
