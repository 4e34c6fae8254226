//! Analyze command — infers repository conventions and emits a spec document.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::config::{ConfigManager, Settings};
use crate::data::{self, SpecDocument, ToolingSection};
use crate::detect;
use crate::history::{self, HistoryOptions};
use crate::llm::ConventionRefiner;

/// Serialization format for the emitted document.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// YAML document (default).
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Analyze command options.
#[derive(Parser)]
pub struct AnalyzeCommand {
    /// Path to the repository to analyze.
    #[arg(value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Serialization format for the generated document.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Optional file to write the document to instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Number of commits to sample for history analysis.
    #[arg(long)]
    pub max_commits: Option<usize>,

    /// Disable LLM-assisted convention refinement.
    #[arg(long)]
    pub no_llm: bool,

    /// Provider label for convention refinement (reference only).
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// Model to use for convention refinement.
    #[arg(long)]
    pub llm_model: Option<String>,

    /// API key for the refinement endpoint.
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible refinement endpoint.
    #[arg(long)]
    pub llm_base_url: Option<String>,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub async fn execute(self) -> Result<()> {
        let settings = self.effective_settings()?;

        let refiner = if settings.llm.enabled {
            match ConventionRefiner::from_settings(&settings.llm) {
                Ok(refiner) => Some(refiner),
                Err(err) => {
                    warn!(
                        error = %err,
                        "Convention refiner unavailable; using rule-based detection only"
                    );
                    None
                }
            }
        } else {
            None
        };

        let options = HistoryOptions {
            max_commits: settings.max_commits,
            refiner,
        };
        let metrics = history::analyze_history(&self.repo, &options).await;

        let language_stack = detect::detect_languages(&self.repo);
        let tooling = ToolingSection {
            package_managers: detect::detect_package_managers(&self.repo),
            ci_systems: detect::detect_ci_systems(&self.repo),
        };

        let document = SpecDocument::assemble(&self.repo, language_stack, tooling, metrics);
        let rendered = match self.format {
            OutputFormat::Yaml => data::to_yaml(&document)?,
            OutputFormat::Json => data::to_json(&document)?,
        };

        if let Some(path) = &self.output {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!("Spec written to {}", path.display());
        } else {
            println!("{rendered}");
        }

        Ok(())
    }

    /// Loads settings and applies command-line overrides.
    fn effective_settings(&self) -> Result<Settings> {
        let mut settings = ConfigManager::new().load_settings()?;

        if let Some(max_commits) = self.max_commits {
            settings.max_commits = max_commits;
        }
        if self.no_llm {
            settings.llm.enabled = false;
        }
        if let Some(provider) = &self.llm_provider {
            settings.llm.provider = provider.clone();
        }
        if let Some(model) = &self.llm_model {
            settings.llm.model = model.clone();
        }
        if let Some(api_key) = &self.llm_api_key {
            settings.llm.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.llm_base_url {
            settings.llm.base_url = Some(base_url.clone());
        }

        Ok(settings)
    }
}
