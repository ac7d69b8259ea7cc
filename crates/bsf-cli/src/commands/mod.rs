//! Command implementations and dispatch logic.
//!
//! Every command works on a `CommandContext` holding the loaded store.
//! Handlers return the text to print, or `None` when the queried option is
//! not set anywhere on the section's ancestor chain.

use bsf_config::{ConfigLoader, ConfigStore};
use bsf_core::error::BsfResult;
use bsf_core::{Environment, PathNormalizer, SectionPath, SystemEnvironment};
use tracing::info;

pub mod inspect;
pub mod query;


use crate::{output::OutputHandler, Commands, OptionQuery};

/// Shared context for all commands
pub struct CommandContext {
    pub store: ConfigStore,
    pub normalizer: PathNormalizer<Box<dyn Environment>>,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Load the given files in order, or the default layers when none are given
    pub async fn load(config_files: &[String]) -> BsfResult<Self> {
        let loader = ConfigLoader::new();

        let store = if config_files.is_empty() {
            info!("Loading default configuration layers");
            loader.load_default().await?
        } else {
            info!("Loading configuration files: {:?}", config_files);
            loader.load_files(config_files).await?
        };

        let env: Box<dyn Environment> = Box::new(SystemEnvironment::new());
        let ctx = Self::with_store(store, PathNormalizer::new(env));
        if ctx.store.source_names().is_empty() {
            ctx.output.warn("no configuration files found, every option is unset");
        }

        Ok(ctx)
    }

    /// Context over an already loaded store
    pub fn with_store(store: ConfigStore, normalizer: PathNormalizer<Box<dyn Environment>>) -> Self {
        Self {
            store,
            normalizer,
            output: OutputHandler::new(),
        }
    }
}

/// Result of a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The option is not set and no fallback was given
    Absent,
}

impl OptionQuery {
    fn section_path(&self) -> BsfResult<SectionPath> {
        SectionPath::parse(&self.section)
    }
}

/// Dispatch a command to its handler and print what it returns
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> BsfResult<Outcome> {
    let value = match command {
        Commands::Get(query) => {
            info!("Resolving {}.{}", query.section, query.option);
            query::get(&query, ctx)?
        },
        Commands::Path { query, root } => {
            info!("Resolving path {}.{} (root: {:?})", query.section, query.option, root);
            query::path(&query, root.as_deref(), ctx)?
        },
        Commands::Size(query) => {
            info!("Resolving size {}.{}", query.section, query.option);
            query::size(&query, ctx)?
        },
        Commands::Duration(query) => {
            info!("Resolving duration {}.{}", query.section, query.option);
            query::duration(&query, ctx)?
        },
        Commands::Int { query, minimum } => {
            info!("Resolving integer {}.{} (minimum: {})", query.section, query.option, minimum);
            query::int(&query, minimum, ctx)?
        },
        Commands::Bool(query) => {
            info!("Resolving boolean {}.{}", query.section, query.option);
            query::boolean(&query, ctx)?
        },
        Commands::Sections => {
            info!("Listing sections");
            Some(inspect::sections(ctx))
        },
        Commands::Show { section, json } => {
            info!("Showing section {} (json: {})", section, json);
            Some(inspect::show(&section, json, ctx)?)
        },
        Commands::Resources { analysis, stage } => {
            info!("Resolving job resources for {} stage {}", analysis, stage);
            Some(inspect::resources(&analysis, &stage, ctx)?)
        },
    };

    match value {
        Some(text) => {
            ctx.output.value(&text);
            Ok(Outcome::Done)
        },
        None => Ok(Outcome::Absent),
    }
}
