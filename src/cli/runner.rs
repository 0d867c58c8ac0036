//! CLI runner - executes commands

use crate::auth::{read_bearer_token, Credential};
use crate::batch::{plan_from_input, BatchDriver};
use crate::cli::commands::{Cli, Commands};
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::http::{lookup_limiter, page_limiter, HttpClient, HttpClientConfig};
use crate::pagination::PaginationEngine;
use crate::resolve::HandleResolver;
use crate::types::Handle;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Fetch { handle, no_save } => self.fetch(&config, handle, !*no_save).await,
            Commands::Batch {
                input,
                column,
                no_save,
            } => {
                let mut config = config;
                if let Some(input) = input {
                    config.input.path = input.clone();
                }
                if let Some(column) = column {
                    config.input.column = column.clone();
                }
                self.batch(&config, !*no_save).await
            }
            Commands::Resolve { handle } => self.resolve(&config, handle).await,
        }
    }

    /// Load the config file, then apply command-line overrides
    fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => HarvestConfig::load(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(token_file) = &self.cli.token_file {
            config.token_file = token_file.clone();
        }
        if let Some(output_dir) = &self.cli.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(base_url) = &self.cli.base_url {
            config.api.base_url = base_url.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn credential(config: &HarvestConfig) -> Result<Credential> {
        read_bearer_token(&config.token_file)
    }

    fn build_client(config: &HarvestConfig) -> Result<HttpClient> {
        HttpClient::with_config(HttpClientConfig::from(&config.api))
    }

    fn build_driver(config: &HarvestConfig, save: bool) -> Result<BatchDriver> {
        let credential = Self::credential(config)?;
        let client = Self::build_client(config)?;
        let resolver = HandleResolver::new(client.clone(), lookup_limiter(&config.rate_limit));
        let engine = PaginationEngine::new(client, page_limiter(&config.rate_limit)?);

        Ok(
            BatchDriver::new(resolver, engine, credential, config.output_dir.clone())
                .with_save(save),
        )
    }

    /// Download a single account
    async fn fetch(&self, config: &HarvestConfig, handle: &str, save: bool) -> Result<()> {
        let handle = Handle::parse(handle)?;
        let driver = Self::build_driver(config, save)?;
        let outcome = driver.download_account(&handle).await?;

        let location = outcome
            .saved_to
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not saved".to_string());
        println!(
            "{handle}: {} rows in {} requests ({}), {location}",
            outcome.rows(),
            outcome.requests,
            outcome.stop
        );
        Ok(())
    }

    /// Download every pending account from the input file
    async fn batch(&self, config: &HarvestConfig, save: bool) -> Result<()> {
        let handles = plan_from_input(&config.input, &config.output_dir)?;
        if handles.is_empty() {
            info!("Nothing to download");
            println!("Nothing to download");
            return Ok(());
        }

        let driver = Self::build_driver(config, save)?;
        let summary = driver.run(&handles).await?;

        println!(
            "Downloaded {} accounts ({} empty, {} rows) into {}",
            summary.accounts,
            summary.empty,
            summary.rows,
            config.output_dir.display()
        );
        Ok(())
    }

    /// Resolve a handle and print its identifier
    async fn resolve(&self, config: &HarvestConfig, handle: &str) -> Result<()> {
        let handle = Handle::parse(handle)?;
        let credential = Self::credential(config)?;
        let resolver = HandleResolver::new(
            Self::build_client(config)?,
            lookup_limiter(&config.rate_limit),
        );

        let account_id = resolver.resolve(&handle, &credential).await?;
        println!("{account_id}");
        Ok(())
    }
}
