//! Batch orchestration

use super::input::{extract_handle_from_link, read_column};
use crate::auth::Credential;
use crate::config::{InputConfig, QueryParameters};
use crate::error::Result;
use crate::output::existing_references;
use crate::pagination::{FetchOutcome, PaginationEngine, SaveOptions};
use crate::resolve::HandleResolver;
use crate::types::Handle;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Counts reported at the end of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Accounts downloaded
    pub accounts: usize,
    /// Accounts with no posts at all
    pub empty: usize,
    /// Rows fetched across all accounts
    pub rows: usize,
    /// Files written, in processing order
    pub files: Vec<PathBuf>,
}

/// Handles still to download, in first-seen order
///
/// Empty strings, duplicates and anything in `done` are dropped.
pub fn pending_handles<I, S>(candidates: I, done: &HashSet<String>) -> Vec<Handle>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            if candidate.is_empty() || done.contains(candidate) {
                return None;
            }
            if !seen.insert(candidate.to_string()) {
                return None;
            }
            Handle::parse(candidate).ok()
        })
        .collect()
}

/// Read the input file and subtract accounts already present in `output_dir`
pub fn plan_from_input(input: &InputConfig, output_dir: impl AsRef<Path>) -> Result<Vec<Handle>> {
    let links = read_column(&input.path, &input.column)?;
    let candidates = links
        .iter()
        .map(|link| extract_handle_from_link(link, &input.domain_marker));
    let done = existing_references(output_dir)?;

    Ok(pending_handles(candidates, &done))
}

/// Downloads accounts one after another
#[derive(Debug, Clone)]
pub struct BatchDriver {
    resolver: HandleResolver,
    engine: PaginationEngine,
    credential: Credential,
    params: QueryParameters,
    output_dir: PathBuf,
    save: bool,
}

impl BatchDriver {
    /// Create a driver that saves results under `output_dir`
    pub fn new(
        resolver: HandleResolver,
        engine: PaginationEngine,
        credential: Credential,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            engine,
            credential,
            params: QueryParameters::timeline_defaults(),
            output_dir: output_dir.into(),
            save: true,
        }
    }

    /// Replace the listing parameters
    #[must_use]
    pub fn with_params(mut self, params: QueryParameters) -> Self {
        self.params = params;
        self
    }

    /// Enable or disable writing result files
    #[must_use]
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve one handle and download its timeline
    pub async fn download_account(&self, handle: &Handle) -> Result<FetchOutcome> {
        let account_id = self.resolver.resolve(handle, &self.credential).await?;
        let save = self
            .save
            .then(|| SaveOptions::new(&self.output_dir, handle.as_str()));

        self.engine
            .fetch_and_save(
                &account_id,
                &self.credential,
                self.params.clone(),
                save.as_ref(),
            )
            .await
    }

    /// Download every handle in order, stopping at the first failure
    pub async fn run(&self, handles: &[Handle]) -> Result<BatchSummary> {
        info!("Downloading {} users...", handles.len());

        let mut summary = BatchSummary::default();
        for handle in handles {
            info!("Downloading {} ...", handle);
            let outcome = self.download_account(handle).await?;

            summary.accounts += 1;
            summary.rows += outcome.rows();
            if outcome.stop.is_empty_account() {
                summary.empty += 1;
            }
            if let Some(path) = outcome.saved_to {
                summary.files.push(path);
            }
        }

        info!(
            "Finished {} accounts ({} empty, {} rows)",
            summary.accounts, summary.empty, summary.rows
        );
        Ok(summary)
    }
}
