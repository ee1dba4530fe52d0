use anyhow::{Result, Context};
use futures::stream::{self, StreamExt};
use log::{error, warn, info, debug};
use std::path::PathBuf;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::archive_utils::{ArchiveFetcher, ArchiveReader};
use crate::catalog::{self, CatalogSource, DictionaryJob, HttpCatalog};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::tei_converter;

// @module: Application controller orchestrating dictionary conversions

/// Substring identifying the TEI source file inside a release tarball
const TEI_MEMBER_PATTERN: &str = ".tei";

/// Outcome counts of one controller run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Language pairs converted and written
    pub converted: usize,

    /// Language pairs skipped because output already existed
    pub skipped: usize,

    /// Language pairs that failed with a fatal per-pair error
    pub failed: usize,
}

/// Main application controller for dictionary conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.dictionary.is_empty() && !self.config.catalog_url.is_empty()
    }

    /// Run the main workflow against the configured catalog
    pub async fn run(&self, force_overwrite: bool) -> Result<ConversionSummary> {
        let catalog_source = HttpCatalog::new(self.config.catalog_url.clone());
        self.run_with_catalog(&catalog_source, force_overwrite).await
    }

    /// Run the workflow with a caller-provided catalog source.
    ///
    /// Each selected language pair is converted as an independent task; a
    /// failure in one pair never aborts its siblings.
    pub async fn run_with_catalog(
        &self,
        catalog_source: &dyn CatalogSource,
        force_overwrite: bool,
    ) -> Result<ConversionSummary> {
        // Validate that we have a proper configuration
        if !self.is_initialized() {
            return Err(anyhow::anyhow!("Controller not properly initialized"));
        }

        let start_time = std::time::Instant::now();

        let entries = catalog_source.fetch().await?;
        let jobs = catalog::select_jobs(&entries, &self.config.dictionary)?;

        if jobs.is_empty() {
            warn!("Catalog contains no dictionaries with TEI source releases");
            return Ok(ConversionSummary::default());
        }

        info!("Selected {} dictionary conversion(s)", jobs.len());
        FileManager::ensure_dir(&self.config.output_dir)?;

        let fetcher = ArchiveFetcher::new(self.config.resolve_cache_dir())?;
        let multi_progress = MultiProgress::new();

        let outcomes: Vec<Result<JobOutcome>> = stream::iter(jobs)
            .map(|job| {
                let fetcher = &fetcher;
                let multi_progress = &multi_progress;
                async move {
                    self.convert_pair(job, fetcher, multi_progress, force_overwrite)
                        .await
                }
            })
            .buffer_unordered(self.config.concurrent_conversions)
            .collect()
            .await;

        let mut summary = ConversionSummary::default();
        for outcome in outcomes {
            match outcome {
                Ok(JobOutcome::Converted) => summary.converted += 1,
                Ok(JobOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("{}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Conversion completed: {} converted, {} skipped, {} errors in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Convert one language pair from its release tarball to an output file
    async fn convert_pair(
        &self,
        job: DictionaryJob,
        fetcher: &ArchiveFetcher,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<JobOutcome> {
        let pair = job.language_pair.clone();
        info!(
            "Processing language pair {} ({})...",
            pair,
            language_utils::pair_display_name(&pair)
        );

        let output_path = FileManager::generate_output_path(&self.config.output_dir, &pair, "xml");
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, output already exists (use -f to force overwrite)",
                pair
            );
            return Ok(JobOutcome::Skipped);
        }

        let archive_path = fetcher
            .fetch(&job.url)
            .await
            .with_context(|| format!("Failed to download archive for {}", pair))?;

        let tei_content = ArchiveReader::extract_required_member(&archive_path, TEI_MEMBER_PATTERN)
            .with_context(|| format!("Failed to extract TEI source for {}", pair))?;

        let progress_bar = multi_progress.add(ProgressBar::new_spinner());
        let template_result = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} entries)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress_bar.set_style(template_result);
        progress_bar.set_message(format!("Converting {}", pair));

        // The conversion itself is synchronous CPU work, so it runs on the
        // blocking pool to keep sibling downloads moving.
        let pb = progress_bar.clone();
        let output_xml = tokio::task::spawn_blocking(move || {
            tei_converter::convert_with_progress(&tei_content, |count| {
                pb.set_position(count as u64);
            })
        })
        .await
        .context("Conversion task panicked")?
        .with_context(|| format!("Failed to convert {}", pair))?;

        progress_bar.finish_and_clear();

        debug!("Writing to {:?}...", output_path);
        FileManager::write_to_file(&output_path, &output_xml)
            .with_context(|| format!("Failed to write output for {}", pair))?;

        info!("Success: {}", output_path.display());
        Ok(JobOutcome::Converted)
    }

    /// Expected output path for a language pair, exposed for tests
    pub fn output_path_for(&self, language_pair: &str) -> PathBuf {
        FileManager::generate_output_path(&self.config.output_dir, language_pair, "xml")
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Result of one language pair's conversion task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Converted,
    Skipped,
}
