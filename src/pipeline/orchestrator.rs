//! Convert and check workflows

use chrono::{Local, NaiveDateTime};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{OutputConfig, ProbeConfig};
use crate::errors::{AppResult, InputError, RewriteError, RewriteResult};
use crate::ingestor::Deduplicator;
use crate::models::{ChannelRecord, ProbeSummary};
use crate::playlist::generator::group_records;
use crate::playlist::{PlaylistGenerator, PlaylistRewriter, render_not_working, render_report};
use crate::services::StreamProber;
use crate::sources::{FeedLoader, M3uParser};
use crate::utils::{ProbeHttpClient, format_percent};

/// What a `check` run should produce besides the probe summary
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub playlist: PathBuf,
    pub probe: ProbeConfig,
    /// Detailed text report destination
    pub report_file: Option<PathBuf>,
    /// Write separate working and not-working playlists
    pub split: bool,
    /// Remove not-working entries from the playlist itself
    pub update_original: bool,
    /// Copy the playlist aside before updating it
    pub backup: bool,
    pub working_file: Option<PathBuf>,
    pub not_working_file: Option<PathBuf>,
}

impl CheckOptions {
    pub fn new(playlist: impl Into<PathBuf>, probe: ProbeConfig) -> Self {
        Self {
            playlist: playlist.into(),
            probe,
            report_file: None,
            split: false,
            update_original: false,
            backup: true,
            working_file: None,
            not_working_file: None,
        }
    }
}

/// Counts and artifacts of a `check` run
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
    pub invalid: usize,
    /// Lines dropped from the original by the in-place update
    pub lines_removed: usize,
    pub written: Vec<PathBuf>,
    pub backup: Option<PathBuf>,
    /// Output targets that could not be produced
    pub errors: Vec<RewriteError>,
}

impl CheckOutcome {
    pub fn not_working(&self) -> usize {
        self.failed + self.invalid
    }
}

/// Inputs of a `convert` run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub feed_folder: PathBuf,
    pub output_file: PathBuf,
    /// Probe the generated playlist and prune it in place
    pub run_check: bool,
    pub backup: bool,
    pub probe: ProbeConfig,
}

/// Result of a `convert` run
#[derive(Debug)]
pub struct ConvertOutcome {
    pub channels: usize,
    pub duplicates_removed: usize,
    pub output_file: PathBuf,
    pub check: Option<CheckOutcome>,
}

/// Runs the curation workflows
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    output: OutputConfig,
    generated_at: Option<NaiveDateTime>,
}

impl Orchestrator {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            generated_at: None,
        }
    }

    /// Stamp generated artifacts with a fixed time instead of the wall clock
    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.generated_at.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Feed folder -> deduplicated playlist, optionally checked and pruned
    pub async fn convert<C: ProbeHttpClient>(&self, client: C, options: &ConvertOptions) -> AppResult<ConvertOutcome> {
        let documents = FeedLoader::new(&options.feed_folder).load().await?;

        let mut deduplicator = Deduplicator::new();
        for document in documents {
            deduplicator.extend(document.entries);
        }
        let deduplicated = deduplicator.finish();

        if deduplicated.records.is_empty() {
            return Err(InputError::NoChannels {
                path: options.feed_folder.clone(),
            }
            .into());
        }

        let playlist = PlaylistGenerator::new(self.timestamp())
            .generate(&deduplicated.records, deduplicated.duplicates_removed);
        write_atomic(&options.output_file, &playlist).await?;

        info!("M3U file created: {}", options.output_file.display());
        info!("Total channels added: {}", deduplicated.records.len());
        info!("Duplicates removed: {}", deduplicated.duplicates_removed);
        log_categories(&deduplicated.records);

        let check = if options.run_check {
            info!("Testing and cleaning {}", options.output_file.display());
            let check_options = CheckOptions {
                update_original: true,
                backup: options.backup,
                ..CheckOptions::new(&options.output_file, options.probe.clone())
            };
            Some(self.check(client, &check_options).await?)
        } else {
            None
        };

        Ok(ConvertOutcome {
            channels: deduplicated.records.len(),
            duplicates_removed: deduplicated.duplicates_removed,
            output_file: options.output_file.clone(),
            check,
        })
    }

    /// Playlist -> probe results -> requested artifacts
    ///
    /// Input problems are fatal. A failure to produce one artifact is logged
    /// and recorded in the outcome while the remaining artifacts are still
    /// attempted.
    pub async fn check<C: ProbeHttpClient>(&self, client: C, options: &CheckOptions) -> AppResult<CheckOutcome> {
        let playlist = options.playlist.as_path();
        info!("Parsing M3U file: {}", playlist.display());

        let content = tokio::fs::read_to_string(playlist)
            .await
            .map_err(|e| InputError::from_io(playlist, e))?;

        let records = M3uParser::new().parse(&content);
        if records.is_empty() {
            return Err(InputError::NoChannels {
                path: playlist.to_path_buf(),
            }
            .into());
        }
        info!("Found {} channels", records.len());

        let prober = StreamProber::new(client, &options.probe);
        let results = prober.probe_all(&records).await;
        let summary = ProbeSummary::from_results(&results);
        log_summary(&summary);

        let generated_at = self.timestamp();
        let rewriter = PlaylistRewriter::from_results(&content, &results);
        let mut outcome = CheckOutcome {
            total: summary.total(),
            working: summary.working.len(),
            failed: summary.failed.len(),
            invalid: summary.invalid.len(),
            ..CheckOutcome::default()
        };

        if let Some(report_file) = &options.report_file {
            let report = render_report(&summary, generated_at);
            outcome.record(write_plain(report_file, &report).await, report_file);
        }

        let not_working_file = options
            .not_working_file
            .clone()
            .unwrap_or_else(|| self.output.not_working_path(playlist));

        if options.split {
            let working_file = options
                .working_file
                .clone()
                .unwrap_or_else(|| self.output.working_path(playlist));

            let written = write_plain(&working_file, &rewriter.working()).await;
            if written.is_ok() {
                info!("Working streams saved to: {} ({} streams)", working_file.display(), outcome.working);
            }
            outcome.record(written, &working_file);

            let written = write_plain(&not_working_file, &rewriter.not_working(&summary, generated_at)).await;
            if written.is_ok() {
                info!(
                    "Not working streams saved to: {} ({} streams)",
                    not_working_file.display(),
                    outcome.not_working()
                );
            }
            outcome.record(written, &not_working_file);
        }

        if options.update_original {
            self.update_original(playlist, &rewriter, options.backup, &mut outcome)
                .await;
        }

        if !options.split && outcome.not_working() > 0 {
            let written = write_plain(&not_working_file, &render_not_working(&summary, generated_at)).await;
            if written.is_ok() {
                info!(
                    "Not working streams saved to: {} ({} streams)",
                    not_working_file.display(),
                    outcome.not_working()
                );
            }
            outcome.record(written, &not_working_file);
        }

        Ok(outcome)
    }

    async fn update_original(
        &self,
        playlist: &Path,
        rewriter: &PlaylistRewriter<'_>,
        backup: bool,
        outcome: &mut CheckOutcome,
    ) {
        if outcome.not_working() == 0 {
            info!("No failed streams to remove from {}", playlist.display());
            return;
        }

        if backup {
            let backup_file = self.output.backup_path(playlist);
            match tokio::fs::copy(playlist, &backup_file).await {
                Ok(_) => {
                    info!("Backup created: {}", backup_file.display());
                    outcome.backup = Some(backup_file);
                }
                Err(source) => {
                    // Never rewrite without a backup once one was asked for
                    let err = RewriteError::Backup {
                        path: backup_file,
                        source,
                    };
                    error!("{}; original left untouched", err);
                    outcome.errors.push(err);
                    return;
                }
            }
        }

        let pruned = rewriter.prune();
        let classification = rewriter.classification();
        let removed = classification
            .dead_descriptors
            .union(&classification.dead_endpoints)
            .count();

        match write_atomic(playlist, &pruned).await {
            Ok(()) => {
                info!(
                    "Original file updated: {} (removed {} not working streams)",
                    playlist.display(),
                    outcome.not_working()
                );
                outcome.lines_removed = removed;
                outcome.written.push(playlist.to_path_buf());
            }
            Err(err) => {
                error!("{}", err);
                outcome.errors.push(err);
            }
        }
    }
}

impl CheckOutcome {
    fn record(&mut self, written: RewriteResult<()>, path: &Path) {
        match written {
            Ok(()) => self.written.push(path.to_path_buf()),
            Err(err) => {
                error!("{}", err);
                self.errors.push(err);
            }
        }
    }
}

fn log_summary(summary: &ProbeSummary<'_, '_>) {
    info!("Total streams tested: {}", summary.total());
    info!(
        "✓ Working: {} ({})",
        summary.working.len(),
        format_percent(summary.percent(summary.working.len()))
    );
    info!(
        "✗ Failed: {} ({})",
        summary.failed.len(),
        format_percent(summary.percent(summary.failed.len()))
    );
    info!(
        "⚠ Invalid URLs: {} ({})",
        summary.invalid.len(),
        format_percent(summary.percent(summary.invalid.len()))
    );
}

fn log_categories(records: &[ChannelRecord]) {
    for (tag, members) in group_records(records) {
        info!("  {}: {}", tag, members.len());
    }
}

async fn write_plain(path: &Path, content: &str) -> RewriteResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| RewriteError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Replace `path` by staging the content in a sibling temp file and renaming it
async fn write_atomic(path: &Path, content: &str) -> RewriteResult<()> {
    let target = path.to_path_buf();
    let content = content.to_owned();

    let staged = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        if let Ok(metadata) = std::fs::metadata(&target) {
            file.as_file().set_permissions(metadata.permissions())?;
        }
        file.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .unwrap_or_else(|join_error| Err(std::io::Error::other(join_error)));

    staged.map_err(|source| RewriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
