//! Batch driver: runs inspect -> plan -> encode for each file in turn.
//!
//! Files are processed strictly one after another. A failure is logged,
//! recorded in the [`BatchReport`] and the loop moves on; only cancellation
//! stops the batch.

use std::path::{Path, PathBuf};

use ccast_av::{Encoder, Inspector};
use ccast_core::{Container, EncodePlan, Error, Planner, Result};
use tokio_util::sync::CancellationToken;

/// Per-run options taken from the command line.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub container: Container,
    pub suffix: String,
    pub dry_run: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            container: Container::default(),
            suffix: "_new".into(),
            dry_run: false,
        }
    }
}

/// How a single file ended up.
#[derive(Debug)]
pub enum FileOutcome {
    /// The encoder produced `output`.
    Converted { output: PathBuf },
    /// Nothing to do; the file already plays as-is.
    Skipped,
    /// Dry run: the plan that would have been executed.
    Planned(EncodePlan),
    Failed(Error),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Outcomes of every file that was attempted, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Failed(e) => Some((f.path.as_path(), e)),
            _ => None,
        })
    }

    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Converted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Planned(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Drives a batch of files through an [`Inspector`] and an [`Encoder`].
pub struct BatchDriver<'a> {
    inspector: &'a dyn Inspector,
    encoder: &'a dyn Encoder,
    planner: Planner<'a>,
    options: BatchOptions,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        inspector: &'a dyn Inspector,
        encoder: &'a dyn Encoder,
        planner: Planner<'a>,
        options: BatchOptions,
    ) -> Self {
        Self {
            inspector,
            encoder,
            planner,
            options,
        }
    }

    /// Process `paths` sequentially.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if `cancel` fires; files after the one in
    /// flight are never started. Every other error is recorded per file.
    pub async fn run(&self, paths: &[PathBuf], cancel: &CancellationToken) -> Result<BatchReport> {
        tracing::debug!(
            "Transcoding {} file(s) with {} and {}",
            paths.len(),
            self.inspector.name(),
            self.encoder.name()
        );
        let mut report = BatchReport::default();

        for (i, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!("Cancelled; {} file(s) not processed", paths.len() - i);
                return Err(Error::Cancelled);
            }

            let outcome = match self.process_file(path, cancel).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => {
                    tracing::warn!(
                        "[{}] cancelled; {} file(s) not processed",
                        path.display(),
                        paths.len() - i - 1
                    );
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("{e}");
                    FileOutcome::Failed(e)
                }
            };

            report.files.push(FileReport {
                path: path.clone(),
                outcome,
            });
        }

        Ok(report)
    }

    async fn process_file(&self, path: &Path, cancel: &CancellationToken) -> Result<FileOutcome> {
        tracing::debug!("[{}] inspecting", path.display());
        let probe = self.inspector.inspect(path, cancel).await?;

        let plan = self
            .planner
            .plan(&probe, path, self.options.container, &self.options.suffix);
        tracing::debug!(
            "[{}] plan: video={} audio={} output={} skip={}",
            path.display(),
            plan.video,
            plan.audio,
            plan.output.display(),
            plan.skip
        );

        if plan.skip {
            tracing::info!("[{}] no conversion required", path.display());
            return Ok(FileOutcome::Skipped);
        }

        if self.options.dry_run {
            return Ok(FileOutcome::Planned(plan));
        }

        let output = self.encoder.encode(&plan, path, cancel).await?;
        let captured = output.combined();
        if !captured.trim().is_empty() {
            tracing::debug!(
                "[{}] {} output:\n{}",
                path.display(),
                output.program,
                captured.trim_end()
            );
        }
        tracing::info!("[{}] converted to {}", path.display(), plan.output.display());

        Ok(FileOutcome::Converted {
            output: plan.output,
        })
    }
}
