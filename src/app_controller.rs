use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::app_config::Config;
use crate::dates::DateExtractor;
use crate::errors::MergeError;
use crate::file_utils::FileManager;
use crate::merge::{BinPacker, LineReport, PartLedger, PublicationLine, RunSummary, VolumeSink, VolumeWriter};

// @module: Application controller for merging publication lines

/// Name of the run log written next to the merged volumes
pub const ISSUES_LOG_FILENAME: &str = "magmerge.issues.log";

/// Main application controller for volume merging
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Compiled filename date patterns
    extractor: DateExtractor,
    // @field: Bin packer configured from the merge settings
    packer: BinPacker,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let extractor = config.merge.date_extractor()?;
        let packer = BinPacker::from_config(&config.merge);

        Ok(Self {
            config,
            extractor,
            packer,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merge every publication line (or the configured one) into volumes.
    ///
    /// Only a missing input root is fatal; every other failure is recorded in
    /// the returned summary.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        let input_dir = &self.config.input_dir;
        let output_dir = &self.config.output_dir;

        if !FileManager::dir_exists(input_dir) {
            return Err(MergeError::InputMissing(input_dir.display().to_string()).into());
        }

        FileManager::ensure_dir(output_dir)?;

        let ledger = Arc::new(
            PartLedger::scan(output_dir)
                .with_context(|| format!("Failed to scan output directory: {:?}", output_dir))?,
        );

        let line_dirs = self.discover_lines()?;
        if line_dirs.is_empty() {
            warn!("No publication lines found in {:?}", input_dir);
        } else {
            info!(
                "Found {} publication line(s), word limit {} per volume",
                line_dirs.len(),
                self.config.merge.max_words
            );
        }

        let progress_bar = ProgressBar::new(line_dirs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let results = self.run_lines(&line_dirs, &ledger, &progress_bar).await?;

        progress_bar.finish_and_clear();

        let mut summary = RunSummary::default();
        for result in results {
            match result {
                Ok(report) => summary.lines.push(report),
                Err(e) => {
                    error!("{}", e);
                    summary.missing_lines.push(e.to_string());
                }
            }
        }

        self.log_summary(&summary);

        let duration = start_time.elapsed();
        if let Err(e) = self.write_summary_log(&summary, duration) {
            warn!("Failed to write merge log: {}", e);
        }

        Ok(summary)
    }

    /// Merge a single publication line through `sink`
    pub fn merge_line<S>(&self, line_dir: &Path, sink: &mut S) -> Result<LineReport, MergeError>
    where
        S: VolumeSink + ?Sized,
    {
        let line = PublicationLine::load(
            line_dir,
            self.config.merge.normalized_extension(),
            &self.extractor,
            self.config.merge.issue_order,
        )?;

        info!("Processing {}: {} issue file(s)", line.name, line.len());

        let report = self.packer.pack(&line.name, line.issues(), sink);

        debug!(
            "{}: {} volume(s), {} skipped, {} failed",
            line.name,
            report.volumes.len(),
            report.skipped.len(),
            report.failed_volumes.len()
        );

        Ok(report)
    }

    /// Run lines on blocking workers, at most `concurrent_lines` at a time
    async fn run_lines(
        &self,
        line_dirs: &[PathBuf],
        ledger: &Arc<PartLedger>,
        progress_bar: &ProgressBar,
    ) -> Result<Vec<Result<LineReport, MergeError>>> {
        let workers = self.config.merge.concurrent_lines.clamp(1, line_dirs.len().max(1));
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(line_dirs.len());

        for line_dir in line_dirs {
            let permit = Arc::clone(&semaphore).acquire_owned().await?;
            let controller = self.clone();
            let line_dir = line_dir.clone();
            let mut writer = VolumeWriter::new(
                &self.config.output_dir,
                Arc::clone(ledger),
                self.config.merge.max_words,
            );
            let pb = progress_bar.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pb.set_message(Self::line_name(&line_dir));
                let result = controller.merge_line(&line_dir, &mut writer);
                pb.inc(1);
                result
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("Line worker panicked")?);
        }

        Ok(results)
    }

    /// Line directories to process, honouring the single-line restriction
    fn discover_lines(&self) -> Result<Vec<PathBuf>> {
        match &self.config.merge.magazine {
            Some(magazine) => Ok(vec![self.config.input_dir.join(magazine)]),
            None => FileManager::list_subdirectories(&self.config.input_dir),
        }
    }

    fn line_name(line_dir: &Path) -> String {
        line_dir
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn log_summary(&self, summary: &RunSummary) {
        for report in &summary.lines {
            if report.is_empty_line() {
                warn!("{}: no volumes created ({} issue files)", report.line, report.issues_found);
                continue;
            }

            info!("{}: {} volume(s), {} words", report.line, report.volumes.len(), report.total_words());
            for volume in &report.volumes {
                info!("  {}: {} words, {} issues", volume.filename, volume.word_count, volume.issue_count);
            }
        }

        if summary.has_failures() {
            warn!("{}", summary.summary_message());
        } else {
            info!("{}", summary.summary_message());
        }
        info!("Volumes saved in {}", self.config.output_dir.display());
    }

    /// Append the run summary and every contained failure to the issues log
    fn write_summary_log(&self, summary: &RunSummary, duration: std::time::Duration) -> Result<()> {
        let log_path = self.config.output_dir.join(ISSUES_LOG_FILENAME);

        FileManager::append_to_log_file(
            &log_path,
            &format!("{} - Duration: {}", summary.summary_message(), Self::format_duration(duration)),
        )?;

        for missing in &summary.missing_lines {
            FileManager::append_to_log_file(&log_path, &format!("[ERROR] {}", missing))?;
        }

        for report in &summary.lines {
            for skipped in &report.skipped {
                FileManager::append_to_log_file(&log_path, &format!("[WARN] {}: {}", report.line, skipped))?;
            }
            for failed in &report.failed_volumes {
                FileManager::append_to_log_file(&log_path, &format!("[ERROR] {}: {}", report.line, failed))?;
            }
            if report.is_empty_line() {
                FileManager::append_to_log_file(
                    &log_path,
                    &format!("[WARN] {}", MergeError::EmptyLine(report.line.clone())),
                )?;
            }
        }

        Ok(())
    }

    // Format duration in a human-readable format
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
