/*!
 * Per-line and per-run merge statistics.
 *
 * Every contained failure (skipped issue, lost volume, missing or empty line)
 * ends up here so the end-of-run summary can report it.
 */

use std::path::PathBuf;

use crate::dates::DateRange;

/// A volume that was written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeInfo {
    /// Volume filename
    pub filename: String,
    /// Full path of the written file
    pub path: PathBuf,
    /// Part index for the volume's base name (1 = unsuffixed)
    pub part: u32,
    /// Date range covered by the member issues
    pub date_range: DateRange,
    /// Number of member issues
    pub issue_count: usize,
    /// Word count of the persisted content, headers included
    pub word_count: usize,
    /// Member issue filenames in order
    pub issues: Vec<String>,
}

/// Outcome of merging one publication line
#[derive(Debug, Clone, Default)]
pub struct LineReport {
    /// Line name
    pub line: String,
    /// Issues offered to the packer
    pub issues_found: usize,
    /// Issues placed into a batch
    pub issues_merged: usize,
    /// Volumes written, in flush order
    pub volumes: Vec<VolumeInfo>,
    /// Issues skipped because they were unreadable or empty
    pub skipped: Vec<String>,
    /// Volumes lost to write failures
    pub failed_volumes: Vec<String>,
    /// Issues that were batched into a lost volume
    pub lost_issues: usize,
}

impl LineReport {
    /// Empty report for a line
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            ..Self::default()
        }
    }

    /// A volume write failed for this line
    pub fn is_degraded(&self) -> bool {
        !self.failed_volumes.is_empty()
    }

    /// No readable issue was found
    pub fn is_empty_line(&self) -> bool {
        self.issues_merged == 0
    }

    /// Words written across all volumes of the line
    pub fn total_words(&self) -> usize {
        self.volumes.iter().map(|v| v.word_count).sum()
    }
}

/// Aggregate outcome of a whole merge run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Reports of the lines that were processed
    pub lines: Vec<LineReport>,
    /// Lines that could not be opened, with the reason
    pub missing_lines: Vec<String>,
}

impl RunSummary {
    /// Number of lines that produced at least one volume without losing any
    pub fn successful_lines(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| !l.volumes.is_empty() && !l.is_degraded())
            .count()
    }

    /// Lines that yielded no readable issue
    pub fn empty_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.is_empty_line())
            .map(|l| l.line.as_str())
            .collect()
    }

    /// Lines with at least one failed volume write
    pub fn degraded_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.is_degraded())
            .map(|l| l.line.as_str())
            .collect()
    }

    pub fn issues_found(&self) -> usize {
        self.lines.iter().map(|l| l.issues_found).sum()
    }

    pub fn issues_merged(&self) -> usize {
        self.lines.iter().map(|l| l.issues_merged).sum()
    }

    pub fn issues_skipped(&self) -> usize {
        self.lines.iter().map(|l| l.skipped.len()).sum()
    }

    pub fn volumes_created(&self) -> usize {
        self.lines.iter().map(|l| l.volumes.len()).sum()
    }

    pub fn volumes_failed(&self) -> usize {
        self.lines.iter().map(|l| l.failed_volumes.len()).sum()
    }

    pub fn total_words(&self) -> usize {
        self.lines.iter().map(|l| l.total_words()).sum()
    }

    /// Whether any failure was contained during the run
    pub fn has_failures(&self) -> bool {
        !self.missing_lines.is_empty() || self.issues_skipped() > 0 || self.volumes_failed() > 0
    }

    /// One-line summary for logs
    pub fn summary_message(&self) -> String {
        format!(
            "Merge completed: {} lines ({} ok, {} empty, {} degraded, {} missing), {}/{} issues merged, {} skipped, {} volumes written, {} failed, {} words",
            self.lines.len() + self.missing_lines.len(),
            self.successful_lines(),
            self.empty_lines().len(),
            self.degraded_lines().len(),
            self.missing_lines.len(),
            self.issues_merged(),
            self.issues_found(),
            self.issues_skipped(),
            self.volumes_created(),
            self.volumes_failed(),
            self.total_words()
        )
    }
}
