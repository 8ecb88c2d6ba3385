/*!
 * Streaming bin-packing of issues into volumes.
 *
 * Issues arrive in publication order and are appended to the current batch
 * until the next one would push it past the word ceiling; the batch is then
 * handed to a `VolumeSink` and a new one starts. Order is never changed, so
 * each volume covers a contiguous stretch of the line. The ceiling is soft: an
 * issue that is larger than the ceiling on its own still becomes a volume,
 * never split.
 */

use chrono::NaiveDate;
use log::{debug, error, info, warn};

use crate::app_config::MergeConfig;
use crate::dates::DateRange;
use crate::errors::MergeError;
use crate::merge::issue::Issue;
use crate::merge::report::{LineReport, VolumeInfo};
use crate::text::{count_words, shift_headings, HEADING_OFFSET};

/// Receives full batches and persists them as volumes
pub trait VolumeSink {
    /// Persist one batch of `line` as a volume
    fn write_volume(&mut self, line: &str, batch: &Batch) -> Result<VolumeInfo, MergeError>;
}

/// Identity of an issue inside a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchMember {
    pub filename: String,
    pub date: Option<NaiveDate>,
    pub index: usize,
}

/// Issues accumulated for the next volume
#[derive(Debug, Clone, Default)]
pub struct Batch {
    blocks: Vec<String>,
    word_count: usize,
    members: Vec<BatchMember>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue's content block
    pub fn push(&mut self, block: String, words: usize, member: BatchMember) {
        self.blocks.push(block);
        self.word_count += words;
        self.members.push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of member issues
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Sum of the member blocks' word counts
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn members(&self) -> &[BatchMember] {
        &self.members
    }

    /// Range spanned by the members' dates
    pub fn date_range(&self) -> DateRange {
        DateRange::from_dates(self.members.iter().map(|m| m.date))
    }
}

/// Packs an ordered issue stream into volumes under a word ceiling
#[derive(Debug, Clone)]
pub struct BinPacker {
    max_words: usize,
    heading_offset: usize,
}

impl BinPacker {
    /// Packer with the given ceiling and the default heading offset
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words,
            heading_offset: HEADING_OFFSET,
        }
    }

    /// Packer configured from the merge settings
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            max_words: config.max_words,
            heading_offset: config.heading_offset,
        }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Content block for one issue: separator, issue header, demoted text
    pub fn issue_block(&self, issue: &Issue) -> String {
        format!(
            "\n\n---\n\n### Issue {} - {}\n{}",
            issue.index,
            issue.title(),
            shift_headings(&issue.text, self.heading_offset)
        )
    }

    /// Pack `issues` of `line` into volumes written through `sink`.
    ///
    /// Unreadable issues are skipped and failed volume writes are recorded;
    /// neither stops the scan.
    pub fn pack<I, S>(&self, line: &str, issues: I, sink: &mut S) -> LineReport
    where
        I: IntoIterator<Item = Result<Issue, MergeError>>,
        S: VolumeSink + ?Sized,
    {
        let mut report = LineReport::new(line);
        let mut batch = Batch::new();

        for item in issues {
            report.issues_found += 1;

            let issue = match item {
                Ok(issue) => issue,
                Err(e) => {
                    warn!("{}: skipping issue: {}", line, e);
                    report.skipped.push(e.to_string());
                    continue;
                }
            };

            let block = self.issue_block(&issue);
            let words = count_words(&block);

            if !batch.is_empty() && batch.word_count() + words > self.max_words {
                self.flush(line, &mut batch, sink, &mut report);
            }

            if words > self.max_words {
                debug!(
                    "{}: issue {} has {} words, above the {} word ceiling; it gets its own volume",
                    line, issue.filename, words, self.max_words
                );
            }

            batch.push(
                block,
                words,
                BatchMember {
                    filename: issue.filename,
                    date: issue.date,
                    index: issue.index,
                },
            );
            report.issues_merged += 1;
            debug!("{}: batch now holds {} issues ({} words)", line, batch.len(), batch.word_count());
        }

        if !batch.is_empty() {
            self.flush(line, &mut batch, sink, &mut report);
        }

        if report.is_empty_line() {
            warn!("{}", MergeError::EmptyLine(line.to_string()));
        }

        report
    }

    fn flush<S>(&self, line: &str, batch: &mut Batch, sink: &mut S, report: &mut LineReport)
    where
        S: VolumeSink + ?Sized,
    {
        let full = std::mem::take(batch);

        match sink.write_volume(line, &full) {
            Ok(volume) => {
                info!(
                    "Created {} ({} words, {} issues)",
                    volume.filename, volume.word_count, volume.issue_count
                );
                report.volumes.push(volume);
            }
            Err(e) => {
                error!("{}: {}", line, e);
                report.failed_volumes.push(e.to_string());
                report.lost_issues += full.len();
            }
        }
    }
}
