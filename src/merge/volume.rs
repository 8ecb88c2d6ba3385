/*!
 * Rendering and persisting merged volumes.
 *
 * A volume file is named `<line>-<date range>[_partN].md`. Its content starts
 * with a synthesized title and a short quote block describing the batch,
 * followed by the issue blocks built during packing.
 */

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dates::DateRange;
use crate::errors::MergeError;
use crate::file_utils::FileManager;
use crate::merge::ledger::{volume_filename, PartLedger};
use crate::merge::packer::{Batch, VolumeSink};
use crate::merge::report::VolumeInfo;
use crate::text::count_words;

/// Characters replaced in line names used inside filenames
const UNSAFE_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Line name made safe for use in a filename
pub fn sanitize_line_name(line: &str) -> String {
    let cleaned: String = line
        .trim()
        .chars()
        .map(|c| {
            if c == '_' || c.is_control() || UNSAFE_FILENAME_CHARS.contains(&c) {
                '-'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Human-readable title for a line directory name (`the_economist` -> `The Economist`)
pub fn display_title(line: &str) -> String {
    let mut title = String::with_capacity(line.len());
    let mut at_word_start = true;

    for c in line.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if at_word_start {
                title.extend(c.to_uppercase());
            } else {
                title.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            title.push(c);
            at_word_start = true;
        }
    }

    title
}

/// Volume name without part suffix or extension
pub fn base_filename(line: &str, range: &DateRange) -> String {
    let name = sanitize_line_name(line);
    match range.label() {
        Some(label) => format!("{}-{}", name, label),
        None => format!("{}_merged", name),
    }
}

/// Group digits in thousands (`500000` -> `500,000`)
pub fn format_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Full text of a volume
pub fn render_volume(line: &str, range: &DateRange, part: u32, batch: &Batch, max_words: usize) -> String {
    let mut title = format!("# {}", display_title(line));
    if let Some(label) = range.label() {
        title.push_str(" - ");
        title.push_str(&label);
    }
    if part > 1 {
        title.push_str(&format!(" (Part {})", part));
    }

    let mut content = title;
    content.push_str("\n\n");
    content.push_str(&format!("> Issues in this volume: {}\n", batch.len()));
    if range.is_span() {
        content.push_str(&format!("> Date range: {}\n", range));
    }
    content.push_str(&format!("> Word limit: {} words\n", format_thousands(max_words)));

    for block in batch.blocks() {
        content.push_str(block);
    }

    if !content.ends_with('\n') {
        content.push('\n');
    }

    content
}

/// Writes batches as volume files into an output directory
#[derive(Debug, Clone)]
pub struct VolumeWriter {
    output_dir: PathBuf,
    ledger: Arc<PartLedger>,
    max_words: usize,
}

impl VolumeWriter {
    /// Writer sharing an existing ledger
    pub fn new<P: AsRef<Path>>(output_dir: P, ledger: Arc<PartLedger>, max_words: usize) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ledger,
            max_words,
        }
    }

    /// Writer with a ledger bootstrapped from the output directory
    pub fn open<P: AsRef<Path>>(output_dir: P, max_words: usize) -> anyhow::Result<Self> {
        let ledger = PartLedger::scan(&output_dir)?;
        Ok(Self::new(output_dir, Arc::new(ledger), max_words))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ledger(&self) -> &Arc<PartLedger> {
        &self.ledger
    }
}

impl VolumeSink for VolumeWriter {
    fn write_volume(&mut self, line: &str, batch: &Batch) -> Result<VolumeInfo, MergeError> {
        let range = batch.date_range();
        let base = base_filename(line, &range);
        let part = self.ledger.reserve(&base).ok_or_else(|| MergeError::VolumeWrite {
            file: volume_filename(&base, u32::MAX),
            reason: "no part number left for this volume name".to_string(),
        })?;
        let filename = volume_filename(&base, part);
        let path = self.output_dir.join(&filename);

        debug!("{}: writing {} issues to {}", line, batch.len(), path.display());

        let content = render_volume(line, &range, part, batch, self.max_words);
        if let Err(e) = FileManager::write_new_file(&path, &content) {
            // a file that appeared under this name keeps its part taken
            if !path.exists() {
                self.ledger.release(&base, part);
            }
            return Err(MergeError::VolumeWrite {
                file: filename,
                reason: format!("{:#}", e),
            });
        }

        Ok(VolumeInfo {
            filename,
            path,
            part,
            date_range: range,
            issue_count: batch.len(),
            word_count: count_words(&content),
            issues: batch.members().iter().map(|m| m.filename.clone()).collect(),
        })
    }
}
