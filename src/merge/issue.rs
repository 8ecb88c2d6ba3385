/*!
 * Publication lines and the issues they contain.
 *
 * A publication line is one subdirectory of the input tree. Its issue files are
 * listed and ordered up front, but each issue's text is only read when the
 * packer asks for it, and dropped once folded into a batch.
 */

use chrono::NaiveDate;
use log::debug;
use std::path::{Path, PathBuf};

use crate::app_config::IssueOrder;
use crate::dates::DateExtractor;
use crate::errors::MergeError;
use crate::file_utils::FileManager;

/// An issue file that has been listed but not read yet
#[derive(Debug, Clone)]
pub struct IssueEntry {
    /// Full path of the issue file
    pub path: PathBuf,
    /// Filename including extension
    pub filename: String,
    /// Filename without extension
    pub stem: String,
    /// Publication date parsed from the filename
    pub date: Option<NaiveDate>,
    /// 1-based position within the ordered line
    pub index: usize,
}

impl IssueEntry {
    /// Describe a file path; the index is assigned once the line is ordered
    pub fn from_path(path: PathBuf, extractor: &DateExtractor) -> Self {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone());
        let date = extractor.extract(&filename);

        Self {
            path,
            filename,
            stem,
            date,
            index: 0,
        }
    }

    /// Read and trim the issue text
    pub fn read(&self) -> Result<Issue, MergeError> {
        let raw = FileManager::read_to_string(&self.path).map_err(|e| MergeError::IssueRead {
            file: self.filename.clone(),
            reason: format!("{:#}", e),
        })?;

        let text = raw.trim();
        if text.is_empty() {
            return Err(MergeError::EmptyIssue(self.filename.clone()));
        }

        Ok(Issue {
            filename: self.filename.clone(),
            stem: self.stem.clone(),
            date: self.date,
            index: self.index,
            text: text.to_string(),
        })
    }
}

/// One source document with its text loaded
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Filename including extension
    pub filename: String,
    /// Filename without extension
    pub stem: String,
    /// Publication date parsed from the filename
    pub date: Option<NaiveDate>,
    /// 1-based position within the ordered line
    pub index: usize,
    /// Trimmed text content
    pub text: String,
}

impl Issue {
    /// Build an in-memory issue, deriving stem and date from the filename
    pub fn new(filename: &str, index: usize, text: &str, extractor: &DateExtractor) -> Self {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string());

        Self {
            filename: filename.to_string(),
            stem,
            date: extractor.extract(filename),
            index,
            text: text.trim().to_string(),
        }
    }

    /// Label used in the per-issue header: the date when known, else the stem
    pub fn title(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.stem.clone(),
        }
    }
}

/// A periodical's directory of issues, in packing order
#[derive(Debug, Clone)]
pub struct PublicationLine {
    /// Directory name, used in volume names and titles
    pub name: String,
    /// Line directory
    pub dir: PathBuf,
    /// Issues in packing order
    pub entries: Vec<IssueEntry>,
}

impl PublicationLine {
    /// List and order the issue files of a line directory
    pub fn load(
        dir: &Path,
        extension: &str,
        extractor: &DateExtractor,
        order: IssueOrder,
    ) -> Result<Self, MergeError> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| dir.display().to_string());

        if !FileManager::dir_exists(dir) {
            return Err(MergeError::InputMissing(dir.display().to_string()));
        }

        let files = FileManager::find_files(dir, extension)
            .map_err(|e| MergeError::InputMissing(format!("{} ({:#})", dir.display(), e)))?;

        let entries = files
            .into_iter()
            .map(|path| IssueEntry::from_path(path, extractor))
            .collect();

        Ok(Self::from_entries(name, dir.to_path_buf(), entries, order))
    }

    /// Order entries and assign their sequence indexes
    pub fn from_entries(name: String, dir: PathBuf, mut entries: Vec<IssueEntry>, order: IssueOrder) -> Self {
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));

        if order == IssueOrder::Date {
            if entries.iter().all(|e| e.date.is_some()) {
                entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.filename.cmp(&b.filename)));
            } else {
                debug!("{}: some issues have no date, keeping filename order", name);
            }
        }

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.index = i + 1;
        }

        Self { name, dir, entries }
    }

    /// Number of listed issue files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the line has no issue files at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read issues one at a time, in order
    pub fn issues(&self) -> impl Iterator<Item = Result<Issue, MergeError>> + '_ {
        self.entries.iter().map(IssueEntry::read)
    }
}
