/*!
 * Date extraction from issue filenames.
 *
 * Upstream converters name issue files after the publication date, in a
 * handful of layouts (`2024.01.06`, `2024-01-06`, `2024_01_06`, `20240106`).
 * `DateExtractor` tries an ordered list of patterns and keeps the first match
 * that is a real calendar date. `DateRange` turns the dates of a batch into the
 * labels used in volume filenames and headers.
 */

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::MergeError;

/// Default filename date patterns, in priority order
pub const DEFAULT_DATE_PATTERNS: [&str; 4] = [
    r"([0-9]{4})\.([0-9]{1,2})\.([0-9]{1,2})",
    r"([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})",
    r"([0-9]{4})_([0-9]{1,2})_([0-9]{1,2})",
    r"([0-9]{4})([0-9]{2})([0-9]{2})",
];

/// Format used for dates in volume filenames and titles
pub const LABEL_DATE_FORMAT: &str = "%Y.%m.%d";

static DEFAULT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_DATE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Parses publication dates out of filenames
#[derive(Debug, Clone)]
pub struct DateExtractor {
    patterns: Vec<Regex>,
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self {
            patterns: (*DEFAULT_REGEXES).clone(),
        }
    }
}

impl DateExtractor {
    /// Build an extractor from pattern sources.
    ///
    /// Each pattern must have exactly three capture groups: year, month, day.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, MergeError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let source = pattern.as_ref();
            let regex = Regex::new(source).map_err(|e| MergeError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })?;

            // captures_len includes the implicit whole-match group
            if regex.captures_len() != 4 {
                return Err(MergeError::InvalidPattern {
                    pattern: source.to_string(),
                    reason: format!(
                        "expected 3 capture groups (year, month, day), found {}",
                        regex.captures_len() - 1
                    ),
                });
            }
            compiled.push(regex);
        }

        Ok(Self { patterns: compiled })
    }

    /// Extract the first valid calendar date from a filename
    pub fn extract(&self, filename: &str) -> Option<NaiveDate> {
        self.patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(filename)?;
            let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
            let month = caps.get(2)?.as_str().parse::<u32>().ok()?;
            let day = caps.get(3)?.as_str().parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
    }

    /// Number of configured patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Span of publication dates covered by a batch of issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// None of the members carried a date
    Undated,
    /// Every dated member shares one date
    Single(NaiveDate),
    /// Earliest and latest member dates
    Span(NaiveDate, NaiveDate),
}

impl DateRange {
    /// Build the range covering the given (optional) dates
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = Option<NaiveDate>>,
    {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for date in dates.into_iter().flatten() {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
                None => (date, date),
            });
        }

        match bounds {
            None => Self::Undated,
            Some((lo, hi)) if lo == hi => Self::Single(lo),
            Some((lo, hi)) => Self::Span(lo, hi),
        }
    }

    /// Whether the range covers more than one distinct date
    pub fn is_span(&self) -> bool {
        matches!(self, Self::Span(..))
    }

    /// Filename-safe label, `None` for undated ranges
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Undated => None,
            Self::Single(date) => Some(date.format(LABEL_DATE_FORMAT).to_string()),
            Self::Span(lo, hi) => Some(format!(
                "{}-{}",
                lo.format(LABEL_DATE_FORMAT),
                hi.format(LABEL_DATE_FORMAT)
            )),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "undated"),
        }
    }
}
