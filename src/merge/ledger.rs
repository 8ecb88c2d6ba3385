/*!
 * Part-number ledger for merged volumes.
 *
 * Volumes sharing a base name (same line and date range) are told apart by a
 * `_partN` suffix. The ledger is bootstrapped once from the output directory
 * and then owns the `base name -> highest part` mapping for the run, so
 * concurrent writers reserve parts under one lock instead of racing on
 * directory scans.
 */

use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::file_utils::FileManager;

/// Extension of merged volume files
pub const VOLUME_EXTENSION: &str = "md";

static PART_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)_part([0-9]+)$").unwrap());

/// Split a volume filename into its base name and part index.
///
/// `<base>.md` is part 1, `<base>_partN.md` is part N. Anything else is not a
/// volume and yields `None`.
pub fn parse_volume_filename(filename: &str) -> Option<(String, u32)> {
    let stem = filename.strip_suffix(&format!(".{}", VOLUME_EXTENSION))?;
    if stem.is_empty() {
        return None;
    }

    if let Some(caps) = PART_SUFFIX_REGEX.captures(stem) {
        if let Ok(part) = caps[2].parse::<u32>() {
            return Some((caps[1].to_string(), part.max(1)));
        }
    }

    Some((stem.to_string(), 1))
}

/// Filename for a given base name and part index
pub fn volume_filename(base: &str, part: u32) -> String {
    if part > 1 {
        format!("{}_part{}.{}", base, part, VOLUME_EXTENSION)
    } else {
        format!("{}.{}", base, VOLUME_EXTENSION)
    }
}

/// Highest assigned part index per base name
#[derive(Debug, Default)]
pub struct PartLedger {
    parts: Mutex<HashMap<String, u32>>,
}

impl PartLedger {
    /// Empty ledger, for an output directory known to hold no volumes
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap the ledger from the volumes already present in `dir`
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let ledger = Self::new();
        if !FileManager::dir_exists(&dir) {
            return Ok(ledger);
        }

        let names = FileManager::file_names(&dir)?;
        for name in &names {
            ledger.record(name);
        }

        debug!("Part ledger bootstrapped with {} base names from {} files", ledger.len(), names.len());
        Ok(ledger)
    }

    /// Account for an existing file, ignoring names that are not volumes
    pub fn record(&self, filename: &str) {
        if let Some((base, part)) = parse_volume_filename(filename) {
            let mut parts = self.parts.lock();
            let highest = parts.entry(base).or_insert(0);
            *highest = (*highest).max(part);
        }
    }

    /// Highest part index taken for `base`, if any
    pub fn highest(&self, base: &str) -> Option<u32> {
        self.parts.lock().get(base).copied()
    }

    /// Reserve the next part index for `base` (1 when unused).
    ///
    /// Returns `None` once every part index for `base` is taken.
    pub fn reserve(&self, base: &str) -> Option<u32> {
        let mut parts = self.parts.lock();
        let next = match parts.get(base) {
            Some(highest) => highest.checked_add(1)?,
            None => 1,
        };
        parts.insert(base.to_string(), next);
        Some(next)
    }

    /// Give back a reservation whose write failed, if nothing was reserved after it
    pub fn release(&self, base: &str, part: u32) {
        let mut parts = self.parts.lock();
        if parts.get(base) == Some(&part) {
            if part <= 1 {
                parts.remove(base);
            } else {
                parts.insert(base.to_string(), part - 1);
            }
        }
    }

    /// Number of base names tracked
    pub fn len(&self) -> usize {
        self.parts.lock().len()
    }

    /// Whether no base name is tracked
    pub fn is_empty(&self) -> bool {
        self.parts.lock().is_empty()
    }
}
