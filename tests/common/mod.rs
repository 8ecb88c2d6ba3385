/*!
 * Common test utilities for the magmerge test suite
 */

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Text made of `count` words
pub fn words(count: usize) -> String {
    vec!["lorem"; count].join(" ")
}

/// Creates an issue file whose body holds `count` words under a top-level heading
pub fn create_issue(line_dir: &Path, filename: &str, count: usize) -> Result<PathBuf> {
    let content = format!("# {}\n\n{}\n", filename, words(count));
    create_test_file(line_dir, filename, &content)
}

/// Sorted names of the files in a directory, excluding the run log
pub fn volume_names(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".md"))
        .collect();
    names.sort();
    Ok(names)
}

/// Initialize test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
