/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use magmerge::file_utils::FileManager;
use crate::common;

/// Test that find_files only returns direct children with the extension, sorted
#[test]
fn test_find_files_withMixedEntries_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.2024.01.08.md", "b")?;
    common::create_test_file(dir, "a.2024.01.01.MD", "a")?;
    common::create_test_file(dir, "notes.txt", "n")?;
    common::create_test_file(&dir.join("nested"), "c.md", "c")?;

    let files = FileManager::find_files(dir, "md")?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.2024.01.01.MD", "b.2024.01.08.md"]);
    Ok(())
}

/// Test that list_subdirectories ignores files
#[test]
fn test_list_subdirectories_shouldReturnOnlyDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    fs::create_dir(dir.join("wired"))?;
    fs::create_dir(dir.join("the_economist"))?;
    common::create_test_file(dir, "stray.md", "x")?;

    let subdirs = FileManager::list_subdirectories(dir)?;

    assert_eq!(subdirs, vec![dir.join("the_economist"), dir.join("wired")]);
    Ok(())
}

/// Test that write_new_file never overwrites
#[test]
fn test_write_new_file_withExistingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("volume.md");

    FileManager::write_new_file(&path, "first")?;
    assert!(FileManager::write_new_file(&path, "second").is_err());
    assert_eq!(FileManager::read_to_string(&path)?, "first");
    Ok(())
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    assert!(!nested.is_file());
    Ok(())
}

/// Test that log lines are appended with a timestamp
#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("logs").join("run.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

/// Test that file_names lists regular files only
#[test]
fn test_file_names_shouldSkipDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "one.md", "1")?;
    fs::create_dir(temp_dir.path().join("sub"))?;

    let names = FileManager::file_names(temp_dir.path())?;

    assert_eq!(names, vec!["one.md".to_string()]);
    Ok(())
}
