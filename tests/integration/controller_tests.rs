/*!
 * Full controller runs over an input tree
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use magmerge::app_config::Config;
use magmerge::app_controller::{Controller, ISSUES_LOG_FILENAME};
use crate::common;

fn config_for(root: &Path, max_words: usize) -> Config {
    let mut config = Config::default();
    config.input_dir = root.join("converted_md");
    config.output_dir = root.join("merged");
    config.merge.max_words = max_words;
    config
}

/// Two healthy lines, one line with only an empty issue and one unreadable issue
fn create_input_tree(root: &Path) -> Result<()> {
    let input = root.join("converted_md");
    common::create_issue(&input.join("the_economist"), "TheEconomist.2024.01.06.md", 40)?;
    common::create_issue(&input.join("the_economist"), "TheEconomist.2024.01.13.md", 40)?;
    common::create_issue(&input.join("the_economist"), "TheEconomist.2024.01.20.md", 40)?;
    common::create_issue(&input.join("wired"), "wired-2024-01-01.md", 30)?;
    fs::write(input.join("wired").join("wired-2024-02-01.md"), [0xff, 0xfe, 0x00])?;
    common::create_test_file(&input.join("blank"), "blank-2024-01-01.md", "\n\n")?;
    Ok(())
}

#[test]
fn test_run_withInputTree_shouldMergeEveryLine() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    create_input_tree(temp_dir.path())?;
    let config = config_for(temp_dir.path(), 100);

    let controller = Controller::with_config(config)?;
    let summary = tokio_test::block_on(controller.run())?;

    assert_eq!(summary.lines.len(), 3);
    assert!(summary.missing_lines.is_empty());
    assert_eq!(summary.empty_lines(), vec!["blank"]);
    assert_eq!(summary.issues_skipped(), 2);
    assert_eq!(summary.issues_merged(), 4);
    assert!(summary.has_failures());

    let names = common::volume_names(&temp_dir.path().join("merged"))?;
    assert_eq!(
        names,
        vec![
            "the-economist-2024.01.06-2024.01.13.md",
            "the-economist-2024.01.20.md",
            "wired-2024.01.01.md",
        ]
    );
    Ok(())
}

#[test]
fn test_run_shouldAppendSummaryToIssuesLog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_input_tree(temp_dir.path())?;
    let controller = Controller::with_config(config_for(temp_dir.path(), 100))?;

    tokio_test::block_on(controller.run())?;

    let log = fs::read_to_string(temp_dir.path().join("merged").join(ISSUES_LOG_FILENAME))?;
    assert!(log.contains("Merge completed"));
    assert!(log.contains("wired-2024-02-01.md"));
    assert!(log.contains("Publication line blank has no non-empty issues"));
    Ok(())
}

#[test]
fn test_run_withMissingInputRoot_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(config_for(temp_dir.path(), 100))?;

    let result = tokio_test::block_on(controller.run());

    let error = result.expect_err("missing input root must abort the run");
    assert!(error.to_string().contains("Input directory not found"));
    Ok(())
}

#[test]
fn test_run_withSingleMagazine_shouldOnlyMergeThatLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_input_tree(temp_dir.path())?;
    let mut config = config_for(temp_dir.path(), 100);
    config.merge.magazine = Some("wired".to_string());

    let summary = tokio_test::block_on(Controller::with_config(config)?.run())?;

    assert_eq!(summary.lines.len(), 1);
    assert_eq!(summary.lines[0].line, "wired");
    assert_eq!(common::volume_names(&temp_dir.path().join("merged"))?, vec!["wired-2024.01.01.md"]);
    Ok(())
}

#[test]
fn test_run_withUnknownMagazine_shouldReportMissingLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_input_tree(temp_dir.path())?;
    let mut config = config_for(temp_dir.path(), 100);
    config.merge.magazine = Some("nature".to_string());

    let summary = tokio_test::block_on(Controller::with_config(config)?.run())?;

    assert!(summary.lines.is_empty());
    assert_eq!(summary.missing_lines.len(), 1);
    assert!(summary.missing_lines[0].contains("nature"));
    Ok(())
}

#[test]
fn test_run_concurrently_shouldMatchSequentialOutput() -> Result<()> {
    let sequential_dir = common::create_temp_dir()?;
    create_input_tree(sequential_dir.path())?;
    let sequential = tokio_test::block_on(Controller::with_config(config_for(sequential_dir.path(), 100))?.run())?;

    let concurrent_dir = common::create_temp_dir()?;
    create_input_tree(concurrent_dir.path())?;
    let mut config = config_for(concurrent_dir.path(), 100);
    config.merge.concurrent_lines = 3;
    let runtime = tokio::runtime::Runtime::new()?;
    let concurrent = runtime.block_on(Controller::with_config(config)?.run())?;

    let lines = |s: &magmerge::RunSummary| s.lines.iter().map(|l| l.line.clone()).collect::<Vec<_>>();
    assert_eq!(lines(&sequential), lines(&concurrent));
    assert_eq!(
        common::volume_names(&sequential_dir.path().join("merged"))?,
        common::volume_names(&concurrent_dir.path().join("merged"))?
    );
    Ok(())
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.merge.max_words = 0;

    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_run_withMoreWorkersThanLines_shouldMergeEveryLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    create_input_tree(temp_dir.path())?;
    let mut config = config_for(temp_dir.path(), 100);
    config.merge.concurrent_lines = magmerge::app_config::MAX_CONCURRENT_LINES;

    let summary = tokio_test::block_on(Controller::with_config(config)?.run())?;

    assert_eq!(summary.lines.len(), 3);
    assert_eq!(common::volume_names(&temp_dir.path().join("merged"))?.len(), 3);
    Ok(())
}
