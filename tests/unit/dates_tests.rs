/*!
 * Tests for filename date extraction and date-range labels
 */

use chrono::NaiveDate;
use magmerge::dates::{DateExtractor, DateRange};
use magmerge::errors::MergeError;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_extract_withEachDefaultLayout_shouldParse() {
    let extractor = DateExtractor::default();

    assert_eq!(extractor.extract("TheEconomist.2024.01.06.epub"), Some(ymd(2024, 1, 6)));
    assert_eq!(extractor.extract("wired-2023-11-5.md"), Some(ymd(2023, 11, 5)));
    assert_eq!(extractor.extract("nature_2022_7_14.md"), Some(ymd(2022, 7, 14)));
    assert_eq!(extractor.extract("issue_20240106_final"), Some(ymd(2024, 1, 6)));
}

#[test]
fn test_extract_withoutDate_shouldReturnNone() {
    let extractor = DateExtractor::default();

    assert_eq!(extractor.extract("no-date-here"), None);
    assert_eq!(extractor.extract("special-edition.md"), None);
    assert_eq!(extractor.extract(""), None);
}

#[test]
fn test_extract_shouldRespectPatternPriority() {
    let extractor = DateExtractor::default();

    // dot form is tried before the hyphen form
    assert_eq!(extractor.extract("2023-02-02 reprint of 2021.03.04"), Some(ymd(2021, 3, 4)));
}

#[test]
fn test_extract_withImpossibleDay_shouldTryNextPattern() {
    let extractor = DateExtractor::default();

    assert_eq!(extractor.extract("mag.2023.02.30.20230301.md"), Some(ymd(2023, 3, 1)));
}

#[test]
fn test_new_withCustomPattern_shouldUseOnlyThatPattern() {
    let extractor = DateExtractor::new(&[r"(\d{2})(\d{2})(\d{2})"]).unwrap();
    // groups are year, month, day in order
    assert_eq!(extractor.pattern_count(), 1);
    assert_eq!(extractor.extract("x.2024.01.06"), None);
    assert_eq!(extractor.extract("issue 990203"), Some(ymd(99, 2, 3)));
}

#[test]
fn test_new_withBrokenRegex_shouldReturnInvalidPattern() {
    let result = DateExtractor::new(&["(\\d{4}"]);

    match result {
        Err(MergeError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(\\d{4}"),
        other => panic!("expected InvalidPattern, got {:?}", other),
    }
}

#[test]
fn test_dateRange_display_shouldUseLabelOrUndated() {
    let span = DateRange::from_dates(vec![Some(ymd(2024, 1, 8)), None, Some(ymd(2024, 1, 15))]);

    assert_eq!(span.to_string(), "2024.01.08-2024.01.15");
    assert_eq!(DateRange::from_dates(Vec::new()).to_string(), "undated");
    assert_eq!(DateRange::Single(ymd(2024, 1, 1)).to_string(), "2024.01.01");
}
