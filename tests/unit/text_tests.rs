/*!
 * Tests for word counting and heading demotion
 */

use magmerge::text::{count_words, shift_headings, HEADING_OFFSET};

#[test]
fn test_countWords_shouldCountWordRuns() {
    assert_eq!(count_words("one two  three\nfour"), 4);
    assert_eq!(count_words("snake_case counts once"), 3);
    assert_eq!(count_words("e-mail, don't"), 4);
}

#[test]
fn test_countWords_isCaseInsensitive() {
    assert_eq!(count_words("Word WORD word"), count_words("word word word"));
}

#[test]
fn test_shiftHeadings_withEveryLevel_shouldAddOffsetAndOneSpace() {
    for k in 1..=6 {
        let input = format!("{}   The Leader Column", "#".repeat(k));
        let expected = format!("{} The Leader Column", "#".repeat(k + HEADING_OFFSET));

        assert_eq!(shift_headings(&input, HEADING_OFFSET), expected, "level {}", k);
    }
}

#[test]
fn test_shiftHeadings_withMixedContent_shouldOnlyTouchHeadings() {
    let input = "# Title\nParagraph with a # inside\n\n## Section\n- item\n#not-a-heading";
    let expected = "### Title\nParagraph with a # inside\n\n#### Section\n- item\n#not-a-heading";

    assert_eq!(shift_headings(input, HEADING_OFFSET), expected);
}

#[test]
fn test_shiftHeadings_withZeroOffset_shouldOnlyNormalizeSpacing() {
    assert_eq!(shift_headings("##  Spaced", 0), "## Spaced");
}
