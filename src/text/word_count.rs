//! Word counting heuristic used for volume sizing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal runs of Unicode word characters (letters, digits, underscore)
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Count the words in a piece of text.
///
/// This is an approximation: punctuation splits words (`don't` counts as two)
/// and markup characters are ignored. It only has to be stable, since it is
/// used to decide where one volume ends and the next begins.
pub fn count_words(text: &str) -> usize {
    WORD_REGEX.find_iter(text).count()
}
