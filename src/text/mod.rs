/*!
 * Plain-text helpers used while packing issues into volumes.
 */

pub mod headings;
pub mod word_count;

pub use headings::{shift_headings, HEADING_OFFSET};
pub use word_count::count_words;
