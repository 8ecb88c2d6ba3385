/*!
 * # magmerge - periodical volume merger
 *
 * A Rust library for repackaging converted periodical issues into
 * size-bounded, date-ordered merged volumes.
 *
 * ## Features
 *
 * - Extract publication dates from issue filenames
 * - Pack issues into volumes under a word-count ceiling, in publication order
 * - Demote issue headings so they nest under a synthesized volume title
 * - Never overwrite existing volumes: colliding names get `_partN` suffixes
 * - Contain failures per issue or per volume and report them at the end
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `dates`: Filename date extraction and date-range labels
 * - `text`: Word counting and heading demotion
 * - `merge`: The merge engine:
 *   - `merge::issue`: Publication lines and their issues
 *   - `merge::packer`: Streaming bin-packing under a word ceiling
 *   - `merge::volume`: Volume naming, rendering and persistence
 *   - `merge::ledger`: Part-number bookkeeping
 *   - `merge::report`: Merge statistics
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod dates;
pub mod text;
pub mod merge;
pub mod file_utils;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, IssueOrder, MergeConfig};
pub use app_controller::Controller;
pub use dates::{DateExtractor, DateRange};
pub use merge::{BinPacker, LineReport, PartLedger, RunSummary, VolumeInfo, VolumeWriter};
pub use text::{count_words, shift_headings};
pub use errors::{AppError, MergeError};
