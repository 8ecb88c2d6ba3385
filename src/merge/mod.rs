/*!
 * Merge engine: packs the issues of each publication line into
 * size-bounded volumes.
 *
 * - `issue`: listing, ordering and reading issue files
 * - `packer`: streaming bin-packing under a word ceiling
 * - `volume`: volume naming, rendering and persistence
 * - `ledger`: part-number bookkeeping for colliding volume names
 * - `report`: per-line and per-run statistics
 */

pub mod issue;
pub mod ledger;
pub mod packer;
pub mod report;
pub mod volume;

pub use issue::{Issue, IssueEntry, PublicationLine};
pub use ledger::{parse_volume_filename, volume_filename, PartLedger};
pub use packer::{Batch, BatchMember, BinPacker, VolumeSink};
pub use report::{LineReport, RunSummary, VolumeInfo};
pub use volume::{base_filename, render_volume, VolumeWriter};
