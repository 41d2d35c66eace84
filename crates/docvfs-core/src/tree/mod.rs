//! Tree cache, entry model and the scanner that fills them.

pub mod cache;
pub mod entry;
pub mod path;
pub mod scanner;

pub use cache::{CacheStats, EntryList, TreeCache};
pub use entry::DirEntry;
pub use scanner::{ListingFailure, ScanReport, ScannedTree, Scanner};
