pub mod timestamp;
pub mod filter;

pub use filter::{is_reverse_chronological, select, select_full_scan, Candidate, Fresh, OrderingPolicy};
