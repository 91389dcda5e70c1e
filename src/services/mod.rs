pub mod poll_service;
pub mod source_service;
pub mod archive_service;
pub mod import_export_service;

pub use poll_service::{CycleResult, PollOptions, PollService, SourceOutcome, SourceReport};
pub use source_service::{validate_url, SourceService};
pub use archive_service::ArchiveService;
pub use import_export_service::{ImportExportService, ImportResult};
