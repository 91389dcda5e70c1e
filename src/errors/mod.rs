use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Source errors
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Source already exists: {0}")]
    SourceAlreadyExists(String),

    #[error("Missing required feed fields: {0}")]
    MissingRequiredFeedFields(String),

    // Freshness errors
    #[error("Time format not supported: {0:?}")]
    UnsupportedTimeFormat(String),

    // Extraction errors
    #[error("No extraction adapter matches the page")]
    NoMatchingExtractionAdapter,

    #[error("Extraction window of adapter {adapter} has no end marker after offset {start}")]
    MalformedExtractionWindow { adapter: String, start: usize },

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Timed out fetching {0}")]
    Timeout(String),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("OPML parsing failed: {0}")]
    OpmlParse(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // Output errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type HarvestResult<T> = Result<T, HarvestError>;
