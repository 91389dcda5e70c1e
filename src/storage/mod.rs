pub mod traits;
pub mod sqlite;

pub use traits::{SourceRepository, ArticleRepository};
pub use sqlite::{SqliteStorage, SqliteSourceRepository, SqliteArticleRepository};
