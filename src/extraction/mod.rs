pub mod traits;
pub mod marker;
pub mod text;
pub mod bbc;
pub mod guardian;
pub mod reuters;
pub mod registry;

pub use traits::ExtractionAdapter;
pub use marker::MarkerAdapter;
pub use registry::AdapterRegistry;
pub use text::strip_markup;
