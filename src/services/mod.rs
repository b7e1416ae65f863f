// Service exports
pub mod cache;
pub mod catalog;
pub mod generator;
pub mod memory;
pub mod openai;
pub mod postgres;
pub mod profiles;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use catalog::ProductCatalog;
pub use generator::{GenerationError, TextGenerator};
pub use memory::{InMemoryCatalog, InMemoryProfileStore};
pub use openai::OpenAiClient;
pub use postgres::PostgresClient;
pub use profiles::ProfileStore;
