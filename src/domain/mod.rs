pub mod catalog;
pub mod models;

pub use catalog::{MemoryStoreCatalog, StoreCatalog};
pub use models::{StoreCategory, StoreInfo};
