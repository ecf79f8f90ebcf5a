//! Business Services
//!
//! - `CatalogService` - the operations exposed to outer layers
//! - `names` - display name resolution with language fallback
//! - `pagination` - page slicing and metadata
//!
//! Services coordinate between the database layer and callers; they own no
//! state beyond the store handle.

pub mod catalog_service;
pub mod error;
pub mod names;
pub mod pagination;


pub use catalog_service::{CatalogService, ChildrenPage, NodePage, TreeReport};
pub use error::CatalogError;
pub use names::{resolve_name, NameIndex, DEFAULT_LANGUAGE, FALLBACK_LANGUAGES};
pub use pagination::{clamp_page_size, paginate, Page, PageInfo, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
