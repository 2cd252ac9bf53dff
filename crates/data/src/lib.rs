//! Remote data access: the hosted REST backend, object storage and the typed
//! repositories the terminal screens work against.

pub mod error;
pub mod files;
pub mod filter;
pub mod http;
pub mod memory;
pub mod menu;
pub mod record;
pub mod repository;
pub mod staff;
pub mod store;

pub use error::RemoteError;
pub use files::{FileStore, HttpFileStore, InMemoryFileStore, UploadedFile};
pub use filter::{Filter, Order};
pub use http::HttpRemoteStore;
pub use memory::InMemoryRemoteStore;
pub use menu::MenuCatalog;
pub use record::Record;
pub use repository::Repository;
pub use staff::StaffDirectory;
pub use store::RemoteStore;
