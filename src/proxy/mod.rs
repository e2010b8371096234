//! Model proxying subsystem.
//!
//! # Data Flow
//! ```text
//! ?path=products/products/glb/chair.glb
//!     → path.rs (extract, optional strict check)
//!     → storage.rs (GET <base>/<path>, buffer body)
//!     → http/response.rs (model headers) or error.rs (JSON envelope)
//! ```

pub mod error;
pub mod handler;
pub mod path;
pub mod storage;

pub use error::ProxyError;
pub use handler::proxy_model;
pub use storage::StorageClient;
