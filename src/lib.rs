//! GLB model proxy.
//!
//! Fetches binary glTF models from a public object-storage bucket and serves
//! them with CORS and content headers, so browser 3D/AR viewers can load them
//! cross-origin.
//!
//! ```text
//!   GET /?path=products/products/glb/chair.glb
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────┐   ┌───────────────┐
//!   │   http   │──▶│  proxy   │──▶│    storage    │──▶ <base>/<path>
//!   │  server  │   │ handler  │   │    client     │
//!   └──────────┘   └──────────┘   └───────────────┘
//!        ▲               │
//!        └── CORS ◀──────┘ model/gltf-binary or JSON error
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
