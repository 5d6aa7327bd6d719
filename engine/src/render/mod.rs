//! Render Module
//!
//! Renderer-facing data. Drawing itself belongs to the host (a browser
//! scene or a native renderer); this module only produces the per-coin
//! records it uploads.

pub mod coin_instance;

pub use coin_instance::{CoinInstance, coin_instances};
