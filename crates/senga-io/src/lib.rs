//! senga-io: Browser I/O and Dioxus component library.
//!
//! Handles the fetch transport and retry driver for the vectorization
//! backend, blob URLs for uploads and downloads, and the reusable UI
//! components (upload zone, method tabs, schema-driven parameter
//! controls, result preview with comparison slider, export panel).

pub mod asset;
pub mod client;
pub mod components;
pub mod download;
pub mod transport;

pub use client::VectorizeClient;
pub use components::{
    CompareView, ExportPanel, ImageUpload, MethodControls, MethodTabs, PreviewContent,
    ResultPreview,
};
pub use transport::VectorizePayload;
