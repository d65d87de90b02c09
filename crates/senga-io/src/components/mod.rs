//! Reusable Dioxus components for the senga web application.

pub mod compare;
pub mod controls;
pub mod export;
pub mod method_tabs;
pub mod preview;
pub mod upload;

pub use compare::CompareView;
pub use controls::MethodControls;
pub use export::ExportPanel;
pub use method_tabs::MethodTabs;
pub use preview::{PreviewContent, ResultPreview};
pub use upload::ImageUpload;
