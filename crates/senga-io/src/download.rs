//! SVG download via Blob URLs.
//!
//! Dioxus has no built-in file download API, so saving a result means
//! creating a `Blob`, generating an object URL, and programmatically
//! clicking a temporary `<a download>` element.
//!
//! Requires a browser environment (`wasm32-unknown-unknown` target).

use wasm_bindgen::{JsCast, JsValue};
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Save an SVG document as `<filename>.svg`.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails.
pub fn download_svg(svg: &str, filename: &str) -> Result<(), DownloadError> {
    save_text(svg, &format!("{filename}.svg"), "image/svg+xml")
}

/// Trigger a download of `data` under `filename` with the given MIME
/// type. The temporary anchor and object URL are cleaned up after the
/// click; cleanup failures are ignored because the download has
/// already been handed to the browser at that point.
fn save_text(data: &str, filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(data));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor)?;
    anchor.click();

    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);

    Ok(())
}
