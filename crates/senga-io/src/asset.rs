//! Blob URL handling for the uploaded raster image.
//!
//! The comparison view needs the original image as an `<img src>`.
//! The uploaded bytes are already an encoded image, so they go straight
//! into a `Blob` with their original MIME type -- no re-encoding.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur while creating a blob URL for the upload.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for AssetError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap uploaded image bytes in a Blob URL for `<img>` display.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when the
/// image is replaced or removed to avoid leaking the allocation.
///
/// # Errors
///
/// Returns [`AssetError::JsError`] if Blob or URL creation fails.
pub fn image_blob_url(bytes: &[u8], content_type: &str) -> Result<String, AssetError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let opts = BlobPropertyBag::new();
    opts.set_type(content_type);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Revoke a Blob URL previously created by [`image_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
