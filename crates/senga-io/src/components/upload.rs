//! Image upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;

/// Allowed file extensions for image uploads. The backend accepts any
/// `image/*` content type; this list keeps obviously wrong files from
/// ever being read.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Props for the [`ImageUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageUploadProps {
    /// Called with the raw bytes, filename, and MIME type after a
    /// successful read.
    on_upload: EventHandler<(Vec<u8>, String, String)>,
    /// Compact mode: a slim "replace image" bar instead of the full
    /// drop zone.
    #[props(default = false)]
    compact: bool,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts PNG, JPEG, GIF, BMP, and WebP images. When a file is
/// selected (via the picker or drag-and-drop), reads the bytes and
/// fires `on_upload` with `(bytes, filename, mime_type)`.
#[component]
pub fn ImageUpload(props: ImageUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    // Validate, read, and forward the first file from a list. Shared by
    // the file-picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        if let Some(file) = files.first() {
            let name = file.name();
            if !has_allowed_extension(&name) {
                error.set(Some(format!("Unsupported file type: {name}")));
                return;
            }
            match file.read_bytes().await {
                Ok(bytes) => {
                    error.set(None);
                    let mime = mime_for(&name);
                    props.on_upload.call((bytes.to_vec(), name, mime));
                }
                Err(e) => {
                    error.set(Some(format!("Failed to read file: {e}")));
                }
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if props.compact {
        "upload-zone upload-zone-compact"
    } else {
        "upload-zone"
    };
    let drag_class = if dragging() { "dragging" } else { "" };

    rsx! {
        div {
            class: "{zone_class} {drag_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref err) = error() {
                p { class: "upload-error", "{err}" }
            }

            p { class: "upload-hint",
                if props.compact {
                    "Drop a new image to replace, or "
                } else {
                    "Drop an image here or "
                }
            }

            label { class: "btn btn-primary",
                input {
                    r#type: "file",
                    accept: ".png,.jpg,.jpeg,.gif,.bmp,.webp",
                    class: "hidden-input",
                    onchange: handle_files,
                }
                "Choose File"
            }

            if !props.compact {
                p { class: "upload-formats", "PNG, JPEG, GIF, BMP, WebP" }
            }
        }
    }
}

/// Guess a MIME type from the file extension. The backend only checks
/// the `image/` prefix, so a rough mapping is enough.
fn mime_for(name: &str) -> String {
    let ext = name
        .rsplit_once('.')
        .map_or("", |(_, ext)| ext)
        .to_ascii_lowercase();
    let subtype = match ext.as_str() {
        "jpg" | "jpeg" => "jpeg",
        "gif" => "gif",
        "bmp" => "bmp",
        "webp" => "webp",
        _ => "png",
    };
    format!("image/{subtype}")
}
