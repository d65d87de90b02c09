// Build scripts signal errors by panicking -- there is no caller to
// return Result to. Cargo treats a non-zero exit as a build failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Build script for the senga binary crate.
//!
//! Generates `index.html` at the crate root because the Dioxus CLI
//! expects it there for serving. The file is gitignored.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let index_html = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <title>senga</title>
    <meta content="text/html;charset=utf-8" http-equiv="Content-Type" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta charset="UTF-8" />
  </head>
  <body>
    <div id="main"></div>
  </body>
</html>
"#;

    let index_path = manifest_dir.join("index.html");
    fs::write(&index_path, index_html)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", index_path.display()));
}
