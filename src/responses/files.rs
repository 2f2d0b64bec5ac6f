// responses/files.rs
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use astra::{Body, ResponseBuilder};
use tracing::warn;

use crate::errors::ServerError;
use crate::responses::ResultResp;

/// Serve `rel` from under `root`. Anything that could climb out of `root`
/// is a 404, same as a missing file.
pub fn serve_file(root: &Path, rel: &str) -> ResultResp {
    let not_found = || ServerError::NotFound("File not found".into());
    let path = resolve(root, rel).ok_or_else(not_found)?;

    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "static read failed");
            return Err(not_found());
        }
    };

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", guess_content_type(&path))
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}

fn resolve(root: &Path, rel: &str) -> Option<PathBuf> {
    if rel.is_empty() || rel.contains('\\') || rel.contains('\0') {
        return None;
    }
    let rel = Path::new(rel);
    let plain = rel
        .components()
        .all(|c| matches!(c, Component::Normal(s) if !s.to_string_lossy().starts_with('.')));
    plain.then(|| root.join(rel))
}

fn guess_content_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => mime::TEXT_HTML_UTF_8.to_string(),
        "css" => mime::TEXT_CSS_UTF_8.to_string(),
        "js" => mime::APPLICATION_JAVASCRIPT_UTF_8.to_string(),
        "json" => mime::APPLICATION_JSON.to_string(),
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "png" => mime::IMAGE_PNG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "svg" => mime::IMAGE_SVG.to_string(),
        "webp" => "image/webp".to_string(),
        "ico" => "image/x-icon".to_string(),
        "mp4" | "m4v" => "video/mp4".to_string(),
        "webm" => "video/webm".to_string(),
        "mov" => "video/quicktime".to_string(),
        "ogg" => "video/ogg".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}
