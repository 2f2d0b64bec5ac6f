// src/uploads.rs
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use astra::Request;
use chrono::Utc;
use mime::Mime;
use multipart::server::Multipart;
use rand::Rng;
use tracing::{info, warn};

use crate::errors::ServerError;
use crate::requests::content_type;

/// What an uploaded file is for. Decides the accepted media type and the
/// directory it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Photo,
    Video,
}

impl FileKind {
    /// Form field carrying this kind of file.
    pub fn for_field(name: &str) -> Option<Self> {
        match name {
            "photo" => Some(FileKind::Photo),
            "video" => Some(FileKind::Video),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Photo => "photo",
            FileKind::Video => "video",
        }
    }

    fn media_type(&self) -> mime::Name<'static> {
        match self {
            FileKind::Photo => mime::IMAGE,
            FileKind::Video => mime::VIDEO,
        }
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        match self {
            FileKind::Photo => matches!(ext, "jpg" | "jpeg" | "png" | "gif" | "webp"),
            FileKind::Video => matches!(ext, "mp4" | "webm" | "mov" | "ogg" | "m4v"),
        }
    }
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub kind: FileKind,
    /// Name under the kind's directory; this is what the database stores.
    pub stored_name: String,
    pub path: PathBuf,
}

/// Where uploads go and how big a request may be.
#[derive(Debug, Clone)]
pub struct UploadStore {
    photos_dir: PathBuf,
    videos_dir: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    pub fn new(photos_dir: PathBuf, videos_dir: PathBuf, max_bytes: u64) -> Self {
        Self {
            photos_dir,
            videos_dir,
            max_bytes,
        }
    }

    pub fn dir(&self, kind: FileKind) -> &Path {
        match kind {
            FileKind::Photo => &self.photos_dir,
            FileKind::Video => &self.videos_dir,
        }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.photos_dir)?;
        fs::create_dir_all(&self.videos_dir)
    }

    /// Best-effort delete of a stored file. Missing files are not an error.
    pub fn remove(&self, kind: FileKind, stored_name: &str) {
        if !is_plain_name(stored_name) {
            warn!(stored_name, "refusing to remove suspicious upload name");
            return;
        }
        let path = self.dir(kind).join(stored_name);
        match fs::remove_file(&path) {
            Ok(()) => info!(path = %path.display(), "upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove upload"),
        }
    }

    fn discard(&self, files: &[SavedFile]) {
        for f in files {
            self.remove(f.kind, &f.stored_name);
        }
    }

    /// Read a `multipart/form-data` request: text parts become fields, the
    /// `photo` and `video` parts are written to disk. Nothing is left on disk
    /// if the request turns out to be malformed.
    pub fn read_multipart(&self, req: Request) -> Result<FormData, ServerError> {
        let boundary = multipart_boundary(&req)?;

        let declared = req
            .headers()
            .get("Content-Length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if declared.is_some_and(|len| len > self.max_bytes) {
            return Err(too_large(self.max_bytes));
        }

        let mut body = req.into_body();
        let reader = body.reader().take(self.max_bytes);
        let mut form = FormData::default();

        if let Err(e) = self.collect_parts(Multipart::with_body(reader, boundary), &mut form) {
            self.discard(&form.files);
            return Err(e);
        }
        Ok(form)
    }

    fn collect_parts<R: Read>(
        &self,
        mut multipart: Multipart<R>,
        form: &mut FormData,
    ) -> Result<(), ServerError> {
        loop {
            let mut field = match multipart.read_entry() {
                Ok(Some(field)) => field,
                Ok(None) => return Ok(()),
                Err(e) => return Err(malformed(e)),
            };
            let name = field.headers.name.to_string();

            let filename = field.headers.filename.clone();
            let Some(filename) = filename else {
                let mut value = String::new();
                field
                    .data
                    .read_to_string(&mut value)
                    .map_err(malformed)?;
                form.fields.insert(name, value);
                continue;
            };

            // An empty file input still sends a part, with no name and no bytes.
            if filename.is_empty() {
                io::copy(&mut field.data, &mut io::sink()).map_err(malformed)?;
                continue;
            }

            let Some(kind) = FileKind::for_field(&name) else {
                return Err(ServerError::BadRequest(format!(
                    "unexpected file field: {name}"
                )));
            };
            if form.file(kind).is_some() {
                return Err(ServerError::BadRequest(format!(
                    "only one {} may be uploaded",
                    kind.label()
                )));
            }

            let ext = extension(&filename);
            check_media_type(kind, field.headers.content_type.as_ref(), ext.as_deref())?;

            let stored_name = stored_file_name(ext.as_deref());
            let path = self.dir(kind).join(&stored_name);
            let mut out = File::create(&path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "failed to create upload file");
                ServerError::InternalError
            })?;

            // Record before copying so a failed copy is cleaned up too.
            form.files.push(SavedFile {
                kind,
                stored_name,
                path: path.clone(),
            });

            let written = io::copy(&mut field.data, &mut out).map_err(malformed)?;
            info!(kind = kind.label(), path = %path.display(), bytes = written, "upload saved");
        }
    }
}

/// Text fields and stored files of one multipart request.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<SavedFile>,
}

impl FormData {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, kind: FileKind) -> Option<&SavedFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    pub fn files(&self) -> &[SavedFile] {
        &self.files
    }

    /// Remove the stored files again, e.g. after a failed insert.
    pub fn discard_files(&self, store: &UploadStore) {
        store.discard(&self.files);
    }
}

fn multipart_boundary(req: &Request) -> Result<String, ServerError> {
    let not_multipart = || ServerError::BadRequest("expected multipart/form-data".into());
    let ct = content_type(req).ok_or_else(not_multipart)?;

    if ct.type_() != mime::MULTIPART || ct.subtype() != mime::FORM_DATA {
        return Err(not_multipart());
    }
    ct.get_param(mime::BOUNDARY)
        .map(|b| b.as_str().to_string())
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ServerError::BadRequest("multipart boundary missing".into()))
}

fn check_media_type(
    kind: FileKind,
    declared: Option<&Mime>,
    ext: Option<&str>,
) -> Result<(), ServerError> {
    let ok = match declared {
        Some(ct) if ct.type_() != mime::APPLICATION => ct.type_() == kind.media_type(),
        // application/octet-stream or nothing: trust the extension
        _ => ext.is_some_and(|e| kind.accepts_extension(e)),
    };
    if ok {
        Ok(())
    } else {
        Err(ServerError::BadRequest(format!(
            "{} must be a {} file",
            kind.label(),
            kind.media_type()
        )))
    }
}

/// Lowercased extension of a client file name, if it looks sane.
fn extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    let ok = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    ok.then(|| ext.to_ascii_lowercase())
}

/// `<unix millis>-<random><.ext>`
fn stored_file_name(ext: Option<&str>) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    match ext {
        Some(ext) => format!("{millis}-{nonce}.{ext}"),
        None => format!("{millis}-{nonce}"),
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.starts_with('.')
}

fn malformed(e: io::Error) -> ServerError {
    ServerError::BadRequest(format!("malformed multipart body: {e}"))
}

fn too_large(max: u64) -> ServerError {
    ServerError::BadRequest(format!("upload exceeds the {max} byte limit"))
}
