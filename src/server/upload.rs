//! Multipart form parsing and on-disk staging of uploaded audio.

use crate::constants::fields;
use crate::constants::uploads::{FALLBACK_FILENAME, TEMP_PREFIX};
use crate::error::{Error, Result};
use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    /// Filename declared by the client.
    pub filename: String,
    /// MIME type declared by the client.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl UploadedAudio {
    /// Extension of the declared filename including the dot, e.g. `.mp3`.
    pub fn extension(&self) -> Option<String> {
        Path::new(&sanitize_filename(&self.filename))
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
    }
}

/// Fields of the `POST /analyze/` form.
#[derive(Debug)]
pub struct AnalyzeForm {
    /// Latitude as sent.
    pub lat: f64,
    /// Longitude as sent.
    pub lon: f64,
    /// The audio sample.
    pub audio: UploadedAudio,
}

/// Read the analyze form: `lat`, `lon` and `audio_sample` are all required.
pub async fn read_analyze_form(multipart: &mut Multipart) -> Result<AnalyzeForm> {
    let mut lat = None;
    let mut lon = None;
    let mut audio = None;

    while let Some(field) = next_field(multipart).await? {
        match field.name() {
            Some(fields::LAT) => lat = Some(read_number(field, fields::LAT).await?),
            Some(fields::LON) => lon = Some(read_number(field, fields::LON).await?),
            Some(fields::AUDIO_SAMPLE) => audio = Some(read_file(field).await?),
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(AnalyzeForm {
        lat: lat.ok_or(Error::MissingField { field: fields::LAT })?,
        lon: lon.ok_or(Error::MissingField { field: fields::LON })?,
        audio: audio.ok_or(Error::MissingField {
            field: fields::AUDIO_SAMPLE,
        })?,
    })
}

/// Read the identify form: a single required `file` field.
pub async fn read_identify_form(multipart: &mut Multipart) -> Result<UploadedAudio> {
    let mut file = None;

    while let Some(field) = next_field(multipart).await? {
        if field.name() == Some(fields::FILE) {
            file = Some(read_file(field).await?);
        } else {
            debug!("Ignoring form field {:?}", field.name());
        }
    }

    file.ok_or(Error::MissingField {
        field: fields::FILE,
    })
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>> {
    multipart.next_field().await.map_err(multipart_error)
}

/// Map a multipart read failure, keeping body-limit rejections distinct.
fn multipart_error(err: MultipartError) -> Error {
    let reason = err.body_text();
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::UploadTooLarge { reason }
    } else {
        Error::MalformedUpload { reason }
    }
}

async fn read_number(field: Field<'_>, name: &'static str) -> Result<f64> {
    let text = field.text().await.map_err(multipart_error)?;

    text.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        field: name,
        value: text,
    })
}

async fn read_file(field: Field<'_>) -> Result<UploadedAudio> {
    let filename = field
        .file_name()
        .map_or_else(|| FALLBACK_FILENAME.to_string(), ToString::to_string);
    let content_type = field.content_type().map(ToString::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    debug!(
        "Received upload '{}' ({} bytes, {})",
        filename,
        bytes.len(),
        content_type.as_deref().unwrap_or("no content type")
    );

    Ok(UploadedAudio {
        filename,
        content_type,
        bytes,
    })
}

/// Reduce a client-declared filename to its final path component.
///
/// Names that are empty or refer to a directory become the fallback name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => FALLBACK_FILENAME.to_string(),
        base => base.to_string(),
    }
}

/// Writes uploads to disk for the analyzer.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    retain: bool,
}

/// An upload written to a temporary file. The file is deleted on drop.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    filename: String,
}

impl StagedUpload {
    /// Location of the staged bytes.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl UploadStore {
    /// Stage uploads in `dir`; keep them after analysis if `retain` is set.
    pub const fn new(dir: PathBuf, retain: bool) -> Self {
        Self { dir, retain }
    }

    /// Upload directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether analyzed uploads are kept.
    pub const fn retains(&self) -> bool {
        self.retain
    }

    /// Write the upload verbatim to a new temporary file in the upload
    /// directory. `suffix` defaults to the declared file's extension.
    pub fn stage(&self, upload: &UploadedAudio, suffix: Option<&str>) -> Result<StagedUpload> {
        let store_err = |source| Error::UploadStore {
            path: self.dir.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(store_err)?;

        let suffix = suffix.map(ToString::to_string).or_else(|| upload.extension());
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(suffix.as_deref().unwrap_or_default())
            .tempfile_in(&self.dir)
            .map_err(store_err)?;

        file.write_all(&upload.bytes).map_err(store_err)?;
        file.flush().map_err(store_err)?;

        debug!(
            "Staged '{}' at {}",
            upload.filename,
            file.path().display()
        );

        Ok(StagedUpload {
            file,
            filename: sanitize_filename(&upload.filename),
        })
    }

    /// Release a staged upload after analysis.
    ///
    /// With retention on, the file is moved to `<dir>/<filename>`, replacing
    /// any earlier upload of that name, and the path is returned. Otherwise
    /// the temporary file is deleted.
    pub fn finish(&self, staged: StagedUpload) -> Result<Option<PathBuf>> {
        if !self.retain {
            return Ok(None);
        }

        let target = self.dir.join(&staged.filename);
        staged
            .file
            .persist(&target)
            .map_err(|e| Error::UploadStore {
                path: target.clone(),
                source: e.error,
            })?;

        debug!("Retained upload at {}", target.display());
        Ok(Some(target))
    }
}
