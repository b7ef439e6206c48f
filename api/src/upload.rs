//! Song thumbnails and mylist attachments are uploaded as files before the record referring to
//! them is created.
//!
//! Types are checked against an allow-list before anything is sent.

use std::path::Path;

use log::{debug, info};

use crate::{
    client::{Access, ApiClient},
    errors::ApiError,
    transport::{DeleteFileRequest, Transport, UploadRequest},
};

/// Image types accepted for song thumbnails.
pub const THUMBNAIL_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// Image and video types accepted for mylist attachments.
pub const ATTACHMENT_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "video/mp4",
    "video/webm",
    "video/quicktime",
];

/// Which upload endpoint a file goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UploadKind {
    Thumbnail,
    Attachment,
}

impl UploadKind {
    /// Path of the upload endpoint, relative to the API base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Thumbnail => "upload/thumbnail",
            Self::Attachment => "upload/attachment",
        }
    }

    #[must_use]
    pub const fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            Self::Thumbnail => THUMBNAIL_MIME_TYPES,
            Self::Attachment => ATTACHMENT_MIME_TYPES,
        }
    }

    #[must_use]
    pub fn accepts(self, mime: &str) -> bool {
        self.allowed_mime_types().contains(&mime)
    }
}

/// Guess a MIME type from a file extension.
///
/// Only types that some upload might accept are recognized, plus a few common ones so that
/// rejections can name what was refused.
#[must_use]
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => return None,
    })
}

/// A local file, ready to be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Read a file from disk, guessing its type from the extension.
    ///
    /// Files of an unknown type get `application/octet-stream`, which no upload accepts.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());

        Ok(Self {
            file_name,
            mime: mime_from_path(path).unwrap_or("application/octet-stream"),
            bytes,
        })
    }
}

/// Name under which the storage backend keeps the file behind `url`.
///
/// Stored URLs look like `http://host/image?id=<name>`; the `id` query parameter wins, otherwise
/// the last path segment is used.
#[must_use]
pub fn stored_file_name(url: &str) -> Option<String> {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "id") {
            return Some(id.into_owned()).filter(|id| !id.is_empty());
        }
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(ToOwned::to_owned);
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
}

impl<T: Transport> ApiClient<T> {
    /// Upload `file` and return the URL it is served from.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedMediaType`] without contacting the server if `kind` does not
    /// accept the file's type, otherwise any error of the transport.
    pub async fn upload(&self, kind: UploadKind, file: FilePart) -> Result<String, ApiError> {
        if !kind.accepts(file.mime) {
            return Err(ApiError::UnsupportedMediaType {
                kind,
                mime: file.mime.to_owned(),
            });
        }

        debug!("uploading {} ({}) as a {kind}", file.file_name, file.mime);
        let url = self
            .transport()
            .upload(UploadRequest {
                kind,
                file_name: file.file_name,
                mime: file.mime,
                bytes: file.bytes,
                bearer: self.bearer(Access::Authenticated),
            })
            .await?;
        info!("uploaded {kind} to {url}");
        Ok(url)
    }

    /// Remove the stored file behind an attachment URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if no file name can be found in `file_url`, otherwise any
    /// error of the transport.
    pub async fn delete_attachment_file(&self, file_url: &str) -> Result<(), ApiError> {
        let file_name = stored_file_name(file_url)
            .ok_or_else(|| ApiError::InvalidUrl(format!("no file name in {file_url:?}")))?;

        self.transport()
            .delete_file(DeleteFileRequest {
                file_name,
                bearer: self.bearer(Access::Authenticated),
            })
            .await
    }
}
