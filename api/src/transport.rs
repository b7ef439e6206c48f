//! The wire: Connect unary calls and the file storage endpoints.

use std::{fmt, future::Future, time::Duration};

use log::{debug, trace};
use reqwest::{
    Url,
    multipart::{Form, Part},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{errors::ApiError, upload::UploadKind};

/// Header every Connect request must carry.
pub const CONNECT_PROTOCOL_VERSION: &str = "Connect-Protocol-Version";

/// A fully-qualified RPC method, e.g. `mylist.v1.MyListService/CreateMyList`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Procedure {
    pub service: &'static str,
    pub method: &'static str,
}

impl Procedure {
    #[must_use]
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.method)
    }
}

/// One unary call, after the session token has been resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcRequest {
    pub procedure: Procedure,
    pub body: Value,
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

/// A multipart upload of a single file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub kind: UploadKind,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub bearer: Option<String>,
}

/// Removal of a stored attachment file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteFileRequest {
    pub file_name: String,
    pub bearer: Option<String>,
}

/// Something that can carry requests to the API server.
pub trait Transport: Send + Sync {
    /// Perform a unary call and return the decoded JSON body of the response.
    fn unary(&self, request: RpcRequest) -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Upload a file, returning the URL the server stored it under.
    fn upload(&self, request: UploadRequest)
    -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Delete a previously uploaded attachment file.
    fn delete_file(
        &self,
        request: DeleteFileRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// [`Transport`] over HTTP/1.1, using the Connect protocol with the JSON codec.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base_url} cannot be a base URL")));
        }
        // `Url::join` replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn file_endpoint(&self, file_name: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("delete/attachment/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(file_name);
        Ok(url)
    }

    async fn read_response(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;
        trace!("response {status}: {} bytes", body.len());
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(ApiError::from_response(status.as_u16(), &body))
        }
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(procedure = %request.procedure))]
    async fn unary(&self, request: RpcRequest) -> Result<Value, ApiError> {
        let url = self.endpoint(&request.procedure.to_string())?;
        debug!("POST {url}");

        let mut builder = self
            .http
            .post(url)
            .header(CONNECT_PROTOCOL_VERSION, "1")
            .json(&request.body);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let body = Self::read_response(builder.send().await?).await?;
        if body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    #[instrument(skip_all, fields(kind = %request.kind, file = %request.file_name))]
    async fn upload(&self, request: UploadRequest) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct Uploaded {
            url: String,
        }

        let url = self.endpoint(request.kind.endpoint())?;
        debug!("POST {url} ({} bytes)", request.bytes.len());

        let part = Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(request.mime)?;
        let mut builder = self
            .http
            .post(url)
            .multipart(Form::new().part("file", part));
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let body = Self::read_response(builder.send().await?).await?;
        let Uploaded { url } = serde_json::from_slice(&body)?;
        Ok(url)
    }

    #[instrument(skip_all, fields(file = %request.file_name))]
    async fn delete_file(&self, request: DeleteFileRequest) -> Result<(), ApiError> {
        let url = self.file_endpoint(&request.file_name)?;
        debug!("DELETE {url}");

        let mut builder = self.http.delete(url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        Self::read_response(builder.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/master.MasterService/GetArtists")]
    #[case("http://localhost:8080/", "http://localhost:8080/master.MasterService/GetArtists")]
    #[case(
        "https://example.com/api",
        "https://example.com/api/master.MasterService/GetArtists"
    )]
    fn test_procedure_endpoint(#[case] base: &str, #[case] expected: &str) {
        let transport = HttpTransport::new(base, Duration::from_secs(1)).unwrap();
        let procedure = Procedure::new("master.MasterService", "GetArtists");
        let url = transport.endpoint(&procedure.to_string()).unwrap();
        assert_str_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("abc-123.png", "http://localhost:8080/delete/attachment/abc-123.png")]
    #[case("a b", "http://localhost:8080/delete/attachment/a%20b")]
    fn test_file_endpoint(#[case] file_name: &str, #[case] expected: &str) {
        let transport = HttpTransport::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        let url = transport.file_endpoint(file_name).unwrap();
        assert_str_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn test_rejects_bad_base_url(#[case] base: &str) {
        let result = HttpTransport::new(base, Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_upload_endpoints() {
        let transport = HttpTransport::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_str_eq!(
            transport
                .endpoint(UploadKind::Thumbnail.endpoint())
                .unwrap()
                .as_str(),
            "http://localhost:8080/upload/thumbnail"
        );
        assert_str_eq!(
            transport
                .endpoint(UploadKind::Attachment.endpoint())
                .unwrap()
                .as_str(),
            "http://localhost:8080/upload/attachment"
        );
    }
}
