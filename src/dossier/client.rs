// SPDX-License-Identifier: MPL-2.0
//! The dossier client: every operation the application performs against the
//! file service.
//!
//! Operations never panic on expected failures. Fetches that feed state return
//! `Result`s; operations wrapped as user actions return the transport
//! [`Response`] so the action layer can surface `error` uniformly.

use super::model::{ContainerIndex, Dossier, DossierFile, DossierParams, LocalFile, Rel};
use super::{normalize, url};
use crate::error::{Error, Result};
use crate::transport::{Body, FilePart, Request, RequestBody, Response, Transport};
use std::sync::Arc;

const ACCEPT_ANY: &str = "*/*";
const OCTET_STREAM: &str = "application/octet-stream";

/// Result of a dossier fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DossierFetch {
    pub dossier: Option<Dossier>,
    /// Present only when an external dossier was requested and the primary
    /// fetch succeeded.
    pub external: Option<ExternalListing>,
    pub error: Option<Error>,
}

/// Files offered by an external dossier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalListing {
    pub files: Vec<DossierFile>,
    pub error: Option<Error>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file: DossierFile,
    pub files: Vec<LocalFile>,
    /// Merge into the existing version instead of replacing it.
    pub merge: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub file: DossierFile,
    pub urls: Vec<String>,
    pub merge: bool,
}

/// Body of a context update.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContextPayload {
    /// Sent as `{}`.
    #[default]
    Empty,
    /// Sent verbatim.
    Raw(String),
    /// Serialized with `serde_json`.
    Json(serde_json::Value),
}

impl ContextPayload {
    fn into_body(self) -> String {
        match self {
            ContextPayload::Empty => "{}".to_string(),
            ContextPayload::Raw(text) if text.is_empty() => "{}".to_string(),
            ContextPayload::Raw(text) => text,
            ContextPayload::Json(value) => value.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DossierClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl std::fmt::Debug for DossierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DossierClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DossierClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Rewrites a service link onto the configured base URL.
    pub fn rebase(&self, link: &str) -> String {
        url::rebase(&self.base_url, link)
    }

    /// Resolves a file link for use, leaving external links on their own host.
    fn resolve(&self, file: &DossierFile, link: &str) -> String {
        if file.external {
            url::absolutize(&self.base_url, link)
        } else {
            self.rebase(link)
        }
    }

    pub async fn fetch_dossier(&self, params: &DossierParams) -> DossierFetch {
        let endpoint = format!(
            "{}/dossiers/{}/{}/{}/{}",
            self.base_url,
            params.dossier_key,
            params.dossier_package,
            params.dossier_code,
            params.dossier_mode
        );
        log::info!("loading dossier {endpoint}");

        let response = self.transport.request(Request::get(endpoint)).await;
        let (dossier, error) = match response.into_result() {
            Ok(Some(Body::Json(value))) => match normalize::dossier(params, value) {
                Ok(dossier) => (Some(dossier), None),
                Err(err) => (None, Some(err)),
            },
            Ok(Some(_)) => (
                None,
                Some(Error::Parse("dossier response is not JSON".into())),
            ),
            Ok(None) => (None, None),
            Err(err) => (None, Some(err)),
        };

        let external = match (&error, &params.external_dossier) {
            (None, Some(uri)) => Some(self.fetch_external(uri).await),
            _ => None,
        };

        DossierFetch {
            dossier,
            external,
            error,
        }
    }

    async fn fetch_external(&self, uri: &str) -> ExternalListing {
        let endpoint = format!(
            "{}/containers?uri={}",
            self.base_url,
            url::encode_component(uri)
        );
        let response = self.transport.request(Request::get(endpoint.clone())).await;
        let index_url = response.url.clone().unwrap_or(endpoint);

        match response.into_result() {
            Ok(Some(Body::Json(value))) => match normalize::external_files(&index_url, value) {
                Ok(files) => ExternalListing { files, error: None },
                Err(err) => ExternalListing {
                    files: Vec::new(),
                    error: Some(err),
                },
            },
            Ok(_) => ExternalListing::default(),
            Err(err) => ExternalListing {
                files: Vec::new(),
                error: Some(err),
            },
        }
    }

    /// Fetches the page index of a container-backed file.
    pub async fn fetch_container(&self, file: &DossierFile) -> Result<ContainerIndex> {
        let link = file
            .link(&Rel::PdfContainer)
            .ok_or_else(|| Error::Validation(format!("no container link for {}", file.name)))?;
        let endpoint = self.resolve(file, link);

        let response = self.transport.request(Request::get(endpoint.clone())).await;
        let resolved = response.url.clone().unwrap_or(endpoint);
        match response.into_result()? {
            Some(Body::Json(value)) => normalize::container_index(resolved, value),
            Some(_) => Err(Error::Parse("container index is not JSON".into())),
            None => Ok(ContainerIndex {
                url: resolved,
                pages: Vec::new(),
            }),
        }
    }

    /// Downloads raw bytes, e.g. a page image.
    pub async fn fetch_bytes(&self, link: &str) -> Result<Vec<u8>> {
        let request = Request::get(link).header("accept", ACCEPT_ANY);
        match self.transport.request(request).await.into_result()? {
            Some(body) if !body.is_empty() => Ok(body.into_bytes()),
            _ => Err(Error::Validation(format!("empty response from {link}"))),
        }
    }

    /// Uploads files into a slot as a new version or merged into the current one.
    pub async fn upload_files(&self, request: UploadRequest) -> Response {
        if request.files.is_empty() {
            return Response::failed(Error::Validation("no files to upload".into()));
        }

        let rel = if request.merge {
            Rel::Update
        } else {
            Rel::Publish
        };
        let Some(link) = request.file.link(&rel) else {
            return Response::failed(Error::Validation(format!(
                "no {rel} link for {}",
                request.file.name
            )));
        };
        let endpoint = self.resolve(&request.file, link);

        let parts = request
            .files
            .into_iter()
            .enumerate()
            .map(|(index, local)| FilePart {
                field: format!("file_{index}"),
                file_name: local.name,
                media_type: local.media_type,
                bytes: local.bytes,
            })
            .collect();

        log::info!("uploading to {endpoint}");
        let request = Request::post(endpoint, RequestBody::Multipart(parts)).header("accept", ACCEPT_ANY);
        self.transport.request(request).await
    }

    /// Downloads each URL in order, then uploads all of them in one request.
    ///
    /// Stops at the first failed or empty download without uploading anything.
    pub async fn import_from_urls(&self, request: ImportRequest) -> Response {
        if request.urls.is_empty() {
            return Response::failed(Error::Validation("no files to upload".into()));
        }

        let mut files = Vec::with_capacity(request.urls.len());
        for source in &request.urls {
            let endpoint = self.resolve(&request.file, source);
            let response = self
                .transport
                .request(Request::get(endpoint).header("accept", ACCEPT_ANY))
                .await;

            if let Some(error) = response.error {
                return Response::failed(error.with_source(source));
            }
            let bytes = match response.value {
                Some(body) if !body.is_empty() => body.into_bytes(),
                _ => {
                    return Response::failed(Error::Validation(format!(
                        "{source}: empty file"
                    )))
                }
            };
            files.push(LocalFile {
                name: url::file_name_of(source),
                media_type: response
                    .content_type
                    .unwrap_or_else(|| OCTET_STREAM.to_string()),
                bytes,
            });
        }

        self.upload_files(UploadRequest {
            file: request.file,
            files,
            merge: request.merge,
        })
        .await
    }

    pub async fn get_context(&self, file: &DossierFile) -> Response {
        let Some(link) = file.link(&Rel::Context) else {
            return Response::failed(Error::Validation(format!(
                "no context link for {}",
                file.name
            )));
        };
        self.transport
            .request(Request::get(self.resolve(file, link)))
            .await
    }

    pub async fn set_context(&self, file: &DossierFile, payload: ContextPayload) -> Response {
        let Some(link) = file.link(&Rel::Context) else {
            return Response::failed(Error::Validation(format!(
                "no context link for {}",
                file.name
            )));
        };
        let request = Request::put(
            self.resolve(file, link),
            RequestBody::Json(payload.into_body()),
        )
        .header("accept", ACCEPT_ANY);
        self.transport.request(request).await
    }

    /// Persists the display rotation of a file.
    ///
    /// Files without a `rotation` link only keep the rotation locally.
    pub async fn save_rotation(&self, file: &DossierFile, angle: u16) -> Result<()> {
        if !file.can_save_rotation {
            return Ok(());
        }
        let Some(link) = file.link(&Rel::Rotation) else {
            log::debug!("{} has no rotation link, keeping {angle} locally", file.file_id);
            return Ok(());
        };
        let body = serde_json::json!({ "angle": angle }).to_string();
        let request = Request::put(self.resolve(file, link), RequestBody::Json(body));
        self.transport.request(request).await.into_result().map(|_| ())
    }
}

/// Resolved `attachment` link of a file, for downloading it.
pub fn download_link(client: &DossierClient, file: &DossierFile) -> Option<String> {
    file.link(&Rel::Attachment)
        .map(|link| client.resolve(file, link))
}

/// Builds the display source of a single-image file.
pub fn inline_src(client: &DossierClient, file: &DossierFile) -> Option<String> {
    let link = file.link(&Rel::Inline)?;
    Some(url::image_src(
        &client.resolve(file, link),
        file.last_modified.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockTransport;
    use crate::transport::Method;
    use serde_json::json;

    const BASE: &str = "http://svc/api";

    fn params(external: Option<&str>) -> DossierParams {
        DossierParams {
            dossier_key: "K".into(),
            dossier_package: "P".into(),
            dossier_code: "C".into(),
            dossier_mode: "edit".into(),
            external_dossier: external.map(str::to_owned),
        }
    }

    fn slot() -> DossierFile {
        let mut file = DossierFile {
            code: "A".into(),
            name: "Passport".into(),
            file_id: "file_K_P_C_A".into(),
            can_save_rotation: true,
            ..DossierFile::default()
        };
        file.links
            .insert(Rel::Publish, "https://public.host/x/dossiers/K/P/C/A/publish");
        file.links
            .insert(Rel::Update, "https://public.host/x/dossiers/K/P/C/A/update");
        file.links
            .insert(Rel::Context, "https://public.host/x/dossiers/K/P/C/A/context");
        file
    }

    fn png(name: &str) -> LocalFile {
        LocalFile {
            name: name.into(),
            media_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn fetch_dossier_normalizes_files() {
        let transport = Arc::new(MockTransport::new().route(
            "/dossiers/K/P/C/edit",
            Response::json(json!({
                "name": "Case",
                "dossierFile": [{
                    "code": "A",
                    "mediaType": "application/pdf",
                    "link": [{"rel": "container", "href": "https://x/c"}]
                }]
            })),
        ));
        let client = DossierClient::new(transport.clone(), BASE);

        let fetch = client.fetch_dossier(&params(None)).await;

        assert!(fetch.error.is_none());
        assert!(fetch.external.is_none());
        let dossier = fetch.dossier.unwrap();
        assert_eq!(dossier.name, "Case");
        assert_eq!(
            dossier.dossier_file[0].link(&Rel::PdfContainer),
            Some("https://x/c?path=index.json")
        );
        assert_eq!(transport.urls(), ["http://svc/api/dossiers/K/P/C/edit"]);
    }

    #[tokio::test]
    async fn external_listing_uses_final_url_as_index() {
        let mut listing = Response::json(json!([
            {"name": "a.pdf", "path": "/f?id=1", "ext": "pdf"}
        ]));
        listing.url = Some("http://svc/api/containers/resolved".into());
        let transport = Arc::new(
            MockTransport::new()
                .route("/dossiers/", Response::json(json!({"name": "Case"})))
                .route("/containers?uri=", listing),
        );
        let client = DossierClient::new(transport.clone(), BASE);

        let fetch = client.fetch_dossier(&params(Some("ext://box 1"))).await;

        let external = fetch.external.unwrap();
        assert!(external.error.is_none());
        assert_eq!(
            external.files[0].link(&Rel::PdfContainer),
            Some("http://svc/api/containers/resolved/a.pdf/index.json")
        );
        assert_eq!(transport.urls()[1], "http://svc/api/containers?uri=ext%3A%2F%2Fbox%201");
    }

    #[tokio::test]
    async fn external_listing_skipped_when_primary_fails() {
        let transport = Arc::new(
            MockTransport::new()
                .route("/dossiers/", Response::failed(Error::http(500, "boom")))
                .route("/containers", Response::json(json!([]))),
        );
        let client = DossierClient::new(transport.clone(), BASE);

        let fetch = client.fetch_dossier(&params(Some("ext://box"))).await;

        assert_eq!(fetch.error, Some(Error::http(500, "boom")));
        assert!(fetch.external.is_none());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn upload_with_no_files_makes_no_call() {
        let transport = Arc::new(MockTransport::new());
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client
            .upload_files(UploadRequest {
                file: slot(),
                files: Vec::new(),
                merge: false,
            })
            .await;

        assert!(matches!(response.error, Some(Error::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn upload_posts_positional_parts_to_rebased_link() {
        let transport = Arc::new(MockTransport::new().route("/publish", Response::default()));
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client
            .upload_files(UploadRequest {
                file: slot(),
                files: vec![png("a.png"), png("b.png")],
                merge: false,
            })
            .await;

        assert!(!response.is_err());
        let request = transport.requests().remove(0);
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://svc/api/dossiers/K/P/C/A/publish");
        let Some(RequestBody::Multipart(parts)) = request.body else {
            panic!("expected multipart body");
        };
        let fields: Vec<_> = parts.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, ["file_0", "file_1"]);
        assert_eq!(parts[1].file_name, "b.png");
    }

    #[tokio::test]
    async fn merge_upload_uses_update_link() {
        let transport = Arc::new(MockTransport::new().route("/update", Response::default()));
        let client = DossierClient::new(transport.clone(), BASE);

        client
            .upload_files(UploadRequest {
                file: slot(),
                files: vec![png("a.png")],
                merge: true,
            })
            .await;

        assert_eq!(transport.urls(), ["http://svc/api/dossiers/K/P/C/A/update"]);
    }

    #[tokio::test]
    async fn upload_without_target_link_is_validation_error() {
        let transport = Arc::new(MockTransport::new());
        let client = DossierClient::new(transport.clone(), BASE);
        let file = DossierFile {
            name: "Bare".into(),
            ..DossierFile::default()
        };

        let response = client
            .upload_files(UploadRequest {
                file,
                files: vec![png("a.png")],
                merge: false,
            })
            .await;

        assert!(matches!(response.error, Some(Error::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn import_stops_at_first_failure_without_uploading() {
        let mut first = Response::default();
        first.value = Some(Body::Bytes(vec![9, 9]));
        first.content_type = Some("image/png".into());
        let transport = Arc::new(
            MockTransport::new()
                .route("/one", first)
                .route("/two", Response::failed(Error::http(404, "Not Found")))
                .route("/three", Response::default())
                .route("/publish", Response::default()),
        );
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client
            .import_from_urls(ImportRequest {
                file: slot(),
                urls: vec![
                    "http://ext/one".into(),
                    "http://ext/two".into(),
                    "http://ext/three".into(),
                ],
                merge: false,
            })
            .await;

        assert_eq!(transport.urls(), ["http://ext/one", "http://ext/two"]);
        let error = response.error.unwrap();
        assert!(error.to_string().contains("http://ext/two"));
        assert!(matches!(error, Error::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn import_uploads_downloaded_bytes_in_order() {
        let mut first = Response::default();
        first.value = Some(Body::Bytes(vec![1]));
        first.content_type = Some("image/png".into());
        let mut second = Response::default();
        second.value = Some(Body::Bytes(vec![2]));
        let transport = Arc::new(
            MockTransport::new()
                .route("/one.png", first)
                .route("/two", second)
                .route("/update", Response::default()),
        );
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client
            .import_from_urls(ImportRequest {
                file: slot(),
                urls: vec!["http://ext/one.png".into(), "http://ext/two".into()],
                merge: true,
            })
            .await;

        assert!(!response.is_err());
        let upload = transport.requests().remove(2);
        let Some(RequestBody::Multipart(parts)) = upload.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts[0].bytes, vec![1]);
        assert_eq!(parts[0].media_type, "image/png");
        assert_eq!(parts[1].bytes, vec![2]);
        assert_eq!(parts[1].media_type, OCTET_STREAM);
    }

    #[tokio::test]
    async fn import_rejects_empty_download() {
        let transport = Arc::new(
            MockTransport::new()
                .route("/empty", Response::default())
                .route("/publish", Response::default()),
        );
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client
            .import_from_urls(ImportRequest {
                file: slot(),
                urls: vec!["http://ext/empty".into()],
                merge: false,
            })
            .await;

        assert!(matches!(response.error, Some(Error::Validation(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn set_context_puts_json() {
        let transport = Arc::new(MockTransport::new().route("/context", Response::default()));
        let client = DossierClient::new(transport.clone(), BASE);

        client
            .set_context(&slot(), ContextPayload::Json(json!({"a": 1})))
            .await;
        client.set_context(&slot(), ContextPayload::Empty).await;

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(
            requests[0].body,
            Some(RequestBody::Json(r#"{"a":1}"#.into()))
        );
        assert_eq!(requests[1].body, Some(RequestBody::Json("{}".into())));
    }

    #[tokio::test]
    async fn context_without_link_is_validation_error() {
        let transport = Arc::new(MockTransport::new());
        let client = DossierClient::new(transport.clone(), BASE);

        let response = client.get_context(&DossierFile::default()).await;

        assert!(matches!(response.error, Some(Error::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn fetch_container_requires_link() {
        let client = DossierClient::new(Arc::new(MockTransport::new()), BASE);
        let result = client.fetch_container(&slot()).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn fetch_container_returns_pages_and_resolved_url() {
        let mut index = Response::json(json!([{"name": "1.png"}, {"name": "2.png"}]));
        index.url = Some("http://svc/c/index.json".into());
        let transport = Arc::new(MockTransport::new().route("path=index.json", index));
        let client = DossierClient::new(transport, BASE);
        let mut file = slot();
        file.links.insert(Rel::PdfContainer, "https://x/c?path=index.json");

        let container = client.fetch_container(&file).await.unwrap();

        assert_eq!(container.url, "http://svc/c/index.json");
        assert_eq!(container.pages.len(), 2);
    }

    #[tokio::test]
    async fn rotation_without_link_is_local_only() {
        let transport = Arc::new(MockTransport::new());
        let client = DossierClient::new(transport.clone(), BASE);

        assert!(client.save_rotation(&slot(), 90).await.is_ok());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn rotation_with_link_is_put() {
        let transport = Arc::new(MockTransport::new().route("/rotation", Response::default()));
        let client = DossierClient::new(transport.clone(), BASE);
        let mut file = slot();
        file.links
            .insert(Rel::Rotation, "https://h/dossiers/K/P/C/A/rotation");

        client.save_rotation(&file, 270).await.unwrap();

        let request = transport.requests().remove(0);
        assert_eq!(request.url, "http://svc/api/dossiers/K/P/C/A/rotation");
        assert_eq!(
            request.body,
            Some(RequestBody::Json(r#"{"angle":270}"#.into()))
        );
    }

    #[test]
    fn inline_src_is_rebased_and_cache_busted() {
        let client = DossierClient::new(Arc::new(MockTransport::new()), BASE);
        let mut file = slot();
        file.last_modified = Some("2024-01-01T10:00".into());
        file.links
            .insert(Rel::Inline, "https://h/dossiers/K/P/C/A/inline?x=1");

        assert_eq!(
            inline_src(&client, &file).as_deref(),
            Some("http://svc/api/dossiers/K/P/C/A/inline?x=1&_nocache=202401011000")
        );
    }
}
