// SPDX-License-Identifier: MPL-2.0
//! Shared fixtures for integration tests.

use dossier_lens::dossier::DossierParams;
use dossier_lens::error::Error;
use dossier_lens::transport::{Request, Response, Transport};
use futures_util::future::BoxFuture;
use std::sync::Mutex;

pub const BASE: &str = "http://svc/api";

/// Transport answering from a route table and recording every request.
///
/// Routes are matched by URL substring, first match wins.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Vec<(String, Response)>,
    requests: Mutex<Vec<Request>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: &str, response: Response) -> Self {
        self.routes.push((pattern.to_string(), response));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.urls().iter().filter(|url| url.contains(pattern)).count()
    }
}

impl Transport for RecordingTransport {
    fn request(&self, request: Request) -> BoxFuture<'_, Response> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Response::failed(Error::http(404, "Not Found")));
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { response })
    }
}

pub fn params() -> DossierParams {
    DossierParams {
        dossier_key: "K".into(),
        dossier_package: "P".into(),
        dossier_code: "C".into(),
        dossier_mode: "edit".into(),
        external_dossier: None,
    }
}
