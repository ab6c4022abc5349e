// SPDX-License-Identifier: MPL-2.0
//! `reqwest`-backed transport.

use super::{content_type_of, parse_body, Method, Request, RequestBody, Response, Transport};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const USER_AGENT: &str = concat!("DossierLens/", env!("CARGO_PKG_VERSION"));

/// HTTP transport with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    default_headers: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT);

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            client,
            default_headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    fn headers_for(&self, request: &Request) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_static(super::DEFAULT_ACCEPT));

        for (name, value) in self.default_headers.iter().chain(request.headers.iter()) {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Validation(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Validation(format!("invalid header value: {e}")))?;
            map.insert(name, value);
        }

        Ok(map)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .headers(self.headers_for(&request)?);

        match request.body {
            Some(RequestBody::Json(json)) => {
                builder = builder.header(CONTENT_TYPE, "application/json").body(json);
            }
            Some(RequestBody::Multipart(parts)) => {
                let mut form = Form::new();
                for part in parts {
                    let body = Part::bytes(part.bytes)
                        .file_name(part.file_name)
                        .mime_str(&part.media_type)
                        .map_err(|e| Error::Validation(e.to_string()))?;
                    form = form.part(part.field, body);
                }
                builder = builder.multipart(form);
            }
            None => {}
        }

        log::debug!("{:?} {}", request.method, request.url);

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().to_string();
        let header = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let content_type = content_type_of(status.as_u16(), header.as_deref());
        let reason = status.canonical_reason().unwrap_or_default();

        let raw = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .to_vec();

        let (value, error) = parse_body(status.as_u16(), content_type.as_deref(), raw, reason);

        Ok(Response {
            value,
            error,
            url: Some(url),
            content_type,
        })
    }
}

impl Transport for HttpTransport {
    fn request(&self, request: Request) -> BoxFuture<'_, Response> {
        Box::pin(async move {
            match self.execute(request).await {
                Ok(response) => response,
                Err(error) => {
                    log::debug!("request failed: {error}");
                    Response::failed(error)
                }
            }
        })
    }
}
