// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and a scripted transport.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

// Re-export approx macros for convenient use in tests
pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::error::Error;
use crate::transport::{Request, Response, Transport};
use futures_util::future::BoxFuture;
use std::sync::Mutex;

/// Default epsilon for f32 comparisons.
pub const F32_EPSILON: f32 = 1e-6;

/// Transport answering from a fixed route table and recording every request.
///
/// A request is answered by the first route whose pattern occurs in its URL;
/// unrouted requests fail with a transport error.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Response)>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: &str, response: Response) -> Self {
        self.routes.push((pattern.to_string(), response));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl Transport for MockTransport {
    fn request(&self, request: Request) -> BoxFuture<'_, Response> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| {
                Response::failed(Error::Transport(format!("no route for {}", request.url)))
            });
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { response })
    }
}
