// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response types.
//!
//! Stubs return the body of each response together with its metadata. Paged
//! enumerations keep the metadata of each page as the page side value, see
//! [PagedEnumerable][crate::paginator::PagedEnumerable].
//!
//! # Example
//!
//! A mock returning a canned body.
//!
//! ```
//! # use google_cloud_gax::Result;
//! # use google_cloud_gax::response::Response;
//! #[derive(Debug, Default)]
//! struct ListShelvesResponse {
//!     shelves: Vec<String>,
//!     next_page_token: String,
//! }
//!
//! fn list_shelves() -> Result<Response<ListShelvesResponse>> {
//!     Ok(Response::from(ListShelvesResponse::default()))
//! }
//! assert!(list_shelves().is_ok_and(|r| r.body().shelves.is_empty()));
//! ```

/// A response body and its metadata.
///
/// The metadata is carried as HTTP headers. gRPC metadata is converted to
/// headers by the transport.
#[derive(Clone, Debug)]
pub struct Response<T> {
    parts: Parts,
    body: T,
}

impl<T> Response<T> {
    /// Wraps `body` with empty metadata.
    pub fn from(body: T) -> Self {
        Self::from_parts(Parts::default(), body)
    }

    pub fn from_parts(parts: Parts, body: T) -> Self {
        Self { parts, body }
    }

    pub fn headers(&self) -> &http::HeaderMap<http::HeaderValue> {
        &self.parts.headers
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    /// Splits the response, paged enumerations keep the [Parts] of each page.
    pub fn into_parts(self) -> (Parts, T) {
        (self.parts, self.body)
    }

    /// Discards the metadata.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// The metadata of a response.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Parts {
    /// The HTTP headers, or the gRPC metadata converted to HTTP headers.
    pub headers: http::HeaderMap<http::HeaderValue>,
}

impl Parts {
    pub fn new() -> Self {
        Parts::default()
    }

    pub fn set_headers<V>(mut self, v: V) -> Self
    where
        V: Into<http::HeaderMap>,
    {
        self.headers = v.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    fn request_id(id: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-request-id", HeaderValue::from_static(id));
        headers
    }

    #[test]
    fn body_only() {
        let response = Response::from(vec!["shelf-1", "shelf-2"]);
        assert!(response.headers().is_empty());
        assert_eq!(response.body().len(), 2);
        assert_eq!(response.into_body(), vec!["shelf-1", "shelf-2"]);
    }

    #[test]
    fn with_parts() {
        let parts = Parts::new().set_headers(request_id("req-123"));
        let response = Response::from_parts(parts.clone(), 42);
        assert_eq!(response.body(), &42);
        assert_eq!(
            response.headers().get("x-goog-request-id"),
            Some(&HeaderValue::from_static("req-123"))
        );

        let (got, body) = response.into_parts();
        assert_eq!(body, 42);
        assert_eq!(got, parts);
        assert_ne!(got, Parts::new());
    }
}
