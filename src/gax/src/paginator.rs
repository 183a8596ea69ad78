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

//! Iterate over the results of List RPCs.
//!
//! List RPCs, as defined by [AIP-4233], return their results in pages. Each
//! response contains a page of items, in its primary repeated field, and a
//! `next_page_token`. Fetching the next page requires sending the same
//! request again, with the `page_token` field set to that token.
//!
//! [PagedEnumerable] wraps the first response and the RPC, and fetches the
//! following pages on demand. Applications can iterate over the items, with
//! [items()][PagedEnumerable::items], or over the pages, with
//! [pages()][PagedEnumerable::pages].
//!
//! The request and response types must describe their fields, via
//! [Reflect], so the enumerable can find the `page_token`, `page_size`, and
//! `next_page_token` fields, and the primary repeated field.
//!
//! [AIP-4233]: https://google.aip.dev/client-libraries/4233

use crate::Result;
use crate::error::Error;
use crate::options::RequestOptions;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use wkt::reflect::{FieldDescriptor, MessageDescriptor, Reflect};

type Json = serde_json::Value;
type BoxFuture<R> = Pin<Box<dyn Future<Output = R> + Send>>;
type Rpc<Req, Resp, S> = Box<dyn Fn(Req, RequestOptions) -> BoxFuture<Result<(Resp, S)>> + Send + Sync>;

/// One page of results from a List RPC.
///
/// Contains the items decoded from the primary repeated field, the full
/// response, and the side value returned with the response (for example, the
/// response headers).
#[derive(Clone, Debug)]
pub struct Page<Resp, T, S = ()> {
    items: Vec<T>,
    response: Resp,
    side_value: S,
    next_page_token: String,
}

impl<Resp, T, S> Page<Resp, T, S> {
    /// The items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The response that produced this page.
    pub fn response(&self) -> &Resp {
        &self.response
    }

    /// The side value returned with the response.
    pub fn side_value(&self) -> &S {
        &self.side_value
    }

    /// The token for the next page, empty on the last page.
    pub fn next_page_token(&self) -> &str {
        &self.next_page_token
    }

    /// Returns true if there are more pages after this one.
    pub fn has_next_page(&self) -> bool {
        !self.next_page_token.is_empty()
    }

    /// The number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page has no items. A page may be empty and still
    /// have a next page.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page, returning the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Consumes the page, returning the response and the side value.
    pub fn into_parts(self) -> (Resp, S) {
        (self.response, self.side_value)
    }
}

impl<Resp, T, S> IntoIterator for Page<Resp, T, S> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// The request template, options, and field layout needed to fetch pages.
struct Fetcher<Req, Resp, S> {
    rpc: Rpc<Req, Resp, S>,
    request: Req,
    options: RequestOptions,
    page_token: &'static FieldDescriptor,
    items: &'static FieldDescriptor,
    next_page_token: &'static FieldDescriptor,
}

impl<Req, Resp, S> Fetcher<Req, Resp, S>
where
    Req: Reflect + Clone,
    Resp: Reflect,
{
    fn new(rpc: Rpc<Req, Resp, S>, request: Req, options: RequestOptions) -> Result<Self> {
        let req = Req::descriptor();
        let page_token = req
            .field("page_token")
            .filter(|f| f.is_string())
            .ok_or_else(|| missing(req, "must have a page_token field (String)"))?;
        req.field("page_size")
            .filter(|f| f.is_integer())
            .ok_or_else(|| missing(req, "must have a page_size field (Integer)"))?;

        let resp = Resp::descriptor();
        let items = resp
            .repeated_fields()
            .min_by_key(|f| f.number)
            .ok_or_else(|| missing(resp, "must have one repeated field"))?;
        let next_page_token = resp
            .field("next_page_token")
            .filter(|f| f.is_string())
            .ok_or_else(|| missing(resp, "must have a next_page_token field (String)"))?;

        Ok(Self {
            rpc,
            request,
            options,
            page_token,
            items,
            next_page_token,
        })
    }

    /// Decodes the items and the next page token from a response.
    fn page<T: DeserializeOwned>(&self, response: Resp, side_value: S) -> Result<Page<Resp, T, S>> {
        let json = serde_json::to_value(&response).map_err(Error::deser)?;
        let items = match lookup(&json, self.items) {
            None | Some(Json::Null) => Vec::new(),
            Some(v) => serde_json::from_value::<Vec<T>>(v.clone()).map_err(Error::deser)?,
        };
        let next_page_token = match lookup(&json, self.next_page_token) {
            None | Some(Json::Null) => String::new(),
            Some(Json::String(s)) => s.clone(),
            Some(v) => {
                return Err(Error::deser(format!(
                    "expected a string in {}.{}, got {v}",
                    Resp::descriptor().full_name(),
                    self.next_page_token.name
                )));
            }
        };
        Ok(Page {
            items,
            response,
            side_value,
            next_page_token,
        })
    }

    /// Returns a copy of the request template with the page token set.
    fn request(&self, token: &str) -> Result<Req> {
        crate::protobuf::with_field(&self.request, self.page_token.name, token)
    }

    async fn fetch<T: DeserializeOwned>(&self, token: &str) -> Result<Page<Resp, T, S>> {
        let request = self.request(token)?;
        let (response, side_value) = (self.rpc)(request, self.options.clone()).await?;
        let page = self.page::<T>(response, side_value)?;
        tracing::debug!(
            response = Resp::descriptor().full_name(),
            page_token = token,
            items = page.len(),
            next_page_token = page.next_page_token(),
            "fetched page"
        );
        Ok(page)
    }
}

fn missing(descriptor: &MessageDescriptor, requirement: &str) -> Error {
    Error::invalid_argument(format!("{} {requirement}", descriptor.full_name()))
}

fn lookup<'a>(json: &'a Json, field: &FieldDescriptor) -> Option<&'a Json> {
    json.get(field.json_name).or_else(|| json.get(field.name))
}

/// A lazy, paginated sequence of results from a List RPC.
///
/// The enumerable holds the current page. Iterating past the end of the
/// current page fetches the next page, using the request template with its
/// `page_token` set to the `next_page_token` of the current page. Iteration
/// ends after a page with an empty `next_page_token`.
///
/// Cursors start at the beginning of the current page. Restarting from the
/// first page requires a new enumerable.
///
/// # Parameters
/// * `Req` - the request type.
/// * `Resp` - the response type.
/// * `T` - the type of the items in the primary repeated field.
/// * `S` - the side value returned with each response, e.g. the headers.
///
/// # Example
/// ```
/// # use google_cloud_gax::paginator::PagedEnumerable;
/// # use google_cloud_gax::options::RequestOptions;
/// # use google_cloud_gax::Result;
/// # use wkt::message::Message;
/// # use wkt::reflect::*;
/// # #[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
/// # #[serde(default, rename_all = "camelCase")]
/// # struct ListBooksRequest { page_token: String, page_size: i32 }
/// # impl Message for ListBooksRequest { fn typename() -> &'static str { "type.googleapis.com/test.v1.ListBooksRequest" } }
/// # impl Reflect for ListBooksRequest {
/// #     fn descriptor() -> &'static MessageDescriptor {
/// #         static D: MessageDescriptor = MessageDescriptor::new("type.googleapis.com/test.v1.ListBooksRequest", &[
/// #             FieldDescriptor::new("page_size", "pageSize", 1, FieldKind::Int32),
/// #             FieldDescriptor::new("page_token", "pageToken", 2, FieldKind::String),
/// #         ]);
/// #         &D
/// #     }
/// # }
/// # #[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
/// # #[serde(default, rename_all = "camelCase")]
/// # struct ListBooksResponse { books: Vec<String>, next_page_token: String }
/// # impl Message for ListBooksResponse { fn typename() -> &'static str { "type.googleapis.com/test.v1.ListBooksResponse" } }
/// # impl Reflect for ListBooksResponse {
/// #     fn descriptor() -> &'static MessageDescriptor {
/// #         static D: MessageDescriptor = MessageDescriptor::new("type.googleapis.com/test.v1.ListBooksResponse", &[
/// #             FieldDescriptor::new("books", "books", 1, FieldKind::String).repeated(),
/// #             FieldDescriptor::new("next_page_token", "nextPageToken", 2, FieldKind::String),
/// #         ]);
/// #         &D
/// #     }
/// # }
/// async fn list_books(request: ListBooksRequest, _: RequestOptions) -> Result<(ListBooksResponse, ())> {
///     // ... details omitted ...
///     # Ok((ListBooksResponse { books: vec!["c".into()], next_page_token: String::new() }, ()))
/// }
///
/// # tokio_test::block_on(async {
/// let first = ListBooksResponse { books: vec!["a".into(), "b".into()], next_page_token: "p2".into() };
/// let mut books = PagedEnumerable::<_, _, String>::new(
///     list_books, ListBooksRequest::default(), first, (), RequestOptions::default())?;
/// let mut names = Vec::new();
/// let mut items = books.items();
/// while let Some(book) = items.next().await {
///     names.push(book?.clone());
/// }
/// assert_eq!(names, ["a", "b", "c"]);
/// # Ok::<(), google_cloud_gax::error::Error>(()) }).unwrap();
/// ```
pub struct PagedEnumerable<Req, Resp, T, S = ()> {
    fetcher: Fetcher<Req, Resp, S>,
    page: Page<Resp, T, S>,
}

impl<Req, Resp, T, S> PagedEnumerable<Req, Resp, T, S>
where
    Req: Reflect + Clone,
    Resp: Reflect,
    T: DeserializeOwned,
{
    /// Creates a new enumerable from the first response.
    ///
    /// # Parameters
    /// * `rpc` - sends a request for the next page. Typically a closure
    ///   calling one method on a stub.
    /// * `request` - the request that produced `response`.
    /// * `response` - the first page.
    /// * `side_value` - the side value returned with `response`.
    /// * `options` - the options used in each request for a new page.
    ///
    /// # Errors
    ///
    /// Fails with an [invalid argument][Error::is_invalid_argument] error if
    /// `Req` has no `page_token` string field or no `page_size` integer field,
    /// or if `Resp` has no repeated field or no `next_page_token` string field.
    /// When `Resp` has several repeated fields, the field with the lowest
    /// field number holds the items.
    pub fn new<F, Fut>(
        rpc: F,
        request: Req,
        response: Resp,
        side_value: S,
        options: RequestOptions,
    ) -> Result<Self>
    where
        F: Fn(Req, RequestOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(Resp, S)>> + Send + 'static,
    {
        let rpc: Rpc<Req, Resp, S> = Box::new(move |r, o| Box::pin(rpc(r, o)));
        let fetcher = Fetcher::new(rpc, request, options)?;
        let page = fetcher.page::<T>(response, side_value)?;
        Ok(Self { fetcher, page })
    }

    /// The current page.
    pub fn page(&self) -> &Page<Resp, T, S> {
        &self.page
    }

    /// The response for the current page.
    pub fn response(&self) -> &Resp {
        self.page.response()
    }

    /// The side value for the current page.
    pub fn side_value(&self) -> &S {
        self.page.side_value()
    }

    /// The token for the page after the current page.
    pub fn next_page_token(&self) -> &str {
        self.page.next_page_token()
    }

    /// Returns true if there are more pages after the current page.
    pub fn has_next_page(&self) -> bool {
        self.page.has_next_page()
    }

    /// The request template.
    pub fn request(&self) -> &Req {
        &self.fetcher.request
    }

    /// The options used for each page request.
    pub fn options(&self) -> &RequestOptions {
        &self.fetcher.options
    }

    /// Fetches the next page, making it the current page.
    ///
    /// Returns `Ok(None)`, without making any request, if the current page is
    /// the last page. On error the current page is unchanged.
    pub async fn next_page(&mut self) -> Result<Option<&Page<Resp, T, S>>> {
        if self.advance().await? {
            Ok(Some(&self.page))
        } else {
            Ok(None)
        }
    }

    /// Returns a cursor over the items, starting with the current page.
    pub fn items(&mut self) -> Items<'_, Req, Resp, T, S> {
        Items {
            inner: self,
            index: 0,
            done: false,
        }
    }

    /// Returns a cursor over the pages, starting with the current page.
    pub fn pages(&mut self) -> Pages<'_, Req, Resp, T, S> {
        Pages {
            inner: self,
            started: false,
            done: false,
        }
    }

    async fn advance(&mut self) -> Result<bool> {
        if !self.page.has_next_page() {
            return Ok(false);
        }
        let page = self.fetcher.fetch::<T>(&self.page.next_page_token).await?;
        self.page = page;
        Ok(true)
    }
}

/// A cursor over the items of a [PagedEnumerable].
///
/// Obtained from [PagedEnumerable::items].
pub struct Items<'a, Req, Resp, T, S = ()> {
    inner: &'a mut PagedEnumerable<Req, Resp, T, S>,
    index: usize,
    done: bool,
}

impl<Req, Resp, T, S> Items<'_, Req, Resp, T, S>
where
    Req: Reflect + Clone,
    Resp: Reflect,
    T: DeserializeOwned,
{
    /// Returns the next item, fetching the next page if needed.
    ///
    /// Returns `None` after the last item of the last page. If fetching a page
    /// fails the error is returned once, and the cursor is exhausted.
    pub async fn next(&mut self) -> Option<Result<&T>> {
        if self.done {
            return None;
        }
        while self.index >= self.inner.page.items.len() {
            match self.inner.advance().await {
                Ok(true) => self.index = 0,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        let index = self.index;
        self.index += 1;
        Some(Ok(&self.inner.page.items[index]))
    }
}

/// A cursor over the pages of a [PagedEnumerable].
///
/// Obtained from [PagedEnumerable::pages].
pub struct Pages<'a, Req, Resp, T, S = ()> {
    inner: &'a mut PagedEnumerable<Req, Resp, T, S>,
    started: bool,
    done: bool,
}

impl<Req, Resp, T, S> Pages<'_, Req, Resp, T, S>
where
    Req: Reflect + Clone,
    Resp: Reflect,
    T: DeserializeOwned,
{
    /// Returns the next page.
    ///
    /// The first call returns the current page of the enumerable, without
    /// making any requests. If fetching a page fails the error is returned
    /// once, and the cursor is exhausted.
    pub async fn next(&mut self) -> Option<Result<&Page<Resp, T, S>>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Ok(&self.inner.page));
        }
        match self.inner.advance().await {
            Ok(true) => Some(Ok(&self.inner.page)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(feature = "unstable-stream")]
mod stream {
    use super::*;
    use futures::Stream;
    use futures::stream::{StreamExt, TryStreamExt};
    use pin_project::pin_project;

    /// A [Stream] over owned values, returned by the `into_*stream()`
    /// functions.
    #[pin_project]
    pub struct PagedStream<V> {
        #[pin]
        stream: Pin<Box<dyn Stream<Item = Result<V>> + Send>>,
    }

    impl<V> PagedStream<V> {
        /// Returns the next value.
        pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
            StreamExt::next(self)
        }
    }

    impl<V> Stream for PagedStream<V> {
        type Item = Result<V>;

        fn poll_next(
            self: Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Option<Self::Item>> {
            self.project().stream.poll_next(cx)
        }
    }

    enum State<Req, Resp, T, S> {
        Yield(Fetcher<Req, Resp, S>, Page<Resp, T, S>),
        Fetch(Fetcher<Req, Resp, S>, String),
        Done,
    }

    impl<Req, Resp, T, S> State<Req, Resp, T, S> {
        fn after(fetcher: Fetcher<Req, Resp, S>, page: &Page<Resp, T, S>) -> Self {
            if page.has_next_page() {
                Self::Fetch(fetcher, page.next_page_token.clone())
            } else {
                Self::Done
            }
        }
    }

    impl<Req, Resp, T, S> PagedEnumerable<Req, Resp, T, S>
    where
        Req: Reflect + Clone + Send + Sync + 'static,
        Resp: Reflect + Send + 'static,
        T: DeserializeOwned + Send + 'static,
        S: Send + 'static,
    {
        /// Converts the enumerable into a stream of pages, starting with the
        /// current page.
        pub fn into_page_stream(self) -> PagedStream<Page<Resp, T, S>> {
            let start = State::Yield(self.fetcher, self.page);
            let stream = futures::stream::unfold(start, |state| async move {
                match state {
                    State::Done => None,
                    State::Yield(fetcher, page) => {
                        let next = State::after(fetcher, &page);
                        Some((Ok(page), next))
                    }
                    State::Fetch(fetcher, token) => match fetcher.fetch::<T>(&token).await {
                        Ok(page) => {
                            let next = State::after(fetcher, &page);
                            Some((Ok(page), next))
                        }
                        Err(e) => Some((Err(e), State::Done)),
                    },
                }
            });
            PagedStream {
                stream: Box::pin(stream),
            }
        }

        /// Converts the enumerable into a stream of items, starting with the
        /// current page.
        pub fn into_stream(self) -> PagedStream<T> {
            let stream = self
                .into_page_stream()
                .map_ok(|page| futures::stream::iter(page.into_items().into_iter().map(Ok::<T, Error>)))
                .try_flatten();
            PagedStream {
                stream: Box::pin(stream),
            }
        }
    }
}

#[cfg(feature = "unstable-stream")]
pub use stream::PagedStream;
