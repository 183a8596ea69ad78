// Copyright 2025 Google LLC
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

//! Request builders for [Operations][crate::client::Operations].
//!
//! Each builder holds the request, the request options, and a reference to
//! the client stub. Applications set the request fields with the `set_*`
//! functions, override any options via [RequestOptionsBuilder], and then
//! call `send()`.
//!
//! [RequestOptionsBuilder]: gax::options::RequestOptionsBuilder

use crate::Result;
use crate::model;
use crate::stub::dynamic::Operations as Stub;
use gax::options::RequestOptions;
use gax::options::internal::{RequestBuilder as OptionsBuilder, set_default_idempotency};
use gax::paginator::PagedEnumerable;
use gax::response::Parts;
use std::sync::Arc;

/// The common state for all the request builders.
#[derive(Clone, Debug)]
struct RequestBuilder<R: std::default::Default> {
    stub: Arc<dyn Stub>,
    request: R,
    options: RequestOptions,
}

impl<R> RequestBuilder<R>
where
    R: std::default::Default,
{
    fn new(stub: Arc<dyn Stub>) -> Self {
        Self {
            stub,
            request: R::default(),
            options: RequestOptions::default(),
        }
    }
}

macro_rules! request_builder {
    ($name:ident, $request:ty) => {
        impl $name {
            pub(crate) fn new(stub: Arc<dyn Stub>) -> Self {
                Self(RequestBuilder::new(stub))
            }

            /// Sets the full request, replacing any prior values.
            pub fn with_request<V: Into<$request>>(mut self, v: V) -> Self {
                self.0.request = v.into();
                self
            }

            /// Sets all the options, replacing any prior values.
            pub fn with_request_options<V: Into<RequestOptions>>(mut self, v: V) -> Self {
                self.0.options = v.into();
                self
            }
        }

        #[doc(hidden)]
        impl OptionsBuilder for $name {
            fn request_options(&mut self) -> &mut RequestOptions {
                &mut self.0.options
            }
        }
    };
}

/// The request builder for [Operations::list_operations][crate::client::Operations::list_operations] calls.
///
/// # Example
/// ```
/// # use google_cloud_longrunning::builder::ListOperations;
/// # tokio_test::block_on(async {
/// async fn sample(builder: ListOperations) -> gax::Result<Vec<String>> {
///     let mut names = Vec::new();
///     let mut operations = builder.set_name("projects/my-project").by_page().await?;
///     let mut items = operations.items();
///     while let Some(op) = items.next().await {
///         names.push(op?.name.clone());
///     }
///     Ok(names)
/// }
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct ListOperations(RequestBuilder<model::ListOperationsRequest>);

request_builder!(ListOperations, model::ListOperationsRequest);

impl ListOperations {
    /// Sends the request, returning only the first page.
    pub async fn send(self) -> Result<model::ListOperationsResponse> {
        let options = set_default_idempotency(self.0.options, true);
        tracing::debug!(name = %self.0.request.name, "listing operations");
        self.0
            .stub
            .list_operations(self.0.request, options)
            .await
            .map(gax::response::Response::into_body)
    }

    /// Sends the request, returning the first page wrapped in a
    /// [PagedEnumerable].
    ///
    /// The enumerable fetches the following pages on demand, using the same
    /// request and options. The side value of each page is the response
    /// metadata.
    pub async fn by_page(
        self,
    ) -> Result<
        PagedEnumerable<model::ListOperationsRequest, model::ListOperationsResponse, model::Operation, Parts>,
    > {
        let options = set_default_idempotency(self.0.options, true);
        let stub = self.0.stub;
        let request = self.0.request;
        let (parts, response) = stub
            .list_operations(request.clone(), options.clone())
            .await?
            .into_parts();
        let rpc = move |req: model::ListOperationsRequest, options: RequestOptions| {
            let stub = stub.clone();
            async move {
                let (parts, body) = stub.list_operations(req, options).await?.into_parts();
                Ok::<_, gax::error::Error>((body, parts))
            }
        };
        PagedEnumerable::new(rpc, request, response, parts, options)
    }

    /// Sets the value of [name][model::ListOperationsRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.name = v.into();
        self
    }

    /// Sets the value of [filter][model::ListOperationsRequest::filter].
    pub fn set_filter<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.filter = v.into();
        self
    }

    /// Sets the value of [page_size][model::ListOperationsRequest::page_size].
    pub fn set_page_size<T: Into<i32>>(mut self, v: T) -> Self {
        self.0.request.page_size = v.into();
        self
    }

    /// Sets the value of [page_token][model::ListOperationsRequest::page_token].
    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.page_token = v.into();
        self
    }
}

/// The request builder for [Operations::get_operation][crate::client::Operations::get_operation] calls.
#[derive(Clone, Debug)]
pub struct GetOperation(RequestBuilder<model::GetOperationRequest>);

request_builder!(GetOperation, model::GetOperationRequest);

impl GetOperation {
    /// Sends the request.
    pub async fn send(self) -> Result<model::Operation> {
        let options = set_default_idempotency(self.0.options, true);
        tracing::debug!(name = %self.0.request.name, "getting operation");
        self.0
            .stub
            .get_operation(self.0.request, options)
            .await
            .map(gax::response::Response::into_body)
    }

    /// Sets the value of [name][model::GetOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.name = v.into();
        self
    }
}

/// The request builder for [Operations::delete_operation][crate::client::Operations::delete_operation] calls.
#[derive(Clone, Debug)]
pub struct DeleteOperation(RequestBuilder<model::DeleteOperationRequest>);

request_builder!(DeleteOperation, model::DeleteOperationRequest);

impl DeleteOperation {
    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        let options = set_default_idempotency(self.0.options, true);
        tracing::debug!(name = %self.0.request.name, "deleting operation");
        self.0
            .stub
            .delete_operation(self.0.request, options)
            .await
            .map(gax::response::Response::into_body)
    }

    /// Sets the value of [name][model::DeleteOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.name = v.into();
        self
    }
}

/// The request builder for [Operations::cancel_operation][crate::client::Operations::cancel_operation] calls.
#[derive(Clone, Debug)]
pub struct CancelOperation(RequestBuilder<model::CancelOperationRequest>);

request_builder!(CancelOperation, model::CancelOperationRequest);

impl CancelOperation {
    /// Sends the request.
    pub async fn send(self) -> Result<()> {
        let options = set_default_idempotency(self.0.options, false);
        tracing::debug!(name = %self.0.request.name, "cancelling operation");
        self.0
            .stub
            .cancel_operation(self.0.request, options)
            .await
            .map(gax::response::Response::into_body)
    }

    /// Sets the value of [name][model::CancelOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.0.request.name = v.into();
        self
    }
}
