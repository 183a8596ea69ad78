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

use crate::builder;
use std::sync::Arc;

/// Implements a client for the Long-Running Operations API.
///
/// # Example
/// ```
/// # use google_cloud_longrunning::client::Operations;
/// # use google_cloud_longrunning::stub;
/// # use google_cloud_longrunning::model;
/// # use gax::options::RequestOptions;
/// # use gax::response::Response;
/// #[derive(Debug)]
/// struct Fake;
/// impl stub::Operations for Fake {
///     async fn get_operation(
///         &self,
///         req: model::GetOperationRequest,
///         _options: RequestOptions,
///     ) -> gax::Result<Response<model::Operation>> {
///         Ok(Response::from(model::Operation::new().set_name(req.name).set_done(true)))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let client = Operations::from_stub(Fake);
/// let op = client.get_operation().set_name("operations/op-1").send().await?;
/// assert!(op.done);
/// # Ok::<(), gax::error::Error>(()) }).unwrap();
/// ```
///
/// # Service Description
///
/// Manages long-running operations with an API service.
///
/// When an API method normally takes long time to complete, it can be
/// designed to return [Operation][crate::model::Operation] to the client, and
/// the client can use this interface to receive the real response
/// asynchronously by polling the operation resource.
///
/// # Cloning
///
/// You do not need to wrap `Operations` in an [Rc](std::rc::Rc) or [Arc] to
/// reuse it, because it already uses an `Arc` internally.
#[derive(Clone, Debug)]
pub struct Operations {
    inner: Arc<dyn crate::stub::dynamic::Operations>,
}

impl Operations {
    /// Creates a new client from the provided stub.
    ///
    /// The most common case for calling this function is in tests mocking the
    /// client's behavior.
    pub fn from_stub<T>(stub: T) -> Self
    where
        T: crate::stub::Operations + 'static,
    {
        Self {
            inner: Arc::new(stub),
        }
    }

    /// Lists operations that match the specified filter in the request.
    pub fn list_operations(&self) -> builder::ListOperations {
        builder::ListOperations::new(self.inner.clone())
    }

    /// Gets the latest state of a long-running operation.
    pub fn get_operation(&self) -> builder::GetOperation {
        builder::GetOperation::new(self.inner.clone())
    }

    /// Deletes a long-running operation. This method indicates that the
    /// client is no longer interested in the operation result. It does not
    /// cancel the operation.
    pub fn delete_operation(&self) -> builder::DeleteOperation {
        builder::DeleteOperation::new(self.inner.clone())
    }

    /// Starts asynchronous cancellation on a long-running operation. The
    /// server makes a best effort to cancel the operation, but success is not
    /// guaranteed.
    pub fn cancel_operation(&self) -> builder::CancelOperation {
        builder::CancelOperation::new(self.inner.clone())
    }
}
