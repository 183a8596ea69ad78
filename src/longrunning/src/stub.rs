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

//! Traits to mock the clients in this library.
//!
//! Application developers may need to mock the clients in this library to test
//! how their application works with different (and sometimes hard to trigger)
//! client and service behavior. Such test can define mocks implementing the
//! trait(s) defined in this module, initialize the client with an instance of
//! this mock in their tests, and verify their application responds as expected.

use crate::Result;
use crate::model::{
    CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, ListOperationsRequest,
    ListOperationsResponse, Operation,
};
use gax::options::RequestOptions;
use gax::response::Response;

const UNIMPLEMENTED: &str = concat!(
    "to prevent breaking changes as services gain new RPCs, the stub ",
    "traits provide default implementations of each method. In the client ",
    "libraries, all implementations of the traits override all methods. ",
    "The only expected context for this error is test code mocking the ",
    "client libraries. If that is how you got this error, verify that you ",
    "have mocked all methods used in your test."
);

/// Defines the trait used to implement [crate::client::Operations].
///
/// Application developers may need to implement this trait to mock
/// `client::Operations`. In other use-cases, application developers only
/// use `client::Operations` and need not be concerned with this trait or
/// its implementations.
///
/// Services gain new RPCs routinely. Consequently, this trait gains new methods
/// too. To avoid breaking applications the trait provides a default
/// implementation of each method. These implementations panic.
pub trait Operations: std::fmt::Debug + Send + Sync {
    /// Implements [crate::client::Operations::list_operations].
    fn list_operations(
        &self,
        _req: ListOperationsRequest,
        _options: RequestOptions,
    ) -> impl std::future::Future<Output = Result<Response<ListOperationsResponse>>> + Send {
        unimplemented_stub::<ListOperationsResponse>()
    }

    /// Implements [crate::client::Operations::get_operation].
    fn get_operation(
        &self,
        _req: GetOperationRequest,
        _options: RequestOptions,
    ) -> impl std::future::Future<Output = Result<Response<Operation>>> + Send {
        unimplemented_stub::<Operation>()
    }

    /// Implements [crate::client::Operations::delete_operation].
    fn delete_operation(
        &self,
        _req: DeleteOperationRequest,
        _options: RequestOptions,
    ) -> impl std::future::Future<Output = Result<Response<()>>> + Send {
        unimplemented_stub::<()>()
    }

    /// Implements [crate::client::Operations::cancel_operation].
    fn cancel_operation(
        &self,
        _req: CancelOperationRequest,
        _options: RequestOptions,
    ) -> impl std::future::Future<Output = Result<Response<()>>> + Send {
        unimplemented_stub::<()>()
    }
}

async fn unimplemented_stub<T: Send>() -> Result<Response<T>> {
    unimplemented!("{UNIMPLEMENTED}");
}

#[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
pub mod dynamic {
    //! A dyn-compatible version of the stub traits.
    //!
    //! The client stores its stub as an `Arc<dyn dynamic::Operations>`. Any
    //! type implementing [super::Operations] implements this trait too.
    use super::*;

    /// A dyn-compatible, crate-private version of [super::Operations].
    #[async_trait::async_trait]
    pub trait Operations: std::fmt::Debug + Send + Sync {
        async fn list_operations(
            &self,
            req: ListOperationsRequest,
            options: RequestOptions,
        ) -> Result<Response<ListOperationsResponse>>;

        async fn get_operation(
            &self,
            req: GetOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<Operation>>;

        async fn delete_operation(
            &self,
            req: DeleteOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<()>>;

        async fn cancel_operation(
            &self,
            req: CancelOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<()>>;
    }

    /// All implementations of [super::Operations] also implement [Operations].
    #[async_trait::async_trait]
    impl<T: super::Operations> Operations for T {
        async fn list_operations(
            &self,
            req: ListOperationsRequest,
            options: RequestOptions,
        ) -> Result<Response<ListOperationsResponse>> {
            T::list_operations(self, req, options).await
        }

        async fn get_operation(
            &self,
            req: GetOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<Operation>> {
            T::get_operation(self, req, options).await
        }

        async fn delete_operation(
            &self,
            req: DeleteOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<()>> {
            T::delete_operation(self, req, options).await
        }

        async fn cancel_operation(
            &self,
            req: CancelOperationRequest,
            options: RequestOptions,
        ) -> Result<Response<()>> {
            T::cancel_operation(self, req, options).await
        }
    }
}
