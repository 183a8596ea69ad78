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

mod core_error;
pub use core_error::*;

/// Errors and error details returned by Service RPCs.
///
/// The client libraries distinguish between errors detected locally (e.g. a
/// request that cannot be paginated), errors in the transport, and errors
/// returned by the service itself.
///
/// The types in this module represent detailed information returned by the
/// Google Cloud services. Long-running operations that fail also report
/// their failure using [Status][rpc::Status].
///
/// # Examples
///
/// ```
/// # use google_cloud_gax::error;
/// use error::Error;
/// fn handle_error(e: Error) {
///     if let Some(status) = e.status() {
///         println!("the service reported {status:?}")
///     }
/// }
/// ```
pub mod rpc;
