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

//! Google APIs helpers.
//!
//! This crate contains a number of types and functions used in the
//! implementation of the Google Cloud Client Libraries for Rust.
//!
//! * [paginator] iterates over the results of List RPCs, fetching pages on
//!   demand.
//! * [protobuf] converts loosely typed values, such as maps or JSON objects,
//!   into request messages.
//! * [options], [retry_policy], and [polling_backoff_policy] configure the
//!   RPCs issued on behalf of the application.
//!
//! <div class="warning">
//! All the types, traits, and functions defined in the <code>_internal-semver</code>
//! feature are <b>not</b> intended for general use.
//! </div>

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping RPCs.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

pub mod error;
pub mod exponential_backoff;
pub mod options;
pub mod paginator;
pub mod polling_backoff_policy;
pub mod protobuf;
pub mod response;
pub mod retry_policy;
