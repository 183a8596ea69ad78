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

//! Google Cloud Client Libraries for Rust - Long Running Operations API
//!
//! Services that take a long time to complete return a
//! [google.longrunning.Operation][model::Operation]. The operation is a
//! handle that can be polled, cancelled, or deleted using the `Operations`
//! service defined in this crate.
//!
//! This crate contains:
//! * [model]: the messages used by the service.
//! * [stub]: the trait implemented by transports, and by mocks in tests.
//! * [client::Operations]: the client, which wraps a stub.
//! * [builder]: one request builder for each RPC.

/// The messages and enums that are part of this client library.
pub mod model;

pub mod builder;
pub mod client;
pub mod stub;

pub(crate) use gax::Result;
