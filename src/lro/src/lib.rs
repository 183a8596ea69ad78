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

//! Types and functions to make LROs easier to use and to require less boilerplate.
//!
//! Some RPCs start a Long-Running Operation (LRO) and return a
//! [longrunning::model::Operation] describing it. An [Operation] wraps that
//! description and polls the service until the operation completes.
//!
//! * [Operation::reload] refreshes the state once.
//! * [Operation::wait_until_done] polls with exponential backoff until the
//!   operation completes or a deadline expires. [WaitPolicy] configures the
//!   delays and the deadline.
//! * [Operation::response] and [Operation::metadata] decode the payloads,
//!   using a type hint, a [TypeRegistry][wkt::registry::TypeRegistry], or
//!   returning the raw [Any][wkt::Any].

mod operation;
mod state;
mod wait;

pub use operation::Operation;
pub use state::{Payload, Results, State};
pub use wait::WaitPolicy;
