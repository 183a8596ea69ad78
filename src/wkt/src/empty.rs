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

use crate::reflect::{MessageDescriptor, Reflect};

/// A generic empty message.
///
/// Used as the response of RPCs that return nothing, such as
/// `CancelOperation` and `DeleteOperation`, and as the result of long-running
/// operations that only have side effects.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct Empty {}

impl crate::message::Message for Empty {
    fn typename() -> &'static str {
        "type.googleapis.com/google.protobuf.Empty"
    }
}

impl Reflect for Empty {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor =
            MessageDescriptor::new("type.googleapis.com/google.protobuf.Empty", &[]);
        &DESCRIPTOR
    }
}
