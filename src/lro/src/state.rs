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

use gax::error::rpc::Status;
use longrunning::model::operation::Result as OperationResult;
use wkt::registry::AnyMessage;

/// The state of a long-running operation, as of the last poll.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum State {
    /// The operation is still in progress.
    Running,
    /// The operation completed successfully. Some operations complete
    /// without a response.
    Succeeded(Option<wkt::Any>),
    /// The operation completed with an error.
    Failed(Status),
}

impl State {
    pub(crate) fn from_operation(op: &longrunning::model::Operation) -> Self {
        if !op.done {
            return Self::Running;
        }
        match &op.result {
            Some(OperationResult::Error(e)) => Self::Failed(e.as_ref().clone()),
            Some(OperationResult::Response(r)) => Self::Succeeded(Some(r.as_ref().clone())),
            _ => Self::Succeeded(None),
        }
    }

    /// Returns true if the operation completed, successfully or not.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// The decoded contents of a response or metadata `Any`.
///
/// A payload is a decoded message when its type is known, either from a type
/// hint on the operation handle or from a type registry. Otherwise the
/// payload is the `Any` unchanged.
#[derive(Debug)]
pub enum Payload {
    /// The payload decoded into its message type.
    Message(Box<dyn AnyMessage>),
    /// The payload type is not known, the `Any` is returned unchanged.
    Any(wkt::Any),
}

impl Payload {
    /// The type URL of the payload.
    pub fn type_url(&self) -> Option<&str> {
        match self {
            Self::Message(m) => Some(m.type_url()),
            Self::Any(a) => a.type_url(),
        }
    }

    /// Returns true if the payload was decoded.
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    /// Returns a reference to the decoded message, if it is a `T`.
    pub fn downcast_ref<T: AnyMessage>(&self) -> Option<&T> {
        match self {
            Self::Message(m) => m.downcast_ref::<T>(),
            Self::Any(_) => None,
        }
    }

    /// Returns the undecoded `Any`, if the payload type was not known.
    pub fn as_any(&self) -> Option<&wkt::Any> {
        match self {
            Self::Message(_) => None,
            Self::Any(a) => Some(a),
        }
    }
}

/// The outcome of a completed operation.
#[derive(Debug)]
pub enum Results<'a> {
    /// The operation failed.
    Error(&'a Status),
    /// The operation succeeded, with an optional response.
    Response(Option<Payload>),
}

impl Results<'_> {
    /// Returns true if the operation failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
