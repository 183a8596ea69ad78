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
use serde::{Deserialize, Serialize};
use wkt::message::Message;
use wkt::reflect::{FieldDescriptor, FieldKind, MessageDescriptor, Reflect};

/// This resource represents a long-running operation that is the result of a
/// network API call.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "wire::Operation", into = "wire::Operation")]
#[non_exhaustive]
pub struct Operation {
    /// The server-assigned name, which is only unique within the same service
    /// that originally returns it.
    pub name: String,

    /// Service-specific metadata associated with the operation. It typically
    /// contains progress information and common metadata such as create time.
    pub metadata: Option<wkt::Any>,

    /// If the value is `false`, it means the operation is still in progress.
    /// If `true`, the operation is completed, and either `error` or `response`
    /// is available.
    pub done: bool,

    /// The operation result, which can be either an `error` or a valid
    /// `response`. If `done` == `false`, neither `error` nor `response` is
    /// set.
    pub result: Option<operation::Result>,
}

impl Operation {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [name][Operation::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [metadata][Operation::metadata].
    pub fn set_metadata<T: Into<wkt::Any>>(mut self, v: T) -> Self {
        self.metadata = Some(v.into());
        self
    }

    /// Sets or clears the value of [metadata][Operation::metadata].
    pub fn set_or_clear_metadata<T: Into<wkt::Any>>(mut self, v: Option<T>) -> Self {
        self.metadata = v.map(|x| x.into());
        self
    }

    /// Sets the value of [done][Operation::done].
    pub fn set_done(mut self, v: bool) -> Self {
        self.done = v;
        self
    }

    /// Sets the value of [result][Operation::result].
    ///
    /// Note that all the setters affecting `result` are mutually exclusive.
    pub fn set_result<T: Into<Option<operation::Result>>>(mut self, v: T) -> Self {
        self.result = v.into();
        self
    }

    /// The value of [result][Operation::result] if it holds an `Error`.
    pub fn error(&self) -> Option<&Status> {
        match &self.result {
            Some(operation::Result::Error(e)) => Some(e),
            _ => None,
        }
    }

    /// Sets [result][Operation::result] to hold an `Error`.
    pub fn set_error<T: Into<Status>>(mut self, v: T) -> Self {
        self.result = Some(operation::Result::Error(Box::new(v.into())));
        self
    }

    /// The value of [result][Operation::result] if it holds a `Response`.
    pub fn response(&self) -> Option<&wkt::Any> {
        match &self.result {
            Some(operation::Result::Response(r)) => Some(r),
            _ => None,
        }
    }

    /// Sets [result][Operation::result] to hold a `Response`.
    pub fn set_response<T: Into<wkt::Any>>(mut self, v: T) -> Self {
        self.result = Some(operation::Result::Response(Box::new(v.into())));
        self
    }
}

impl Message for Operation {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.Operation"
    }
}

impl Reflect for Operation {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.Operation",
            &[
                FieldDescriptor::new("name", "name", 1, FieldKind::String),
                FieldDescriptor::new("metadata", "metadata", 2, FieldKind::Message(wkt::Any::descriptor)),
                FieldDescriptor::new("done", "done", 3, FieldKind::Bool),
                FieldDescriptor::new("error", "error", 4, FieldKind::Message(Status::descriptor)),
                FieldDescriptor::new("response", "response", 5, FieldKind::Message(wkt::Any::descriptor)),
            ],
        );
        &DESCRIPTOR
    }
}

/// Defines additional types related to [Operation].
pub mod operation {
    use gax::error::rpc::Status;

    /// The operation result, which can be either an `error` or a valid
    /// `response`.
    #[derive(Clone, Debug, PartialEq)]
    #[non_exhaustive]
    pub enum Result {
        /// The error result of the operation in case of failure or
        /// cancellation.
        Error(Box<Status>),
        /// The normal, successful response of the operation.
        Response(Box<wkt::Any>),
    }
}

/// The JSON form of [Operation], with the `result` oneof spread over two
/// fields.
mod wire {
    use gax::error::rpc::Status;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Default, Deserialize, Serialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Operation {
        #[serde(skip_serializing_if = "String::is_empty")]
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<wkt::Any>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        done: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<Status>,
        #[serde(skip_serializing_if = "Option::is_none")]
        response: Option<wkt::Any>,
    }

    impl From<Operation> for super::Operation {
        fn from(value: Operation) -> Self {
            use super::operation::Result;
            // If both are present the error wins.
            let result = match (value.error, value.response) {
                (Some(e), _) => Some(Result::Error(Box::new(e))),
                (None, Some(r)) => Some(Result::Response(Box::new(r))),
                (None, None) => None,
            };
            Self {
                name: value.name,
                metadata: value.metadata,
                done: value.done,
                result,
            }
        }
    }

    impl From<super::Operation> for Operation {
        fn from(value: super::Operation) -> Self {
            use super::operation::Result;
            let (error, response) = match value.result {
                Some(Result::Error(e)) => (Some(*e), None),
                Some(Result::Response(r)) => (None, Some(*r)),
                None => (None, None),
            };
            Self {
                name: value.name,
                metadata: value.metadata,
                done: value.done,
                error,
                response,
            }
        }
    }
}

/// The request message for [Operations.GetOperation][crate::client::Operations::get_operation].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct GetOperationRequest {
    /// The name of the operation resource.
    pub name: String,
}

impl GetOperationRequest {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [name][GetOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

impl Message for GetOperationRequest {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.GetOperationRequest"
    }
}

impl Reflect for GetOperationRequest {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.GetOperationRequest",
            &[FieldDescriptor::new("name", "name", 1, FieldKind::String)],
        );
        &DESCRIPTOR
    }
}

/// The request message for [Operations.CancelOperation][crate::client::Operations::cancel_operation].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct CancelOperationRequest {
    /// The name of the operation resource to be cancelled.
    pub name: String,
}

impl CancelOperationRequest {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [name][CancelOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

impl Message for CancelOperationRequest {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.CancelOperationRequest"
    }
}

impl Reflect for CancelOperationRequest {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.CancelOperationRequest",
            &[FieldDescriptor::new("name", "name", 1, FieldKind::String)],
        );
        &DESCRIPTOR
    }
}

/// The request message for [Operations.DeleteOperation][crate::client::Operations::delete_operation].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct DeleteOperationRequest {
    /// The name of the operation resource to be deleted.
    pub name: String,
}

impl DeleteOperationRequest {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [name][DeleteOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

impl Message for DeleteOperationRequest {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.DeleteOperationRequest"
    }
}

impl Reflect for DeleteOperationRequest {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.DeleteOperationRequest",
            &[FieldDescriptor::new("name", "name", 1, FieldKind::String)],
        );
        &DESCRIPTOR
    }
}

/// The request message for [Operations.ListOperations][crate::client::Operations::list_operations].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ListOperationsRequest {
    /// The name of the operation's parent resource.
    pub name: String,

    /// The standard list filter.
    pub filter: String,

    /// The standard list page size.
    pub page_size: i32,

    /// The standard list page token.
    pub page_token: String,
}

impl ListOperationsRequest {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [name][ListOperationsRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [filter][ListOperationsRequest::filter].
    pub fn set_filter<T: Into<String>>(mut self, v: T) -> Self {
        self.filter = v.into();
        self
    }

    /// Sets the value of [page_size][ListOperationsRequest::page_size].
    pub fn set_page_size<T: Into<i32>>(mut self, v: T) -> Self {
        self.page_size = v.into();
        self
    }

    /// Sets the value of [page_token][ListOperationsRequest::page_token].
    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }
}

impl Message for ListOperationsRequest {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.ListOperationsRequest"
    }
}

impl Reflect for ListOperationsRequest {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.ListOperationsRequest",
            &[
                FieldDescriptor::new("filter", "filter", 1, FieldKind::String),
                FieldDescriptor::new("page_size", "pageSize", 2, FieldKind::Int32),
                FieldDescriptor::new("page_token", "pageToken", 3, FieldKind::String),
                FieldDescriptor::new("name", "name", 4, FieldKind::String),
            ],
        );
        &DESCRIPTOR
    }
}

/// The response message for [Operations.ListOperations][crate::client::Operations::list_operations].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ListOperationsResponse {
    /// A list of operations that matches the specified filter in the request.
    pub operations: Vec<Operation>,

    /// The standard List next-page token.
    pub next_page_token: String,
}

impl ListOperationsResponse {
    pub fn new() -> Self {
        std::default::Default::default()
    }

    /// Sets the value of [operations][ListOperationsResponse::operations].
    pub fn set_operations<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<Operation>,
    {
        self.operations = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [next_page_token][ListOperationsResponse::next_page_token].
    pub fn set_next_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.next_page_token = v.into();
        self
    }
}

impl Message for ListOperationsResponse {
    fn typename() -> &'static str {
        "type.googleapis.com/google.longrunning.ListOperationsResponse"
    }
}

impl Reflect for ListOperationsResponse {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.longrunning.ListOperationsResponse",
            &[
                FieldDescriptor::new("operations", "operations", 1, FieldKind::Message(Operation::descriptor))
                    .repeated(),
                FieldDescriptor::new("next_page_token", "nextPageToken", 2, FieldKind::String),
            ],
        );
        &DESCRIPTOR
    }
}
