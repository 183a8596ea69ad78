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

use serde::{Deserialize, Serialize};
use wkt::reflect::{FieldDescriptor, FieldKind, MessageDescriptor, Reflect};

/// The `Status` type defines a logical error model that is suitable for
/// different programming environments, including REST APIs and RPC APIs.
///
/// Each `Status` message contains three pieces of data: error code, error
/// message, and error details. Long-running operations that fail report the
/// failure using a `Status`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Status {
    /// The status code.
    pub code: Code,

    /// A developer-facing error message, which should be in English.
    pub message: String,

    /// A list of messages that carry the error details.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<wkt::Any>,
}

impl Status {
    /// Sets the value for [code][Status::code].
    pub fn set_code<T: Into<Code>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value for [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value for [details][Status::details].
    pub fn set_details<T, I>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: Into<wkt::Any>,
    {
        self.details = v.into_iter().map(|v| v.into()).collect();
        self
    }
}

impl wkt::message::Message for Status {
    fn typename() -> &'static str {
        "type.googleapis.com/google.rpc.Status"
    }
}

impl Reflect for Status {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.rpc.Status",
            &[
                FieldDescriptor::new("code", "code", 1, FieldKind::Int32),
                FieldDescriptor::new("message", "message", 2, FieldKind::String),
                FieldDescriptor::new("details", "details", 3, FieldKind::Message(wkt::Any::descriptor))
                    .repeated(),
            ],
        );
        &DESCRIPTOR
    }
}

/// The canonical error codes for APIs.
//
/// Sometimes multiple error codes may apply. Services should return the most
/// specific error code that applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Code {
    /// Not an error; returned on success.
    Ok = 0,

    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,

    /// Unknown error.
    #[default]
    Unknown = 2,

    /// The client specified an invalid argument.
    InvalidArgument = 3,

    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,

    /// Some requested entity (e.g., file or directory) was not found.
    NotFound = 5,

    /// The entity that a client attempted to create already exists.
    AlreadyExists = 6,

    /// The caller does not have permission to execute the specified operation.
    PermissionDenied = 7,

    /// Some resource has been exhausted.
    ResourceExhausted = 8,

    /// The operation was rejected because the system is not in a state
    /// required for the operation's execution.
    FailedPrecondition = 9,

    /// The operation was aborted.
    Aborted = 10,

    /// The operation was attempted past the valid range.
    OutOfRange = 11,

    /// The operation is not implemented or is not supported/enabled in this
    /// service.
    Unimplemented = 12,

    /// Internal errors.
    Internal = 13,

    /// The service is currently unavailable.
    Unavailable = 14,

    /// Unrecoverable data loss or corruption.
    DataLoss = 15,

    /// The request does not have valid authentication credentials for the
    /// operation.
    Unauthenticated = 16,
}

impl Code {
    /// The name of the code, as used in the REST APIs.
    pub fn name(&self) -> &str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::default(),
        }
    }
}

impl From<Code> for String {
    fn from(value: Code) -> String {
        value.name().to_string()
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Code {
    type Error = String;
    fn try_from(value: &str) -> std::result::Result<Code, Self::Error> {
        match value {
            "OK" => Ok(Code::Ok),
            "CANCELLED" => Ok(Code::Cancelled),
            "UNKNOWN" => Ok(Code::Unknown),
            "INVALID_ARGUMENT" => Ok(Code::InvalidArgument),
            "DEADLINE_EXCEEDED" => Ok(Code::DeadlineExceeded),
            "NOT_FOUND" => Ok(Code::NotFound),
            "ALREADY_EXISTS" => Ok(Code::AlreadyExists),
            "PERMISSION_DENIED" => Ok(Code::PermissionDenied),
            "RESOURCE_EXHAUSTED" => Ok(Code::ResourceExhausted),
            "FAILED_PRECONDITION" => Ok(Code::FailedPrecondition),
            "ABORTED" => Ok(Code::Aborted),
            "OUT_OF_RANGE" => Ok(Code::OutOfRange),
            "UNIMPLEMENTED" => Ok(Code::Unimplemented),
            "INTERNAL" => Ok(Code::Internal),
            "UNAVAILABLE" => Ok(Code::Unavailable),
            "DATA_LOSS" => Ok(Code::DataLoss),
            "UNAUTHENTICATED" => Ok(Code::Unauthenticated),
            _ => Err(format!("unknown status code value {value}")),
        }
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Code::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn status_basic_setters() {
        let got = Status::default()
            .set_code(Code::Unimplemented)
            .set_message("test-message");
        let want = Status {
            code: Code::Unimplemented,
            message: "test-message".into(),
            ..Default::default()
        };
        assert_eq!(got, want);

        let got = Status::default()
            .set_code(Code::Unimplemented as i32)
            .set_message("test-message");
        assert_eq!(got, want);
    }

    #[test]
    fn status_details() -> Result<()> {
        let detail = wkt::Any::from_msg(&wkt::Timestamp::clamp(123, 0))?;
        let status = Status::default()
            .set_code(Code::Aborted)
            .set_details([detail.clone()]);
        let got = serde_json::to_value(&status)?;
        let want = json!({
            "code": 10,
            "message": "",
            "details": [{"@type": "type.googleapis.com/google.protobuf.Timestamp", "value": "1970-01-01T00:02:03Z"}]
        });
        assert_eq!(got, want);
        let roundtrip = serde_json::from_value::<Status>(got)?;
        assert_eq!(roundtrip, status);
        Ok(())
    }

    #[test]
    fn status_in_any() -> Result<()> {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("not here");
        let any = wkt::Any::from_msg(&status)?;
        assert_eq!(any.type_url(), Some("type.googleapis.com/google.rpc.Status"));
        assert_eq!(any.to_msg::<Status>()?, status);
        Ok(())
    }

    #[test_case(Code::Ok)]
    #[test_case(Code::Cancelled)]
    #[test_case(Code::Unknown)]
    #[test_case(Code::InvalidArgument)]
    #[test_case(Code::DeadlineExceeded)]
    #[test_case(Code::NotFound)]
    #[test_case(Code::AlreadyExists)]
    #[test_case(Code::PermissionDenied)]
    #[test_case(Code::ResourceExhausted)]
    #[test_case(Code::FailedPrecondition)]
    #[test_case(Code::Aborted)]
    #[test_case(Code::OutOfRange)]
    #[test_case(Code::Unimplemented)]
    #[test_case(Code::Internal)]
    #[test_case(Code::Unavailable)]
    #[test_case(Code::DataLoss)]
    #[test_case(Code::Unauthenticated)]
    fn code_names(code: Code) -> Result<()> {
        assert_eq!(Code::try_from(code.name()), Ok(code));
        assert_eq!(Code::from(code as i32), code);
        assert_eq!(code.to_string(), code.name());
        assert_eq!(String::from(code), code.name());
        let got = serde_json::to_value(code)?;
        assert_eq!(got, json!(code as i32));
        assert_eq!(serde_json::from_value::<Code>(got)?, code);
        Ok(())
    }

    #[test]
    fn code_unknown_values() {
        assert_eq!(Code::from(-1), Code::Unknown);
        assert_eq!(Code::from(17), Code::Unknown);
        assert!(Code::try_from("NOT-A-CODE").is_err());
    }
}
