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

//! Convert loosely typed values into messages.
//!
//! Applications sometimes build requests from partial, dynamic data: a map
//! read from a configuration file, or a handful of fields collected from the
//! command line. [coerce] turns a nested map of field names to [Value]s into
//! a message, using the message [descriptor][wkt::reflect::MessageDescriptor]
//! to find nested message types.
//!
//! A few conversions are applied along the way:
//! * `google.protobuf.Timestamp` fields accept a [time::OffsetDateTime], or a
//!   map with `seconds` and `nanos`.
//! * `bytes` fields accept a reader, which is drained into the field.
//! * Fields accept an existing message of the right type.
//!
//! All other values are handed to the message deserializer unchanged, which
//! validates them.
//!
//! # Example
//! ```
//! # use google_cloud_gax::protobuf::{coerce, Value};
//! # use wkt::Timestamp;
//! let ts = coerce::<Timestamp>([("seconds", 1747388772_i64), ("nanos", 0)])?;
//! assert_eq!(ts, Timestamp::clamp(1747388772, 0));
//! # Ok::<(), google_cloud_gax::error::Error>(())
//! ```

use crate::Result;
use crate::error::Error;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use wkt::AnyMessage;
use wkt::Timestamp;
use wkt::reflect::{FieldDescriptor, FieldKind, MessageDescriptor, Reflect};

/// The fields of a message, keyed by field name.
///
/// Both the `.proto` field names (`page_token`) and the JSON field names
/// (`pageToken`) are accepted.
pub type Fields = BTreeMap<String, Value>;

/// A loosely typed value, used as input to [coerce].
#[non_exhaustive]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(bytes::Bytes),
    /// A point in time, converted to `google.protobuf.Timestamp` fields.
    Time(time::OffsetDateTime),
    /// A source of bytes, read fully into a `bytes` field.
    Reader(Box<dyn std::io::Read + Send>),
    List(Vec<Value>),
    Map(Fields),
    /// An existing message.
    Message(Box<dyn AnyMessage>),
}

impl Value {
    /// Wraps an existing message.
    pub fn message<M: AnyMessage>(message: M) -> Self {
        Self::Message(Box::new(message))
    }

    /// Wraps a reader, to be consumed by a `bytes` field.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_gax::protobuf::Value;
    /// let value = Value::reader(std::io::Cursor::new(b"hello".to_vec()));
    /// ```
    pub fn reader<R: std::io::Read + Send + 'static>(reader: R) -> Self {
        Self::Reader(Box::new(reader))
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Message(v) => f.debug_tuple("Message").field(v).finish(),
        }
    }
}

macro_rules! from_scalar {
    ($($t:ty => $variant:ident as $as:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::$variant(value as $as)
                }
            }
        )*
    };
}

from_scalar!(
    i32 => Int as i64,
    i64 => Int as i64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bytes::Bytes> for Value {
    fn from(value: bytes::Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<time::OffsetDateTime> for Value {
    fn from(value: time::OffsetDateTime) -> Self {
        Self::Time(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::message(value)
    }
}

impl From<Box<dyn AnyMessage>> for Value {
    fn from(value: Box<dyn AnyMessage>) -> Self {
        Self::Message(value)
    }
}

impl From<Fields> for Value {
    fn from(value: Fields) -> Self {
        Self::Map(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(value: Vec<V>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(value: [(K, V); N]) -> Self {
        Self::Map(
            value
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Self::String(s),
            Json::Array(a) => Self::List(a.into_iter().map(Value::from).collect()),
            Json::Object(o) => Self::Map(o.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

/// Converts `value` into a message of type `T`.
///
/// Returns `value` unchanged if it already holds a `T`. Otherwise `value`
/// must be a map of field names to values, nested messages are converted
/// recursively.
///
/// # Errors
///
/// Fails with an [invalid argument][Error::is_invalid_argument] error if the
/// value is neither a `T` nor a map, if a field name is unknown, if a repeated
/// field is not given a list, or if the message rejects a value. Fails with an
/// [I/O][Error::is_io] error if draining a reader fails.
///
/// # Example
/// ```
/// # use google_cloud_gax::protobuf::{coerce, Value};
/// # use wkt::Timestamp;
/// let ts = Timestamp::clamp(123, 456);
/// assert_eq!(coerce::<Timestamp>(ts)?, ts);
/// let err = coerce::<Timestamp>("2025-01-01T00:00:00Z").unwrap_err();
/// assert!(err.is_invalid_argument(), "{err:?}");
/// # Ok::<(), google_cloud_gax::error::Error>(())
/// ```
pub fn coerce<T>(value: impl Into<Value>) -> Result<T>
where
    T: Reflect + AnyMessage,
{
    let descriptor = T::descriptor();
    match value.into() {
        Value::Message(m) => m.downcast::<T>().map(|t| *t).map_err(|m| {
            Error::invalid_argument(not_a_map(&Value::Message(m), descriptor))
        }),
        Value::Map(fields) if descriptor.is(Timestamp::descriptor()) => {
            let json = timestamp_from_fields(fields)?;
            serde_json::from_value::<T>(json).map_err(Error::invalid_argument)
        }
        Value::Map(fields) => {
            let json = message_to_json(descriptor, fields)?;
            tracing::debug!(message_type = descriptor.full_name(), "coercing map into message");
            serde_json::from_value::<T>(json).map_err(Error::invalid_argument)
        }
        other => Err(Error::invalid_argument(not_a_map(&other, descriptor))),
    }
}

/// Returns a copy of `message` with the field `name` set to `value`.
///
/// The value is converted as in [coerce], the other fields keep their values.
///
/// # Errors
///
/// Fails with an [invalid argument][Error::is_invalid_argument] error if the
/// field name is unknown or if the field rejects the value.
///
/// # Example
/// ```
/// # use google_cloud_gax::protobuf::with_field;
/// # use google_cloud_gax::error::rpc::{Code, Status};
/// let status = Status::default()
///     .set_code(Code::ResourceExhausted)
///     .set_message("quota exceeded");
/// let got = with_field(&status, "message", "try again later")?;
/// assert_eq!(got.code, Code::ResourceExhausted);
/// assert_eq!(got.message, "try again later");
/// # Ok::<(), google_cloud_gax::error::Error>(())
/// ```
pub fn with_field<T>(message: &T, name: &str, value: impl Into<Value>) -> Result<T>
where
    T: Reflect,
{
    let descriptor = T::descriptor();
    let field = descriptor.field(name).ok_or_else(|| {
        Error::invalid_argument(format!(
            "{} has no field named {name}",
            descriptor.full_name()
        ))
    })?;
    let mut json = serde_json::to_value(message).map_err(Error::ser)?;
    let Json::Object(map) = &mut json else {
        return Err(Error::ser(format!(
            "{} is not serialized as a JSON object",
            descriptor.full_name()
        )));
    };
    map.remove(field.name);
    map.insert(
        field.json_name.to_string(),
        field_to_json(descriptor, field, value.into())?,
    );
    serde_json::from_value::<T>(json).map_err(Error::invalid_argument)
}

/// Converts a point in time into a [Timestamp].
///
/// # Example
/// ```
/// # use google_cloud_gax::protobuf::time_to_timestamp;
/// use time::macros::datetime;
/// let ts = time_to_timestamp(datetime!(1970-01-01 00:02:03.5 UTC))?;
/// assert_eq!((ts.seconds(), ts.nanos()), (123, 500_000_000));
/// # Ok::<(), google_cloud_gax::error::Error>(())
/// ```
pub fn time_to_timestamp(value: time::OffsetDateTime) -> Result<Timestamp> {
    Timestamp::try_from(value).map_err(Error::invalid_argument)
}

/// Converts a [Timestamp] into a point in time.
pub fn timestamp_to_time(value: Timestamp) -> Result<time::OffsetDateTime> {
    time::OffsetDateTime::try_from(value).map_err(Error::invalid_argument)
}

fn not_a_map(value: &Value, descriptor: &MessageDescriptor) -> String {
    format!(
        "value {value:?} must be a map or a {}",
        descriptor.full_name()
    )
}

fn message_to_json(descriptor: &MessageDescriptor, fields: Fields) -> Result<Json> {
    let mut map = serde_json::Map::new();
    for (key, value) in fields {
        let field = descriptor.field(&key).ok_or_else(|| {
            Error::invalid_argument(format!(
                "{} has no field named {key}",
                descriptor.full_name()
            ))
        })?;
        let json = field_to_json(descriptor, field, value)?;
        map.insert(field.json_name.to_string(), json);
    }
    Ok(Json::Object(map))
}

fn field_to_json(parent: &MessageDescriptor, field: &FieldDescriptor, value: Value) -> Result<Json> {
    if !field.is_repeated() {
        return element_to_json(field, value);
    }
    match value {
        Value::List(list) => list
            .into_iter()
            .map(|v| element_to_json(field, v))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        Value::Null => Ok(Json::Array(Vec::new())),
        other => Err(Error::invalid_argument(format!(
            "{}.{} is a repeated field, value {other:?} must be a list",
            parent.full_name(),
            field.name
        ))),
    }
}

fn element_to_json(field: &FieldDescriptor, value: Value) -> Result<Json> {
    match (&field.kind, value) {
        (FieldKind::Message(nested), value) => message_value_to_json(nested(), value),
        (FieldKind::Bytes, Value::Reader(reader)) => read_bytes(reader),
        (_, value) => value_to_json(value),
    }
}

fn message_value_to_json(descriptor: &MessageDescriptor, value: Value) -> Result<Json> {
    let is_timestamp = descriptor.is(Timestamp::descriptor());
    match value {
        Value::Null => Ok(Json::Null),
        Value::Time(t) if is_timestamp => {
            let ts = time_to_timestamp(t)?;
            Ok(Json::String(String::from(ts)))
        }
        Value::Map(fields) if is_timestamp => timestamp_from_fields(fields),
        Value::Map(fields) => message_to_json(descriptor, fields),
        Value::Message(m) if m.type_url() == descriptor.typename() => {
            m.to_json().map_err(Error::ser)
        }
        other => Err(Error::invalid_argument(not_a_map(&other, descriptor))),
    }
}

/// Builds the JSON form of a timestamp from its `seconds` and `nanos`.
fn timestamp_from_fields(fields: Fields) -> Result<Json> {
    let mut seconds = 0_i64;
    let mut nanos = 0_i32;
    for (key, value) in fields {
        match (key.as_str(), value) {
            ("seconds", Value::Int(v)) => seconds = v,
            ("seconds", Value::UInt(v)) => {
                seconds = i64::try_from(v).map_err(Error::invalid_argument)?
            }
            ("nanos", Value::Int(v)) => {
                nanos = i32::try_from(v).map_err(Error::invalid_argument)?
            }
            ("nanos", Value::UInt(v)) => {
                nanos = i32::try_from(v).map_err(Error::invalid_argument)?
            }
            ("seconds" | "nanos", other) => {
                return Err(Error::invalid_argument(format!(
                    "google.protobuf.Timestamp.{key} must be an integer, got {other:?}"
                )));
            }
            _ => {
                return Err(Error::invalid_argument(format!(
                    "google.protobuf.Timestamp has no field named {key}"
                )));
            }
        }
    }
    let ts = Timestamp::new(seconds, nanos).map_err(Error::invalid_argument)?;
    Ok(Json::String(String::from(ts)))
}

fn read_bytes(mut reader: Box<dyn std::io::Read + Send>) -> Result<Json> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).map_err(Error::io)?;
    Ok(Json::String(BASE64_STANDARD.encode(buffer)))
}

/// Converts values headed to scalar, enum and map fields.
fn value_to_json(value: Value) -> Result<Json> {
    let json = match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Int(i) => Json::from(i),
        Value::UInt(u) => Json::from(u),
        Value::Float(f) => match serde_json::Number::from_f64(f) {
            Some(n) => Json::Number(n),
            None if f.is_nan() => Json::String("NaN".to_string()),
            None if f > 0.0 => Json::String("Infinity".to_string()),
            None => Json::String("-Infinity".to_string()),
        },
        Value::String(s) => Json::String(s),
        Value::Bytes(b) => Json::String(BASE64_STANDARD.encode(b)),
        Value::Time(t) => Json::String(String::from(time_to_timestamp(t)?)),
        Value::Reader(_) => {
            return Err(Error::invalid_argument(
                "readers can only be used for bytes fields",
            ));
        }
        Value::List(list) => Json::Array(
            list.into_iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => Json::Object(
            map.into_iter()
                .map(|(k, v)| value_to_json(v).map(|v| (k, v)))
                .collect::<Result<serde_json::Map<_, _>>>()?,
        ),
        Value::Message(m) => m.to_json().map_err(Error::ser)?,
    };
    Ok(json)
}
