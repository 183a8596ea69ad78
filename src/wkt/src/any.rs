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

use crate::message::{Message, MessageSerializer};
use crate::reflect::{FieldDescriptor, FieldKind, MessageDescriptor};

/// `Any` contains an arbitrary message along with a URL that describes the
/// type of the message.
///
/// Long-running operations use `Any` to return their metadata and their
/// results, as the type of these payloads depends on the RPC that started the
/// operation.
///
/// # JSON
///
/// The JSON representation of an `Any` value uses the regular representation
/// of the embedded message, with an additional field `@type` which contains the
/// type URL. Example:
///
/// ```norust
///     {
///       "@type": "type.googleapis.com/google.profile.Person",
///       "firstName": <string>,
///       "lastName": <string>
///     }
/// ```
///
/// If the embedded message type has a custom JSON representation, that
/// representation is stored in a `value` field:
///
/// ```norust
///     {
///       "@type": "type.googleapis.com/google.protobuf.Timestamp",
///       "value": "2025-05-16T09:46:12Z"
///     }
/// ```
///
/// # Example
/// ```
/// # use google_cloud_wkt::{Any, AnyError, Timestamp};
/// let ts = Timestamp::clamp(1747388772, 0);
/// let any = Any::from_msg(&ts)?;
/// assert_eq!(any.type_url(), Some("type.googleapis.com/google.protobuf.Timestamp"));
/// assert_eq!(any.to_msg::<Timestamp>()?, ts);
/// # Ok::<(), AnyError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Any(serde_json::Map<String, serde_json::Value>);

/// Indicates a problem trying to use an [Any].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AnyError {
    /// Problem serializing an object into an [Any].
    #[error("cannot serialize object into an Any, source={0}")]
    Serialization(#[source] BoxedError),

    /// Problem deserializing an object from an [Any].
    #[error("cannot deserialize from an Any, source={0}")]
    Deserialization(#[source] BoxedError),

    /// Mismatched type, the [Any] does not contain the desired type.
    #[error("expected type mismatch in Any deserialization has={has}, want={want}")]
    TypeMismatch {
        /// The type URL contained in the `Any`.
        has: String,
        /// The type URL of the desired type.
        want: String,
    },
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

impl AnyError {
    pub(crate) fn ser<T: Into<BoxedError>>(v: T) -> Self {
        Self::Serialization(v.into())
    }

    pub(crate) fn deser<T: Into<BoxedError>>(v: T) -> Self {
        Self::Deserialization(v.into())
    }

    fn mismatch(has: &str, want: &str) -> Self {
        Self::TypeMismatch {
            has: has.into(),
            want: want.into(),
        }
    }
}

impl Any {
    /// Returns the type URL of the embedded message, if any.
    pub fn type_url(&self) -> Option<&str> {
        self.0.get("@type").and_then(serde_json::Value::as_str)
    }

    /// Creates a new [Any] from any [Message].
    pub fn from_msg<T: Message>(message: &T) -> Result<Self, AnyError> {
        let map = T::serializer().serialize_to_map(message)?;
        Ok(Self(map))
    }

    /// Extracts (if possible) a `T` value from the [Any].
    ///
    /// Fails with [AnyError::TypeMismatch] if the `Any` holds a different
    /// message type.
    pub fn to_msg<T: Message>(&self) -> Result<T, AnyError> {
        let has = self
            .type_url()
            .ok_or_else(|| AnyError::deser("@type field is missing or is not a string"))?;
        if has != T::typename() {
            return Err(AnyError::mismatch(has, T::typename()));
        }
        T::serializer().deserialize_from_map(&self.0)
    }

    /// Describes the fields of `google.protobuf.Any`.
    ///
    /// `Any` is not a [Reflect][crate::reflect::Reflect] message, its JSON
    /// form embeds the payload. Messages with `Any` fields use this
    /// descriptor for the nested type.
    pub fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.protobuf.Any",
            &[
                FieldDescriptor::new("type_url", "typeUrl", 1, FieldKind::String),
                FieldDescriptor::new("value", "value", 2, FieldKind::Bytes),
            ],
        );
        &DESCRIPTOR
    }
}

impl serde::ser::Serialize for Any {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::de::Deserialize<'de> for Any {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Any(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Empty, Timestamp};
    use serde_json::json;
    type Result = anyhow::Result<()>;

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default, rename_all = "camelCase")]
    #[non_exhaustive]
    pub struct Stored {
        #[serde(skip_serializing_if = "String::is_empty")]
        pub parent: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        pub id: String,
    }

    impl Message for Stored {
        fn typename() -> &'static str {
            "type.googleapis.com/wkt.test.Stored"
        }
    }

    #[test]
    fn roundtrip_generic() -> Result {
        let input = Stored {
            parent: "parent".to_string(),
            id: "id".to_string(),
        };
        let any = Any::from_msg(&input)?;
        let got = serde_json::to_value(&any)?;
        let want = json!({"@type": "type.googleapis.com/wkt.test.Stored", "parent": "parent", "id": "id"});
        assert_eq!(got, want);
        assert_eq!(any.to_msg::<Stored>()?, input);
        Ok(())
    }

    #[test]
    fn roundtrip_timestamp() -> Result {
        let input = Timestamp::clamp(60, 0);
        let any = Any::from_msg(&input)?;
        let got = serde_json::to_value(&any)?;
        let want = json!({"@type": "type.googleapis.com/google.protobuf.Timestamp", "value": "1970-01-01T00:01:00Z"});
        assert_eq!(got, want);
        assert_eq!(any.to_msg::<Timestamp>()?, input);
        Ok(())
    }

    #[test]
    fn type_mismatch() -> Result {
        let any = Any::from_msg(&Empty::default())?;
        let got = any.to_msg::<Stored>();
        assert!(
            matches!(&got, Err(AnyError::TypeMismatch { has, want })
                if has == "type.googleapis.com/google.protobuf.Empty" && want == Stored::typename()),
            "{got:?}"
        );
        Ok(())
    }

    #[test]
    fn deserialize_errors() -> Result {
        let any = serde_json::from_value::<Any>(json!({"@type-is-missing": ""}))?;
        assert!(any.type_url().is_none());
        let got = any.to_msg::<Stored>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");

        let any = serde_json::from_value::<Any>(json!({"@type": [1, 2, 3]}))?;
        let got = any.to_msg::<Stored>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");

        let any = serde_json::from_value::<Any>(
            json!({"@type": "type.googleapis.com/google.protobuf.Timestamp", "value": ["1.2s"]}),
        )?;
        let got = any.to_msg::<Timestamp>();
        assert!(matches!(got, Err(AnyError::Deserialization(_))), "{got:?}");
        Ok(())
    }

    #[test]
    fn unknown_type_preserved() -> Result {
        let input = json!({"@type": "type.unknown.tld/this.does.not.Exist", "a": 1});
        let any = serde_json::from_value::<Any>(input.clone())?;
        assert_eq!(any.type_url(), Some("type.unknown.tld/this.does.not.Exist"));
        assert_eq!(serde_json::to_value(&any)?, input);
        Ok(())
    }
}
