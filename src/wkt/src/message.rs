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

//! Define traits required of all messages.

use crate::AnyError as Error;

pub(crate) type Map = serde_json::Map<String, serde_json::Value>;

/// A trait that must be implemented by all messages.
///
/// Messages sent to and received from Google Cloud services may be wrapped in
/// [Any][crate::Any]. `Any` uses a `@type` field to encode the type name and
/// then validates extraction and insertion against this type.
pub trait Message: serde::ser::Serialize + serde::de::DeserializeOwned {
    /// The type URL of this message, e.g.
    /// `type.googleapis.com/google.longrunning.Operation`.
    fn typename() -> &'static str;

    /// Returns the serializer used to store this message in an `Any`.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    fn serializer() -> impl MessageSerializer<Self> {
        ObjectSerializer::<Self>::new()
    }
}

pub(crate) mod sealed {
    pub trait MessageSerializer {}
}

/// Stores and extracts a message from the JSON object inside an `Any`.
#[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
pub trait MessageSerializer<T>: sealed::MessageSerializer {
    /// Store the value into a JSON object, including the `@type` field.
    fn serialize_to_map(&self, message: &T) -> Result<Map, Error>;

    /// Extract the value from a JSON object.
    fn deserialize_from_map(&self, map: &Map) -> Result<T, Error>;
}

/// Messages whose JSON form is an object are stored flatly, next to `@type`.
pub(crate) struct ObjectSerializer<T>(std::marker::PhantomData<T>);

impl<T> ObjectSerializer<T> {
    pub fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<T> sealed::MessageSerializer for ObjectSerializer<T> {}

impl<T: Message> MessageSerializer<T> for ObjectSerializer<T> {
    fn serialize_to_map(&self, message: &T) -> Result<Map, Error> {
        match serde_json::to_value(message).map_err(Error::ser)? {
            serde_json::Value::Object(mut map) => {
                map.insert("@type".to_string(), T::typename().into());
                Ok(map)
            }
            _ => Err(Error::ser(
                "unexpected JSON type, messages using the default serializer must be objects",
            )),
        }
    }

    fn deserialize_from_map(&self, map: &Map) -> Result<T, Error> {
        let fields = map
            .iter()
            .filter(|(k, _)| k.as_str() != "@type")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value::<T>(serde_json::Value::Object(fields)).map_err(Error::deser)
    }
}

/// Messages with a custom JSON encoding (e.g. `Timestamp` is a string) are
/// stored in a `value` field.
pub(crate) struct ValueSerializer<T>(std::marker::PhantomData<T>);

impl<T> ValueSerializer<T> {
    pub fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<T> sealed::MessageSerializer for ValueSerializer<T> {}

impl<T: Message> MessageSerializer<T> for ValueSerializer<T> {
    fn serialize_to_map(&self, message: &T) -> Result<Map, Error> {
        let value = serde_json::to_value(message).map_err(Error::ser)?;
        let mut map = Map::new();
        map.insert("@type".to_string(), T::typename().into());
        map.insert("value".to_string(), value);
        Ok(map)
    }

    fn deserialize_from_map(&self, map: &Map) -> Result<T, Error> {
        let value = map
            .get("value")
            .ok_or_else(|| Error::deser("value field is missing"))?;
        serde_json::from_value::<T>(value.clone()).map_err(Error::deser)
    }
}
