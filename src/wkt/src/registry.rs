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

//! Decode [Any] payloads into concrete messages by type name.
//!
//! Long-running operations return their results and metadata wrapped in an
//! `Any`. When the application does not name the expected type, the client
//! libraries consult a [TypeRegistry] to find a decoder for the type URL in
//! the payload.
//!
//! # Example
//! ```
//! # use google_cloud_wkt::{Any, Timestamp};
//! # use google_cloud_wkt::registry::TypeRegistry;
//! let registry = TypeRegistry::with_well_known_types();
//! let any = Any::from_msg(&Timestamp::clamp(123, 0))?;
//! let decoded = registry.decode(&any).expect("Timestamp is registered")?;
//! assert_eq!(decoded.downcast_ref::<Timestamp>(), Some(&Timestamp::clamp(123, 0)));
//! # Ok::<(), google_cloud_wkt::AnyError>(())
//! ```

use crate::message::Message;
use crate::{Any, AnyError};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A type-erased message.
///
/// Decoding an [Any] without knowing the type at compile time produces one
/// of these. Applications use [downcast_ref][dyn AnyMessage::downcast_ref] to
/// recover the concrete type.
pub trait AnyMessage: std::fmt::Debug + Send + Sync + 'static {
    /// The type URL of the message.
    fn type_url(&self) -> &'static str;

    /// The JSON representation of the message.
    fn to_json(&self) -> Result<serde_json::Value, AnyError>;

    /// Wraps a copy of the message in an [Any].
    fn to_any(&self) -> Result<Any, AnyError>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn std::any::Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any>;
}

impl<T> AnyMessage for T
where
    T: Message + std::fmt::Debug + Send + Sync + 'static,
{
    fn type_url(&self) -> &'static str {
        T::typename()
    }

    fn to_json(&self) -> Result<serde_json::Value, AnyError> {
        serde_json::to_value(self).map_err(AnyError::ser)
    }

    fn to_any(&self) -> Result<Any, AnyError> {
        Any::from_msg(self)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

impl dyn AnyMessage {
    /// Returns true if the message is a `T`.
    pub fn is<T: AnyMessage>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the message if it is a `T`.
    pub fn downcast_ref<T: AnyMessage>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Converts the message into a `T`, or returns it unchanged on a type
    /// mismatch.
    pub fn downcast<T: AnyMessage>(self: Box<Self>) -> Result<Box<T>, Box<dyn AnyMessage>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(t) => Ok(t),
                Err(_) => unreachable!("type checked before downcast"),
            }
        } else {
            Err(self)
        }
    }
}

type Decoder = fn(&Any) -> Result<Box<dyn AnyMessage>, AnyError>;

fn decoder<T>(any: &Any) -> Result<Box<dyn AnyMessage>, AnyError>
where
    T: Message + std::fmt::Debug + Send + Sync + 'static,
{
    let msg = any.to_msg::<T>()?;
    Ok(Box::new(msg))
}

fn key(type_url: &str) -> &str {
    match type_url.rsplit_once('/') {
        Some((_, name)) => name,
        None => type_url,
    }
}

/// Maps type names to decoders.
///
/// Lookups ignore the host portion of the type URL, so
/// `type.googleapis.com/google.protobuf.Empty` and
/// `example.com/google.protobuf.Empty` find the same decoder.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<String, Decoder>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.decoders.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("TypeRegistry")
            .field("types", &names)
            .finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry containing the well-known types.
    pub fn with_well_known_types() -> Self {
        let mut registry = Self::new();
        registry
            .register::<crate::Timestamp>()
            .register::<crate::Empty>();
        registry
    }

    /// Adds a message type. Registering the same type twice is harmless.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Message + std::fmt::Debug + Send + Sync + 'static,
    {
        self.decoders
            .insert(key(T::typename()).to_string(), decoder::<T>);
        self
    }

    /// Returns true if there is a decoder for `type_url`.
    pub fn contains(&self, type_url: &str) -> bool {
        self.decoders.contains_key(key(type_url))
    }

    /// Decodes the message in `any`.
    ///
    /// Returns `None` if the payload has no type URL or the type is not
    /// registered.
    pub fn decode(&self, any: &Any) -> Option<Result<Box<dyn AnyMessage>, AnyError>> {
        let type_url = any.type_url()?;
        let decoder = self.decoders.get(key(type_url))?;
        Some(decoder(any))
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL: RwLock<TypeRegistry> = RwLock::new(TypeRegistry::with_well_known_types());
}

/// Returns the process-wide registry.
///
/// The registry starts with the well-known types. Client libraries add their
/// own message types with [register].
pub fn global() -> RwLockReadGuard<'static, TypeRegistry> {
    GLOBAL.read().unwrap_or_else(|e| e.into_inner())
}

fn global_mut() -> RwLockWriteGuard<'static, TypeRegistry> {
    GLOBAL.write().unwrap_or_else(|e| e.into_inner())
}

/// Adds a message type to the process-wide registry.
pub fn register<T>()
where
    T: Message + std::fmt::Debug + Send + Sync + 'static,
{
    global_mut().register::<T>();
}
