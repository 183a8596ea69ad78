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

//! Runtime schema information for messages.
//!
//! Some client library helpers need to inspect the fields of a message
//! without knowing its concrete type. For example, the paginator needs to
//! find the `page_token` field in a request, and the primary repeated field in
//! a response. Generated messages describe their fields with a static
//! [MessageDescriptor], returned by the [Reflect] trait.
//!
//! # Example
//! ```
//! # use google_cloud_wkt::reflect::*;
//! # use google_cloud_wkt::message::Message;
//! #[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
//! #[serde(default, rename_all = "camelCase")]
//! pub struct ListBooksResponse {
//!     pub books: Vec<String>,
//!     pub next_page_token: String,
//! }
//!
//! impl Message for ListBooksResponse {
//!     fn typename() -> &'static str {
//!         "type.googleapis.com/example.v1.ListBooksResponse"
//!     }
//! }
//!
//! impl Reflect for ListBooksResponse {
//!     fn descriptor() -> &'static MessageDescriptor {
//!         static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
//!             "type.googleapis.com/example.v1.ListBooksResponse",
//!             &[
//!                 FieldDescriptor::new("books", "books", 1, FieldKind::String).repeated(),
//!                 FieldDescriptor::new("next_page_token", "nextPageToken", 2, FieldKind::String),
//!             ],
//!         );
//!         &DESCRIPTOR
//!     }
//! }
//!
//! let descriptor = ListBooksResponse::descriptor();
//! assert_eq!(descriptor.name(), "ListBooksResponse");
//! assert_eq!(descriptor.repeated_fields().count(), 1);
//! ```

/// The kind of values stored in a field.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Bytes,
    Enum,
    /// A nested message. The function returns the descriptor of the message
    /// type, this breaks cycles in recursive messages.
    Message(fn() -> &'static MessageDescriptor),
    /// A `map<K, V>` field. Map fields are never repeated.
    Map,
}

impl FieldKind {
    /// Returns true for the signed and unsigned integer kinds.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::UInt32 | Self::UInt64
        )
    }

    /// Returns the descriptor of the nested message type, if any.
    pub fn message_type(&self) -> Option<&'static MessageDescriptor> {
        match self {
            Self::Message(f) => Some(f()),
            _ => None,
        }
    }
}

/// Whether a field holds a single value or a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// Describes a single field in a message.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct FieldDescriptor {
    /// The field name in the `.proto` file, e.g. `next_page_token`.
    pub name: &'static str,
    /// The field name in the JSON representation, e.g. `nextPageToken`.
    pub json_name: &'static str,
    /// The field number.
    pub number: u32,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    /// Creates a singular field descriptor.
    pub const fn new(
        name: &'static str,
        json_name: &'static str,
        number: u32,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            json_name,
            number,
            kind,
            cardinality: Cardinality::Singular,
        }
    }

    /// Changes the descriptor to a repeated field.
    pub const fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, FieldKind::Map)
    }

    /// Returns true for singular `string` fields.
    pub fn is_string(&self) -> bool {
        !self.is_repeated() && matches!(self.kind, FieldKind::String)
    }

    /// Returns true for singular integer fields.
    pub fn is_integer(&self) -> bool {
        !self.is_repeated() && self.kind.is_integer()
    }
}

/// Describes the fields of a message type.
#[derive(Debug)]
pub struct MessageDescriptor {
    typename: &'static str,
    fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Creates a descriptor from the type URL and the fields, in declaration
    /// order.
    pub const fn new(typename: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { typename, fields }
    }

    /// The type URL, e.g. `type.googleapis.com/google.protobuf.Timestamp`.
    pub fn typename(&self) -> &'static str {
        self.typename
    }

    /// The fully qualified name, e.g. `google.protobuf.Timestamp`.
    pub fn full_name(&self) -> &'static str {
        match self.typename.rsplit_once('/') {
            Some((_, name)) => name,
            None => self.typename,
        }
    }

    /// The unqualified name, e.g. `Timestamp`.
    pub fn name(&self) -> &'static str {
        let full = self.full_name();
        match full.rsplit_once('.') {
            Some((_, name)) => name,
            None => full,
        }
    }

    /// All the fields, in declaration order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Finds a field by its `.proto` name or by its JSON name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.json_name == name)
    }

    /// The repeated fields, in declaration order. Map fields are excluded.
    pub fn repeated_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> + use<> {
        self.fields.iter().filter(|f| f.is_repeated() && !f.is_map())
    }

    /// Returns true if both descriptors refer to the same message type.
    pub fn is(&self, other: &MessageDescriptor) -> bool {
        self.typename == other.typename
    }
}

/// Implemented by messages that provide runtime schema information.
pub trait Reflect: crate::message::Message {
    /// The static description of this message type.
    fn descriptor() -> &'static MessageDescriptor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    static FIELDS: [FieldDescriptor; 5] = [
        FieldDescriptor::new("labels", "labels", 5, FieldKind::Map),
        FieldDescriptor::new("tags", "tags", 4, FieldKind::String).repeated(),
        FieldDescriptor::new("items", "items", 2, FieldKind::Bytes).repeated(),
        FieldDescriptor::new("next_page_token", "nextPageToken", 3, FieldKind::String),
        FieldDescriptor::new(
            "create_time",
            "createTime",
            6,
            FieldKind::Message(<Timestamp as Reflect>::descriptor),
        ),
    ];
    static DESCRIPTOR: MessageDescriptor =
        MessageDescriptor::new("type.googleapis.com/test.v1.Sample", &FIELDS);

    #[test]
    fn names() {
        assert_eq!(DESCRIPTOR.typename(), "type.googleapis.com/test.v1.Sample");
        assert_eq!(DESCRIPTOR.full_name(), "test.v1.Sample");
        assert_eq!(DESCRIPTOR.name(), "Sample");

        let bare = MessageDescriptor::new("Bare", &[]);
        assert_eq!(bare.full_name(), "Bare");
        assert_eq!(bare.name(), "Bare");
    }

    #[test]
    fn lookup() {
        let f = DESCRIPTOR.field("next_page_token").map(|f| f.number);
        assert_eq!(f, Some(3));
        let f = DESCRIPTOR.field("nextPageToken").map(|f| f.number);
        assert_eq!(f, Some(3));
        assert!(DESCRIPTOR.field("missing").is_none());
    }

    #[test]
    fn repeated_fields_skip_maps() {
        let got = DESCRIPTOR
            .repeated_fields()
            .map(|f| f.name)
            .collect::<Vec<_>>();
        assert_eq!(got, vec!["tags", "items"]);
    }

    #[test]
    fn predicates() {
        let token = DESCRIPTOR.field("next_page_token").unwrap();
        assert!(token.is_string());
        assert!(!token.is_integer());
        let tags = DESCRIPTOR.field("tags").unwrap();
        assert!(!tags.is_string(), "repeated strings are not string fields");
        assert!(DESCRIPTOR.field("labels").unwrap().is_map());

        let create = DESCRIPTOR.field("create_time").unwrap();
        let nested = create.kind.message_type().unwrap();
        assert!(nested.is(Timestamp::descriptor()));
        assert!(FieldKind::UInt64.is_integer());
        assert!(!FieldKind::Double.is_integer());
    }
}
