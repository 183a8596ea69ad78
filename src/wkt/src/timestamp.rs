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

use crate::reflect::{FieldDescriptor, FieldKind, MessageDescriptor, Reflect};
use time::format_description::well_known::Rfc3339;

/// Well-known point in time representation for Google APIs.
///
/// # Examples
/// ```
/// # use google_cloud_wkt::{Timestamp, TimestampError};
/// let ts = Timestamp::try_from("2025-05-16T09:46:12.500Z")?;
/// assert_eq!(ts.seconds(), 1747388772);
/// assert_eq!(ts.nanos(), 500_000_000);
/// assert_eq!(ts, Timestamp::new(1747388772, 500_000_000)?);
/// # Ok::<(), TimestampError>(())
/// ```
///
/// A Timestamp represents a point in time independent of any time zone or local
/// calendar, encoded as a count of seconds and fractions of seconds at
/// nanosecond resolution. The count is relative to an epoch at UTC midnight on
/// January 1, 1970.
///
/// The range is from 0001-01-01T00:00:00Z to 9999-12-31T23:59:59.999999999Z,
/// which guarantees conversions to and from [RFC 3339] strings.
///
/// # JSON Mapping
///
/// In JSON format the Timestamp type is encoded as a string in the [RFC 3339]
/// format, for example `"2017-01-15T01:30:15.01Z"`.
///
/// [RFC 3339]: https://www.ietf.org/rfc/rfc3339.txt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

/// Represent failures in converting or creating [Timestamp] instances.
///
/// # Examples
/// ```
/// # use google_cloud_wkt::{Timestamp, TimestampError};
/// let ts = Timestamp::new(Timestamp::MAX_SECONDS + 2, 0);
/// assert!(matches!(ts, Err(TimestampError::OutOfRange)));
///
/// let ts = Timestamp::try_from("invalid");
/// assert!(matches!(ts, Err(TimestampError::Deserialize(_))));
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TimestampError {
    /// One of the components (seconds and/or nanoseconds) was out of range.
    #[error("seconds and/or nanoseconds out of range")]
    OutOfRange,

    /// There was a problem deserializing a timestamp.
    #[error("cannot deserialize timestamp, source={0}")]
    Deserialize(#[source] BoxedError),
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;
type Error = TimestampError;

const NS: i128 = 1_000_000_000;

impl Timestamp {
    const NS: i32 = 1_000_000_000;

    /// The minimum value for the `seconds` component. Corresponds to
    /// '0001-01-01T00:00:00Z'.
    pub const MIN_SECONDS: i64 = -62135596800;

    /// The maximum value for the `seconds` component. Corresponds to
    /// '9999-12-31T23:59:59Z'.
    pub const MAX_SECONDS: i64 = 253402300799;

    /// The minimum value for the `nanos` component.
    pub const MIN_NANOS: i32 = 0;

    /// The maximum value for the `nanos` component.
    pub const MAX_NANOS: i32 = Self::NS - 1;

    /// Creates a new [Timestamp] from the seconds and nanoseconds.
    ///
    /// If either value is out of range it returns an error.
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, Error> {
        if !(Self::MIN_SECONDS..=Self::MAX_SECONDS).contains(&seconds)
            || !(Self::MIN_NANOS..=Self::MAX_NANOS).contains(&nanos)
        {
            return Err(Error::OutOfRange);
        }
        Ok(Self { seconds, nanos })
    }

    /// Creates a normalized, clamped [Timestamp].
    ///
    /// Extra nanoseconds are carried into the seconds, and the result saturates
    /// at the minimum and maximum timestamps.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_wkt::Timestamp;
    /// let ts = Timestamp::clamp(1747388772, 2_000_000_000);
    /// assert_eq!(String::from(ts), "2025-05-16T09:46:14Z");
    /// ```
    pub fn clamp(seconds: i64, nanos: i32) -> Self {
        let seconds = seconds.saturating_add((nanos / Self::NS) as i64);
        let nanos = nanos % Self::NS;
        let (seconds, nanos) = if nanos < 0 {
            (seconds.saturating_sub(1), nanos + Self::NS)
        } else {
            (seconds, nanos)
        };
        if seconds < Self::MIN_SECONDS {
            return Self {
                seconds: Self::MIN_SECONDS,
                nanos: 0,
            };
        }
        if seconds > Self::MAX_SECONDS {
            return Self {
                seconds: Self::MAX_SECONDS,
                nanos: 0,
            };
        }
        Self { seconds, nanos }
    }

    /// Seconds of UTC time since Unix epoch (1970-01-01T00:00:00Z).
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Non-negative fractions of a second at nanosecond resolution.
    ///
    /// Negative second values (before the Unix epoch) with fractions still
    /// have non-negative nanos values that count forward in time.
    pub fn nanos(&self) -> i32 {
        self.nanos
    }
}

impl crate::message::Message for Timestamp {
    fn typename() -> &'static str {
        "type.googleapis.com/google.protobuf.Timestamp"
    }

    #[allow(private_interfaces)]
    fn serializer() -> impl crate::message::MessageSerializer<Self> {
        crate::message::ValueSerializer::<Self>::new()
    }
}

impl Reflect for Timestamp {
    fn descriptor() -> &'static MessageDescriptor {
        static DESCRIPTOR: MessageDescriptor = MessageDescriptor::new(
            "type.googleapis.com/google.protobuf.Timestamp",
            &[
                FieldDescriptor::new("seconds", "seconds", 1, FieldKind::Int64),
                FieldDescriptor::new("nanos", "nanos", 2, FieldKind::Int32),
            ],
        );
        &DESCRIPTOR
    }
}

impl serde::ser::Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let odt = time::OffsetDateTime::try_from(*self)
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        let formatted = odt
            .format(&Rfc3339)
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        formatted.serialize(serializer)
    }
}

struct TimestampVisitor;

impl serde::de::Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string with a timestamp in RFC 3339 format")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Timestamp::try_from(value).map_err(E::custom)
    }
}

impl<'de> serde::de::Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

/// Converts a [Timestamp] to its RFC 3339 representation.
///
/// # Example
/// ```
/// # use google_cloud_wkt::{Timestamp, TimestampError};
/// let ts = Timestamp::new(1747388772, 0)?;
/// assert_eq!(String::from(ts), "2025-05-16T09:46:12Z");
/// # Ok::<(), TimestampError>(())
/// ```
impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        // Unreachable for valid timestamps.
        time::OffsetDateTime::try_from(timestamp)
            .ok()
            .and_then(|odt| odt.format(&Rfc3339).ok())
            .unwrap_or_else(|| format!("{}.{:09}s", timestamp.seconds, timestamp.nanos))
    }
}

/// Parses the RFC 3339 representation of a timestamp.
impl TryFrom<&str> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let odt = time::OffsetDateTime::parse(value, &Rfc3339)
            .map_err(|e| TimestampError::Deserialize(e.into()))?;
        Timestamp::try_from(odt)
    }
}

impl TryFrom<&String> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Timestamp::try_from(value.as_str())
    }
}

/// Converts from [time::OffsetDateTime] to [Timestamp].
///
/// This conversion fails if the value is outside the [Timestamp] range.
///
/// # Example
/// ```
/// # use google_cloud_wkt::Timestamp;
/// use time::macros::datetime;
/// let ts = Timestamp::try_from(datetime!(2025-05-16 09:46:12 UTC))?;
/// assert_eq!(String::from(ts), "2025-05-16T09:46:12Z");
/// # Ok::<(), anyhow::Error>(())
/// ```
impl TryFrom<time::OffsetDateTime> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: time::OffsetDateTime) -> Result<Self, Self::Error> {
        let total = value.unix_timestamp_nanos();
        let seconds = total.div_euclid(NS);
        let nanos = total.rem_euclid(NS) as i32;
        let seconds = i64::try_from(seconds).map_err(|_| Error::OutOfRange)?;
        Timestamp::new(seconds, nanos)
    }
}

/// Converts from [Timestamp] to [time::OffsetDateTime].
impl TryFrom<Timestamp> for time::OffsetDateTime {
    type Error = time::error::ComponentRange;

    fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
        time::OffsetDateTime::from_unix_timestamp_nanos(
            value.seconds as i128 * NS + value.nanos as i128,
        )
    }
}

/// Converts from [chrono::DateTime] to [Timestamp].
#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
impl TryFrom<chrono::DateTime<chrono::Utc>> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: chrono::DateTime<chrono::Utc>) -> Result<Self, Self::Error> {
        let nanos = i32::try_from(value.timestamp_subsec_nanos()).map_err(|_| Error::OutOfRange)?;
        Timestamp::new(value.timestamp(), nanos)
    }
}

/// Converts from [Timestamp] to [chrono::DateTime].
#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
impl TryFrom<Timestamp> for chrono::DateTime<chrono::Utc> {
    type Error = TimestampError;

    fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
        chrono::DateTime::from_timestamp(value.seconds, value.nanos as u32)
            .ok_or(TimestampError::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    type Result = anyhow::Result<()>;

    #[test]
    fn unix_epoch() -> Result {
        let ts = Timestamp::default();
        let json = serde_json::to_value(ts)?;
        assert_eq!(json, json!("1970-01-01T00:00:00Z"));
        let roundtrip = serde_json::from_value::<Timestamp>(json)?;
        assert_eq!(ts, roundtrip);
        Ok(())
    }

    #[test_case(Timestamp::MIN_SECONDS - 1, 0; "seconds below range")]
    #[test_case(Timestamp::MAX_SECONDS + 1, 0; "seconds above range")]
    #[test_case(0, -1; "nanos below range")]
    #[test_case(0, 1_000_000_000; "nanos above range")]
    fn new_out_of_range(seconds: i64, nanos: i32) {
        let t = Timestamp::new(seconds, nanos);
        assert!(matches!(t, Err(Error::OutOfRange)), "{t:?}");
    }

    #[test_case(0, 0, 0, 0; "zero")]
    #[test_case(0, 1_234_567_890, 1, 234_567_890; "nanos overflow")]
    #[test_case(0, -1_400_000_000, -2, 600_000_000; "nanos underflow")]
    #[test_case(Timestamp::MAX_SECONDS + 1, 0, Timestamp::MAX_SECONDS, 0; "seconds over range")]
    #[test_case(Timestamp::MIN_SECONDS - 1, 0, Timestamp::MIN_SECONDS, 0; "seconds below range")]
    fn clamp(seconds: i64, nanos: i32, want_seconds: i64, want_nanos: i32) {
        let got = Timestamp::clamp(seconds, nanos);
        assert_eq!((got.seconds(), got.nanos()), (want_seconds, want_nanos));
    }

    #[test_case("0001-01-01T00:00:00Z")]
    #[test_case("1960-01-01T00:00:00.123456789Z")]
    #[test_case("1970-01-01T00:00:00.123Z")]
    #[test_case("2024-10-19T12:34:56.789Z")]
    #[test_case("9999-12-31T23:59:59.999999999Z")]
    fn roundtrip(input: &str) -> Result {
        let timestamp = serde_json::from_value::<Timestamp>(json!(input))?;
        let roundtrip = serde_json::to_value(timestamp)?;
        assert_eq!(roundtrip, json!(input));
        Ok(())
    }

    #[test]
    fn before_epoch_with_fraction() -> Result {
        let ts = Timestamp::try_from("1969-12-31T23:59:59.5Z")?;
        assert_eq!((ts.seconds(), ts.nanos()), (-1, 500_000_000));
        Ok(())
    }

    #[test_case("1970-01-01T00:00:00+02:00", -2 * 60 * 60; "positive offset")]
    #[test_case("1970-01-01T00:00:00-02:45", 2 * 60 * 60 + 45 * 60; "negative offset")]
    fn offsets(input: &str, want: i64) -> Result {
        let got = Timestamp::try_from(input)?;
        assert_eq!(got, Timestamp::new(want, 0)?);
        Ok(())
    }

    #[test]
    fn deserialize_unexpected_input_type() {
        let got = serde_json::from_value::<Timestamp>(json!({}));
        let msg = format!("{got:?}");
        assert!(msg.contains("RFC 3339"), "message={msg}");
    }

    #[test]
    fn convert_time() -> Result {
        let odt = time::OffsetDateTime::from_unix_timestamp(123)?
            + time::Duration::nanoseconds(456789012);
        let ts = Timestamp::try_from(odt)?;
        assert_eq!(ts, Timestamp::new(123, 456789012)?);
        assert_eq!(time::OffsetDateTime::try_from(ts)?, odt);
        Ok(())
    }

    #[test]
    fn convert_time_out_of_range() -> Result {
        let odt = time::OffsetDateTime::from_unix_timestamp(Timestamp::MIN_SECONDS - 1)?;
        let got = Timestamp::try_from(odt);
        assert!(matches!(got, Err(Error::OutOfRange)), "{got:?}");
        Ok(())
    }

    #[test]
    fn convert_chrono() -> Result {
        let dt = chrono::DateTime::from_timestamp(123, 456789012)
            .ok_or_else(|| anyhow::anyhow!("bad test input"))?;
        let ts = Timestamp::try_from(dt)?;
        assert_eq!(ts, Timestamp::new(123, 456789012)?);
        assert_eq!(chrono::DateTime::try_from(ts)?, dt);
        Ok(())
    }

    #[test]
    fn descriptor() {
        let d = Timestamp::descriptor();
        assert_eq!(d.full_name(), "google.protobuf.Timestamp");
        assert!(d.field("seconds").is_some());
        assert!(d.field("nanos").is_some());
    }

    #[serde_with::skip_serializing_none]
    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Helper {
        create_time: Option<Timestamp>,
    }

    #[test]
    fn in_struct() -> Result {
        let input = Helper {
            create_time: Some(Timestamp::new(12, 345_678_900)?),
        };
        let json = serde_json::to_value(&input)?;
        assert_eq!(json, json!({ "createTime": "1970-01-01T00:00:12.3456789Z" }));
        assert_eq!(serde_json::from_value::<Helper>(json)?, input);
        assert_eq!(serde_json::to_value(Helper::default())?, json!({}));
        Ok(())
    }
}
