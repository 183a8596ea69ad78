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

use super::rpc::Status;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. For example, the
/// service may return an error, the transport may be unable to send the
/// request, a paginated request may be missing the fields needed to fetch
/// more pages, or the library may be unable to convert application inputs
/// into a message.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. Applications can query the error [source][std::error::Error::source]
/// for deeper information.
///
/// Note that a long-running operation that completes with an error is not an
/// `Error`. Its status is part of the operation state.
///
/// # Example
/// ```
/// use google_cloud_gax::error::Error;
/// match example_function() {
///     Err(e) if matches!(e.status(), Some(_)) => {
///         println!("service error {e}, debug using {:?}", e.status().unwrap());
///     },
///     Err(e) if e.is_invalid_argument() => { println!("bad input {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use google_cloud_gax::error::rpc::{Code, Status};
///     # Err(Error::service(Status::default().set_code(Code::NotFound).set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error representing invalid application inputs.
    ///
    /// # Example
    /// ```
    /// use google_cloud_gax::error::Error;
    /// let error = Error::invalid_argument("test.v1.Request must have a page_token field (String)");
    /// assert!(error.is_invalid_argument());
    /// assert!(error.to_string().contains("page_token"));
    /// ```
    pub fn invalid_argument<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            source: Some(source.into()),
        }
    }

    /// The application provided inputs the library cannot use.
    ///
    /// This is always a client-side generated error, and no request was sent.
    ///
    /// # Troubleshooting
    ///
    /// Paginating a request that has no `page_token` field, or converting a
    /// value that is neither a map nor the target message, are common causes.
    /// The error message names the message type and the field involved.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument)
    }

    /// Creates an error with the information returned by Google Cloud services.
    ///
    /// # Example
    /// ```
    /// use google_cloud_gax::error::Error;
    /// use google_cloud_gax::error::rpc::{Code, Status};
    /// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(status)),
            source: None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// Note that the request may or may not have started, and it may or may
    /// not complete in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing an exhausted policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_gax::error::Error;
    /// let error = Error::exhausted("too many retry attempts");
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            source: Some(source.into()),
        }
    }

    /// The request could not complete before the retry policy expired.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// A response, or a payload inside a response, could not be deserialized.
    ///
    /// # Troubleshooting
    ///
    /// Extracting the result of a long-running operation with the wrong type
    /// is the most common cause. When the payload type is not known in
    /// advance, consider using the type registry instead of a type hint.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a serialization problem.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Serialization,
            source: Some(source.into()),
        }
    }

    /// The request could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing an I/O problem reading application data.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// Reading application data (e.g. a byte stream) failed.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Not part of the public API, subject to change without notice.
    ///
    /// Creates an error representing a transport problem.
    #[cfg_attr(not(feature = "_internal-semver"), doc(hidden))]
    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Transport,
            source: Some(source.into()),
        }
    }

    /// The transport could not send the request or receive the response.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport)
    }

    /// The error details returned by the service, if any.
    ///
    /// # Example
    /// ```
    /// use google_cloud_gax::error::Error;
    /// use google_cloud_gax::error::rpc::{Code, Status};
    /// let error = Error::service(Status::default().set_code(Code::Aborted));
    /// assert_eq!(error.status().map(|s| s.code), Some(Code::Aborted));
    /// assert!(Error::deser("bad").status().is_none());
    /// ```
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    #[doc(hidden)]
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Other,
            source: Some(source.into()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::InvalidArgument, Some(e)) => write!(f, "invalid argument: {e}"),
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Exhausted, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Io, Some(e)) => write!(f, "cannot read the application data {e}"),
            (ErrorKind::Transport, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Service(s), _) => {
                write!(
                    f,
                    "the service reports an error with code {} described as: {}",
                    s.code, s.message
                )
            }
            (ErrorKind::Other, Some(e)) => {
                write!(f, "an unclassified problem making a request: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    InvalidArgument,
    Serialization,
    Deserialization,
    Timeout,
    Exhausted,
    Io,
    Transport,
    Service(Box<Status>),
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::Code;
    use std::error::Error as StdError;
    use test_case::test_case;

    #[test]
    fn service() {
        let status = Status::default()
            .set_code(Code::NotFound)
            .set_message("NOT FOUND");
        let error = Error::service(status.clone());
        assert!(error.source().is_none(), "{error:?}");
        assert_eq!(error.status(), Some(&status));
        assert!(error.to_string().contains("NOT FOUND"), "{error}");
        assert!(error.to_string().contains(Code::NotFound.name()), "{error}");
        assert!(!error.is_invalid_argument(), "{error:?}");
    }

    #[test]
    fn invalid_argument() {
        let error = Error::invalid_argument("test.v1.Request must have a page_size field (Integer)");
        assert!(error.is_invalid_argument(), "{error:?}");
        assert!(error.status().is_none(), "{error:?}");
        assert!(
            error
                .to_string()
                .contains("test.v1.Request must have a page_size field (Integer)"),
            "{error}"
        );
    }

    #[test]
    fn timeout() {
        let source = wkt::TimestampError::OutOfRange;
        let error = Error::timeout(source);
        assert!(error.is_timeout(), "{error:?}");
        let got = error
            .source()
            .and_then(|e| e.downcast_ref::<wkt::TimestampError>());
        assert!(
            matches!(got, Some(wkt::TimestampError::OutOfRange)),
            "{error:?}"
        );
        let source = wkt::TimestampError::OutOfRange;
        assert!(error.to_string().contains(&source.to_string()), "{error}");
        assert!(error.status().is_none(), "{error:?}");
    }

    #[test_case(Error::invalid_argument("test-only"), ErrorKind::InvalidArgument)]
    #[test_case(Error::ser("test-only"), ErrorKind::Serialization)]
    #[test_case(Error::deser("test-only"), ErrorKind::Deserialization)]
    #[test_case(Error::timeout("test-only"), ErrorKind::Timeout)]
    #[test_case(Error::exhausted("test-only"), ErrorKind::Exhausted)]
    #[test_case(Error::io("test-only"), ErrorKind::Io)]
    #[test_case(Error::transport("test-only"), ErrorKind::Transport)]
    #[test_case(Error::other("test-only"), ErrorKind::Other)]
    fn predicates(error: Error, want: ErrorKind) {
        assert_eq!(
            error.is_invalid_argument(),
            matches!(want, ErrorKind::InvalidArgument),
            "{error:?}"
        );
        assert_eq!(
            error.is_serialization(),
            matches!(want, ErrorKind::Serialization),
            "{error:?}"
        );
        assert_eq!(
            error.is_deserialization(),
            matches!(want, ErrorKind::Deserialization),
            "{error:?}"
        );
        assert_eq!(error.is_timeout(), matches!(want, ErrorKind::Timeout), "{error:?}");
        assert_eq!(
            error.is_exhausted(),
            matches!(want, ErrorKind::Exhausted),
            "{error:?}"
        );
        assert_eq!(error.is_io(), matches!(want, ErrorKind::Io), "{error:?}");
        assert_eq!(
            error.is_transport(),
            matches!(want, ErrorKind::Transport),
            "{error:?}"
        );
        assert!(error.status().is_none(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.to_string().contains("test-only"), "{error}");
    }
}
