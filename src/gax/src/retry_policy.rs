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

//! Defines the trait for retry policies.
//!
//! Paginated and long-running operations never retry on their own. Each RPC
//! they issue carries the [RequestOptions][crate::options::RequestOptions]
//! set by the application, and the transport behind the stub applies the
//! retry policy found there.
//!
//! # Example
//! ```
//! # use google_cloud_gax::error::Error;
//! # use google_cloud_gax::options::RequestOptions;
//! # use google_cloud_gax::retry_policy::RetryPolicy;
//! #[derive(Debug)]
//! struct RetryIdempotent;
//! impl RetryPolicy for RetryIdempotent {
//!     fn on_error(
//!         &self,
//!         _loop_start: std::time::Instant,
//!         attempt_count: u32,
//!         idempotent: bool,
//!         error: &Error,
//!     ) -> bool {
//!         idempotent && attempt_count < 3 && (error.is_io() || error.is_transport())
//!     }
//! }
//! let mut options = RequestOptions::default();
//! options.set_retry_policy(RetryIdempotent);
//! assert!(options.retry_policy().is_some());
//! ```

use crate::error::Error;
use std::sync::Arc;

/// Determines how errors are handled in the retry loop of a transport.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Returns true if the request should be sent again after `error`.
    ///
    /// # Parameters
    /// * `loop_start` - when the retry loop started.
    /// * `attempt_count` - the number of attempts. This includes the initial
    ///   attempt. This method is called after the first attempt, so the value
    ///   is always non-zero.
    /// * `idempotent` - if `true` assume the operation is idempotent. Many more
    ///   errors are retryable on idempotent operations.
    /// * `error` - the last error.
    fn on_error(
        &self,
        loop_start: std::time::Instant,
        attempt_count: u32,
        idempotent: bool,
        error: &Error,
    ) -> bool;

    /// The remaining time in the retry policy.
    ///
    /// For policies that are not time based this returns `None`.
    fn remaining_time(
        &self,
        _loop_start: std::time::Instant,
        _attempt_count: u32,
    ) -> Option<std::time::Duration> {
        None
    }
}

/// A helper type to use [RetryPolicy] in request options.
#[derive(Clone, Debug)]
pub struct RetryPolicyArg(Arc<dyn RetryPolicy>);

impl<T: RetryPolicy + 'static> From<T> for RetryPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl From<Arc<dyn RetryPolicy>> for RetryPolicyArg {
    fn from(value: Arc<dyn RetryPolicy>) -> Self {
        Self(value)
    }
}

impl From<RetryPolicyArg> for Arc<dyn RetryPolicy> {
    fn from(value: RetryPolicyArg) -> Arc<dyn RetryPolicy> {
        value.0
    }
}
