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

//! Defines the trait for polling backoff policies.
//!
//! Waiting for a long-running operation to complete requires polling the
//! service. The handle sleeps between polls to avoid overloading the service,
//! the polling backoff policy decides for how long.
//!
//! Polling backoff policies do not use jitter. The most common implementation
//! is truncated [exponential backoff], where the period grows exponentially
//! until some limit is reached. This works well when the expected execution
//! time is not known in advance.
//!
//! To configure the polling backoff policy used for a specific operation, use
//! [RequestOptionsBuilder::with_polling_backoff_policy].
//!
//! [RequestOptionsBuilder::with_polling_backoff_policy]: crate::options::RequestOptionsBuilder::with_polling_backoff_policy
//! [exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff
//!
//! # Example
//! ```
//! # use google_cloud_gax::exponential_backoff::Error;
//! # use google_cloud_gax::exponential_backoff::ExponentialBackoffBuilder;
//! # use google_cloud_gax::polling_backoff_policy::PollingBackoffPolicy;
//! use std::time::{Duration, Instant};
//!
//! let policy = ExponentialBackoffBuilder::new()
//!     .with_initial_delay(Duration::from_secs(10))
//!     .with_maximum_delay(Duration::from_secs(300))
//!     .with_scaling(1.3)
//!     .build()?;
//! assert_eq!(policy.wait_period(Instant::now(), 1), Duration::from_secs(10));
//! # Ok::<(), Error>(())
//! ```

use std::sync::Arc;

/// Defines the trait implemented by all polling backoff strategies.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the delay before the next poll.
    ///
    /// # Parameters
    /// * `loop_start` - when the polling loop started.
    /// * `attempt_count` - the number of polls so far. This method is always
    ///   called after the first poll, so the value is at least 1.
    fn wait_period(&self, loop_start: std::time::Instant, attempt_count: u32)
    -> std::time::Duration;
}

/// A helper type to use [PollingBackoffPolicy] in request options.
#[derive(Clone, Debug)]
pub struct PollingBackoffPolicyArg(pub(crate) Arc<dyn PollingBackoffPolicy>);

impl<T: PollingBackoffPolicy + 'static> From<T> for PollingBackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl From<Arc<dyn PollingBackoffPolicy>> for PollingBackoffPolicyArg {
    fn from(value: Arc<dyn PollingBackoffPolicy>) -> Self {
        Self(value)
    }
}

impl From<PollingBackoffPolicyArg> for Arc<dyn PollingBackoffPolicy> {
    fn from(value: PollingBackoffPolicyArg) -> Self {
        value.0
    }
}
