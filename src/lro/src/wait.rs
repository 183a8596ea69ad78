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

use gax::exponential_backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Controls how [Operation::wait_until_done_with][crate::Operation::wait_until_done_with]
/// polls.
///
/// The first delay is `initial_delay`. Each following delay is the previous
/// delay times `multiplier`, up to `max_delay`. Polling stops once `timeout`
/// has elapsed since the first poll, the last delay is shortened to end at
/// the deadline.
///
/// # Example
/// ```
/// # use google_cloud_lro::WaitPolicy;
/// # use std::time::Duration;
/// let policy = WaitPolicy::default()
///     .with_initial_delay(Duration::from_secs(1))
///     .with_timeout(Duration::from_secs(60));
/// assert_eq!(policy.max_delay(), Duration::from_secs(300));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WaitPolicy {
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
    timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            multiplier: 1.3,
            max_delay: Duration::from_secs(300),
            timeout: Duration::from_secs(3600),
        }
    }
}

impl WaitPolicy {
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the delay before the second poll.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.initial_delay = v.into();
        self
    }

    /// Sets the growth factor between delays.
    pub fn with_multiplier<V: Into<f64>>(mut self, v: V) -> Self {
        self.multiplier = v.into();
        self
    }

    /// Sets the longest delay between polls.
    pub fn with_max_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.max_delay = v.into();
        self
    }

    /// Sets how long to keep polling.
    pub fn with_timeout<V: Into<Duration>>(mut self, v: V) -> Self {
        self.timeout = v.into();
        self
    }

    /// The backoff policy implementing the delays, with out of range values
    /// clamped.
    pub(crate) fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_delay(self.initial_delay)
            .with_maximum_delay(self.max_delay)
            .with_scaling(self.multiplier)
            .clamp()
    }
}
