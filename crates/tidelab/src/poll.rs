// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wait-until-terminal polling for long-running resources.
//!
//! Computations and data assets transition server-side through a fixed state
//! lattice; the client can only observe. [`wait_until_terminal`] is the one
//! polling loop behind [`Computations::wait_until_completed`] and
//! [`DataAssets::wait_until_ready`].
//!
//! [`Computations::wait_until_completed`]: crate::Computations::wait_until_completed
//! [`DataAssets::wait_until_ready`]: crate::DataAssets::wait_until_ready

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

/// Smallest polling interval the platform accepts.
pub const MIN_POLLING_INTERVAL: Duration = Duration::from_secs(5);

/// Options for waiting on a long-running resource.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Delay between consecutive polls. Must be at least
    /// [`MIN_POLLING_INTERVAL`] (also the default).
    pub polling_interval: Duration,
    /// Overall deadline, measured from the first poll. Must be at least
    /// `polling_interval` when set. `None` (the default) waits forever.
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            polling_interval: MIN_POLLING_INTERVAL,
            timeout: None,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polling_interval(mut self, polling_interval: Duration) -> Self {
        self.polling_interval = polling_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reject out-of-contract values before any request goes out.
    fn validate(&self) -> Result<()> {
        if self.polling_interval < MIN_POLLING_INTERVAL {
            return Err(Error::InvalidArgument(format!(
                "polling interval {:?} is below the minimum of {:?}",
                self.polling_interval, MIN_POLLING_INTERVAL
            )));
        }
        if let Some(timeout) = self.timeout {
            if timeout < self.polling_interval {
                return Err(Error::InvalidArgument(format!(
                    "timeout {:?} is shorter than the polling interval {:?}",
                    timeout, self.polling_interval
                )));
            }
        }
        Ok(())
    }
}

/// Poll `fetch` until `is_terminal` holds for the fetched record, sleeping
/// `options.polling_interval` between attempts.
///
/// Returns the record of the first terminal fetch. A fetch error aborts the
/// wait immediately. With a timeout set, fails with [`Error::Timeout`] once
/// the elapsed time since the first fetch exceeds it; the overshoot is
/// bounded by one polling interval.
pub(crate) async fn wait_until_terminal<T, F, Fut>(
    resource_id: &str,
    options: WaitOptions,
    is_terminal: impl Fn(&T) -> bool,
    mut fetch: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    options.validate()?;
    let started = tokio::time::Instant::now();
    loop {
        let record = fetch().await?;
        if is_terminal(&record) {
            return Ok(record);
        }
        if let Some(timeout) = options.timeout {
            if started.elapsed() > timeout {
                return Err(Error::Timeout {
                    resource_id: resource_id.to_string(),
                    timeout,
                });
            }
        }
        debug!(resource_id, "not terminal yet, polling again");
        tokio::time::sleep(options.polling_interval).await;
    }
}
