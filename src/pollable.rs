//! Polling of resources whose state changes asynchronously on the gateway side,
//! such as an instant payment waiting to be settled by the bank.

use crate::{Error, MyBankClient};
use async_trait::async_trait;
use chrono::Utc;
use retry_policies::{policies::ExponentialBackoff, RetryDecision, RetryPolicy};
use std::time::Duration;

/// Options to configure the behaviour of [`Pollable::poll_until`](crate::pollable::Pollable::poll_until).
///
/// The default is an exponential backoff between retries from 2 to 60 seconds for a total
/// of 30 minutes, as bank transfers are often settled in batches.
#[derive(Debug)]
pub struct PollOptions<R: RetryPolicy> {
    retry_policy: R,
    min_wait: Duration,
}

impl Default for PollOptions<ExponentialBackoff> {
    fn default() -> Self {
        Self {
            retry_policy: ExponentialBackoff::builder()
                .retry_bounds(Duration::from_secs(2), Duration::from_secs(60))
                .build_with_total_retry_duration(Duration::from_secs(60 * 30)),
            min_wait: Duration::from_secs(1),
        }
    }
}

impl<R: RetryPolicy> PollOptions<R> {
    /// Sets a retry policy.
    pub fn with_retry_policy<T: RetryPolicy>(self, retry_policy: T) -> PollOptions<T> {
        PollOptions {
            retry_policy,
            min_wait: self.min_wait,
        }
    }

    /// Sets the minimum wait between two polls, whatever the retry policy says. Defaults to 1 second.
    pub fn with_min_wait(mut self, min_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self
    }
}

/// Error returned from [`Pollable::poll_until`](crate::pollable::Pollable::poll_until).
#[derive(thiserror::Error, Debug)]
pub enum PollError {
    /// The retry policy gave up before the condition was met.
    #[error("Polling timeout")]
    Timeout,
    /// A poll failed.
    #[error(transparent)]
    Error(#[from] Error),
}

/// A resource that can be continuously polled for updates.
#[async_trait]
pub trait Pollable: private::Sealed {
    type Output: Send;

    /// Fetches the current version of this resource from the gateway.
    async fn poll_once(&self, client: &MyBankClient) -> Result<Self::Output, Error>;

    /// Polls the gateway until `predicate` holds for the fetched resource.
    ///
    /// The first failing poll ends the loop with its error.
    #[tracing::instrument(name = "Poll for updates", skip_all)]
    async fn poll_until<R, F>(
        &self,
        client: &MyBankClient,
        poll_options: PollOptions<R>,
        predicate: F,
    ) -> Result<Self::Output, PollError>
    where
        R: RetryPolicy + Send + Sync,
        F: for<'a> Fn(&'a Self::Output) -> bool + Send,
    {
        let mut attempt = 0;
        loop {
            let res = self.poll_once(client).await?;
            if predicate(&res) {
                tracing::debug!(attempt, "Polling condition met");
                return Ok(res);
            }

            let execute_after = match poll_options.retry_policy.should_retry(attempt) {
                RetryDecision::Retry { execute_after } => execute_after,
                RetryDecision::DoNotRetry => return Err(PollError::Timeout),
            };
            let wait_time = poll_options
                .min_wait
                .max((execute_after - Utc::now()).to_std().unwrap_or_default());

            tracing::debug!(
                attempt,
                "Waiting {} seconds before polling again",
                wait_time.as_secs_f64()
            );
            tokio::time::sleep(wait_time).await;

            attempt += 1;
        }
    }
}

/// A resource that can be in a terminal state.
pub trait IsInTerminalState {
    /// Returns `true` if this resource will not change anymore.
    fn is_in_terminal_state(&self) -> bool;
}

/// A resource that can be polled until it reaches a terminal state.
#[async_trait]
pub trait PollableUntilTerminalState: Pollable {
    /// Polls the gateway until the resource reaches a terminal state.
    async fn poll_until_terminal_state<R: RetryPolicy + Send + Sync>(
        &self,
        client: &MyBankClient,
        poll_options: PollOptions<R>,
    ) -> Result<Self::Output, PollError>;
}

#[async_trait]
impl<T> PollableUntilTerminalState for T
where
    T: Pollable + Send + Sync,
    <T as Pollable>::Output: IsInTerminalState,
{
    async fn poll_until_terminal_state<R: RetryPolicy + Send + Sync>(
        &self,
        client: &MyBankClient,
        poll_options: PollOptions<R>,
    ) -> Result<Self::Output, PollError> {
        self.poll_until(client, poll_options, Self::Output::is_in_terminal_state)
            .await
    }
}

// Prevent users from implementing the `Pollable` trait.
mod private {
    pub trait Sealed {}

    impl Sealed for crate::apis::instant_pay::InstantPayResponse {}
}
