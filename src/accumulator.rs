//! Reveals the product cards of a listing page.
//!
//! The site appends cards asynchronously after each click on its "load more"
//! control and exposes no completion event, so accumulation runs as a small
//! state machine:
//!
//! ```text
//! Loading -> CookieResolved -> Collecting -> Done
//! ```
//!
//! `Loading` dismisses the cookie banner if one shows up, `Collecting` reads or
//! expands the card set according to the [`StopPolicy`], and `Done` holds the
//! final cards in document order.

use std::{num::NonZeroUsize, time::Duration};

use tokio::time::Instant;

use crate::{
    browser::{Browser, Lookup},
    error::AccumulateError,
    options::{ScraperOptions, SiteLayout},
};

/// How many cards a category collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// The first `n` rendered cards, without any expansion.
    Exactly(NonZeroUsize),
    /// Every card, after expanding until the load-more control is gone.
    Exhaustive,
}

impl StopPolicy {
    /// `None` for `n == 0`.
    pub fn exactly(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Self::Exactly)
    }
}

/// How to wait for new cards after a load-more click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStrategy {
    Fixed(Duration),
    /// Poll until the card count grows, for at most `timeout`.
    UntilGrowth {
        poll_interval: Duration,
        timeout: Duration,
    },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        Self::Fixed(Duration::from_secs(2))
    }
}

/// Optional bounds on the expansion loop. Unbounded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionLimit {
    pub max_rounds: Option<usize>,
    pub max_duration: Option<Duration>,
}

impl ExpansionLimit {
    fn reached(&self, rounds: usize, elapsed: Duration) -> bool {
        self.max_rounds.is_some_and(|max| rounds >= max)
            || self.max_duration.is_some_and(|max| elapsed >= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Loading,
    CookieResolved,
    Collecting,
    Done,
}

pub struct Accumulator<'a> {
    layout: &'a SiteLayout,
    cookie_timeout: Duration,
    settle: SettleStrategy,
    limit: ExpansionLimit,
}

impl<'a> Accumulator<'a> {
    pub fn new(options: &'a ScraperOptions) -> Self {
        Self {
            layout: &options.layout,
            cookie_timeout: options.cookie_timeout,
            settle: options.settle,
            limit: options.expansion_limit,
        }
    }

    /// Returns the cards selected by `policy` from the page `browser` is on.
    pub async fn accumulate<B: Browser>(
        &self,
        browser: &B,
        policy: StopPolicy,
    ) -> Result<Vec<B::Element>, AccumulateError> {
        let mut state = State::Loading;
        let mut cards = Vec::new();
        loop {
            state = match state {
                State::Loading => {
                    self.resolve_cookie_banner(browser).await;
                    State::CookieResolved
                }
                State::CookieResolved => State::Collecting,
                State::Collecting => {
                    cards = self.collect(browser, policy).await?;
                    State::Done
                }
                State::Done => return Ok(cards),
            };
            tracing::debug!(?state, "accumulator: entered state");
        }
    }

    async fn resolve_cookie_banner<B: Browser>(&self, browser: &B) {
        let selector = &self.layout.cookie_accept;
        match browser
            .wait_until_clickable(selector, self.cookie_timeout)
            .await
        {
            Ok(Lookup::Found(button)) => match browser.click(&button).await {
                Ok(()) => tracing::debug!("accumulator: accepted cookies"),
                Err(err) => tracing::debug!(error = %err, "accumulator: cookie click failed"),
            },
            Ok(Lookup::NotFound) => tracing::debug!("accumulator: no cookie banner"),
            Ok(Lookup::NotInteractable) => {
                tracing::debug!("accumulator: cookie banner never became clickable")
            }
            Err(err) => tracing::debug!(error = %err, "accumulator: cookie banner lookup failed"),
        }
    }

    async fn collect<B: Browser>(
        &self,
        browser: &B,
        policy: StopPolicy,
    ) -> Result<Vec<B::Element>, AccumulateError> {
        match policy {
            StopPolicy::Exactly(n) => {
                let mut cards = browser.find_all(&self.layout.card).await?;
                cards.truncate(n.get());
                Ok(cards)
            }
            StopPolicy::Exhaustive => {
                let rounds = self.expand(browser).await?;
                let cards = browser.find_all(&self.layout.card).await?;
                tracing::debug!(rounds, cards = cards.len(), "accumulator: expansion finished");
                Ok(cards)
            }
        }
    }

    /// Clicks the load-more control until it is gone, returning the number of clicks.
    async fn expand<B: Browser>(&self, browser: &B) -> Result<usize, AccumulateError> {
        let started = Instant::now();
        let mut rounds = 0;
        loop {
            let rendered = browser.find_all(&self.layout.card).await?.len();
            tracing::debug!(rounds, cards = rendered, "accumulator: cards rendered");

            let control = match browser.find(&self.layout.load_more).await {
                Ok(Some(control)) => control,
                Ok(None) => return Ok(rounds),
                Err(err) => {
                    tracing::warn!(error = %err, "accumulator: load-more lookup failed, stopping");
                    return Ok(rounds);
                }
            };

            // A control left in the page after the last batch rejects the
            // click, so the bound only fails expansion on a live control.
            let elapsed = started.elapsed();
            let exhausted = self.limit.reached(rounds, elapsed);
            if let Err(err) = browser.move_and_click(&control).await {
                tracing::warn!(error = %err, "accumulator: load-more click failed, stopping");
                return Ok(rounds);
            }
            if exhausted {
                return Err(AccumulateError::ExpandTimeout { rounds, elapsed });
            }
            rounds += 1;
            self.wait_for_new_cards(browser, rendered).await?;
        }
    }

    async fn wait_for_new_cards<B: Browser>(
        &self,
        browser: &B,
        before: usize,
    ) -> Result<(), AccumulateError> {
        match self.settle {
            SettleStrategy::Fixed(delay) => browser.pause(delay).await,
            SettleStrategy::UntilGrowth {
                poll_interval,
                timeout,
            } => {
                let polls = polls_within(poll_interval, timeout);
                for _ in 0..polls {
                    browser.pause(poll_interval).await;
                    if browser.find_all(&self.layout.card).await?.len() > before {
                        return Ok(());
                    }
                }
                tracing::debug!(?timeout, "accumulator: no new cards before settle timeout");
            }
        }
        Ok(())
    }
}

/// Number of polls of `interval` that fit in `timeout`, at least one.
fn polls_within(interval: Duration, timeout: Duration) -> u128 {
    if interval.is_zero() {
        return 1;
    }
    timeout.as_nanos().div_ceil(interval.as_nanos()).max(1)
}
