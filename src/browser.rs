//! The capabilities the scraper needs from a browser session.
//!
//! Selectors are CSS selectors. All lookups are read-only; only
//! [`Browser::click`] and [`Browser::move_and_click`] interact with the page.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::DriverError;

pub mod webdriver;

/// Outcome of waiting for an element to become interactable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<E> {
    Found(E),
    /// No element matched before the timeout.
    NotFound,
    /// An element matched but never became clickable before the timeout.
    NotInteractable,
}

/// A rendered element, queried within its own subtree.
#[async_trait]
pub trait Element: Send + Sync + Sized {
    async fn find(&self, selector: &str) -> Result<Option<Self>, DriverError>;
    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError>;
    async fn text(&self) -> Result<String, DriverError>;
}

/// A single browser session, shared by reference over a whole run.
#[async_trait]
pub trait Browser: Send + Sync {
    type Element: Element;

    async fn navigate(&self, url: &Url) -> Result<(), DriverError>;
    async fn find(&self, selector: &str) -> Result<Option<Self::Element>, DriverError>;
    /// Matching elements in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;
    async fn wait_until_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Lookup<Self::Element>, DriverError>;
    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;
    /// Moves the pointer onto `element` and clicks it as one interaction.
    async fn move_and_click(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Ends the session.
    async fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}

/// Acquires a browser session for one run.
#[async_trait]
pub trait Launcher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser, DriverError>;
}
