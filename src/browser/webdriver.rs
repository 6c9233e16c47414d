//! [`Browser`] backed by a WebDriver server (chromedriver) through `thirtyfour`.

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{error::WebDriverError, prelude::*};
use url::Url;

use super::{Browser, Element, Launcher, Lookup};
use crate::error::DriverError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    /// Address of a running WebDriver server.
    pub server_url: String,
    pub headless: bool,
    /// Implicit wait applied to every element lookup.
    pub implicit_wait: Duration,
}

impl Default for WebDriverOptions {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9515".to_string(),
            headless: true,
            implicit_wait: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebDriverLauncher {
    options: WebDriverOptions,
}

impl WebDriverLauncher {
    pub fn new(options: WebDriverOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Launcher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self) -> Result<WebDriverBrowser, DriverError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.options.headless {
            caps.set_headless()
                .map_err(|err| DriverError::command("capabilities", err))?;
        }
        tracing::info!(server = %self.options.server_url, "starting webdriver session");
        let driver = WebDriver::new(self.options.server_url.as_str(), caps)
            .await
            .map_err(|err| DriverError::command("new session", err))?;
        driver
            .set_implicit_wait_timeout(self.options.implicit_wait)
            .await
            .map_err(|err| DriverError::command("implicit wait", err))?;
        Ok(WebDriverBrowser { driver })
    }
}

pub struct WebDriverBrowser {
    driver: WebDriver,
}

pub struct WebDriverElement(WebElement);

fn optional(result: WebDriverResult<WebElement>) -> Result<Option<WebElement>, DriverError> {
    match result {
        Ok(element) => Ok(Some(element)),
        Err(WebDriverError::NoSuchElement(_)) => Ok(None),
        Err(err) => Err(DriverError::command("find", err)),
    }
}

fn wrap_all(elements: Vec<WebElement>) -> Vec<WebDriverElement> {
    elements.into_iter().map(WebDriverElement).collect()
}

#[async_trait]
impl Element for WebDriverElement {
    async fn find(&self, selector: &str) -> Result<Option<Self>, DriverError> {
        Ok(optional(self.0.find(By::Css(selector)).await)?.map(WebDriverElement))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError> {
        self.0
            .find_all(By::Css(selector))
            .await
            .map(wrap_all)
            .map_err(|err| DriverError::command("find all", err))
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.0
            .text()
            .await
            .map_err(|err| DriverError::command("text", err))
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = WebDriverElement;

    async fn navigate(&self, url: &Url) -> Result<(), DriverError> {
        self.driver
            .goto(url.as_str())
            .await
            .map_err(|err| DriverError::command("navigate", err))
    }

    async fn find(&self, selector: &str) -> Result<Option<WebDriverElement>, DriverError> {
        Ok(optional(self.driver.find(By::Css(selector)).await)?.map(WebDriverElement))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<WebDriverElement>, DriverError> {
        self.driver
            .find_all(By::Css(selector))
            .await
            .map(wrap_all)
            .map_err(|err| DriverError::command("find all", err))
    }

    async fn wait_until_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Lookup<WebDriverElement>, DriverError> {
        let clickable = self
            .driver
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .and_clickable()
            .first()
            .await;
        match clickable {
            Ok(element) => Ok(Lookup::Found(WebDriverElement(element))),
            Err(WebDriverError::NoSuchElement(_)) => {
                // Tell a missing element apart from one that stayed disabled or hidden.
                if self.find(selector).await?.is_some() {
                    Ok(Lookup::NotInteractable)
                } else {
                    Ok(Lookup::NotFound)
                }
            }
            Err(err) => Err(DriverError::command("wait until clickable", err)),
        }
    }

    async fn click(&self, element: &WebDriverElement) -> Result<(), DriverError> {
        element
            .0
            .click()
            .await
            .map_err(|err| DriverError::command("click", err))
    }

    async fn move_and_click(&self, element: &WebDriverElement) -> Result<(), DriverError> {
        self.driver
            .action_chain()
            .move_to_element_center(&element.0)
            .click()
            .perform()
            .await
            .map_err(|err| DriverError::command("move and click", err))
    }

    async fn close(self) -> Result<(), DriverError> {
        tracing::info!("closing webdriver session");
        self.driver
            .quit()
            .await
            .map_err(|err| DriverError::command("quit", err))
    }
}
