#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use productscraper::{
    options::DEFAULT_BASE_URL, Browser, DriverError, Element, Launcher, Lookup, Product,
    RecordSink, SinkError,
};
use url::Url;

pub fn url(path: &str) -> String {
    Url::parse(DEFAULT_BASE_URL)
        .and_then(|base| base.join(path))
        .unwrap()
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stars: usize,
    pub reviews: Option<String>,
}

impl FakeCard {
    pub fn numbered(i: usize) -> Self {
        Self {
            title: Some(format!("Product {i}")),
            description: Some(format!("Description of product {i}")),
            price: Some(format!("${}.99", 100 + i)),
            stars: i % 6,
            reviews: Some(format!("{i} reviews")),
        }
    }

    pub fn with_price(mut self, price: Option<&str>) -> Self {
        self.price = price.map(str::to_string);
        self
    }

    pub fn with_stars(mut self, stars: usize) -> Self {
        self.stars = stars;
        self
    }
}

pub fn cards(range: std::ops::Range<usize>) -> Vec<FakeCard> {
    range.map(FakeCard::numbered).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieBanner {
    Absent,
    Clickable,
    /// Rendered but never clickable.
    Stuck,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub cards: Vec<FakeCard>,
    /// Revealed one batch per load-more click.
    pub batches: Vec<Vec<FakeCard>>,
    pub cookie_banner: CookieBanner,
    /// Pauses needed before a requested batch is rendered.
    pub latency: usize,
    pub broken_load_more: bool,
    /// The load-more control stays in the page, unclickable, after the last batch.
    pub lingering_load_more: bool,
    pub failing_load_more_lookup: bool,
    pub failing_cookie_click: bool,
    pub crashes: bool,
}

impl FakePage {
    pub fn new(cards: Vec<FakeCard>) -> Self {
        Self {
            cards,
            batches: Vec::new(),
            cookie_banner: CookieBanner::Clickable,
            latency: 1,
            broken_load_more: false,
            lingering_load_more: false,
            failing_load_more_lookup: false,
            failing_cookie_click: false,
            crashes: false,
        }
    }

    /// `initial` cards rendered, then batches of `batch` cards up to `total`.
    pub fn expanding(initial: usize, batch: usize, total: usize) -> Self {
        let mut page = Self::new(cards(0..initial));
        let mut next = initial;
        while next < total {
            let end = (next + batch).min(total);
            page.batches.push(cards(next..end));
            next = end;
        }
        page
    }

    pub fn with_cookie_banner(mut self, banner: CookieBanner) -> Self {
        self.cookie_banner = banner;
        self
    }

    pub fn with_latency(mut self, latency: usize) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_broken_load_more(mut self) -> Self {
        self.broken_load_more = true;
        self
    }

    pub fn with_lingering_load_more(mut self) -> Self {
        self.lingering_load_more = true;
        self
    }

    pub fn with_failing_load_more_lookup(mut self) -> Self {
        self.failing_load_more_lookup = true;
        self
    }

    pub fn with_failing_cookie_click(mut self) -> Self {
        self.failing_cookie_click = true;
        self
    }

    pub fn crashing(mut self) -> Self {
        self.crashes = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Navigate(String),
    CookieAccepted,
    LoadMoreClicked,
    Pause(Duration),
    Closed,
}

pub type Events = Arc<Mutex<Vec<Event>>>;

#[derive(Debug, Clone)]
pub enum FakeElement {
    Card(FakeCard),
    Text(String),
    Star,
    CookieButton,
    LoadMore,
}

#[async_trait]
impl Element for FakeElement {
    async fn find(&self, selector: &str) -> Result<Option<Self>, DriverError> {
        let FakeElement::Card(card) = self else {
            return Ok(None);
        };
        let text = match selector {
            ".title" => &card.title,
            ".description" => &card.description,
            ".price" => &card.price,
            ".ratings" => &card.reviews,
            _ => return Ok(None),
        };
        Ok(text.clone().map(FakeElement::Text))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, DriverError> {
        match (self, selector) {
            (FakeElement::Card(card), ".glyphicon-star") => Ok(vec![FakeElement::Star; card.stars]),
            _ => Ok(self.find(selector).await?.into_iter().collect()),
        }
    }

    async fn text(&self) -> Result<String, DriverError> {
        match self {
            FakeElement::Text(text) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }
}

struct Loaded {
    page: FakePage,
    rendered: Vec<FakeCard>,
    pending: VecDeque<Vec<FakeCard>>,
    inflight: Option<(Vec<FakeCard>, usize)>,
    cookie_banner: CookieBanner,
}

impl Loaded {
    fn new(page: FakePage) -> Self {
        Self {
            rendered: page.cards.clone(),
            pending: page.batches.clone().into(),
            inflight: None,
            cookie_banner: page.cookie_banner,
            page,
        }
    }

    fn has_more_batches(&self) -> bool {
        !self.pending.is_empty() || self.inflight.is_some()
    }

    fn has_load_more(&self) -> bool {
        self.page.lingering_load_more || self.has_more_batches()
    }
}

/// An in-memory site: each url maps to a page model.
pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    current: Mutex<Option<Loaded>>,
    events: Events,
}

impl FakeBrowser {
    pub fn new(pages: HashMap<String, FakePage>, events: Events) -> Self {
        Self {
            pages,
            current: Mutex::new(None),
            events,
        }
    }

    /// A browser already showing `page`.
    pub fn showing(page: FakePage) -> Self {
        let browser = Self::new(HashMap::new(), Events::default());
        *browser.current.lock().unwrap() = Some(Loaded::new(page));
        browser
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn with_page<T>(&self, f: impl FnOnce(&mut Loaded) -> T) -> Result<T, DriverError> {
        let mut current = self.current.lock().unwrap();
        match current.as_mut() {
            Some(loaded) => Ok(f(loaded)),
            None => Err(DriverError::command("find", "no page loaded")),
        }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&self, url: &Url) -> Result<(), DriverError> {
        self.record(Event::Navigate(url.to_string()));
        let page = self
            .pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DriverError::command("navigate", format!("404 for {url}")))?;
        *self.current.lock().unwrap() = Some(Loaded::new(page));
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<FakeElement>, DriverError> {
        let lookup_fails = self.with_page(|loaded| loaded.page.failing_load_more_lookup)?;
        if selector == ".load-more" && lookup_fails {
            return Err(DriverError::command("find", "stale element reference"));
        }
        self.with_page(|loaded| match selector {
            ".load-more" if loaded.has_load_more() => Some(FakeElement::LoadMore),
            ".thumbnail" => loaded.rendered.first().cloned().map(FakeElement::Card),
            "#accept-cookie-notification" if loaded.cookie_banner != CookieBanner::Absent => {
                Some(FakeElement::CookieButton)
            }
            _ => None,
        })
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>, DriverError> {
        if selector != ".thumbnail" {
            return Ok(self.find(selector).await?.into_iter().collect());
        }
        let (crashes, cards) =
            self.with_page(|loaded| (loaded.page.crashes, loaded.rendered.clone()))?;
        if crashes {
            panic!("renderer crashed");
        }
        Ok(cards.into_iter().map(FakeElement::Card).collect())
    }

    async fn wait_until_clickable(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Lookup<FakeElement>, DriverError> {
        if selector != "#accept-cookie-notification" {
            return Ok(Lookup::NotFound);
        }
        self.with_page(|loaded| match loaded.cookie_banner {
            CookieBanner::Absent => Lookup::NotFound,
            CookieBanner::Clickable => Lookup::Found(FakeElement::CookieButton),
            CookieBanner::Stuck => Lookup::NotInteractable,
        })
    }

    async fn click(&self, element: &FakeElement) -> Result<(), DriverError> {
        match element {
            FakeElement::CookieButton => {
                let fails = self.with_page(|loaded| loaded.page.failing_cookie_click)?;
                if fails {
                    return Err(DriverError::command("click", "element click intercepted"));
                }
                self.with_page(|loaded| loaded.cookie_banner = CookieBanner::Absent)?;
                self.record(Event::CookieAccepted);
                Ok(())
            }
            _ => Err(DriverError::command("click", "element not clickable")),
        }
    }

    async fn move_and_click(&self, element: &FakeElement) -> Result<(), DriverError> {
        let FakeElement::LoadMore = element else {
            return Err(DriverError::command("move and click", "unexpected element"));
        };
        let broken =
            self.with_page(|loaded| loaded.page.broken_load_more || !loaded.has_more_batches())?;
        if broken {
            return Err(DriverError::command(
                "move and click",
                "element not interactable",
            ));
        }
        self.record(Event::LoadMoreClicked);
        self.with_page(|loaded| {
            if loaded.inflight.is_none() {
                let latency = loaded.page.latency;
                loaded.inflight = loaded.pending.pop_front().map(|batch| (batch, latency));
            }
        })
    }

    async fn pause(&self, duration: Duration) {
        self.record(Event::Pause(duration));
        let _ = self.with_page(|loaded| {
            if let Some((batch, remaining)) = loaded.inflight.as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    let batch = std::mem::take(batch);
                    loaded.rendered.extend(batch);
                    loaded.inflight = None;
                }
            }
        });
    }

    async fn close(self) -> Result<(), DriverError> {
        self.record(Event::Closed);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub pages: HashMap<String, FakePage>,
    pub events: Events,
    pub unavailable: bool,
}

impl FakeLauncher {
    pub fn new<I: IntoIterator<Item = (String, FakePage)>>(pages: I) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser, DriverError> {
        if self.unavailable {
            return Err(DriverError::command("new session", "connection refused"));
        }
        Ok(FakeBrowser::new(self.pages.clone(), self.events.clone()))
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pub written: Vec<(String, Vec<Product>)>,
}

impl MemorySink {
    pub fn records(&self, name: &str) -> Option<&[Product]> {
        self.written
            .iter()
            .find(|(sink, _)| sink == name)
            .map(|(_, records)| records.as_slice())
    }
}

impl RecordSink<Product> for MemorySink {
    fn write(&mut self, name: &str, records: &[Product]) -> Result<PathBuf, SinkError> {
        self.written.push((name.to_string(), records.to_vec()));
        Ok(PathBuf::from(format!("memory/{name}")))
    }
}
