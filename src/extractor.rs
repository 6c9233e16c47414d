//! Reads one product card into a [`Product`].

use crate::{
    browser::Element,
    error::ExtractError,
    options::SiteLayout,
    product::{CardText, Product},
};

pub struct CardExtractor<'a> {
    layout: &'a SiteLayout,
}

impl<'a> CardExtractor<'a> {
    pub fn new(layout: &'a SiteLayout) -> Self {
        Self { layout }
    }

    pub async fn extract<E: Element>(&self, card: &E) -> Result<Product, ExtractError> {
        let text = self.read(card).await?;
        Product::from_card_text(&text)
    }

    /// Collects the raw text of every field, only querying the card.
    pub async fn read<E: Element>(&self, card: &E) -> Result<CardText, ExtractError> {
        Ok(CardText {
            title: text_of(card, &self.layout.title).await?,
            description: text_of(card, &self.layout.description).await?,
            price: text_of(card, &self.layout.price).await?,
            stars: card.find_all(&self.layout.star).await?.len(),
            reviews: text_of(card, &self.layout.reviews).await?,
        })
    }
}

async fn text_of<E: Element>(card: &E, selector: &str) -> Result<Option<String>, ExtractError> {
    match card.find(selector).await? {
        Some(element) => Ok(Some(element.text().await?)),
        None => Ok(None),
    }
}
