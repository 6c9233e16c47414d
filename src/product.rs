//! The product record and the parsing rules for its fields.

use serde::Serialize;

use crate::{
    error::{ExtractError, Field},
    sink::Record,
};

/// Highest rating a card can carry.
pub const MAX_RATING: usize = 5;

/// One product listed on a category page.
///
/// A `Product` is only constructed through [`Product::from_card_text`], so every
/// instance has a non-empty title, a non-negative price and a rating in `0..=5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    title: String,
    description: String,
    price: f64,
    rating: u8,
    num_of_reviews: u32,
}

/// Raw text read from a product card, before any parsing.
///
/// `None` means the element was not found in the card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardText {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stars: usize,
    pub reviews: Option<String>,
}

impl Product {
    pub fn from_card_text(card: &CardText) -> Result<Self, ExtractError> {
        let title = card
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or(ExtractError::MissingField(Field::Title))?;
        let description = card
            .description
            .as_deref()
            .ok_or(ExtractError::MissingField(Field::Description))?;
        let price = card
            .price
            .as_deref()
            .ok_or(ExtractError::MissingField(Field::Price))?;
        let reviews = card
            .reviews
            .as_deref()
            .ok_or(ExtractError::MissingField(Field::Reviews))?;

        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            price: parse_price(price)?,
            rating: parse_rating(card.stars)?,
            num_of_reviews: parse_review_count(reviews)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn num_of_reviews(&self) -> u32 {
        self.num_of_reviews
    }
}

impl Record for Product {
    const COLUMNS: &'static [&'static str] =
        &["title", "description", "price", "rating", "num_of_reviews"];
}

/// Parses `"$1101.83"` into `1101.83`.
pub fn parse_price(text: &str) -> Result<f64, ExtractError> {
    let malformed = || ExtractError::MalformedPrice {
        text: text.to_string(),
    };
    let trimmed = text.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    // `f64::from_str` accepts "inf", "NaN" and a leading sign.
    if !amount.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(malformed());
    }
    match amount.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(malformed()),
    }
}

/// Parses the leading token of `"12 reviews"` into `12`.
pub fn parse_review_count(text: &str) -> Result<u32, ExtractError> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ExtractError::MalformedReviewCount {
            text: text.to_string(),
        })
}

pub fn parse_rating(stars: usize) -> Result<u8, ExtractError> {
    if stars > MAX_RATING {
        return Err(ExtractError::RatingOutOfRange { count: stars });
    }
    // MAX_RATING fits in a u8
    Ok(stars as u8)
}
