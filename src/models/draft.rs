use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

use crate::i18n;
use crate::models::localized::Locale;
use crate::models::service::ServiceStatus;

pub const DELIVERY_TIME_OPTIONS: [u32; 9] = [1, 2, 3, 5, 7, 10, 14, 21, 30];
pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Remote,
    Onsite,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Remote => "remote",
            LocationType::Onsite => "onsite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequirementType {
    #[default]
    Text,
    File,
    Url,
}

/// Revision ceiling; `Unlimited` travels as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum MaxRevisions {
    #[default]
    Unlimited,
    Limited(u32),
}

impl From<Option<u32>> for MaxRevisions {
    fn from(value: Option<u32>) -> Self {
        value.map_or(MaxRevisions::Unlimited, MaxRevisions::Limited)
    }
}

impl From<MaxRevisions> for Option<u32> {
    fn from(value: MaxRevisions) -> Self {
        match value {
            MaxRevisions::Unlimited => None,
            MaxRevisions::Limited(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, Validate)]
pub struct Extra {
    pub title: String,
    #[validate(range(min = 0, message = "validation.price_negative"))]
    pub price_minor: i64,
    #[serde(default)]
    pub additional_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Requirement {
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: RequirementType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountField {
    BasePrice,
    MinPrice,
    MaxPrice,
    Extra { index: usize, title: String },
}

impl AmountField {
    pub fn label(&self, locale: Locale) -> String {
        match self {
            AmountField::BasePrice => i18n::translate(locale, "fields.base_price"),
            AmountField::MinPrice => i18n::translate(locale, "fields.price_min"),
            AmountField::MaxPrice => i18n::translate(locale, "fields.price_max"),
            AmountField::Extra { title, .. } => {
                i18n::translate_with(locale, "fields.extra", &[("title", title)])
            }
        }
    }
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountField::BasePrice => f.write_str("base price"),
            AmountField::MinPrice => f.write_str("min price"),
            AmountField::MaxPrice => f.write_str("max price"),
            AmountField::Extra { title, .. } => write!(f, "extra \"{}\"", title),
        }
    }
}

/// In-memory form state for one create/edit session.
///
/// Monetary fields hold minor units of `display_currency` until the draft is
/// normalized for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceDraft {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(length(max = 150, message = "validation.short_description_length"))]
    pub short_description: String,
    #[validate(custom(function = "validate_description"))]
    pub description: String,
    #[validate(range(min = 0, message = "validation.price_negative"))]
    pub base_price_minor: i64,
    #[validate(range(min = 0, message = "validation.price_negative"))]
    pub price_min_minor: Option<i64>,
    #[validate(range(min = 0, message = "validation.price_negative"))]
    pub price_max_minor: Option<i64>,
    pub display_currency: String,
    #[validate(custom(function = "validate_delivery_time"))]
    pub delivery_time_days: u32,
    #[validate(range(max = 10, message = "validation.revisions_range"))]
    pub revisions_included: u32,
    pub max_revisions: MaxRevisions,
    #[validate(nested)]
    pub extras: Vec<Extra>,
    #[validate(required(message = "validation.cover_required"))]
    pub cover_image: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub documents: Vec<String>,
    #[validate(length(min = 1, message = "validation.categories_required"))]
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub faq: Vec<FaqItem>,
    pub requirements: Vec<Requirement>,
    #[validate(length(min = 1, message = "validation.location_required"))]
    pub location_type: Vec<LocationType>,
    pub status: ServiceStatus,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            short_description: String::new(),
            description: String::new(),
            base_price_minor: 0,
            price_min_minor: None,
            price_max_minor: None,
            display_currency: "USD".to_string(),
            delivery_time_days: 7,
            revisions_included: 1,
            max_revisions: MaxRevisions::Unlimited,
            extras: Vec::new(),
            cover_image: None,
            images: Vec::new(),
            videos: Vec::new(),
            documents: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            faq: Vec::new(),
            requirements: Vec::new(),
            location_type: vec![LocationType::Remote],
            status: ServiceStatus::Draft,
        }
    }
}

impl ServiceDraft {
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| !t.eq_ignore_ascii_case(tag.trim()));
    }

    pub fn toggle_category(&mut self, category_id: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category_id) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category_id.to_string());
        }
    }

    pub fn toggle_location(&mut self, location: LocationType) {
        if let Some(pos) = self.location_type.iter().position(|l| *l == location) {
            self.location_type.remove(pos);
        } else {
            self.location_type.push(location);
            self.location_type.sort();
        }
    }

    pub fn add_extra(&mut self, extra: Extra) {
        self.extras.push(extra);
    }

    pub fn remove_extra(&mut self, index: usize) -> Option<Extra> {
        (index < self.extras.len()).then(|| self.extras.remove(index))
    }

    pub fn add_faq(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.faq.push(FaqItem {
            question: question.into(),
            answer: answer.into(),
        });
    }

    pub fn remove_faq(&mut self, index: usize) -> Option<FaqItem> {
        (index < self.faq.len()).then(|| self.faq.remove(index))
    }

    pub fn add_requirement(&mut self, title: impl Into<String>, kind: RequirementType) {
        self.requirements.push(Requirement {
            title: title.into(),
            kind,
        });
    }

    pub fn remove_requirement(&mut self, index: usize) -> Option<Requirement> {
        (index < self.requirements.len()).then(|| self.requirements.remove(index))
    }

    pub fn amounts(&self) -> Vec<(AmountField, i64)> {
        let mut amounts = vec![(AmountField::BasePrice, self.base_price_minor)];
        if let Some(min) = self.price_min_minor {
            amounts.push((AmountField::MinPrice, min));
        }
        if let Some(max) = self.price_max_minor {
            amounts.push((AmountField::MaxPrice, max));
        }
        for (index, extra) in self.extras.iter().enumerate() {
            amounts.push((
                AmountField::Extra {
                    index,
                    title: extra.title.clone(),
                },
                extra.price_minor,
            ));
        }
        amounts
    }
}

pub fn minor_to_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

fn error_with_message(code: &'static str, message_key: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message_key));
    err
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(error_with_message("required", "validation.title_required"));
    }
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(error_with_message("length", "validation.title_length"));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(error_with_message(
            "required",
            "validation.description_required",
        ));
    }
    Ok(())
}

fn validate_delivery_time(days: u32) -> Result<(), ValidationError> {
    if DELIVERY_TIME_OPTIONS.contains(&days) {
        Ok(())
    } else {
        Err(error_with_message(
            "delivery_time",
            "validation.delivery_time_invalid",
        ))
    }
}

pub(crate) fn price_range_error() -> ValidationError {
    error_with_message("price_range", "validation.price_max_below_min")
}
