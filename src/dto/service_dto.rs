use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::draft::RequirementType;
use crate::models::localized::LocalizedPayload;
use crate::models::service::{Category, Currency, ServiceStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPayload {
    pub title: String,
    pub price_cents: i64,
    pub delivery_additional_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqPayload {
    pub question: LocalizedPayload,
    pub answer: LocalizedPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementPayload {
    pub description: LocalizedPayload,
    #[serde(rename = "type")]
    pub kind: RequirementType,
}

/// Body of `POST /services` and `PATCH /services/{id}`. All amounts are
/// canonical-currency cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePayload {
    pub title: LocalizedPayload,
    pub short_description: LocalizedPayload,
    pub description: LocalizedPayload,
    pub base_price_cents: i64,
    pub price_min_cents: Option<i64>,
    pub price_max_cents: Option<i64>,
    pub currency: String,
    pub delivery_time_days: u32,
    pub revisions_included: u32,
    pub max_revisions: Option<u32>,
    pub extras: Vec<ExtraPayload>,
    pub cover_image: Option<String>,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub faq: Vec<FaqPayload>,
    pub requirements: Vec<RequirementPayload>,
    pub status: ServiceStatus,
    pub location_type: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEnvelope<T> {
    pub success: Option<bool>,
    pub service: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRef {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyListResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<CurrencyListData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyListData {
    #[serde(default)]
    pub currencies: Vec<Currency>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ConversionData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionData {
    pub converted_amount: Option<rust_decimal::Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritePayload {
    pub service_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteListResponse {
    #[serde(default)]
    pub favorites: Vec<FavoritePayload>,
}
