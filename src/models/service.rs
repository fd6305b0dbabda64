use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::draft::RequirementType;
use crate::models::localized::LocalizedText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Draft => "draft",
            ServiceStatus::Published => "published",
            ServiceStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ServiceStatus::Draft),
            "published" => Ok(ServiceStatus::Published),
            "archived" => Ok(ServiceStatus::Archived),
            other => Err(format!("unknown service status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Category reference as returned by the backend: a bare id or an embedded row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Row { id: String },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) | CategoryRef::Row { id } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceExtra {
    pub title: LocalizedText,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub delivery_additional_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFaq {
    pub question: LocalizedText,
    pub answer: LocalizedText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequirement {
    pub description: LocalizedText,
    #[serde(rename = "type", default)]
    pub kind: RequirementType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub short_description: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub base_price_cents: i64,
    pub price_min_cents: Option<i64>,
    pub price_max_cents: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub delivery_time_days: u32,
    #[serde(default)]
    pub revisions_included: u32,
    pub max_revisions: Option<u32>,
    #[serde(default)]
    pub extras: Vec<ServiceExtra>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub faq: Vec<ServiceFaq>,
    #[serde(default)]
    pub requirements: Vec<ServiceRequirement>,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default)]
    pub location_type: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::localized::Locale;

    #[test]
    fn parses_backend_service_row() {
        let raw = serde_json::json!({
            "id": "6f1d2a4e-8d8c-4a53-9a55-0d4f3c1a2b7e",
            "title": {"fr": "Création de site", "en": "Website design"},
            "description": "Plain description",
            "base_price_cents": 12500,
            "price_min_cents": null,
            "price_max_cents": 30000,
            "delivery_time_days": 7,
            "revisions_included": 2,
            "max_revisions": null,
            "categories": ["c1", {"id": "c2", "name": "Design"}],
            "status": "published",
            "location_type": ["remote"],
            "created_at": "2024-05-01T10:00:00Z"
        });

        let service: Service = serde_json::from_value(raw).unwrap();
        assert_eq!(service.title.resolve(Locale::En), "Website design");
        assert_eq!(service.description.resolve(Locale::Fr), "Plain description");
        assert_eq!(service.currency, "USD");
        assert_eq!(service.status, ServiceStatus::Published);
        let ids: Vec<&str> = service.categories.iter().map(CategoryRef::id).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Archived".parse::<ServiceStatus>(), Ok(ServiceStatus::Archived));
        assert!("deleted".parse::<ServiceStatus>().is_err());
    }
}
