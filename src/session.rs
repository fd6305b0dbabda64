//! One create/edit session of a service listing.

use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::draft::{
    AmountField, Extra, FaqItem, LocationType, MaxRevisions, Requirement, ServiceDraft,
};
use crate::models::localized::Locale;
use crate::models::media::MediaKind;
use crate::models::service::{CategoryRef, Service, ServiceStatus};
use crate::services::currency_service::{currency_code, CurrencyNormalizer};
use crate::services::submission_service::SubmissionDispatcher;

/// How the editor is shown. An embedded editor is closed by its host once the
/// service has been saved.
pub enum PresentationMode {
    Standalone,
    Embedded(Box<dyn FnMut() + Send>),
}

impl fmt::Debug for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Standalone => f.write_str("Standalone"),
            PresentationMode::Embedded(_) => f.write_str("Embedded"),
        }
    }
}

#[derive(Debug)]
pub struct EditSession {
    draft: ServiceDraft,
    service_id: Option<Uuid>,
    mode: PresentationMode,
}

impl EditSession {
    pub fn new(mode: PresentationMode, display_currency: impl Into<String>) -> Self {
        Self {
            draft: ServiceDraft {
                display_currency: display_currency.into(),
                ..Default::default()
            },
            service_id: None,
            mode,
        }
    }

    /// Draft hydrated from an existing service, with prices shown in
    /// `display_currency`. Falls back to the canonical currency when any
    /// price cannot be converted.
    pub async fn hydrate(
        service: &Service,
        mode: PresentationMode,
        display_currency: &str,
        normalizer: &CurrencyNormalizer,
        locale: Locale,
    ) -> Self {
        let mut draft = draft_from_service(service, locale);
        draft.display_currency = normalizer.canonical_currency().to_string();

        match convert_for_display(&draft, display_currency, normalizer).await {
            Ok(converted) => draft = converted,
            Err(e) => warn!(
                service_id = %service.id,
                error = %e,
                "Keeping canonical currency for editing"
            ),
        }

        Self {
            draft,
            service_id: Some(service.id),
            mode,
        }
    }

    pub fn draft(&self) -> &ServiceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ServiceDraft {
        &mut self.draft
    }

    pub fn service_id(&self) -> Option<Uuid> {
        self.service_id
    }

    pub fn mode(&self) -> &PresentationMode {
        &self.mode
    }

    pub async fn submit(
        &mut self,
        dispatcher: &SubmissionDispatcher,
        target: ServiceStatus,
    ) -> Result<Uuid> {
        let id = dispatcher
            .submit(&self.draft, target, self.service_id)
            .await?;

        info!(%id, %target, "Editor session submitted");
        let currency = std::mem::take(&mut self.draft.display_currency);
        self.draft = ServiceDraft {
            display_currency: currency,
            ..Default::default()
        };
        self.service_id = Some(id);
        self.close();
        Ok(id)
    }

    pub fn close(&mut self) {
        if let PresentationMode::Embedded(on_close) = &mut self.mode {
            on_close();
        }
    }
}

/// Maps a persisted service back onto form state, prices still in canonical cents.
pub fn draft_from_service(service: &Service, locale: Locale) -> ServiceDraft {
    let mut draft = ServiceDraft {
        title: service.title.resolve(locale).to_string(),
        short_description: service.short_description.resolve(locale).to_string(),
        description: service.description.resolve(locale).to_string(),
        base_price_minor: service.base_price_cents,
        price_min_minor: service.price_min_cents,
        price_max_minor: service.price_max_cents,
        display_currency: service.currency.clone(),
        delivery_time_days: service.delivery_time_days,
        revisions_included: service.revisions_included,
        max_revisions: MaxRevisions::from(service.max_revisions),
        extras: service
            .extras
            .iter()
            .map(|extra| Extra {
                title: extra.title.resolve(locale).to_string(),
                price_minor: extra.price_cents,
                additional_days: extra.delivery_additional_days,
            })
            .collect(),
        cover_image: service.cover_image.clone(),
        categories: service
            .categories
            .iter()
            .map(CategoryRef::id)
            .map(str::to_string)
            .collect(),
        faq: service
            .faq
            .iter()
            .map(|item| FaqItem {
                question: item.question.resolve(locale).to_string(),
                answer: item.answer.resolve(locale).to_string(),
            })
            .collect(),
        requirements: service
            .requirements
            .iter()
            .map(|req| Requirement {
                title: req.description.resolve(locale).to_string(),
                kind: req.kind,
            })
            .collect(),
        location_type: service
            .location_type
            .iter()
            .filter_map(|l| match l.as_str() {
                "remote" => Some(LocationType::Remote),
                "onsite" => Some(LocationType::Onsite),
                _ => None,
            })
            .collect(),
        status: match service.status {
            ServiceStatus::Published => ServiceStatus::Published,
            _ => ServiceStatus::Draft,
        },
        images: Vec::new(),
        videos: Vec::new(),
        documents: Vec::new(),
        tags: Vec::new(),
    };

    for tag in &service.tags {
        draft.add_tag(tag);
    }
    for url in &service.images {
        match MediaKind::infer_from_url(url) {
            MediaKind::Video => draft.videos.push(url.clone()),
            MediaKind::Document => draft.documents.push(url.clone()),
            _ => draft.images.push(url.clone()),
        }
    }
    draft
}

async fn convert_for_display(
    draft: &ServiceDraft,
    currency: &str,
    normalizer: &CurrencyNormalizer,
) -> Result<ServiceDraft> {
    let currency = currency_code(currency);
    let currency = currency.as_str();
    let mut converted = draft.clone();
    converted.display_currency = currency.to_string();

    converted.base_price_minor = normalizer
        .from_canonical(&AmountField::BasePrice, draft.base_price_minor, currency)
        .await?;
    if let Some(min) = draft.price_min_minor {
        converted.price_min_minor = Some(
            normalizer
                .from_canonical(&AmountField::MinPrice, min, currency)
                .await?,
        );
    }
    if let Some(max) = draft.price_max_minor {
        converted.price_max_minor = Some(
            normalizer
                .from_canonical(&AmountField::MaxPrice, max, currency)
                .await?,
        );
    }
    for (index, extra) in converted.extras.iter_mut().enumerate() {
        let field = AmountField::Extra {
            index,
            title: extra.title.clone(),
        };
        extra.price_minor = normalizer
            .from_canonical(&field, extra.price_minor, currency)
            .await?;
    }
    Ok(converted)
}
