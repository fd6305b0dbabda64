use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::dto::service_dto::{ExtraPayload, FaqPayload, RequirementPayload, ServicePayload};
use crate::error::{Error, Result};
use crate::models::draft::{MaxRevisions, ServiceDraft};
use crate::models::localized::{Locale, LocalizedPayload};
use crate::models::service::ServiceStatus;
use crate::services::catalog_service::ServiceStore;
use crate::services::currency_service::{CurrencyNormalizer, NormalizedPrices};
use crate::utils::validation::validate;

#[derive(Clone)]
pub struct SubmissionDispatcher {
    normalizer: CurrencyNormalizer,
    store: Arc<dyn ServiceStore>,
    locale: Locale,
}

impl SubmissionDispatcher {
    pub fn new(normalizer: CurrencyNormalizer, store: Arc<dyn ServiceStore>, locale: Locale) -> Self {
        Self {
            normalizer,
            store,
            locale,
        }
    }

    #[instrument(skip(self, draft), fields(target = %target, existing = ?existing_id))]
    pub async fn submit(
        &self,
        draft: &ServiceDraft,
        target: ServiceStatus,
        existing_id: Option<Uuid>,
    ) -> Result<Uuid> {
        if target == ServiceStatus::Archived {
            return Err(Error::BadRequest(
                "A draft can only be saved as draft or published".to_string(),
            ));
        }

        if target == ServiceStatus::Published {
            let errors = validate(draft, true, self.locale);
            if !errors.is_empty() {
                warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Draft failed validation");
                return Err(Error::Validation(errors));
            }
        }

        let prices = self.normalizer.normalize(draft).await.map_err(|e| {
            warn!(error = %e, "Price normalization failed");
            e
        })?;

        let payload = build_payload(draft, &prices, target, self.normalizer.canonical_currency());

        let result = match existing_id {
            Some(id) => self.store.update_service(id, &payload).await,
            None => self.store.create_service(&payload).await,
        };

        match result {
            Ok(id) => {
                info!(%id, "Service saved");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Service persistence failed");
                Err(into_transport(e))
            }
        }
    }
}

fn into_transport(err: Error) -> Error {
    match err {
        Error::Transport(_) | Error::NotFound(_) => err,
        other => Error::Transport(other.to_string()),
    }
}

/// Builds the request body from a draft whose prices are already normalized.
/// Gallery, video and document references share the `images` column.
pub fn build_payload(
    draft: &ServiceDraft,
    prices: &NormalizedPrices,
    target: ServiceStatus,
    canonical_currency: &str,
) -> ServicePayload {
    let extras = draft
        .extras
        .iter()
        .zip(prices.extras_cents.iter())
        .map(|(extra, cents)| ExtraPayload {
            title: extra.title.trim().to_string(),
            price_cents: *cents,
            delivery_additional_days: extra.additional_days,
        })
        .collect();

    let images = draft
        .images
        .iter()
        .chain(draft.videos.iter())
        .chain(draft.documents.iter())
        .cloned()
        .collect();

    ServicePayload {
        title: LocalizedPayload::both(draft.title.trim()),
        short_description: LocalizedPayload::both(draft.short_description.trim()),
        description: LocalizedPayload::both(draft.description.trim()),
        base_price_cents: prices.base_price_cents,
        price_min_cents: prices.price_min_cents,
        price_max_cents: prices.price_max_cents,
        currency: canonical_currency.to_string(),
        delivery_time_days: draft.delivery_time_days,
        revisions_included: draft.revisions_included,
        max_revisions: match draft.max_revisions {
            MaxRevisions::Unlimited => None,
            MaxRevisions::Limited(n) => Some(n),
        },
        extras,
        cover_image: draft.cover_image.clone(),
        images,
        categories: draft.categories.clone(),
        tags: draft.tags.clone(),
        faq: draft
            .faq
            .iter()
            .map(|item| FaqPayload {
                question: LocalizedPayload::fr_only(item.question.trim()),
                answer: LocalizedPayload::fr_only(item.answer.trim()),
            })
            .collect(),
        requirements: draft
            .requirements
            .iter()
            .map(|req| RequirementPayload {
                description: LocalizedPayload::fr_only(req.title.trim()),
                kind: req.kind,
            })
            .collect(),
        status: target,
        location_type: draft
            .location_type
            .iter()
            .map(|l| l.as_str().to_string())
            .collect(),
    }
}
