use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::service_dto::{ConversionResponse, CurrencyListResponse};
use crate::error::{Error, Result};
use crate::models::draft::{minor_to_units, AmountField, ServiceDraft};
use crate::models::service::Currency;
use crate::services::api_client::ApiClient;

/// External exchange-rate lookup. `Ok(None)` means no rate is available.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn to_canonical(&self, amount: Decimal, from_currency: &str) -> Result<Option<Decimal>>;
    async fn from_canonical(&self, amount: Decimal, to_currency: &str) -> Result<Option<Decimal>>;
}

#[derive(Clone)]
pub struct CurrencyService {
    api: ApiClient,
    canonical: String,
}

impl CurrencyService {
    pub fn new(api: ApiClient, canonical: impl Into<String>) -> Self {
        Self {
            api,
            canonical: canonical.into(),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_active_currencies(&self) -> Result<Vec<Currency>> {
        let request = self
            .api
            .request(Method::GET, "admin/currencies")?
            .query(&[("isAdmin", "true")]);
        let response: CurrencyListResponse = self.api.send_json(request).await?;
        if !response.success {
            return Err(Error::Transport(
                response
                    .error
                    .unwrap_or_else(|| "Currency listing failed".to_string()),
            ));
        }
        let currencies: Vec<Currency> = response
            .data
            .map(|d| d.currencies)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        info!(count = currencies.len(), "Loaded active currencies");
        Ok(currencies)
    }

    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Option<Decimal>> {
        let amount = amount.to_string();
        let request = self
            .api
            .request(Method::GET, "currencies/convert")?
            .query(&[("amount", amount.as_str()), ("from", from), ("to", to)]);
        let response: ConversionResponse = self.api.send_json(request).await?;
        if !response.success {
            warn!(from, to, error = ?response.error, "Conversion endpoint reported failure");
            return Ok(None);
        }
        Ok(response.data.and_then(|d| d.converted_amount))
    }
}

#[async_trait]
impl CurrencyConverter for CurrencyService {
    async fn to_canonical(&self, amount: Decimal, from_currency: &str) -> Result<Option<Decimal>> {
        self.convert(amount, from_currency, &self.canonical).await
    }

    async fn from_canonical(&self, amount: Decimal, to_currency: &str) -> Result<Option<Decimal>> {
        self.convert(amount, &self.canonical, to_currency).await
    }
}

pub fn default_display_currency(currencies: &[Currency], preferred: &str) -> Option<String> {
    currencies
        .iter()
        .filter(|c| c.is_active)
        .find(|c| c.code.eq_ignore_ascii_case(preferred))
        .or_else(|| currencies.iter().find(|c| c.is_active))
        .map(|c| c.code.to_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPrices {
    pub base_price_cents: i64,
    pub price_min_cents: Option<i64>,
    pub price_max_cents: Option<i64>,
    pub extras_cents: Vec<i64>,
}

#[derive(Clone)]
pub struct CurrencyNormalizer {
    converter: Arc<dyn CurrencyConverter>,
    canonical: String,
}

impl CurrencyNormalizer {
    pub fn new(converter: Arc<dyn CurrencyConverter>, canonical: impl Into<String>) -> Self {
        Self {
            converter,
            canonical: canonical.into(),
        }
    }

    pub fn canonical_currency(&self) -> &str {
        &self.canonical
    }

    fn is_canonical(&self, currency: &str) -> bool {
        currency.eq_ignore_ascii_case(&self.canonical)
    }

    pub async fn to_canonical(
        &self,
        field: &AmountField,
        amount: Decimal,
        currency: &str,
    ) -> Result<i64> {
        let currency = currency_code(currency);
        let currency = currency.as_str();
        if amount < Decimal::ZERO {
            return Err(Error::NegativeAmount {
                field: field.clone(),
            });
        }
        if self.is_canonical(currency) {
            return units_to_minor(amount);
        }

        let converted = match self.converter.to_canonical(amount, currency).await {
            Ok(value) => value,
            Err(e) => {
                warn!(%field, currency, error = %e, "Conversion call failed");
                None
            }
        };

        match converted {
            Some(value) => units_to_minor(value),
            None => Err(Error::ConversionUnavailable {
                field: field.clone(),
                currency: currency.to_string(),
            }),
        }
    }

    pub async fn from_canonical(
        &self,
        field: &AmountField,
        cents: i64,
        currency: &str,
    ) -> Result<i64> {
        let currency = currency_code(currency);
        let currency = currency.as_str();
        if self.is_canonical(currency) {
            return Ok(cents);
        }

        let converted = self
            .converter
            .from_canonical(minor_to_units(cents), currency)
            .await
            .unwrap_or_else(|e| {
                warn!(%field, currency, error = %e, "Reverse conversion call failed");
                None
            });

        match converted {
            Some(value) => units_to_minor(value),
            None => Err(Error::ConversionUnavailable {
                field: field.clone(),
                currency: currency.to_string(),
            }),
        }
    }

    /// Converts every amount of the draft. The first unavailable rate aborts the
    /// whole normalization and no partial result is returned.
    #[instrument(skip(self, draft), fields(currency = %draft.display_currency))]
    pub async fn normalize(&self, draft: &ServiceDraft) -> Result<NormalizedPrices> {
        let currency = currency_code(&draft.display_currency);
        let currency = currency.as_str();
        let mut prices = NormalizedPrices {
            base_price_cents: 0,
            price_min_cents: None,
            price_max_cents: None,
            extras_cents: Vec::with_capacity(draft.extras.len()),
        };

        for (field, minor) in draft.amounts() {
            let cents = self
                .to_canonical(&field, minor_to_units(minor), currency)
                .await?;
            match field {
                AmountField::BasePrice => prices.base_price_cents = cents,
                AmountField::MinPrice => prices.price_min_cents = Some(cents),
                AmountField::MaxPrice => prices.price_max_cents = Some(cents),
                AmountField::Extra { .. } => prices.extras_cents.push(cents),
            }
        }

        Ok(prices)
    }
}

pub fn currency_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn units_to_minor(units: Decimal) -> Result<i64> {
    (units * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| Error::Internal(format!("Amount out of range: {}", units)))
}
