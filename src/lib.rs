pub mod config;
pub mod dto;
pub mod error;
pub mod i18n;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::models::localized::Locale;
use crate::services::{
    api_client::ApiClient, catalog_service::CatalogService,
    currency_service::{CurrencyNormalizer, CurrencyService},
    favorites_service::FavoritesService,
    media_service::{MediaManager, UploadService},
    submission_service::SubmissionDispatcher,
};

#[derive(Clone)]
pub struct Studio {
    pub locale: Locale,
    pub catalog: CatalogService,
    pub currencies: CurrencyService,
    pub normalizer: CurrencyNormalizer,
    pub media: MediaManager,
    pub dispatcher: SubmissionDispatcher,
    api: ApiClient,
}

impl Studio {
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config)?;

        let catalog = CatalogService::new(api.clone(), config.admin_mode);
        let currencies = CurrencyService::new(api.clone(), config.canonical_currency.clone());
        let normalizer =
            CurrencyNormalizer::new(Arc::new(currencies.clone()), config.canonical_currency.clone());
        let media = MediaManager::new(Arc::new(UploadService::new(api.clone())));
        let dispatcher = SubmissionDispatcher::new(
            normalizer.clone(),
            Arc::new(catalog.clone()),
            config.default_locale,
        );

        Ok(Self {
            locale: config.default_locale,
            catalog,
            currencies,
            normalizer,
            media,
            dispatcher,
            api,
        })
    }

    pub fn favorites(&self) -> FavoritesService {
        FavoritesService::new(self.api.clone())
    }
}
