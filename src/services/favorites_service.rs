use reqwest::Method;
use std::collections::BTreeSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::service_dto::{FavoriteListResponse, FavoritePayload};
use crate::error::Result;
use crate::services::api_client::ApiClient;

pub struct FavoritesService {
    api: ApiClient,
    favorites: BTreeSet<Uuid>,
}

impl FavoritesService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            favorites: BTreeSet::new(),
        }
    }

    pub fn is_favorite(&self, service_id: Uuid) -> bool {
        self.favorites.contains(&service_id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Uuid> {
        self.favorites.iter()
    }

    pub async fn load(&mut self) -> Result<usize> {
        let request = self.api.request(Method::GET, "favorites")?;
        let response: FavoriteListResponse = self.api.send_json(request).await?;
        self.favorites = response
            .favorites
            .into_iter()
            .map(|f| f.service_id)
            .collect();
        Ok(self.favorites.len())
    }

    pub async fn toggle(&mut self, service_id: Uuid) -> Result<bool> {
        let now_favorite = !self.favorites.contains(&service_id);
        self.apply(service_id, now_favorite);

        let result = self.confirm(service_id, now_favorite).await;

        match result {
            Ok(()) => {
                info!(%service_id, favorite = now_favorite, "Favorite updated");
                Ok(now_favorite)
            }
            Err(e) => {
                warn!(%service_id, error = %e, "Favorite update failed, rolling back");
                self.apply(service_id, !now_favorite);
                Err(e)
            }
        }
    }

    async fn confirm(&self, service_id: Uuid, favorite: bool) -> Result<()> {
        let request = if favorite {
            self.api
                .request(Method::POST, "favorites")?
                .json(&FavoritePayload { service_id })
        } else {
            self.api
                .request(Method::DELETE, &format!("favorites/{}", service_id))?
        };
        self.api.send_empty(request).await
    }

    fn apply(&mut self, service_id: Uuid, favorite: bool) {
        if favorite {
            self.favorites.insert(service_id);
        } else {
            self.favorites.remove(&service_id);
        }
    }
}
