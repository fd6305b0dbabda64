use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::service_dto::{
    CategoryListResponse, ServiceEnvelope, ServicePayload, ServiceRef, StatusPatch,
};
use crate::error::{Error, Result};
use crate::models::service::{Category, Service, ServiceStatus};
use crate::services::api_client::ApiClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn create_service(&self, payload: &ServicePayload) -> Result<Uuid>;
    async fn update_service(&self, id: Uuid, payload: &ServicePayload) -> Result<Uuid>;
}

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    admin: bool,
}

impl CatalogService {
    pub fn new(api: ApiClient, admin: bool) -> Self {
        Self { api, admin }
    }

    fn service_path(&self, id: Option<Uuid>) -> String {
        let prefix = if self.admin { "admin/services" } else { "services" };
        match id {
            Some(id) => format!("{}/{}", prefix, id),
            None => prefix.to_string(),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let request = self.api.request(Method::GET, "categories")?;
        let response: CategoryListResponse = self.api.send_json(request).await?;
        Ok(response.categories)
    }

    #[instrument(skip(self))]
    pub async fn get_service(&self, id: Uuid) -> Result<Service> {
        let request = self.api.request(Method::GET, &self.service_path(Some(id)))?;
        let body: serde_json::Value = self.api.send_json(request).await?;
        if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
            return Err(Error::Transport(error.to_string()));
        }

        // Some deployments wrap the row in `{service}`, others return it bare.
        let raw = match body.get("service") {
            Some(serde_json::Value::Null) => {
                return Err(Error::NotFound(format!("Service {} not found", id)))
            }
            Some(service) => service.clone(),
            None => body,
        };
        serde_json::from_value(raw)
            .map_err(|e| Error::Transport(format!("Unexpected service body: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: Uuid) -> Result<()> {
        let request = self
            .api
            .request(Method::DELETE, &self.service_path(Some(id)))?;
        self.api.send_empty(request).await?;
        info!(%id, "Service deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, status: ServiceStatus) -> Result<()> {
        let request = self
            .api
            .request(Method::PATCH, &self.service_path(Some(id)))?
            .json(&StatusPatch { status });
        let envelope: ServiceEnvelope<serde_json::Value> = self.api.send_json(request).await?;
        unwrap_envelope(envelope)?;
        info!(%id, %status, "Service status changed");
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for CatalogService {
    async fn create_service(&self, payload: &ServicePayload) -> Result<Uuid> {
        let request = self
            .api
            .request(Method::POST, &self.service_path(None))?
            .json(payload);
        let envelope: ServiceEnvelope<ServiceRef> = self.api.send_json(request).await?;
        unwrap_envelope(envelope)?
            .map(|s| s.id)
            .ok_or_else(|| Error::Transport("Service created but no id was returned".to_string()))
    }

    async fn update_service(&self, id: Uuid, payload: &ServicePayload) -> Result<Uuid> {
        let request = self
            .api
            .request(Method::PATCH, &self.service_path(Some(id)))?
            .json(payload);
        let envelope: ServiceEnvelope<ServiceRef> = self.api.send_json(request).await?;
        Ok(unwrap_envelope(envelope)?.map_or(id, |s| s.id))
    }
}

/// A 2xx body can still carry `error` or `success: false`.
fn unwrap_envelope<T>(envelope: ServiceEnvelope<T>) -> Result<Option<T>> {
    if let Some(error) = envelope.error.filter(|e| !e.trim().is_empty()) {
        return Err(Error::Transport(error));
    }
    if envelope.success == Some(false) {
        return Err(Error::Transport(String::new()));
    }
    Ok(envelope.service)
}
