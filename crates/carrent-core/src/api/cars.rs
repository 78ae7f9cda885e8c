use std::sync::Arc;

use carrent_shared::dto::CarFilter;

use super::{record, records};
use crate::domain::{Car, CarForm};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, Payload, RequestOptions};
use crate::ports::Method;

/// `/Car/*` endpoints.
#[derive(Clone)]
pub struct CarsApi {
    gateway: Arc<Gateway>,
}

impl CarsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn all(&self) -> ApiResult<Vec<Car>> {
        let payload = self
            .gateway
            .request("/Car/all", RequestOptions::default())
            .await?;
        records(payload, Car::from_value)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Car> {
        let payload = self
            .gateway
            .request(&format!("/Car/{}", id), RequestOptions::default())
            .await?;
        record(payload, Car::from_value)
    }

    /// Search the fleet. Unset criteria are left out of the request body.
    pub async fn filter(&self, filter: &CarFilter) -> ApiResult<Vec<Car>> {
        let body =
            serde_json::to_value(filter).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let payload = self
            .gateway
            .request("/Car/filter", RequestOptions::new(Method::Post).json(body))
            .await?;
        records(payload, Car::from_value)
    }

    /// Add a car, uploading its image with the form when one is attached.
    pub async fn add(&self, form: CarForm) -> ApiResult<Payload> {
        form.validate()?;
        tracing::debug!(make = %form.make, model = %form.model, "Adding car");
        self.gateway
            .send_multipart("/Car/add", Method::Post, form.into_create_form())
            .await
    }

    /// Replace a car's details. `old_image_url` tells the backend which image
    /// to discard when a new one is uploaded.
    pub async fn update(
        &self,
        id: i64,
        form: CarForm,
        old_image_url: Option<&str>,
    ) -> ApiResult<Payload> {
        form.validate()?;
        self.gateway
            .send_multipart(
                "/Car/update",
                Method::Put,
                form.into_update_form(id, old_image_url),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<Payload> {
        self.gateway
            .request(
                &format!("/Car/delete/{}", id),
                RequestOptions::new(Method::Delete),
            )
            .await
    }
}
