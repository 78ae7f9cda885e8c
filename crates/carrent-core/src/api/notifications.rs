use std::sync::Arc;

use super::records;
use crate::domain::Notification;
use crate::error::ApiResult;
use crate::gateway::{Gateway, Payload, RequestOptions};
use crate::ports::Method;

/// `/Notification/*` endpoints.
#[derive(Clone)]
pub struct NotificationsApi {
    gateway: Arc<Gateway>,
}

impl NotificationsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Current notification list of the signed-in user.
    pub async fn mine(&self) -> ApiResult<Vec<Notification>> {
        let payload = self
            .gateway
            .request("/Notification/my", RequestOptions::default())
            .await?;
        records(payload, Notification::from_value)
    }

    pub async fn mark_read(&self, id: i64) -> ApiResult<Payload> {
        self.gateway
            .request(
                &format!("/Notification/mark-read/{}", id),
                RequestOptions::new(Method::Put),
            )
            .await
    }

    pub async fn mark_all_read(&self) -> ApiResult<Payload> {
        self.gateway
            .request(
                "/Notification/mark-all-read",
                RequestOptions::new(Method::Put),
            )
            .await
    }
}
