use std::sync::Arc;

use super::records;
use crate::domain::{GeneralStats, RevenuePoint, TopCar, revenue_series};
use crate::error::ApiResult;
use crate::gateway::{Gateway, RequestOptions, with_query};

const DEFAULT_TOP_CARS: u32 = 5;
const DEFAULT_DAYS: u32 = 7;
const DEFAULT_MONTHS: u32 = 12;

/// `/Report/*` endpoints backing the admin dashboard.
#[derive(Clone)]
pub struct ReportsApi {
    gateway: Arc<Gateway>,
}

impl ReportsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn general_stats(&self) -> ApiResult<GeneralStats> {
        let payload = self
            .gateway
            .request("/Report/general-stats", RequestOptions::default())
            .await?;
        Ok(GeneralStats::from_value(&payload.into_value()))
    }

    /// Most rented cars, `take` rows (5 by default).
    pub async fn top_cars(&self, take: Option<u32>) -> ApiResult<Vec<TopCar>> {
        let path = with_query(
            "/Report/top-cars",
            &[("take", take.unwrap_or(DEFAULT_TOP_CARS).to_string())],
        );
        let payload = self
            .gateway
            .request(&path, RequestOptions::default())
            .await?;
        records(payload, |v| Some(TopCar::from_value(v)))
    }

    /// Revenue per day over the last `days` days (7 by default).
    pub async fn daily_revenue(&self, days: Option<u32>) -> ApiResult<Vec<RevenuePoint>> {
        self.series(
            "/Report/daily-revenue",
            "days",
            days.unwrap_or(DEFAULT_DAYS),
        )
        .await
    }

    /// Revenue per month over the last `months` months (12 by default).
    pub async fn monthly_revenue(&self, months: Option<u32>) -> ApiResult<Vec<RevenuePoint>> {
        self.series(
            "/Report/monthly-revenue",
            "months",
            months.unwrap_or(DEFAULT_MONTHS),
        )
        .await
    }

    async fn series(&self, path: &str, param: &str, span: u32) -> ApiResult<Vec<RevenuePoint>> {
        let path = with_query(path, &[(param, span.to_string())]);
        let payload = self
            .gateway
            .request(&path, RequestOptions::default())
            .await?;
        Ok(revenue_series(&payload.into_value()))
    }
}
