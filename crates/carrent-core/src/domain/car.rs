use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::decode::{self, MAKE_KEYS, MODEL_KEYS};
use crate::error::{ApiError, ApiResult};
use crate::ports::MultipartForm;

/// Availability of a car in the fleet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CarStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
    Other(String),
}

impl CarStatus {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "available" => CarStatus::Available,
            "rented" => CarStatus::Rented,
            "maintenance" => CarStatus::Maintenance,
            _ => CarStatus::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CarStatus::Available => "Available",
            CarStatus::Rented => "Rented",
            CarStatus::Maintenance => "Maintenance",
            CarStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CarStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A car in the rental fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub price_per_day: Option<f64>,
    pub status: CarStatus,
    pub image_url: Option<String>,
}

impl Car {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: decode::pick_i64(value, &["id", "carId", "Id"])?,
            make: decode::pick_str(value, MAKE_KEYS).unwrap_or_default(),
            model: decode::pick_str(value, MODEL_KEYS).unwrap_or_default(),
            year: decode::pick_i64(value, &["year"]).and_then(|y| i32::try_from(y).ok()),
            price_per_day: decode::pick_f64(value, &["pricePerDay", "price", "dailyRate"]),
            status: decode::pick_str(value, &["status"])
                .map(|s| CarStatus::parse(&s))
                .unwrap_or_default(),
            image_url: decode::pick_str(value, &["imageUrl", "image"])
                .filter(|s| !s.trim().is_empty()),
        })
    }

    /// Absolute image URL. Relative paths are served from the API host root.
    pub fn image_url_resolved(&self, api_base: &str) -> Option<String> {
        let image = self.image_url.as_deref()?;
        if image.starts_with("http://") || image.starts_with("https://") {
            return Some(image.to_string());
        }

        let base = Url::parse(api_base).ok()?;
        base.join(&format!("/{}", image.trim_start_matches('/')))
            .ok()
            .map(String::from)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }
}

/// Image attached to a car form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields of the add/edit car form.
#[derive(Debug, Clone, PartialEq)]
pub struct CarForm {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub status: CarStatus,
    pub price_per_day: f64,
    pub image: Option<ImageUpload>,
}

impl CarForm {
    /// Reject forms the backend would bounce anyway.
    pub fn validate(&self) -> ApiResult<()> {
        if self.make.trim().is_empty() || self.model.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "Please fill in all required fields".to_string(),
            ));
        }
        if self.year <= 0 {
            return Err(ApiError::InvalidInput("Year must be positive".to_string()));
        }
        if self.price_per_day.is_nan() || self.price_per_day <= 0.0 {
            return Err(ApiError::InvalidInput(
                "Price per day must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Multipart payload for `POST /Car/add`.
    pub fn into_create_form(self) -> MultipartForm {
        self.into_form()
    }

    /// Multipart payload for `PUT /Car/update`; carries the id and the image being replaced.
    pub fn into_update_form(self, id: i64, old_image_url: Option<&str>) -> MultipartForm {
        let mut form = self.into_form().text("Id", id);
        if let Some(old) = old_image_url {
            form = form.text("OldImageUrl", old);
        }
        form
    }

    fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("Make", self.make.trim())
            .text("Model", self.model.trim())
            .text("Year", self.year)
            .text("Status", self.status.as_str())
            .text("PricePerDay", self.price_per_day);

        if let Some(image) = self.image {
            form = form.file("Image", image.file_name, image.content_type, image.bytes);
        }
        form
    }
}
