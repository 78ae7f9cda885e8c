use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use carrent_core::domain::{Car, CarForm, CarStatus, ImageUpload};
use carrent_shared::dto::CarFilter;

use super::print_json;
use crate::app::App;
use crate::cli::{CarArgs, CarsAction};

pub async fn run(app: &App, action: CarsAction) -> Result<()> {
    let cars = app.client.cars();
    let base = app.client.gateway().base_url().to_string();

    match action {
        CarsAction::List => print_cars(&cars.all().await?, &base),
        CarsAction::Show { id } => print_cars(std::slice::from_ref(&cars.get(id).await?), &base),
        CarsAction::Filter {
            make,
            model,
            year,
            min_price,
            max_price,
            status,
        } => {
            let filter = CarFilter {
                make,
                model,
                year,
                min_price,
                max_price,
                status,
            };
            if filter.is_empty() {
                tracing::debug!("Empty filter, listing every car");
            }
            print_cars(&cars.filter(&filter).await?, &base)
        }
        CarsAction::Add(args) => {
            app.client.auth().require_admin()?;
            cars.add(car_form(args)?).await?;
            print_json(&json!({ "added": true }))
        }
        CarsAction::Update { id, car, old_image } => {
            app.client.auth().require_admin()?;
            cars.update(id, car_form(car)?, old_image.as_deref()).await?;
            print_json(&json!({ "updated": id }))
        }
        CarsAction::Delete { id } => {
            app.client.auth().require_admin()?;
            cars.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

/// Cars with their image URL made absolute.
fn print_cars(cars: &[Car], api_base: &str) -> Result<()> {
    let rows: Vec<_> = cars
        .iter()
        .map(|car| {
            let mut row = serde_json::to_value(car)?;
            row["imageUrl"] = json!(car.image_url_resolved(api_base));
            Ok(row)
        })
        .collect::<Result<_, serde_json::Error>>()?;
    print_json(&rows)
}

fn car_form(args: CarArgs) -> Result<CarForm> {
    let image = args.image.as_deref().map(read_image).transpose()?;

    Ok(CarForm {
        make: args.make,
        model: args.model,
        year: args.year,
        status: CarStatus::parse(&args.status),
        price_per_day: args.price,
        image,
    })
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageUpload {
        content_type: image_mime(path).map(str::to_string),
        file_name,
        bytes,
    })
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
