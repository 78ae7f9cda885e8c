use anyhow::Result;

use super::print_json;
use crate::app::App;
use crate::cli::ReportAction;

pub async fn run(app: &App, action: ReportAction) -> Result<()> {
    app.client.auth().require_admin()?;
    let reports = app.client.reports();

    match action {
        ReportAction::Stats => print_json(&reports.general_stats().await?),
        ReportAction::Top { take } => print_json(&reports.top_cars(take).await?),
        ReportAction::Daily { days } => print_json(&reports.daily_revenue(days).await?),
        ReportAction::Monthly { months } => print_json(&reports.monthly_revenue(months).await?),
    }
}
