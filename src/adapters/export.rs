use crate::core::dashboard::NumberDashboard;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct NumberRow<'a> {
    number: &'a str,
    country: &'a str,
    number_type: &'a str,
    status: &'a str,
    monthly_rate: f64,
    currency: &'a str,
    capabilities: String,
    next_billing_date: String,
    connection: String,
}

/// 將目前篩選後的號碼寫成 CSV，狀態欄使用顯示狀態
pub fn write_numbers_csv<W: Write>(dashboard: &NumberDashboard, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;

    for number in dashboard.filtered() {
        csv_writer.serialize(NumberRow {
            number: &number.number,
            country: &number.country,
            number_type: number.number_type.as_str(),
            status: dashboard.display_status(number).as_str(),
            monthly_rate: number.monthly_rate,
            currency: &number.currency,
            capabilities: number.capabilities.labels().join("|"),
            next_billing_date: number
                .next_billing_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            connection: number
                .connection
                .as_ref()
                .map(|c| c.describe())
                .unwrap_or_default(),
        })?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

pub fn export_numbers_csv<P: AsRef<Path>>(dashboard: &NumberDashboard, path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let count = write_numbers_csv(dashboard, file)?;
    tracing::info!("📁 Exported {} numbers to {}", count, path.display());
    Ok(count)
}
