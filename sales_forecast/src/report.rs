//! Rendering of forecast tables: CSV bytes, text table, single summary

use crate::error::Result;
use crate::forecast::ForecastRow;

/// Default name of the exported file
pub const CSV_FILE_NAME: &str = "Prediction.csv";

/// MIME type of the exported file
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Column header of the sales values in the export
pub const SALES_HEADER: &str = "Sales (Naira)";

/// Encode the forecast table as UTF-8 CSV bytes
pub fn to_csv(rows: &[ForecastRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", SALES_HEADER])?;
    for row in rows {
        writer.write_record([row.date.format("%Y-%m-%d").to_string(), row.sales.to_string()])?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::error::SalesForecastError::CsvError(e.to_string()))
}

/// Encode the forecast table as JSON
pub fn to_json(rows: &[ForecastRow]) -> Result<String> {
    serde_json::to_string(rows)
        .map_err(|e| crate::error::SalesForecastError::SerializationError(e.to_string()))
}

/// Plain-text dataframe view of the forecast table
pub fn render_table(rows: &[ForecastRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}  {:>16}\n", "Date", SALES_HEADER));
    for row in rows {
        out.push_str(&format!(
            "{:<12}  {:>16.4}\n",
            row.date.format("%Y-%m-%d"),
            row.sales
        ));
    }
    out
}

/// Textual summary for a single prediction
pub fn single_summary(row: &ForecastRow) -> String {
    format!(
        "The date is {}\nThe sales value is {:.4} naira",
        row.date.format("%Y-%m-%d"),
        row.sales
    )
}
