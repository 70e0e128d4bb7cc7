//! Sheet data access: fetch the published CSV export and normalize its
//! rows into [`PersonRecord`]s.
//!
//! Everything in the sheet is untrusted operator input. A bad cell
//! degrades to "no record", a bad row is dropped, and only a failed
//! fetch or an unreadable header row aborts a load.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::headers::{HeaderMap, LogicalField};
use crate::models::PersonRecord;
use crate::state::LoadOutcome;
use crate::times;

/// One parsed CSV payload.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub header_map: HeaderMap,
    pub records: Vec<PersonRecord>,
}

/// GET the CSV export. A timestamp query parameter plus a no-store
/// directive defeat spreadsheet publish caches between polls.
pub async fn fetch_csv(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);

    let response = client
        .get(url)
        .query(&[("t", stamp.to_string())])
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await
        .context("CSV 요청에 실패했습니다")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("CSV 요청 실패: {status}");
    }

    response.text().await.context("CSV 본문을 읽지 못했습니다")
}

/// Parse CSV text into normalized records via the resolved header map.
pub fn parse_sheet(csv_text: &str) -> anyhow::Result<SheetData> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let raw_headers = reader
        .headers()
        .context("CSV 헤더를 읽지 못했습니다")?
        .clone();
    let header_map = HeaderMap::build(raw_headers.iter());

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!(%err, "skipping unreadable CSV row");
                continue;
            }
        };
        match normalize_row(&header_map, &row) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(
        rows = records.len(),
        dropped, "parsed sheet rows"
    );
    Ok(SheetData {
        header_map,
        records,
    })
}

/// Turn one raw row into a record; rows with no display name are dropped.
pub fn normalize_row(map: &HeaderMap, row: &csv::StringRecord) -> Option<PersonRecord> {
    let name = field_text(map, row, LogicalField::Name);
    let student_id = field_text(map, row, LogicalField::StudentId);
    let nick = field_text(map, row, LogicalField::Nick);
    let record_raw = field_text(map, row, LogicalField::Record);
    let seconds = times::parse_record(&record_raw);

    let record = PersonRecord {
        name,
        student_id,
        nick,
        record_raw,
        seconds,
    };
    record.has_display_name().then_some(record)
}

fn field_text(map: &HeaderMap, row: &csv::StringRecord, field: LogicalField) -> String {
    map.index(field)
        .and_then(|idx| row.get(idx))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Full load: fetch, parse, and stamp an outcome for the dataset slot.
pub async fn load(client: &reqwest::Client, url: &str) -> anyhow::Result<LoadOutcome> {
    let csv_text = fetch_csv(client, url).await?;
    let data = parse_sheet(&csv_text)?;

    let missing_fields = data.header_map.missing_fields();
    if !missing_fields.is_empty() {
        warn!(?missing_fields, "sheet is missing expected headers");
    }

    Ok(LoadOutcome {
        records: data.records,
        headers: data.header_map.headers,
        missing_fields,
        fetched_at: chrono::Local::now(),
    })
}
