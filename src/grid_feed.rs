//! 전력계통 운영자 데이터 피드 본문을 정규화된 항목 목록으로 바꾼다.
//!
//! HTTP 요청은 이 모듈 밖(호출자)의 책임이다. 이미 받아 온 JSON/CSV 본문만 다룬다.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::series::TimedValue;

/// 피드 처리 오류.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unable to parse JSON feed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to parse CSV feed: {0}")]
    Csv(#[from] csv::Error),
    #[error("end must be greater than or equal to start ({start} > {end})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

pub type FeedRow = BTreeMap<String, Value>;

/// 열 이름과 행 목록.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedTable {
    pub columns: Vec<String>,
    pub rows: Vec<FeedRow>,
}

impl FeedTable {
    /// 이름에 date/time 이 들어가고 실제로 시각으로 해석되는 값이 있는 열.
    pub fn timestamp_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.contains("date") || c.contains("time"))
            .filter(|c| {
                self.rows
                    .iter()
                    .any(|r| r.get(c.as_str()).and_then(value_to_timestamp).is_some())
            })
            .map(String::as_str)
            .collect()
    }
}

/// 본문 형식을 판별해 표로 읽는다. content-type 에 csv 가 있거나 본문이 CSV 처럼 보이면 CSV.
pub fn parse_feed(body: &str, content_type: Option<&str>) -> Result<FeedTable, FeedError> {
    let is_csv = content_type
        .map(|c| c.to_lowercase().contains("csv"))
        .unwrap_or(false);
    // JSON 본문도 쉼표를 포함하므로 '{' '[' 로 시작하면 먼저 JSON 으로 본다.
    let starts_like_json = body.trim_start().starts_with(['{', '[']);
    let table = if is_csv || (!starts_like_json && looks_like_csv(body)) {
        parse_csv(body)?
    } else {
        parse_json(body)?
    };
    debug!(rows = table.rows.len(), columns = table.columns.len(), "feed parsed");
    Ok(normalize_columns(table))
}

/// 앞 세 줄 중 쉼표가 있는 줄이 있으면 CSV 로 본다.
pub fn looks_like_csv(text: &str) -> bool {
    text.trim().lines().take(3).any(|line| line.contains(','))
}

fn parse_csv(text: &str) -> Result<FeedTable, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| (col.clone(), cell_value(cell)))
            .collect();
        rows.push(row);
    }
    Ok(FeedTable { columns, rows })
}

fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    cell.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

fn parse_json(text: &str) -> Result<FeedTable, FeedError> {
    let data: Value = serde_json::from_str(text)?;
    // 일부 피드는 {"items": [...]} 처럼 목록을 감싼다. 문서 순서상 첫 배열을 쓴다.
    let records = match data {
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for record in records {
        let Value::Object(obj) = record else {
            continue;
        };
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        rows.push(obj.into_iter().collect());
    }
    Ok(FeedTable { columns, rows })
}

/// 열 이름을 snake_case 로 바꾼다. `fuelType` -> `fuel_type`, `MW` -> `mw`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '-' {
            out.push('_');
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    let mut collapsed = String::with_capacity(out.len());
    for ch in out.chars() {
        if ch == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed.trim_matches('_').to_string()
}

fn normalize_columns(table: FeedTable) -> FeedTable {
    let columns = table.columns.iter().map(|c| snake_case(c)).collect();
    let rows = table
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(|(k, v)| (snake_case(&k), v)).collect())
        .collect();
    FeedTable { columns, rows }
}

/// 피드에서 흔한 시각 표기를 UTC 로 해석한다. 시간대가 없으면 UTC 로 본다.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %I:%M:%S %p",
        "%m/%d/%Y %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|naive| naive.and_utc())
}

fn value_to_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    v.as_str().and_then(parse_timestamp)
}

fn value_to_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => crate::input::parse_number(s),
        _ => f64::NAN,
    }
}

/// 정규화된 항목 목록과 가장 늦은 시각.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot<T> {
    pub items: Vec<T>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// 연료별 발전량 항목.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationItem {
    pub timestamp: Option<DateTime<Utc>>,
    /// 현지(동부) 시각. 원문 그대로 둔다.
    pub timestamp_ept: Option<String>,
    pub fuel_type: Option<String>,
    pub mw: f64,
    pub is_renewable: Option<bool>,
}

/// 연료별 발전량 피드를 정규화한다.
pub fn gen_by_fuel(table: &FeedTable) -> FeedSnapshot<GenerationItem> {
    let alias = |row: &FeedRow, names: &[&str]| -> Option<Value> {
        names.iter().find_map(|n| row.get(*n)).cloned()
    };
    let items: Vec<GenerationItem> = table
        .rows
        .iter()
        .map(|row| GenerationItem {
            timestamp: alias(row, &["datetime_beginning_utc", "timestamp"])
                .as_ref()
                .and_then(value_to_timestamp),
            timestamp_ept: alias(row, &["datetime_beginning_ept", "timestamp_ept"])
                .and_then(|v| v.as_str().map(str::to_string)),
            fuel_type: alias(row, &["fuel_type", "fueltype"])
                .and_then(|v| v.as_str().map(str::to_string)),
            mw: alias(row, &["mw"]).as_ref().map_or(f64::NAN, value_to_f64),
            is_renewable: alias(row, &["is_renewable"]).and_then(|v| match v {
                Value::Bool(b) => Some(b),
                Value::String(s) => match s.to_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                },
                _ => None,
            }),
        })
        .collect();
    let unparsed = items.iter().filter(|i| i.timestamp.is_none()).count();
    if unparsed > 0 {
        warn!(unparsed, "generation rows without a parseable timestamp");
    }
    let latest_timestamp = items.iter().filter_map(|i| i.timestamp).max();
    FeedSnapshot {
        items,
        latest_timestamp,
    }
}

/// 등장한 연료 종류(정렬, 중복 제거).
pub fn fuel_types(items: &[GenerationItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|i| i.fuel_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 한 연료의 시계열. 시각이 없는 행은 제외한다.
pub fn generation_series(items: &[GenerationItem], fuel: &str) -> Vec<TimedValue> {
    items
        .iter()
        .filter(|i| i.fuel_type.as_deref().is_some_and(|f| f.eq_ignore_ascii_case(fuel)))
        .filter_map(|i| i.timestamp.map(|t| TimedValue::new(t, i.mw)))
        .collect()
}

/// 피드 조회 조건. 시각 구간과 최대 행 수.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub row_count: Option<usize>,
}

impl FeedQuery {
    /// 끝 시각이 시작보다 앞서면 오류.
    pub fn validate(&self) -> Result<(), FeedError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Err(FeedError::InvalidRange { start, end }),
            _ => Ok(()),
        }
    }

    fn contains(&self, t: Option<DateTime<Utc>>) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        t.is_some_and(|t| self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t <= e))
    }

    /// 구간 안의 항목만 남기고 `row_count` 개로 자른다. 구간이 있으면 시각 없는 행은 버린다.
    pub fn select(
        &self,
        snapshot: FeedSnapshot<GenerationItem>,
    ) -> Result<FeedSnapshot<GenerationItem>, FeedError> {
        self.validate()?;
        let items: Vec<GenerationItem> = snapshot
            .items
            .into_iter()
            .filter(|i| self.contains(i.timestamp))
            .take(self.row_count.unwrap_or(usize::MAX))
            .collect();
        let latest_timestamp = items.iter().filter_map(|i| i.timestamp).max();
        Ok(FeedSnapshot {
            items,
            latest_timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CSV_BODY: &str = "\
datetime_beginning_utc,datetime_beginning_ept,fuel_type,mw,is_renewable
2024-01-15T05:00:00,2024-01-15T00:00:00,Gas,35000,false
2024-01-15T05:00:00,2024-01-15T00:00:00,Wind,4200,true
2024-01-15T06:00:00,2024-01-15T01:00:00,Gas,34000,false
";

    #[test]
    fn snake_case_columns() {
        assert_eq!(snake_case("fuelType"), "fuel_type");
        assert_eq!(snake_case("MW"), "mw");
        assert_eq!(snake_case("Datetime Beginning UTC"), "datetime_beginning_utc");
        assert_eq!(snake_case("is-renewable"), "is_renewable");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn csv_sniffing() {
        assert!(looks_like_csv(CSV_BODY));
        assert!(!looks_like_csv("no delimiters here\nat all"));
        assert!(!looks_like_csv(""));
    }

    #[test]
    fn csv_feed_normalizes_generation() {
        let table = parse_feed(CSV_BODY, None).unwrap();
        assert_eq!(table.rows.len(), 3);
        let snap = gen_by_fuel(&table);
        assert_eq!(snap.items.len(), 3);
        assert_eq!(snap.items[1].fuel_type.as_deref(), Some("Wind"));
        assert_eq!(snap.items[1].mw, 4200.0);
        assert_eq!(snap.items[1].is_renewable, Some(true));
        assert_eq!(
            snap.latest_timestamp,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap())
        );
        assert_eq!(fuel_types(&snap.items), vec!["Gas".to_string(), "Wind".to_string()]);
        assert_eq!(generation_series(&snap.items, "gas").len(), 2);
        assert!(table.timestamp_columns().contains(&"datetime_beginning_utc"));
    }

    #[test]
    fn json_feed_wrapped_items() {
        let body = r#"{"totalRows": 2, "items": [
            {"datetimeBeginningUtc": "2024-01-15T05:00:00Z", "fuelType": "Nuclear", "MW": 32000},
            {"datetimeBeginningUtc": "2024-01-15T05:00:00Z", "fuelType": "Solar", "MW": "1,250"}
        ]}"#;
        let table = parse_feed(body, Some("application/json")).unwrap();
        assert!(table.columns.contains(&"fuel_type".to_string()));
        let snap = gen_by_fuel(&table);
        assert_eq!(snap.items[0].mw, 32_000.0);
        assert_eq!(snap.items[1].mw, 1_250.0);
        assert!(snap.items[0].timestamp.is_some());
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(matches!(parse_feed("{not json", None), Err(FeedError::Json(_))));
    }

    #[test]
    fn query_window_and_row_count() {
        let snap = gen_by_fuel(&parse_feed(CSV_BODY, None).unwrap());
        let t5 = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap();
        let t6 = Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap();

        let early = FeedQuery {
            end: Some(t5),
            ..FeedQuery::default()
        };
        let selected = early.select(snap.clone()).unwrap();
        assert_eq!(selected.items.len(), 2);
        assert_eq!(selected.latest_timestamp, Some(t5));

        let limited = FeedQuery {
            start: Some(t5),
            row_count: Some(1),
            ..FeedQuery::default()
        };
        assert_eq!(limited.select(snap.clone()).unwrap().items.len(), 1);

        let backwards = FeedQuery {
            start: Some(t6),
            end: Some(t5),
            row_count: None,
        };
        assert!(matches!(backwards.select(snap), Err(FeedError::InvalidRange { .. })));
    }

    #[test]
    fn json_wrapper_uses_first_array_in_document_order() {
        let body = r#"{"data": [{"fuel_type": "Gas", "mw": 1}], "columns": ["fuel_type", "mw"]}"#;
        let table = parse_feed(body, Some("application/json")).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns, ["fuel_type", "mw"]);
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2024-01-15T05:00:00").is_some());
        assert!(parse_timestamp("2024-01-15T05:00:00Z").is_some());
        assert!(parse_timestamp("1/15/2024 5:00:00 AM").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
