//! 시계열 집계 유틸리티: 시각별 중앙값, 최대(피크), 최소/최대.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 시각이 붙은 값 하나.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimedValue {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// 피크 값과 발생 시각. 데이터가 없으면 값은 NaN, 시각은 None.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub value: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MinMax {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// 정렬된 복사본에서 중앙값을 구한다. 비어 있으면 None.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// 같은 시각끼리 묶어 중앙값을 구한다. 결과는 시각 오름차순이다.
/// 유한하지 않은 값은 집계에서 제외한다.
pub fn median_by_timestamp(records: &[TimedValue]) -> Vec<TimedValue> {
    let mut groups: BTreeMap<DateTime<Utc>, Vec<f64>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.value.is_finite()) {
        groups.entry(r.timestamp).or_default().push(r.value);
    }
    groups
        .into_iter()
        .filter_map(|(timestamp, values)| median(&values).map(|value| TimedValue { timestamp, value }))
        .collect()
}

/// 최대값과 그 시각. 같은 값이 여러 번이면 처음 나온 것을 쓴다.
pub fn compute_peak(series: &[TimedValue]) -> Peak {
    let mut peak = Peak {
        value: f64::NAN,
        timestamp: None,
    };
    for point in series.iter().filter(|p| p.value.is_finite()) {
        if peak.timestamp.is_none() || point.value > peak.value {
            peak = Peak {
                value: point.value,
                timestamp: Some(point.timestamp),
            };
        }
    }
    peak
}

/// 유한한 값들의 최소/최대. 없으면 둘 다 None.
pub fn compute_min_max(series: &[TimedValue]) -> MinMax {
    series
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(MinMax::default(), |acc, v| MinMax {
            min: Some(acc.min.map_or(v, |m| m.min(v))),
            max: Some(acc.max.map_or(v, |m| m.max(v))),
        })
}

/// 가장 늦은 시각.
pub fn latest_timestamp(series: &[TimedValue]) -> Option<DateTime<Utc>> {
    series.iter().map(|p| p.timestamp).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn median_grouped_by_timestamp() {
        let records = [
            TimedValue::new(at(2), 50.0),
            TimedValue::new(at(1), 300.0),
            TimedValue::new(at(1), 100.0),
            TimedValue::new(at(2), 70.0),
            TimedValue::new(at(1), 200.0),
        ];
        let out = median_by_timestamp(&records);
        let values: Vec<f64> = out.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![200.0, 60.0]);
        assert_eq!(out[0].timestamp, at(1));
        assert_eq!(out[1].timestamp, at(2));
    }

    #[test]
    fn median_odd_even() {
        assert_eq!(median(&[1.0, 3.0, 5.0, 7.0, 9.0]), Some(5.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn empty_series_sentinels() {
        let peak = compute_peak(&[]);
        assert!(peak.value.is_nan());
        assert_eq!(peak.timestamp, None);
        assert_eq!(compute_min_max(&[]), MinMax { min: None, max: None });
        assert_eq!(latest_timestamp(&[]), None);
    }

    #[test]
    fn peak_first_occurrence_wins() {
        let series = [
            TimedValue::new(at(1), 10.0),
            TimedValue::new(at(2), 42.0),
            TimedValue::new(at(3), 42.0),
            TimedValue::new(at(4), 7.0),
        ];
        let peak = compute_peak(&series);
        assert_eq!(peak.value, 42.0);
        assert_eq!(peak.timestamp, Some(at(2)));
        assert_eq!(
            compute_min_max(&series),
            MinMax {
                min: Some(7.0),
                max: Some(42.0)
            }
        );
        assert_eq!(latest_timestamp(&series), Some(at(4)));
    }

    #[test]
    fn nan_points_ignored() {
        let series = [TimedValue::new(at(1), f64::NAN), TimedValue::new(at(2), -3.0)];
        let peak = compute_peak(&series);
        assert_eq!(peak.value, -3.0);
        assert_eq!(compute_min_max(&series).min, Some(-3.0));
    }
}
