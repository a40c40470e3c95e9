//! 면적과 건물 기밀 등급으로 최대 냉난방 부하를 추정한다.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BTUH_PER_MBH, BTUH_PER_TON};

/// 건물 연식/기밀 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vintage {
    Tight,
    #[default]
    Average,
    Leaky,
}

impl Vintage {
    pub const ALL: [Vintage; 3] = [Vintage::Tight, Vintage::Average, Vintage::Leaky];

    /// (난방, 냉방) 부하 밀도 [Btu/(ft²·h)].
    pub fn densities(self) -> (f64, f64) {
        match self {
            Vintage::Tight => (25.0, 15.0),
            Vintage::Average => (30.0, 20.0),
            Vintage::Leaky => (40.0, 28.0),
        }
    }

    /// 키를 해석한다. 알 수 없는 키는 `Average` 로 대체한다.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "tight" | "new" | "high-performance" => Vintage::Tight,
            "average" | "avg" | "typical" => Vintage::Average,
            "leaky" | "old" | "loose" => Vintage::Leaky,
            other => {
                debug!(key = other, "unknown vintage, using average");
                Vintage::Average
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Vintage::Tight => "tight",
            Vintage::Average => "average",
            Vintage::Leaky => "leaky",
        }
    }
}

impl FromStr for Vintage {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Vintage::from_key(s))
    }
}

/// 부하 추정 입력.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadInput {
    /// 냉난방 면적 [ft²]
    pub floor_area_ft2: f64,
    pub vintage: Vintage,
    /// 난방 밀도 재정의 [Btu/(ft²·h)]
    pub heating_override: Option<f64>,
    /// 냉방 밀도 재정의 [Btu/(ft²·h)]
    pub cooling_override: Option<f64>,
}

/// 부하 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadEstimate {
    pub vintage: Vintage,
    pub heating_density: f64,
    pub cooling_density: f64,
    pub heating_btuh: f64,
    pub heating_mbh: f64,
    pub cooling_btuh: f64,
    pub cooling_tons: f64,
}

/// 재정의 값은 유한하고 0 이상일 때만 쓴다.
fn pick_density(override_value: Option<f64>, default: f64) -> f64 {
    match override_value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            debug!(v, default, "ignoring invalid density override");
            default
        }
        None => default,
    }
}

fn clamp_area(area: f64) -> f64 {
    // f64::max 는 NaN 을 삼키므로 먼저 걸러 전파한다.
    if area.is_nan() {
        area
    } else {
        area.max(0.0)
    }
}

/// 선택된 등급(재정의 포함)으로 부하를 추정한다.
pub fn estimate_load(input: LoadInput) -> LoadEstimate {
    let (heat_default, cool_default) = input.vintage.densities();
    let heating_density = pick_density(input.heating_override, heat_default);
    let cooling_density = pick_density(input.cooling_override, cool_default);
    let area = clamp_area(input.floor_area_ft2);

    let heating_btuh = area * heating_density;
    let cooling_btuh = area * cooling_density;
    LoadEstimate {
        vintage: input.vintage,
        heating_density,
        cooling_density,
        heating_btuh,
        heating_mbh: heating_btuh / BTUH_PER_MBH,
        cooling_btuh,
        cooling_tons: cooling_btuh / BTUH_PER_TON,
    }
}

/// 세 등급 모두에 대해 부하를 계산한다. 재정의는 선택된 등급에만 적용한다.
pub fn compare_vintages(input: LoadInput) -> [LoadEstimate; 3] {
    Vintage::ALL.map(|vintage| {
        if vintage == input.vintage {
            estimate_load(input)
        } else {
            estimate_load(LoadInput {
                vintage,
                heating_override: None,
                cooling_override: None,
                ..input
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_two_thousand_square_feet() {
        let est = estimate_load(LoadInput {
            floor_area_ft2: 2_000.0,
            vintage: Vintage::Average,
            ..LoadInput::default()
        });
        assert_eq!(est.heating_btuh, 60_000.0);
        assert_eq!(est.heating_mbh, 60.0);
        assert_eq!(est.cooling_btuh, 40_000.0);
        assert!((est.cooling_tons - 40_000.0 / 12_000.0).abs() < 1e-12);
    }

    #[test]
    fn overrides_take_precedence() {
        let est = estimate_load(LoadInput {
            floor_area_ft2: 1_000.0,
            vintage: Vintage::Leaky,
            heating_override: Some(50.0),
            cooling_override: None,
        });
        assert_eq!(est.heating_btuh, 50_000.0);
        assert_eq!(est.cooling_btuh, 28_000.0);
    }

    #[test]
    fn invalid_override_ignored() {
        let est = estimate_load(LoadInput {
            floor_area_ft2: 1_000.0,
            vintage: Vintage::Tight,
            heating_override: Some(f64::NAN),
            cooling_override: Some(-3.0),
        });
        assert_eq!(est.heating_density, 25.0);
        assert_eq!(est.cooling_density, 15.0);
    }

    #[test]
    fn negative_area_clamped_nan_propagates() {
        let est = estimate_load(LoadInput {
            floor_area_ft2: -500.0,
            ..LoadInput::default()
        });
        assert_eq!(est.heating_btuh, 0.0);
        let est = estimate_load(LoadInput {
            floor_area_ft2: f64::NAN,
            ..LoadInput::default()
        });
        assert!(est.cooling_tons.is_nan());
    }

    #[test]
    fn comparison_applies_override_only_to_selected() {
        let rows = compare_vintages(LoadInput {
            floor_area_ft2: 1_000.0,
            vintage: Vintage::Tight,
            heating_override: Some(10.0),
            cooling_override: Some(5.0),
        });
        assert_eq!(rows[0].vintage, Vintage::Tight);
        assert_eq!(rows[0].heating_btuh, 10_000.0);
        assert_eq!(rows[1].heating_btuh, 30_000.0);
        assert_eq!(rows[2].cooling_btuh, 28_000.0);
    }

    #[test]
    fn unknown_vintage_key_falls_back() {
        assert_eq!(Vintage::from_key("TIGHT"), Vintage::Tight);
        assert_eq!(Vintage::from_key("victorian"), Vintage::Average);
    }
}
