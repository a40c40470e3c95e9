use serde::{Deserialize, Serialize};

use super::{normalize_key, Unit};

/// 온도 단위를 정의한다. 내부 기준은 °F 이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
    Kelvin,
    Rankine,
}

const F_OFFSET: f64 = 32.0;
const RANKINE_OFFSET: f64 = 459.67;
const KELVIN_OFFSET: f64 = 273.15;

impl Unit for TemperatureUnit {
    const ALL: &'static [Self] = &[
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Celsius,
        TemperatureUnit::Kelvin,
        TemperatureUnit::Rankine,
    ];

    fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Rankine => "°R",
        }
    }

    fn to_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => value * 9.0 / 5.0 + F_OFFSET,
            TemperatureUnit::Kelvin => (value - KELVIN_OFFSET) * 9.0 / 5.0 + F_OFFSET,
            TemperatureUnit::Rankine => value - RANKINE_OFFSET,
        }
    }

    fn from_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => (value - F_OFFSET) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => (value - F_OFFSET) * 5.0 / 9.0 + KELVIN_OFFSET,
            TemperatureUnit::Rankine => value + RANKINE_OFFSET,
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match normalize_key(key).as_str() {
            "f" | "°f" | "degf" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            "c" | "°c" | "degc" | "celsius" => Some(TemperatureUnit::Celsius),
            "k" | "kelvin" => Some(TemperatureUnit::Kelvin),
            "r" | "°r" | "rankine" => Some(TemperatureUnit::Rankine),
            _ => None,
        }
    }
}

/// 온도를 서로 다른 단위로 변환한다.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    super::convert(value, from, to, f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_points() {
        let c = convert_temperature(212.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius);
        assert!((c - 100.0).abs() < 1e-12);
        let k = convert_temperature(32.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Kelvin);
        assert!((k - 273.15).abs() < 1e-12);
        let f = convert_temperature(-40.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit);
        assert!((f + 40.0).abs() < 1e-12);
        let r = convert_temperature(0.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Rankine);
        assert!((r - 459.67).abs() < 1e-12);
    }
}
