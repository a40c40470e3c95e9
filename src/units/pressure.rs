use serde::{Deserialize, Serialize};

use super::{normalize_key, Unit};
use crate::constants::{ATM_PSI, BAR_PER_PSI, INWC_PER_PSI, KPA_PER_PSI};

/// 압력 단위. 내부 기준은 psig(게이지)이다.
/// psia 만 절대압이며 대기압(14.7 psi) 오프셋으로 보정한다. 나머지는 게이지 기준이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    Psig,
    Psia,
    InchesWaterColumn,
    Kilopascal,
    Bar,
}

impl Unit for PressureUnit {
    const ALL: &'static [Self] = &[
        PressureUnit::Psig,
        PressureUnit::Psia,
        PressureUnit::InchesWaterColumn,
        PressureUnit::Kilopascal,
        PressureUnit::Bar,
    ];

    fn symbol(self) -> &'static str {
        match self {
            PressureUnit::Psig => "psig",
            PressureUnit::Psia => "psia",
            PressureUnit::InchesWaterColumn => "inWC",
            PressureUnit::Kilopascal => "kPa",
            PressureUnit::Bar => "bar",
        }
    }

    fn to_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            PressureUnit::Psig => value,
            PressureUnit::Psia => value - ATM_PSI,
            PressureUnit::InchesWaterColumn => value / INWC_PER_PSI,
            PressureUnit::Kilopascal => value / KPA_PER_PSI,
            PressureUnit::Bar => value / BAR_PER_PSI,
        }
    }

    fn from_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            PressureUnit::Psig => value,
            PressureUnit::Psia => value + ATM_PSI,
            PressureUnit::InchesWaterColumn => value * INWC_PER_PSI,
            PressureUnit::Kilopascal => value * KPA_PER_PSI,
            PressureUnit::Bar => value * BAR_PER_PSI,
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match normalize_key(key).as_str() {
            "psig" | "psi" => Some(PressureUnit::Psig),
            "psia" => Some(PressureUnit::Psia),
            "inwc" | "in.w.c." | "\"wc" | "inh2o" => Some(PressureUnit::InchesWaterColumn),
            "kpa" | "kilopascal" => Some(PressureUnit::Kilopascal),
            "bar" | "barg" => Some(PressureUnit::Bar),
            _ => None,
        }
    }
}

/// 압력을 원하는 단위로 변환한다.
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    super::convert(value, from, to, f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_absolute_offset() {
        assert!((convert_pressure(0.0, PressureUnit::Psig, PressureUnit::Psia) - 14.7).abs() < 1e-12);
        assert!((convert_pressure(14.7, PressureUnit::Psia, PressureUnit::Psig)).abs() < 1e-12);
    }

    #[test]
    fn water_column_and_metric() {
        let inwc = convert_pressure(1.0, PressureUnit::Psig, PressureUnit::InchesWaterColumn);
        assert!((inwc - 27.68).abs() < 1e-12);
        let kpa = convert_pressure(1.0, PressureUnit::Psig, PressureUnit::Kilopascal);
        assert!((kpa - 6.89476).abs() < 1e-12);
        let psi = convert_pressure(1.0, PressureUnit::Bar, PressureUnit::Psig);
        assert!((psi - 1.0 / 0.0689476).abs() < 1e-9);
    }
}
