use serde::{Deserialize, Serialize};

use super::{normalize_key, Unit};
use crate::constants::{CF_PER_M3, CF_PER_MCF};

/// 가스 체적 유량 단위. 내부 기준은 CFH(ft³/h)이다. 발열량과 무관하다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowUnit {
    Cfh,
    Cfm,
    McfPerHour,
    McfPerDay,
    CubicMeterPerHour,
}

impl Unit for FlowUnit {
    const ALL: &'static [Self] = &[
        FlowUnit::Cfh,
        FlowUnit::Cfm,
        FlowUnit::McfPerHour,
        FlowUnit::McfPerDay,
        FlowUnit::CubicMeterPerHour,
    ];

    fn symbol(self) -> &'static str {
        match self {
            FlowUnit::Cfh => "CFH",
            FlowUnit::Cfm => "CFM",
            FlowUnit::McfPerHour => "MCF/h",
            FlowUnit::McfPerDay => "MCF/d",
            FlowUnit::CubicMeterPerHour => "m3/h",
        }
    }

    fn to_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            FlowUnit::Cfh => value,
            FlowUnit::Cfm => value * 60.0,
            FlowUnit::McfPerHour => value * CF_PER_MCF,
            FlowUnit::McfPerDay => value * CF_PER_MCF / 24.0,
            FlowUnit::CubicMeterPerHour => value * CF_PER_M3,
        }
    }

    fn from_base(self, value: f64, _hhv: f64) -> f64 {
        match self {
            FlowUnit::Cfh => value,
            FlowUnit::Cfm => value / 60.0,
            FlowUnit::McfPerHour => value / CF_PER_MCF,
            FlowUnit::McfPerDay => value * 24.0 / CF_PER_MCF,
            FlowUnit::CubicMeterPerHour => value / CF_PER_M3,
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match normalize_key(key).as_str() {
            "cfh" | "ft3/h" | "cf/h" => Some(FlowUnit::Cfh),
            "cfm" | "ft3/min" => Some(FlowUnit::Cfm),
            "mcf/h" | "mcf/hr" | "mcfh" => Some(FlowUnit::McfPerHour),
            "mcf/d" | "mcf/day" | "mcfd" => Some(FlowUnit::McfPerDay),
            "m3/h" | "m3/hr" | "m^3/h" | "cmh" => Some(FlowUnit::CubicMeterPerHour),
            _ => None,
        }
    }
}

/// 체적 유량을 변환한다.
pub fn convert_flow(value: f64, from: FlowUnit, to: FlowUnit) -> f64 {
    super::convert(value, from, to, f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_and_hourly_mcf() {
        let cfh = convert_flow(24.0, FlowUnit::McfPerDay, FlowUnit::Cfh);
        assert!((cfh - 1_000.0).abs() < 1e-9);
        assert!((convert_flow(1.0, FlowUnit::Cfm, FlowUnit::Cfh) - 60.0).abs() < 1e-12);
    }
}
