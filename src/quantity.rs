use serde::{Deserialize, Serialize};

use crate::units::{EnergyUnit, PowerUnit, Unit};

/// 다루는 변환 분류를 나타낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionCategory {
    Energy,
    Power,
    Temperature,
    Flow,
    Pressure,
}

impl ConversionCategory {
    pub const ALL: [ConversionCategory; 5] = [
        ConversionCategory::Energy,
        ConversionCategory::Power,
        ConversionCategory::Temperature,
        ConversionCategory::Flow,
        ConversionCategory::Pressure,
    ];
}

/// 단위가 붙은 값.
///
/// 순간 출력(`Quantity<PowerUnit>`)과 누적량(`Quantity<EnergyUnit>`)은 타입이 달라
/// 서로 섞이지 않는다. 둘 사이는 운전 시간을 명시한 [`Quantity::over_hours`] 로만 오간다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity<U> {
    pub value: f64,
    pub unit: U,
}

pub type EnergyQuantity = Quantity<EnergyUnit>;
pub type PowerQuantity = Quantity<PowerUnit>;

impl<U: Unit> Quantity<U> {
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }

    /// 기준 단위로 환산한 값.
    pub fn base_value(self, hhv: f64) -> f64 {
        self.unit.to_base(self.value, hhv)
    }

    /// 같은 분류의 다른 단위로 환산한다.
    pub fn to(self, unit: U, hhv: f64) -> Self {
        Self {
            value: unit.from_base(self.base_value(hhv), hhv),
            unit,
        }
    }
}

impl PowerQuantity {
    /// 출력에 운전 시간을 곱해 누적 에너지량 [Btu] 을 구한다.
    /// 시간이 0 이하이면 0, NaN 이면 NaN.
    pub fn over_hours(self, hours: f64, hhv: f64) -> EnergyQuantity {
        let btu = if hours.is_nan() {
            f64::NAN
        } else if hours <= 0.0 {
            0.0
        } else {
            self.base_value(hhv) * hours
        };
        EnergyQuantity::new(btu, EnergyUnit::Btu)
    }
}
