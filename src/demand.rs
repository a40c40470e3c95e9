//! 순간 수요(열량률) 환산기.
//!
//! 하나의 (값, 단위) 입력으로 모든 등가 열량률을 구하고, 운전 시간을 곱해 누적량을 낸다.
//! 입력값이 투입 연료 기준인지 공급(출력) 기준인지 명시하고 효율로 반대쪽을 계산한다.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::*;
use crate::efficiency::Efficiency;
use crate::quantity::PowerQuantity;
use crate::units::{EnergyUnit, PowerUnit, Unit};

/// 입력값이 나타내는 에너지 기준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyReference {
    /// 설비가 실제로 공급하는 출력
    #[default]
    Delivered,
    /// 구매/소비하는 연료 투입량
    InputFuel,
}

/// 공급 부하 규모 분류. 참고용이며 계산값에는 영향이 없다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Residential,
    Commercial,
    Industrial,
}

impl SizeClass {
    /// Btu/h 기준으로 분류한다. NaN 이면 None.
    pub fn classify(btuh: f64) -> Option<Self> {
        if btuh.is_nan() {
            None
        } else if btuh < RESIDENTIAL_LIMIT_BTUH {
            Some(SizeClass::Residential)
        } else if btuh <= COMMERCIAL_LIMIT_BTUH {
            Some(SizeClass::Commercial)
        } else {
            Some(SizeClass::Industrial)
        }
    }
}

/// 수요 계산 입력.
#[derive(Debug, Clone, Copy)]
pub struct DemandInput {
    pub value: f64,
    pub unit: PowerUnit,
    /// 가스 고위발열량 [MMBtu/MCF]
    pub hhv: f64,
    /// 운전 시간 [h]
    pub operating_hours: f64,
    pub reference: EnergyReference,
    pub efficiency: Efficiency,
}

impl Default for DemandInput {
    fn default() -> Self {
        Self {
            value: 0.0,
            unit: PowerUnit::BtuPerHour,
            hhv: DEFAULT_HHV_MMBTU_PER_MCF,
            operating_hours: 0.0,
            reference: EnergyReference::Delivered,
            efficiency: Efficiency::default(),
        }
    }
}

/// 하나의 열량률을 여러 단위로 나타낸 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateEquivalents {
    pub btu_per_hour: f64,
    pub kilowatts: f64,
    pub tons: f64,
    pub horsepower: f64,
    pub cfh: f64,
    pub mcf_per_hour: f64,
    pub therms_per_hour: f64,
    pub dth_per_hour: f64,
    pub mmbtu_per_hour: f64,
    /// 열량률 계열 단위로 입력했을 때만 제공한다.
    pub mlb_per_hour: Option<f64>,
    pub gallons_fuel_oil_per_hour: f64,
    pub gallons_diesel_per_hour: f64,
}

impl RateEquivalents {
    fn from_btuh(btuh: f64, hhv: f64, with_mlb: bool) -> Self {
        let to = |unit: PowerUnit| unit.from_base(btuh, hhv);
        Self {
            btu_per_hour: btuh,
            kilowatts: to(PowerUnit::Kilowatt),
            tons: to(PowerUnit::Ton),
            horsepower: to(PowerUnit::Horsepower),
            cfh: to(PowerUnit::Cfh),
            mcf_per_hour: to(PowerUnit::McfPerHour),
            therms_per_hour: to(PowerUnit::ThermPerHour),
            dth_per_hour: to(PowerUnit::DthPerHour),
            mmbtu_per_hour: to(PowerUnit::MmbtuPerHour),
            mlb_per_hour: with_mlb.then(|| to(PowerUnit::MlbPerHour)),
            gallons_fuel_oil_per_hour: to(PowerUnit::GallonFuelOilPerHour),
            gallons_diesel_per_hour: to(PowerUnit::GallonDieselPerHour),
        }
    }
}

/// 운전 시간 동안의 누적량.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccumulatedTotals {
    pub btu: f64,
    pub kwh: f64,
    pub ton_hours: f64,
    pub therms: f64,
    pub dth: f64,
    pub mmbtu: f64,
    pub mcf: f64,
    pub mlb: Option<f64>,
    pub gallons_fuel_oil: f64,
    pub gallons_diesel: f64,
}

impl AccumulatedTotals {
    fn from_rate(btuh: f64, hours: f64, hhv: f64, with_mlb: bool) -> Self {
        let btu = PowerQuantity::new(btuh, PowerUnit::BtuPerHour)
            .over_hours(hours, hhv)
            .value;
        let to = |unit: EnergyUnit| unit.from_base(btu, hhv);
        Self {
            btu,
            kwh: to(EnergyUnit::KilowattHour),
            ton_hours: to(EnergyUnit::TonHourCooling),
            therms: to(EnergyUnit::Therm),
            dth: to(EnergyUnit::Dekatherm),
            mmbtu: to(EnergyUnit::Mmbtu),
            mcf: to(EnergyUnit::Mcf),
            mlb: with_mlb.then(|| to(EnergyUnit::Mlb)),
            gallons_fuel_oil: to(EnergyUnit::GallonFuelOil),
            gallons_diesel: to(EnergyUnit::GallonDiesel),
        }
    }
}

/// 수요 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandResult {
    /// 공급(출력) 기준 열량률
    pub delivered: RateEquivalents,
    /// 투입 연료 기준 열량률
    pub input: RateEquivalents,
    pub delivered_totals: AccumulatedTotals,
    pub input_totals: AccumulatedTotals,
    /// 계산에 쓴 효율(정규화된 소수)
    pub efficiency: f64,
    pub size_class: Option<SizeClass>,
}

/// 입력 하나로 등가 열량률과 누적량을 계산한다.
pub fn compute_demand(input: DemandInput) -> DemandResult {
    let efficiency = input.efficiency.normalized();
    let given_btuh = input.unit.to_base(input.value, input.hhv);
    let (delivered_btuh, input_btuh) = match input.reference {
        EnergyReference::Delivered => (given_btuh, given_btuh / efficiency),
        EnergyReference::InputFuel => (given_btuh * efficiency, given_btuh),
    };
    let with_mlb = !input.unit.is_fuel_flow();
    trace!(
        unit = ?input.unit,
        delivered_btuh,
        input_btuh,
        efficiency,
        "demand computed"
    );

    DemandResult {
        delivered: RateEquivalents::from_btuh(delivered_btuh, input.hhv, with_mlb),
        input: RateEquivalents::from_btuh(input_btuh, input.hhv, with_mlb),
        delivered_totals: AccumulatedTotals::from_rate(
            delivered_btuh,
            input.operating_hours,
            input.hhv,
            with_mlb,
        ),
        input_totals: AccumulatedTotals::from_rate(
            input_btuh,
            input.operating_hours,
            input.hhv,
            with_mlb,
        ),
        efficiency,
        size_class: SizeClass::classify(delivered_btuh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: f64, unit: PowerUnit) -> DemandInput {
        DemandInput {
            value,
            unit,
            ..DemandInput::default()
        }
    }

    #[test]
    fn tons_expand_to_all_rates() {
        let res = compute_demand(input(3_000.0, PowerUnit::Ton));
        assert_eq!(res.delivered.btu_per_hour, 36_000_000.0);
        assert!((res.delivered.cfh - 34_782.6).abs() < 5.0);
        assert!((res.delivered.mcf_per_hour - 34.8).abs() < 0.5);
        assert!((res.delivered.mmbtu_per_hour - 36.0).abs() < 1e-12);
        assert!((res.delivered.dth_per_hour - 36.0).abs() < 1e-12);
        assert!((res.delivered.therms_per_hour - 360.0).abs() < 1e-9);
        assert_eq!(res.delivered.mlb_per_hour, Some(36.0));
        assert_eq!(res.size_class, Some(SizeClass::Industrial));
    }

    #[test]
    fn mlb_only_for_rate_family() {
        let res = compute_demand(input(1_000.0, PowerUnit::Cfh));
        assert_eq!(res.delivered.mlb_per_hour, None);
        assert_eq!(res.delivered_totals.mlb, None);
        let res = compute_demand(input(1.0, PowerUnit::MlbPerHour));
        assert_eq!(res.delivered.mlb_per_hour, Some(1.0));
    }

    #[test]
    fn hours_accumulate() {
        let res = compute_demand(DemandInput {
            operating_hours: 10.0,
            ..input(100.0, PowerUnit::Kilowatt)
        });
        assert!((res.delivered_totals.kwh - 1_000.0).abs() < 1e-9);
        assert!((res.delivered_totals.btu - 3_412_142.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_hours_zero_totals() {
        for hours in [0.0, -8.0] {
            let res = compute_demand(DemandInput {
                operating_hours: hours,
                ..input(100.0, PowerUnit::Kilowatt)
            });
            assert_eq!(res.delivered_totals.btu, 0.0);
            assert_eq!(res.input_totals.mcf, 0.0);
            assert_eq!(res.delivered_totals.mlb, Some(0.0));
        }
    }

    #[test]
    fn reference_and_efficiency() {
        let delivered = compute_demand(DemandInput {
            reference: EnergyReference::Delivered,
            efficiency: Efficiency::Percentage(80.0),
            ..input(800_000.0, PowerUnit::BtuPerHour)
        });
        assert!((delivered.input.btu_per_hour - 1_000_000.0).abs() < 1e-6);

        let fuel = compute_demand(DemandInput {
            reference: EnergyReference::InputFuel,
            efficiency: Efficiency::Percentage(80.0),
            ..input(1_000_000.0, PowerUnit::BtuPerHour)
        });
        assert!((fuel.delivered.btu_per_hour - 800_000.0).abs() < 1e-6);
        assert_eq!(fuel.size_class, Some(SizeClass::Commercial));
    }

    #[test]
    fn zero_efficiency_treated_as_unity() {
        let res = compute_demand(DemandInput {
            efficiency: Efficiency::Fraction(0.0),
            ..input(50_000.0, PowerUnit::BtuPerHour)
        });
        assert_eq!(res.efficiency, 1.0);
        assert_eq!(res.input.btu_per_hour, 50_000.0);
    }

    #[test]
    fn zero_hhv_gives_zero_gas_volume() {
        let res = compute_demand(DemandInput {
            hhv: 0.0,
            operating_hours: 5.0,
            ..input(1.0, PowerUnit::Ton)
        });
        assert_eq!(res.delivered.cfh, 0.0);
        assert_eq!(res.delivered_totals.mcf, 0.0);
        assert_eq!(res.delivered.btu_per_hour, 12_000.0);
    }

    #[test]
    fn negative_hhv_never_yields_negative_rates() {
        let res = compute_demand(DemandInput {
            hhv: -1.0,
            ..input(1_000.0, PowerUnit::Cfh)
        });
        assert_eq!(res.delivered.btu_per_hour, 0.0);
        assert_eq!(res.delivered.kilowatts, 0.0);
        assert_eq!(res.delivered.cfh, 0.0);
        assert_eq!(res.delivered_totals.mmbtu, 0.0);
    }

    #[test]
    fn size_thresholds() {
        assert_eq!(SizeClass::classify(299_999.0), Some(SizeClass::Residential));
        assert_eq!(SizeClass::classify(300_000.0), Some(SizeClass::Commercial));
        assert_eq!(SizeClass::classify(3_000_000.0), Some(SizeClass::Commercial));
        assert_eq!(SizeClass::classify(3_000_001.0), Some(SizeClass::Industrial));
        assert_eq!(SizeClass::classify(f64::NAN), None);
    }

    #[test]
    fn nan_value_propagates() {
        let res = compute_demand(input(f64::NAN, PowerUnit::Kilowatt));
        assert!(res.delivered.btu_per_hour.is_nan());
        assert!(res.input.cfh.is_nan());
        assert_eq!(res.size_class, None);
    }
}
