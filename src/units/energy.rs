use serde::{Deserialize, Serialize};

use super::{normalize_key, Unit};
use crate::constants::*;
use crate::gas::{divide_by_hhv, multiply_by_hhv};

/// 누적 에너지량 단위. 내부 기준은 Btu 이다.
///
/// 순간 출력(Btu/h 등)은 [`super::PowerUnit`] 이며 이 enum 과 섞지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyUnit {
    Btu,
    KilowattHour,
    TonHourCooling,
    Therm,
    Dekatherm,
    Mmbtu,
    /// 천 ft³ 가스. HHV 필요.
    Mcf,
    /// 증기 1,000 lb. 관례상 1 MMBtu.
    Mlb,
    GallonFuelOil,
    GallonDiesel,
}

impl Unit for EnergyUnit {
    const ALL: &'static [Self] = &[
        EnergyUnit::Btu,
        EnergyUnit::KilowattHour,
        EnergyUnit::TonHourCooling,
        EnergyUnit::Therm,
        EnergyUnit::Dekatherm,
        EnergyUnit::Mmbtu,
        EnergyUnit::Mcf,
        EnergyUnit::Mlb,
        EnergyUnit::GallonFuelOil,
        EnergyUnit::GallonDiesel,
    ];

    fn symbol(self) -> &'static str {
        match self {
            EnergyUnit::Btu => "Btu",
            EnergyUnit::KilowattHour => "kWh",
            EnergyUnit::TonHourCooling => "ton-hr",
            EnergyUnit::Therm => "therm",
            EnergyUnit::Dekatherm => "Dth",
            EnergyUnit::Mmbtu => "MMBtu",
            EnergyUnit::Mcf => "MCF",
            EnergyUnit::Mlb => "MLB",
            EnergyUnit::GallonFuelOil => "gal oil",
            EnergyUnit::GallonDiesel => "gal diesel",
        }
    }

    fn to_base(self, value: f64, hhv: f64) -> f64 {
        match self {
            EnergyUnit::Btu => value,
            EnergyUnit::KilowattHour => value * BTUH_PER_KW,
            EnergyUnit::TonHourCooling => value * BTUH_PER_TON,
            EnergyUnit::Therm => value * BTU_PER_THERM,
            EnergyUnit::Dekatherm => value * BTU_PER_DTH,
            EnergyUnit::Mmbtu => value * BTU_PER_MMBTU,
            EnergyUnit::Mcf => multiply_by_hhv(value, hhv) * BTU_PER_MMBTU,
            EnergyUnit::Mlb => value * BTU_PER_MLB,
            EnergyUnit::GallonFuelOil => value * BTU_PER_GAL_FUEL_OIL,
            EnergyUnit::GallonDiesel => value * BTU_PER_GAL_DIESEL,
        }
    }

    fn from_base(self, value: f64, hhv: f64) -> f64 {
        match self {
            EnergyUnit::Btu => value,
            EnergyUnit::KilowattHour => value / BTUH_PER_KW,
            EnergyUnit::TonHourCooling => value / BTUH_PER_TON,
            EnergyUnit::Therm => value / BTU_PER_THERM,
            EnergyUnit::Dekatherm => value / BTU_PER_DTH,
            EnergyUnit::Mmbtu => value / BTU_PER_MMBTU,
            EnergyUnit::Mcf => divide_by_hhv(value / BTU_PER_MMBTU, hhv),
            EnergyUnit::Mlb => value / BTU_PER_MLB,
            EnergyUnit::GallonFuelOil => value / BTU_PER_GAL_FUEL_OIL,
            EnergyUnit::GallonDiesel => value / BTU_PER_GAL_DIESEL,
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match normalize_key(key).as_str() {
            "btu" => Some(EnergyUnit::Btu),
            "kwh" => Some(EnergyUnit::KilowattHour),
            "ton-hr" | "tonhr" | "ton-hour" | "ton_hr" | "ton-hrs" => Some(EnergyUnit::TonHourCooling),
            "therm" | "therms" | "thm" => Some(EnergyUnit::Therm),
            "dth" | "dekatherm" | "decatherm" => Some(EnergyUnit::Dekatherm),
            "mmbtu" => Some(EnergyUnit::Mmbtu),
            "mcf" => Some(EnergyUnit::Mcf),
            "mlb" | "klb" => Some(EnergyUnit::Mlb),
            "galoil" | "gal-oil" | "gal_oil" | "fueloil" => Some(EnergyUnit::GallonFuelOil),
            "galdiesel" | "gal-diesel" | "gal_diesel" | "diesel" => Some(EnergyUnit::GallonDiesel),
            _ => None,
        }
    }
}

/// 에너지량을 변환한다.
pub fn convert_energy(value: f64, from: EnergyUnit, to: EnergyUnit, hhv: f64) -> f64 {
    super::convert(value, from, to, hhv)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HHV: f64 = DEFAULT_HHV_MMBTU_PER_MCF;

    #[test]
    fn billing_unit_anchors() {
        assert_eq!(EnergyUnit::Therm.to_base(1.0, HHV), 100_000.0);
        assert_eq!(EnergyUnit::Dekatherm.to_base(1.0, HHV), 1_000_000.0);
        assert_eq!(EnergyUnit::Mlb.to_base(1.0, HHV), 1_000_000.0);
        assert!((EnergyUnit::Mcf.to_base(1.0, HHV) - 1_035_000.0).abs() < 1e-6);
        assert_eq!(
            convert_energy(10.0, EnergyUnit::Therm, EnergyUnit::Dekatherm, HHV),
            1.0
        );
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(EnergyUnit::parse("Dth"), Some(EnergyUnit::Dekatherm));
        assert_eq!(EnergyUnit::parse(" kWh "), Some(EnergyUnit::KilowattHour));
        assert_eq!(EnergyUnit::parse("Therms"), Some(EnergyUnit::Therm));
        assert_eq!(EnergyUnit::parse("btu/hr"), None);
    }
}
