use serde::{Deserialize, Serialize};

use super::{normalize_key, Unit};
use crate::constants::*;
use crate::gas::{btuh_to_cfh, cfh_to_btuh};

/// 순간 출력(열량률) 단위. 내부 기준은 Btu/h 이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUnit {
    BtuPerHour,
    /// 1,000 Btu/h
    Mbh,
    Kilowatt,
    /// 냉동톤
    Ton,
    Horsepower,
    ThermPerHour,
    DthPerHour,
    MmbtuPerHour,
    /// 증기 1,000 lb/h
    MlbPerHour,
    /// 가스 체적 유량 [ft³/h]. HHV 필요.
    Cfh,
    /// 가스 체적 유량 [MCF/h]. HHV 필요.
    McfPerHour,
    GallonFuelOilPerHour,
    GallonDieselPerHour,
}

impl PowerUnit {
    /// 연료 체적 유량 단위(CFH, MCF/h, gal/h) 여부.
    /// 이 단위들은 열량률 계열이 아니므로 MLB/h 환산을 제공하지 않는다.
    pub fn is_fuel_flow(self) -> bool {
        matches!(
            self,
            PowerUnit::Cfh
                | PowerUnit::McfPerHour
                | PowerUnit::GallonFuelOilPerHour
                | PowerUnit::GallonDieselPerHour
        )
    }
}

impl Unit for PowerUnit {
    const ALL: &'static [Self] = &[
        PowerUnit::BtuPerHour,
        PowerUnit::Mbh,
        PowerUnit::Kilowatt,
        PowerUnit::Ton,
        PowerUnit::Horsepower,
        PowerUnit::ThermPerHour,
        PowerUnit::DthPerHour,
        PowerUnit::MmbtuPerHour,
        PowerUnit::MlbPerHour,
        PowerUnit::Cfh,
        PowerUnit::McfPerHour,
        PowerUnit::GallonFuelOilPerHour,
        PowerUnit::GallonDieselPerHour,
    ];

    fn symbol(self) -> &'static str {
        match self {
            PowerUnit::BtuPerHour => "Btu/h",
            PowerUnit::Mbh => "MBH",
            PowerUnit::Kilowatt => "kW",
            PowerUnit::Ton => "ton",
            PowerUnit::Horsepower => "HP",
            PowerUnit::ThermPerHour => "therm/h",
            PowerUnit::DthPerHour => "Dth/h",
            PowerUnit::MmbtuPerHour => "MMBtu/h",
            PowerUnit::MlbPerHour => "MLB/h",
            PowerUnit::Cfh => "CFH",
            PowerUnit::McfPerHour => "MCF/h",
            PowerUnit::GallonFuelOilPerHour => "gal oil/h",
            PowerUnit::GallonDieselPerHour => "gal diesel/h",
        }
    }

    fn to_base(self, value: f64, hhv: f64) -> f64 {
        match self {
            PowerUnit::BtuPerHour => value,
            PowerUnit::Mbh => value * BTUH_PER_MBH,
            PowerUnit::Kilowatt => value * BTUH_PER_KW,
            PowerUnit::Ton => value * BTUH_PER_TON,
            PowerUnit::Horsepower => value * BTUH_PER_HP,
            PowerUnit::ThermPerHour => value * BTU_PER_THERM,
            PowerUnit::DthPerHour => value * BTU_PER_DTH,
            PowerUnit::MmbtuPerHour => value * BTU_PER_MMBTU,
            PowerUnit::MlbPerHour => value * BTU_PER_MLB,
            PowerUnit::Cfh => cfh_to_btuh(value, hhv),
            PowerUnit::McfPerHour => cfh_to_btuh(value * CF_PER_MCF, hhv),
            PowerUnit::GallonFuelOilPerHour => value * BTU_PER_GAL_FUEL_OIL,
            PowerUnit::GallonDieselPerHour => value * BTU_PER_GAL_DIESEL,
        }
    }

    fn from_base(self, value: f64, hhv: f64) -> f64 {
        match self {
            PowerUnit::BtuPerHour => value,
            PowerUnit::Mbh => value / BTUH_PER_MBH,
            PowerUnit::Kilowatt => value / BTUH_PER_KW,
            PowerUnit::Ton => value / BTUH_PER_TON,
            PowerUnit::Horsepower => value / BTUH_PER_HP,
            PowerUnit::ThermPerHour => value / BTU_PER_THERM,
            PowerUnit::DthPerHour => value / BTU_PER_DTH,
            PowerUnit::MmbtuPerHour => value / BTU_PER_MMBTU,
            PowerUnit::MlbPerHour => value / BTU_PER_MLB,
            PowerUnit::Cfh => btuh_to_cfh(value, hhv),
            PowerUnit::McfPerHour => btuh_to_cfh(value, hhv) / CF_PER_MCF,
            PowerUnit::GallonFuelOilPerHour => value / BTU_PER_GAL_FUEL_OIL,
            PowerUnit::GallonDieselPerHour => value / BTU_PER_GAL_DIESEL,
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match normalize_key(key).as_str() {
            "btu/h" | "btu/hr" | "btuh" | "btu/hour" => Some(PowerUnit::BtuPerHour),
            "mbh" | "kbtu/h" | "kbtu/hr" => Some(PowerUnit::Mbh),
            "kw" => Some(PowerUnit::Kilowatt),
            "ton" | "tons" | "tr" => Some(PowerUnit::Ton),
            "hp" | "horsepower" => Some(PowerUnit::Horsepower),
            "therm/h" | "therm/hr" | "therms/hr" => Some(PowerUnit::ThermPerHour),
            "dth/h" | "dth/hr" => Some(PowerUnit::DthPerHour),
            "mmbtu/h" | "mmbtu/hr" | "mmbtuh" => Some(PowerUnit::MmbtuPerHour),
            "mlb/h" | "mlb/hr" | "klb/hr" => Some(PowerUnit::MlbPerHour),
            "cfh" | "ft3/h" | "cf/h" => Some(PowerUnit::Cfh),
            "mcf/h" | "mcf/hr" | "mcfh" => Some(PowerUnit::McfPerHour),
            "galoil/h" | "galoil/hr" | "gph-oil" => Some(PowerUnit::GallonFuelOilPerHour),
            "galdiesel/h" | "galdiesel/hr" | "gph-diesel" => Some(PowerUnit::GallonDieselPerHour),
            _ => None,
        }
    }
}

/// 출력(열량률)을 변환한다.
pub fn convert_power(value: f64, from: PowerUnit, to: PowerUnit, hhv: f64) -> f64 {
    super::convert(value, from, to, hhv)
}
