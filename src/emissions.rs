//! 연료별 배출계수와 배출량 계산.
//!
//! 계수는 투입 연료 1 MMBtu 당 lb 이다. 전력망 탄소집약도는 지역마다 달라 외부에서 받는다.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::BTUH_PER_KW;

/// 투입 연료 MMBtu 당 배출계수 [lb/MMBtu].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub co2e_lb_per_mmbtu: f64,
    pub nox_lb_per_mmbtu: f64,
    pub sox_lb_per_mmbtu: f64,
}

/// 연료 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fuel {
    NaturalGas,
    Propane,
    FuelOil,
    Diesel,
    Electricity,
    /// 지역난방 증기. 공급처마다 달라 기본 계수가 없다.
    Steam,
}

impl Fuel {
    /// 연소 연료의 기본 배출계수. 전력/증기는 외부 값이 필요하므로 None.
    pub fn default_factors(self) -> Option<EmissionFactors> {
        let (co2e, nox, sox) = match self {
            Fuel::NaturalGas => (117.0, 0.092, 0.0006),
            Fuel::Propane => (139.0, 0.142, 0.0),
            Fuel::FuelOil | Fuel::Diesel => (163.5, 0.143, 0.0015),
            Fuel::Electricity | Fuel::Steam => return None,
        };
        Some(EmissionFactors {
            co2e_lb_per_mmbtu: co2e,
            nox_lb_per_mmbtu: nox,
            sox_lb_per_mmbtu: sox,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown fuel: {0}")]
pub struct UnknownFuel(pub String);

impl FromStr for Fuel {
    type Err = UnknownFuel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "natural_gas" | "gas" | "ng" => Ok(Fuel::NaturalGas),
            "propane" | "lpg" => Ok(Fuel::Propane),
            "fuel_oil" | "oil" | "heating_oil" => Ok(Fuel::FuelOil),
            "diesel" => Ok(Fuel::Diesel),
            "electricity" | "electric" | "grid" => Ok(Fuel::Electricity),
            "steam" => Ok(Fuel::Steam),
            _ => Err(UnknownFuel(s.to_string())),
        }
    }
}

/// 에너지원의 배출 특성.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmissionsProfile {
    /// 고정 연소 계수
    Combustion(EmissionFactors),
    /// 전력망. CO2e 만 다루고 NOx/SOx 는 0 으로 본다.
    Grid { co2e_lb_per_mmbtu: f64 },
    /// 배출 정보 없음
    Unknown,
}

impl EmissionsProfile {
    /// 전력망 탄소집약도 [lb/MWh] 를 투입 MMBtu 기준으로 바꾼다.
    pub fn grid_from_lb_per_mwh(lb_per_mwh: f64) -> Self {
        // 1 MWh = 3.412142 MMBtu
        let mmbtu_per_mwh = BTUH_PER_KW * 1_000.0 / 1_000_000.0;
        EmissionsProfile::Grid {
            co2e_lb_per_mmbtu: lb_per_mwh / mmbtu_per_mwh,
        }
    }

    /// 연료의 기본 프로파일. 전력은 `grid_lb_per_mwh` 가 있어야 한다.
    pub fn for_fuel(fuel: Fuel, grid_lb_per_mwh: Option<f64>) -> Self {
        match (fuel, fuel.default_factors(), grid_lb_per_mwh) {
            (_, Some(factors), _) => EmissionsProfile::Combustion(factors),
            (Fuel::Electricity, None, Some(intensity)) => Self::grid_from_lb_per_mwh(intensity),
            _ => EmissionsProfile::Unknown,
        }
    }

    pub fn factors(&self) -> EmissionFactors {
        match *self {
            EmissionsProfile::Combustion(f) => f,
            EmissionsProfile::Grid { co2e_lb_per_mmbtu } => EmissionFactors {
                co2e_lb_per_mmbtu,
                ..EmissionFactors::default()
            },
            EmissionsProfile::Unknown => EmissionFactors::default(),
        }
    }
}

/// 배출량 [lb].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Emissions {
    pub co2e_lb: f64,
    pub nox_lb: f64,
    pub sox_lb: f64,
}

impl Emissions {
    /// 투입 연료량 [MMBtu] 에 계수를 곱한다.
    pub fn from_input(input_mmbtu: f64, profile: &EmissionsProfile) -> Self {
        let f = profile.factors();
        Self {
            co2e_lb: input_mmbtu * f.co2e_lb_per_mmbtu,
            nox_lb: input_mmbtu * f.nox_lb_per_mmbtu,
            sox_lb: input_mmbtu * f.sox_lb_per_mmbtu,
        }
    }
}
