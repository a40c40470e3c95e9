//! 이종 에너지원의 공급 에너지 기준 비용/배출 비교.
//!
//! 모든 에너지원은 같은 공급 MMBtu(모델 사용량)를 기준으로 계산한다. 투입 기준과 공급
//! 기준 값을 섞어 비율을 내지 않는다.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::*;
use crate::efficiency::Efficiency;
use crate::emissions::{Emissions, EmissionsProfile, Fuel};
use crate::gas::mcf_to_mmbtu;

/// 요금 청구 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingUnit {
    Mcf,
    Therm,
    Dth,
    Mmbtu,
    Mlb,
    Kwh,
    GallonFuelOil,
    GallonDiesel,
    GallonPropane,
}

/// 청구 단위 환산에 필요한 상황 값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyContext {
    /// 가스 고위발열량 [MMBtu/MCF]
    pub hhv: f64,
}

impl Default for EnergyContext {
    fn default() -> Self {
        Self {
            hhv: DEFAULT_HHV_MMBTU_PER_MCF,
        }
    }
}

impl BillingUnit {
    pub const ALL: [BillingUnit; 9] = [
        BillingUnit::Mcf,
        BillingUnit::Therm,
        BillingUnit::Dth,
        BillingUnit::Mmbtu,
        BillingUnit::Mlb,
        BillingUnit::Kwh,
        BillingUnit::GallonFuelOil,
        BillingUnit::GallonDiesel,
        BillingUnit::GallonPropane,
    ];

    /// 청구 단위 수량을 MMBtu 로 환산한다.
    pub fn to_mmbtu(self, value: f64, ctx: &EnergyContext) -> f64 {
        match self {
            BillingUnit::Mcf => mcf_to_mmbtu(value, ctx.hhv),
            BillingUnit::Therm => value * BTU_PER_THERM / BTU_PER_MMBTU,
            BillingUnit::Dth => value * BTU_PER_DTH / BTU_PER_MMBTU,
            BillingUnit::Mmbtu => value,
            BillingUnit::Mlb => value * BTU_PER_MLB / BTU_PER_MMBTU,
            BillingUnit::Kwh => value * BTUH_PER_KW / BTU_PER_MMBTU,
            BillingUnit::GallonFuelOil => value * BTU_PER_GAL_FUEL_OIL / BTU_PER_MMBTU,
            BillingUnit::GallonDiesel => value * BTU_PER_GAL_DIESEL / BTU_PER_MMBTU,
            BillingUnit::GallonPropane => value * BTU_PER_GAL_PROPANE / BTU_PER_MMBTU,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BillingUnit::Mcf => "MCF",
            BillingUnit::Therm => "therm",
            BillingUnit::Dth => "Dth",
            BillingUnit::Mmbtu => "MMBtu",
            BillingUnit::Mlb => "MLB",
            BillingUnit::Kwh => "kWh",
            BillingUnit::GallonFuelOil => "gal oil",
            BillingUnit::GallonDiesel => "gal diesel",
            BillingUnit::GallonPropane => "gal propane",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown billing unit: {0}")]
pub struct UnknownBillingUnit(pub String);

impl FromStr for BillingUnit {
    type Err = UnknownBillingUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "mcf" => Ok(BillingUnit::Mcf),
            "therm" | "therms" => Ok(BillingUnit::Therm),
            "dth" | "dekatherm" => Ok(BillingUnit::Dth),
            "mmbtu" => Ok(BillingUnit::Mmbtu),
            "mlb" | "klb" => Ok(BillingUnit::Mlb),
            "kwh" => Ok(BillingUnit::Kwh),
            "galoil" | "gallonfueloil" | "fueloil" => Ok(BillingUnit::GallonFuelOil),
            "galdiesel" | "gallondiesel" | "diesel" => Ok(BillingUnit::GallonDiesel),
            "galpropane" | "gallonpropane" | "propane" => Ok(BillingUnit::GallonPropane),
            _ => Err(UnknownBillingUnit(s.to_string())),
        }
    }
}

/// 비교 대상 에너지원.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySource {
    pub name: String,
    /// 청구 단가 [통화/청구단위]
    pub rate: f64,
    pub billing_unit: BillingUnit,
    pub efficiency: Efficiency,
    pub emissions: EmissionsProfile,
}

/// 모든 에너지원이 공유하는 공급 에너지 사용량.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeledUsage {
    pub value: f64,
    pub unit: BillingUnit,
}

/// 에너지원 하나의 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub efficiency: f64,
    /// 효율 적용 전 MMBtu 당 구매 단가
    pub rate_per_mmbtu: f64,
    pub input_mmbtu: f64,
    pub delivered_mmbtu: f64,
    pub total_cost: f64,
    pub cost_per_delivered_mmbtu: f64,
    pub emissions: Emissions,
}

/// 두 에너지원의 상대 비교.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub baseline: String,
    pub alternative: String,
    /// 대안 / 기준 (공급 MMBtu 당 비용). 기준이 0 이거나 유한하지 않으면 NaN.
    pub ratio: f64,
    /// 기준 총비용 - 대안 총비용. 양수면 대안이 저렴하다.
    pub savings: f64,
}

/// 절감 방향.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Savings {
    AlternativeCheaper(f64),
    BaselineCheaper(f64),
    Even,
    Undefined,
}

impl PairwiseComparison {
    pub fn verdict(&self) -> Savings {
        if !self.savings.is_finite() {
            Savings::Undefined
        } else if self.savings > 0.0 {
            Savings::AlternativeCheaper(self.savings)
        } else if self.savings < 0.0 {
            Savings::BaselineCheaper(-self.savings)
        } else {
            Savings::Even
        }
    }
}

/// 비교 결과 전체.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub delivered_mmbtu: f64,
    pub sources: Vec<SourceSummary>,
}

impl Comparison {
    /// `sources[baseline]` 대비 `sources[alternative]`.
    pub fn pairwise(&self, baseline: usize, alternative: usize) -> Option<PairwiseComparison> {
        let a = self.sources.get(baseline)?;
        let b = self.sources.get(alternative)?;
        Some(relative(a, b))
    }

    /// 공급 MMBtu 당 비용이 가장 낮은 에너지원. 유한한 값만 본다.
    pub fn cheapest(&self) -> Option<&SourceSummary> {
        self.sources
            .iter()
            .filter(|s| s.cost_per_delivered_mmbtu.is_finite())
            .min_by(|a, b| a.cost_per_delivered_mmbtu.total_cmp(&b.cost_per_delivered_mmbtu))
    }
}

/// 공급 에너지량 하나에 대해 에너지원 비용/배출을 계산한다.
pub fn summarize_source(
    source: &EnergySource,
    delivered_mmbtu: f64,
    ctx: &EnergyContext,
) -> SourceSummary {
    let mmbtu_per_unit = source.billing_unit.to_mmbtu(1.0, ctx);
    let rate_per_mmbtu = if mmbtu_per_unit.is_finite() && mmbtu_per_unit > 0.0 {
        source.rate / mmbtu_per_unit
    } else {
        debug!(unit = ?source.billing_unit, mmbtu_per_unit, "billing unit has no energy content");
        f64::NAN
    };
    let efficiency = source.efficiency.normalized();
    let input_mmbtu = delivered_mmbtu / efficiency;
    let total_cost = rate_per_mmbtu * input_mmbtu;
    let cost_per_delivered_mmbtu = if delivered_mmbtu == 0.0 {
        0.0
    } else {
        total_cost / delivered_mmbtu
    };
    SourceSummary {
        name: source.name.clone(),
        efficiency,
        rate_per_mmbtu,
        input_mmbtu,
        delivered_mmbtu,
        total_cost,
        cost_per_delivered_mmbtu,
        emissions: Emissions::from_input(input_mmbtu, &source.emissions),
    }
}

/// 공유 사용량을 한 번만 MMBtu 로 바꾼 뒤 모든 에너지원에 같은 값을 적용한다.
pub fn compare_sources(
    sources: &[EnergySource],
    usage: ModeledUsage,
    ctx: &EnergyContext,
) -> Comparison {
    let delivered_mmbtu = usage.unit.to_mmbtu(usage.value, ctx);
    let sources = sources
        .iter()
        .map(|s| summarize_source(s, delivered_mmbtu, ctx))
        .collect();
    Comparison {
        delivered_mmbtu,
        sources,
    }
}

/// `b` 가 `a` 대비 몇 배 비용인지와 절감액.
pub fn relative(a: &SourceSummary, b: &SourceSummary) -> PairwiseComparison {
    let base = a.cost_per_delivered_mmbtu;
    let ratio = if base.is_finite() && base != 0.0 {
        b.cost_per_delivered_mmbtu / base
    } else {
        f64::NAN
    };
    PairwiseComparison {
        baseline: a.name.clone(),
        alternative: b.name.clone(),
        ratio,
        savings: a.total_cost - b.total_cost,
    }
}

/// 비교 시나리오 파일 오류.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("scenario has no energy sources")]
    Empty,
}

/// TOML 시나리오의 에너지원 항목.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub rate: f64,
    pub billing_unit: BillingUnit,
    #[serde(default)]
    pub efficiency: Efficiency,
    pub fuel: Fuel,
    /// 전력망 탄소집약도 [lb/MWh]
    #[serde(default)]
    pub grid_intensity_lb_per_mwh: Option<f64>,
    /// 기본 계수 대신 쓸 CO2e 계수 [lb/MMBtu]
    #[serde(default)]
    pub co2e_lb_per_mmbtu: Option<f64>,
}

impl SourceSpec {
    pub fn into_source(self) -> EnergySource {
        let mut emissions = EmissionsProfile::for_fuel(self.fuel, self.grid_intensity_lb_per_mwh);
        if let Some(co2e) = self.co2e_lb_per_mmbtu {
            emissions = match emissions {
                EmissionsProfile::Combustion(mut f) => {
                    f.co2e_lb_per_mmbtu = co2e;
                    EmissionsProfile::Combustion(f)
                }
                _ => EmissionsProfile::Grid {
                    co2e_lb_per_mmbtu: co2e,
                },
            };
        }
        EnergySource {
            name: self.name,
            rate: self.rate,
            billing_unit: self.billing_unit,
            efficiency: self.efficiency,
            emissions,
        }
    }
}

/// 비교 시나리오.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub usage: ModeledUsage,
    /// 가스 고위발열량 [MMBtu/MCF]
    #[serde(default = "default_hhv")]
    pub hhv: f64,
    pub sources: Vec<SourceSpec>,
}

fn default_hhv() -> f64 {
    DEFAULT_HHV_MMBTU_PER_MCF
}

impl Scenario {
    pub fn from_toml_str(src: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(src)?;
        if scenario.sources.is_empty() {
            return Err(ScenarioError::Empty);
        }
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 시나리오를 계산한다.
    pub fn run(&self) -> Comparison {
        let ctx = EnergyContext { hhv: self.hhv };
        let sources: Vec<EnergySource> = self
            .sources
            .iter()
            .cloned()
            .map(SourceSpec::into_source)
            .collect();
        let comparison = compare_sources(&sources, self.usage, &ctx);
        info!(
            sources = comparison.sources.len(),
            delivered_mmbtu = comparison.delivered_mmbtu,
            "scenario compared"
        );
        comparison
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, rate: f64, unit: BillingUnit, eff: Efficiency) -> EnergySource {
        EnergySource {
            name: name.to_string(),
            rate,
            billing_unit: unit,
            efficiency: eff,
            emissions: EmissionsProfile::for_fuel(Fuel::NaturalGas, None),
        }
    }

    #[test]
    fn billing_units_to_mmbtu() {
        let ctx = EnergyContext::default();
        assert!((BillingUnit::Therm.to_mmbtu(10.0, &ctx) - 1.0).abs() < 1e-12);
        assert!((BillingUnit::Mcf.to_mmbtu(1.0, &ctx) - 1.035).abs() < 1e-12);
        assert!((BillingUnit::Kwh.to_mmbtu(1_000.0, &ctx) - 3.412142).abs() < 1e-12);
        assert_eq!(BillingUnit::Mlb.to_mmbtu(2.0, &ctx), 2.0);
    }

    #[test]
    fn derivation_steps() {
        let ctx = EnergyContext::default();
        let gas = source("gas", 1.0, BillingUnit::Therm, Efficiency::Percentage(80.0));
        let s = summarize_source(&gas, 100.0, &ctx);
        assert!((s.rate_per_mmbtu - 10.0).abs() < 1e-9);
        assert!((s.input_mmbtu - 125.0).abs() < 1e-9);
        assert!((s.total_cost - 1_250.0).abs() < 1e-6);
        assert!((s.cost_per_delivered_mmbtu - 12.5).abs() < 1e-9);
        assert!((s.emissions.co2e_lb - 125.0 * 117.0).abs() < 1e-6);
    }

    #[test]
    fn equal_inputs_equal_cost() {
        let ctx = EnergyContext::default();
        let a = source("a", 1.0, BillingUnit::Therm, Efficiency::Fraction(0.9));
        let b = source("b", 10.0, BillingUnit::Dth, Efficiency::Fraction(0.9));
        let usage = ModeledUsage {
            value: 500.0,
            unit: BillingUnit::Therm,
        };
        let cmp = compare_sources(&[a, b], usage, &ctx);
        let (x, y) = (&cmp.sources[0], &cmp.sources[1]);
        assert!((x.cost_per_delivered_mmbtu - y.cost_per_delivered_mmbtu).abs() < 1e-9);
        let pair = cmp.pairwise(0, 1).unwrap();
        assert!((pair.ratio - 1.0).abs() < 1e-12);
        assert!(matches!(pair.verdict(), Savings::Even) || pair.savings.abs() < 1e-9);
    }

    #[test]
    fn double_efficiency_halves_input() {
        let ctx = EnergyContext::default();
        let a = source("a", 1.0, BillingUnit::Therm, Efficiency::Fraction(0.4));
        let b = source("b", 1.0, BillingUnit::Therm, Efficiency::Fraction(0.8));
        let usage = ModeledUsage {
            value: 10.0,
            unit: BillingUnit::Mmbtu,
        };
        let cmp = compare_sources(&[a, b], usage, &ctx);
        assert_eq!(cmp.sources[1].input_mmbtu * 2.0, cmp.sources[0].input_mmbtu);
        let pair = cmp.pairwise(0, 1).unwrap();
        assert!((pair.ratio - 0.5).abs() < 1e-12);
        assert!(matches!(pair.verdict(), Savings::AlternativeCheaper(_)));
    }

    #[test]
    fn zero_delivered_and_zero_baseline() {
        let ctx = EnergyContext::default();
        let free = source("free", 0.0, BillingUnit::Therm, Efficiency::default());
        let paid = source("paid", 1.0, BillingUnit::Therm, Efficiency::default());
        let none = ModeledUsage {
            value: 0.0,
            unit: BillingUnit::Therm,
        };
        let cmp = compare_sources(&[paid.clone()], none, &ctx);
        assert_eq!(cmp.sources[0].cost_per_delivered_mmbtu, 0.0);

        let usage = ModeledUsage {
            value: 1.0,
            unit: BillingUnit::Mmbtu,
        };
        let cmp = compare_sources(&[free, paid], usage, &ctx);
        let pair = cmp.pairwise(0, 1).unwrap();
        assert!(pair.ratio.is_nan());
        assert!(cmp.pairwise(0, 5).is_none());
    }

    #[test]
    fn zero_hhv_makes_gas_rate_undefined() {
        let ctx = EnergyContext { hhv: 0.0 };
        let gas = source("gas", 8.0, BillingUnit::Mcf, Efficiency::default());
        let s = summarize_source(&gas, 1.0, &ctx);
        assert!(s.rate_per_mmbtu.is_nan());
        assert!(s.total_cost.is_nan());
    }

    #[test]
    fn cheapest_skips_nan() {
        let ctx = EnergyContext { hhv: 0.0 };
        let gas = source("gas", 8.0, BillingUnit::Mcf, Efficiency::default());
        let elec = source("elec", 0.1, BillingUnit::Kwh, Efficiency::Cop(3.0));
        let usage = ModeledUsage {
            value: 1.0,
            unit: BillingUnit::Mmbtu,
        };
        let cmp = compare_sources(&[gas, elec], usage, &ctx);
        assert_eq!(cmp.cheapest().map(|s| s.name.as_str()), Some("elec"));
    }

    #[test]
    fn scenario_from_toml() {
        let src = r#"
            hhv = 1.035

            [usage]
            value = 1000.0
            unit = "therm"

            [[sources]]
            name = "Gas furnace"
            rate = 1.25
            billing_unit = "therm"
            efficiency = "95%"
            fuel = "natural_gas"

            [[sources]]
            name = "Heat pump"
            rate = 0.16
            billing_unit = "kwh"
            efficiency = "cop:3"
            fuel = "electricity"
            grid_intensity_lb_per_mwh = 850.0
        "#;
        let scenario = Scenario::from_toml_str(src).unwrap();
        let cmp = scenario.run();
        assert_eq!(cmp.sources.len(), 2);
        assert!((cmp.delivered_mmbtu - 100.0).abs() < 1e-9);
        let hp = &cmp.sources[1];
        assert!((hp.efficiency - 3.0).abs() < 1e-12);
        assert_eq!(hp.emissions.nox_lb, 0.0);
        assert!(hp.emissions.co2e_lb > 0.0);
    }

    #[test]
    fn empty_scenario_rejected() {
        let src = r#"
            sources = []
            [usage]
            value = 1.0
            unit = "mmbtu"
        "#;
        assert!(matches!(Scenario::from_toml_str(src), Err(ScenarioError::Empty)));
    }

    #[test]
    fn billing_unit_keys() {
        assert_eq!("Therms".parse::<BillingUnit>().unwrap(), BillingUnit::Therm);
        assert_eq!("gal_propane".parse::<BillingUnit>().unwrap(), BillingUnit::GallonPropane);
        assert!("barrel".parse::<BillingUnit>().is_err());
    }
}
