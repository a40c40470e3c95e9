use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::DEFAULT_HHV_MMBTU_PER_MCF;
use crate::gas::HeatingValue;
use crate::load::Vintage;
use crate::units::*;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 각 범주별 기본 단위 설정을 담는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultUnits {
    pub energy: EnergyUnit,
    pub power: PowerUnit,
    pub temperature: TemperatureUnit,
    pub flow: FlowUnit,
    pub pressure: PressureUnit,
}

impl Default for DefaultUnits {
    fn default() -> Self {
        Self {
            energy: EnergyUnit::Mmbtu,
            power: PowerUnit::BtuPerHour,
            temperature: TemperatureUnit::Fahrenheit,
            flow: FlowUnit::Cfh,
            pressure: PressureUnit::Psig,
        }
    }
}

/// 천연가스 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSettings {
    /// 고위발열량 [MMBtu/MCF]. 원시 값 그대로 보관하고 사용할 때 검증한다.
    pub hhv_mmbtu_per_mcf: f64,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            hhv_mmbtu_per_mcf: DEFAULT_HHV_MMBTU_PER_MCF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub decimals: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    pub vintage: Vintage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandSettings {
    /// 누적량 계산 기본 운전 시간 [h]
    pub operating_hours: f64,
}

impl Default for DemandSettings {
    fn default() -> Self {
        Self {
            operating_hours: 1.0,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `auto`, `ko`, `en`
    pub language: String,
    pub gas: GasSettings,
    pub display: DisplaySettings,
    pub default_units: DefaultUnits,
    pub load: LoadSettings,
    pub demand: DemandSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            gas: GasSettings::default(),
            display: DisplaySettings::default(),
            default_units: DefaultUnits::default(),
            load: LoadSettings::default(),
            demand: DemandSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 읽기만 한다. 파일이 없으면 기본 설정을 돌려주고 디스크에는 쓰지 않는다.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "config not found, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&content)?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 만들어 저장한다.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);
    if path.exists() {
        load(&path)
    } else {
        let cfg = Config::default();
        info!(path = %path.display(), "config not found, writing defaults");
        cfg.save_to(&path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 검증된 고위발열량. 잘못된 값이면 기본값.
    pub fn hhv(&self) -> HeatingValue {
        HeatingValue::or_default(self.gas.hhv_mmbtu_per_mcf)
    }

    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
