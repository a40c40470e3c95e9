//! 천연가스 발열량(HHV) 기반 체적 <-> 에너지 변환.
//!
//! HHV 가 양의 유한값이 아니면 두 방향(체적 <-> 에너지) 모두 0 을 반환한다.
//! 입력값이나 HHV 가 NaN 이면 NaN 을 전파한다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BTU_PER_MMBTU, CF_PER_MCF, DEFAULT_HHV_MMBTU_PER_MCF};

/// 가스 고위발열량 [MMBtu/MCF]. 항상 양의 유한값을 보장한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct HeatingValue(f64);

impl HeatingValue {
    pub const DEFAULT: Self = Self(DEFAULT_HHV_MMBTU_PER_MCF);

    /// 양의 유한값일 때만 생성한다.
    pub fn new(mmbtu_per_mcf: f64) -> Option<Self> {
        (mmbtu_per_mcf.is_finite() && mmbtu_per_mcf > 0.0).then_some(Self(mmbtu_per_mcf))
    }

    /// 잘못된 값이면 기본값(1.035)으로 대체한다. 입력 경계(CLI, 설정)에서 쓴다.
    pub fn or_default(mmbtu_per_mcf: f64) -> Self {
        Self::new(mmbtu_per_mcf).unwrap_or_else(|| {
            debug!(mmbtu_per_mcf, "invalid heating value, using default");
            Self::DEFAULT
        })
    }

    pub fn mmbtu_per_mcf(self) -> f64 {
        self.0
    }

    /// 1 ft³ 당 Btu.
    pub fn btu_per_cf(self) -> f64 {
        self.0 * BTU_PER_MMBTU / CF_PER_MCF
    }
}

impl Default for HeatingValue {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for HeatingValue {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("heating value must be positive and finite: {value}"))
    }
}

impl From<HeatingValue> for f64 {
    fn from(value: HeatingValue) -> Self {
        value.0
    }
}

fn guard_hhv(value: f64, hhv: f64, apply: impl FnOnce(f64, f64) -> f64) -> f64 {
    if value.is_nan() || hhv.is_nan() {
        return f64::NAN;
    }
    if hhv.is_finite() && hhv > 0.0 {
        apply(value, hhv)
    } else {
        debug!(hhv, "non-positive heating value, gas result set to 0");
        0.0
    }
}

/// `value / hhv`. HHV 가 양의 유한값이 아니면 0.
pub(crate) fn divide_by_hhv(value: f64, hhv: f64) -> f64 {
    guard_hhv(value, hhv, |v, h| v / h)
}

/// `value * hhv`. HHV 가 양의 유한값이 아니면 0.
pub(crate) fn multiply_by_hhv(value: f64, hhv: f64) -> f64 {
    guard_hhv(value, hhv, |v, h| v * h)
}

/// MCF 를 MMBtu 로 변환한다.
pub fn mcf_to_mmbtu(mcf: f64, hhv: f64) -> f64 {
    multiply_by_hhv(mcf, hhv)
}

/// MMBtu 를 MCF 로 변환한다.
pub fn mmbtu_to_mcf(mmbtu: f64, hhv: f64) -> f64 {
    divide_by_hhv(mmbtu, hhv)
}

/// MCF 를 Dth 로 변환한다. 1 Dth = 1 MMBtu.
pub fn mcf_to_dth(mcf: f64, hhv: f64) -> f64 {
    mcf_to_mmbtu(mcf, hhv)
}

/// Dth 를 MCF 로 변환한다. HHV 가 0 이하이면 0.
pub fn dth_to_mcf(dth: f64, hhv: f64) -> f64 {
    mmbtu_to_mcf(dth, hhv)
}

/// 열량 [Btu/h] 을 가스 유량 [CFH] 으로 변환한다.
pub fn btuh_to_cfh(btuh: f64, hhv: f64) -> f64 {
    // CFH = Btu/h / (HHV * 1000 Btu/ft³)
    divide_by_hhv(btuh / (BTU_PER_MMBTU / CF_PER_MCF), hhv)
}

pub fn cfh_to_btuh(cfh: f64, hhv: f64) -> f64 {
    multiply_by_hhv(cfh, hhv) * BTU_PER_MMBTU / CF_PER_MCF
}

/// 열량 [Btu/h] 을 MCF/h 로 변환한다.
pub fn btuh_to_mcf_per_hour(btuh: f64, hhv: f64) -> f64 {
    btuh_to_cfh(btuh, hhv) / CF_PER_MCF
}

pub fn mcf_per_hour_to_btuh(mcf_per_hour: f64, hhv: f64) -> f64 {
    cfh_to_btuh(mcf_per_hour * CF_PER_MCF, hhv)
}
