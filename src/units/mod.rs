//! 단위 정의 및 변환 모듈 모음.
//!
//! 분류마다 닫힌 enum 으로 단위를 정의하고, 각 단위는 기준 단위로의 변환(`to_base`)과
//! 역변환(`from_base`)을 모두 갖는다. A -> B 변환은 `to_base_A` 후 `from_base_B` 이다.
//! 기준 단위: 에너지=Btu, 출력=Btu/h, 온도=°F, 유량=CFH, 압력=psig.

pub mod energy;
pub mod flow;
pub mod power;
pub mod pressure;
pub mod temperature;

pub use energy::{convert_energy, EnergyUnit};
pub use flow::{convert_flow, FlowUnit};
pub use power::{convert_power, PowerUnit};
pub use pressure::{convert_pressure, PressureUnit};
pub use temperature::{convert_temperature, TemperatureUnit};

/// 하나의 변환 분류에 속하는 단위가 구현하는 공통 인터페이스.
///
/// `hhv` 는 가스 체적 단위(MCF, CFH)에서만 쓰이며 [MMBtu/MCF] 이다.
pub trait Unit: Copy + Eq + std::fmt::Debug + 'static {
    /// 분류에 속한 모든 단위.
    const ALL: &'static [Self];

    /// 화면 표시용 기호.
    fn symbol(self) -> &'static str;

    fn to_base(self, value: f64, hhv: f64) -> f64;

    fn from_base(self, value: f64, hhv: f64) -> f64;

    /// 단위 키를 해석한다. 대소문자와 공백은 무시한다.
    fn parse(key: &str) -> Option<Self>;
}

/// 같은 분류 안에서 단위를 변환한다.
pub fn convert<U: Unit>(value: f64, from: U, to: U, hhv: f64) -> f64 {
    to.from_base(from.to_base(value, hhv), hhv)
}

/// 단위 키 비교용으로 소문자화하고 공백을 지운다.
pub(crate) fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
