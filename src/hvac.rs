//! 냉난방 부하 관련 기본 환산.

use crate::constants::{BTUH_PER_TON, BTU_PER_MMBTU};
use crate::efficiency::Efficiency;
use crate::gas::mmbtu_to_mcf;

/// 냉동톤을 Btu/h 로 변환한다. 1 ton = 12,000 Btu/h.
pub fn tons_to_btuh(tons: f64) -> f64 {
    tons * BTUH_PER_TON
}

pub fn btuh_to_tons(btuh: f64) -> f64 {
    btuh / BTUH_PER_TON
}

pub fn btuh_to_mmbtuh(btuh: f64) -> f64 {
    btuh / BTU_PER_MMBTU
}

pub fn mmbtuh_to_btuh(mmbtuh: f64) -> f64 {
    mmbtuh * BTU_PER_MMBTU
}

/// 냉방 부하[ton]를 감당하는 데 필요한 가스 유량 [MCF/h].
///
/// 부하를 MMBtu/h 로 바꾼 뒤 효율로 나눠 투입 열량을 구하고 HHV 로 체적 환산한다.
/// 효율이 0 이하이면 1.0 으로 보고, HHV 가 0 이하이면 0 을 반환한다.
pub fn tons_to_mcf_per_hour(tons: f64, efficiency: Efficiency, hhv: f64) -> f64 {
    let delivered_mmbtuh = btuh_to_mmbtuh(tons_to_btuh(tons));
    let input_mmbtuh = delivered_mmbtuh / efficiency.normalized();
    mmbtu_to_mcf(input_mmbtuh, hhv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_HHV_MMBTU_PER_MCF as HHV;

    #[test]
    fn tons_and_btuh() {
        assert_eq!(tons_to_btuh(3_000.0), 36_000_000.0);
        assert_eq!(tons_to_btuh(1.0), 12_000.0);
        assert_eq!(btuh_to_tons(36_000_000.0), 3_000.0);
    }

    #[test]
    fn mmbtuh_round_trip() {
        assert_eq!(btuh_to_mmbtuh(36_000_000.0), 36.0);
        assert_eq!(mmbtuh_to_btuh(36.0), 36_000_000.0);
    }

    #[test]
    fn cooling_load_gas_input() {
        let mcfh = tons_to_mcf_per_hour(3_000.0, Efficiency::default(), HHV);
        assert!((mcfh - 34.782_608_7).abs() < 1e-6);
        let half = tons_to_mcf_per_hour(3_000.0, Efficiency::Percentage(50.0), HHV);
        assert!((half - 2.0 * mcfh).abs() < 1e-9);
        let zero_eff = tons_to_mcf_per_hour(100.0, Efficiency::Fraction(0.0), HHV);
        assert!((zero_eff - tons_to_mcf_per_hour(100.0, Efficiency::default(), HHV)).abs() < 1e-12);
    }
}
