//! 변환 계산에 공통으로 쓰는 고정 상수 모음.

/// 냉동톤 1 ton 에 해당하는 Btu/h.
pub const BTUH_PER_TON: f64 = 12_000.0;

/// 1 kW 에 해당하는 Btu/h. kWh -> Btu 도 같은 값을 쓴다.
pub const BTUH_PER_KW: f64 = 3_412.142;

/// 1 HP 에 해당하는 Btu/h.
pub const BTUH_PER_HP: f64 = 2_544.4336;

/// 1 therm = 100,000 Btu.
pub const BTU_PER_THERM: f64 = 100_000.0;

/// 1 Dth = 1,000,000 Btu (1 MMBtu 와 동일).
pub const BTU_PER_DTH: f64 = 1_000_000.0;

pub const BTU_PER_MMBTU: f64 = 1_000_000.0;

/// 증기 1,000 lb(MLB)를 1 MMBtu 로 취급한다.
/// 물리 상수가 아니라 요금 산정에서 쓰는 단순화 관례이다.
pub const BTU_PER_MLB: f64 = 1_000_000.0;

/// 1 MBH = 1,000 Btu/h.
pub const BTUH_PER_MBH: f64 = 1_000.0;

/// 천연가스 고위발열량 기본값 [MMBtu/MCF].
/// 1 MCF ≈ 1.035 MMBtu 로 보는 가스 요금 관례를 따른다.
pub const DEFAULT_HHV_MMBTU_PER_MCF: f64 = 1.035;

/// 1 MCF = 1,000 ft³.
pub const CF_PER_MCF: f64 = 1_000.0;

/// No.2 난방유 1 gal 의 발열량 [Btu].
pub const BTU_PER_GAL_FUEL_OIL: f64 = 138_500.0;

/// 경유 1 gal 의 발열량 [Btu].
pub const BTU_PER_GAL_DIESEL: f64 = 137_381.0;

/// 프로판 1 gal 의 발열량 [Btu].
pub const BTU_PER_GAL_PROPANE: f64 = 91_452.0;

/// 대기압 [psi]. psig <-> psia 오프셋.
pub const ATM_PSI: f64 = 14.7;

/// 1 psi 에 해당하는 inWC.
pub const INWC_PER_PSI: f64 = 27.68;

/// 1 psi 에 해당하는 kPa.
pub const KPA_PER_PSI: f64 = 6.89476;

/// 1 psi 에 해당하는 bar.
pub const BAR_PER_PSI: f64 = 0.0689476;

/// 1 m³ 에 해당하는 ft³.
pub const CF_PER_M3: f64 = 35.3147;

/// 규모 분류 경계 [Btu/h]. 미만이면 주거용.
pub const RESIDENTIAL_LIMIT_BTUH: f64 = 300_000.0;

/// 규모 분류 경계 [Btu/h]. 초과하면 산업용.
pub const COMMERCIAL_LIMIT_BTUH: f64 = 3_000_000.0;
