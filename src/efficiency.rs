//! 효율/성적계수 표현.
//!
//! 크기로 표현 방식을 추정하지 않고, 호출자가 소수(0.9), 백분율(90), COP(3.5) 중 하나를
//! 명시한다. 정규화 결과는 항상 양수이며 0 이하나 유한하지 않은 값은 1.0(100%)이 된다.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::parse_number;

/// 출력 에너지 / 투입 연료 에너지 비율.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EfficiencyRepr", into = "String")]
pub enum Efficiency {
    /// 소수 (0.9 = 90%)
    Fraction(f64),
    /// 백분율 (90 = 90%)
    Percentage(f64),
    /// 히트펌프 성적계수. 1 을 넘을 수 있다.
    Cop(f64),
}

impl Efficiency {
    /// 계산에 쓰는 소수 값. 항상 0 보다 크다.
    pub fn normalized(self) -> f64 {
        let raw = match self {
            Efficiency::Fraction(v) | Efficiency::Cop(v) => v,
            Efficiency::Percentage(p) => p / 100.0,
        };
        if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            debug!(?self, "efficiency not positive, using 1.0");
            1.0
        }
    }
}

impl Default for Efficiency {
    fn default() -> Self {
        Efficiency::Fraction(1.0)
    }
}

/// `90%` -> 백분율, `cop:3.5` / `3.5 cop` -> COP, 그 외 숫자 -> 소수.
/// 숫자로 해석되지 않으면 NaN 을 담으므로 정규화 시 1.0 이 된다.
impl FromStr for Efficiency {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_lowercase();
        if let Some(p) = t.strip_suffix('%') {
            return Ok(Efficiency::Percentage(parse_number(p)));
        }
        if let Some(c) = t.strip_prefix("cop").map(|r| r.trim_start_matches([':', '='])) {
            return Ok(Efficiency::Cop(parse_number(c)));
        }
        if let Some(c) = t.strip_suffix("cop") {
            return Ok(Efficiency::Cop(parse_number(c)));
        }
        Ok(Efficiency::Fraction(parse_number(&t)))
    }
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Efficiency::Fraction(v) => write!(f, "{v}"),
            Efficiency::Percentage(p) => write!(f, "{p}%"),
            Efficiency::Cop(c) => write!(f, "cop:{c}"),
        }
    }
}

impl From<Efficiency> for String {
    fn from(value: Efficiency) -> Self {
        value.to_string()
    }
}

/// 설정/시나리오 파일에서 숫자(소수)와 문자열 표기를 모두 받는다.
#[derive(Deserialize)]
#[serde(untagged)]
enum EfficiencyRepr {
    Number(f64),
    Text(String),
}

impl From<EfficiencyRepr> for Efficiency {
    fn from(value: EfficiencyRepr) -> Self {
        match value {
            EfficiencyRepr::Number(v) => Efficiency::Fraction(v),
            EfficiencyRepr::Text(s) => match s.parse() {
                Ok(e) => e,
                Err(never) => match never {},
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_representations_normalize() {
        assert_eq!(Efficiency::Fraction(0.9).normalized(), 0.9);
        assert_eq!(Efficiency::Percentage(90.0).normalized(), 0.9);
        assert_eq!(Efficiency::Cop(3.5).normalized(), 3.5);
    }

    #[test]
    fn invalid_defaults_to_one() {
        assert_eq!(Efficiency::Fraction(0.0).normalized(), 1.0);
        assert_eq!(Efficiency::Percentage(-5.0).normalized(), 1.0);
        assert_eq!(Efficiency::Cop(f64::NAN).normalized(), 1.0);
        assert_eq!(Efficiency::Fraction(f64::INFINITY).normalized(), 1.0);
    }

    #[test]
    fn parses_tagged_text() {
        assert_eq!("90%".parse::<Efficiency>().unwrap(), Efficiency::Percentage(90.0));
        assert_eq!("COP:3.5".parse::<Efficiency>().unwrap(), Efficiency::Cop(3.5));
        assert_eq!("3.2 cop".parse::<Efficiency>().unwrap(), Efficiency::Cop(3.2));
        assert_eq!("0.82".parse::<Efficiency>().unwrap(), Efficiency::Fraction(0.82));
        let bad = "n/a".parse::<Efficiency>().unwrap();
        assert_eq!(bad.normalized(), 1.0);
    }

    #[test]
    fn display_parses_back() {
        for e in [
            Efficiency::Fraction(0.95),
            Efficiency::Percentage(80.0),
            Efficiency::Cop(2.7),
        ] {
            assert_eq!(e.to_string().parse::<Efficiency>().unwrap(), e);
        }
    }
}
