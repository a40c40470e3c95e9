use std::str::FromStr;

use thiserror::Error;
use tracing::trace;

use crate::quantity::ConversionCategory;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("unknown {category:?} unit: {unit}")]
    UnknownUnit {
        category: ConversionCategory,
        unit: String,
    },
    /// 알 수 없는 분류 문자열
    #[error("unknown conversion category: {0}")]
    UnknownCategory(String),
}

impl FromStr for ConversionCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "energy" | "e" => Ok(ConversionCategory::Energy),
            "power" | "rate" | "demand" | "p" => Ok(ConversionCategory::Power),
            "temperature" | "temp" | "t" => Ok(ConversionCategory::Temperature),
            "flow" | "f" => Ok(ConversionCategory::Flow),
            "pressure" | "press" => Ok(ConversionCategory::Pressure),
            _ => Err(ConversionError::UnknownCategory(s.to_string())),
        }
    }
}

/// 문자열로 전달된 단위명을 enum 으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `Btu`, `kWh`, `ton`, `CFH`, `°C`, `psia` 등을 사용할 수 있다.
/// 숫자 자체는 검증하지 않으므로 NaN 입력은 NaN 결과가 된다.
pub fn convert(
    category: ConversionCategory,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
    hhv: f64,
) -> Result<f64, ConversionError> {
    let result = match category {
        ConversionCategory::Energy => convert_keys::<EnergyUnit>(category, value, from_unit_str, to_unit_str, hhv)?,
        ConversionCategory::Power => convert_keys::<PowerUnit>(category, value, from_unit_str, to_unit_str, hhv)?,
        ConversionCategory::Temperature => {
            convert_keys::<TemperatureUnit>(category, value, from_unit_str, to_unit_str, hhv)?
        }
        ConversionCategory::Flow => convert_keys::<FlowUnit>(category, value, from_unit_str, to_unit_str, hhv)?,
        ConversionCategory::Pressure => {
            convert_keys::<PressureUnit>(category, value, from_unit_str, to_unit_str, hhv)?
        }
    };
    trace!(?category, value, from_unit_str, to_unit_str, result, "converted");
    Ok(result)
}

/// 분류에 속한 단위 기호 목록.
pub fn unit_symbols(category: ConversionCategory) -> Vec<&'static str> {
    fn symbols<U: Unit>() -> Vec<&'static str> {
        U::ALL.iter().map(|u| u.symbol()).collect()
    }
    match category {
        ConversionCategory::Energy => symbols::<EnergyUnit>(),
        ConversionCategory::Power => symbols::<PowerUnit>(),
        ConversionCategory::Temperature => symbols::<TemperatureUnit>(),
        ConversionCategory::Flow => symbols::<FlowUnit>(),
        ConversionCategory::Pressure => symbols::<PressureUnit>(),
    }
}

/// 분류 안의 모든 단위로 한 번에 환산한다. 변환기 화면의 결과표에 쓴다.
pub fn convert_to_all(
    category: ConversionCategory,
    value: f64,
    from_unit_str: &str,
    hhv: f64,
) -> Result<Vec<(&'static str, f64)>, ConversionError> {
    fn table<U: Unit>(
        category: ConversionCategory,
        value: f64,
        from: &str,
        hhv: f64,
    ) -> Result<Vec<(&'static str, f64)>, ConversionError> {
        let from = parse_unit::<U>(category, from)?;
        let base = from.to_base(value, hhv);
        Ok(U::ALL
            .iter()
            .map(|u| (u.symbol(), u.from_base(base, hhv)))
            .collect())
    }
    match category {
        ConversionCategory::Energy => table::<EnergyUnit>(category, value, from_unit_str, hhv),
        ConversionCategory::Power => table::<PowerUnit>(category, value, from_unit_str, hhv),
        ConversionCategory::Temperature => table::<TemperatureUnit>(category, value, from_unit_str, hhv),
        ConversionCategory::Flow => table::<FlowUnit>(category, value, from_unit_str, hhv),
        ConversionCategory::Pressure => table::<PressureUnit>(category, value, from_unit_str, hhv),
    }
}

fn parse_unit<U: Unit>(category: ConversionCategory, key: &str) -> Result<U, ConversionError> {
    U::parse(key).ok_or_else(|| ConversionError::UnknownUnit {
        category,
        unit: key.to_string(),
    })
}

fn convert_keys<U: Unit>(
    category: ConversionCategory,
    value: f64,
    from: &str,
    to: &str,
    hhv: f64,
) -> Result<f64, ConversionError> {
    let from = parse_unit::<U>(category, from)?;
    let to = parse_unit::<U>(category, to)?;
    Ok(crate::units::convert(value, from, to, hhv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_HHV_MMBTU_PER_MCF as HHV;

    #[test]
    fn string_keys_convert() {
        let btuh = convert(ConversionCategory::Power, 1.0, "kW", "Btu/hr", HHV).unwrap();
        assert_eq!(btuh, 3_412.142);
        let c = convert(ConversionCategory::Temperature, 212.0, "F", "C", HHV).unwrap();
        assert!((c - 100.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_unit_is_reported() {
        let err = convert(ConversionCategory::Energy, 1.0, "furlong", "Btu", HHV).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnknownUnit {
                category: ConversionCategory::Energy,
                unit: "furlong".into()
            }
        );
    }

    #[test]
    fn nan_input_is_not_an_error() {
        let v = convert(ConversionCategory::Energy, f64::NAN, "therm", "Btu", HHV).unwrap();
        assert!(v.is_nan());
    }

    #[test]
    fn category_parsing() {
        assert_eq!("Energy".parse::<ConversionCategory>().unwrap(), ConversionCategory::Energy);
        assert_eq!("rate".parse::<ConversionCategory>().unwrap(), ConversionCategory::Power);
        assert!("volume".parse::<ConversionCategory>().is_err());
    }

    #[test]
    fn table_covers_every_unit() {
        let rows = convert_to_all(ConversionCategory::Pressure, 1.0, "psig", HHV).unwrap();
        assert_eq!(rows.len(), unit_symbols(ConversionCategory::Pressure).len());
        assert_eq!(rows[0], ("psig", 1.0));
    }
}
