//! 사용자 입력 문자열을 숫자로 바꾸는 얇은 파싱 단계.
//!
//! 천 단위 구분자(`,` `_`)와 공백을 제거한 뒤 해석한다. 비어 있거나 해석할 수 없거나
//! 유한하지 않은 값은 NaN 이 되며, 예외 대신 NaN 을 하위 계산으로 전파한다.

/// 입력 문자열을 f64 로 해석한다. 실패하면 NaN.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// 해석 결과가 유효한 숫자인지 함께 돌려준다.
pub fn parse_finite(raw: &str) -> Option<f64> {
    let v = parse_number(raw);
    v.is_finite().then_some(v)
}
