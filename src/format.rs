//! 결과 표시용 숫자 포맷.

/// 계산할 수 없는 값의 표시.
pub const PLACEHOLDER: &str = "–";

/// 소수 자릿수를 맞추고 천 단위 구분 기호를 넣는다. 유한하지 않으면 `–`.
pub fn display(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    // 반올림 결과가 0 이면 "-0.00" 을 만들지 않는다.
    let is_zero = raw.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// `Option` 값 표시. None 이면 `–`.
pub fn display_opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| display(v, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(display(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(display(999.0, 0), "999");
        assert_eq!(display(1_000.0, 0), "1,000");
        assert_eq!(display(-12_000.5, 1), "-12,000.5");
    }

    #[test]
    fn non_finite_placeholder() {
        assert_eq!(display(f64::NAN, 2), "–");
        assert_eq!(display(f64::INFINITY, 2), "–");
        assert_eq!(display_opt(None, 2), "–");
        assert_eq!(display_opt(Some(0.5), 1), "0.5");
    }

    #[test]
    fn negative_zero_after_rounding() {
        assert_eq!(display(-0.0001, 2), "0.00");
    }
}
