use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;
use tracing::debug;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const INVALID_NUMBER: &str = "error.invalid_number";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_UNIT_CONVERSION: &str = "main_menu.unit_conversion";
    pub const MAIN_MENU_DEMAND: &str = "main_menu.demand";
    pub const MAIN_MENU_LOAD: &str = "main_menu.load";
    pub const MAIN_MENU_COMPARISON: &str = "main_menu.comparison";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";

    pub const UNIT_CONVERSION_HEADING: &str = "unit_conversion.heading";
    pub const UNIT_CONVERSION_CATEGORIES: &str = "unit_conversion.categories";
    pub const UNIT_CONVERSION_PROMPT_CATEGORY: &str = "unit_conversion.prompt_category";
    pub const UNIT_CONVERSION_AVAILABLE: &str = "unit_conversion.available";
    pub const UNIT_CONVERSION_PROMPT_VALUE: &str = "unit_conversion.prompt_value";
    pub const UNIT_CONVERSION_PROMPT_FROM_UNIT: &str = "unit_conversion.prompt_from_unit";
    pub const UNIT_CONVERSION_PROMPT_TO_UNIT: &str = "unit_conversion.prompt_to_unit";
    pub const UNIT_CONVERSION_RESULT: &str = "unit_conversion.result";
    pub const UNIT_CONVERSION_ALL: &str = "unit_conversion.all";

    pub const DEMAND_HEADING: &str = "demand.heading";
    pub const DEMAND_PROMPT_VALUE: &str = "demand.prompt_value";
    pub const DEMAND_PROMPT_UNIT: &str = "demand.prompt_unit";
    pub const DEMAND_PROMPT_HOURS: &str = "demand.prompt_hours";
    pub const DEMAND_PROMPT_EFFICIENCY: &str = "demand.prompt_efficiency";
    pub const DEMAND_PROMPT_REFERENCE: &str = "demand.prompt_reference";
    pub const DEMAND_DELIVERED_RATES: &str = "demand.delivered_rates";
    pub const DEMAND_INPUT_RATES: &str = "demand.input_rates";
    pub const DEMAND_DELIVERED_TOTALS: &str = "demand.delivered_totals";
    pub const DEMAND_INPUT_TOTALS: &str = "demand.input_totals";
    pub const DEMAND_SIZE_CLASS: &str = "demand.size_class";
    pub const SIZE_RESIDENTIAL: &str = "size_class.residential";
    pub const SIZE_COMMERCIAL: &str = "size_class.commercial";
    pub const SIZE_INDUSTRIAL: &str = "size_class.industrial";

    pub const LOAD_HEADING: &str = "load.heading";
    pub const LOAD_PROMPT_AREA: &str = "load.prompt_area";
    pub const LOAD_PROMPT_VINTAGE: &str = "load.prompt_vintage";
    pub const LOAD_PROMPT_HEATING_OVERRIDE: &str = "load.prompt_heating_override";
    pub const LOAD_PROMPT_COOLING_OVERRIDE: &str = "load.prompt_cooling_override";
    pub const LOAD_RESULT: &str = "load.result";
    pub const LOAD_COMPARE_HEADING: &str = "load.compare_heading";

    pub const COMPARISON_HEADING: &str = "comparison.heading";
    pub const COMPARISON_PROMPT_SCENARIO: &str = "comparison.prompt_scenario";
    pub const COMPARISON_PROMPT_USAGE: &str = "comparison.prompt_usage";
    pub const COMPARISON_PROMPT_USAGE_UNIT: &str = "comparison.prompt_usage_unit";
    pub const COMPARISON_PROMPT_SOURCE_NAME: &str = "comparison.prompt_source_name";
    pub const COMPARISON_PROMPT_RATE: &str = "comparison.prompt_rate";
    pub const COMPARISON_PROMPT_BILLING_UNIT: &str = "comparison.prompt_billing_unit";
    pub const COMPARISON_PROMPT_EFFICIENCY: &str = "comparison.prompt_efficiency";
    pub const COMPARISON_PROMPT_FUEL: &str = "comparison.prompt_fuel";
    pub const COMPARISON_PROMPT_GRID: &str = "comparison.prompt_grid";
    pub const COMPARISON_SOURCE_LINE: &str = "comparison.source_line";
    pub const COMPARISON_ALTERNATIVE_CHEAPER: &str = "comparison.alternative_cheaper";
    pub const COMPARISON_BASELINE_CHEAPER: &str = "comparison.baseline_cheaper";
    pub const COMPARISON_EVEN: &str = "comparison.even";
    pub const COMPARISON_UNDEFINED: &str = "comparison.undefined";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_PROMPT_HHV: &str = "settings.prompt_hhv";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_PROMPT_DECIMALS: &str = "settings.prompt_decimals";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    /// `ko`, `ko-KR`, `en_US.UTF-8` 같은 코드를 해석한다.
    pub fn from_code(code: &str) -> Option<Self> {
        let base = code
            .trim()
            .split(['.', '_', '-'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match base.as_str() {
            "ko" => Some(Language::Ko),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: HashMap<String, String>,
}

impl Translator {
    /// 내장 문자열만 쓰는 번역기.
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            overrides: HashMap::new(),
        }
    }

    /// 언어팩 디렉터리(`<dir>/<code>.toml`)의 문자열로 내장 문자열을 덮어쓴다.
    /// 디렉터리나 파일이 없으면 내장 문자열만 사용한다.
    pub fn with_pack(lang: Language, pack_dir: &Path) -> Self {
        let overrides = load_overrides(pack_dir, lang).unwrap_or_default();
        Self { lang, overrides }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어, 그것도 없으면 키를 돌려준다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.get(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::En => en(key).or_else(|| ko(key)),
            Language::Ko => ko(key),
        };
        builtin.unwrap_or(key)
    }

    /// `{name}` 자리표시자를 채운 번역.
    pub fn fmt(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// CLI 플래그, 설정, 시스템 로케일 순으로 언어를 결정한다. 모두 없으면 영어.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> Language {
    let explicit = |code: Option<&str>| {
        code.filter(|c| !c.trim().is_empty() && !c.trim().eq_ignore_ascii_case("auto"))
            .and_then(Language::from_code)
    };
    explicit(cli_arg)
        .or_else(|| explicit(config_lang))
        .or_else(detect_system_language)
        .unwrap_or(Language::En)
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<Language> {
    if let Some(lang) = get_locale().as_deref().and_then(Language::from_code) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| Language::from_code(&v))
}

/// TOML 기반 언어팩을 로드한다. 중첩 테이블은 `a.b` 키로 펼친다.
fn load_overrides(dir: &Path, lang: Language) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{}.toml", lang.as_code()));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_none() {
        debug!(path = %path.display(), "language pack ignored");
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    walk(&format!("{prefix}.{k}"), v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in &table {
        walk(k, v, &mut map);
    }
    (!map.is_empty()).then_some(map)
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        INVALID_NUMBER => "숫자를 입력하세요.",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        MAIN_MENU_TITLE => "\n=== 유틸리티 계산기 ===",
        MAIN_MENU_UNIT_CONVERSION => "1) 단위 변환",
        MAIN_MENU_DEMAND => "2) 순간 수요 / 등가 환산",
        MAIN_MENU_LOAD => "3) 냉난방 부하 추정",
        MAIN_MENU_COMPARISON => "4) 에너지원 비용/배출 비교",
        MAIN_MENU_SETTINGS => "5) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        UNIT_CONVERSION_HEADING => "\n-- 단위 변환 --",
        UNIT_CONVERSION_CATEGORIES => "1) 에너지  2) 출력(열량률)  3) 온도  4) 유량  5) 압력",
        UNIT_CONVERSION_PROMPT_CATEGORY => "항목 번호를 입력: ",
        UNIT_CONVERSION_AVAILABLE => "사용 가능 단위: {units}",
        UNIT_CONVERSION_PROMPT_VALUE => "값 입력: ",
        UNIT_CONVERSION_PROMPT_FROM_UNIT => "입력 단위: ",
        UNIT_CONVERSION_PROMPT_TO_UNIT => "변환 단위(엔터 = 전체): ",
        UNIT_CONVERSION_RESULT => "변환 결과: {value} {unit}",
        UNIT_CONVERSION_ALL => "전체 단위 환산:",
        DEMAND_HEADING => "\n-- 순간 수요 / 등가 환산 --",
        DEMAND_PROMPT_VALUE => "수요 값: ",
        DEMAND_PROMPT_UNIT => "수요 단위: ",
        DEMAND_PROMPT_HOURS => "운전 시간 [h] (엔터 = {default}): ",
        DEMAND_PROMPT_EFFICIENCY => "효율 (0.9, 90%, cop:3.5; 엔터 = 1): ",
        DEMAND_PROMPT_REFERENCE => "입력 값 기준 1=공급 열량 2=투입 연료 (엔터 = 1): ",
        DEMAND_DELIVERED_RATES => "[공급 기준 순간 값]",
        DEMAND_INPUT_RATES => "[투입 연료 기준 순간 값]",
        DEMAND_DELIVERED_TOTALS => "[공급 기준 누적량]",
        DEMAND_INPUT_TOTALS => "[투입 연료 기준 누적량]",
        DEMAND_SIZE_CLASS => "규모 분류: {class}",
        SIZE_RESIDENTIAL => "주거용",
        SIZE_COMMERCIAL => "상업용",
        SIZE_INDUSTRIAL => "산업용",
        LOAD_HEADING => "\n-- 냉난방 부하 추정 --",
        LOAD_PROMPT_AREA => "냉난방 면적 [ft²]: ",
        LOAD_PROMPT_VINTAGE => "건물 등급 (tight / average / leaky, 엔터 = {default}): ",
        LOAD_PROMPT_HEATING_OVERRIDE => "난방 밀도 재정의 [Btu/ft²·h] (엔터 = 기본): ",
        LOAD_PROMPT_COOLING_OVERRIDE => "냉방 밀도 재정의 [Btu/ft²·h] (엔터 = 기본): ",
        LOAD_RESULT => "난방 {heating_btuh} Btu/h ({heating_mbh} MBH), 냉방 {cooling_btuh} Btu/h ({cooling_tons} ton)",
        LOAD_COMPARE_HEADING => "등급별 비교:",
        COMPARISON_HEADING => "\n-- 에너지원 비용/배출 비교 --",
        COMPARISON_PROMPT_SCENARIO => "시나리오 TOML 경로 (엔터 = 직접 입력): ",
        COMPARISON_PROMPT_USAGE => "공급 에너지 사용량: ",
        COMPARISON_PROMPT_USAGE_UNIT => "사용량 단위 (MCF, therm, Dth, MMBtu, MLB, kWh, gal oil ...): ",
        COMPARISON_PROMPT_SOURCE_NAME => "에너지원 {index} 이름: ",
        COMPARISON_PROMPT_RATE => "단가: ",
        COMPARISON_PROMPT_BILLING_UNIT => "청구 단위: ",
        COMPARISON_PROMPT_EFFICIENCY => "효율 (0.9, 90%, cop:3.5): ",
        COMPARISON_PROMPT_FUEL => "연료 (natural_gas, propane, fuel_oil, diesel, electricity, steam): ",
        COMPARISON_PROMPT_GRID => "전력망 탄소집약도 [lb/MWh] (엔터 = 없음): ",
        COMPARISON_SOURCE_LINE => "{name}: 효율 {efficiency}, 투입 {input} MMBtu, 총비용 {cost}, 공급 MMBtu 당 {unit_cost}, CO2e {co2e} lb",
        COMPARISON_ALTERNATIVE_CHEAPER => "{alternative} 이(가) {baseline} 대비 {savings} 저렴합니다 (비율 {ratio}).",
        COMPARISON_BASELINE_CHEAPER => "{baseline} 이(가) {alternative} 대비 {savings} 저렴합니다 (비율 {ratio}).",
        COMPARISON_EVEN => "{baseline} 와(과) {alternative} 의 비용이 같습니다.",
        COMPARISON_UNDEFINED => "{baseline} 와(과) {alternative} 의 비용을 비교할 수 없습니다.",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT => "현재: 언어 {language}, 고위발열량 {hhv} MMBtu/MCF, 소수 자릿수 {decimals}",
        SETTINGS_OPTIONS => "1) 고위발열량  2) 언어  3) 소수 자릿수",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_PROMPT_HHV => "고위발열량 [MMBtu/MCF]: ",
        SETTINGS_PROMPT_LANGUAGE => "언어 (auto / ko / en): ",
        SETTINGS_PROMPT_DECIMALS => "소수 자릿수: ",
        SETTINGS_INVALID => "잘못된 값입니다. 변경하지 않았습니다.",
        SETTINGS_SAVED => "설정을 저장했습니다.",
        _ => return None,
    };
    Some(s)
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        INVALID_NUMBER => "Please enter a number.",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        MAIN_MENU_TITLE => "\n=== Utility Calculator ===",
        MAIN_MENU_UNIT_CONVERSION => "1) Unit conversion",
        MAIN_MENU_DEMAND => "2) Instantaneous demand / equivalents",
        MAIN_MENU_LOAD => "3) Heating and cooling load estimate",
        MAIN_MENU_COMPARISON => "4) Energy source cost and emissions",
        MAIN_MENU_SETTINGS => "5) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select: ",
        UNIT_CONVERSION_HEADING => "\n-- Unit conversion --",
        UNIT_CONVERSION_CATEGORIES => "1) Energy  2) Power (heat rate)  3) Temperature  4) Flow  5) Pressure",
        UNIT_CONVERSION_PROMPT_CATEGORY => "Category number: ",
        UNIT_CONVERSION_AVAILABLE => "Available units: {units}",
        UNIT_CONVERSION_PROMPT_VALUE => "Value: ",
        UNIT_CONVERSION_PROMPT_FROM_UNIT => "From unit: ",
        UNIT_CONVERSION_PROMPT_TO_UNIT => "To unit (Enter = all): ",
        UNIT_CONVERSION_RESULT => "Result: {value} {unit}",
        UNIT_CONVERSION_ALL => "All equivalents:",
        DEMAND_HEADING => "\n-- Instantaneous demand / equivalents --",
        DEMAND_PROMPT_VALUE => "Demand value: ",
        DEMAND_PROMPT_UNIT => "Demand unit: ",
        DEMAND_PROMPT_HOURS => "Operating hours (Enter = {default}): ",
        DEMAND_PROMPT_EFFICIENCY => "Efficiency (0.9, 90%, cop:3.5; Enter = 1): ",
        DEMAND_PROMPT_REFERENCE => "Value refers to 1=delivered heat 2=input fuel (Enter = 1): ",
        DEMAND_DELIVERED_RATES => "[Delivered rates]",
        DEMAND_INPUT_RATES => "[Input fuel rates]",
        DEMAND_DELIVERED_TOTALS => "[Delivered totals]",
        DEMAND_INPUT_TOTALS => "[Input fuel totals]",
        DEMAND_SIZE_CLASS => "Size class: {class}",
        SIZE_RESIDENTIAL => "residential",
        SIZE_COMMERCIAL => "commercial",
        SIZE_INDUSTRIAL => "industrial",
        LOAD_HEADING => "\n-- Heating and cooling load estimate --",
        LOAD_PROMPT_AREA => "Conditioned area [ft²]: ",
        LOAD_PROMPT_VINTAGE => "Vintage (tight / average / leaky, Enter = {default}): ",
        LOAD_PROMPT_HEATING_OVERRIDE => "Heating density override [Btu/ft²·h] (Enter = default): ",
        LOAD_PROMPT_COOLING_OVERRIDE => "Cooling density override [Btu/ft²·h] (Enter = default): ",
        LOAD_RESULT => "Heating {heating_btuh} Btu/h ({heating_mbh} MBH), cooling {cooling_btuh} Btu/h ({cooling_tons} tons)",
        LOAD_COMPARE_HEADING => "By vintage:",
        COMPARISON_HEADING => "\n-- Energy source cost and emissions --",
        COMPARISON_PROMPT_SCENARIO => "Scenario TOML path (Enter = manual entry): ",
        COMPARISON_PROMPT_USAGE => "Delivered energy usage: ",
        COMPARISON_PROMPT_USAGE_UNIT => "Usage unit (MCF, therm, Dth, MMBtu, MLB, kWh, gal oil ...): ",
        COMPARISON_PROMPT_SOURCE_NAME => "Source {index} name: ",
        COMPARISON_PROMPT_RATE => "Rate: ",
        COMPARISON_PROMPT_BILLING_UNIT => "Billing unit: ",
        COMPARISON_PROMPT_EFFICIENCY => "Efficiency (0.9, 90%, cop:3.5): ",
        COMPARISON_PROMPT_FUEL => "Fuel (natural_gas, propane, fuel_oil, diesel, electricity, steam): ",
        COMPARISON_PROMPT_GRID => "Grid intensity [lb/MWh] (Enter = none): ",
        COMPARISON_SOURCE_LINE => "{name}: efficiency {efficiency}, input {input} MMBtu, total {cost}, per delivered MMBtu {unit_cost}, CO2e {co2e} lb",
        COMPARISON_ALTERNATIVE_CHEAPER => "{alternative} saves {savings} versus {baseline} (ratio {ratio}).",
        COMPARISON_BASELINE_CHEAPER => "{baseline} saves {savings} versus {alternative} (ratio {ratio}).",
        COMPARISON_EVEN => "{baseline} and {alternative} cost the same.",
        COMPARISON_UNDEFINED => "{baseline} and {alternative} cannot be compared.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Current: language {language}, HHV {hhv} MMBtu/MCF, decimals {decimals}",
        SETTINGS_OPTIONS => "1) HHV  2) Language  3) Decimals",
        SETTINGS_PROMPT_CHANGE => "Option to change (Enter to cancel): ",
        SETTINGS_PROMPT_HHV => "HHV [MMBtu/MCF]: ",
        SETTINGS_PROMPT_LANGUAGE => "Language (auto / ko / en): ",
        SETTINGS_PROMPT_DECIMALS => "Decimals: ",
        SETTINGS_INVALID => "Invalid value. Nothing changed.",
        SETTINGS_SAVED => "Settings saved.",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("ko-KR"), Some(Language::Ko));
        assert_eq!(Language::from_code("en_US.UTF-8"), Some(Language::En));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn explicit_language_wins() {
        assert_eq!(resolve_language(Some("ko"), Some("en")), Language::Ko);
        assert_eq!(resolve_language(Some("auto"), Some("en")), Language::En);
        assert_eq!(resolve_language(None, Some("ko")), Language::Ko);
    }

    #[test]
    fn every_korean_key_has_english() {
        use keys::*;
        for key in [
            MAIN_MENU_TITLE,
            UNIT_CONVERSION_RESULT,
            DEMAND_SIZE_CLASS,
            LOAD_RESULT,
            COMPARISON_SOURCE_LINE,
            SETTINGS_CURRENT,
        ] {
            assert!(ko(key).is_some(), "{key}");
            assert!(en(key).is_some(), "{key}");
        }
    }

    #[test]
    fn placeholders_and_unknown_keys() {
        let tr = Translator::new(Language::En);
        assert_eq!(
            tr.fmt(keys::UNIT_CONVERSION_RESULT, &[("value", "12,000"), ("unit", "Btu/h")]),
            "Result: 12,000 Btu/h"
        );
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn pack_overrides_nested_tables() {
        let map = parse_toml_to_map("[main_menu]\ntitle = \"Custom\"\n").unwrap();
        assert_eq!(map.get(keys::MAIN_MENU_TITLE).map(String::as_str), Some("Custom"));
        assert!(parse_toml_to_map("n = 1").is_none());
    }
}
