use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::AppError;
use crate::comparison::{
    compare_sources, BillingUnit, Comparison, EnergyContext, EnergySource, ModeledUsage, Savings,
    Scenario,
};
use crate::config::Config;
use crate::conversion;
use crate::demand::{
    compute_demand, AccumulatedTotals, DemandInput, DemandResult, EnergyReference, RateEquivalents,
    SizeClass,
};
use crate::efficiency::Efficiency;
use crate::emissions::{EmissionsProfile, Fuel};
use crate::format::{display, display_opt};
use crate::gas::HeatingValue;
use crate::i18n::{keys, Translator};
use crate::input::{parse_finite, parse_number};
use crate::load::{compare_vintages, LoadEstimate, LoadInput, Vintage};
use crate::quantity::ConversionCategory;
use crate::units::{PowerUnit, Unit};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    UnitConversion,
    Demand,
    Load,
    Comparison,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_UNIT_CONVERSION,
        keys::MAIN_MENU_DEMAND,
        keys::MAIN_MENU_LOAD,
        keys::MAIN_MENU_COMPARISON,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::UnitConversion),
            "2" => return Ok(MenuChoice::Demand),
            "3" => return Ok(MenuChoice::Load),
            "4" => return Ok(MenuChoice::Comparison),
            "5" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 단위 변환 메뉴를 처리한다.
pub fn handle_unit_conversion(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::UNIT_CONVERSION_HEADING));
    println!("{}", tr.t(keys::UNIT_CONVERSION_CATEGORIES));
    let category = loop {
        let sel = read_line(tr.t(keys::UNIT_CONVERSION_PROMPT_CATEGORY))?;
        let picked = sel
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ConversionCategory::ALL.get(i).copied());
        match picked {
            Some(c) => break c,
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let units = conversion::unit_symbols(category).join(", ");
    println!("{}", tr.fmt(keys::UNIT_CONVERSION_AVAILABLE, &[("units", units.as_str())]));

    let value = read_f64(tr, tr.t(keys::UNIT_CONVERSION_PROMPT_VALUE))?;
    let from = read_line(tr.t(keys::UNIT_CONVERSION_PROMPT_FROM_UNIT))?;
    let to = read_line(tr.t(keys::UNIT_CONVERSION_PROMPT_TO_UNIT))?;
    let hhv = cfg.hhv().mmbtu_per_mcf();
    let decimals = cfg.display.decimals;

    let outcome = if to.trim().is_empty() {
        conversion::convert_to_all(category, value, from.trim(), hhv).map(|rows| {
            print_conversion_table(tr, &rows, decimals);
        })
    } else {
        conversion::convert(category, value, from.trim(), to.trim(), hhv).map(|result| {
            let shown = display(result, decimals);
            println!(
                "{}",
                tr.fmt(keys::UNIT_CONVERSION_RESULT, &[("value", shown.as_str()), ("unit", to.trim())])
            );
        })
    };
    // 잘못된 단위는 메뉴를 끝내지 않고 알리기만 한다.
    if let Err(e) = outcome {
        println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
    }
    Ok(())
}

/// 순간 수요 메뉴를 처리한다.
pub fn handle_demand(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::DEMAND_HEADING));
    let units = conversion::unit_symbols(ConversionCategory::Power).join(", ");
    println!("{}", tr.fmt(keys::UNIT_CONVERSION_AVAILABLE, &[("units", units.as_str())]));
    let value = read_f64(tr, tr.t(keys::DEMAND_PROMPT_VALUE))?;
    let unit = loop {
        let raw = read_line(tr.t(keys::DEMAND_PROMPT_UNIT))?;
        if raw.trim().is_empty() {
            break cfg.default_units.power;
        }
        match PowerUnit::parse(&raw) {
            Some(u) => break u,
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let default_hours = cfg.demand.operating_hours.to_string();
    let hours = read_optional_f64(
        &tr.fmt(keys::DEMAND_PROMPT_HOURS, &[("default", default_hours.as_str())]),
    )?
    .unwrap_or(cfg.demand.operating_hours);
    let efficiency = read_efficiency(tr.t(keys::DEMAND_PROMPT_EFFICIENCY))?;
    let reference = match read_line(tr.t(keys::DEMAND_PROMPT_REFERENCE))?.trim() {
        "2" => EnergyReference::InputFuel,
        _ => EnergyReference::Delivered,
    };

    let result = compute_demand(DemandInput {
        value,
        unit,
        hhv: cfg.hhv().mmbtu_per_mcf(),
        operating_hours: hours,
        reference,
        efficiency,
    });
    print_demand(tr, &result, cfg.display.decimals);
    Ok(())
}

/// 부하 추정 메뉴를 처리한다.
pub fn handle_load(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::LOAD_HEADING));
    let area = read_f64(tr, tr.t(keys::LOAD_PROMPT_AREA))?;
    let raw = read_line(&tr.fmt(
        keys::LOAD_PROMPT_VINTAGE,
        &[("default", cfg.load.vintage.key())],
    ))?;
    let vintage = if raw.trim().is_empty() {
        cfg.load.vintage
    } else {
        Vintage::from_key(&raw)
    };
    let heating_override = read_optional_f64(tr.t(keys::LOAD_PROMPT_HEATING_OVERRIDE))?;
    let cooling_override = read_optional_f64(tr.t(keys::LOAD_PROMPT_COOLING_OVERRIDE))?;

    let rows = compare_vintages(LoadInput {
        floor_area_ft2: area,
        vintage,
        heating_override,
        cooling_override,
    });
    print_load(tr, vintage, &rows, cfg.display.decimals);
    Ok(())
}

/// 에너지원 비교 메뉴를 처리한다. 시나리오 파일 또는 두 에너지원 직접 입력.
pub fn handle_comparison(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::COMPARISON_HEADING));
    let path = read_line(tr.t(keys::COMPARISON_PROMPT_SCENARIO))?;
    let comparison = if path.trim().is_empty() {
        let usage = ModeledUsage {
            value: read_f64(tr, tr.t(keys::COMPARISON_PROMPT_USAGE))?,
            unit: read_billing_unit(tr, tr.t(keys::COMPARISON_PROMPT_USAGE_UNIT))?,
        };
        let sources = [read_source(tr, 1)?, read_source(tr, 2)?];
        let ctx = EnergyContext {
            hhv: cfg.hhv().mmbtu_per_mcf(),
        };
        compare_sources(&sources, usage, &ctx)
    } else {
        match Scenario::load(Path::new(path.trim())) {
            Ok(scenario) => scenario.run(),
            Err(e) => {
                println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
                return Ok(());
            }
        }
    };
    print_comparison(tr, &comparison, cfg.display.decimals);
    Ok(())
}

fn read_source(tr: &Translator, index: usize) -> Result<EnergySource, AppError> {
    let name = read_line(&tr.fmt(
        keys::COMPARISON_PROMPT_SOURCE_NAME,
        &[("index", index.to_string().as_str())],
    ))?;
    let rate = read_f64(tr, tr.t(keys::COMPARISON_PROMPT_RATE))?;
    let billing_unit = read_billing_unit(tr, tr.t(keys::COMPARISON_PROMPT_BILLING_UNIT))?;
    let efficiency = read_efficiency(tr.t(keys::COMPARISON_PROMPT_EFFICIENCY))?;
    let fuel = loop {
        match read_line(tr.t(keys::COMPARISON_PROMPT_FUEL))?.parse::<Fuel>() {
            Ok(f) => break f,
            Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
        }
    };
    let grid = if fuel == Fuel::Electricity {
        read_optional_f64(tr.t(keys::COMPARISON_PROMPT_GRID))?
    } else {
        None
    };
    Ok(EnergySource {
        name: name.trim().to_string(),
        rate,
        billing_unit,
        efficiency,
        emissions: EmissionsProfile::for_fuel(fuel, grid),
    })
}

fn read_billing_unit(tr: &Translator, prompt: &str) -> Result<BillingUnit, AppError> {
    loop {
        match read_line(prompt)?.parse::<BillingUnit>() {
            Ok(u) => return Ok(u),
            Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
        }
    }
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    let hhv = cfg.hhv().mmbtu_per_mcf().to_string();
    let decimals = cfg.display.decimals.to_string();
    println!(
        "{}",
        tr.fmt(
            keys::SETTINGS_CURRENT,
            &[
                ("language", cfg.language.as_str()),
                ("hhv", hhv.as_str()),
                ("decimals", decimals.as_str()),
            ],
        )
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "1" => {
            let raw = read_line(tr.t(keys::SETTINGS_PROMPT_HHV))?;
            match parse_finite(&raw).and_then(HeatingValue::new) {
                Some(v) => cfg.gas.hhv_mmbtu_per_mcf = v.mmbtu_per_mcf(),
                None => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        "2" => {
            let raw = read_line(tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            match raw.trim().to_lowercase().as_str() {
                code @ ("auto" | "ko" | "en") => cfg.language = code.to_string(),
                _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        "3" => {
            let raw = read_line(tr.t(keys::SETTINGS_PROMPT_DECIMALS))?;
            match raw.trim().parse::<usize>() {
                Ok(n) if n <= 10 => cfg.display.decimals = n,
                _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        _ => {}
    }
    Ok(())
}

/// 전체 단위 환산표를 출력한다.
pub fn print_conversion_table(tr: &Translator, rows: &[(&str, f64)], decimals: usize) {
    println!("{}", tr.t(keys::UNIT_CONVERSION_ALL));
    for (symbol, value) in rows {
        println!("  {:>16} {symbol}", display(*value, decimals));
    }
}

fn rate_rows(r: &RateEquivalents) -> [(&'static str, Option<f64>); 12] {
    [
        ("Btu/h", Some(r.btu_per_hour)),
        ("kW", Some(r.kilowatts)),
        ("ton", Some(r.tons)),
        ("hp", Some(r.horsepower)),
        ("CFH", Some(r.cfh)),
        ("MCF/h", Some(r.mcf_per_hour)),
        ("therm/h", Some(r.therms_per_hour)),
        ("Dth/h", Some(r.dth_per_hour)),
        ("MMBtu/h", Some(r.mmbtu_per_hour)),
        ("MLB/h", r.mlb_per_hour),
        ("gal oil/h", Some(r.gallons_fuel_oil_per_hour)),
        ("gal diesel/h", Some(r.gallons_diesel_per_hour)),
    ]
}

fn total_rows(t: &AccumulatedTotals) -> [(&'static str, Option<f64>); 10] {
    [
        ("Btu", Some(t.btu)),
        ("kWh", Some(t.kwh)),
        ("ton-h", Some(t.ton_hours)),
        ("therm", Some(t.therms)),
        ("Dth", Some(t.dth)),
        ("MMBtu", Some(t.mmbtu)),
        ("MCF", Some(t.mcf)),
        ("MLB", t.mlb),
        ("gal oil", Some(t.gallons_fuel_oil)),
        ("gal diesel", Some(t.gallons_diesel)),
    ]
}

fn print_rows(heading: &str, rows: &[(&str, Option<f64>)], decimals: usize) {
    println!("{heading}");
    for (symbol, value) in rows {
        // MLB 처럼 제공하지 않는 항목은 생략한다.
        if value.is_some() {
            println!("  {:>16} {symbol}", display_opt(*value, decimals));
        }
    }
}

/// 수요 계산 결과를 출력한다.
pub fn print_demand(tr: &Translator, result: &DemandResult, decimals: usize) {
    print_rows(tr.t(keys::DEMAND_DELIVERED_RATES), &rate_rows(&result.delivered), decimals);
    print_rows(tr.t(keys::DEMAND_INPUT_RATES), &rate_rows(&result.input), decimals);
    print_rows(
        tr.t(keys::DEMAND_DELIVERED_TOTALS),
        &total_rows(&result.delivered_totals),
        decimals,
    );
    print_rows(tr.t(keys::DEMAND_INPUT_TOTALS), &total_rows(&result.input_totals), decimals);
    if let Some(class) = result.size_class {
        let label = match class {
            SizeClass::Residential => tr.t(keys::SIZE_RESIDENTIAL),
            SizeClass::Commercial => tr.t(keys::SIZE_COMMERCIAL),
            SizeClass::Industrial => tr.t(keys::SIZE_INDUSTRIAL),
        };
        println!("{}", tr.fmt(keys::DEMAND_SIZE_CLASS, &[("class", label)]));
    }
}

fn load_line(tr: &Translator, e: &LoadEstimate, decimals: usize) -> String {
    tr.fmt(
        keys::LOAD_RESULT,
        &[
            ("heating_btuh", display(e.heating_btuh, decimals).as_str()),
            ("heating_mbh", display(e.heating_mbh, decimals).as_str()),
            ("cooling_btuh", display(e.cooling_btuh, decimals).as_str()),
            ("cooling_tons", display(e.cooling_tons, decimals).as_str()),
        ],
    )
}

/// 선택 등급 결과와 등급별 비교를 출력한다.
pub fn print_load(tr: &Translator, selected: Vintage, rows: &[LoadEstimate], decimals: usize) {
    if let Some(chosen) = rows.iter().find(|e| e.vintage == selected) {
        println!("{}", load_line(tr, chosen, decimals));
    }
    println!("{}", tr.t(keys::LOAD_COMPARE_HEADING));
    for e in rows {
        println!("  {:<8} {}", e.vintage.key(), load_line(tr, e, decimals));
    }
}

/// 비교 결과와 첫 번째 에너지원 대비 상대 비용을 출력한다.
pub fn print_comparison(tr: &Translator, comparison: &Comparison, decimals: usize) {
    for s in &comparison.sources {
        println!(
            "{}",
            tr.fmt(
                keys::COMPARISON_SOURCE_LINE,
                &[
                    ("name", s.name.as_str()),
                    ("efficiency", display(s.efficiency, 3).as_str()),
                    ("input", display(s.input_mmbtu, decimals).as_str()),
                    ("cost", display(s.total_cost, decimals).as_str()),
                    ("unit_cost", display(s.cost_per_delivered_mmbtu, decimals).as_str()),
                    ("co2e", display(s.emissions.co2e_lb, decimals).as_str()),
                ],
            )
        );
    }
    for alternative in 1..comparison.sources.len() {
        let Some(pair) = comparison.pairwise(0, alternative) else {
            continue;
        };
        let ratio = display(pair.ratio, 3);
        let (key, savings) = match pair.verdict() {
            Savings::AlternativeCheaper(v) => (keys::COMPARISON_ALTERNATIVE_CHEAPER, v),
            Savings::BaselineCheaper(v) => (keys::COMPARISON_BASELINE_CHEAPER, v),
            Savings::Even => (keys::COMPARISON_EVEN, 0.0),
            Savings::Undefined => (keys::COMPARISON_UNDEFINED, f64::NAN),
        };
        println!(
            "{}",
            tr.fmt(
                key,
                &[
                    ("baseline", pair.baseline.as_str()),
                    ("alternative", pair.alternative.as_str()),
                    ("savings", display(savings, decimals).as_str()),
                    ("ratio", ratio.as_str()),
                ],
            )
        );
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    Ok(read_line_from(&mut io::stdin().lock())?)
}

/// 입력이 끝났으면(0 바이트) `UnexpectedEof`.
fn read_line_from(reader: &mut impl BufRead) -> io::Result<String> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(buf)
}

/// 입력 스트림이 닫혀 생긴 오류인지.
pub fn is_end_of_input(err: &AppError) -> bool {
    matches!(err, AppError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        match parse_finite(&read_line(prompt)?) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::INVALID_NUMBER)),
        }
    }
}

/// 빈 입력이면 None. 숫자가 아니어도 None 으로 보고 기본값을 쓰게 한다.
fn read_optional_f64(prompt: &str) -> Result<Option<f64>, AppError> {
    let raw = read_line(prompt)?;
    let v = parse_number(&raw);
    Ok(v.is_finite().then_some(v))
}

fn read_efficiency(prompt: &str) -> Result<Efficiency, AppError> {
    let raw = read_line(prompt)?;
    if raw.trim().is_empty() {
        return Ok(Efficiency::default());
    }
    Ok(raw.parse::<Efficiency>().unwrap_or_default())
}
