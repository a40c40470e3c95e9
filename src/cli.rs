//! 명령줄 인터페이스. 하위 명령이 없으면 대화형 메뉴를 띄운다.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::app::AppError;
use crate::comparison::Scenario;
use crate::config::Config;
use crate::conversion;
use crate::demand::{compute_demand, DemandInput, EnergyReference};
use crate::efficiency::Efficiency;
use crate::format::{display, display_opt};
use crate::gas::{self, HeatingValue};
use crate::grid_feed::{self, FeedQuery, FeedTable};
use crate::hvac;
use crate::i18n::Translator;
use crate::input::parse_finite;
use crate::load::{compare_vintages, LoadInput, Vintage};
use crate::quantity::ConversionCategory;
use crate::series;
use crate::ui_cli;
use crate::units::{PowerUnit, Unit};

#[derive(Debug, Parser)]
#[command(name = "utility_calculator")]
#[command(version, about = "Energy unit conversion and utility cost estimation")]
pub struct Cli {
    /// 표시 언어 (ko / en / auto)
    #[arg(long, global = true)]
    pub lang: Option<String>,
    /// 설정 파일 경로
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// debug 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// 결과를 JSON 으로 출력
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 명령줄 숫자. `1,000` 처럼 구분 기호가 있어도 된다.
fn number(raw: &str) -> Result<f64, String> {
    parse_finite(raw).ok_or_else(|| format!("not a number: {raw}"))
}

fn timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    grid_feed::parse_timestamp(raw).ok_or_else(|| format!("not a timestamp: {raw}"))
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 분류 안에서 단위를 환산한다. `to` 를 생략하면 전체 단위로 환산한다.
    Convert {
        /// energy, power, temperature, flow, pressure
        category: String,
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: Option<String>,
        /// 고위발열량 [MMBtu/MCF]
        #[arg(long)]
        hv: Option<f64>,
    },
    TonsToBtuh {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
    },
    BtuhToTons {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
    },
    BtuhToMmbtuh {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
    },
    MmbtuhToBtuh {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
    },
    McfToMmbtu {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        #[arg(long)]
        hv: Option<f64>,
    },
    MmbtuToMcf {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        #[arg(long)]
        hv: Option<f64>,
    },
    McfToDth {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        #[arg(long)]
        hv: Option<f64>,
    },
    DthToMcf {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        #[arg(long)]
        hv: Option<f64>,
    },
    /// 냉방 톤을 시간당 가스 MCF 로 환산한다.
    TonsToMcf {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        tons: f64,
        /// 효율 (0.9, 90%, cop:3.5)
        #[arg(long, default_value = "1")]
        eff: Efficiency,
        #[arg(long)]
        hv: Option<f64>,
    },
    /// 순간 수요를 등가 열량률과 누적량으로 환산한다.
    Demand {
        #[arg(value_parser = number, allow_hyphen_values = true)]
        value: f64,
        /// 출력 단위 (Btu/h, kW, ton, CFH, MCF/h ...)
        unit: Option<String>,
        /// 운전 시간 [h]
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        eff: Option<Efficiency>,
        /// 입력 값이 투입 연료 기준
        #[arg(long)]
        input_fuel: bool,
        #[arg(long)]
        hv: Option<f64>,
    },
    /// 면적으로 냉난방 부하를 추정한다.
    Load {
        #[arg(value_parser = number)]
        area: f64,
        /// tight / average / leaky
        #[arg(long)]
        vintage: Option<Vintage>,
        /// 난방 밀도 재정의 [Btu/ft²·h]
        #[arg(long)]
        heating: Option<f64>,
        /// 냉방 밀도 재정의 [Btu/ft²·h]
        #[arg(long)]
        cooling: Option<f64>,
    },
    /// TOML 시나리오로 에너지원 비용/배출을 비교한다.
    Compare {
        #[arg(long)]
        scenario: PathBuf,
    },
    /// 저장된 계통 피드(JSON/CSV)를 요약한다.
    Feed {
        file: PathBuf,
        /// content-type 지정 (예: text/csv)
        #[arg(long)]
        content_type: Option<String>,
        /// 연료별 발전량 피드로 해석
        #[arg(long)]
        gen_by_fuel: bool,
        /// 이 시각 이후 항목만 (UTC)
        #[arg(long, value_parser = timestamp)]
        start: Option<DateTime<Utc>>,
        /// 이 시각 이전 항목만 (UTC)
        #[arg(long, value_parser = timestamp)]
        end: Option<DateTime<Utc>>,
        /// 최대 항목 수
        #[arg(long)]
        rows: Option<usize>,
    },
}

fn hhv_or(cli_hv: Option<f64>, config: &Config) -> f64 {
    cli_hv.map_or_else(|| config.hhv(), HeatingValue::or_default).mmbtu_per_mcf()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 하위 명령 하나를 실행한다.
pub fn run_command(
    command: Command,
    config: &Config,
    tr: &Translator,
    json: bool,
) -> Result<(), AppError> {
    let decimals = config.display.decimals;
    let scalar = |v: f64| -> Result<(), AppError> {
        if json {
            print_json(&v)
        } else {
            println!("{}", display(v, decimals));
            Ok(())
        }
    };
    debug!(?command, "running command");

    match command {
        Command::Convert {
            category,
            value,
            from,
            to,
            hv,
        } => {
            let category: ConversionCategory = category.parse()?;
            let hhv = hhv_or(hv, config);
            match to {
                Some(to) => scalar(conversion::convert(category, value, &from, &to, hhv)?),
                None => {
                    let rows = conversion::convert_to_all(category, value, &from, hhv)?;
                    if json {
                        print_json(&rows)
                    } else {
                        ui_cli::print_conversion_table(tr, &rows, decimals);
                        Ok(())
                    }
                }
            }
        }
        Command::TonsToBtuh { value } => scalar(hvac::tons_to_btuh(value)),
        Command::BtuhToTons { value } => scalar(hvac::btuh_to_tons(value)),
        Command::BtuhToMmbtuh { value } => scalar(hvac::btuh_to_mmbtuh(value)),
        Command::MmbtuhToBtuh { value } => scalar(hvac::mmbtuh_to_btuh(value)),
        Command::McfToMmbtu { value, hv } => scalar(gas::mcf_to_mmbtu(value, hhv_or(hv, config))),
        Command::MmbtuToMcf { value, hv } => scalar(gas::mmbtu_to_mcf(value, hhv_or(hv, config))),
        Command::McfToDth { value, hv } => scalar(gas::mcf_to_dth(value, hhv_or(hv, config))),
        Command::DthToMcf { value, hv } => scalar(gas::dth_to_mcf(value, hhv_or(hv, config))),
        Command::TonsToMcf { tons, eff, hv } => {
            scalar(hvac::tons_to_mcf_per_hour(tons, eff, hhv_or(hv, config)))
        }
        Command::Demand {
            value,
            unit,
            hours,
            eff,
            input_fuel,
            hv,
        } => {
            let unit = match unit {
                Some(raw) => PowerUnit::parse(&raw).ok_or(conversion::ConversionError::UnknownUnit {
                    category: ConversionCategory::Power,
                    unit: raw,
                })?,
                None => config.default_units.power,
            };
            let result = compute_demand(DemandInput {
                value,
                unit,
                hhv: hhv_or(hv, config),
                operating_hours: hours.unwrap_or(config.demand.operating_hours),
                reference: if input_fuel {
                    EnergyReference::InputFuel
                } else {
                    EnergyReference::Delivered
                },
                efficiency: eff.unwrap_or_default(),
            });
            if json {
                print_json(&result)
            } else {
                ui_cli::print_demand(tr, &result, decimals);
                Ok(())
            }
        }
        Command::Load {
            area,
            vintage,
            heating,
            cooling,
        } => {
            let vintage = vintage.unwrap_or(config.load.vintage);
            let rows = compare_vintages(LoadInput {
                floor_area_ft2: area,
                vintage,
                heating_override: heating,
                cooling_override: cooling,
            });
            if json {
                print_json(&rows)
            } else {
                ui_cli::print_load(tr, vintage, &rows, decimals);
                Ok(())
            }
        }
        Command::Compare { scenario } => {
            let comparison = Scenario::load(&scenario)?.run();
            if json {
                print_json(&comparison)
            } else {
                ui_cli::print_comparison(tr, &comparison, decimals);
                Ok(())
            }
        }
        Command::Feed {
            file,
            content_type,
            gen_by_fuel,
            start,
            end,
            rows,
        } => {
            let query = FeedQuery {
                start,
                end,
                row_count: rows,
            };
            query.validate()?;
            let body = fs::read_to_string(&file)?;
            let content_type = content_type.or_else(|| {
                file.extension()
                    .filter(|ext| ext.eq_ignore_ascii_case("csv"))
                    .map(|_| "text/csv".to_string())
            });
            let table = grid_feed::parse_feed(&body, content_type.as_deref())?;
            if gen_by_fuel {
                print_generation(&table, &query, json, decimals)
            } else if json {
                print_json(&table)
            } else {
                println!("rows: {}", table.rows.len());
                println!("columns: {}", table.columns.join(", "));
                println!("timestamp columns: {}", table.timestamp_columns().join(", "));
                Ok(())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct FuelSummary {
    fuel_type: String,
    peak: series::Peak,
    range: series::MinMax,
}

fn print_generation(
    table: &FeedTable,
    query: &FeedQuery,
    json: bool,
    decimals: usize,
) -> Result<(), AppError> {
    let snapshot = query.select(grid_feed::gen_by_fuel(table))?;
    let summaries: Vec<FuelSummary> = grid_feed::fuel_types(&snapshot.items)
        .into_iter()
        .map(|fuel| {
            let points = grid_feed::generation_series(&snapshot.items, &fuel);
            FuelSummary {
                peak: series::compute_peak(&points),
                range: series::compute_min_max(&points),
                fuel_type: fuel,
            }
        })
        .collect();
    if json {
        return print_json(&summaries);
    }
    let latest = snapshot
        .latest_timestamp
        .map_or_else(|| "–".to_string(), |t| t.to_rfc3339());
    println!("items: {}, latest: {latest}", snapshot.items.len());
    for s in &summaries {
        let at = s.peak.timestamp.map_or_else(String::new, |t| t.to_rfc3339());
        println!(
            "  {:<16} peak {:>12} MW {at}  min {:>12}  max {:>12}",
            s.fuel_type,
            display(s.peak.value, decimals),
            display_opt(s.range.min, decimals),
            display_opt(s.range.max, decimals),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_HHV_MMBTU_PER_MCF;
    use crate::grid_feed::FeedError;
    use crate::i18n::Language;
    use clap::CommandFactory;

    const SCENARIO: &str = r#"
[usage]
value = 50.0
unit = "mmbtu"

[[sources]]
name = "Oil boiler"
rate = 3.90
billing_unit = "gallon_fuel_oil"
efficiency = 0.82
fuel = "fuel_oil"

[[sources]]
name = "District steam"
rate = 28.0
billing_unit = "mlb"
efficiency = "100%"
fuel = "steam"
"#;

    fn dispatch(args: &[&str]) -> Result<(), AppError> {
        let cli = Cli::try_parse_from(std::iter::once("utility_calculator").chain(args.iter().copied()))
            .unwrap();
        let tr = Translator::new(Language::En);
        run_command(cli.command.unwrap(), &Config::default(), &tr, cli.json)
    }

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("utility_calculator_cli_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn invalid_heating_value_flag_uses_default() {
        let config = Config::default();
        assert_eq!(hhv_or(Some(0.0), &config), DEFAULT_HHV_MMBTU_PER_MCF);
        assert_eq!(hhv_or(Some(-2.0), &config), DEFAULT_HHV_MMBTU_PER_MCF);
        assert_eq!(hhv_or(Some(1.02), &config), 1.02);
        assert_eq!(hhv_or(None, &config), DEFAULT_HHV_MMBTU_PER_MCF);
        assert!(dispatch(&["mmbtu-to-mcf", "10", "--hv", "0"]).is_ok());
    }

    #[test]
    fn demand_dispatch() {
        assert!(dispatch(&["demand", "1000000", "btu/h", "--input-fuel", "--eff", "80%"]).is_ok());
        assert!(dispatch(&["demand", "3000", "ton", "--hours", "8", "--json"]).is_ok());
        assert!(matches!(
            dispatch(&["demand", "1", "furlong/h"]),
            Err(AppError::Conversion(_))
        ));
    }

    #[test]
    fn compare_dispatch() {
        let path = temp_file("scenario.toml", SCENARIO);
        assert!(dispatch(&["compare", "--scenario", path.to_str().unwrap()]).is_ok());
        assert!(dispatch(&["compare", "--scenario", path.to_str().unwrap(), "--json"]).is_ok());
        let missing = path.with_file_name("missing.toml");
        assert!(matches!(
            dispatch(&["compare", "--scenario", missing.to_str().unwrap()]),
            Err(AppError::Scenario(_))
        ));
    }

    #[test]
    fn feed_dispatch() {
        let body = r#"{"data": [
            {"datetimeBeginningUtc": "2024-01-15T05:00:00Z", "fuelType": "Gas", "MW": 35000},
            {"datetimeBeginningUtc": "2024-01-15T06:00:00Z", "fuelType": "Gas", "MW": 34000}
        ], "columns": ["datetimeBeginningUtc", "fuelType", "MW"]}"#;
        let path = temp_file("feed.json", body);
        let file = path.to_str().unwrap();
        assert!(dispatch(&["feed", file, "--gen-by-fuel", "--rows", "1"]).is_ok());
        assert!(matches!(
            dispatch(&[
                "feed",
                file,
                "--start",
                "2024-01-15T06:00:00Z",
                "--end",
                "2024-01-15T05:00:00Z",
            ]),
            Err(AppError::Feed(FeedError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_named_conversion_with_separator() {
        let cli = Cli::try_parse_from(["utility_calculator", "tons-to-btuh", "1,000"]).unwrap();
        match cli.command {
            Some(Command::TonsToBtuh { value }) => assert_eq!(value, 1_000.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_efficiency_and_vintage() {
        let cli = Cli::try_parse_from([
            "utility_calculator",
            "tons-to-mcf",
            "3000",
            "--eff",
            "80%",
            "--hv",
            "1.02",
        ])
        .unwrap();
        match cli.command {
            Some(Command::TonsToMcf { tons, eff, hv }) => {
                assert_eq!(tons, 3_000.0);
                assert_eq!(eff, Efficiency::Percentage(80.0));
                assert_eq!(hv, Some(1.02));
            }
            other => panic!("unexpected {other:?}"),
        }
        let cli =
            Cli::try_parse_from(["utility_calculator", "load", "2000", "--vintage", "leaky"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Load {
                vintage: Some(Vintage::Leaky),
                ..
            })
        ));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["utility_calculator", "--lang", "en"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.lang.as_deref(), Some("en"));
    }

    #[test]
    fn negative_values_accepted() {
        let cli = Cli::try_parse_from(["utility_calculator", "convert", "temperature", "-40", "C", "F"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Convert { value, .. }) if value == -40.0
        ));
    }
}
