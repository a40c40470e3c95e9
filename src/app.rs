use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::comparison::ScenarioError;
use crate::config::{Config, ConfigError};
use crate::conversion::ConversionError;
use crate::grid_feed::FeedError;
use crate::i18n::{self, Translator};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 언어팩 기본 디렉터리.
pub const LOCALES_DIR: &str = "locales";

/// 설정의 언어로 번역기를 만든다. `cli_lang` 이 있으면 우선한다.
pub fn translator_for(cli_lang: Option<&str>, config: &Config) -> Translator {
    let lang = i18n::resolve_language(cli_lang, Some(&config.language));
    Translator::with_pack(lang, Path::new(LOCALES_DIR))
}

/// 대화형 메뉴 루프를 실행한다. 설정이 바뀌면 `config_path` 에 저장한다.
/// 입력이 닫히면 종료 메뉴를 고른 것과 같다.
pub fn run(config: &mut Config, config_path: &Path, tr: &mut Translator) -> Result<(), AppError> {
    loop {
        match step(config, config_path, tr) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if ui_cli::is_end_of_input(&err) => {
                info!("input closed, exiting");
                config.save_to(config_path)?;
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// 메뉴 한 번. 계속하면 `true`.
fn step(config: &mut Config, config_path: &Path, tr: &mut Translator) -> Result<bool, AppError> {
    match ui_cli::main_menu(tr)? {
        MenuChoice::UnitConversion => ui_cli::handle_unit_conversion(tr, config)?,
        MenuChoice::Demand => ui_cli::handle_demand(tr, config)?,
        MenuChoice::Load => ui_cli::handle_load(tr, config)?,
        MenuChoice::Comparison => ui_cli::handle_comparison(tr, config)?,
        MenuChoice::Settings => {
            let previous_language = config.language.clone();
            ui_cli::handle_settings(tr, config)?;
            config.save_to(config_path)?;
            if config.language != previous_language {
                info!(language = %config.language, "language changed");
                *tr = translator_for(None, config);
            }
            println!("{}", tr.t(i18n::keys::SETTINGS_SAVED));
        }
        MenuChoice::Exit => {
            config.save_to(config_path)?;
            println!("{}", tr.t(i18n::keys::APP_EXIT));
            return Ok(false);
        }
    }
    Ok(true)
}
