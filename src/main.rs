use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use utility_calculator::cli::{self, Cli};
use utility_calculator::i18n::{self, keys, Translator};
use utility_calculator::{app, config};

/// 로그는 stderr 로 보낸다. `RUST_LOG` 가 없으면 warn, `--verbose` 면 debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    // 하위 명령은 설정을 읽기만 하고, 대화형 메뉴만 기본 설정 파일을 만든다.
    let loaded = if args.command.is_some() {
        config::load(&config_path)
    } else {
        config::load_or_default(Some(&config_path))
    };
    let mut cfg = match loaded {
        Ok(cfg) => cfg,
        Err(err) => {
            let tr = Translator::new(i18n::resolve_language(args.lang.as_deref(), None));
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            return ExitCode::FAILURE;
        }
    };
    let mut tr = app::translator_for(args.lang.as_deref(), &cfg);

    let result = match args.command {
        Some(command) => cli::run_command(command, &cfg, &tr, args.json),
        None => app::run(&mut cfg, &config_path, &mut tr),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}
