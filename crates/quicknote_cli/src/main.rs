//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `quicknote_core` from `QUICKNOTE_*` environment configuration.
//! - Print deterministic facts (version, note count) for quick sanity checks.

use quicknote_core::{init_logging_from_config, AppConfig, AppModule, NoteStore};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("quicknote config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("quicknote logging disabled: {err}");
    }

    println!("quicknote_core ping={}", quicknote_core::ping());
    println!("quicknote_core version={}", quicknote_core::core_version());

    let module = match AppModule::open(&config) {
        Ok(module) => module,
        Err(err) => {
            eprintln!("quicknote storage error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match module.store().count().await {
        Ok(count) => {
            println!("quicknote_core db={} notes={count}", config.db_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("quicknote storage error: {err}");
            ExitCode::FAILURE
        }
    }
}
