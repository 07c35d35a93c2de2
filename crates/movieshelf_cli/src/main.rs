//! CLI smoke probe.
//!
//! # Responsibility
//! - Open the store at its default location and report where it lives.
//! - Print per-entity counts as a quick sanity check of the data layer.

use movieshelf_core::{
    core_version, init_logging, BaseModel, ContextProvider, LoggingConfig, Movie, Recipe, Review,
    StoreConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = StoreConfig::default();

    match LoggingConfig::with_default_level(config.directory().join("logs")) {
        Ok(logging) => {
            if let Err(err) = init_logging(&logging) {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let provider = match ContextProvider::init_shared(&config) {
        Ok(provider) => provider,
        Err(err) => {
            log::error!("event=cli_start module=cli status=error error={err}");
            eprintln!("failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("movieshelf_core version={}", core_version());
    println!("store={}", config.store_path().display());

    let ctx = provider.current_context();
    println!("movies={}", Movie::all(&ctx).len());
    println!("reviews={}", Review::all(&ctx).len());
    println!("recipes={}", Recipe::all(&ctx).len());

    ExitCode::SUCCESS
}
