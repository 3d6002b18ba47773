use super::progress::is_interactive;
use super::{prompts, AppContext};
use crate::output::{new_table, Output};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use marquee_config::{is_usable_key, Config, API_KEY_ENV};
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init { force } => init_config(force, output),
        ConfigCommands::ApiKey { key } => configure_api_key(key, output),
    }
}

/// Where the active API key comes from
fn key_source(ctx: &AppContext) -> &'static str {
    if std::env::var(API_KEY_ENV).is_ok_and(|k| is_usable_key(&k)) {
        "environment"
    } else if ctx.credentials.tmdb_api_key().is_some_and(|k| is_usable_key(k)) {
        "credentials file"
    } else if ctx.config.tmdb.api_key.as_deref().is_some_and(is_usable_key) {
        "config file"
    } else {
        "not set"
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config_file = ctx.paths.config_file();
    let api_key = ctx.config.resolve_api_key(&ctx.credentials);
    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };
    let validation = ctx.config.validate();

    output.json(&json!({
        "config_file": config_file.display().to_string(),
        "config_file_exists": config_file.exists(),
        "watchlist_dir": ctx.paths.watchlist_dir().display().to_string(),
        "tmdb": {
            "base_url": &ctx.config.tmdb.base_url,
            "image_base_url": &ctx.config.tmdb.image_base_url,
            "api_key": api_key_display,
            "api_key_source": key_source(&ctx),
        },
        "watchlist": {
            "storage_key": &ctx.config.watchlist.storage_key,
        },
        "valid": validation.is_ok(),
    }));

    if !output.is_human() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at {}; using defaults. Run 'marquee config init' to create it.",
            config_file.display()
        ));
    }

    let section = |title: &str| Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold);

    let mut table = new_table();
    table.set_header(vec![section("Setting"), section("Value")]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("Watchlist Directory"), Cell::new(ctx.paths.watchlist_dir().display())]);
    table.add_row(vec![Cell::new("TMDB Base URL"), Cell::new(&ctx.config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&ctx.config.tmdb.image_base_url)]);
    table.add_row(vec![
        Cell::new("API Key"),
        Cell::new(format!("{} ({})", api_key_display, key_source(&ctx))),
    ]);
    table.add_row(vec![Cell::new("Watchlist Storage Key"), Cell::new(&ctx.config.watchlist.storage_key)]);
    output.table(&table);

    if let Err(e) = validation {
        output.warn(format!("Configuration is invalid: {}", e));
    }
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;

    let config_file = ctx.paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}; pass --force to overwrite it",
            config_file.display()
        ));
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));

    if ctx.config.resolve_api_key(&ctx.credentials).is_none() {
        output.info("Next: run 'marquee config api-key' to store your TMDB API key.");
    }
    Ok(())
}

fn configure_api_key(key: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;

    let key = match key {
        Some(key) => key,
        None if is_interactive() => prompts::prompt_secret("TMDB API key (v3)")?,
        None => {
            return Err(color_eyre::eyre::eyre!(
                "No key given; pass --key or run interactively"
            ))
        }
    };
    let key = key.trim().to_string();
    validate_api_key(&key).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    ctx.credentials.set_tmdb_api_key(key);
    ctx.credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "API key saved to {}",
        ctx.paths.credentials_file().display()
    ));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn validate_api_key(key: &str) -> Result<(), &'static str> {
    if key.chars().any(char::is_whitespace) {
        return Err("API key cannot contain whitespace");
    }
    if !is_usable_key(key) {
        return Err("API key is empty or still the placeholder value");
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    let len = s.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let head: String = s.chars().take(2).collect();
    let tail: String = s.chars().skip(len - 2).collect();
    format!("{}***{}", head, tail)
}
