//! Configuration view and setup commands: `trellis config`.

use std::path::Path;

use anyhow::Result;
use trellis::config::{
    ENV_API_URL, ENV_PORT, ENV_PROXY_BACKEND_URL, ENV_SESSION_FILE, TrellisToml,
};

use super::super::ConfigCommands;
use super::Context;

pub fn cmd_config(ctx: &Context, config_path: &Path, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Trellis Configuration");
            println!("=====================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No trellis.toml found at {}", config_path.display());
                println!("Run 'trellis config init' to create one.");
            }
            println!();

            // Effective values after file, environment and flags
            let config = &ctx.config;
            println!("Effective values:");
            println!("  api.url           = \"{}\"", config.api_url);
            println!("  proxy.backend_url = \"{}\"", config.proxy_backend_url);
            println!("  proxy.port        = {}", config.proxy_port);
            println!("  session.file      = \"{}\"", config.session_file.display());
            println!();
            println!("Environment overrides:");
            for key in [ENV_API_URL, ENV_PROXY_BACKEND_URL, ENV_PORT, ENV_SESSION_FILE] {
                match std::env::var(key) {
                    Ok(value) => println!("  {} = {}", key, value),
                    Err(_) => println!("  {} (unset)", key),
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("trellis.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            TrellisToml::with_defaults().save(config_path)?;

            println!("Created trellis.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] url for the board API used by the CLI");
            println!("  - [proxy] backend_url, port for `trellis serve`");
            println!("  - [session] file where the login cookie is kept");
            println!();
        }
    }

    Ok(())
}
