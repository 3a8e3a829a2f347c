//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::auth::CredentialVerifier;
use crate::cli::{error, info, print_review_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::store;

/// Initialize a new songreviews.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'songreviews serve' to start the API");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    if let Err(e) = api::run_server(config, &host, port).await {
        error(&format!("Server failed: {}", e));
        return Err(e.into());
    }
    Ok(())
}

/// Register a user directly in the store
pub async fn add_user(config_path: Option<&Path>, username: &str, password: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;

    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for {}", username))
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    if username.trim().is_empty() || password.is_empty() {
        error("Username and password must not be empty");
        anyhow::bail!("invalid credentials");
    }

    let store = store::open_store(&config.database).await?;
    let verifier = CredentialVerifier::new(store, config.auth.bcrypt_cost)?;

    match verifier.register(username, &password).await {
        Ok(identity) => {
            success(&format!("Created user {} (id {})", identity.username, identity.id));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create user: {}", e));
            Err(e.into())
        }
    }
}

/// List stored reviews
pub async fn reviews(config_path: Option<&Path>, skip: i64, limit: i64, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let store = store::open_store(&config.database).await?;

    let reviews = store.list_reviews(skip, limit).await?;

    match format {
        OutputFormat::Table => {
            print_review_table(&reviews);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reviews)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&reviews)?;
            println!("{}", yaml);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    Ok(config)
}
