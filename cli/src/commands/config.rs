use color_eyre::eyre::{bail, Result, WrapErr};

use crate::config::{config_path, UserConfig};

pub fn run(path: bool, reset: bool, edit: bool) -> Result<()> {
    let config_file = config_path();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        UserConfig::default()
            .save()
            .wrap_err_with(|| format!("writing {}", config_file.display()))?;
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    if edit {
        if !config_file.exists() {
            UserConfig::default().save()?;
        }

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
        let status = std::process::Command::new(&editor)
            .arg(&config_file)
            .status()
            .wrap_err_with(|| format!("launching {}", editor))?;
        if !status.success() {
            bail!("{} exited with {}", editor, status);
        }

        return Ok(());
    }

    let config = UserConfig::load();
    if config_file.exists() {
        println!("Config file: {}", config_file.display());
    } else {
        println!("No config file at {}, using defaults", config_file.display());
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
