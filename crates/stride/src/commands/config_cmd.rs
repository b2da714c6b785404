//! Config subcommand handlers. These run without a server connection.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "page_size = {}", cfg.defaults.page_size);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(page_size) = p.page_size {
            let _ = writeln!(out, "page_size = {page_size}");
        }
    }

    out
}

/// Map a dialoguer / interactive IO failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Profile name from the flag, falling back to the active profile.
fn target_profile(explicit: Option<String>, global: &GlobalOpts, cfg: &Config) -> String {
    explicit.unwrap_or_else(|| config::active_profile_name(global, cfg))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("");
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();

            let mut out = String::new();
            for name in names {
                let marker = if name == default { " (default)" } else { "" };
                let _ = writeln!(out, "{name}{marker}");
            }
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: available.join(", "),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let name = target_profile(profile, global, &cfg);

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            config::store_token(&name, &token)?;
            if !global.quiet {
                eprintln!("Token stored in system keyring for profile '{name}'");
            }
            Ok(())
        }

        ConfigCommand::ClearToken { profile } => {
            let cfg = config::load_config_or_default();
            let name = target_profile(profile, global, &cfg);
            config::clear_token(&name)?;
            if !global.quiet {
                eprintln!("Token cleared for profile '{name}'");
            }
            Ok(())
        }
    }
}

// ── Guided init ─────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&name) {
        let overwrite = Confirm::new()
            .with_prompt(format!("Profile '{name}' exists; overwrite?"))
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !overwrite {
            return Ok(());
        }
    }

    let server: String = Input::new()
        .with_prompt("Server URL (e.g. https://club.example.org)")
        .interact_text()
        .map_err(prompt_err)?;
    let _: url::Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let insecure = Confirm::new()
        .with_prompt("Accept self-signed TLS certificates?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    let token = rpassword::prompt_password("API token (empty to skip): ").map_err(prompt_err)?;

    let mut profile = Profile {
        server,
        token: None,
        token_env: None,
        ca_cert: None,
        insecure: insecure.then_some(true),
        timeout: None,
        page_size: None,
    };

    if !token.is_empty() {
        let choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let selection = Select::new()
            .with_prompt("Where should the token be stored?")
            .items(choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        if selection == 0 {
            config::store_token(&name, &token)?;
        } else {
            profile.token = Some(token);
        }
    }

    if cfg.default_profile.is_none() || cfg.profiles.is_empty() {
        cfg.default_profile = Some(name.clone());
    }
    cfg.profiles.insert(name.clone(), profile);
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!(
            "Profile '{name}' saved to {}",
            config::config_path().display()
        );
    }
    Ok(())
}
