//! tsk session command implementations: login, logout, whoami.

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;

#[derive(Serialize)]
struct LoginReport {
    owner: String,
}

#[derive(Serialize)]
struct LogoutReport {
    previous_owner: Option<String>,
}

#[derive(Serialize)]
struct WhoamiReport {
    owner: String,
    source: &'static str,
}

pub fn run_login(owner: &str, config: Config, options: OutputOptions) -> Result<()> {
    let owner = session::login(&config.session_file(), owner)?;

    let mut human = HumanOutput::new(format!("Signed in as {owner}"));
    human.push_summary("owner", owner.clone());
    human.push_summary("session", config.session_file().display().to_string());

    emit_success(options, "login", &LoginReport { owner }, Some(&human))
}

pub fn run_logout(config: Config, options: OutputOptions) -> Result<()> {
    let previous_owner = session::logout(&config.session_file())?;

    let header = match &previous_owner {
        Some(owner) => format!("Signed out {owner}"),
        None => "No session to sign out".to_string(),
    };
    let mut human = HumanOutput::new(header);
    if previous_owner.is_none() {
        human.push_warning("no owner was signed in".to_string());
    }

    emit_success(options, "logout", &LogoutReport { previous_owner }, Some(&human))
}

pub fn run_whoami(cli_owner: Option<&str>, config: Config, options: OutputOptions) -> Result<()> {
    let (owner, source) = session::resolve_owner(&config.session_file(), cli_owner)?;

    let mut human = HumanOutput::new(format!("Signed in as {owner}"));
    human.push_summary("owner", owner.clone());
    human.push_summary("source", source.as_str());

    emit_success(
        options,
        "whoami",
        &WhoamiReport {
            owner,
            source: source.as_str(),
        },
        Some(&human),
    )
}
