//! portal-gate CLI
//!
//! Runs one authorization check against the configured Supabase project and
//! prints the decision as JSON.

use clap::Parser;
use portal_gate::{
    access_control::{RequiredRoles, Role},
    config::{AppConfig, LogFormat, load_config},
    gate::{AccessGate, GateRequest},
};
use serde_json::json;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Check whether a visitor may reach an admin portal route
#[derive(Parser, Debug)]
#[command(name = "portal-gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PORTAL_GATE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "PORTAL_GATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Route the visitor is trying to reach
    #[arg(long, default_value = "/")]
    path: String,

    /// Required role (repeatable); defaults to portal.default_required_roles
    #[arg(long = "role")]
    roles: Vec<Role>,

    /// Visitor's access token; without it the visitor is signed out
    #[arg(long, env = "PORTAL_GATE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Logging needs the config, so configuration errors go straight to stderr
    let config = load_config(args.config.as_deref())
        .inspect_err(|e| eprintln!("Failed to load configuration: {e}"))?;
    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        path = %args.path,
        "Running authorization check"
    );

    let required = if args.roles.is_empty() {
        config.portal.default_roles()
    } else {
        RequiredRoles::new(args.roles.iter().copied())
    };

    let gate = AccessGate::supabase(&config, args.access_token.as_deref())
        .inspect_err(|e| error!(error = %e, "Failed to create access gate"))?;

    let evaluation = gate
        .evaluate(GateRequest {
            session: None,
            required_roles: &required,
            destination: &args.path,
        })
        .await;

    let report = json!({
        "decision": evaluation.decision,
        "required_roles": required,
        "redirect": gate.redirect_for(evaluation.decision),
        "profile": evaluation.profile,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if evaluation.decision.is_granted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
