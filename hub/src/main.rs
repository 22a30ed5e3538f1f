//! Maintenance Hub - role-gated predictive maintenance views

use anyhow::{bail, Context};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use access_gate::{AccessGate, FilePolicySource, Identity, RequestContext, View};
use audit_ledger::AuditRecorder;
use health_engine::EngineConfig;
use maintenance_hub::{
    config::{Args, Command, DataMode},
    source::MockTelemetrySource,
    views::ViewLoader,
};
use reply_adapter::{ChatService, MockAssistant};

fn context(email: Option<String>, role: Option<String>) -> RequestContext {
    match (email, role) {
        (None, None) => RequestContext::anonymous(),
        (email, role) => RequestContext::identified(Identity::new(
            email.unwrap_or_else(|| access_gate::ANONYMOUS_EMAIL.to_string()),
            role.unwrap_or_default(),
        )),
    }
}

fn load_engine_config(args: &Args) -> anyhow::Result<EngineConfig> {
    match &args.engine_config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading engine config {}", path.display()))?;
            EngineConfig::from_yaml(&text)
                .with_context(|| format!("parsing engine config {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn require_local_mode(mode: &DataMode) -> anyhow::Result<()> {
    if let DataMode::Warehouse { host, .. } = mode {
        bail!(
            "no warehouse client in this build (WAREHOUSE_HOST={}); unset WAREHOUSE_ID to run on local mock data",
            host
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("maintenance_hub={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let mode = args.data_mode();
    info!("======================================");
    info!("  Predictive Maintenance Hub");
    info!("======================================");
    match &mode {
        DataMode::Warehouse { host, warehouse_id } => {
            info!("Data: warehouse {} ({})", host, warehouse_id)
        }
        DataMode::LocalMock => info!("Data: local mock mode"),
    }
    info!("Roles: {}", args.roles_path.display());
    info!("Audit log: {}", args.audit_log_path.display());

    let gate = AccessGate::new(FilePolicySource::new(&args.roles_path));

    match args.command.clone() {
        Command::Check => {
            match gate.snapshot() {
                Some(policy) => {
                    let mut roles: Vec<&str> = policy.role_names().collect();
                    roles.sort_unstable();
                    info!("Policy OK: roles [{}], admin {}", roles.join(", "), policy.admin_email());
                }
                None => warn!("Policy unavailable; every caller is denied"),
            }
            let config = load_engine_config(&args)?;
            info!(
                "Engine: baseline window {}, sigma {}, band {}x{}",
                config.baseline_window, config.sigma, config.band_window, config.band_k
            );
        }

        Command::Views { email, role } => {
            let ctx = context(email, role);
            let set = gate.decide(ctx.identity.as_ref());
            let names: Vec<&str> = set.views().iter().map(View::name).collect();
            println!("{} ({}): {}", ctx.email(), set.role, names.join(", "));
            if set.shows_request_access() {
                let policy = gate.snapshot();
                let request = access_gate::AccessRequest::new(&ctx, policy.as_ref());
                println!("Request access: {}", request.mailto());
            }
        }

        Command::Load { view, email, role } => {
            require_local_mode(&mode)?;
            let Some(view) = View::from_name(&view) else {
                bail!("unknown view '{}'", view);
            };
            let loader = ViewLoader::new(
                gate,
                Arc::new(MockTelemetrySource::new()),
                AuditRecorder::open_jsonl(&args.audit_log_path),
            )
            .with_config(load_engine_config(&args)?);

            let outcome = loader.load(&context(email, role), view).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Ask {
            question,
            email,
            role,
            conversation,
        } => {
            require_local_mode(&mode)?;
            let chat = ChatService::new(
                Arc::new(MockAssistant::default()),
                AuditRecorder::open_jsonl(&args.audit_log_path),
            );

            let turn = chat
                .respond(&context(email, role), &question, &[], conversation.as_deref())
                .await;
            match turn.payload {
                Some(payload) => {
                    println!("{}", payload.content);
                    println!("{}", turn.source_label);
                    if let Some(id) = turn.conversation_id {
                        println!("Conversation: {}", id);
                    }
                }
                None => warn!("Question rejected: empty or too long"),
            }
        }
    }

    Ok(())
}
