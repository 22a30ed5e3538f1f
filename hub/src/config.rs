//! Startup configuration.
//!
//! CLI arguments and environment variables via clap; `.env` is loaded by
//! the binary before parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Predictive Maintenance Intelligence Hub
#[derive(Parser, Debug, Clone)]
#[command(name = "maintenance-hub")]
#[command(about = "Role-gated predictive maintenance views and audit trail")]
pub struct Args {
    /// Data warehouse endpoint
    #[arg(long, env = "WAREHOUSE_HOST")]
    pub warehouse_host: Option<String>,

    /// Data warehouse access token
    #[arg(long, env = "WAREHOUSE_TOKEN", hide_env_values = true)]
    pub warehouse_token: Option<String>,

    /// Warehouse identifier; unset runs in local mock mode
    #[arg(long, env = "WAREHOUSE_ID")]
    pub warehouse_id: Option<String>,

    /// Role policy file, re-read on every access decision
    #[arg(long, env = "ROLES_PATH", default_value = "governance/roles.yaml")]
    pub roles_path: PathBuf,

    /// Append-only audit log (JSONL)
    #[arg(long, env = "AUDIT_LOG_PATH", default_value = "logs/audit.jsonl")]
    pub audit_log_path: PathBuf,

    /// Optional engine tuning file (YAML)
    #[arg(long, env = "ENGINE_CONFIG")]
    pub engine_config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Hub commands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate startup configuration and report the data mode
    Check,

    /// Show the views an identity may see
    Views {
        /// Caller email; omit for an anonymous caller
        #[arg(long)]
        email: Option<String>,
        /// Caller role
        #[arg(long)]
        role: Option<String>,
    },

    /// Load a view and print its report as JSON
    Load {
        /// View name, e.g. "Engine Health"
        view: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },

    /// Ask the assistant a question
    Ask {
        question: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Conversation to continue
        #[arg(long)]
        conversation: Option<String>,
    },
}

/// Where telemetry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMode {
    /// Remote SQL warehouse
    Warehouse { host: String, warehouse_id: String },
    /// Deterministic in-process data
    LocalMock,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Args {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if present(&self.warehouse_id).is_some() && present(&self.warehouse_host).is_none() {
            return Err("WAREHOUSE_HOST must be set when WAREHOUSE_ID is set".to_string());
        }
        if self.roles_path.as_os_str().is_empty() {
            return Err("ROLES_PATH must not be empty".to_string());
        }
        Ok(())
    }

    /// Data mode implied by the warehouse settings.
    pub fn data_mode(&self) -> DataMode {
        match (present(&self.warehouse_id), present(&self.warehouse_host)) {
            (Some(id), Some(host)) => DataMode::Warehouse {
                host: host.to_string(),
                warehouse_id: id.to_string(),
            },
            _ => DataMode::LocalMock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["maintenance-hub"];
        argv.extend_from_slice(extra);
        argv.push("check");
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_mock_mode() {
        let args = args(&[]);
        assert_eq!(args.roles_path, PathBuf::from("governance/roles.yaml"));
        assert_eq!(args.audit_log_path, PathBuf::from("logs/audit.jsonl"));
        assert!(args.validate().is_ok());
        assert_eq!(args.data_mode(), DataMode::LocalMock);
    }

    #[test]
    fn test_warehouse_id_requires_host() {
        let args = args(&["--warehouse-id", "wh-1"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_warehouse_mode() {
        let args = args(&["--warehouse-id", "wh-1", "--warehouse-host", "https://dbc.example.com"]);
        assert!(args.validate().is_ok());
        assert_eq!(
            args.data_mode(),
            DataMode::Warehouse {
                host: "https://dbc.example.com".to_string(),
                warehouse_id: "wh-1".to_string()
            }
        );
    }

    #[test]
    fn test_load_subcommand() {
        let args = Args::try_parse_from([
            "maintenance-hub",
            "load",
            "Engine Health",
            "--role",
            "engineer",
        ])
        .unwrap();
        match args.command {
            Command::Load { view, role, email } => {
                assert_eq!(view, "Engine Health");
                assert_eq!(role.as_deref(), Some("engineer"));
                assert!(email.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
