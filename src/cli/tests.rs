//! Tests for argument parsing and values files

use super::*;
use crate::connector::{AccountType, ConnectorConfigEditor, ConnectorInfo, ConnectorSchema};
use crate::types::SyncStrategy;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_parse_serve() {
    let cli = Cli::try_parse_from(["pipeshub-control", "serve", "--port", "4000"]).unwrap();
    assert!(matches!(cli.command, Commands::Serve { port: Some(4000) }));
    assert_eq!(cli.format, OutputFormat::Pretty);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "pipeshub-control",
        "endpoints",
        "--module",
        "connectors",
        "--with-python",
        "--config",
        "control.yaml",
        "--format",
        "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Endpoints {
            module,
            with_python,
        } => {
            assert_eq!(module.as_deref(), Some("connectors"));
            assert!(with_python);
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(cli.config.unwrap().to_str(), Some("control.yaml"));
    assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn test_parse_check_credential() {
    let cli = Cli::try_parse_from([
        "pipeshub-control",
        "check-credential",
        "private-key",
        "tenant.key",
    ])
    .unwrap();
    match cli.command {
        Commands::CheckCredential { kind, file } => {
            assert_eq!(kind, CredentialKind::PrivateKey);
            assert_eq!(file.to_str(), Some("tenant.key"));
        }
        other => panic!("unexpected command: {other:?}"),
    }

    assert!(Cli::try_parse_from(["pipeshub-control", "check-credential", "pfx", "a.pfx"]).is_err());
}

#[test]
fn test_parse_configure() {
    let cli = Cli::try_parse_from([
        "pipeshub-control",
        "configure",
        "--connector",
        "SharePoint Online",
        "--values",
        "sharepoint.json",
        "--business",
        "--certificate",
        "tenant.pem",
    ])
    .unwrap();
    match cli.command {
        Commands::Configure {
            connector,
            business,
            certificate,
            private_key,
            ..
        } => {
            assert_eq!(connector, "SharePoint Online");
            assert!(business);
            assert!(certificate.is_some());
            assert!(private_key.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_apply_values() {
    let mut info = ConnectorInfo::new("Confluence", "Atlassian");
    info.auth_type = "API_TOKEN".to_string();
    let mut editor = ConnectorConfigEditor::new(
        info,
        ConnectorSchema::default(),
        None,
        AccountType::Individual,
    );

    apply_values(
        &mut editor,
        &json!({
            "auth": { "authType": "IGNORED", "baseUrl": "https://acme.atlassian.net" },
            "sync": {
                "selectedStrategy": "SCHEDULED",
                "scheduledConfig": { "intervalMinutes": 30 },
                "batchSize": 20
            },
            "filters": { "indexing": { "spaces": ["ENG"] } }
        }),
    )
    .unwrap();

    let config = editor.build_config();
    assert_eq!(config.auth.auth_type, "API_TOKEN");
    assert_eq!(config.auth.values["baseUrl"], "https://acme.atlassian.net");
    assert_eq!(config.sync.selected_strategy, SyncStrategy::Scheduled);
    assert_eq!(config.sync.scheduled_config.unwrap().interval_minutes, 30);
    assert_eq!(config.sync.values["batchSize"], 20);
    assert_eq!(config.filters.indexing["spaces"], json!(["ENG"]));
}

#[test]
fn test_apply_values_rejects_unknown_strategy() {
    let mut editor = ConnectorConfigEditor::new(
        ConnectorInfo::new("Confluence", "Atlassian"),
        ConnectorSchema::default(),
        None,
        AccountType::Individual,
    );
    let err = apply_values(&mut editor, &json!({ "sync": { "selectedStrategy": "HOURLY" } }));
    assert!(err.is_err());
}
