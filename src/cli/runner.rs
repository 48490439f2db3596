//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, CredentialKind, OutputFormat};
use crate::config::{env, AppConfig};
use crate::connector::{
    parse_service_account, read_certificate, read_private_key, AccountType, ConnectorApiService,
    ConnectorConfigEditor, CrawlingManagerClient, CredentialFile, ScheduledConfig,
};
use crate::docs::{all_modules, ApiDocsService};
use crate::error::{Error, Result, ResultExt};
use crate::types::{JsonObject, JsonValue, SyncStrategy};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port } => {
                if let Some(port) = port {
                    config.port = *port;
                }
                crate::cli::serve(&config).await
            }
            Commands::Modules => self.output(&all_modules()),
            Commands::Endpoints {
                module,
                with_python,
            } => self.endpoints(&config, module.as_deref(), *with_python).await,
            Commands::Merge {
                output,
                with_python,
            } => self.merge(&config, output, *with_python).await,
            Commands::CheckCredential { kind, file } => self.check_credential(*kind, file),
            Commands::Configure {
                connector,
                values,
                business,
                service_account,
                certificate,
                private_key,
            } => {
                let uploads = Uploads {
                    service_account: service_account.as_deref(),
                    certificate: certificate.as_deref(),
                    private_key: private_key.as_deref(),
                };
                self.configure(&config, connector, values, *business, &uploads)
                    .await
            }
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        match &self.cli.config {
            Some(path) => AppConfig::load(path),
            None => AppConfig::from_env(),
        }
    }

    async fn docs_service(&self, config: &AppConfig, with_python: bool) -> Result<ApiDocsService> {
        let service = ApiDocsService::new(config.docs.clone())?;
        if with_python {
            let outcome = service.init().await;
            info!("{}", outcome.message);
        }
        Ok(service)
    }

    async fn endpoints(
        &self,
        config: &AppConfig,
        module: Option<&str>,
        with_python: bool,
    ) -> Result<()> {
        let service = self.docs_service(config, with_python).await?;
        match module {
            Some(id) => self.output(&service.module(id).await?.endpoints),
            None => self.output(&service.endpoints().await),
        }
    }

    async fn merge(&self, config: &AppConfig, output: &Path, with_python: bool) -> Result<()> {
        let service = self.docs_service(config, with_python).await?;
        let document = service.openapi_document().await;

        let is_yaml = output
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let text = if is_yaml {
            serde_yaml::to_string(&document)?
        } else {
            serde_json::to_string_pretty(&document)?
        };
        std::fs::write(output, text)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        self.output(&json!({
            "output": output.display().to_string(),
            "paths": document.paths.len(),
            "operations": document.operation_count(),
            "pythonSpecLoaded": service.python_spec_loaded().await
        }))
    }

    fn check_credential(&self, kind: CredentialKind, path: &Path) -> Result<()> {
        let file = CredentialFile::read(path)?;
        let details = match kind {
            CredentialKind::ServiceAccount => {
                let key = parse_service_account(&file)?;
                json!({
                    "projectId": key.project_id,
                    "clientEmail": key.client_email,
                    "clientId": key.client_id
                })
            }
            CredentialKind::Certificate => {
                read_certificate(&file)?;
                json!({})
            }
            CredentialKind::PrivateKey => {
                read_private_key(&file)?;
                json!({})
            }
        };
        self.output(&json!({
            "valid": true,
            "file": file.name,
            "kind": format!("{kind:?}"),
            "details": details
        }))
    }

    async fn configure(
        &self,
        config: &AppConfig,
        connector: &str,
        values_path: &Path,
        business: bool,
        uploads: &Uploads<'_>,
    ) -> Result<()> {
        let values: JsonValue = serde_json::from_str(&read_text(values_path)?)
            .with_context(|| format!("Invalid values file {}", values_path.display()))?;
        if config.backend.token.is_none() {
            return Err(Error::missing_field(env::ADMIN_JWT_TOKEN));
        }

        let api = ConnectorApiService::from_config(&config.backend)?;
        let info = api.get_connector(connector).await?;
        let schema = api.get_schema(connector).await?;
        let stored = api.get_config(connector).await?;

        let account_type = if business {
            AccountType::Business
        } else {
            AccountType::Individual
        };
        let mut editor = ConnectorConfigEditor::new(info, schema, stored, account_type);
        apply_values(&mut editor, &values)?;

        if let Some(path) = uploads.service_account {
            editor.upload_service_account(&CredentialFile::read(path)?)?;
        }
        if let Some(path) = uploads.certificate {
            editor.upload_certificate(&CredentialFile::read(path)?)?;
        }
        if let Some(path) = uploads.private_key {
            editor.upload_private_key(&CredentialFile::read(path)?)?;
        }

        let scheduler = CrawlingManagerClient::new(api.http().clone());
        match editor.save(&api, &scheduler).await {
            Ok(report) => self.output(&report),
            Err(e) => {
                if !editor.errors().is_empty() {
                    self.output(&json!({ "errors": editor.errors() }))?;
                }
                Err(e)
            }
        }
    }

    /// Output a value in the selected format
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Credential files passed to `configure`
struct Uploads<'a> {
    service_account: Option<&'a Path>,
    certificate: Option<&'a Path>,
    private_key: Option<&'a Path>,
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })
}

/// Apply a values file shaped like a connector config to the editor
///
/// `sync.selectedStrategy` and `sync.scheduledConfig` go through the
/// strategy setters; every other key is a plain field value.
pub fn apply_values(editor: &mut ConnectorConfigEditor, values: &JsonValue) -> Result<()> {
    let section = |name: &str| -> JsonObject {
        values
            .get(name)
            .and_then(JsonValue::as_object)
            .cloned()
            .unwrap_or_default()
    };

    for (key, value) in section("auth") {
        if key != "authType" {
            editor.set_auth_value(key, value);
        }
    }

    let mut sync = section("sync");
    if let Some(scheduled) = sync.remove("scheduledConfig") {
        let scheduled: ScheduledConfig = serde_json::from_value(scheduled)?;
        editor.set_scheduled_config(scheduled);
    }
    if let Some(strategy) = sync.remove("selectedStrategy") {
        let strategy: SyncStrategy = serde_json::from_value(strategy)?;
        editor.set_sync_strategy(strategy)?;
    }
    for (key, value) in sync {
        editor.set_sync_value(key, value);
    }

    let filters = section("filters");
    let filter_group = |name: &str| -> JsonObject {
        filters
            .get(name)
            .and_then(JsonValue::as_object)
            .cloned()
            .unwrap_or_default()
    };
    for (key, value) in filter_group("sync") {
        editor.set_sync_filter(key, value);
    }
    for (key, value) in filter_group("indexing") {
        editor.set_indexing_filter(key, value);
    }
    Ok(())
}
