//! Connector configuration editor
//!
//! Holds the state of one configuration session: a two-step wizard
//! (`Auth` then `Sync`), the values entered so far, uploaded credential
//! material and the field errors of the last validation.
//!
//! # Save flow
//!
//! 1. Validate both steps; any field error aborts.
//! 2. Build the `ConnectorConfig` and PUT it to the backend. A failure here
//!    sets the banner message and aborts.
//! 3. If the connector is active and its schedule changed, add, update or
//!    remove the Crawling Manager schedule. Failures are logged and reported
//!    but the save still succeeds.

use super::api::ConnectorBackend;
use super::credentials::{
    fields, parse_service_account, read_certificate, read_private_key, CredentialFile,
};
use super::scheduler::{ScheduleRequest, Scheduler};
use super::schema::{defaults_for, is_empty_value, ConnectorSchema};
use super::types::{
    AuthSection, ConnectorConfig, ConnectorInfo, FiltersSection, ScheduledConfig, SyncSection,
};
use super::validation::{is_valid_email, validate_fields, visible_values, FieldErrors};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, SyncStrategy};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Auth field holding the Google Workspace admin address
pub const ADMIN_EMAIL_FIELD: &str = "adminEmail";

const GOOGLE_WORKSPACE_GROUP: &str = "Google Workspace";
const SHAREPOINT_CONNECTOR: &str = "SharePoint Online";
const SCHEDULE_INTERVAL_FIELD: &str = "scheduledConfig.intervalMinutes";

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Auth,
    Sync,
}

/// Kind of account the connector is configured for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Individual,
    Business,
}

/// Schedule change triggered by a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleAction {
    Add,
    Update,
    Remove,
}

/// What happened to the schedule during a save
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// Connector inactive or schedule unchanged
    NotRequired,
    Applied { action: ScheduleAction },
    /// The config was saved but the scheduler call failed
    Failed {
        action: ScheduleAction,
        message: String,
    },
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReport {
    pub config: ConnectorConfig,
    pub schedule: ScheduleOutcome,
}

/// Schedule action needed to go from `old` to `new`
///
/// Inactive connectors have no schedule to maintain.
pub fn schedule_action(
    is_active: bool,
    old: &SyncSection,
    new: &SyncSection,
) -> Option<ScheduleAction> {
    if !is_active {
        return None;
    }
    match (old.selected_strategy, new.selected_strategy) {
        (SyncStrategy::Scheduled, SyncStrategy::Manual) => Some(ScheduleAction::Remove),
        (SyncStrategy::Manual, SyncStrategy::Scheduled) => Some(ScheduleAction::Add),
        (SyncStrategy::Scheduled, SyncStrategy::Scheduled)
            if old.scheduled_config != new.scheduled_config =>
        {
            Some(ScheduleAction::Update)
        }
        _ => None,
    }
}

/// Editing session for one connector
#[derive(Debug, Clone)]
pub struct ConnectorConfigEditor {
    connector: ConnectorInfo,
    schema: ConnectorSchema,
    account_type: AccountType,
    step: WizardStep,
    auth_type: String,
    auth_values: JsonObject,
    strategy: SyncStrategy,
    scheduled: Option<ScheduledConfig>,
    sync_values: JsonObject,
    filters: FiltersSection,
    original: ConnectorConfig,
    errors: FieldErrors,
    save_error: Option<String>,
}

impl ConnectorConfigEditor {
    /// Start a session; stored values take precedence over schema defaults
    pub fn new(
        connector: ConnectorInfo,
        schema: ConnectorSchema,
        stored: Option<ConnectorConfig>,
        account_type: AccountType,
    ) -> Self {
        let stored = stored.unwrap_or_default();

        let mut auth_values = defaults_for(&schema.auth.fields);
        auth_values.extend(stored.auth.values.clone());

        let mut sync_values = defaults_for(&schema.sync.custom_fields);
        sync_values.extend(stored.sync.values.clone());

        let mut filters = FiltersSection {
            sync: defaults_for(&schema.filters.sync),
            indexing: defaults_for(&schema.filters.indexing),
        };
        filters.sync.extend(stored.filters.sync.clone());
        filters.indexing.extend(stored.filters.indexing.clone());

        let auth_type = if stored.auth.auth_type.is_empty() {
            connector.auth_type.clone()
        } else {
            stored.auth.auth_type.clone()
        };
        let scheduled = stored
            .sync
            .scheduled_config
            .clone()
            .or_else(|| schema.sync.scheduled_config.clone());

        let mut editor = Self {
            connector,
            schema,
            account_type,
            step: WizardStep::Auth,
            auth_type,
            auth_values,
            strategy: stored.sync.selected_strategy,
            scheduled,
            sync_values,
            filters,
            original: ConnectorConfig::default(),
            errors: FieldErrors::new(),
            save_error: None,
        };
        editor.original = editor.build_config();
        editor
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn connector(&self) -> &ConnectorInfo {
        &self.connector
    }

    pub fn schema(&self) -> &ConnectorSchema {
        &self.schema
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn auth_values(&self) -> &JsonObject {
        &self.auth_values
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.strategy
    }

    pub fn scheduled_config(&self) -> Option<&ScheduledConfig> {
        self.scheduled.as_ref()
    }

    /// Field errors of the last validation
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Banner message of the last failed save
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Whether the current values differ from the stored configuration
    pub fn is_dirty(&self) -> bool {
        self.build_config() != self.original
    }

    // ========================================================================
    // Setters
    // ========================================================================

    pub fn set_account_type(&mut self, account_type: AccountType) {
        self.account_type = account_type;
    }

    pub fn set_auth_value(&mut self, name: impl Into<String>, value: JsonValue) {
        let name = name.into();
        self.errors.remove(&name);
        self.auth_values.insert(name, value);
    }

    pub fn set_sync_value(&mut self, name: impl Into<String>, value: JsonValue) {
        let name = name.into();
        self.errors.remove(&name);
        self.sync_values.insert(name, value);
    }

    pub fn set_sync_filter(&mut self, name: impl Into<String>, value: JsonValue) {
        let name = name.into();
        self.errors.remove(&name);
        self.filters.sync.insert(name, value);
    }

    pub fn set_indexing_filter(&mut self, name: impl Into<String>, value: JsonValue) {
        let name = name.into();
        self.errors.remove(&name);
        self.filters.indexing.insert(name, value);
    }

    pub fn set_admin_email(&mut self, email: impl Into<String>) {
        self.set_auth_value(ADMIN_EMAIL_FIELD, JsonValue::String(email.into()));
    }

    /// Switch the sync strategy; must be one the connector supports
    pub fn set_sync_strategy(&mut self, strategy: SyncStrategy) -> Result<()> {
        if !self.schema.sync.supported_strategies.contains(&strategy) {
            return Err(Error::validation(format!(
                "{} does not support {strategy} sync",
                self.connector.name
            )));
        }
        if strategy == SyncStrategy::Scheduled && self.scheduled.is_none() {
            self.scheduled = Some(
                self.schema
                    .sync
                    .scheduled_config
                    .clone()
                    .unwrap_or_default(),
            );
        }
        self.strategy = strategy;
        Ok(())
    }

    pub fn set_scheduled_config(&mut self, config: ScheduledConfig) {
        self.errors.remove(SCHEDULE_INTERVAL_FIELD);
        self.scheduled = Some(config);
    }

    // ========================================================================
    // Credential Uploads
    // ========================================================================

    /// Accept a Google service-account key; rejected files leave state as-is
    pub fn upload_service_account(&mut self, file: &CredentialFile) -> Result<()> {
        let key = self.checked_upload(fields::SERVICE_ACCOUNT, parse_service_account(file))?;
        let value = serde_json::to_value(&key)?;
        self.auth_values
            .insert(fields::SERVICE_ACCOUNT.to_string(), value);
        info!("Loaded service account {} from {}", key.client_email, file.name);
        Ok(())
    }

    /// Accept a PEM certificate; rejected files leave state as-is
    pub fn upload_certificate(&mut self, file: &CredentialFile) -> Result<()> {
        let pem = self.checked_upload(fields::CERTIFICATE, read_certificate(file))?;
        self.auth_values
            .insert(fields::CERTIFICATE.to_string(), JsonValue::String(pem));
        Ok(())
    }

    /// Accept a PKCS#8 private key; rejected files leave state as-is
    pub fn upload_private_key(&mut self, file: &CredentialFile) -> Result<()> {
        let pem = self.checked_upload(fields::PRIVATE_KEY, read_private_key(file))?;
        self.auth_values
            .insert(fields::PRIVATE_KEY.to_string(), JsonValue::String(pem));
        Ok(())
    }

    fn checked_upload<T>(&mut self, field: &str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.errors.remove(field);
                Ok(value)
            }
            Err(e) => {
                debug!("Rejected upload for '{}': {}", field, e);
                self.errors.insert(field.to_string(), e.to_string());
                Err(e)
            }
        }
    }

    // ========================================================================
    // Validation & Navigation
    // ========================================================================

    fn requires_service_account(&self) -> bool {
        self.connector.app_group == GOOGLE_WORKSPACE_GROUP
            && self.account_type == AccountType::Business
            && self.auth_type.eq_ignore_ascii_case("OAUTH")
    }

    fn requires_certificate(&self) -> bool {
        self.connector.name == SHAREPOINT_CONNECTOR
    }

    fn has_auth_value(&self, name: &str) -> bool {
        self.auth_values
            .get(name)
            .is_some_and(|v| !is_empty_value(v))
    }

    /// Field errors of one step, without changing state
    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        match step {
            WizardStep::Auth => self.validate_auth(),
            WizardStep::Sync => self.validate_sync(),
        }
    }

    fn validate_auth(&self) -> FieldErrors {
        let mut errors = validate_fields(&self.schema.auth.fields, &self.auth_values);

        if self.requires_service_account() {
            match self.auth_values.get(ADMIN_EMAIL_FIELD).and_then(JsonValue::as_str) {
                Some(email) if !email.trim().is_empty() => {
                    if !is_valid_email(email) {
                        errors.insert(
                            ADMIN_EMAIL_FIELD.to_string(),
                            "Admin email must be a valid email address".to_string(),
                        );
                    }
                }
                _ => {
                    errors.insert(
                        ADMIN_EMAIL_FIELD.to_string(),
                        "Admin email is required for business accounts".to_string(),
                    );
                }
            }
            if !self.has_auth_value(fields::SERVICE_ACCOUNT) {
                errors.insert(
                    fields::SERVICE_ACCOUNT.to_string(),
                    "Service account JSON file is required for business accounts".to_string(),
                );
            }
        }

        if self.requires_certificate() {
            if !self.has_auth_value(fields::CERTIFICATE) {
                errors.insert(
                    fields::CERTIFICATE.to_string(),
                    "Certificate file is required".to_string(),
                );
            }
            if !self.has_auth_value(fields::PRIVATE_KEY) {
                errors.insert(
                    fields::PRIVATE_KEY.to_string(),
                    "Private key file is required".to_string(),
                );
            }
        }

        errors
    }

    fn validate_sync(&self) -> FieldErrors {
        let mut errors = validate_fields(&self.schema.sync.custom_fields, &self.sync_values);
        errors.extend(validate_fields(&self.schema.filters.sync, &self.filters.sync));
        errors.extend(validate_fields(
            &self.schema.filters.indexing,
            &self.filters.indexing,
        ));

        if self.strategy == SyncStrategy::Scheduled {
            let interval = self.scheduled.as_ref().map_or(0, |s| s.interval_minutes);
            if interval == 0 {
                errors.insert(
                    SCHEDULE_INTERVAL_FIELD.to_string(),
                    "Sync interval must be at least one minute".to_string(),
                );
            }
        }

        errors
    }

    /// Validate the current step and advance when it passes
    ///
    /// Returns false when validation fails. On the last step a passing
    /// validation returns true without moving.
    pub fn next_step(&mut self) -> bool {
        self.errors = self.validate_step(self.step);
        if !self.errors.is_empty() {
            return false;
        }
        if self.step == WizardStep::Auth {
            self.step = WizardStep::Sync;
        }
        true
    }

    pub fn previous_step(&mut self) {
        if self.step == WizardStep::Sync {
            self.step = WizardStep::Auth;
            self.errors.clear();
        }
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Assemble the configuration from the current values
    ///
    /// Values of hidden fields are dropped.
    pub fn build_config(&self) -> ConnectorConfig {
        let scheduled_config = match self.strategy {
            SyncStrategy::Scheduled => Some(self.scheduled.clone().unwrap_or_default()),
            SyncStrategy::Manual => None,
        };
        ConnectorConfig {
            auth: AuthSection {
                auth_type: self.auth_type.clone(),
                values: visible_values(&self.schema.auth.fields, &self.auth_values),
            },
            sync: SyncSection {
                selected_strategy: self.strategy,
                scheduled_config,
                values: visible_values(&self.schema.sync.custom_fields, &self.sync_values),
            },
            filters: FiltersSection {
                sync: visible_values(&self.schema.filters.sync, &self.filters.sync),
                indexing: visible_values(&self.schema.filters.indexing, &self.filters.indexing),
            },
        }
    }

    /// Validate, persist and reschedule
    pub async fn save(
        &mut self,
        backend: &dyn ConnectorBackend,
        scheduler: &dyn Scheduler,
    ) -> Result<SaveReport> {
        self.save_error = None;

        for step in [WizardStep::Auth, WizardStep::Sync] {
            let errors = self.validate_step(step);
            if !errors.is_empty() {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                let message = format!("invalid fields: {}", fields.join(", "));
                self.errors = errors;
                self.step = step;
                return Err(Error::validation(message));
            }
        }
        self.errors.clear();

        let name = self.connector.name.clone();
        let config = self.build_config();

        if let Err(e) = backend.update_config(&name, &config).await {
            let message = e.to_string();
            self.save_error = Some(message.clone());
            return Err(Error::save(message));
        }

        let action = schedule_action(
            self.connector.is_active,
            &self.original.sync,
            &config.sync,
        );
        let schedule = match action {
            None => ScheduleOutcome::NotRequired,
            Some(action) => {
                let result = match action {
                    ScheduleAction::Remove => scheduler.remove_schedule(&name).await,
                    ScheduleAction::Add | ScheduleAction::Update => {
                        let scheduled = config.sync.scheduled_config.clone().unwrap_or_default();
                        scheduler
                            .schedule(&name, &ScheduleRequest::from_config(&scheduled))
                            .await
                    }
                };
                match result {
                    Ok(()) => ScheduleOutcome::Applied { action },
                    Err(e) => {
                        warn!("Schedule {:?} for connector '{}' failed: {}", action, name, e);
                        ScheduleOutcome::Failed {
                            action,
                            message: e.to_string(),
                        }
                    }
                }
            }
        };

        self.original = config.clone();
        info!("Configuration of connector '{}' saved", name);
        Ok(SaveReport { config, schedule })
    }
}
