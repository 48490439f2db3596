//! Connector configuration
//!
//! Everything needed to configure a data connector against the backend:
//!
//! - `types` / `schema` - configuration documents and their form schema
//! - `validation` - schema-driven field checks
//! - `credentials` - service-account, certificate and private-key checks
//! - `editor` - the two-step configuration session and its save flow
//! - `api` - REST client for `/api/v1/connectors`
//! - `scheduler` - Crawling Manager schedule client

mod api;
mod credentials;
mod editor;
mod scheduler;
mod schema;
mod types;
mod validation;

pub use api::{backend_http_client, ConnectorApiService, ConnectorBackend};
pub use credentials::{
    fields, parse_service_account, parse_service_account_json, read_certificate,
    read_private_key, validate_certificate, validate_private_key, CredentialFile,
    ServiceAccountKey, MAX_CREDENTIAL_FILE_BYTES, RSA_KEY_MESSAGE,
};
pub use editor::{
    schedule_action, AccountType, ConnectorConfigEditor, SaveReport, ScheduleAction,
    ScheduleOutcome, WizardStep, ADMIN_EMAIL_FIELD,
};
pub use scheduler::{
    cron_from_interval, CrawlingManagerClient, ScheduleRequest, ScheduleSpec, Scheduler,
};
pub use schema::{
    defaults_for, is_empty_value, AuthSchema, ConditionOperator, ConditionalDisplay,
    ConnectorSchema, FieldSchema, FieldType, FiltersSchema, SyncSchema,
};
pub use types::{
    AuthSection, AuthorizeResponse, ConfigSection, ConnectorConfig, ConnectorInfo,
    FiltersSection, OAuthCallbackResponse, ScheduledConfig, SyncSection, ToggleType,
};
pub use validation::{
    is_valid_email, is_valid_url, validate_field, validate_fields, visible_values, FieldErrors,
};

#[cfg(test)]
mod tests;

#[cfg(test)]
mod credentials_tests;
