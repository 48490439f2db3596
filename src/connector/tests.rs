//! Tests for connector documents, schema rules and validation

use super::*;
use crate::types::SyncStrategy;
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn object(value: serde_json::Value) -> crate::types::JsonObject {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_connector_config_roundtrip_keeps_free_form_values() {
    let raw = json!({
        "auth": { "authType": "OAUTH", "clientId": "abc", "tenantId": "t-1" },
        "sync": {
            "selectedStrategy": "SCHEDULED",
            "scheduledConfig": { "intervalMinutes": 30, "timezone": "Europe/Berlin" },
            "batchSize": 50
        },
        "filters": { "sync": { "labels": ["INBOX"] } }
    });

    let config: ConnectorConfig = serde_json::from_value(raw).unwrap();
    assert_eq!(config.auth.auth_type, "OAUTH");
    assert_eq!(config.auth.values["clientId"], "abc");
    assert_eq!(config.sync.selected_strategy, SyncStrategy::Scheduled);
    assert_eq!(config.sync.values["batchSize"], 50);
    let scheduled = config.sync.scheduled_config.as_ref().unwrap();
    assert_eq!(scheduled.interval_minutes, 30);
    assert_eq!(scheduled.timezone, "Europe/Berlin");
    assert!(config.filters.indexing.is_empty());

    let back = serde_json::to_value(&config).unwrap();
    assert_eq!(back["auth"]["tenantId"], "t-1");
    assert_eq!(back["sync"]["selectedStrategy"], "SCHEDULED");
}

#[test]
fn test_connector_config_defaults_from_empty_object() {
    let config: ConnectorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.sync.selected_strategy, SyncStrategy::Manual);
    assert!(config.sync.scheduled_config.is_none());
    assert!(config.auth.values.is_empty());
}

#[test]
fn test_connector_info_camel_case() {
    let info: ConnectorInfo = serde_json::from_value(json!({
        "name": "Gmail",
        "appGroup": "Google Workspace",
        "authType": "OAUTH",
        "isActive": true
    }))
    .unwrap();
    assert_eq!(info.app_group, "Google Workspace");
    assert!(info.is_active);
    assert!(!info.is_configured);
}

#[test]
fn test_toggle_type_serialization() {
    assert_eq!(serde_json::to_value(ToggleType::Sync).unwrap(), json!("sync"));
    assert_eq!(serde_json::to_value(ToggleType::Agent).unwrap(), json!("agent"));
    assert_eq!(ConfigSection::Filters.as_str(), "filters");
}

#[test]
fn test_schema_deserialization() {
    let schema: ConnectorSchema = serde_json::from_value(json!({
        "auth": {
            "fields": [
                { "name": "clientId", "displayName": "Client ID", "fieldType": "TEXT", "required": true },
                { "name": "region", "fieldType": "SELECT", "options": ["eu", "us"], "defaultValue": "eu" }
            ],
            "redirectUri": "https://app.example.com/callback",
            "displayRedirectUri": true
        },
        "sync": { "supportedStrategies": ["MANUAL"] }
    }))
    .unwrap();

    assert_eq!(schema.auth.fields.len(), 2);
    assert_eq!(schema.auth.fields[1].field_type, FieldType::Select);
    assert!(schema.auth.display_redirect_uri);
    assert_eq!(schema.sync.supported_strategies, vec![SyncStrategy::Manual]);
    assert_eq!(
        defaults_for(&schema.auth.fields),
        object(json!({ "region": "eu" }))
    );
}

#[test]
fn test_sync_schema_defaults_to_both_strategies() {
    let schema: ConnectorSchema = serde_json::from_str("{}").unwrap();
    assert_eq!(
        schema.sync.supported_strategies,
        vec![SyncStrategy::Manual, SyncStrategy::Scheduled]
    );
}

// ============================================================================
// Conditional Display
// ============================================================================

#[test_case(ConditionOperator::Equals, json!("certificate"), json!({"authMode": "certificate"}), true ; "equals matches")]
#[test_case(ConditionOperator::Equals, json!(true), json!({"useProxy": "true"}), true ; "equals is loose for booleans")]
#[test_case(ConditionOperator::NotEquals, json!("secret"), json!({"authMode": "secret"}), false ; "not equals")]
#[test_case(ConditionOperator::Contains, json!("drive"), json!({"services": ["mail", "drive"]}), true ; "contains in array")]
#[test_case(ConditionOperator::IsEmpty, json!(null), json!({}), true ; "missing is empty")]
#[test_case(ConditionOperator::IsNotEmpty, json!(null), json!({"authMode": " "}), false ; "blank is empty")]
fn test_conditional_display(
    operator: ConditionOperator,
    value: serde_json::Value,
    values: serde_json::Value,
    expected: bool,
) {
    let field_name = object(values.clone())
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| "authMode".to_string());
    let rule = ConditionalDisplay {
        field: field_name,
        operator,
        value,
    };
    assert_eq!(rule.matches(&object(values)), expected);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_required_field() {
    let field = FieldSchema::new("clientId", FieldType::Text).required();
    assert_eq!(
        validate_field(&field, None),
        Some("clientId is required".to_string())
    );
    assert_eq!(
        validate_field(&field, Some(&json!("  "))),
        Some("clientId is required".to_string())
    );
    assert_eq!(validate_field(&field, Some(&json!("abc"))), None);

    let optional = FieldSchema::new("note", FieldType::Text);
    assert_eq!(validate_field(&optional, None), None);
}

#[test]
fn test_unchecked_required_checkbox() {
    let field = FieldSchema::new("acceptTerms", FieldType::Checkbox).required();
    assert!(validate_field(&field, Some(&json!(false))).is_some());
    assert_eq!(validate_field(&field, Some(&json!(true))), None);
}

#[test_case(FieldType::Email, "admin@example.com", true ; "valid email")]
#[test_case(FieldType::Email, "admin@", false ; "invalid email")]
#[test_case(FieldType::Url, "https://tenant.sharepoint.com", true ; "valid url")]
#[test_case(FieldType::Url, "tenant.sharepoint.com", false ; "url without scheme")]
#[test_case(FieldType::Url, "ftp://files.example.com", false ; "non http url")]
#[test_case(FieldType::Number, "42", true ; "numeric string")]
#[test_case(FieldType::Number, "forty", false ; "non numeric string")]
#[test_case(FieldType::Json, "{\"a\": 1}", true ; "valid json")]
#[test_case(FieldType::Json, "{a: 1}", false ; "invalid json")]
fn test_field_formats(field_type: FieldType, value: &str, valid: bool) {
    let field = FieldSchema::new("value", field_type);
    assert_eq!(validate_field(&field, Some(&json!(value))).is_none(), valid);
}

#[test]
fn test_length_limits() {
    let mut field = FieldSchema::new("clientSecret", FieldType::Password);
    field.display_name = "Client Secret".to_string();
    field.min_length = Some(8);
    field.max_length = Some(12);

    assert_eq!(
        validate_field(&field, Some(&json!("short"))),
        Some("Client Secret must be at least 8 characters".to_string())
    );
    assert_eq!(
        validate_field(&field, Some(&json!("much-too-long-secret"))),
        Some("Client Secret must be at most 12 characters".to_string())
    );
    assert_eq!(validate_field(&field, Some(&json!("just-right"))), None);
}

#[test]
fn test_pattern_with_custom_message() {
    let mut field = FieldSchema::new("tenantId", FieldType::Text);
    field.pattern = Some(r"^[0-9a-f-]{36}$".to_string());
    field.pattern_message = Some("Tenant ID must be a GUID".to_string());

    assert_eq!(
        validate_field(&field, Some(&json!("not-a-guid"))),
        Some("Tenant ID must be a GUID".to_string())
    );
    assert_eq!(
        validate_field(
            &field,
            Some(&json!("0f8fad5b-d9cb-469f-a165-70867728950e"))
        ),
        None
    );
}

#[test]
fn test_select_options() {
    let mut field = FieldSchema::new("region", FieldType::Select);
    field.options = vec!["eu".to_string(), "us".to_string()];
    assert_eq!(validate_field(&field, Some(&json!("eu"))), None);
    assert!(validate_field(&field, Some(&json!("apac"))).is_some());

    let mut multi = FieldSchema::new("labels", FieldType::Multiselect);
    multi.options = vec!["INBOX".to_string(), "SENT".to_string()];
    assert_eq!(validate_field(&multi, Some(&json!(["INBOX"]))), None);
    assert!(validate_field(&multi, Some(&json!(["SPAM"]))).is_some());
}

#[test]
fn test_hidden_fields_are_not_validated_or_submitted() {
    let mode = FieldSchema::new("authMode", FieldType::Select);
    let mut certificate = FieldSchema::new("certificatePassword", FieldType::Password).required();
    certificate.conditional_display = Some(ConditionalDisplay {
        field: "authMode".to_string(),
        operator: ConditionOperator::Equals,
        value: json!("certificate"),
    });
    let fields = vec![mode, certificate];

    let secret_mode = object(json!({ "authMode": "secret", "certificatePassword": "" }));
    assert!(validate_fields(&fields, &secret_mode).is_empty());
    assert_eq!(
        visible_values(&fields, &secret_mode),
        object(json!({ "authMode": "secret" }))
    );

    let certificate_mode = object(json!({ "authMode": "certificate" }));
    let errors = validate_fields(&fields, &certificate_mode);
    assert_eq!(
        errors.get("certificatePassword").map(String::as_str),
        Some("certificatePassword is required")
    );
}

// ============================================================================
// Scheduling
// ============================================================================

#[test_case(15, None, "*/15 * * * *" ; "minutes")]
#[test_case(45, None, "0 * * * *" ; "uneven minutes rounded up to hourly")]
#[test_case(7, None, "*/10 * * * *" ; "rounded up to a divisor of sixty")]
#[test_case(60, None, "0 * * * *" ; "hourly")]
#[test_case(180, None, "0 */3 * * *" ; "every three hours")]
#[test_case(90, None, "0 */2 * * *" ; "rounded up to whole hours")]
#[test_case(1440, None, "0 0 * * *" ; "daily")]
#[test_case(2880, None, "0 0 */2 * *" ; "every two days")]
#[test_case(0, None, "*/1 * * * *" ; "zero is clamped")]
fn test_cron_from_interval(interval: u32, start: Option<chrono::DateTime<Utc>>, expected: &str) {
    assert_eq!(cron_from_interval(interval, start, Tz::UTC), expected);
}

#[test]
fn test_cron_anchored_on_start_time() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 6, 45, 0).unwrap();
    assert_eq!(cron_from_interval(120, Some(start), Tz::UTC), "45 */2 * * *");
    assert_eq!(cron_from_interval(1440, Some(start), Tz::UTC), "45 6 * * *");
}

#[test]
fn test_cron_uses_local_wall_clock() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
    assert_eq!(
        cron_from_interval(1440, Some(start), Tz::Asia__Kolkata),
        "0 15 * * *"
    );

    let request = ScheduleRequest::from_config(&ScheduledConfig {
        interval_minutes: 1440,
        start_time: Some(start),
        timezone: "Asia/Kolkata".to_string(),
        max_repetitions: None,
    });
    assert_eq!(request.schedule_config.cron_expression, "0 15 * * *");
    assert_eq!(request.schedule_config.timezone, "Asia/Kolkata");
}

#[test]
fn test_unknown_timezone_schedules_in_utc() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
    let request = ScheduleRequest::from_config(&ScheduledConfig {
        interval_minutes: 1440,
        start_time: Some(start),
        timezone: "Mars/Olympus_Mons".to_string(),
        max_repetitions: None,
    });
    assert_eq!(request.schedule_config.cron_expression, "30 9 * * *");
    assert_eq!(request.schedule_config.timezone, "UTC");
}

#[test]
fn test_schedule_request_body() {
    let config = ScheduledConfig {
        interval_minutes: 30,
        start_time: None,
        timezone: "UTC".to_string(),
        max_repetitions: Some(10),
    };
    let body = serde_json::to_value(ScheduleRequest::from_config(&config)).unwrap();
    assert_eq!(
        body,
        json!({
            "scheduleConfig": {
                "scheduleType": "custom",
                "isEnabled": true,
                "cronExpression": "*/30 * * * *",
                "intervalMinutes": 30,
                "timezone": "UTC",
                "maxRepetitions": 10
            },
            "priority": 5,
            "maxRetries": 3,
            "timeout": 300000
        })
    );
}

#[test]
fn test_schedule_action() {
    let manual = SyncSection::default();
    let scheduled = SyncSection {
        selected_strategy: SyncStrategy::Scheduled,
        scheduled_config: Some(ScheduledConfig::default()),
        ..SyncSection::default()
    };
    let rescheduled = SyncSection {
        scheduled_config: Some(ScheduledConfig {
            interval_minutes: 15,
            ..ScheduledConfig::default()
        }),
        ..scheduled.clone()
    };

    assert_eq!(
        schedule_action(true, &scheduled, &manual),
        Some(ScheduleAction::Remove)
    );
    assert_eq!(
        schedule_action(true, &manual, &scheduled),
        Some(ScheduleAction::Add)
    );
    assert_eq!(
        schedule_action(true, &scheduled, &rescheduled),
        Some(ScheduleAction::Update)
    );
    assert_eq!(schedule_action(true, &scheduled, &scheduled), None);
    assert_eq!(schedule_action(true, &manual, &manual), None);
    assert_eq!(schedule_action(false, &scheduled, &manual), None);
}
