//! Crawling Manager scheduling client
//!
//! The Crawling Manager owns the actual schedules; this side only adds,
//! replaces or removes the schedule of a connector.

use super::types::ScheduledConfig;
use crate::error::{Error, Result};
use crate::http::{path_segment, HttpClient, RequestConfig};
use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minute steps that divide an hour evenly
const MINUTE_STEPS: [u32; 11] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30];

/// Schedule operations the connector editor needs
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Create or replace the schedule of a connector
    async fn schedule(&self, connector: &str, request: &ScheduleRequest) -> Result<()>;

    /// Remove the schedule of a connector
    async fn remove_schedule(&self, connector: &str) -> Result<()>;
}

/// Body of a schedule request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub schedule_config: ScheduleSpec,
    pub priority: u8,
    pub max_retries: u32,
    /// Job timeout in milliseconds
    pub timeout: u64,
}

/// Schedule definition understood by the Crawling Manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSpec {
    pub schedule_type: String,
    pub is_enabled: bool,
    pub cron_expression: String,
    pub interval_minutes: u32,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_repetitions: Option<u32>,
}

impl ScheduleRequest {
    /// Build a request from the connector's scheduled config
    ///
    /// The cron fields are wall-clock values in the request's timezone. An
    /// unknown timezone falls back to UTC.
    pub fn from_config(config: &ScheduledConfig) -> Self {
        let tz = config.timezone.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown timezone '{}', scheduling in UTC", config.timezone);
            Tz::UTC
        });
        Self {
            schedule_config: ScheduleSpec {
                schedule_type: "custom".to_string(),
                is_enabled: true,
                cron_expression: cron_from_interval(
                    config.interval_minutes,
                    config.start_time,
                    tz,
                ),
                interval_minutes: config.interval_minutes,
                timezone: tz.name().to_string(),
                start_time: config.start_time,
                max_repetitions: config.max_repetitions,
            },
            priority: 5,
            max_retries: 3,
            timeout: 300_000,
        }
    }
}

/// Cron expression for a run every `interval` minutes
///
/// Cron cannot express every interval. Under an hour the interval is rounded
/// up to the next step that divides 60 (45 becomes hourly); under a day it
/// is rounded up to whole hours, beyond that to whole days. The start time,
/// read as wall-clock time in `tz`, anchors minute and hour.
pub fn cron_from_interval(interval: u32, start: Option<DateTime<Utc>>, tz: Tz) -> String {
    let interval = interval.max(1);
    let local = start.map(|s| s.with_timezone(&tz));
    let minute = local.map_or(0, |s| s.minute());
    let hour = local.map_or(0, |s| s.hour());

    if interval < MINUTES_PER_HOUR {
        if let Some(step) = MINUTE_STEPS.iter().find(|&&step| step >= interval) {
            return format!("*/{step} * * * *");
        }
    }
    if interval < MINUTES_PER_DAY {
        let hours = interval.div_ceil(MINUTES_PER_HOUR);
        if hours == 1 {
            return format!("{minute} * * * *");
        }
        if hours < 24 {
            return format!("{minute} */{hours} * * *");
        }
    }
    let days = interval.div_ceil(MINUTES_PER_DAY);
    if days == 1 {
        format!("{minute} {hour} * * *")
    } else {
        format!("{minute} {hour} */{days} * *")
    }
}

/// HTTP client for the Crawling Manager API
#[derive(Debug, Clone)]
pub struct CrawlingManagerClient {
    http: HttpClient,
}

impl CrawlingManagerClient {
    /// Use an HTTP client pointed at the backend
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn schedule_path(connector: &str) -> String {
        format!("/api/v1/crawlingManager/{}/schedule", path_segment(connector))
    }
}

#[async_trait]
impl Scheduler for CrawlingManagerClient {
    async fn schedule(&self, connector: &str, request: &ScheduleRequest) -> Result<()> {
        let body = serde_json::to_value(request)?;
        self.http
            .request(
                Method::POST,
                &Self::schedule_path(connector),
                RequestConfig::new().json(body),
            )
            .await
            .map_err(|e| Error::scheduling(format!("schedule '{connector}': {e}")))?;
        info!(
            "Scheduled connector '{}' ({})",
            connector, request.schedule_config.cron_expression
        );
        Ok(())
    }

    async fn remove_schedule(&self, connector: &str) -> Result<()> {
        self.http
            .delete(&Self::schedule_path(connector))
            .await
            .map_err(|e| Error::scheduling(format!("remove schedule '{connector}': {e}")))?;
        info!("Removed schedule for connector '{}'", connector);
        Ok(())
    }
}
