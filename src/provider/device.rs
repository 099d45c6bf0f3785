//! HTTP client for the access-control device.
//!
//! The device exposes an FCGI-style JSON API. Every data call is a POST to
//! `load_objects.fcgi` naming the object table and an optional filter; the
//! session token travels as a query parameter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::{AccessProvider, ProviderSession};
use crate::config::DeviceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ACCESS_EVENT_TYPE, AccessEvent, Direction, Employee, HolidayFlags, ReportRange,
    ScheduleWindow, WeekdayFlags, WindowGroup,
};

/// Portal identifier the device uses for the entry side of a turnstile.
const ENTRY_PORTAL_ID: i64 = 1;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    session: String,
}

#[derive(Debug, Deserialize)]
struct SessionValidResponse {
    session_is_valid: bool,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: i64,
    #[serde(default)]
    registration: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AccessLogRow {
    time: i64,
    event: u32,
    #[serde(default)]
    portal_id: i64,
}

#[derive(Debug, Deserialize)]
struct UserGroupRow {
    group_id: i64,
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct GroupAccessRuleRow {
    access_rule_id: i64,
}

#[derive(Debug, Deserialize)]
struct AccessRuleTimeZoneRow {
    time_zone_id: i64,
}

#[derive(Debug, Deserialize)]
struct TimeZoneRow {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TimeSpanRow {
    id: i64,
    start: u32,
    end: u32,
    #[serde(default)]
    sun: u8,
    #[serde(default)]
    mon: u8,
    #[serde(default)]
    tue: u8,
    #[serde(default)]
    wed: u8,
    #[serde(default)]
    thu: u8,
    #[serde(default)]
    fri: u8,
    #[serde(default)]
    sat: u8,
    #[serde(default)]
    hol1: u8,
    #[serde(default)]
    hol2: u8,
    #[serde(default)]
    hol3: u8,
}

impl TimeSpanRow {
    fn into_window(self, group: &WindowGroup) -> ScheduleWindow {
        ScheduleWindow {
            id: self.id,
            group: group.clone(),
            start_offset: self.start,
            end_offset: self.end,
            weekdays: WeekdayFlags {
                sunday: self.sun == 1,
                monday: self.mon == 1,
                tuesday: self.tue == 1,
                wednesday: self.wed == 1,
                thursday: self.thu == 1,
                friday: self.fri == 1,
                saturday: self.sat == 1,
            },
            holidays: HolidayFlags {
                holiday_1: self.hol1 == 1,
                holiday_2: self.hol2 == 1,
                holiday_3: self.hol3 == 1,
            },
        }
    }
}

/// Equality filter in the device's list form.
fn eq_filter(object: &str, field: &str, value: i64) -> Value {
    json!([{
        "object": object,
        "field": field,
        "operator": "=",
        "value": value,
    }])
}

/// Converts a wall-clock time to the device's epoch seconds.
fn to_device_epoch(timestamp: NaiveDateTime, clock_offset_hours: i64) -> i64 {
    (timestamp - TimeDelta::hours(clock_offset_hours))
        .and_utc()
        .timestamp()
}

/// Converts device epoch seconds to wall-clock time.
fn from_device_epoch(seconds: i64, clock_offset_hours: i64) -> EngineResult<NaiveDateTime> {
    let utc = DateTime::from_timestamp(seconds, 0).ok_or_else(|| EngineError::InvalidData {
        message: format!("access log time {} is out of range", seconds),
    })?;
    Ok(utc.naive_utc() + TimeDelta::hours(clock_offset_hours))
}

fn direction_for_portal(portal_id: i64) -> Direction {
    if portal_id == ENTRY_PORTAL_ID {
        Direction::Entry
    } else {
        Direction::Exit
    }
}

/// Provider backed by the access-control device.
///
/// # Example
///
/// ```no_run
/// use overtime_engine::config::ConfigLoader;
/// use overtime_engine::provider::{AccessProvider, DeviceProvider};
///
/// # async fn run() -> overtime_engine::error::EngineResult<()> {
/// let config = ConfigLoader::load("./config/overtime.yaml")?.into_config();
/// let provider = DeviceProvider::new(config.device)?;
/// let mut session = provider.acquire().await?;
/// let employees = session.list_employees().await?;
/// session.release().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceProvider {
    client: Client,
    config: DeviceConfig,
}

impl DeviceProvider {
    /// Builds a provider with the configured request timeout.
    pub fn new(config: DeviceConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AccessProvider for DeviceProvider {
    async fn acquire(&self) -> EngineResult<Box<dyn ProviderSession>> {
        Ok(Box::new(DeviceSession {
            client: self.client.clone(),
            config: self.config.clone(),
            token: None,
        }))
    }
}

/// A device session. Logs in lazily before the first call.
struct DeviceSession {
    client: Client,
    config: DeviceConfig,
    token: Option<String>,
}

impl DeviceSession {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> EngineResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(operation, %status, "Device responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Device {
                operation: operation.to_string(),
                message: format!("status {}: {}", status, body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn login(&mut self) -> EngineResult<String> {
        let request = self.client.post(self.url("login.fcgi")).json(&LoginRequest {
            login: &self.config.username,
            password: &self.config.password,
        });
        let response: LoginResponse = self.send(request, "login").await?;
        info!(endpoint = %self.config.endpoint, "Opened device session");
        self.token = Some(response.session.clone());
        Ok(response.session)
    }

    /// Returns a valid session token, logging in again if the device dropped it.
    async fn ensure_session(&mut self) -> EngineResult<String> {
        let token = match self.token.clone() {
            Some(token) => token,
            None => return self.login().await,
        };

        let request = self
            .client
            .post(self.url("session_is_valid.fcgi"))
            .query(&[("session", token.as_str())]);
        let validity: SessionValidResponse = self.send(request, "session_is_valid").await?;

        if validity.session_is_valid {
            Ok(token)
        } else {
            warn!("Device session expired, logging in again");
            self.login().await
        }
    }

    async fn load_objects<T: DeserializeOwned>(
        &mut self,
        object: &str,
        filter: Option<Value>,
    ) -> EngineResult<Vec<T>> {
        let token = self.ensure_session().await?;
        let operation = format!("load_objects:{}", object);

        let mut body = json!({ "object": object });
        if let Some(filter) = filter {
            body["where"] = filter;
        }

        let request = self
            .client
            .post(self.url("load_objects.fcgi"))
            .query(&[("session", token.as_str())])
            .json(&body);
        let mut response: Value = self.send(request, &operation).await?;

        let rows = response
            .get_mut(object)
            .map(Value::take)
            .ok_or_else(|| EngineError::Device {
                operation: operation.clone(),
                message: format!("response has no '{}' field", object),
            })?;

        serde_json::from_value(rows).map_err(|e| EngineError::Device {
            operation,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ProviderSession for DeviceSession {
    async fn list_employees(&mut self) -> EngineResult<Vec<Employee>> {
        let users: Vec<UserRow> = self.load_objects("users", None).await?;
        Ok(users
            .into_iter()
            .map(|u| Employee {
                id: u.id,
                registration: u.registration,
                name: u.name,
            })
            .collect())
    }

    async fn list_access_events(
        &mut self,
        employee_id: i64,
        range: &ReportRange,
    ) -> EngineResult<Vec<AccessEvent>> {
        let offset = self.config.clock_offset_hours;
        let filter = json!({
            "access_logs": {
                "user_id": employee_id,
                "event": ACCESS_EVENT_TYPE,
                "time": {
                    ">=": to_device_epoch(range.start, offset),
                    "<=": to_device_epoch(range.end, offset),
                },
            },
        });

        let rows: Vec<AccessLogRow> = self.load_objects("access_logs", Some(filter)).await?;
        let mut events = rows
            .into_iter()
            .map(|row| {
                Ok(AccessEvent {
                    timestamp: from_device_epoch(row.time, offset)?,
                    direction: direction_for_portal(row.portal_id),
                    event_type: row.event,
                    synthetic: false,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    async fn list_schedule_windows(
        &mut self,
        employee_id: i64,
    ) -> EngineResult<Vec<ScheduleWindow>> {
        let user_groups: Vec<UserGroupRow> = self
            .load_objects(
                "user_groups",
                Some(eq_filter("user_groups", "user_id", employee_id)),
            )
            .await?;

        let mut group_ids = Vec::new();
        for user_group in user_groups {
            let groups: Vec<GroupRow> = self
                .load_objects("groups", Some(eq_filter("groups", "id", user_group.group_id)))
                .await?;
            group_ids.extend(groups.into_iter().map(|g| g.id));
        }

        let mut rule_ids = Vec::new();
        for group_id in group_ids {
            let rules: Vec<GroupAccessRuleRow> = self
                .load_objects(
                    "group_access_rules",
                    Some(eq_filter("group_access_rules", "group_id", group_id)),
                )
                .await?;
            rule_ids.extend(rules.into_iter().map(|r| r.access_rule_id));
        }

        let mut time_zones = Vec::new();
        for rule_id in rule_ids {
            let links: Vec<AccessRuleTimeZoneRow> = self
                .load_objects(
                    "access_rule_time_zones",
                    Some(eq_filter("access_rule_time_zones", "access_rule_id", rule_id)),
                )
                .await?;
            for link in links {
                let zones: Vec<TimeZoneRow> = self
                    .load_objects(
                        "time_zones",
                        Some(eq_filter("time_zones", "id", link.time_zone_id)),
                    )
                    .await?;
                time_zones.extend(zones.into_iter().map(|z| WindowGroup {
                    id: z.id,
                    name: z.name,
                }));
            }
        }

        let mut windows = Vec::new();
        for zone in &time_zones {
            let spans: Vec<TimeSpanRow> = self
                .load_objects(
                    "time_spans",
                    Some(eq_filter("time_spans", "time_zone_id", zone.id)),
                )
                .await?;
            windows.extend(spans.into_iter().map(|s| s.into_window(zone)));
        }

        debug!(
            employee_id,
            time_zones = time_zones.len(),
            windows = windows.len(),
            "Loaded schedule windows"
        );
        Ok(windows)
    }

    async fn release(&mut self) -> EngineResult<()> {
        if let Some(token) = self.token.take() {
            let request = self
                .client
                .post(self.url("logout.fcgi"))
                .query(&[("session", token.as_str())]);
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(EngineError::Device {
                    operation: "logout".to_string(),
                    message: format!("status {}", response.status()),
                });
            }
            info!("Closed device session");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_portal_one_is_entry() {
        assert_eq!(direction_for_portal(1), Direction::Entry);
        assert_eq!(direction_for_portal(2), Direction::Exit);
        assert_eq!(direction_for_portal(0), Direction::Exit);
    }

    #[test]
    fn test_epoch_conversion_applies_offset() {
        // 2026-01-12 00:00:00 UTC
        let epoch = 1_768_176_000;
        assert_eq!(
            from_device_epoch(epoch, 3).unwrap(),
            make_datetime("2026-01-12 03:00:00")
        );
        assert_eq!(to_device_epoch(make_datetime("2026-01-12 03:00:00"), 3), epoch);
    }

    #[test]
    fn test_epoch_conversion_without_offset() {
        let at = make_datetime("2026-01-12 09:30:00");
        let epoch = to_device_epoch(at, 0);
        assert_eq!(from_device_epoch(epoch, 0).unwrap(), at);
    }

    #[test]
    fn test_time_span_flags_map_to_window() {
        let row: TimeSpanRow = serde_json::from_value(json!({
            "id": 3,
            "start": 32400,
            "end": 39600,
            "sun": 0, "mon": 1, "tue": 0, "wed": 1, "thu": 0, "fri": 0, "sat": 1,
            "hol1": 1, "hol2": 0, "hol3": 0
        }))
        .unwrap();
        let group = WindowGroup {
            id: 9,
            name: "[EXTRA] Noite".to_string(),
        };

        let window = row.into_window(&group);

        assert_eq!(window.start_offset, 32400);
        assert_eq!(window.end_offset, 39600);
        assert!(window.weekdays.monday && window.weekdays.wednesday && window.weekdays.saturday);
        assert!(!window.weekdays.sunday && !window.weekdays.tuesday);
        assert!(window.holidays.holiday_1 && !window.holidays.holiday_2);
        assert_eq!(window.group, group);
    }

    #[test]
    fn test_eq_filter_shape() {
        let filter = eq_filter("groups", "id", 4);
        assert_eq!(filter[0]["object"], "groups");
        assert_eq!(filter[0]["field"], "id");
        assert_eq!(filter[0]["operator"], "=");
        assert_eq!(filter[0]["value"], 4);
    }
}
