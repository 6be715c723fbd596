//! Google Calendar gateway.
//!
//! Busy intervals come from the freeBusy query; events are created on the
//! primary calendar. Uses OAuth2 bearer tokens; on an HTTP 401 the
//! credential provider is asked to refresh once and the call is retried,
//! after which the auth failure is surfaced.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::credentials::CredentialProvider;
use super::CalendarGateway;
use crate::error::GatewayError;
use crate::hours::WorkingHours;
use crate::interval::Interval;

/// Google Calendar v3 API root.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar gateway backed by the Google Calendar v3 API.
pub struct GoogleCalendarGateway<C: CredentialProvider> {
    credentials: C,
    hours: WorkingHours,
    base_url: String,
}

impl<C: CredentialProvider> GoogleCalendarGateway<C> {
    /// Create a gateway for the given credentials. `hours` is the
    /// caller-declared working-hours policy; event creation outside it is
    /// rejected before any network call.
    pub fn new(credentials: C, hours: WorkingHours) -> Self {
        Self {
            credentials,
            hours,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API root (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send a request, refreshing the token and retrying once on 401.
    fn request_json<F>(&self, build: F) -> Result<serde_json::Value, GatewayError>
    where
        F: Fn(&Client, &str) -> reqwest::RequestBuilder,
    {
        let handle = tokio::runtime::Handle::current();
        let client = Client::new();

        let token = self.credentials.access_token()?;
        let mut resp = handle.block_on(build(&client, &token).send())?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let token = self.credentials.refresh_access_token()?;
            resp = handle.block_on(build(&client, &token).send())?;
            if resp.status() == StatusCode::UNAUTHORIZED {
                return Err(GatewayError::Auth(
                    "access token rejected after refresh".to_string(),
                ));
            }
        }

        let status = resp.status();
        let body: serde_json::Value = handle.block_on(resp.json())?;

        if let Some(err) = body.get("error") {
            return Err(GatewayError::Api(format!("Google Calendar API error: {err}")));
        }
        if !status.is_success() {
            return Err(GatewayError::Api(format!(
                "Google Calendar API returned HTTP {status}"
            )));
        }

        Ok(body)
    }
}

impl<C: CredentialProvider> CalendarGateway for GoogleCalendarGateway<C> {
    fn list_busy(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, GatewayError> {
        let url = format!("{}/freeBusy", self.base_url);
        let request = json!({
            "timeMin": range_start.to_rfc3339(),
            "timeMax": range_end.to_rfc3339(),
            "items": [{"id": "primary"}],
        });

        let body = self.request_json(|client, token| {
            client.post(&url).bearer_auth(token).json(&request)
        })?;

        let mut busy = Vec::new();
        if let Some(periods) = body["calendars"]["primary"]["busy"].as_array() {
            for period in periods {
                let start = parse_rfc3339(&period["start"])?;
                let end = parse_rfc3339(&period["end"])?;
                let interval =
                    Interval::new(start, end).map_err(|e| GatewayError::Api(e.to_string()))?;
                busy.push(interval);
            }
        }

        Ok(busy)
    }

    fn create_event(&self, label: &str, interval: &Interval) -> Result<String, GatewayError> {
        // Contract check: the scheduler must never hand us an
        // out-of-bounds interval.
        if !self.hours.contains(interval) {
            return Err(GatewayError::OutsideWorkingHours {
                start: interval.start,
                end: interval.end,
            });
        }

        let url = format!("{}/calendars/primary/events", self.base_url);
        let request = json!({
            "summary": label,
            "start": {"dateTime": interval.start.to_rfc3339()},
            "end": {"dateTime": interval.end.to_rfc3339()},
        });

        let body = self.request_json(|client, token| {
            client.post(&url).bearer_auth(token).json(&request)
        })?;

        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::Api("missing event id in response".to_string()))
    }
}

fn parse_rfc3339(value: &serde_json::Value) -> Result<DateTime<Utc>, GatewayError> {
    let raw = value
        .as_str()
        .ok_or_else(|| GatewayError::Api("missing time in busy period".to_string()))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| GatewayError::Api(format!("invalid time format: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StaticCredentials;
    use chrono::TimeZone;

    fn hours() -> WorkingHours {
        WorkingHours::new("09:00", "18:00").unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 25, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_list_busy_parses_freebusy_response() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/freeBusy")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"calendars": {"primary": {"busy": [
                    {"start": "2024-11-25T09:00:00Z", "end": "2024-11-25T10:30:00Z"},
                    {"start": "2024-11-25T13:00:00Z", "end": "2024-11-25T14:00:00Z"}
                ]}}}"#,
            )
            .create();

        let gateway = GoogleCalendarGateway::new(StaticCredentials::new("tok"), hours())
            .with_base_url(server.url());

        let busy = gateway.list_busy(at(9, 0), at(18, 0)).unwrap();
        assert_eq!(busy.len(), 2);
        assert_eq!(busy[0], Interval::from_start(at(9, 0), 90));
        assert_eq!(busy[1], Interval::from_start(at(13, 0), 60));
    }

    #[test]
    fn test_list_busy_empty_calendar() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/freeBusy")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"calendars": {"primary": {"busy": []}}}"#)
            .create();

        let gateway = GoogleCalendarGateway::new(StaticCredentials::new("tok"), hours())
            .with_base_url(server.url());

        assert!(gateway.list_busy(at(9, 0), at(18, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_create_event_returns_id() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/calendars/primary/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "evt-123", "status": "confirmed"}"#)
            .create();

        let gateway = GoogleCalendarGateway::new(StaticCredentials::new("tok"), hours())
            .with_base_url(server.url());

        let interval = Interval::from_start(at(10, 0), 60);
        assert_eq!(gateway.create_event("[Focus] Write report", &interval).unwrap(), "evt-123");
    }

    #[test]
    fn test_create_event_outside_working_hours_rejected_locally() {
        // No server: the contract check fires before any network call.
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let gateway = GoogleCalendarGateway::new(StaticCredentials::new("tok"), hours())
            .with_base_url("http://127.0.0.1:9");

        let interval = Interval::from_start(at(17, 30), 60);
        assert!(matches!(
            gateway.create_event("[Focus] Late", &interval),
            Err(GatewayError::OutsideWorkingHours { .. })
        ));
    }

    #[test]
    fn test_unauthorized_refreshes_once_then_surfaces_auth_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        let busy_mock = server
            .mock("POST", "/freeBusy")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 401, "message": "Invalid Credentials"}}"#)
            .expect(2)
            .create();
        let token_mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok-2"}"#)
            .expect(1)
            .create();

        let creds = StaticCredentials::new("tok-1")
            .with_refresh("refresh-1", "client", "secret")
            .with_token_url(format!("{}/token", server.url()));
        let gateway = GoogleCalendarGateway::new(creds, hours()).with_base_url(server.url());

        assert!(matches!(
            gateway.list_busy(at(9, 0), at(18, 0)),
            Err(GatewayError::Auth(_))
        ));
        busy_mock.assert();
        token_mock.assert();
    }

    #[test]
    fn test_api_error_body_maps_to_api_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let mut server = mockito::Server::new();
        server
            .mock("POST", "/freeBusy")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 403, "message": "Calendar API not enabled"}}"#)
            .create();

        let gateway = GoogleCalendarGateway::new(StaticCredentials::new("tok"), hours())
            .with_base_url(server.url());

        assert!(matches!(
            gateway.list_busy(at(9, 0), at(18, 0)),
            Err(GatewayError::Api(_))
        ));
    }
}
