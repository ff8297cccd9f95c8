use std::time::Duration;

use chrono::{Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult, HolidayConfig};

const COUNTRY: &str = "India";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holiday {
    pub date: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HolidayCalendar {
    pub country: String,
    pub from: String,
    pub to: String,
    pub total: usize,
    pub holidays: Vec<Holiday>,
}

#[derive(Debug, Deserialize)]
struct EventFeed {
    #[serde(default)]
    items: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(default)]
    summary: String,
    start: EventStart,
}

#[derive(Debug, Deserialize)]
struct EventStart {
    // All-day events carry `date`; timed events carry `dateTime` instead.
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "dateTime")]
    date_time: Option<String>,
}

/// Client for the public-holiday feed of the Google Calendar v3 API.
pub struct HolidayClient {
    http: reqwest::Client,
    config: HolidayConfig,
}

impl HolidayClient {
    pub fn new(config: HolidayConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::External(format!("holiday client init failed: {e}")))?;
        Ok(HolidayClient { http, config })
    }

    /// Lists holidays from today through the same date next year, ordered
    /// by start time.
    pub async fn upcoming_year(&self) -> CoreResult<HolidayCalendar> {
        let from = Utc::now();
        let to = from
            .with_year(from.year() + 1)
            .unwrap_or(from + chrono::Duration::days(365));

        let url = format!(
            "{}/calendars/{}/events",
            self.config.base_url,
            self.config.calendar_id.replace('#', "%23")
        );
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("timeMin", &from.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", &to.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .map_err(|e| CoreError::External(format!("holiday feed request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::External(format!(
                "holiday feed returned {}",
                response.status()
            )));
        }

        let feed: EventFeed = response
            .json()
            .await
            .map_err(|e| CoreError::External(format!("holiday feed body unreadable: {e}")))?;

        let holidays: Vec<Holiday> = feed.items.into_iter().filter_map(to_holiday).collect();
        Ok(HolidayCalendar {
            country: COUNTRY.to_string(),
            from: from.format("%Y-%m-%d").to_string(),
            to: to.format("%Y-%m-%d").to_string(),
            total: holidays.len(),
            holidays,
        })
    }
}

fn to_holiday(event: Event) -> Option<Holiday> {
    // A timed event keeps only the YYYY-MM-DD prefix; anything too short
    // or not cleanly sliceable there is treated as a broken entry.
    let date = event
        .start
        .date
        .or_else(|| event.start.date_time.and_then(|dt| dt.get(..10).map(str::to_string)))?;
    Some(Holiday {
        date,
        name: event.summary,
    })
}
