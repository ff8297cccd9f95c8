use std::collections::HashMap;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult, HijriConfig};

const CITY: &str = "Bangalore";
const CALCULATION_METHOD: &str = "5";
const MONTHS_AHEAD: u32 = 12;

static URDU_WEEKDAYS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Sunday", "اتوار"),
        ("Monday", "پیر"),
        ("Tuesday", "منگل"),
        ("Wednesday", "بدھ"),
        ("Thursday", "جمعرات"),
        ("Friday", "جمعہ"),
        ("Saturday", "ہفتہ"),
    ])
});

static URDU_MONTHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Muharram", "محرم"),
        ("Safar", "صفر"),
        ("Rabi al-awwal", "ربیع الاول"),
        ("Rabi al-thani", "ربیع الثانی"),
        ("Jumada al-awwal", "جمادی الاول"),
        ("Jumada al-thani", "جمادی الثانی"),
        ("Rajab", "رجب"),
        ("Sha'ban", "شعبان"),
        ("Ramadan", "رمضان"),
        ("Shawwal", "شوال"),
        ("Dhu al-Qadah", "ذوالقعدہ"),
        ("Dhu al-Hijjah", "ذوالحجہ"),
    ])
});

static ARABIC_TO_URDU_WEEKDAYS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("الأحد", "اتوار"),
        ("الإثنين", "پیر"),
        ("الثلاثاء", "منگل"),
        ("الأربعاء", "بدھ"),
        ("الخميس", "جمعرات"),
        ("الجمعة", "جمعہ"),
        ("السبت", "ہفتہ"),
    ])
});

/// One day of the gregorian-to-hijri mapping, with Urdu labels resolved
/// from the baked-in tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HijriDay {
    pub gregorian: String,
    pub hijri: String,
    pub weekday_en: String,
    pub weekday_ar: String,
    pub weekday_ur: String,
    pub month_en: String,
    pub month_ur: String,
    pub year: String,
    pub hijri_day: String,
    pub holidays: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HijriCalendar {
    pub city: String,
    pub from: String,
    pub to: String,
    pub total_days: usize,
    pub hijri_calendar: Vec<HijriDay>,
}

#[derive(Debug, Deserialize)]
struct MonthFeed {
    data: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    gregorian: GregorianPart,
    hijri: HijriPart,
}

#[derive(Debug, Deserialize)]
struct GregorianPart {
    date: String,
}

#[derive(Debug, Deserialize)]
struct HijriPart {
    date: String,
    day: String,
    year: String,
    weekday: LocalizedName,
    month: LocalizedName,
    #[serde(default)]
    holidays: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedName {
    en: String,
    #[serde(default)]
    ar: String,
}

/// Client for the AlAdhan gregorian-to-hijri month feed.
pub struct HijriClient {
    http: reqwest::Client,
    config: HijriConfig,
}

impl HijriClient {
    pub fn new(config: HijriConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::External(format!("hijri client init failed: {e}")))?;
        Ok(HijriClient { http, config })
    }

    /// Fetches the next twelve months starting from the current one and
    /// flattens them into a single day list. Feed failures propagate;
    /// there is no partial result.
    pub async fn upcoming_year(&self) -> CoreResult<HijriCalendar> {
        let today = Local::now().date_naive();
        let mut year = today.year();
        let mut month = today.month();

        let mut days = Vec::new();
        for _ in 0..MONTHS_AHEAD {
            days.extend(self.month_feed(month, year).await?);
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        // The cursor now points at the first month past the range.
        let to = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| CoreError::Computation("calendar range end out of bounds".to_string()))?;

        Ok(HijriCalendar {
            city: CITY.to_string(),
            from: today.format("%Y-%m-%d").to_string(),
            to: to.format("%Y-%m-%d").to_string(),
            total_days: days.len(),
            hijri_calendar: days,
        })
    }

    async fn month_feed(&self, month: u32, year: i32) -> CoreResult<Vec<HijriDay>> {
        let url = format!("{}/v1/gToHCalendar/{month}/{year}", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                ("method", CALCULATION_METHOD.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CoreError::External(format!("hijri feed request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::External(format!(
                "hijri feed returned {} for {month}/{year}",
                response.status()
            )));
        }

        let feed: MonthFeed = response
            .json()
            .await
            .map_err(|e| CoreError::External(format!("hijri feed body unreadable: {e}")))?;
        Ok(feed.data.into_iter().map(to_day).collect())
    }
}

fn to_day(entry: FeedEntry) -> HijriDay {
    let weekday_en = entry.hijri.weekday.en;
    let weekday_ar = entry.hijri.weekday.ar;
    let weekday_ur = ARABIC_TO_URDU_WEEKDAYS
        .get(weekday_ar.as_str())
        .or_else(|| URDU_WEEKDAYS.get(weekday_en.as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| weekday_ar.clone());

    let month_en = entry.hijri.month.en;
    let month_ur = URDU_MONTHS
        .get(month_en.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| entry.hijri.month.ar.clone());

    HijriDay {
        gregorian: entry.gregorian.date,
        hijri: entry.hijri.date,
        weekday_en,
        weekday_ar,
        weekday_ur,
        month_en,
        month_ur,
        year: entry.hijri.year,
        hijri_day: entry.hijri.day,
        holidays: entry.hijri.holidays,
    }
}
