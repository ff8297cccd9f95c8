use serde_json::json;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venue_desk::calendar::{HijriClient, Holiday, HolidayClient};
use venue_desk::core::{CoreError, HijriConfig, HolidayConfig};

fn hijri_month_feed() -> serde_json::Value {
    json!({
        "data": [
            {
                "gregorian": { "date": "01-09-2026" },
                "hijri": {
                    "date": "19-03-1448",
                    "day": "19",
                    "year": "1448",
                    "weekday": { "en": "Al Sabt", "ar": "السبت" },
                    "month": { "en": "Ramadan", "ar": "رَمَضان" },
                    "holidays": ["Laylat al-Qadr"]
                }
            },
            {
                "gregorian": { "date": "02-09-2026" },
                "hijri": {
                    "date": "20-03-1448",
                    "day": "20",
                    "year": "1448",
                    "weekday": { "en": "Al Ahad", "ar": "الأحد" },
                    "month": { "en": "Ramadan", "ar": "رَمَضان" }
                }
            }
        ]
    })
}

#[tokio::test]
async fn hijri_year_is_stitched_from_twelve_month_feeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1/gToHCalendar/\d+/\d+$"))
        .and(query_param("latitude", "12.9716"))
        .and(query_param("longitude", "77.5946"))
        .and(query_param("method", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hijri_month_feed()))
        .expect(12)
        .mount(&server)
        .await;

    let client = HijriClient::new(HijriConfig {
        base_url: server.uri(),
        ..HijriConfig::default()
    })
    .unwrap();
    let calendar = client.upcoming_year().await.unwrap();

    assert_eq!(calendar.city, "Bangalore");
    assert_eq!(calendar.total_days, 24);
    assert_eq!(calendar.hijri_calendar.len(), 24);
    // Roughly a year ahead; both ends are yyyy-mm-dd so they compare as text.
    assert!(calendar.to.as_str() > calendar.from.as_str());

    let first = &calendar.hijri_calendar[0];
    assert_eq!(first.gregorian, "01-09-2026");
    assert_eq!(first.weekday_ur, "ہفتہ");
    assert_eq!(first.month_ur, "رمضان");
    assert_eq!(first.hijri_day, "19");
    assert_eq!(first.holidays, vec!["Laylat al-Qadr".to_string()]);

    let second = &calendar.hijri_calendar[1];
    assert_eq!(second.weekday_ur, "اتوار");
    assert!(second.holidays.is_empty());
}

#[tokio::test]
async fn a_failing_hijri_month_aborts_the_whole_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1/gToHCalendar/\d+/\d+$"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = HijriClient::new(HijriConfig {
        base_url: server.uri(),
        ..HijriConfig::default()
    })
    .unwrap();
    let err = client.upcoming_year().await.unwrap_err();
    assert!(matches!(err, CoreError::External(_)), "{err}");
}

#[tokio::test]
async fn holidays_come_back_with_dates_and_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/calendars/.+/events$"))
        .and(query_param("key", "test-key"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "summary": "Diwali", "start": { "date": "2026-11-08" } },
                { "summary": "Republic Day", "start": { "dateTime": "2027-01-26T00:00:00+05:30" } },
                { "summary": "Broken", "start": {} }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HolidayClient::new(HolidayConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..HolidayConfig::default()
    })
    .unwrap();
    let calendar = client.upcoming_year().await.unwrap();

    assert_eq!(calendar.country, "India");
    assert_eq!(calendar.total, 2);
    assert_eq!(
        calendar.holidays[0],
        Holiday {
            date: "2026-11-08".to_string(),
            name: "Diwali".to_string(),
        }
    );
    assert_eq!(calendar.holidays[1].date, "2027-01-26");

    // The window sent upstream is a closed year in UTC.
    let requests = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.iter().any(|(k, v)| k == "timeMin" && v.ends_with('Z')));
    assert!(pairs.iter().any(|(k, v)| k == "timeMax" && v.ends_with('Z')));
}

#[tokio::test]
async fn a_rejected_holiday_key_surfaces_as_a_feed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/calendars/.+/events$"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = HolidayClient::new(HolidayConfig {
        base_url: server.uri(),
        api_key: "bad-key".to_string(),
        ..HolidayConfig::default()
    })
    .unwrap();
    let err = client.upcoming_year().await.unwrap_err();
    assert!(matches!(err, CoreError::External(_)), "{err}");
}
