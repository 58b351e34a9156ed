//! Contract tests for the Instantly client against a wiremock server.

use campaign_analytics_service::daterange::DateWindow;
use campaign_analytics_service::fetcher::instantly::InstantlyClient;
use campaign_analytics_service::fetcher::{CampaignAnalyticsClient, FetcherError};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_campaign_listing_follows_pagination_cursor() {
    let mock_server = MockServer::start().await;

    // The cursor-bearing page must be mounted first: first match wins.
    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns"))
        .and(query_param("starting_after", "cursor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "campaign-3"}],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "campaign-1"}, {"id": "campaign-2"}, {"name": "no id, skipped"}],
            "next_starting_after": "cursor-1",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = InstantlyClient::with_base_url(mock_server.uri());
    let ids = client.list_campaign_ids("test-key").await.unwrap();
    assert_eq!(ids, vec!["campaign-1", "campaign-2", "campaign-3"]);
}

#[tokio::test]
async fn test_daily_analytics_parses_rows_and_ignores_extra_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns/analytics/daily"))
        .and(query_param("campaign_id", "campaign-1"))
        .and(query_param("start_date", "2025-01-01"))
        .and(query_param("end_date", "2025-01-07"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2025-01-01", "sent": 5, "opened": 2, "clicks": 1},
            {"date": "2025-01-02", "sent": 0},
        ])))
        .mount(&mock_server)
        .await;

    let client = InstantlyClient::with_base_url(mock_server.uri());
    let window = DateWindow {
        start: date(2025, 1, 1),
        end: date(2025, 1, 7),
    };
    let days = client
        .fetch_daily_analytics("test-key", "campaign-1", window)
        .await
        .unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(2025, 1, 1));
    assert_eq!(days[0].sent, 5);
    assert_eq!(days[1].sent, 0);
}

#[tokio::test]
async fn test_rate_limited_call_is_retried_until_success() {
    let mock_server = MockServer::start().await;

    // One 429, then a normal page; the retry primitive should absorb the
    // first response and surface only the final value.
    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "campaign-1"}],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = InstantlyClient::with_base_url(mock_server.uri());
    let ids = client.list_campaign_ids("test-key").await.unwrap();
    assert_eq!(ids, vec!["campaign-1"]);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/campaigns"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = InstantlyClient::with_base_url(mock_server.uri());
    let error = client.list_campaign_ids("wrong-key").await.unwrap_err();
    match error {
        FetcherError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
