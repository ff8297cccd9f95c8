use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venue_desk::core::{CoreError, DriveConfig};
use venue_desk::storage::{DriveClient, StaticCredentialStore};

fn client_for(server: &MockServer) -> DriveClient {
    let config = DriveConfig {
        api_base_url: server.uri(),
        content_base_url: server.uri(),
        ..DriveConfig::default()
    };
    DriveClient::new(config, Arc::new(StaticCredentialStore::new("refresh-abc"))).unwrap()
}

async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-1",
            "token_type": "bearer",
            "expires_in": 14400
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn upload_sends_the_api_arg_header_and_returns_the_stored_path() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .and(header("content-type", "application/octet-stream"))
        .and(header_exists("Dropbox-API-Arg"))
        .and(header("authorization", "Bearer at-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path_lower": "/gst_bill_b1.pdf",
            "path_display": "/GST_Bill_b1.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stored = client
        .upload("/GST_Bill_b1.pdf", Bytes::from_static(b"%PDF-1.3"))
        .await
        .unwrap();
    assert_eq!(stored, "/GST_Bill_b1.pdf");
}

#[tokio::test]
async fn the_access_token_is_cached_across_calls() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path_lower": "/a.pdf"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.upload("/a.pdf", Bytes::from_static(b"one")).await.unwrap();
    client.upload("/a.pdf", Bytes::from_static(b"two")).await.unwrap();
}

#[tokio::test]
async fn a_rejected_token_is_refreshed_and_the_upload_replayed_once() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired_access_token"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path_lower": "/gst_bill_b1.pdf",
            "path_display": "/GST_Bill_b1.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stored = client
        .upload("/GST_Bill_b1.pdf", Bytes::from_static(b"%PDF-1.3"))
        .await
        .unwrap();
    assert_eq!(stored, "/GST_Bill_b1.pdf");
}

#[tokio::test]
async fn a_second_rejection_is_not_retried_again() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired_access_token"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .upload("/GST_Bill_b1.pdf", Bytes::from_static(b"%PDF-1.3"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StorageAuth(_)), "got {err:?}");
}

#[tokio::test]
async fn a_fresh_share_link_is_created() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .and(body_string_contains("/GST_Bill_b1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://www.dropbox.com/s/abc/GST_Bill_b1.pdf?dl=0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = client.get_or_create_share_link("/GST_Bill_b1.pdf").await.unwrap();
    assert_eq!(url, "https://www.dropbox.com/s/abc/GST_Bill_b1.pdf?dl=0");
}

#[tokio::test]
async fn an_existing_share_link_is_listed_and_reused() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "shared_link_already_exists/metadata/",
            "error": { ".tag": "shared_link_already_exists" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/list_shared_links"))
        .and(body_string_contains("direct_only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": [
                { "url": "https://www.dropbox.com/s/abc/GST_Bill_b1.pdf?dl=0" },
                { "url": "https://www.dropbox.com/s/def/GST_Bill_b1.pdf?dl=0" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = client.get_or_create_share_link("/GST_Bill_b1.pdf").await.unwrap();
    assert_eq!(url, "https://www.dropbox.com/s/abc/GST_Bill_b1.pdf?dl=0");
}

#[tokio::test]
async fn no_listable_link_surfaces_as_link_unavailable() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "shared_link_already_exists/",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/list_shared_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "links": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_or_create_share_link("/GST_Bill_b1.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::LinkUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn provider_throttling_maps_to_rate_limited() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(429).set_body_string("too_many_requests"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .upload("/a.pdf", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::RateLimited), "got {err:?}");
}

#[tokio::test]
async fn missing_file_maps_to_not_found() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/2/sharing/create_shared_link_with_settings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_or_create_share_link("/missing.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn the_auth_code_exchange_returns_the_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=one-time-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-1",
            "refresh_token": "refresh-new",
            "expires_in": 14400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let refresh = client.exchange_auth_code("one-time-code").await.unwrap();
    use secrecy::ExposeSecret;
    assert_eq!(refresh.expose_secret(), "refresh-new");
}

#[tokio::test]
async fn an_exchange_without_a_refresh_token_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-1"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.exchange_auth_code("one-time-code").await.unwrap_err();
    assert!(matches!(err, CoreError::StorageAuth(_)), "got {err:?}");
}
