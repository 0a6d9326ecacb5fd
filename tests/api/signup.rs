//! Tests the whole inbound contract of the signup relay: the origin,
//! method and validation gates, the upstream pass-through and the
//! fault paths.

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, ALLOWED_ORIGIN, SECOND_ALLOWED_ORIGIN, SUBSCRIBE_PATH};

#[tokio::test]
async fn signup_rejects_missing_or_unknown_origin_with_403() -> Result<()> {
    let app = TestApp::spawn().await?;

    // No origin header at all, harmless GET.
    let res = app.http_client.get(app.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN),
        "403 must carry the fallback origin"
    );
    assert_eq!(res.text().await?, "Forbidden");

    // Unknown origin with an otherwise perfectly valid signup POST.
    let res = app
        .http_client
        .post(app.url("/"))
        .header("origin", "https://evil.example.com")
        .json(&json!({ "email": "jd@example.com" }))
        .send()
        .await?;
    assert_eq!(
        res.status(),
        StatusCode::FORBIDDEN,
        "the origin gate runs before method and body checks"
    );
    assert_eq!(res.text().await?, "Forbidden");

    Ok(())
}

#[tokio::test]
async fn signup_rejects_non_post_with_405() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(app.url("/"))
        .header("origin", SECOND_ALLOWED_ORIGIN)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers().get("allow").and_then(|v| v.to_str().ok()),
        Some("POST")
    );
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(SECOND_ALLOWED_ORIGIN),
        "405 echoes the already-validated request origin"
    );
    assert_eq!(res.text().await?, "Method not allowed");

    Ok(())
}

#[tokio::test]
async fn signup_rejects_non_json_content_type_with_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    // No content-type header.
    let res = app
        .http_client
        .post(app.url("/"))
        .header("origin", ALLOWED_ORIGIN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(res.text().await?, "Request body is not json");

    // Wrong content-type, JSON-looking body notwithstanding.
    let res = app
        .http_client
        .post(app.url("/"))
        .header("origin", ALLOWED_ORIGIN)
        .header("content-type", "text/plain")
        .body(r#"{"email":"jd@example.com"}"#)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "Request body is not json");

    Ok(())
}

#[tokio::test]
async fn signup_rejects_missing_or_empty_email_with_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({}), "No email field"),
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": null }), "Null email"),
    ];

    for (body, description) in cases {
        let res = app.post_signup(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong status for case: {description}"
        );
        assert_eq!(
            res.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some(ALLOWED_ORIGIN),
            "Missing CORS header for case: {description}"
        );
        assert_eq!(res.text().await?, "Email is required");
    }

    Ok(())
}

#[tokio::test]
async fn signup_relays_upstream_200_with_cors_headers() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(SUBSCRIBE_PATH))
        .and(method("POST"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "publicationId": "test-publication",
            "email": "jd@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&app.upstream_server)
        .await;

    let res = app.post_signup(&json!({ "email": "jd@example.com" })).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers().clone();
    for (name, expected) in [
        ("access-control-allow-origin", ALLOWED_ORIGIN),
        ("access-control-allow-methods", "POST"),
        ("access-control-allow-headers", "Content-Type"),
        ("access-control-max-age", "86400"),
    ] {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(expected),
            "Wrong value for header: {name}"
        );
    }
    assert_eq!(res.json::<serde_json::Value>().await?, json!({ "ok": true }));

    Ok(())
}

#[tokio::test]
async fn signup_accepts_any_path() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(SUBSCRIBE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&app.upstream_server)
        .await;

    // The endpoint is path-agnostic; any path enters the decision tree.
    let res = app
        .http_client
        .post(app.url("/some/random/path"))
        .header("origin", ALLOWED_ORIGIN)
        .json(&json!({ "email": "jd@example.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn signup_collapses_upstream_failure_statuses_to_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(SUBSCRIBE_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "dup" })))
        .expect(1)
        .mount(&app.upstream_server)
        .await;

    let res = app.post_signup(&json!({ "email": "jd@example.com" })).await?;

    assert_eq!(
        res.status(),
        StatusCode::BAD_REQUEST,
        "Non-200 upstream statuses collapse into 400"
    );
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    assert_eq!(
        res.json::<serde_json::Value>().await?,
        json!({ "error": "dup" }),
        "The upstream error body is forwarded verbatim"
    );

    Ok(())
}

#[tokio::test]
async fn signup_malformed_inbound_json_is_a_500() -> Result<()> {
    let app = TestApp::spawn().await?;

    // Declared JSON but unparseable: a fault, not a validation 400.
    let res = app
        .http_client
        .post(app.url("/"))
        .header("origin", ALLOWED_ORIGIN)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn signup_non_json_upstream_body_is_a_500() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(SUBSCRIBE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&app.upstream_server)
        .await;

    let res = app.post_signup(&json!({ "email": "jd@example.com" })).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
