use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    web::{
        types::{SignupEmail, SignupRequest},
        Error, Result,
    },
    AppState,
};

/// Signup payloads are tiny; anything larger is not a signup.
const BODY_LIMIT: usize = 16 * 1024;

/// The signup relay. Six gates, strictly in order, first failure wins:
/// origin allow-list, method, content-type / body parse, email presence,
/// upstream call, status translation. The gate outcomes (403/405/400) are
/// plain responses with fixed bodies; JSON parse failures on either side of
/// the relay and upstream transport failures are `Error`s and surface as a
/// 500 through the response mapper.
#[tracing::instrument(name = "Relaying newsletter signup", skip_all)]
pub async fn signup(State(app_state): State<AppState>, req: Request) -> Result<Response> {
    let cors_config = &app_state.config.cors_config;

    // Gate 1: origin. Runs before everything else; a disallowed caller is
    // rejected no matter its method or payload, and only ever sees the
    // fallback origin in the CORS header.
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    if !cors_config.is_allowed(&origin) {
        info!("rejecting disallowed origin: {origin:?}");
        return Ok((
            StatusCode::FORBIDDEN,
            [(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                cors_config.fallback_origin().to_owned(),
            )],
            "Forbidden",
        )
            .into_response());
    }

    // Gate 2: method.
    if req.method() != Method::POST {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [
                (header::ALLOW, "POST".to_owned()),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone()),
            ],
            "Method not allowed",
        )
            .into_response());
    }

    // Gate 3: the body only counts as JSON if the content-type says so.
    // A body without the JSON content-type is a 400; a declared-JSON body
    // that fails to parse is a fault instead, not a 400.
    let declares_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !declares_json {
        return Ok(plain_text_400(&origin, "Request body is not json"));
    }

    let body = to_bytes(req.into_body(), BODY_LIMIT)
        .await
        .map_err(Error::BodyRead)?;
    let payload: SignupRequest =
        serde_json::from_slice(&body).map_err(Error::SignupJsonMalformed)?;

    // Gate 4: email presence.
    let email = match SignupEmail::try_from(payload) {
        Ok(email) => email,
        Err(_) => return Ok(plain_text_400(&origin, "Email is required")),
    };

    // Gate 5: the single suspending operation, the upstream call.
    let upstream_resp = app_state.newsletter_client.subscribe(&email).await?;
    let upstream_status = upstream_resp.status();
    let upstream_body = upstream_resp.text().await?;
    let upstream_body: serde_json::Value =
        serde_json::from_str(&upstream_body).map_err(Error::UpstreamJsonMalformed)?;

    // Gate 6: 200 passes through; every other upstream status collapses
    // into a generic 400 with the upstream body forwarded as-is.
    let status = if upstream_status.as_u16() == 200 {
        info!("signup accepted upstream");
        StatusCode::OK
    } else {
        info!("upstream refused the signup: {upstream_status}");
        StatusCode::BAD_REQUEST
    };

    Ok((status, cors_headers(&origin), Json(upstream_body)).into_response())
}

// ###################################
// ->   HELPERS
// ###################################

fn plain_text_400(origin: &str, msg: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [
            (header::CONTENT_TYPE, "text/plain".to_owned()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.to_owned()),
        ],
        msg,
    )
        .into_response()
}

/// The full CORS header set attached to both relay outcomes (200 and the
/// collapsed 400), so browsers can read the forwarded upstream body.
fn cors_headers(origin: &str) -> [(HeaderName, String); 4] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.to_owned()),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST".to_owned()),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type".to_owned()),
        (header::ACCESS_CONTROL_MAX_AGE, "86400".to_owned()),
    ]
}
