use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

pub type Result<T> = core::result::Result<T, Error>;

/// Faults only. The 403/405/400 outcomes of the signup decision tree are
/// regular responses built by the handler; what lands here is the stuff the
/// original behavior let crash: malformed JSON on either side of the relay
/// and upstream transport failures. All of it maps to a 500.
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("inbound body declared JSON but failed to parse: {0}")]
    SignupJsonMalformed(#[source] serde_json::Error),
    #[error("upstream response body is not valid JSON: {0}")]
    UpstreamJsonMalformed(#[source] serde_json::Error),
    #[error("failed to read the request body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("newsletter client error: {0}")]
    NewsletterClient(#[from] crate::newsletter_client::Error),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        // Every variant is a server-side fault; none is user-correctable.
        (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Service Error!")]
    ServiceError,
}
