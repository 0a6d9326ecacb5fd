use reqwest::Client;
use serde::Serialize;

use crate::config::UpstreamConfig;

/// Client for the third-party newsletter-subscription API.
///
/// Owns the fully-built subscribe URL and the publication this service
/// relays signups to. Returns the raw upstream response; interpreting the
/// status code is the caller's job.
#[derive(Debug, Clone)]
pub struct NewsletterClient {
    pub http_client: Client,
    pub subscribe_url: reqwest::Url,
    publication_id: String,
}

impl NewsletterClient {
    pub fn new<S: AsRef<str>>(
        base_url: S,
        subscribe_path: S,
        publication_id: String,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        // The upstream contract is `{base}{path}`, joined by plain
        // concatenation, so don't use `Url::join` here.
        let subscribe_url = format!("{}{}", base_url.as_ref(), subscribe_path.as_ref());
        let subscribe_url =
            reqwest::Url::parse(&subscribe_url).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(NewsletterClient {
            http_client,
            subscribe_url,
            publication_id,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Self::new(
            &config.url,
            &config.subscribe_path,
            config.publication_id.clone(),
            config.timeout(),
        )
    }

    pub async fn subscribe<S>(&self, email: S) -> Result<reqwest::Response>
    where
        S: AsRef<str>,
    {
        let body = SubscribeBody {
            publication_id: &self.publication_id,
            email: email.as_ref(),
        };

        let resp = self
            .http_client
            .post(self.subscribe_url.clone())
            .json(&body)
            .send()
            .await?;

        Ok(resp)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody<'a> {
    pub publication_id: &'a str,
    pub email: &'a str,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, derive_more::From)]
pub enum Error {
    UrlParsing(String),
    #[from]
    Reqwest(reqwest::Error),
}
// Error Boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
