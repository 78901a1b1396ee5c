//! Postal-code resolution client.
//!
//! The HTTP adapter owns transport details only: URL building, timeout, status handling
//! and JSON decoding into a [`Resolution`].

use crate::{FormError, FormResult};
use api_shared::AddressRes;
use async_trait::async_trait;
use docdir_core::PostalCode;
use reqwest::{Client, Url};
use std::time::Duration;

/// Address breakdown returned for a postal code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub address: String,
    pub neighborhood: String,
    pub city: String,
    pub state_province: String,
}

/// Result of a single resolution attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedAddress),
    NotFound,
    /// The service could not be reached or answered with something unrecognisable.
    TransportFailure(String),
}

impl From<AddressRes> for Resolution {
    fn from(res: AddressRes) -> Self {
        match res {
            AddressRes::Found(found) => Resolution::Resolved(ResolvedAddress {
                address: found.street,
                neighborhood: found.neighborhood,
                city: found.city,
                state_province: found.state_abbreviation,
            }),
            AddressRes::NotFound(_) => Resolution::NotFound,
        }
    }
}

/// Looks up the address for a complete postal code.
#[async_trait]
pub trait PostalCodeResolver: Send + Sync {
    /// Issues exactly one lookup for `code`. Never fails; problems are reported as
    /// [`Resolution::TransportFailure`].
    async fn resolve(&self, code: &PostalCode) -> Resolution;
}

/// Resolver calling `GET {base}/api/services/address/{code}` on the directory API.
#[derive(Clone, Debug)]
pub struct HttpPostalCodeResolver {
    client: Client,
    base_url: String,
}

impl HttpPostalCodeResolver {
    /// Build a resolver using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an absolute URL or the client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> FormResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
        })
    }

    fn lookup_url(&self, code: &PostalCode) -> String {
        format!("{}/api/services/address/{code}", self.base_url)
    }
}

/// Validates a base URL and strips any trailing slash.
pub(crate) fn normalise_base_url(base_url: &str) -> FormResult<String> {
    Url::parse(base_url).map_err(|e| FormError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(base_url.trim_end_matches('/').to_string())
}

#[async_trait]
impl PostalCodeResolver for HttpPostalCodeResolver {
    async fn resolve(&self, code: &PostalCode) -> Resolution {
        let response = match self
            .client
            .get(self.lookup_url(code))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Resolution::TransportFailure(format!("request failed: {e}")),
        };

        let status = response.status();
        if status.is_server_error() {
            return Resolution::TransportFailure(format!("lookup service returned {status}"));
        }

        match response.json::<AddressRes>().await {
            Ok(body) => Resolution::from(body),
            Err(e) => Resolution::TransportFailure(format!("unrecognised lookup response: {e}")),
        }
    }
}
