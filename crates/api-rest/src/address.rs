//! Outbound postal-code lookup.
//!
//! [`ViaCepAddressSource`] owns transport details only: URL building, timeout, HTTP status
//! mapping and JSON decoding. The handler maps its result onto the lookup endpoint's body.

use std::time::Duration;

use api_shared::AddressFound;
use async_trait::async_trait;
use docdir_core::PostalCode;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AddressLookupError {
    #[error("address service unreachable: {0}")]
    Transport(String),
    #[error("address service returned status {0}")]
    Status(u16),
    #[error("invalid address service payload: {0}")]
    Decode(String),
}

/// Source of address breakdowns keyed by postal code.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Returns `Ok(None)` when the code is well formed but unknown to the service.
    async fn lookup(&self, code: &PostalCode) -> Result<Option<AddressFound>, AddressLookupError>;
}

/// Adapter for ViaCEP-compatible services: `GET {base}/{code}/json/`.
pub struct ViaCepAddressSource {
    client: Client,
    base_url: String,
}

impl ViaCepAddressSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressSource for ViaCepAddressSource {
    async fn lookup(&self, code: &PostalCode) -> Result<Option<AddressFound>, AddressLookupError> {
        let url = format!("{}/{code}/json/", self.base_url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AddressLookupError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AddressLookupError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(AddressLookupError::Status(status.as_u16()));
        }

        parse_viacep(body.as_ref())
    }
}

/// Raw ViaCEP body. Unknown codes come back as `{"erro": true}` (some deployments send
/// `"true"` as a string).
#[derive(Debug, Deserialize)]
struct ViaCepDto {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl ViaCepDto {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self) -> Result<Option<AddressFound>, AddressLookupError> {
        if self.is_not_found() {
            return Ok(None);
        }
        let (Some(city), Some(state)) = (self.localidade, self.uf) else {
            return Err(AddressLookupError::Decode(
                "missing localidade or uf".into(),
            ));
        };
        // City-wide codes carry no street or neighbourhood.
        Ok(Some(AddressFound {
            street: self.logradouro.unwrap_or_default(),
            neighborhood: self.bairro.unwrap_or_default(),
            city,
            state_abbreviation: state,
        }))
    }
}

fn parse_viacep(body: &[u8]) -> Result<Option<AddressFound>, AddressLookupError> {
    let dto: ViaCepDto = serde_json::from_slice(body)
        .map_err(|e| AddressLookupError::Decode(format!("invalid ViaCEP JSON payload: {e}")))?;
    dto.into_address()
}
