//! Read-only calls against the directory API.
//!
//! Writes go through `docdir_form`'s gateway so the CLI follows the same state
//! transitions as any other form front end.

use anyhow::{bail, Context};
use api_shared::{DoctorId, DoctorRecord, ListDoctorsRes, SpecialitiesRes};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn list_doctors(&self) -> anyhow::Result<Vec<DoctorRecord>> {
        let res: ListDoctorsRes = self.get_json("/api/doctor").await?;
        Ok(res.doctors)
    }

    /// Returns `None` if the server does not know `id`.
    pub async fn doctor(&self, id: DoctorId) -> anyhow::Result<Option<DoctorRecord>> {
        let url = format!("{}/api/doctor/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }

    pub async fn specialities(&self) -> anyhow::Result<Vec<String>> {
        let res: SpecialitiesRes = self.get_json("/api/specialities").await?;
        Ok(res.specialities)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("GET {url} returned {status}");
        }
        response
            .json()
            .await
            .with_context(|| format!("decoding response from {url}"))
    }
}
