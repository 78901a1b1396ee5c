//! Submission gateway: create or update a doctor on the directory API.

use crate::resolver::normalise_base_url;
use crate::FormResult;
use api_shared::{DoctorId, DoctorRecord, FieldViolation, SubmissionRes};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Which operation a submission performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionTarget {
    Create,
    Update(DoctorId),
}

/// Result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded {
        /// The stored record. Create responses are expected to carry it.
        record: Option<DoctorRecord>,
        message: String,
    },
    Failed {
        violations: Vec<FieldViolation>,
        message: String,
    },
    /// No usable response was received.
    TransportFailure(String),
}

impl From<SubmissionRes> for SubmissionOutcome {
    fn from(res: SubmissionRes) -> Self {
        if res.success {
            SubmissionOutcome::Succeeded {
                record: res.new_data,
                message: res.message,
            }
        } else {
            SubmissionOutcome::Failed {
                violations: res.info.map(|info| info.inner).unwrap_or_default(),
                message: res.message,
            }
        }
    }
}

#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Sends `record` once. Never fails; problems are reported as
    /// [`SubmissionOutcome::TransportFailure`].
    async fn submit(&self, target: SubmissionTarget, record: &DoctorRecord) -> SubmissionOutcome;
}

/// Gateway for `POST {base}/api/doctor/add` and `PUT {base}/api/doctor/edit/{id}`.
#[derive(Clone, Debug)]
pub struct HttpSubmissionGateway {
    client: Client,
    base_url: String,
}

impl HttpSubmissionGateway {
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
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, target: SubmissionTarget, record: &DoctorRecord) -> SubmissionOutcome {
        let request = match target {
            SubmissionTarget::Create => self
                .client
                .post(format!("{}/api/doctor/add", self.base_url)),
            SubmissionTarget::Update(id) => self
                .client
                .put(format!("{}/api/doctor/edit/{id}", self.base_url)),
        };

        let response = match request.json(record).send().await {
            Ok(response) => response,
            Err(e) => return SubmissionOutcome::TransportFailure(format!("request failed: {e}")),
        };

        // Rejections arrive with 4xx statuses but still carry a SubmissionRes body.
        let status = response.status();
        match response.json::<SubmissionRes>().await {
            Ok(body) => SubmissionOutcome::from(body),
            Err(e) => {
                tracing::warn!(%status, error = %e, "unreadable submission response");
                SubmissionOutcome::TransportFailure(format!(
                    "unrecognised response ({status}): {e}"
                ))
            }
        }
    }
}
