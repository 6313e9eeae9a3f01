use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::api::rest::dto::{ApiResponse, UserRecordDto};
use crate::contract::client::UserSource;
use crate::contract::error::DashboardError;
use crate::contract::model::UserRecord;

/// Fetches the record set from a remote `GET /api/users`.
#[derive(Debug, Clone)]
pub struct HttpUserSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpUserSource {
    /// `base` is the API root, e.g. `http://localhost:3000`.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::invalid_argument(format!("http client: {e}")))?;
        Self::with_client(client, base)
    }

    pub fn with_client(client: reqwest::Client, base: &Url) -> Result<Self, DashboardError> {
        let mut endpoint = base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| DashboardError::invalid_argument(format!("cannot-be-a-base URL: {base}")))?
            .pop_if_empty()
            .extend(&["api", "users"]);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    #[instrument(
        name = "user_directory.http.fetch_users",
        skip_all,
        fields(endpoint = %self.endpoint)
    )]
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, DashboardError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| DashboardError::load_failure(format!("GET {}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::load_failure(format!("HTTP {status}")));
        }

        let body: ApiResponse<Vec<UserRecordDto>> = response
            .json()
            .await
            .map_err(|e| DashboardError::load_failure(format!("malformed response: {e}")))?;

        if !body.success {
            let reason = body
                .message
                .unwrap_or_else(|| "server reported failure".to_string());
            return Err(DashboardError::load_failure(reason));
        }

        let records = body
            .data
            .unwrap_or_default()
            .into_iter()
            .map(UserRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(count) = body.count.filter(|c| *c != records.len()) {
            debug!(count, received = records.len(), "count field disagrees with data");
        }
        debug!(received = records.len(), "fetched users");
        Ok(records)
    }
}
