//! Reqwest-backed recalculation client.
//!
//! POSTs a never-synced draft to the orders collection (remote create),
//! PUTs an existing one to its resource. The response body is the
//! authoritative order. No retry logic here: a failed request surfaces as
//! an error state and the user decides whether to retry.

use core::future::Future;

use serde::Deserialize;

use draftsync_orders::DraftOrder;

use crate::remote::{RecalcError, RecalculationClient};

/// Shape of the remote's error body, parsed best-effort.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: Option<String>,
    field: Option<String>,
}

pub struct HttpRecalculationClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpRecalculationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client that authenticates with a bearer token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    fn endpoint(&self, candidate: &DraftOrder) -> String {
        match candidate.remote_id() {
            None => format!("{}/sites/{}/orders", self.base_url, candidate.site_id()),
            Some(order_id) => format!(
                "{}/sites/{}/orders/{}",
                self.base_url,
                candidate.site_id(),
                order_id
            ),
        }
    }
}

impl RecalculationClient for HttpRecalculationClient {
    fn recalculate(
        &self,
        candidate: &DraftOrder,
    ) -> impl Future<Output = Result<DraftOrder, RecalcError>> + Send {
        async move {
            let url = self.endpoint(candidate);
            let mut request = if candidate.remote_id().is_none() {
                self.client.post(&url)
            } else {
                self.client.put(&url)
            }
            .json(candidate);

            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            tracing::debug!(%url, "sending recalculation request");

            let response = request
                .send()
                .await
                .map_err(|e| RecalcError::Network(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return response.json::<DraftOrder>().await.map_err(|e| RecalcError::Api {
                    status: status.as_u16(),
                    message: format!("failed to parse recalculated order: {e}"),
                });
            }

            let body = response.text().await.unwrap_or_default();

            if status == reqwest::StatusCode::BAD_REQUEST
                || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            {
                let parsed: Option<RemoteErrorBody> = serde_json::from_str(&body).ok();
                let (field, message) = match parsed {
                    Some(parsed) => (parsed.field, parsed.message.unwrap_or(body)),
                    None => (None, body),
                };
                return Err(RecalcError::Validation { field, message });
            }

            Err(RecalcError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
