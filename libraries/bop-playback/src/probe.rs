//! HTTP liveness probe for resolved stream URLs

use async_trait::async_trait;
use bop_core::EndpointProbe;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Probes endpoints with a `HEAD` request; live iff the status is 2xx
#[derive(Debug, Clone)]
pub struct HttpEndpointProbe {
    http: Client,
}

impl HttpEndpointProbe {
    /// Create a probe whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(format!("bop/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }

    /// Wrap an existing client
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl EndpointProbe for HttpEndpointProbe {
    async fn is_live(&self, endpoint_url: &str) -> bool {
        match self.http.head(endpoint_url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(status = status.as_u16(), "Endpoint probe answered");
                status.is_success()
            }
            Err(e) => {
                debug!(error = %e, "Endpoint probe failed");
                false
            }
        }
    }
}
