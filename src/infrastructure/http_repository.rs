// HTTP measurement store implementation
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::measurement::Measurement;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpMeasurementRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeasurementsResponse {
    ok: bool,
    #[serde(default)]
    items: Vec<MeasurementItem>,
}

#[derive(Debug, Deserialize)]
struct MeasurementItem {
    sbp: u32,
    dbp: u32,
    #[serde(default)]
    hr: Option<u32>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct MeasurementUpload<'a> {
    user_id: &'a str,
    sbp: u32,
    dbp: u32,
    hr: Option<u32>,
    timestamp: &'a str,
}

impl From<MeasurementItem> for Measurement {
    fn from(item: MeasurementItem) -> Self {
        Measurement::new(item.sbp, item.dbp, item.hr, item.timestamp)
    }
}

impl HttpMeasurementRepository {
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn list_url(&self, user_id: &str) -> String {
        format!(
            "{}/measurements?user_id={}",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }

    fn create_url(&self) -> String {
        format!("{}/measurements", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Measurement store responded with status {}: {}", status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl MeasurementRepository for HttpMeasurementRepository {
    async fn list(&self, user_id: &str) -> Result<Vec<Measurement>> {
        let url = self.list_url(user_id);
        tracing::debug!("Fetching measurements from {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to measurement store")?;
        let response = Self::ensure_success(response).await?;

        let data = response
            .json::<MeasurementsResponse>()
            .await
            .context("Failed to parse measurement list")?;

        if !data.ok {
            anyhow::bail!("Measurement store reported ok=false");
        }

        Ok(data.items.into_iter().map(Measurement::from).collect())
    }

    async fn create(&self, user_id: &str, measurement: &Measurement) -> Result<()> {
        let body = MeasurementUpload {
            user_id,
            sbp: measurement.systolic(),
            dbp: measurement.diastolic(),
            hr: measurement.heart_rate(),
            timestamp: measurement.timestamp(),
        };
        tracing::debug!("Uploading measurement {:?}", body);

        let response = self
            .authorize(self.client.post(self.create_url()))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send measurement to store")?;
        Self::ensure_success(response).await?;

        Ok(())
    }
}
