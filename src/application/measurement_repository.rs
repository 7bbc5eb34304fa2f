// Repository trait for measurement storage
use crate::domain::measurement::Measurement;
use async_trait::async_trait;

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// List the user's measurements in store order (most recent first)
    async fn list(&self, user_id: &str) -> anyhow::Result<Vec<Measurement>>;

    /// Store a new measurement for the user
    async fn create(&self, user_id: &str, measurement: &Measurement) -> anyhow::Result<()>;
}
