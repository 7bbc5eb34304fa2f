// Dashboard service - Refresh and submit use cases for the measurements screen
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::chart::{project, ChartBounds, ProjectedChart};
use crate::domain::measurement::{MeasurementForm, MeasurementInputError, Series};
use crate::domain::summary::{aggregate, Summary};
use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Loading,
    Loaded(usize),
    LoadFailed(String),
    Uploading,
    UploadSucceeded,
    UploadFailed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::Loading => write!(f, "Loading measurements..."),
            Status::Loaded(n) => write!(f, "Loaded {} item(s)", n),
            Status::LoadFailed(reason) => write!(f, "Load failed: {}", reason),
            Status::Uploading => write!(f, "Uploading..."),
            Status::UploadSucceeded => write!(f, "Upload: success"),
            Status::UploadFailed(reason) => write!(f, "Upload failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub user_id: String,
    pub window: usize,
    pub chart: ChartBounds,
}

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub status: Status,
    pub series: Series,
    pub summary: Summary,
    pub chart: Option<ProjectedChart>,
}

#[derive(Debug)]
struct DashboardState {
    series: Series,
    status: Status,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn MeasurementRepository>,
    settings: DashboardSettings,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn MeasurementRepository>, settings: DashboardSettings) -> Self {
        Self {
            repository,
            settings,
            state: Arc::new(RwLock::new(DashboardState {
                series: Series::default(),
                status: Status::Ready,
            })),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Fetch the latest readings. On failure the previous series is kept.
    pub async fn refresh(&self) {
        self.set_status(Status::Loading).await;

        let result = self.repository.list(&self.settings.user_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(items) => {
                let series = Series::from_store(items, self.settings.window);
                if series.is_empty() {
                    tracing::warn!("No measurements stored for {}", self.settings.user_id);
                } else {
                    tracing::info!("Loaded {} measurements for {}", series.len(), self.settings.user_id);
                }
                state.status = Status::Loaded(series.len());
                state.series = series;
            }
            Err(e) => {
                tracing::error!("Error fetching measurements: {:#}", e);
                state.status = Status::LoadFailed(format!("{:#}", e));
            }
        }
    }

    /// Validate and upload a reading, then refresh on success.
    ///
    /// Invalid input is returned to the caller and nothing is sent. Store
    /// failures only show up in the status.
    pub async fn submit(
        &self,
        form: &MeasurementForm,
        timestamp: Option<String>,
    ) -> Result<(), MeasurementInputError> {
        let timestamp =
            timestamp.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        let measurement = form.parse(timestamp).inspect_err(|e| {
            tracing::warn!("Rejected measurement form: {}", e);
        })?;

        self.set_status(Status::Uploading).await;

        match self
            .repository
            .create(&self.settings.user_id, &measurement)
            .await
        {
            Ok(()) => {
                tracing::info!("Uploaded measurement {}", measurement.title());
                self.set_status(Status::UploadSucceeded).await;
                self.refresh().await;
            }
            Err(e) => {
                tracing::error!("Error uploading measurement: {:#}", e);
                self.set_status(Status::UploadFailed(format!("{:#}", e))).await;
            }
        }

        Ok(())
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_with_bounds(self.settings.chart).await
    }

    pub async fn snapshot_with_bounds(&self, bounds: ChartBounds) -> DashboardSnapshot {
        let state = self.state.read().await;
        let series = state.series.clone();
        let status = state.status.clone();
        drop(state);

        let summary = aggregate(series.items());
        let chart = project(&series.systolic_values(), &series.diastolic_values(), bounds);

        DashboardSnapshot {
            status,
            series,
            summary,
            chart,
        }
    }

    async fn set_status(&self, status: Status) {
        tracing::debug!("Dashboard status: {}", status);
        self.state.write().await.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::measurement::Measurement;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeRepository {
        items: Mutex<Vec<Measurement>>,
        fail_list: AtomicBool,
        fail_create: AtomicBool,
        created: Mutex<Vec<(String, Measurement)>>,
    }

    #[async_trait]
    impl MeasurementRepository for FakeRepository {
        async fn list(&self, _user_id: &str) -> anyhow::Result<Vec<Measurement>> {
            if self.fail_list.load(Ordering::SeqCst) {
                anyhow::bail!("connection refused");
            }
            Ok(self.items.lock().unwrap().clone())
        }

        async fn create(&self, user_id: &str, measurement: &Measurement) -> anyhow::Result<()> {
            if self.fail_create.load(Ordering::SeqCst) {
                anyhow::bail!("server returned 500");
            }
            self.created
                .lock()
                .unwrap()
                .push((user_id.to_string(), measurement.clone()));
            self.items.lock().unwrap().insert(0, measurement.clone());
            Ok(())
        }
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            user_id: "demo-user".to_string(),
            window: 20,
            chart: ChartBounds::new(300.0, 160.0, 12.0),
        }
    }

    fn reading(sbp: u32, dbp: u32, hr: Option<u32>) -> Measurement {
        Measurement::new(sbp, dbp, hr, "2025-08-30T10:00:00Z".to_string())
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_empty() {
        let service = DashboardService::new(Arc::new(FakeRepository::default()), settings());
        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.status, Status::Ready);
        assert!(snapshot.series.is_empty());
        assert_eq!(snapshot.summary, Summary::NoData);
        assert!(snapshot.chart.is_none());
    }

    #[tokio::test]
    async fn test_refresh_loads_window() {
        let repo = Arc::new(FakeRepository::default());
        *repo.items.lock().unwrap() = (0..30).map(|i| reading(100 + i, 70, None)).collect();

        let service = DashboardService::new(repo, settings());
        service.refresh().await;
        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.status, Status::Loaded(20));
        assert_eq!(snapshot.status.to_string(), "Loaded 20 item(s)");
        assert_eq!(snapshot.series.len(), 20);
        assert!(snapshot.chart.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_series() {
        let repo = Arc::new(FakeRepository::default());
        *repo.items.lock().unwrap() = vec![reading(120, 75, Some(70)), reading(130, 85, None)];

        let service = DashboardService::new(repo.clone(), settings());
        service.refresh().await;

        repo.fail_list.store(true, Ordering::SeqCst);
        service.refresh().await;
        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(
            snapshot.status.to_string(),
            "Load failed: connection refused"
        );
        match snapshot.summary {
            Summary::Stats(stats) => {
                assert_eq!(stats.mean_systolic, 125.0);
                assert_eq!(stats.mean_heart_rate, Some(70.0));
            }
            Summary::NoData => panic!("expected stats"),
        }
    }

    #[tokio::test]
    async fn test_submit_uploads_and_refreshes() {
        let repo = Arc::new(FakeRepository::default());
        let service = DashboardService::new(repo.clone(), settings());

        let form = MeasurementForm {
            sbp: "128".to_string(),
            dbp: "82".to_string(),
            hr: "".to_string(),
        };
        service
            .submit(&form, Some("2025-08-30T08:15:00Z".to_string()))
            .await
            .unwrap();

        let created = repo.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "demo-user");
        assert_eq!(created[0].1.heart_rate(), None);
        assert_eq!(created[0].1.timestamp(), "2025-08-30T08:15:00Z");

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.status, Status::Loaded(1));
        assert_eq!(snapshot.series.items()[0].systolic(), 128);
    }

    #[tokio::test]
    async fn test_submit_defaults_timestamp_to_now() {
        let repo = Arc::new(FakeRepository::default());
        let service = DashboardService::new(repo.clone(), settings());

        service.submit(&MeasurementForm::default(), None).await.unwrap();

        let created = repo.created.lock().unwrap().clone();
        let ts = created[0].1.timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert!(ts.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let repo = Arc::new(FakeRepository::default());
        let service = DashboardService::new(repo.clone(), settings());

        let form = MeasurementForm {
            sbp: "high".to_string(),
            ..MeasurementForm::default()
        };
        let result = service.submit(&form, None).await;

        assert_eq!(result, Err(MeasurementInputError::InvalidPressure));
        assert!(repo.created.lock().unwrap().is_empty());
        assert_eq!(service.snapshot().await.status, Status::Ready);
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_not_sent() {
        let repo = Arc::new(FakeRepository::default());
        let service = DashboardService::new(repo.clone(), settings());

        let result = service
            .submit(&MeasurementForm::default(), Some("not a date".to_string()))
            .await;

        assert_eq!(result, Err(MeasurementInputError::InvalidTimestamp));
        assert!(repo.created.lock().unwrap().is_empty());
        assert_eq!(service.snapshot().await.status, Status::Ready);
    }

    #[tokio::test]
    async fn test_failed_upload_reports_reason() {
        let repo = Arc::new(FakeRepository::default());
        repo.fail_create.store(true, Ordering::SeqCst);
        let service = DashboardService::new(repo, settings());

        service.submit(&MeasurementForm::default(), None).await.unwrap();

        assert_eq!(
            service.snapshot().await.status.to_string(),
            "Upload failed: server returned 500"
        );
    }
}
