use serde::Deserialize;

use crate::application::dashboard_service::DashboardSettings;
use crate::domain::chart::ChartBounds;
use crate::domain::measurement::DEFAULT_WINDOW;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    pub user_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub inset: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 343.0,
            height: 160.0,
            inset: 12.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub window: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            user_id: self.backend.user_id.clone(),
            window: self.display.window,
            chart: ChartBounds::new(self.chart.width, self.chart.height, self.chart.inset),
        }
    }
}

/// Load `config/dashboard.toml`, overridable with `BP_DASHBOARD__<SECTION>__<KEY>`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("BP_DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
