// Measurement domain model
use chrono::DateTime;
use thiserror::Error;

/// Number of readings kept for display when nothing else is configured.
pub const DEFAULT_WINDOW: usize = 20;

/// One blood-pressure reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    systolic: u32,
    diastolic: u32,
    heart_rate: Option<u32>,
    timestamp: String,
}

impl Measurement {
    pub fn new(systolic: u32, diastolic: u32, heart_rate: Option<u32>, timestamp: String) -> Self {
        Self {
            systolic,
            diastolic,
            heart_rate,
            timestamp,
        }
    }

    pub fn systolic(&self) -> u32 {
        self.systolic
    }

    pub fn diastolic(&self) -> u32 {
        self.diastolic
    }

    pub fn heart_rate(&self) -> Option<u32> {
        self.heart_rate
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Card title, e.g. "120/75  HR: 70"
    pub fn title(&self) -> String {
        match self.heart_rate {
            Some(hr) => format!("{}/{}  HR: {}", self.systolic, self.diastolic, hr),
            None => format!("{}/{}", self.systolic, self.diastolic),
        }
    }
}

/// Bounded window of recent readings, in the order the store returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    items: Vec<Measurement>,
}

impl Series {
    /// Keep the first `window` records; the store lists the most recent first.
    pub fn from_store(mut items: Vec<Measurement>, window: usize) -> Self {
        items.truncate(window);
        Self { items }
    }

    pub fn items(&self) -> &[Measurement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn systolic_values(&self) -> Vec<f64> {
        self.items.iter().map(|m| f64::from(m.systolic)).collect()
    }

    pub fn diastolic_values(&self) -> Vec<f64> {
        self.items.iter().map(|m| f64::from(m.diastolic)).collect()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeasurementInputError {
    #[error("Invalid input: SBP/DBP must be integers")]
    InvalidPressure,
    #[error("Invalid input: timestamp must be an ISO-8601 instant")]
    InvalidTimestamp,
}

/// Raw form fields as typed by the user.
#[derive(Debug, Clone)]
pub struct MeasurementForm {
    pub sbp: String,
    pub dbp: String,
    pub hr: String,
}

impl Default for MeasurementForm {
    fn default() -> Self {
        Self {
            sbp: "120".to_string(),
            dbp: "75".to_string(),
            hr: "70".to_string(),
        }
    }
}

impl MeasurementForm {
    /// Validate the fields. A blank or unparsable heart rate counts as absent;
    /// the timestamp must be RFC 3339.
    pub fn parse(&self, timestamp: String) -> Result<Measurement, MeasurementInputError> {
        let systolic = self
            .sbp
            .trim()
            .parse::<u32>()
            .map_err(|_| MeasurementInputError::InvalidPressure)?;
        let diastolic = self
            .dbp
            .trim()
            .parse::<u32>()
            .map_err(|_| MeasurementInputError::InvalidPressure)?;
        let heart_rate = self.hr.trim().parse::<u32>().ok();
        DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|_| MeasurementInputError::InvalidTimestamp)?;

        Ok(Measurement::new(systolic, diastolic, heart_rate, timestamp))
    }
}
