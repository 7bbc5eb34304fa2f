// Summary statistics over a window of readings
use super::measurement::Measurement;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean_systolic: f64,
    pub mean_diastolic: f64,
    /// Absent when no reading in the window carries a heart rate.
    pub mean_heart_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    NoData,
    Stats(SummaryStatistics),
}

/// Averages over the window. An empty window yields `Summary::NoData`.
pub fn aggregate(items: &[Measurement]) -> Summary {
    if items.is_empty() {
        return Summary::NoData;
    }

    let count = items.len();
    let systolic_sum: f64 = items.iter().map(|m| f64::from(m.systolic())).sum();
    let diastolic_sum: f64 = items.iter().map(|m| f64::from(m.diastolic())).sum();

    let heart_rates: Vec<f64> = items
        .iter()
        .filter_map(|m| m.heart_rate())
        .map(f64::from)
        .collect();
    let mean_heart_rate = if heart_rates.is_empty() {
        None
    } else {
        Some(heart_rates.iter().sum::<f64>() / heart_rates.len() as f64)
    };

    Summary::Stats(SummaryStatistics {
        count,
        mean_systolic: systolic_sum / count as f64,
        mean_diastolic: diastolic_sum / count as f64,
        mean_heart_rate,
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::NoData => write!(f, "No data"),
            Summary::Stats(stats) => {
                let hr = stats
                    .mean_heart_rate
                    .map(|v| format!("{:.1}", v))
                    .unwrap_or_else(|| "—".to_string());
                write!(
                    f,
                    "Avg ({}):  SBP {:.1}   DBP {:.1}   HR {}",
                    stats.count, stats.mean_systolic, stats.mean_diastolic, hr
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(sbp: u32, dbp: u32, hr: Option<u32>) -> Measurement {
        Measurement::new(sbp, dbp, hr, "2025-08-30T10:00:00Z".to_string())
    }

    #[test]
    fn test_empty_window_is_no_data() {
        assert_eq!(aggregate(&[]), Summary::NoData);
        assert_eq!(aggregate(&[]).to_string(), "No data");
    }

    #[test]
    fn test_means_skip_missing_heart_rate() {
        let items = vec![reading(120, 75, Some(70)), reading(130, 85, None)];

        let expected = Summary::Stats(SummaryStatistics {
            count: 2,
            mean_systolic: 125.0,
            mean_diastolic: 80.0,
            mean_heart_rate: Some(70.0),
        });
        assert_eq!(aggregate(&items), expected);
    }

    #[test]
    fn test_heart_rate_absent_when_no_reading_has_one() {
        let items = vec![reading(120, 75, None), reading(110, 70, None)];
        match aggregate(&items) {
            Summary::Stats(stats) => assert_eq!(stats.mean_heart_rate, None),
            Summary::NoData => panic!("expected stats"),
        }
    }

    #[test]
    fn test_order_independent() {
        let items = vec![
            reading(118, 77, Some(64)),
            reading(141, 92, None),
            reading(125, 81, Some(72)),
            reading(109, 70, Some(58)),
        ];
        let mut reversed = items.clone();
        reversed.reverse();
        let mut rotated = items.clone();
        rotated.rotate_left(1);

        assert_eq!(aggregate(&items), aggregate(&reversed));
        assert_eq!(aggregate(&items), aggregate(&rotated));
    }

    #[test]
    fn test_display() {
        let items = vec![reading(120, 75, Some(70)), reading(130, 85, None)];
        assert_eq!(
            aggregate(&items).to_string(),
            "Avg (2):  SBP 125.0   DBP 80.0   HR 70.0"
        );

        let items = vec![reading(121, 80, None)];
        assert_eq!(
            aggregate(&items).to_string(),
            "Avg (1):  SBP 121.0   DBP 80.0   HR —"
        );
    }
}
