use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Flat offset added to stored timestamps before display.
///
/// Stored times are naive UTC. This shifts them by +05:30 and labels the
/// result "IST"; it is a display convention, not a time zone conversion.
pub const DISPLAY_OFFSET_MINUTES: i64 = 5 * 60 + 30;

pub const DISPLAY_ZONE_LABEL: &str = "IST";

pub fn format_display_time(at: NaiveDateTime) -> String {
    let shifted = at + Duration::minutes(DISPLAY_OFFSET_MINUTES);
    format!("{} {}", shifted.format("%Y-%m-%d %H:%M"), DISPLAY_ZONE_LABEL)
}

/// Pie chart descriptor in the shape Plotly's `newPlot(el, data, layout)` takes.
#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub data: Vec<PieTrace>,
    pub layout: ChartLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLayout {
    pub title: ChartTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartTitle {
    pub text: String,
}

impl PieChart {
    pub fn from_pairs<I, L>(title: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, i64)>,
        L: Into<String>,
    {
        let (labels, values) = pairs
            .into_iter()
            .map(|(label, value)| (label.into(), value))
            .unzip();

        Self {
            data: vec![PieTrace {
                kind: "pie",
                labels,
                values,
            }],
            layout: ChartLayout {
                title: ChartTitle {
                    text: title.to_string(),
                },
            },
        }
    }

    pub fn total(&self) -> i64 {
        self.data.iter().flat_map(|t| t.values.iter()).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
