//! View-model for the dashboard page: three status indicators and three bar
//! charts. Layout and styling belong to the client.

use serde::Serialize;
use time::Date;
use usage_client::{
    classify::{self, LookupKeyError},
    domain::{ColorTag, DailyMetricRecord},
};

use crate::accessor::DataAccessor;

pub const NORM_Y_RANGE: [f64; 2] = [0.0, 100.0];
const WATER_CONSUMPTION_COLOR: &str = "orange";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    RoundedRect,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub caption: &'static str,
    pub text: String,
    pub color: ColorTag,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: &'static str,
    pub x: Vec<usize>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: Option<Indicator>,
    pub activity: Option<Indicator>,
    pub regularity: Option<Indicator>,
    pub usage: BarChart,
    pub norm: BarChart,
    pub water_consumption: BarChart,
}

impl DashboardView {
    /// Neutral view shown when there is nothing to display.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    pub fn from_record(record: &DailyMetricRecord) -> Result<Self, LookupKeyError> {
        let c = classify::classify(record)?;

        // Every chart shares the usage sample count on the x axis.
        let time_axis: Vec<usize> = (1..=record.usage.len()).collect();

        Ok(Self {
            status: Some(Indicator {
                caption: "Status",
                text: c.status.label().to_string(),
                color: c.status.color(),
                shape: Shape::RoundedRect,
            }),
            activity: Some(Indicator {
                caption: "Activity Level",
                text: "AS".to_string(),
                color: c.activity.color(),
                shape: Shape::Circle,
            }),
            regularity: Some(Indicator {
                caption: "Regularity Level",
                text: "CC".to_string(),
                color: c.regularity.color(),
                shape: Shape::Circle,
            }),
            usage: BarChart {
                title: format!(
                    "Active Score: {} | Correlation Coefficient: {}",
                    fmt_metric(record.active_score),
                    fmt_metric(record.correlation_coefficient)
                ),
                x_title: "Time",
                y_title: "Usage",
                y_range: None,
                series: vec![BarSeries {
                    name: "Usage",
                    x: time_axis.clone(),
                    y: record.usage.clone(),
                    color: None,
                }],
            },
            norm: BarChart {
                title: format!(
                    "Low norm: {} | Norm: {} | High norm: {}",
                    fmt_metric(record.low_norm),
                    fmt_metric(record.norm_active_score),
                    fmt_metric(record.high_norm)
                ),
                x_title: "Time",
                y_title: "Norm",
                y_range: Some(NORM_Y_RANGE),
                series: vec![BarSeries {
                    name: "Norm",
                    x: time_axis.clone(),
                    y: record.four_week_usage_norm.clone(),
                    color: None,
                }],
            },
            water_consumption: BarChart {
                title: format!("Water consumption for Date: {}", record.date),
                x_title: "Time",
                y_title: "volume (L/15min)",
                y_range: None,
                series: vec![BarSeries {
                    name: "Water consumption",
                    x: time_axis,
                    y: record.water_consumption.clone(),
                    color: Some(WATER_CONSUMPTION_COLOR),
                }],
            },
        })
    }
}

/// Float text as Python's `repr` writes it: whole numbers keep one decimal
/// (`50.0`), and exponents below -4 or from 16 up switch to scientific
/// notation with a signed two-digit exponent (`1e-05`, `1e+16`).
fn fmt_metric(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return format!("{v:.1}");
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Fetch, classify and build the view for one selection. A missing selection
/// or a missing record renders the empty view.
pub async fn render(
    accessor: &DataAccessor,
    date: Date,
    home_id: Option<&str>,
) -> Result<DashboardView, LookupKeyError> {
    let Some(home_id) = home_id else {
        return Ok(DashboardView::empty());
    };

    match accessor.fetch(date, home_id).await {
        Ok(record) => DashboardView::from_record(&record),
        Err(_not_found) => Ok(DashboardView::empty()),
    }
}
