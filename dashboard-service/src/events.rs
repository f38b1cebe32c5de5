//! Dashboard controls as typed events.
//!
//! Every control on the page maps to one `UiEvent` variant, and `dispatch`
//! routes each variant to its handler. Handlers are pure: they take the
//! current state and return the next one.

use serde::{Deserialize, Serialize};
use time::Date;

pub const CONTENT_WIDTH_WITH_SIDEBAR: u8 = 9;
pub const CONTENT_WIDTH_FULL: u8 = 12;

/// Selectable date range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Date,
    pub max: Date,
}

impl DateBounds {
    pub fn clamp(&self, date: Date) -> Date {
        if date > self.max {
            self.max
        } else if date < self.min {
            self.min
        } else {
            date
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub date: Date,
    pub home_id: Option<String>,
    pub sidebar_open: bool,
    pub content_width: u8,
}

impl DashboardState {
    /// Yesterday, first household, sidebar collapsed.
    pub fn initial(today: Date, home_ids: &[String], bounds: &DateBounds) -> Self {
        let yesterday = today.previous_day().unwrap_or(today);
        Self {
            date: bounds.clamp(yesterday),
            home_id: home_ids.first().cloned(),
            sidebar_open: false,
            content_width: CONTENT_WIDTH_WITH_SIDEBAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    DatePicked { date: Date },
    HomePicked { home_id: String },
    PreviousDay,
    NextDay,
    ToggleSidebar,
}

impl UiEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatePicked { .. } => "date_picked",
            Self::HomePicked { .. } => "home_picked",
            Self::PreviousDay => "previous_day",
            Self::NextDay => "next_day",
            Self::ToggleSidebar => "toggle_sidebar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub state: DashboardState,
    /// Whether the data panels need to be rebuilt.
    pub refresh: bool,
}

pub fn dispatch(state: DashboardState, event: UiEvent, bounds: &DateBounds) -> Outcome {
    metrics::counter!("dashboard_events_total", "kind" => event.kind()).increment(1);
    tracing::debug!(kind = event.kind(), "dispatching ui event");

    match event {
        UiEvent::DatePicked { date } => on_date_picked(state, date, bounds),
        UiEvent::HomePicked { home_id } => on_home_picked(state, home_id),
        UiEvent::PreviousDay => on_shift_day(state, Date::previous_day, bounds),
        UiEvent::NextDay => on_shift_day(state, Date::next_day, bounds),
        UiEvent::ToggleSidebar => on_toggle_sidebar(state),
    }
}

fn on_date_picked(state: DashboardState, date: Date, bounds: &DateBounds) -> Outcome {
    Outcome {
        state: DashboardState {
            date: bounds.clamp(date),
            ..state
        },
        refresh: true,
    }
}

fn on_home_picked(state: DashboardState, home_id: String) -> Outcome {
    Outcome {
        state: DashboardState {
            home_id: Some(home_id),
            ..state
        },
        refresh: true,
    }
}

fn on_shift_day(state: DashboardState, shift: fn(Date) -> Option<Date>, bounds: &DateBounds) -> Outcome {
    let date = shift(state.date).map_or(state.date, |d| bounds.clamp(d));
    Outcome {
        state: DashboardState { date, ..state },
        refresh: true,
    }
}

fn on_toggle_sidebar(state: DashboardState) -> Outcome {
    let sidebar_open = !state.sidebar_open;
    let content_width = if sidebar_open {
        CONTENT_WIDTH_WITH_SIDEBAR
    } else {
        CONTENT_WIDTH_FULL
    };
    Outcome {
        state: DashboardState {
            sidebar_open,
            content_width,
            ..state
        },
        refresh: false,
    }
}
