use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_LOOKBACK_MONTHS, MonthArithmetic, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::PlotMargins;

/// Public chart bootstrap configuration.
///
/// Loadable from JSON. Every field except `width` and `y_channels` has a
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusContextConfig {
    pub width: u32,
    /// Data channels available for plotting; the first one is drawn.
    pub y_channels: Vec<String>,
    #[serde(default = "default_focus_height")]
    pub focus_height: u32,
    #[serde(default = "default_context_height")]
    pub context_height: u32,
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,
    /// Day-of-month handling for the default window. `Clamp` maps Dec 31 to
    /// Sep 30; use `Overflow` to get Oct 1 like JavaScript `setMonth`.
    #[serde(default)]
    pub month_arithmetic: MonthArithmetic,
    /// Narrowest window the focus view will display.
    #[serde(default = "default_min_window_span_ms")]
    pub min_window_span_ms: i64,
    #[serde(default)]
    pub margins: PlotMargins,
}

fn default_focus_height() -> u32 {
    400
}

fn default_context_height() -> u32 {
    90
}

fn default_lookback_months() -> u32 {
    DEFAULT_LOOKBACK_MONTHS
}

fn default_min_window_span_ms() -> i64 {
    1_000
}

impl FocusContextConfig {
    #[must_use]
    pub fn new<I, S>(width: u32, y_channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            width,
            y_channels: y_channels.into_iter().map(Into::into).collect(),
            focus_height: default_focus_height(),
            context_height: default_context_height(),
            lookback_months: default_lookback_months(),
            month_arithmetic: MonthArithmetic::default(),
            min_window_span_ms: default_min_window_span_ms(),
            margins: PlotMargins::default(),
        }
    }

    #[must_use]
    pub fn with_heights(mut self, focus_height: u32, context_height: u32) -> Self {
        self.focus_height = focus_height;
        self.context_height = context_height;
        self
    }

    #[must_use]
    pub fn with_lookback_months(mut self, months: u32) -> Self {
        self.lookback_months = months;
        self
    }

    #[must_use]
    pub fn with_month_arithmetic(mut self, arithmetic: MonthArithmetic) -> Self {
        self.month_arithmetic = arithmetic;
        self
    }

    #[must_use]
    pub fn with_min_window_span_ms(mut self, span_ms: i64) -> Self {
        self.min_window_span_ms = span_ms;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: PlotMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.width == 0 || self.focus_height == 0 || self.context_height == 0 {
            return Err(ChartError::InvalidConfig(format!(
                "chart sizes must be > 0 (width={}, focus_height={}, context_height={})",
                self.width, self.focus_height, self.context_height
            )));
        }
        if self.y_channels.is_empty() || self.y_channels.iter().any(String::is_empty) {
            return Err(ChartError::InvalidConfig(
                "at least one non-empty y channel is required".to_owned(),
            ));
        }
        if self.min_window_span_ms <= 0 {
            return Err(ChartError::InvalidConfig(
                "minimum window span must be > 0 ms".to_owned(),
            ));
        }

        let margins = self.margins;
        for value in [margins.top, margins.right, margins.bottom, margins.left] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(
                    "plot margins must be finite and >= 0".to_owned(),
                ));
            }
        }
        if margins.left + margins.right >= f64::from(self.width) {
            return Err(ChartError::InvalidConfig(
                "horizontal margins leave no plotting area".to_owned(),
            ));
        }
        Ok(())
    }

    /// Channel drawn by both views.
    #[must_use]
    pub fn y_channel(&self) -> &str {
        self.y_channels.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn min_window_span(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.min_window_span_ms)
    }

    #[must_use]
    pub fn focus_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.focus_height)
    }

    #[must_use]
    pub fn context_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.context_height)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }
}
