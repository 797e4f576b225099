use crate::celestial::error::{ensure_finite, ensure_non_negative, CelestialError, CelestialResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const JULIAN_YEAR_DAYS: f64 = 365.25;
pub const MONTH_DAYS: f64 = JULIAN_YEAR_DAYS / 12.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDuration {
    pub years: u64,
    pub months: u32,
    pub days: u32,
}

impl fmt::Display for CalendarDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04} years, {:02} months, {:02} days",
            self.years, self.months, self.days
        )
    }
}

/// Splits `days_total` into whole years, months and days.
///
/// Days are taken from the remainder of the year modulo a month, not from what
/// is left once whole months are removed: 365 days is 0y 11m 30d.
pub fn days_to_duration(days_total: f64) -> CelestialResult<CalendarDuration> {
    let days_total = ensure_non_negative("days_total", days_total)?;
    if days_total / JULIAN_YEAR_DAYS >= u64::MAX as f64 {
        return Err(CelestialError::invalid(
            "days_total",
            format!("{days_total} days overflow the year counter"),
        ));
    }
    let within_year = days_total % JULIAN_YEAR_DAYS;

    Ok(CalendarDuration {
        years: (days_total / JULIAN_YEAR_DAYS).floor() as u64,
        months: (within_year / MONTH_DAYS).floor() as u32,
        days: (within_year % MONTH_DAYS).floor() as u32,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClockConfig {
    pub simulation_time: f64,
    pub first_planet_revolution: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            simulation_time: 5.0,
            first_planet_revolution: JULIAN_YEAR_DAYS,
        }
    }
}

impl ClockConfig {
    pub fn normalize_period(&self, period_days: f64) -> f64 {
        self.simulation_time * period_days / self.first_planet_revolution
    }
}

#[derive(Clone, Debug)]
pub struct SimulationClock {
    days: f64,
    config: ClockConfig,
}

impl SimulationClock {
    pub fn new(config: ClockConfig) -> CelestialResult<Self> {
        for (name, value) in [
            ("simulation_time", config.simulation_time),
            ("first_planet_revolution", config.first_planet_revolution),
        ] {
            if ensure_finite(name, value)? <= 0.0 {
                return Err(CelestialError::invalid(
                    name,
                    format!("{value} must be positive"),
                ));
            }
        }
        Ok(Self { days: 0.0, config })
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn advance(
        &mut self,
        speed_ratio: f64,
        elapsed_ms: f64,
    ) -> CelestialResult<CalendarDuration> {
        let speed_ratio = ensure_non_negative("speed_ratio", speed_ratio)?;
        let elapsed_ms = ensure_non_negative("elapsed_ms", elapsed_ms)?;

        self.days += speed_ratio * self.config.first_planet_revolution * elapsed_ms
            / (self.config.simulation_time * 1000.0);
        self.elapsed()
    }

    pub fn elapsed(&self) -> CelestialResult<CalendarDuration> {
        days_to_duration(self.days)
    }

    pub fn reset(&mut self) {
        self.days = 0.0;
    }
}
