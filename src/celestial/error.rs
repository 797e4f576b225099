use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CelestialError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl CelestialError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type CelestialResult<T> = Result<T, CelestialError>;

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> CelestialResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CelestialError::invalid(name, format!("{value} is not finite")))
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> CelestialResult<f64> {
    let value = ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(CelestialError::invalid(name, format!("{value} is negative")));
    }
    Ok(value)
}
