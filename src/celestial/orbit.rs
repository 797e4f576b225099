use crate::celestial::error::{ensure_finite, ensure_non_negative, CelestialError, CelestialResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Orbit {
    a: f64,
    e: f64,
    can_move: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    b: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub a: f64,
    #[serde(default)]
    pub e: f64,
}

impl OrbitParams {
    pub fn into_orbit(self, can_move: bool) -> CelestialResult<Orbit> {
        Orbit::new(self.a, self.e, can_move)
    }
}

impl Orbit {
    pub fn new(a: f64, e: f64, can_move: bool) -> CelestialResult<Self> {
        let a = ensure_non_negative("semi_major_axis", a)?;
        let e = ensure_finite("eccentricity", e)?;
        if !(0.0..1.0).contains(&e) {
            return Err(CelestialError::invalid(
                "eccentricity",
                format!("{e} is outside [0, 1); only closed orbits are supported"),
            ));
        }

        // Static bodies never trace a curve, so they skip the minor axis.
        let b = can_move.then(|| a * (1.0 - e * e).sqrt());
        Ok(Self { a, e, can_move, b })
    }

    pub fn stationary() -> Self {
        Self {
            a: 0.0,
            e: 0.0,
            can_move: false,
            b: None,
        }
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub fn eccentricity(&self) -> f64 {
        self.e
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn semi_minor_axis(&self) -> Option<f64> {
        self.b
    }

    pub fn perihelion(&self) -> f64 {
        self.a * (1.0 - self.e)
    }

    pub fn aphelion(&self) -> f64 {
        self.a * (1.0 + self.e)
    }

    pub fn with_semi_major_axis(&self, a: f64) -> CelestialResult<Self> {
        Self::new(a, self.e, self.can_move)
    }

    /// Polar form of the ellipse: r = a(1 - e²) / (1 + e·cos ν).
    pub fn position_at_angle(&self, nu: f64) -> OrbitPoint {
        let r = self.a * (1.0 - self.e * self.e) / (1.0 + self.e * nu.cos());
        OrbitPoint {
            x: r * nu.cos(),
            y: r * nu.sin(),
            r,
        }
    }

    pub fn sample_closed_curve(&self, steps: usize) -> CelestialResult<Vec<CurvePoint>> {
        if steps == 0 {
            return Err(CelestialError::invalid("steps", "at least one step is needed"));
        }

        let points = (0..=steps)
            .map(|i| {
                let pos = self.position_at_angle(TAU * i as f64 / steps as f64);
                CurvePoint {
                    x: pos.x,
                    y: 0.0,
                    z: pos.y,
                }
            })
            .collect();
        Ok(points)
    }
}
