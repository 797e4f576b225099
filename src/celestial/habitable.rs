use crate::celestial::error::{ensure_non_negative, CelestialError, CelestialResult};
use crate::celestial::orbit::Orbit;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitableClass {
    Inside,
    Partial,
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HighlightColor {
    pub red: f64,
    pub green: f64,
}

impl HabitableClass {
    pub fn color(self) -> HighlightColor {
        match self {
            HabitableClass::Inside => HighlightColor {
                red: 0.0,
                green: 1.0,
            },
            HabitableClass::Partial => HighlightColor {
                red: 0.5,
                green: 0.5,
            },
            HabitableClass::Outside => HighlightColor {
                red: 1.0,
                green: 0.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HabitableZone {
    inner: f64,
    outer: f64,
}

impl HabitableZone {
    pub fn new(inner: f64, outer: f64) -> CelestialResult<Self> {
        let inner = ensure_non_negative("inner_radius", inner)?;
        let outer = ensure_non_negative("outer_radius", outer)?;
        if inner > outer {
            return Err(CelestialError::invalid(
                "inner_radius",
                format!("{inner} lies beyond the outer radius {outer}"),
            ));
        }
        Ok(Self { inner, outer })
    }

    /// Compares perihelion and aphelion against the annulus; both bounds are
    /// inclusive for the inside case.
    pub fn classify(&self, orbit: &Orbit) -> HabitableClass {
        let (r_min, r_max) = (orbit.perihelion(), orbit.aphelion());
        if r_min >= self.inner && r_max <= self.outer {
            HabitableClass::Inside
        } else if r_max < self.inner || r_min > self.outer {
            HabitableClass::Outside
        } else {
            HabitableClass::Partial
        }
    }
}

pub fn color_inhabitable(
    semi_major_axis: f64,
    eccentricity: f64,
    inner_radius: f64,
    outer_radius: f64,
) -> CelestialResult<HighlightColor> {
    let zone = HabitableZone::new(inner_radius, outer_radius)?;
    let orbit = Orbit::new(semi_major_axis, eccentricity, true)?;
    Ok(zone.classify(&orbit).color())
}
