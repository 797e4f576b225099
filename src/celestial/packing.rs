use crate::celestial::error::{ensure_non_negative, CelestialError, CelestialResult};
use crate::celestial::orbit::{Orbit, OrbitParams};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::str::FromStr;

pub const PACKING_PRECISION: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitComparison {
    pub current: Orbit,
    pub neighbour: Orbit,
    pub current_diameter: f64,
    pub neighbour_diameter: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonParams {
    pub current_orbit: OrbitParams,
    #[serde(default)]
    pub neighbour_orbit: Option<OrbitParams>,
    pub current_diameter: f64,
    pub neighbour_diameter: f64,
}

impl TryFrom<ComparisonParams> for OrbitComparison {
    type Error = CelestialError;

    fn try_from(params: ComparisonParams) -> CelestialResult<Self> {
        let neighbour = params
            .neighbour_orbit
            .ok_or_else(|| CelestialError::invalid("neighbour_orbit", "missing neighbour"))?;
        Ok(Self {
            current: params.current_orbit.into_orbit(true)?,
            neighbour: neighbour.into_orbit(true)?,
            current_diameter: params.current_diameter,
            neighbour_diameter: params.neighbour_diameter,
        })
    }
}

/// Factor by which both bodies can be enlarged before they touch at their
/// closest approach. 1 means they already touch.
pub fn compare_orbits(cmp: &OrbitComparison) -> CelestialResult<f64> {
    let current = ensure_non_negative("current_diameter", cmp.current_diameter)?;
    let neighbour = ensure_non_negative("neighbour_diameter", cmp.neighbour_diameter)?;
    let total = current + neighbour;
    if total == 0.0 {
        return Err(CelestialError::invalid(
            "diameters",
            "at least one body needs a non-zero diameter",
        ));
    }

    // Both ellipses share the star as focus, so comparing focal distances at
    // the same true anomaly gives the gap along each ray.
    let smallest_gap = (0..=PACKING_PRECISION)
        .map(|i| {
            let nu = TAU * i as f64 / PACKING_PRECISION as f64;
            (cmp.current.position_at_angle(nu).r - cmp.neighbour.position_at_angle(nu).r).abs()
        })
        .fold(f64::INFINITY, f64::min);

    Ok(2.0 * smallest_gap / total)
}

pub fn compare_system_orbits(comparisons: &[OrbitComparison]) -> CelestialResult<f64> {
    if comparisons.is_empty() {
        return Err(CelestialError::invalid(
            "comparisons",
            "a system needs at least one pair of neighbours",
        ));
    }

    comparisons
        .iter()
        .try_fold(f64::INFINITY, |acc, cmp| -> CelestialResult<f64> {
            Ok(acc.min(compare_orbits(cmp)?))
        })
}

pub fn compare_system_params(params: &[ComparisonParams]) -> CelestialResult<f64> {
    let comparisons = params
        .iter()
        .copied()
        .map(OrbitComparison::try_from)
        .collect::<CelestialResult<Vec<_>>>()?;
    compare_system_orbits(&comparisons)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub planet_fill: f64,
    pub star_fill: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            planet_fill: 0.5,
            star_fill: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledBody {
    pub orbit: Orbit,
    pub diameter: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    Realistic,
    Didactic,
}

impl FromStr for ScalingMode {
    type Err = CelestialError;

    fn from_str(s: &str) -> CelestialResult<Self> {
        match s {
            "realistic" => Ok(ScalingMode::Realistic),
            "didactic" => Ok(ScalingMode::Didactic),
            other => Err(CelestialError::invalid(
                "mode",
                format!("`{other}` is neither realistic nor didactic"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingPlan {
    pub planet_factor: f64,
    pub star_factor: f64,
}

impl ScalingPlan {
    pub fn factors(&self, mode: ScalingMode) -> (f64, f64) {
        match mode {
            ScalingMode::Realistic => (1.0, 1.0),
            ScalingMode::Didactic => (self.planet_factor, self.star_factor),
        }
    }
}

pub fn plan_scaling(
    star: &ScaledBody,
    planets: &[ScaledBody],
    config: &ScalingConfig,
) -> CelestialResult<ScalingPlan> {
    let comparisons: Vec<OrbitComparison> = planets
        .windows(2)
        .map(|pair| OrbitComparison {
            current: pair[0].orbit,
            neighbour: pair[1].orbit,
            current_diameter: pair[0].diameter,
            neighbour_diameter: pair[1].diameter,
        })
        .collect();
    let planet_factor = config.planet_fill * compare_system_orbits(&comparisons)?;

    // The star only has to stay clear of the enlarged first planet, so compare
    // against a copy of its orbit pulled in by the planet's new radius.
    let first = &planets[0];
    let shrunk_a = first.orbit.semi_major_axis() - first.diameter * planet_factor / 2.0;
    let fake_first = first.orbit.with_semi_major_axis(shrunk_a)?;

    let star_factor = config.star_fill
        * compare_orbits(&OrbitComparison {
            current: star.orbit,
            neighbour: fake_first,
            current_diameter: star.diameter,
            neighbour_diameter: 0.0,
        })?;

    Ok(ScalingPlan {
        planet_factor,
        star_factor,
    })
}
