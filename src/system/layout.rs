use crate::celestial::color::{temperature_to_rgb, Rgb};
use crate::celestial::duration::ClockConfig;
use crate::celestial::error::CelestialError;
use crate::celestial::orbit::Orbit;
use crate::celestial::packing::{plan_scaling, ScaledBody, ScalingConfig, ScalingPlan};
use crate::celestial::ASTRONOMICAL_UNIT;
use crate::system::classify::classify_from_root;
use crate::system::description::{ExoType, SpatialRecord, SystemDescription};
use crate::system::error::{DescriptionError, DescriptionResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub simulation_time: f64,
    pub astronomical_unit: f64,
    pub scaling: ScalingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            simulation_time: 5.0,
            astronomical_unit: ASTRONOMICAL_UNIT,
            scaling: ScalingConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyLayout {
    pub name: String,
    pub orbit: Orbit,
    pub diameter: Option<f64>,
    pub color: Option<Rgb>,
    pub revolution_period: Option<f64>,
    pub normalized_revolution_period: Option<f64>,
    pub parent_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLayout {
    pub star: BodyLayout,
    pub planets: Vec<BodyLayout>,
    pub satellites: Vec<BodyLayout>,
    pub rings: Vec<BodyLayout>,
    pub scaling: Option<ScalingPlan>,
    pub clock: Option<ClockConfig>,
}

fn body_layout(record: &SpatialRecord, config: &LayoutConfig) -> DescriptionResult<BodyLayout> {
    let can_move = record.exo_type != ExoType::Star;
    let orbit = match record.trajectory {
        Some(params) => Orbit::new(params.a * config.astronomical_unit, params.e, can_move)?,
        None if matches!(record.exo_type, ExoType::Planet | ExoType::Satellite) => {
            return Err(DescriptionError::MissingField {
                object: record.name.clone(),
                field: "trajectory",
            })
        }
        None => Orbit::stationary(),
    };
    if record.exo_type == ExoType::Planet && record.diameter.is_none() {
        return Err(DescriptionError::MissingField {
            object: record.name.clone(),
            field: "diameter",
        });
    }
    let color = record.temperature.map(temperature_to_rgb).transpose()?;

    Ok(BodyLayout {
        name: record.name.clone(),
        orbit,
        diameter: record.diameter,
        color,
        revolution_period: record.revolution_period,
        normalized_revolution_period: None,
        parent_name: record.parent_name.clone(),
    })
}

fn layouts(
    records: &[SpatialRecord],
    config: &LayoutConfig,
) -> DescriptionResult<Vec<BodyLayout>> {
    records.iter().map(|r| body_layout(r, config)).collect()
}

fn scaled(body: &BodyLayout) -> DescriptionResult<ScaledBody> {
    let diameter = body.diameter.ok_or_else(|| DescriptionError::MissingField {
        object: body.name.clone(),
        field: "diameter",
    })?;
    Ok(ScaledBody {
        orbit: body.orbit,
        diameter,
    })
}

pub fn prepare_system(
    desc: &SystemDescription,
    config: &LayoutConfig,
) -> DescriptionResult<SystemLayout> {
    let classified = classify_from_root(desc)?;

    let mut stars = layouts(&classified.star, config)?.into_iter();
    let mut star = stars.next().ok_or(DescriptionError::NoStar)?;
    let extra_stars = stars.count();
    if extra_stars > 0 {
        warn!("only the first star is used, {extra_stars} ignored");
    }

    let mut planets = layouts(&classified.planet, config)?;
    planets.sort_by(|x, y| {
        x.orbit
            .semi_major_axis()
            .total_cmp(&y.orbit.semi_major_axis())
    });
    let mut satellites = layouts(&classified.satellite, config)?;
    let mut rings = layouts(&classified.rings, config)?;

    let clock = match planets.first().and_then(|p| p.revolution_period) {
        Some(period) if period.is_finite() && period > 0.0 => Some(ClockConfig {
            simulation_time: config.simulation_time,
            first_planet_revolution: period,
        }),
        Some(period) => {
            return Err(CelestialError::invalid(
                "revolution_period",
                format!("first planet period {period} must be positive"),
            )
            .into())
        }
        None => None,
    };
    if let Some(clock) = &clock {
        let bodies = std::iter::once(&mut star)
            .chain(planets.iter_mut())
            .chain(satellites.iter_mut())
            .chain(rings.iter_mut());
        for body in bodies {
            body.normalized_revolution_period =
                body.revolution_period.map(|p| clock.normalize_period(p));
        }
    }

    let scaling = if planets.len() >= 2 && star.diameter.is_some() {
        let planet_bodies = planets.iter().map(scaled).collect::<DescriptionResult<Vec<_>>>()?;
        Some(plan_scaling(&scaled(&star)?, &planet_bodies, &config.scaling)?)
    } else {
        info!(
            "no scaling plan: {} planet(s), star diameter {:?}",
            planets.len(),
            star.diameter
        );
        None
    };

    info!(
        "prepared system around {}: {} planets, {} satellites, {} rings",
        star.name,
        planets.len(),
        satellites.len(),
        rings.len()
    );

    Ok(SystemLayout {
        star,
        planets,
        satellites,
        rings,
        scaling,
        clock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn config() -> LayoutConfig {
        LayoutConfig {
            astronomical_unit: 1.0,
            ..LayoutConfig::default()
        }
    }

    fn sample() -> SystemDescription {
        SystemDescription::from_value(&json!({
            "system": [
                {
                    "name": "outer", "exo_type": "planet",
                    "trajectory": { "a": 2.0, "e": 0.0 },
                    "diameter": 1.0, "revolutionPeriod": 200.0
                },
                {
                    "name": "inner", "exo_type": "planet",
                    "trajectory": { "a": 1.0, "e": 0.0 },
                    "diameter": 1.0, "revolutionPeriod": 100.0
                },
                {
                    "name": "moon", "exo_type": "satellite",
                    "trajectory": { "a": 0.01, "e": 0.05 },
                    "diameter": 0.2, "revolutionPeriod": 25.0
                },
                { "name": "halo", "exo_type": "rings", "diameter": 2.5 },
                {
                    "name": "sun", "exo_type": "star",
                    "diameter": 0.1, "temperature": 5500.0
                }
            ],
            "hierarchy": [
                { "g_inner": ["inner", "moon"] },
                { "g_outer": ["outer", "halo"] },
                { "root": ["g_outer", "g_inner", "sun"] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn planets_come_out_innermost_first() {
        let layout = prepare_system(&sample(), &config()).unwrap();
        let names: Vec<&str> = layout.planets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["inner", "outer"]);
        assert_eq!(layout.satellites[0].parent_name.as_deref(), Some("inner"));
        assert_eq!(layout.rings[0].parent_name.as_deref(), Some("outer"));
    }

    #[test]
    fn star_is_static_and_coloured() {
        let layout = prepare_system(&sample(), &config()).unwrap();
        assert!(!layout.star.orbit.can_move());
        assert_eq!(layout.star.orbit.semi_major_axis(), 0.0);
        assert_eq!(layout.star.color.unwrap().to_hex(), "#FFE4BE");
        assert!(layout.planets.iter().all(|p| p.orbit.can_move()));
    }

    #[test]
    fn periods_follow_first_planet() {
        let layout = prepare_system(&sample(), &config()).unwrap();
        let clock = layout.clock.unwrap();
        assert_eq!(clock.first_planet_revolution, 100.0);

        assert_relative_eq!(layout.planets[0].normalized_revolution_period.unwrap(), 5.0);
        assert_relative_eq!(layout.planets[1].normalized_revolution_period.unwrap(), 10.0);
        assert_relative_eq!(layout.satellites[0].normalized_revolution_period.unwrap(), 1.25);
        assert_eq!(layout.rings[0].normalized_revolution_period, None);
    }

    #[test]
    fn scaling_plan_is_derived() {
        let layout = prepare_system(&sample(), &config()).unwrap();
        let plan = layout.scaling.unwrap();

        assert_relative_eq!(plan.planet_factor, 0.5, epsilon = 1e-9);
        // Inner planet grows to radius 0.25, leaving 0.75 for a 0.1 wide star.
        assert_relative_eq!(plan.star_factor, 0.9 * 2.0 * 0.75 / 0.1, epsilon = 1e-9);
    }

    #[test]
    fn semi_major_axes_are_scaled_to_scene_units() {
        let layout = prepare_system(&sample(), &LayoutConfig::default()).unwrap();
        assert_relative_eq!(
            layout.planets[1].orbit.semi_major_axis(),
            2.0 * ASTRONOMICAL_UNIT
        );
    }

    #[test]
    fn lone_planet_has_no_scaling_plan() {
        let desc = SystemDescription::from_value(&json!({
            "system": [
                {
                    "name": "p", "exo_type": "planet",
                    "trajectory": { "a": 1.0 }, "diameter": 1.0
                },
                { "name": "s", "exo_type": "star", "diameter": 3.0 }
            ],
            "hierarchy": [{ "root": ["p", "s"] }]
        }))
        .unwrap();

        let layout = prepare_system(&desc, &config()).unwrap();
        assert!(layout.scaling.is_none());
        assert!(layout.clock.is_none());
    }

    #[test]
    fn missing_pieces_are_reported() {
        let no_star = SystemDescription::from_value(&json!({
            "system": [{ "name": "p", "exo_type": "planet", "trajectory": { "a": 1.0 } }],
            "hierarchy": [{ "root": ["p"] }]
        }))
        .unwrap();
        assert!(matches!(
            prepare_system(&no_star, &config()),
            Err(DescriptionError::NoStar)
        ));

        let no_trajectory = SystemDescription::from_value(&json!({
            "system": [
                { "name": "p", "exo_type": "planet" },
                { "name": "s", "exo_type": "star" }
            ],
            "hierarchy": [{ "root": ["p", "s"] }]
        }))
        .unwrap();
        assert!(matches!(
            prepare_system(&no_trajectory, &config()),
            Err(DescriptionError::MissingField { field: "trajectory", .. })
        ));

        let no_diameter = SystemDescription::from_value(&json!({
            "system": [
                { "name": "p1", "exo_type": "planet", "trajectory": { "a": 1.0 } },
                { "name": "p2", "exo_type": "planet", "trajectory": { "a": 2.0 } },
                { "name": "s", "exo_type": "star" }
            ],
            "hierarchy": [{ "root": ["p1", "p2", "s"] }]
        }))
        .unwrap();
        assert!(matches!(
            prepare_system(&no_diameter, &config()),
            Err(DescriptionError::MissingField { field: "diameter", .. })
        ));

        let open_orbit = SystemDescription::from_value(&json!({
            "system": [
                { "name": "p", "exo_type": "planet", "trajectory": { "a": 1.0, "e": 1.5 } },
                { "name": "s", "exo_type": "star" }
            ],
            "hierarchy": [{ "root": ["p", "s"] }]
        }))
        .unwrap();
        assert!(matches!(
            prepare_system(&open_orbit, &config()),
            Err(DescriptionError::Celestial(_))
        ));
    }
}
