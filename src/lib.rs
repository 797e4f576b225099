use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

pub mod celestial;
pub mod system;

use celestial::duration::{ClockConfig, SimulationClock};
use celestial::orbit::Orbit;
use celestial::packing::{self, ComparisonParams, OrbitComparison, ScalingMode, ScalingPlan};
use celestial::{color, duration, habitable};
use system::{LayoutConfig, SystemDescription};

thread_local! {
    static CLOCK: RefCell<Option<SimulationClock>> = RefCell::new(None);
}

fn with_clock_mut<R>(f: impl FnOnce(&mut SimulationClock) -> R) -> Result<R, &'static str> {
    CLOCK.with(|cell| {
        let mut opt = cell.borrow_mut();
        match opt.as_mut() {
            Some(clock) => Ok(f(clock)),
            None => Err("clock not initialized"),
        }
    })
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("exo-orbits: initialized");
}

#[wasm_bindgen(js_name = positionAtAngle)]
pub fn position_at_angle(a: f64, e: f64, nu: f64) -> Result<String, JsValue> {
    let orbit = Orbit::new(a, e, true).map_err(js_error)?;
    to_json(&orbit.position_at_angle(nu))
}

#[wasm_bindgen(js_name = sampleClosedCurve)]
pub fn sample_closed_curve(a: f64, e: f64, steps: u32) -> Result<String, JsValue> {
    let orbit = Orbit::new(a, e, true).map_err(js_error)?;
    let curve = orbit.sample_closed_curve(steps as usize).map_err(js_error)?;
    to_json(&curve)
}

#[wasm_bindgen(js_name = compareOrbits)]
pub fn compare_orbits(params_json: &str) -> Result<f64, JsValue> {
    let params: ComparisonParams = serde_json::from_str(params_json).map_err(js_error)?;
    let cmp = OrbitComparison::try_from(params).map_err(js_error)?;
    packing::compare_orbits(&cmp).map_err(js_error)
}

#[wasm_bindgen(js_name = compareSystemOrbits)]
pub fn compare_system_orbits(params_json: &str) -> Result<f64, JsValue> {
    let params: Vec<ComparisonParams> = serde_json::from_str(params_json).map_err(js_error)?;
    packing::compare_system_params(&params).map_err(js_error)
}

#[wasm_bindgen(js_name = scalingFactors)]
pub fn scaling_factors(plan_json: &str, mode: &str) -> Result<String, JsValue> {
    let plan: ScalingPlan = serde_json::from_str(plan_json).map_err(js_error)?;
    let mode: ScalingMode = mode.parse().map_err(js_error)?;
    let (planet, star) = plan.factors(mode);
    to_json(&ScaleView { planet, star })
}

#[derive(Serialize)]
struct ScaleView {
    planet: f64,
    star: f64,
}

#[wasm_bindgen(js_name = convertTemperatureToRGB)]
pub fn convert_temperature_to_rgb(temperature: f64) -> Result<String, JsValue> {
    let rgb = color::temperature_to_rgb(temperature).map_err(js_error)?;
    to_json(&rgb)
}

#[wasm_bindgen(js_name = colorInhabitable)]
pub fn color_inhabitable(
    a: f64,
    e: f64,
    inner_radius: f64,
    outer_radius: f64,
) -> Result<String, JsValue> {
    let color = habitable::color_inhabitable(a, e, inner_radius, outer_radius).map_err(js_error)?;
    to_json(&color)
}

#[wasm_bindgen(js_name = daysToDuration)]
pub fn days_to_duration(days_total: f64) -> Result<String, JsValue> {
    let duration = duration::days_to_duration(days_total).map_err(js_error)?;
    to_json(&duration)
}

#[wasm_bindgen(js_name = classifySystem)]
pub fn classify_system(system_json: &str, root: Option<String>) -> Result<String, JsValue> {
    let desc = SystemDescription::from_json_str(system_json).map_err(js_error)?;
    let classified = match root {
        Some(root) => system::classify_system(&desc, &root),
        None => system::classify_from_root(&desc),
    }
    .map_err(js_error)?;
    to_json(&classified)
}

#[wasm_bindgen(js_name = prepareSystem)]
pub fn prepare_system(system_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let desc = SystemDescription::from_json_str(system_json).map_err(js_error)?;
    let config: LayoutConfig = match config_json {
        Some(json) => serde_json::from_str(&json).map_err(js_error)?,
        None => LayoutConfig::default(),
    };
    let layout = system::prepare_system(&desc, &config).map_err(js_error)?;
    to_json(&layout)
}

#[wasm_bindgen(js_name = initClock)]
pub fn init_clock(simulation_time: f64, first_planet_revolution: f64) -> Result<(), JsValue> {
    let clock = SimulationClock::new(ClockConfig {
        simulation_time,
        first_planet_revolution,
    })
    .map_err(js_error)?;
    CLOCK.with(|c| {
        *c.borrow_mut() = Some(clock);
    });
    Ok(())
}

#[derive(Serialize)]
struct ClockView {
    days: f64,
    duration: duration::CalendarDuration,
    label: String,
}

#[wasm_bindgen(js_name = advanceClock)]
pub fn advance_clock(speed_ratio: f64, elapsed_ms: f64) -> Result<String, JsValue> {
    let view = with_clock_mut(|clock| {
        clock.advance(speed_ratio, elapsed_ms).map(|duration| ClockView {
            days: clock.days(),
            label: duration.to_string(),
            duration,
        })
    })
    .map_err(js_error)?
    .map_err(js_error)?;
    to_json(&view)
}
