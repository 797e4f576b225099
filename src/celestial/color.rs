use crate::celestial::error::{ensure_finite, CelestialError, CelestialResult};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

// Cubic fits of the chromaticity x coordinate in 1/T, per temperature regime.
const X_FIT_COOL: [f64; 4] = [0.27475e9, -0.98598e6, 1.17444e3, 0.145986];
const X_FIT_WARM: [f64; 4] = [-4.6070e9, 2.9678e6, 0.09911e3, 0.244063];
const X_FIT_HOT: [f64; 4] = [-2.0064e9, 1.9018e6, 0.24748e3, 0.237040];

// Linear sRGB from CIE XYZ.
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2406, -1.5372, -0.4986],
    [-0.9689, 1.8758, 0.0415],
    [0.0557, -0.2040, 1.0570],
];

fn chromaticity_x(kelvin: f64) -> f64 {
    let [c3, c2, c1, c0] = if kelvin <= 4000.0 {
        X_FIT_COOL
    } else if kelvin <= 7000.0 {
        X_FIT_WARM
    } else {
        X_FIT_HOT
    };
    let t = kelvin;
    c3 / (t * t * t) + c2 / (t * t) + c1 / t + c0
}

pub fn temperature_to_rgb(kelvin: f64) -> CelestialResult<Rgb> {
    let kelvin = ensure_finite("temperature", kelvin)?;
    if kelvin <= 0.0 {
        return Err(CelestialError::invalid(
            "temperature",
            format!("{kelvin} K is not above absolute zero"),
        ));
    }

    let x = chromaticity_x(kelvin);
    let y = -3.0 * x * x + 2.87 * x - 0.275;
    let xyz = [x / y, 1.0, (1.0 - x - y) / y];

    let [red, green, blue] =
        XYZ_TO_RGB.map(|row| row.iter().zip(xyz).map(|(m, v)| m * v).sum::<f64>());
    let max = red.max(green).max(blue);
    if !(max.is_finite() && max > 0.0) {
        return Err(CelestialError::invalid(
            "temperature",
            format!("{kelvin} K falls outside the fitted locus"),
        ));
    }

    // Very cool stars push blue slightly below zero.
    let norm = |c: f64| (c / max).clamp(0.0, 1.0);
    Ok(Rgb {
        red: norm(red),
        green: norm(green),
        blue: norm(blue),
    })
}
