//! Scale a dataset about its first position.
//!
//! Distances and bearings are taken on the sphere: each position keeps its
//! initial bearing from the origin while its great-circle distance is
//! multiplied by the factor. Angular distances are used throughout, so the
//! earth radius cancels out.

use super::{payload, KIND_SCALE};
use crate::action::Action;
use crate::features::Position;
use crate::outcome::Outcome;
use crate::registry::{Accumulator, ActionHandler};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ScalePayload {
    factor: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleHandler;

impl ActionHandler for ScaleHandler {
    fn kind(&self) -> &str {
        KIND_SCALE
    }

    fn handle(&self, acc: Accumulator, action: &Action) -> Accumulator {
        let ScalePayload { factor } = match payload(action) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id = %action.id, error = %e, "scale skipped");
                return acc;
            }
        };
        let Some(origin) = acc.state.first_position().map(|p| (p.lon(), p.lat())) else {
            return acc;
        };

        let state = acc.state.map_positions(|p| scale_about(origin, p, factor));
        let outcome = Outcome::Spatial {
            after: state.clone(),
        };
        acc.with(state, action.id, outcome)
    }
}

fn scale_about(origin: (f64, f64), p: &mut Position, factor: f64) {
    let target = (p.lon(), p.lat());
    let delta = angular_distance(origin, target);
    if delta == 0.0 {
        return;
    }
    let (lon, lat) = destination(origin, delta * factor, bearing(origin, target));
    p.set(lon, lat);
}

/// Initial bearing in radians from `a` to `b`, both `(lon, lat)` in degrees.
fn bearing(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lon1, lat1) = (a.0.to_radians(), a.1.to_radians());
    let (lon2, lat2) = (b.0.to_radians(), b.1.to_radians());
    let y = (lon2 - lon1).sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos();
    y.atan2(x)
}

/// Haversine central angle in radians.
fn angular_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lat2) = (a.1.to_radians(), b.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.0 - a.0).to_radians();
    let h = ((d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos())
        .clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Point reached from `origin` after travelling `delta` radians along
/// `bearing`. Returns `(lon, lat)` in degrees.
fn destination(origin: (f64, f64), delta: f64, bearing: f64) -> (f64, f64) {
    let (lon1, lat1) = (origin.0.to_radians(), origin.1.to_radians());
    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
    (lon2.to_degrees(), lat2.to_degrees())
}
