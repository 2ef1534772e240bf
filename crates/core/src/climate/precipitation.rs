//! Directional humidity advection (spec §4.3 step 3-4).

use super::wind::{prevailing_wind, PrevailingWind};
use crate::cell::CellStore;
use crate::config::ClimateConfig;
use crate::geometry::Point;
use fnv::FnvHashSet;

/// Per-5°-band modifier from equator (index 0) to pole (index 17), encoding
/// ITCZ / subtropical-dry / mid-latitude-wet / polar-dry banding.
const LAT_BAND_MODIFIER: [f64; 18] = [
    1.00, 0.95, 0.80, 0.60, 0.30, 0.20, 0.25, 0.40, 0.60, 0.70, 0.65, 0.55, 0.45, 0.35, 0.25, 0.18,
    0.12, 0.08,
];

const OCEAN_EVAPORATION: f64 = 2.0;
const EVAPORATION_RETURN: f64 = 0.5;

fn lat_band_modifier(abs_latitude: f64) -> f64 {
    let idx = ((abs_latitude / 5.0).floor() as usize).min(17);
    LAT_BAND_MODIFIER[idx]
}

fn wind_vector(wind: PrevailingWind) -> Point {
    let x = (wind.to_east as i32 - wind.to_west as i32) as f64;
    let y = (wind.to_south as i32 - wind.to_north as i32) as f64;
    let len = (x * x + y * y).sqrt();
    if len < f64::EPSILON {
        Point::new(1.0, 0.0)
    } else {
        Point::new(x / len, y / len)
    }
}

/// Cells at the windward edge of their tier, the starting points for each
/// downwind walk.
fn source_cells(store: &CellStore, members: &[usize], wind: PrevailingWind) -> Vec<usize> {
    if members.is_empty() {
        return Vec::new();
    }
    let coord = |i: usize, axis_x: bool| if axis_x { store.site[i].x } else { store.site[i].y };

    let (axis_x, want_max) = if wind.to_west {
        (true, true) // wind blows from the east -> source at the east (max x) edge
    } else if wind.to_east {
        (true, false)
    } else if wind.to_south {
        (false, false) // wind blows from the north -> source at north (min y) edge
    } else if wind.to_north {
        (false, true)
    } else {
        return Vec::new();
    };

    let extreme = members.iter().fold(None::<f64>, |acc, &i| {
        let v = coord(i, axis_x);
        Some(match acc {
            Some(a) if want_max => a.max(v),
            Some(a) => a.min(v),
            None => v,
        })
    });
    let Some(extreme) = extreme else { return Vec::new() };
    let span = {
        let (mut lo, mut hi) = (f64::MAX, f64::MIN);
        for &i in members {
            let v = coord(i, axis_x);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        (hi - lo).max(1.0)
    };
    let tolerance = span * 0.03;
    members
        .iter()
        .copied()
        .filter(|&i| (coord(i, axis_x) - extreme).abs() <= tolerance)
        .collect()
}

fn pick_next(
    store: &CellStore,
    current: usize,
    wind_dir: Point,
    visited: &FnvHashSet<usize>,
) -> Option<usize> {
    let current_id = crate::cell::CellId(current as u32);
    let mut best: Option<(usize, f64)> = None;
    for &neighbor in store.neighbors(current_id) {
        let n = neighbor.index();
        if visited.contains(&n) {
            continue;
        }
        let bearing = store.site[current].bearing_to(&store.site[n]);
        let bearing_vec = Point::new(bearing.cos(), bearing.sin());
        let score = bearing_vec.x * wind_dir.x + bearing_vec.y * wind_dir.y;
        let better = match best {
            None => true,
            Some((best_n, best_score)) => {
                score > best_score || ((score - best_score).abs() < 1e-9 && n < best_n)
            }
        };
        if better {
            best = Some((n, score));
        }
    }
    best.map(|(n, _)| n)
}

fn walk_downwind(
    store: &mut CellStore,
    start: usize,
    wind: PrevailingWind,
    config: &ClimateConfig,
    max_passable_elevation: f64,
) {
    let lat_mod = lat_band_modifier(store.latitude[start].abs());
    let max_prec = config.max_precipitation;
    let mut humidity = max_prec * lat_mod - store.elevation[start] as f64;
    if humidity <= 0.0 {
        return;
    }
    let wind_dir = wind_vector(wind);
    let mut visited = FnvHashSet::default();
    let mut current = start;

    loop {
        if !visited.insert(current) {
            break;
        }
        if store.temperature[current] < -5 {
            // no exchange; fall through to movement unchanged.
        } else if store.is_ocean[current] {
            store.precipitation[current] += OCEAN_EVAPORATION.round() as u32;
            humidity = (humidity + OCEAN_EVAPORATION).min(max_prec);
        } else {
            let h_cur = store.elevation[current] as f64;
            let next_elev = pick_next(store, current, wind_dir, &visited)
                .map(|n| store.elevation[n] as f64)
                .unwrap_or(h_cur);
            let uplift = (next_elev - h_cur).max(0.0) * (next_elev / 70.0).powi(2);
            let mut precip = (humidity / (10.0 * config.precipitation_modifier.max(0.01))).max(1.0) + uplift;
            precip = precip.clamp(1.0, humidity.max(1.0));
            store.precipitation[current] += precip.round() as u32;
            humidity -= precip;
            if precip > 1.5 {
                humidity = (humidity + EVAPORATION_RETURN).min(max_prec);
            }
            if next_elev > max_passable_elevation {
                store.precipitation[current] += humidity.round() as u32;
                break;
            }
        }
        if humidity <= 0.0 {
            break;
        }
        match pick_next(store, current, wind_dir, &visited) {
            Some(next) => current = next,
            None => break,
        }
    }
}

pub fn run_precipitation(store: &mut CellStore, config: &ClimateConfig, max_passable_elevation: f64) {
    for tier in 0..6u8 {
        let members: Vec<usize> = (0..store.len())
            .filter(|&i| store.wind_tier[i] == tier)
            .collect();
        if members.is_empty() {
            continue;
        }
        let wind = prevailing_wind(tier as usize);
        let mut sources = source_cells(store, &members, wind);
        sources.sort_unstable();
        for source in sources {
            walk_downwind(store, source, wind, config, max_passable_elevation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::wind::assign_wind_tiers;

    #[test]
    fn flat_land_strip_accumulates_some_precipitation() {
        let mut store = crate::cell::test_store(10);
        for i in 0..10 {
            store.site[i] = Point::new(i as f64, 0.0);
            store.latitude[i] = 0.0;
            store.elevation[i] = 20;
            store.temperature[i] = 25;
        }
        let adjacency: Vec<Vec<crate::cell::CellId>> = (0..10)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(crate::cell::CellId((i - 1) as u32));
                }
                if i < 9 {
                    v.push(crate::cell::CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);
        assign_wind_tiers(&mut store);

        let config = ClimateConfig::default();
        run_precipitation(&mut store, &config, 85.0);
        assert!(store.precipitation.iter().any(|&p| p > 0));
    }
}
