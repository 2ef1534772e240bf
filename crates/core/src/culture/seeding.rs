//! Culture selection and center placement (spec §4.8 "Selection" and "Center
//! placement").

use super::preference::{Preference, PreferenceContext};
use crate::biome::BiomeTable;
use crate::cell::{CellId, CellStore};
use crate::rng::WorldRng;
use fnv::FnvHashSet;
use log::warn;
use rand::Rng;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// One entry of a configured culture set (spec §6 "Culture set"): a name, a
/// name-base id, an acceptance probability, and a preference expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CultureSeed {
    pub name: String,
    pub base: usize,
    pub odd: f64,
    pub preference: Preference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum CultureType {
    Generic,
    Nomadic,
    Highland,
    Lake,
    Naval,
    River,
    Hunting,
}

impl CultureType {
    /// Base expansionism multiplier by type (spec §4.8 "Center placement").
    fn base_expansionism(self) -> f64 {
        match self {
            CultureType::Lake => 0.8,
            CultureType::Naval => 1.5,
            CultureType::River => 0.9,
            CultureType::Nomadic => 1.5,
            CultureType::Hunting => 0.7,
            CultureType::Highland => 1.2,
            CultureType::Generic => 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Culture {
    pub name: String,
    pub center_cell: CellId,
    pub culture_type: CultureType,
    pub expansionism: f64,
    pub name_base_id: usize,
    pub preference: Preference,
    pub locked: bool,
}

struct CenterPoint {
    cell: CellId,
    x: f64,
    y: f64,
}

impl RTreeObject for CenterPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for CenterPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

const MAX_CENTER_ATTEMPTS: usize = 100;
const UNCONDITIONAL_ACCEPT_AFTER: usize = 200;
const CENTER_BIAS_EXPONENT: i32 = 5;

/// Shrinks the requested culture set down to what the habitable land can
/// support, accepting each candidate with probability `odd` (spec §4.8
/// "Selection"). Returns an empty vec when the caller should fall back to
/// the single "Wildlands" culture.
pub fn select_cultures(
    mut candidates: Vec<CultureSeed>,
    populated: usize,
    target_count: usize,
    rng: &mut WorldRng,
) -> Vec<CultureSeed> {
    let mut count = target_count;
    if populated < count * 25 {
        count = populated / 50;
        warn!(
            "only {populated} populated cells for {target_count} requested cultures; shrinking to {count}"
        );
    }
    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }
    count = count.min(candidates.len());

    let mut selected = Vec::with_capacity(count);
    let mut attempts = 0usize;
    while selected.len() < count && !candidates.is_empty() {
        let idx = rng.inner_mut().gen_range(0..candidates.len());
        let accept = attempts >= UNCONDITIONAL_ACCEPT_AFTER
            || rng.inner_mut().gen_bool(candidates[idx].odd.clamp(0.0, 1.0));
        attempts += 1;
        if accept {
            selected.push(candidates.remove(idx));
        }
    }
    selected
}

/// Determines a culture's type from its center cell (spec §4.8 "Center
/// placement"). The original's `population` reference in this branch is
/// undefined in scope (spec §9 open question); that condition is treated as
/// always false here, so a low, nomadic-biome cell without it still falls
/// through to the ordinary Nomadic/Generic checks below.
fn classify_center(store: &CellStore, biomes: &BiomeTable, lake_cells: usize, cell: CellId) -> CultureType {
    let i = cell.index();
    let biome_idx = store.biome_id[i];
    let is_nomadic_biome = biome_idx.map(|b| biomes.catalog[b].is_nomadic).unwrap_or(false);
    let is_huntable_biome = biome_idx.map(|b| biomes.catalog[b].is_huntable).unwrap_or(false);

    if store.elevation[i] < 30 && is_nomadic_biome {
        return CultureType::Nomadic;
    }
    if store.elevation[i] > 50 {
        return CultureType::Highland;
    }
    if store.lake_id[i].is_some() && lake_cells > 5 {
        return CultureType::Lake;
    }
    if store.shore_distance[i] == 1 {
        if let Some(water_id) = store.closest_water[i] {
            if store.is_ocean[water_id.index()] {
                return CultureType::Naval;
            }
        }
    }
    let high_flux = store.water_flow[i] + store.confluence_flux[i] > 50.0;
    if store.river_id[i].is_some() && high_flux {
        return CultureType::River;
    }
    // spec §9: the unreachable `cells.t[i] > 2` check is reinterpreted as
    // `shore_distance > 2` (deep interior) combined with a huntable biome.
    if store.shore_distance[i] > 2 && is_huntable_biome {
        return CultureType::Hunting;
    }
    CultureType::Generic
}

fn lake_size(store: &CellStore, lake_cells_by_id: &[usize], cell: CellId) -> usize {
    store.lake_id[cell.index()]
        .and_then(|id| lake_cells_by_id.get(id).copied())
        .unwrap_or(0)
}

/// Places one culture center per accepted seed, classifies its type, and
/// draws its expansionism (spec §4.8).
#[allow(clippy::too_many_arguments)]
pub fn place_centers(
    store: &CellStore,
    biomes: &BiomeTable,
    lake_cells_by_id: &[usize],
    seeds: Vec<CultureSeed>,
    width: f64,
    height: f64,
    power_input: f64,
    rng: &mut WorldRng,
) -> Vec<Culture> {
    let count = seeds.len().max(1);
    let mut spacing = (width + height) / (2.0 * count as f64);
    let mut placed_tree: RTree<CenterPoint> = RTree::new();
    let mut taken: FnvHashSet<CellId> = FnvHashSet::default();
    let mut cultures = Vec::with_capacity(seeds.len());

    let land: Vec<CellId> = store.land_ids().filter(|&id| store.population[id.index()] > 0.0).collect();
    if land.is_empty() {
        return cultures;
    }
    let ctx = PreferenceContext::new(store, biomes);

    for (name_base_id, seed) in seeds.into_iter().enumerate() {
        let mut ranked = land.clone();
        ranked.sort_by(|&a, &b| {
            let sa = seed.preference.eval(&ctx, a);
            let sb = seed.preference.eval(&ctx, b);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut chosen = None;
        let mut try_spacing = spacing;
        'search: for _ in 0..MAX_CENTER_ATTEMPTS {
            let half = (ranked.len() / 2).max(1);
            let idx = rng.biased_index(0, half, CENTER_BIAS_EXPONENT);
            let candidate = ranked[idx];
            if taken.contains(&candidate) {
                try_spacing *= 0.9;
                continue;
            }
            let site = store.site[candidate.index()];
            let too_close = placed_tree
                .nearest_neighbor(&[site.x, site.y])
                .map(|nearest| nearest.distance_2(&[site.x, site.y]) < try_spacing * try_spacing)
                .unwrap_or(false);
            if too_close {
                try_spacing *= 0.9;
                continue 'search;
            }
            chosen = Some(candidate);
            break;
        }
        let Some(center) = chosen.or_else(|| ranked.iter().find(|c| !taken.contains(c)).copied()) else {
            continue;
        };

        taken.insert(center);
        let site = store.site[center.index()];
        placed_tree.insert(CenterPoint {
            cell: center,
            x: site.x,
            y: site.y,
        });
        spacing = try_spacing;

        let lake_cells = lake_size(store, lake_cells_by_id, center);
        let culture_type = classify_center(store, biomes, lake_cells, center);
        let draw: f64 = rng.inner_mut().gen_range(0.0..1.0);
        let expansionism = (draw * power_input / 2.0 + 1.0) * culture_type.base_expansionism();

        cultures.push(Culture {
            name: seed.name,
            center_cell: center,
            culture_type,
            expansionism,
            name_base_id: seed.base.max(name_base_id),
            preference: seed.preference,
            locked: false,
        });
    }
    cultures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::preference::Preference;

    fn seed(name: &str, odd: f64) -> CultureSeed {
        CultureSeed {
            name: name.to_string(),
            base: 0,
            odd,
            preference: Preference::Habitability,
        }
    }

    #[test]
    fn insufficient_population_shrinks_culture_count() {
        let mut rng = WorldRng::from_seed(1);
        let candidates = vec![seed("a", 1.0), seed("b", 1.0), seed("c", 1.0)];
        let selected = select_cultures(candidates, 40, 3, &mut rng);
        assert!(selected.len() <= 0);
    }

    #[test]
    fn ample_population_keeps_requested_count() {
        let mut rng = WorldRng::from_seed(1);
        let candidates = vec![seed("a", 1.0), seed("b", 1.0), seed("c", 1.0)];
        let selected = select_cultures(candidates, 1000, 3, &mut rng);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn centers_respect_minimum_spacing_or_fall_back() {
        let mut store = crate::cell::test_store(10);
        for i in 0..10 {
            store.population[i] = 10.0;
            store.elevation[i] = 40;
        }
        let adjacency: Vec<Vec<CellId>> = (0..10)
            .map(|i| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(CellId((i - 1) as u32));
                }
                if i < 9 {
                    v.push(CellId((i + 1) as u32));
                }
                v
            })
            .collect();
        store.set_neighbors(adjacency);
        let biomes = BiomeTable::default();
        let mut rng = WorldRng::from_seed(2);
        let seeds = vec![seed("a", 1.0), seed("b", 1.0)];
        let cultures = place_centers(&store, &biomes, &[], seeds, 10.0, 1.0, 1.0, &mut rng);
        assert_eq!(cultures.len(), 2);
        assert_ne!(cultures[0].center_cell, cultures[1].center_cell);
    }
}
