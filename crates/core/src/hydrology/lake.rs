//! Lake classification (spec §4.4 table).

use crate::cell::{CellStore, Lake, LakeGroup};
use crate::rng::WorldRng;
use rand::Rng;

/// Applies the group-classification table to a lake whose flux/evaporation
/// and inlet/outlet facts have already been computed.
pub fn classify(lake: &Lake, store: &CellStore, rng: &mut WorldRng) -> LakeGroup {
    let mean_temp = lake
        .cells
        .iter()
        .map(|&id| store.temperature[id.index()] as f64)
        .sum::<f64>()
        / lake.cells.len().max(1) as f64;
    let cell_count = lake.cells.len();
    let has_outlet = lake.outlet_cell.is_some();
    let has_inlet = !lake.inlets.is_empty();

    // "id % 10 == 0" in the source coupled a classification decision to cell
    // id ordering (spec §9 open question); we replace it with an explicit,
    // independently-seeded probability draw of the same 1-in-10 weight.
    let rare_roll: bool = rng.inner_mut().gen_bool(0.1);

    if mean_temp < -3.0 {
        LakeGroup::Frozen
    } else if lake.surface_elevation > 60.0 && cell_count < 10 && rare_roll {
        LakeGroup::Pluvial
    } else if !has_inlet && !has_outlet && lake.evaporation > 4.0 * lake.flux.max(0.01) {
        LakeGroup::Dry
    } else if !has_inlet && !has_outlet && cell_count < 3 && rare_roll {
        LakeGroup::Sinkhole
    } else if !has_outlet && lake.evaporation > lake.flux {
        LakeGroup::Salt
    } else {
        LakeGroup::Freshwater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellId;

    #[test]
    fn frozen_takes_precedence_over_everything_else() {
        let mut store = crate::cell::test_store(1);
        store.temperature[0] = -10;
        let lake = Lake {
            id: 0,
            cells: vec![CellId(0)],
            group: LakeGroup::Freshwater,
            surface_elevation: 90.0,
            flux: 0.0,
            evaporation: 0.0,
            outlet_cell: None,
            inlets: vec![],
        };
        let mut rng = WorldRng::from_seed(1);
        assert_eq!(classify(&lake, &store, &mut rng), LakeGroup::Frozen);
    }

    #[test]
    fn closed_basin_with_high_evaporation_is_dry() {
        let store = crate::cell::test_store(1);
        let lake = Lake {
            id: 0,
            cells: vec![CellId(0)],
            group: LakeGroup::Freshwater,
            surface_elevation: 20.0,
            flux: 1.0,
            evaporation: 10.0,
            outlet_cell: None,
            inlets: vec![],
        };
        let mut rng = WorldRng::from_seed(1);
        assert_eq!(classify(&lake, &store, &mut rng), LakeGroup::Dry);
    }
}
