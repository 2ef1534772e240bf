//! Culture preference as an algebraic, serializable expression tree (spec
//! §9), replacing the original's literal closures so preferences can be
//! authored in the culture-set JSON document and extended without touching
//! the core.

use crate::biome::BiomeTable;
use crate::cell::{CellId, CellStore};
use serde::{Deserialize, Serialize};

/// Context threaded through evaluation for leaves that need a whole-map
/// aggregate (`normalized_habitability`) or the biome catalog
/// (`biome_match`).
pub struct PreferenceContext<'a> {
    pub store: &'a CellStore,
    pub biomes: &'a BiomeTable,
    pub max_habitability: f64,
}

impl<'a> PreferenceContext<'a> {
    pub fn new(store: &'a CellStore, biomes: &'a BiomeTable) -> Self {
        let max_habitability = store
            .habitability
            .iter()
            .cloned()
            .max()
            .map(|h| h as f64)
            .unwrap_or(1.0)
            .max(1.0);
        Self {
            store,
            biomes,
            max_habitability,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Preference {
    Habitability,
    ShoreDistance,
    Elevation,
    NormalizedHabitability,
    TemperatureDifference { goal: f64 },
    BiomeMatch { set: Vec<String>, fee: f64 },
    SeaCoast { fee: f64 },
    Negate { of: Box<Preference> },
    Add { lhs: Box<Preference>, rhs: Box<Preference> },
    Mul { lhs: Box<Preference>, rhs: Box<Preference> },
    Div { lhs: Box<Preference>, rhs: Box<Preference> },
    Pow { of: Box<Preference>, exponent: f64 },
}

impl Preference {
    pub fn eval(&self, ctx: &PreferenceContext, cell: CellId) -> f64 {
        let i = cell.index();
        match self {
            Preference::Habitability => ctx.store.habitability[i] as f64,
            Preference::ShoreDistance => ctx.store.shore_distance[i] as f64,
            Preference::Elevation => ctx.store.elevation[i] as f64,
            Preference::NormalizedHabitability => {
                ctx.store.habitability[i] as f64 / ctx.max_habitability
            }
            Preference::TemperatureDifference { goal } => {
                -((ctx.store.temperature[i] as f64 - goal).abs())
            }
            Preference::BiomeMatch { set, fee } => match ctx.store.biome_id[i] {
                Some(biome_idx) => {
                    let key = &ctx.biomes.catalog[biome_idx].key_name;
                    if set.iter().any(|k| k == key) {
                        *fee
                    } else {
                        0.0
                    }
                }
                None => 0.0,
            },
            Preference::SeaCoast { fee } => {
                if ctx.store.shore_distance[i] == 1 {
                    *fee
                } else {
                    0.0
                }
            }
            Preference::Negate { of } => -of.eval(ctx, cell),
            Preference::Add { lhs, rhs } => lhs.eval(ctx, cell) + rhs.eval(ctx, cell),
            Preference::Mul { lhs, rhs } => lhs.eval(ctx, cell) * rhs.eval(ctx, cell),
            Preference::Div { lhs, rhs } => {
                let denom = rhs.eval(ctx, cell);
                if denom.abs() < f64::EPSILON {
                    0.0
                } else {
                    lhs.eval(ctx, cell) / denom
                }
            }
            Preference::Pow { of, exponent } => of.eval(ctx, cell).powf(*exponent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeTable;

    #[test]
    fn add_combines_two_leaves() {
        let mut store = crate::cell::test_store(1);
        store.habitability[0] = 10;
        store.elevation[0] = 5;
        let biomes = BiomeTable::default();
        let ctx = PreferenceContext::new(&store, &biomes);
        let expr = Preference::Add {
            lhs: Box::new(Preference::Habitability),
            rhs: Box::new(Preference::Elevation),
        };
        assert_eq!(expr.eval(&ctx, CellId(0)), 15.0);
    }

    #[test]
    fn preference_tree_round_trips_through_json() {
        let expr = Preference::Mul {
            lhs: Box::new(Preference::SeaCoast { fee: 5.0 }),
            rhs: Box::new(Preference::Pow {
                of: Box::new(Preference::Habitability),
                exponent: 2.0,
            }),
        };
        let json = serde_json::to_string(&expr).unwrap();
        let roundtrip: Preference = serde_json::from_str(&json).unwrap();
        let mut store = crate::cell::test_store(1);
        store.habitability[0] = 3;
        store.shore_distance[0] = 1;
        let biomes = BiomeTable::default();
        let ctx = PreferenceContext::new(&store, &biomes);
        assert_eq!(expr.eval(&ctx, CellId(0)), roundtrip.eval(&ctx, CellId(0)));
    }
}
