//! Synthetic save documents for exercising the codec.
//!
//! Generated documents mimic a real save: a small system section, a party
//! with gold and actor names (some outside Latin-1), and a long array of
//! mostly-small game variables with occasional strings and nulls. One
//! variable holds the gold amount, like the money slot of a real save.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};

const ACTOR_NAMES: &[&str] = &["Harold", "Therese", "Marsha", "Lucius", "アリス", "Zoë", "勇者"];

/// A generated document and the slot holding its money value.
///
/// `money_slot` is `None` when the document has no game variables.
#[derive(Debug, Clone)]
pub struct SampleSave {
    pub document: Value,
    pub money: i64,
    pub money_slot: Option<usize>,
}

/// Generate a save document with `variable_count` game variables.
pub fn generate_save(seed: u64, variable_count: usize) -> SampleSave {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let money: i64 = rng.gen_range(100..=999_999);

    let mut variables: Vec<Value> = (0..variable_count)
        .map(|_| match rng.gen_range(0..10) {
            // Mostly zero, as in real saves
            0..=5 => json!(0),
            6..=7 => json!(rng.gen_range(1..100)),
            8 => Value::Null,
            _ => json!(format!("flag_{}", rng.gen_range(0..20))),
        })
        .collect();

    let money_slot = (variable_count > 0).then(|| {
        let slot = rng.gen_range(0..variable_count.min(50));
        variables[slot] = json!(money);
        slot
    });

    let actors: Vec<Value> = (0..4)
        .map(|_| {
            let name = ACTOR_NAMES[rng.gen_range(0..ACTOR_NAMES.len())];
            json!({
                "_name": name,
                "_level": rng.gen_range(1..=99),
                "_hp": rng.gen_range(50..=9999),
            })
        })
        .collect();

    let document = json!({
        "system": {
            "_saveCount": rng.gen_range(1..200),
            "_versionId": rng.gen_range(1..10),
            "_framesOnSave": rng.gen_range(0..10_000_000u64),
        },
        "party": {
            "_gold": money,
            "_actors": actors,
        },
        "variables": {
            "_data": { "@c": 1, "@a": variables },
        },
    });

    SampleSave {
        document,
        money,
        money_slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{find_money_slot, MONEY_SCAN_LIMIT};

    #[test]
    fn test_determinism() {
        let a = generate_save(12345, 300);
        let b = generate_save(12345, 300);
        assert_eq!(a.document, b.document);
        assert_eq!(a.money_slot, b.money_slot);
    }

    #[test]
    fn test_different_seeds() {
        let a = generate_save(1, 300);
        let b = generate_save(2, 300);
        assert_ne!(a.document, b.document);
    }

    #[test]
    fn test_structure() {
        let sample = generate_save(42, 200);
        let vars = sample.document["variables"]["_data"]["@a"].as_array().unwrap();
        assert_eq!(vars.len(), 200);
        assert_eq!(vars[sample.money_slot.unwrap()], json!(sample.money));
        assert_eq!(sample.document["party"]["_gold"], json!(sample.money));
    }

    #[test]
    fn test_money_slot_is_findable() {
        let sample = generate_save(7, 120);
        let slot = find_money_slot(&sample.document, sample.money, MONEY_SCAN_LIMIT).unwrap();
        assert_eq!(Some(slot), sample.money_slot);
    }

    #[test]
    fn test_empty_variables() {
        let sample = generate_save(9, 0);
        let vars = sample.document["variables"]["_data"]["@a"].as_array().unwrap();
        assert!(vars.is_empty());
        assert_eq!(sample.money_slot, None);
    }
}
