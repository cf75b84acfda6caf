//! Seeded random gathers checked against the row model.

use ntest::timeout;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::helpers::{build_block, read_rows, ModelRow};

fn random_rows(rng: &mut StdRng, count: usize) -> Vec<ModelRow> {
    (0..count)
        .map(|i| {
            if rng.gen_bool(0.3) {
                None
            } else {
                let len = rng.gen_range(0..6);
                Some((rng.gen_range(-1000..1000), "x".repeat(len) + &i.to_string()))
            }
        })
        .collect()
}

#[timeout(5000)]
#[test]
fn test_random_gathers_match_model() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..50 {
        let count = rng.gen_range(1..40);
        let rows = random_rows(&mut rng, count);
        let block = build_block(&rows, round % 2 == 0);

        let length = rng.gen_range(0..60);
        let positions: Vec<usize> = (0..length).map(|_| rng.gen_range(0..count)).collect();
        let gathered = block.gather(&positions)?;

        let expected: Vec<ModelRow> = positions.iter().map(|&p| rows[p].clone()).collect();
        assert_eq!(read_rows(&gathered)?, expected);

        let has_null = expected.iter().any(Option::is_none);
        assert_eq!(gathered.may_have_null(), has_null);
        assert_eq!(gathered.has_field_offsets(), has_null);
    }
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_random_gathers_of_regions_match_model() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    for round in 0..50 {
        let count = rng.gen_range(1..40);
        let rows = random_rows(&mut rng, count);
        let block = build_block(&rows, round % 3 == 0);

        let start = rng.gen_range(0..count);
        let length = rng.gen_range(1..=count - start);
        let view = block.region(start, length)?;

        let positions: Vec<usize> = (0..20).map(|_| rng.gen_range(0..length)).collect();
        let gathered = view.gather(&positions)?;

        let expected: Vec<ModelRow> = positions
            .iter()
            .map(|&p| rows[start + p].clone())
            .collect();
        assert_eq!(read_rows(&gathered)?, expected);
    }
    Ok(())
}
