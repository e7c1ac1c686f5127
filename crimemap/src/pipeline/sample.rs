//! Sampling stage.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed of the sampling generator, fixed so the same input always gives the same map.
pub const SAMPLE_SEED: u64 = 42;

/// Reduces `items` to at most `cap` elements using [`SAMPLE_SEED`].
///
/// See [`sample_with_seed`].
pub fn sample<T>(items: Vec<T>, cap: usize) -> Vec<T> {
    sample_with_seed(items, cap, SAMPLE_SEED)
}

/// Reduces `items` to at most `cap` elements.
///
/// Inputs that already fit are returned unchanged. Otherwise exactly `cap` distinct positions
/// are drawn uniformly without replacement from a ChaCha8 generator seeded with `seed`, and
/// the chosen items keep their original relative order. The cap is not range checked here.
pub fn sample_with_seed<T>(items: Vec<T>, cap: usize, seed: u64) -> Vec<T> {
    if items.len() <= cap {
        return items;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keep = vec![false; items.len()];
    for idx in index::sample(&mut rng, items.len(), cap).into_vec() {
        keep[idx] = true;
    }

    log::debug!("Sampled {cap} of {} records", items.len());

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn small_input_is_unchanged() {
        let items: Vec<u32> = (0..50).collect();
        assert_eq!(sample(items.clone(), 100), items);
        assert_eq!(sample(items.clone(), 50), items);
    }

    #[test]
    fn large_input_is_cut_to_cap() {
        let items: Vec<u32> = (0..5000).collect();
        let sampled = sample(items, 500);

        assert_eq!(sampled.len(), 500);
        let unique: HashSet<_> = sampled.iter().collect();
        assert_eq!(unique.len(), 500);
        assert!(sampled.iter().all(|v| *v < 5000));
    }

    #[test]
    fn sampled_items_keep_input_order() {
        let items: Vec<u32> = (0..1000).collect();
        let sampled = sample(items, 100);
        assert!(sampled.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sampling_is_deterministic() {
        let items: Vec<u32> = (0..3000).collect();
        assert_eq!(sample(items.clone(), 700), sample(items, 700));
    }

    #[test]
    fn different_seeds_give_different_samples() {
        let items: Vec<u32> = (0..3000).collect();
        assert_ne!(
            sample_with_seed(items.clone(), 100, 1),
            sample_with_seed(items, 100, 2)
        );
    }

    #[test]
    fn zero_cap_gives_empty_output() {
        let items: Vec<u32> = (0..10).collect();
        assert!(sample(items, 0).is_empty());
    }
}
