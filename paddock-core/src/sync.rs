//! Skill roll synchronization across the two competitors.
//!
//! Each skill application consumes randomness from its competitor's private
//! stream, so skills held by both competitors must be applied in identical
//! relative order on both streams or their activation rolls desynchronize.

use std::collections::BTreeSet;

use crate::engine::{PairRng, SkillId, SkillMetaSource, WisdomSeedMap};

/// Pairs drawn and discarded before the first wisdom seed, so the map never
/// correlates with the low-order bits the seed was built from.
pub const WISDOM_RNG_BURN: usize = 20;

/// Synchronized application order for both competitors, plus the wisdom seed
/// map shared by any skill either one carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSync {
    /// First-listed competitor's skills in application order.
    pub first: Vec<SkillId>,
    /// Second-listed competitor's skills in application order.
    pub second: Vec<SkillId>,
    pub wisdom_seeds: WisdomSeedMap,
}

/// Compute the synchronized ordering and wisdom seed map.
///
/// Shared skills sort by ascending group id among the groups both
/// competitors hold, then by raw skill id; skills outside the shared groups
/// sort last. Applying the same key to both lists makes the shared skills'
/// relative order match exactly regardless of each side's unique skills.
pub fn synchronize(
    meta: &impl SkillMetaSource,
    first: &[SkillId],
    second: &[SkillId],
    rng: &mut impl PairRng,
) -> SkillSync {
    let shared = shared_groups(meta, first, second);
    let first = ordered(meta, &shared, first);
    let second = ordered(meta, &shared, second);

    for _ in 0..WISDOM_RNG_BURN {
        rng.pair();
    }
    let mut wisdom_seeds = WisdomSeedMap::new();
    // The second competitor's draw wins for skills on both; which one wins
    // does not matter as long as both streams see the same value.
    for &id in first.iter().chain(second.iter()) {
        wisdom_seeds.insert(id, rng.pair());
    }

    SkillSync {
        first,
        second,
        wisdom_seeds,
    }
}

fn shared_groups(
    meta: &impl SkillMetaSource,
    first: &[SkillId],
    second: &[SkillId],
) -> Vec<crate::engine::GroupId> {
    let groups_of = |skills: &[SkillId]| -> BTreeSet<_> {
        skills.iter().filter_map(|&id| meta.group_id(id)).collect()
    };
    let a = groups_of(first);
    let b = groups_of(second);
    a.intersection(&b).copied().collect()
}

fn ordered(
    meta: &impl SkillMetaSource,
    shared: &[crate::engine::GroupId],
    skills: &[SkillId],
) -> Vec<SkillId> {
    let rank = |id: SkillId| {
        meta.group_id(id)
            .and_then(|g| shared.iter().position(|&s| s == g))
            .unwrap_or(shared.len())
    };
    let mut out = skills.to_vec();
    out.sort_by_key(|&id| (rank(id), id.0));
    out
}
