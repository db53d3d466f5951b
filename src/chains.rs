//! Consolidating accepted mention pairs into coreference chains.
//!
//! Pairs are folded into a disjoint-set structure, each surviving set
//! becomes one chain, and every mention that never took part in a pair is
//! kept as an unlinked singleton so nothing is lost on export.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::unit::{MentionId, Unit};

/// Disjoint sets of mentions with union by size.
///
/// Each member maps to its leader and each leader to its full member set,
/// so a member is always in exactly one set.
#[derive(Debug, Clone, Default)]
pub struct DisjointSets {
    leaders: HashMap<MentionId, MentionId>,
    members: HashMap<MentionId, BTreeSet<MentionId>>,
}

impl DisjointSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leader(&self, mention: MentionId) -> Option<MentionId> {
        self.leaders.get(&mention).copied()
    }

    /// Members of the set containing `mention`.
    pub fn members(&self, mention: MentionId) -> Option<&BTreeSet<MentionId>> {
        self.leader(mention).and_then(|leader| self.members.get(&leader))
    }

    /// Number of disjoint sets.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn union(&mut self, a: MentionId, b: MentionId) {
        match (self.leader(a), self.leader(b)) {
            (Some(leader_a), Some(leader_b)) => {
                if leader_a == leader_b {
                    return;
                }
                let size_a = self.members.get(&leader_a).map_or(0, BTreeSet::len);
                let size_b = self.members.get(&leader_b).map_or(0, BTreeSet::len);
                let (large, small) = if size_a >= size_b {
                    (leader_a, leader_b)
                } else {
                    (leader_b, leader_a)
                };

                let moved = self.members.remove(&small).unwrap_or_default();
                for &member in &moved {
                    self.leaders.insert(member, large);
                }
                self.members.entry(large).or_default().extend(moved);
            }
            (Some(leader), None) => self.absorb(leader, b),
            (None, Some(leader)) => self.absorb(leader, a),
            (None, None) => {
                self.leaders.insert(a, a);
                self.leaders.insert(b, a);
                self.members.insert(a, [a, b].into_iter().collect());
            }
        }
    }

    fn absorb(&mut self, leader: MentionId, mention: MentionId) {
        self.leaders.insert(mention, leader);
        self.members.entry(leader).or_default().insert(mention);
    }

    /// All sets, each sorted, ordered by their smallest member.
    pub fn groups(&self) -> Vec<Vec<MentionId>> {
        let mut groups: Vec<Vec<MentionId>> = self
            .members
            .values()
            .map(|members| members.iter().copied().collect())
            .collect();
        groups.sort();
        groups
    }
}

/// Identifier of a chain.
///
/// Singletons live in their own id space so they can never collide with
/// numbered chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// A real chain, numbered from 1
    Linked(u32),
    /// A mention that corefers with nothing
    Singleton(MentionId),
}

impl ChainId {
    pub fn is_singleton(&self) -> bool {
        matches!(self, ChainId::Singleton(_))
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainId::Linked(id) => write!(f, "{}", id),
            ChainId::Singleton(mention) => write!(f, "singleton:{}", mention),
        }
    }
}

/// Coreference chains keyed by chain number, members in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefChains {
    chains: BTreeMap<u32, Vec<MentionId>>,
}

/// A mention placed in a chain, ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainGroup {
    pub chain: ChainId,
    /// Previous member of the same chain, `None` for the first one
    pub parent: Option<MentionId>,
    /// Offsets of the tokens this mention covers
    pub token_offsets: Vec<usize>,
}

impl CorefChains {
    /// Consolidate accepted `(antecedent, mention)` pairs.
    pub fn from_pairs(pairs: &[(MentionId, MentionId)]) -> Self {
        let mut sets = DisjointSets::new();
        for &(antecedent, mention) in pairs {
            sets.union(antecedent, mention);
        }
        Self::from_sets(&sets)
    }

    /// Number the sets from 1, in order of their first member.
    pub fn from_sets(sets: &DisjointSets) -> Self {
        let chains = sets
            .groups()
            .into_iter()
            .enumerate()
            .map(|(i, members)| (i as u32 + 1, members))
            .collect();
        Self { chains }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn get(&self, chain: u32) -> Option<&[MentionId]> {
        self.chains.get(&chain).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[MentionId])> + '_ {
        self.chains.iter().map(|(&id, members)| (id, members.as_slice()))
    }

    /// Chain of a mention, or a singleton id when it is in none.
    pub fn chain_of(&self, mention: MentionId) -> ChainId {
        self.chains
            .iter()
            .find(|(_, members)| members.contains(&mention))
            .map_or(ChainId::Singleton(mention), |(&id, _)| ChainId::Linked(id))
    }

    /// Place every mention into the export structure.
    ///
    /// Chain members are linked to the member before them; mentions outside
    /// every chain get a singleton id and no parent. With `heads_only` each
    /// mention covers just its head token.
    pub fn to_groups(&self, mentions: &[Unit], heads_only: bool) -> BTreeMap<MentionId, ChainGroup> {
        let token_offsets = |mention: &Unit| -> Vec<usize> {
            if heads_only {
                vec![mention.head_offset()]
            } else {
                mention.tokens().map(|token| token.offset).collect()
            }
        };

        let mut groups = BTreeMap::new();
        for (&chain, members) in &self.chains {
            for (i, &member) in members.iter().enumerate() {
                let Some(mention) = mentions.get(member) else {
                    log::warn!("chain {} refers to unknown mention {}", chain, member);
                    continue;
                };
                groups.insert(
                    member,
                    ChainGroup {
                        chain: ChainId::Linked(chain),
                        parent: i.checked_sub(1).map(|prev| members[prev]),
                        token_offsets: token_offsets(mention),
                    },
                );
            }
        }

        for (id, mention) in mentions.iter().enumerate() {
            groups.entry(id).or_insert_with(|| ChainGroup {
                chain: ChainId::Singleton(id),
                parent: None,
                token_offsets: token_offsets(mention),
            });
        }

        groups
    }
}

/// Numeric ids for an interchange format: linked chains keep their number,
/// singletons are numbered after the last linked chain in mention order.
pub fn conll_ids(groups: &BTreeMap<MentionId, ChainGroup>) -> BTreeMap<MentionId, u32> {
    let last_linked = groups
        .values()
        .filter_map(|group| match group.chain {
            ChainId::Linked(id) => Some(id),
            ChainId::Singleton(_) => None,
        })
        .max()
        .unwrap_or(0);

    let mut next_singleton = last_linked;
    groups
        .iter()
        .map(|(&mention, group)| {
            let id = match group.chain {
                ChainId::Linked(id) => id,
                ChainId::Singleton(_) => {
                    next_singleton += 1;
                    next_singleton
                }
            };
            (mention, id)
        })
        .collect()
}
