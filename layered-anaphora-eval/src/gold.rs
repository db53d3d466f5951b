//! Gold-standard coreference annotation.
//!
//! A gold standard is a set of annotated groups, each identified by an id
//! and pointing at the previous member of its chain, plus the chains
//! themselves as ordered lists of group ids.

use std::collections::{BTreeMap, HashMap};

use layered_anaphora::{CoreferencePredicate, Group, GroupKind, MentionId, PairContext, Tagset, Token, Unit};
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, DocumentIndex};

pub type GoldGroupId = u32;
pub type GoldChainId = u32;

/// One annotated noun phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldGroup {
    /// Previous group of the same chain, `None` for the first mention
    pub parent: Option<GoldGroupId>,
    /// Offsets of every token of the phrase
    pub token_offsets: Vec<usize>,
    /// Character length of the whole phrase
    pub length: usize,
    /// Annotated attributes in source order; an empty value means unknown
    pub attributes: Vec<(String, String)>,
    /// Offsets of the head tokens
    pub head_offsets: Vec<usize>,
}

impl GoldGroup {
    /// A group whose head is its full token span, until told otherwise.
    pub fn new(token_offsets: Vec<usize>, length: usize) -> Self {
        Self {
            parent: None,
            head_offsets: token_offsets.clone(),
            token_offsets,
            length,
            attributes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: GoldGroupId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_heads(mut self, head_offsets: Vec<usize>) -> Self {
        self.head_offsets = head_offsets;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn start(&self) -> Option<usize> {
        self.token_offsets.first().copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldStandard {
    pub chains: BTreeMap<GoldChainId, Vec<GoldGroupId>>,
    pub groups: BTreeMap<GoldGroupId, GoldGroup>,
}

impl GoldStandard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group to the end of a chain.
    pub fn add_group(&mut self, chain: GoldChainId, id: GoldGroupId, group: GoldGroup) {
        self.chains.entry(chain).or_default().push(id);
        self.groups.insert(id, group);
    }

    /// Chain id of every group.
    pub fn chain_index(&self) -> BTreeMap<GoldGroupId, GoldChainId> {
        self.chains
            .iter()
            .flat_map(|(&chain, members)| members.iter().map(move |&group| (group, chain)))
            .collect()
    }

    pub fn chain_members(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }
}

/// Gold groups rebuilt as units, with the gold id of each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoldMentions {
    pub mentions: Vec<Unit>,
    pub group_ids: Vec<GoldGroupId>,
}

impl<T: Tagset> Corpus<T> {
    /// Rebuild the gold groups of a document as [`GroupKind::Annotated`]
    /// units, ordered by head offsets and then by size.
    ///
    /// Needs [`Corpus::create_indices`]. Groups whose tokens or head cannot
    /// be found among the document tokens are left out.
    pub fn gold_mentions(&self, doc: usize) -> GoldMentions {
        let mut result = GoldMentions::default();
        let (Some(document), Some(index)) = (self.document(doc), self.index(doc)) else {
            return result;
        };
        let Some(gold) = &document.gold else {
            return result;
        };

        let mut ids: Vec<GoldGroupId> = gold.groups.keys().copied().collect();
        ids.sort_by(|a, b| {
            let (ga, gb) = (&gold.groups[a], &gold.groups[b]);
            ga.head_offsets
                .cmp(&gb.head_offsets)
                .then(ga.token_offsets.len().cmp(&gb.token_offsets.len()))
        });

        for id in ids {
            let group = &gold.groups[&id];
            match annotated_group(group, &document.tokens, index) {
                Some(unit) => {
                    result.mentions.push(unit);
                    result.group_ids.push(id);
                }
                None => log::warn!("document {}: gold group {} does not match the tokens", document.id, id),
            }
        }
        result
    }
}

fn annotated_group(group: &GoldGroup, tokens: &[Token], index: &DocumentIndex) -> Option<Unit> {
    let positions: Vec<usize> = group
        .token_offsets
        .iter()
        .map(|offset| index.words.get(offset).copied())
        .collect::<Option<_>>()?;
    let head_position = index.words.get(group.head_offsets.first()?)?;
    let head = positions.iter().position(|p| p == head_position)?;

    let words: Vec<Unit> = positions.iter().map(|&p| Unit::Word(tokens[p].clone())).collect();
    let tag = tokens[*head_position].tag.clone();
    Group::new(GroupKind::Annotated, words, head, tag).map(Unit::Group)
}

/// Merge predicted mentions with gold ones, both in document order.
///
/// A predicted mention that overlaps a gold mention is replaced by it; gold
/// mentions that overlap nothing predicted are dropped, and predicted
/// mentions left over after the gold list runs out are kept as they are.
pub fn predicted_with_gold_boundaries(predicted: &[Unit], gold: &[Unit]) -> Vec<Unit> {
    let mut merged = Vec::with_capacity(predicted.len());
    let (mut p, mut g) = (0, 0);

    while p < predicted.len() && g < gold.len() {
        let (pred, gs) = (&predicted[p], &gold[g]);
        if pred.end() <= gs.offset() {
            merged.push(pred.clone());
            p += 1;
        } else if pred.offset() > gs.end() {
            g += 1;
        } else {
            merged.push(gs.clone());
            p += 1;
            g += 1;
        }
    }

    merged.extend(predicted[p..].iter().cloned());
    merged
}

/// Oracle predicate: two mentions corefer when the gold groups they head
/// belong to the same gold chain.
#[derive(Debug, Clone, Default)]
pub struct GoldCoreference {
    chains: HashMap<MentionId, GoldChainId>,
}

impl GoldCoreference {
    pub fn new(index: &DocumentIndex) -> Self {
        let chains = index
            .gold_mapping
            .iter()
            .filter_map(|(group, mentions)| index.chains.get(group).map(|&chain| (mentions, chain)))
            .flat_map(|(mentions, chain)| mentions.iter().map(move |&mention| (mention, chain)))
            .collect();
        Self { chains }
    }

    pub fn chain_of(&self, mention: MentionId) -> Option<GoldChainId> {
        self.chains.get(&mention).copied()
    }
}

impl CoreferencePredicate for GoldCoreference {
    fn pair_coreferent(&self, (antecedent, mention): (MentionId, MentionId), _: &PairContext<'_>) -> bool {
        match (self.chain_of(antecedent), self.chain_of(mention)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(offset: usize, length: usize) -> Unit {
        Token::new("w", "w", "N", offset, length).into()
    }

    fn spans(units: &[Unit]) -> Vec<(usize, usize)> {
        units.iter().map(|u| (u.offset(), u.end())).collect()
    }

    #[test]
    fn test_gold_boundaries_replace_overlaps() {
        let predicted = vec![unit(0, 3), unit(10, 4), unit(30, 2), unit(40, 3)];
        let gold = vec![unit(8, 6), unit(20, 5), unit(29, 4)];

        let merged = predicted_with_gold_boundaries(&predicted, &gold);
        assert_eq!(spans(&merged), vec![(0, 3), (8, 14), (29, 33), (40, 43)]);
    }

    #[test]
    fn test_gold_boundaries_touching_spans() {
        // predicted ends exactly where gold starts
        let merged = predicted_with_gold_boundaries(&[unit(0, 5)], &[unit(5, 2)]);
        assert_eq!(spans(&merged), vec![(0, 5)]);
    }

    #[test]
    fn test_chain_index() {
        let mut gold = GoldStandard::new();
        gold.add_group(7, 1, GoldGroup::new(vec![0], 3));
        gold.add_group(7, 4, GoldGroup::new(vec![10], 2).with_parent(1));
        gold.add_group(2, 3, GoldGroup::new(vec![5], 4));

        let index = gold.chain_index();
        assert_eq!(index[&1], 7);
        assert_eq!(index[&4], 7);
        assert_eq!(index[&3], 2);
        assert_eq!(gold.chain_members(), 3);
        assert_eq!(gold.groups[&4].head_offsets, vec![10]);
    }
}
