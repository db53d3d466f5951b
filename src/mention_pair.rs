//! Mention-pair coreference resolution.
//!
//! Every mention, from the second one on, looks back over the mentions
//! before it, nearest first, and asks a [`CoreferencePredicate`] whether
//! each candidate is its antecedent. The first accepted candidate wins.
//!
//! Once a mention has been linked, either as an antecedent or as a resolved
//! anaphor, it is no longer offered as a candidate. Decisions are greedy
//! and made in document order; nothing is revisited.

use std::collections::{BTreeMap, HashSet};

use crate::chains::{ChainGroup, CorefChains};
use crate::dependency::DependencyParse;
use crate::unit::{MentionId, Unit};

/// What a predicate may look at when judging a pair.
#[derive(Debug, Clone, Copy)]
pub struct PairContext<'a> {
    /// Mentions in document order; pair members index into this
    pub mentions: &'a [Unit],
    /// All units of the document
    pub words: &'a [Unit],
    pub parse: Option<&'a DependencyParse>,
}

impl<'a> PairContext<'a> {
    pub fn new(mentions: &'a [Unit], words: &'a [Unit]) -> Self {
        Self {
            mentions,
            words,
            parse: None,
        }
    }

    pub fn with_parse(mut self, parse: &'a DependencyParse) -> Self {
        self.parse = Some(parse);
        self
    }
}

/// Decides whether `(antecedent, mention)` corefer.
pub trait CoreferencePredicate {
    fn pair_coreferent(&self, pair: (MentionId, MentionId), context: &PairContext<'_>) -> bool;
}

impl<F> CoreferencePredicate for F
where
    F: Fn((MentionId, MentionId), &PairContext<'_>) -> bool,
{
    fn pair_coreferent(&self, pair: (MentionId, MentionId), context: &PairContext<'_>) -> bool {
        self(pair, context)
    }
}

/// Accepted and rejected pairs, in the order they were decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairDecisions {
    pub accepted: Vec<(MentionId, MentionId)>,
    pub discarded: Vec<(MentionId, MentionId)>,
}

/// Output of a full resolution run over one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub decisions: PairDecisions,
    pub chains: CorefChains,
    /// Every mention placed in its chain (or as a singleton)
    pub groups: BTreeMap<MentionId, ChainGroup>,
}

pub struct MentionPairResolver<P> {
    predicate: P,
}

impl<P: CoreferencePredicate> MentionPairResolver<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    pub fn find_coreferent_pairs(&self, context: &PairContext<'_>) -> PairDecisions {
        let mut decisions = PairDecisions::default();
        let mut linked: HashSet<MentionId> = HashSet::new();

        for mention in 1..context.mentions.len() {
            for antecedent in (0..mention).rev() {
                if linked.contains(&antecedent) {
                    continue;
                }
                let pair = (antecedent, mention);
                if self.predicate.pair_coreferent(pair, context) {
                    log::trace!("accepted pair {:?}", pair);
                    decisions.accepted.push(pair);
                    linked.insert(antecedent);
                    linked.insert(mention);
                    break;
                }
                decisions.discarded.push(pair);
            }
        }

        log::debug!(
            "{} mentions: {} pairs accepted, {} discarded",
            context.mentions.len(),
            decisions.accepted.len(),
            decisions.discarded.len()
        );
        decisions
    }

    /// Find pairs, consolidate them into chains and place every mention.
    pub fn resolve(&self, context: &PairContext<'_>, heads_only: bool) -> Resolution {
        let decisions = self.find_coreferent_pairs(context);
        let chains = CorefChains::from_pairs(&decisions.accepted);
        let groups = chains.to_groups(context.mentions, heads_only);
        log::info!("resolved {} chains over {} mentions", chains.len(), context.mentions.len());

        Resolution {
            decisions,
            chains,
            groups,
        }
    }
}
