#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]
//! Noun phrase grouping and coreference resolution over tagged tokens.
//!
//! The pipeline for one document:
//!
//! 1. group tagged [`Token`]s into noun phrases, either by morphological
//!    agreement ([`find_groups`]) or from a dependency parse
//!    ([`find_dependency_groups`]);
//! 2. keep the referring units as mentions ([`find_mentions`]);
//! 3. link mentions pairwise with a [`CoreferencePredicate`]
//!    ([`MentionPairResolver`]) or pick antecedents for anaphors with an
//!    [`AntecedentResolver`];
//! 4. consolidate the links into chains ([`CorefChains`]).
//!
//! All language knowledge lives behind the [`Tagset`] trait.

mod antecedent;
mod chains;
mod config;
mod dependency;
mod display;
mod errors;
mod grouping;
mod mention;
mod mention_pair;
mod tagset;
mod unit;

pub use antecedent::{
    possible_antecedents, resolve_anaphors, AgreementResolver, AntecedentResolver, CandidateWindow,
    ClassifierResolver, DummyResolver, FeatureExtractor, OffsetDistance, PairClassifier,
};
pub use chains::{conll_ids, ChainGroup, ChainId, CorefChains, DisjointSets};
pub use config::{load_toml, parse_toml};
pub use dependency::{find_dependency_groups, DependencyArc, DependencyParse};
pub use display::SpanDisplay;
pub use errors::{AnaphoraError, AnaphoraResult};
pub use grouping::{find_groups, merge_units, try_conjunction, try_group, GroupingConfig};
pub use mention::{find_mentions, is_mention};
pub use mention_pair::{
    CoreferencePredicate, MentionPairResolver, PairContext, PairDecisions, Resolution,
};
pub use tagset::{same_grammemes, tag_char, Agreement, AgreementFilter, PosFilter, Tagset};
pub use unit::{Group, GroupKind, IterGroups, MentionId, Token, Unit};
