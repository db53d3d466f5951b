use layered_anaphora::{tag_char, AgreementFilter, PosFilter, Tagset, Unit};

use crate::agreement::AGREEMENT_FILTERS;
use crate::pos;
use crate::pronouns::is_anaphor_lemma;

/// Attribute names per category, in tag position order starting at 1.
const FEATURES: &[(char, &[&str])] = &[
    ('N', &["proper", "gender", "number", "case", "animate", "case2"]),
    (
        'V',
        &[
            "aux",
            "vform",
            "tense",
            "person",
            "number",
            "gender",
            "voice",
            "definiteness",
            "aspect",
            "case",
        ],
    ),
    ('A', &["type", "degree", "gender", "number", "case", "definiteness"]),
    ('P', &["type", "person", "gender", "number", "case", "synt_type", "animate"]),
];

/// Dependency relations of the SynTagRus scheme that never join a noun phrase
/// when they attach a conjunction.
const COMPARATIVE_RELATIONS: &[&str] = &["сравнит", "примыкат"];
const RESTRICTIVE_RELATION: &str = "огранич";
const PREDICATIVE_RELATION: &str = "предик";

/// The MULTEXT-East morphosyntactic tagset for Russian.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultextTagset;

impl MultextTagset {
    pub fn new() -> Self {
        Self
    }

    /// Tag position of a named attribute for the tag's category.
    pub fn feature_index(tag: &str, name: &str) -> Option<usize> {
        let category = tag.chars().next()?;
        let (_, names) = FEATURES.iter().find(|(c, _)| *c == category)?;
        names.iter().position(|n| *n == name).map(|i| i + 1)
    }
}

impl Tagset for MultextTagset {
    fn matches(&self, filter: PosFilter, unit: &Unit) -> bool {
        pos::matches(filter, unit)
    }

    fn agreement_filters(&self) -> &[AgreementFilter] {
        AGREEMENT_FILTERS
    }

    /// `N<type>-p<case><animate><case2>`, taken from the left conjunct.
    fn np_conjunction(&self, left: &Unit, conj: &Unit, right: &Unit) -> Option<String> {
        if !(self.is_noun(left) && self.is_noun(right) && (self.is_conjunction(conj) || self.is_comma(conj))) {
            return None;
        }
        let tag = left.tag();
        let mut result = format!(
            "N{}-p{}{}",
            tag_char(tag, 1)?,
            tag_char(tag, 4)?,
            tag_char(tag, 5)?
        );
        if let Some(case2) = tag_char(tag, 6) {
            result.push(case2);
        }
        Some(result)
    }

    fn feature(&self, name: &str, unit: &Unit) -> Option<char> {
        let tag = unit.tag();
        Self::feature_index(tag, name).and_then(|index| tag_char(tag, index))
    }

    fn is_np_dependency(&self, head: &Unit, child: &Unit, relation: &str) -> bool {
        // participles
        if self.is_verb(child) {
            return false;
        }
        if self.matches(PosFilter::Interjection, head) || self.matches(PosFilter::Interjection, child) {
            return false;
        }
        if self.is_conjunction(child) && COMPARATIVE_RELATIONS.contains(&relation) {
            return false;
        }
        if child.tag() == "Q" && relation == RESTRICTIVE_RELATION {
            return false;
        }
        relation != PREDICATIVE_RELATION
    }

    fn is_np_head(&self, unit: &Unit) -> bool {
        unit.tag().starts_with('N') || self.is_referring_pronoun(unit)
    }

    /// Third-person and reflexive pronouns, judged by the lemma of the head word.
    fn is_anaphor(&self, unit: &Unit) -> bool {
        unit.head_token()
            .lemma
            .first()
            .map_or(false, |lemma| is_anaphor_lemma(lemma))
    }
}
