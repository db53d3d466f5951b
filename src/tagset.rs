//! The tagset capability consumed by grouping and resolution.
//!
//! A tagset knows how to read its own tag strings. Everything here is a
//! pure function of immutable tags; nothing fails. A tag that is too short
//! for a queried position simply does not match, and a feature lookup on
//! such a tag yields `None` ("not applicable"), which is distinct from the
//! explicit `-` marker some tagsets use for "no value".

use crate::unit::Unit;

/// Closed set of part-of-speech classes a tagset must recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosFilter {
    Noun,
    Adjective,
    ProperNoun,
    Pronoun,
    /// Pronoun from the closed list of pronouns that can corefer
    ReferringPronoun,
    Comma,
    Preposition,
    InsideQuote,
    CloseQuote,
    Conjunction,
    Quantifier,
    Verb,
    Interjection,
    Punctuation,
}

/// Result of a successful agreement test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    /// Tag of the merged phrase
    pub tag: String,
    /// Head index among the leaf tags of the merged phrase
    pub head: usize,
}

/// A named agreement test over an adjacent pair.
#[derive(Clone, Copy)]
pub struct AgreementFilter {
    pub name: &'static str,
    pub test: fn(&Unit, &Unit) -> Option<Agreement>,
}

impl AgreementFilter {
    pub fn apply(&self, left: &Unit, right: &Unit) -> Option<Agreement> {
        (self.test)(left, right)
    }
}

impl std::fmt::Debug for AgreementFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementFilter").field("name", &self.name).finish()
    }
}

pub trait Tagset {
    /// Whether `unit` belongs to the given class.
    fn matches(&self, filter: PosFilter, unit: &Unit) -> bool;

    /// Agreement filters in priority order. The first one that matches wins.
    fn agreement_filters(&self) -> &[AgreementFilter];

    /// Tag for `left conj right` when it forms a coordinated noun phrase.
    fn np_conjunction(&self, left: &Unit, conj: &Unit, right: &Unit) -> Option<String>;

    /// Value of a named morphological feature, `None` when unknown.
    fn feature(&self, name: &str, unit: &Unit) -> Option<char>;

    /// Whether `child` attached to `head` by `relation` belongs in the
    /// head's noun phrase.
    fn is_np_dependency(&self, head: &Unit, child: &Unit, relation: &str) -> bool;

    /// Whether `unit` can head a noun phrase.
    fn is_np_head(&self, unit: &Unit) -> bool;

    /// Whether `unit` is an anaphor that needs an antecedent.
    fn is_anaphor(&self, unit: &Unit) -> bool {
        self.is_referring_pronoun(unit)
    }

    /// Whether a word tagged `tag` closes a sentence.
    fn is_sentence_end_tag(&self, tag: &str) -> bool {
        tag == "SENT"
    }

    fn is_sentence_end(&self, unit: &Unit) -> bool {
        self.is_sentence_end_tag(unit.tag())
    }

    fn is_noun(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Noun, unit)
    }

    fn is_pronoun(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Pronoun, unit)
    }

    fn is_referring_pronoun(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::ReferringPronoun, unit)
    }

    fn is_conjunction(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Conjunction, unit)
    }

    fn is_comma(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Comma, unit)
    }

    fn is_verb(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Verb, unit)
    }

    fn is_punctuation(&self, unit: &Unit) -> bool {
        self.matches(PosFilter::Punctuation, unit)
    }
}

impl<T: Tagset + ?Sized> Tagset for &T {
    fn matches(&self, filter: PosFilter, unit: &Unit) -> bool {
        (**self).matches(filter, unit)
    }

    fn agreement_filters(&self) -> &[AgreementFilter] {
        (**self).agreement_filters()
    }

    fn np_conjunction(&self, left: &Unit, conj: &Unit, right: &Unit) -> Option<String> {
        (**self).np_conjunction(left, conj, right)
    }

    fn feature(&self, name: &str, unit: &Unit) -> Option<char> {
        (**self).feature(name, unit)
    }

    fn is_np_dependency(&self, head: &Unit, child: &Unit, relation: &str) -> bool {
        (**self).is_np_dependency(head, child, relation)
    }

    fn is_np_head(&self, unit: &Unit) -> bool {
        (**self).is_np_head(unit)
    }

    fn is_anaphor(&self, unit: &Unit) -> bool {
        (**self).is_anaphor(unit)
    }

    fn is_sentence_end_tag(&self, tag: &str) -> bool {
        (**self).is_sentence_end_tag(tag)
    }

    fn is_sentence_end(&self, unit: &Unit) -> bool {
        (**self).is_sentence_end(unit)
    }
}

/// Whether all `units` share the same value of `feature`.
///
/// One unknown value and one `-` value are discarded before comparing, so
/// a single unknown or unmarked unit does not break agreement. Only the
/// first occurrence of each is dropped.
pub fn same_grammemes<T: Tagset + ?Sized>(tagset: &T, feature: &str, units: &[&Unit]) -> bool {
    let mut values: Vec<Option<char>> = units.iter().map(|u| tagset.feature(feature, u)).collect();

    if let Some(pos) = values.iter().position(Option::is_none) {
        values.remove(pos);
    }
    if let Some(pos) = values.iter().position(|v| *v == Some('-')) {
        values.remove(pos);
    }

    values.sort();
    values.dedup();
    values.len() == 1
}

/// Character of a tag at a position, `None` past the end.
pub fn tag_char(tag: &str, index: usize) -> Option<char> {
    tag.chars().nth(index)
}


#[cfg(test)]
mod tests {
    use super::test_tagset::TestTagset;
    use super::*;
    use crate::unit::Token;

    fn unit(tag: &str) -> Unit {
        Token::new("x", "x", tag, 0, 1).into()
    }

    #[test]
    fn sentence_end_follows_the_tag() {
        let tagset = TestTagset::new();
        assert!(tagset.is_sentence_end_tag("SENT"));
        assert!(!tagset.is_sentence_end_tag(","));
        assert!(tagset.is_sentence_end(&unit("SENT")));
    }

    #[test]
    fn same_grammemes_compares_known_values() {
        let tagset = TestTagset::new();
        let (a, b) = (unit("Nfs"), unit("Afs"));
        assert!(same_grammemes(&tagset, "gender", &[&a, &b]));

        let c = unit("Nms");
        assert!(!same_grammemes(&tagset, "gender", &[&a, &c]));
    }

    #[test]
    fn same_grammemes_tolerates_one_unknown_or_unmarked() {
        let tagset = TestTagset::new();
        let known = unit("Nfs");
        let short = unit("N");
        let unmarked = unit("N-s");
        assert!(same_grammemes(&tagset, "gender", &[&known, &short]));
        assert!(same_grammemes(&tagset, "gender", &[&known, &unmarked]));
        assert!(same_grammemes(&tagset, "gender", &[&short, &short]));
        // Both placeholders are dropped, nothing is left to agree.
        assert!(!same_grammemes(&tagset, "gender", &[&short, &unmarked]));
    }

    #[test]
    fn short_tags_never_panic() {
        let tagset = TestTagset::new();
        let empty = unit("");
        assert_eq!(tagset.feature("number", &empty), None);
        assert_eq!(tag_char("A", 5), None);
        assert!(tagset.is_punctuation(&empty));
    }
}
