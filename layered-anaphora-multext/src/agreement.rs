//! Agreement tests and the grouping filters built on them.
//!
//! Each test compares attribute positions of two adjacent tags. Positions
//! past the end of a tag never match, so short or truncated tags simply
//! fail to agree.

use layered_anaphora::{tag_char, Agreement, AgreementFilter, PosFilter, Unit};

use crate::pos::matches;

fn at(unit: &Unit, index: usize) -> Option<char> {
    tag_char(unit.tag(), index)
}

/// Both positions exist and hold the same value.
fn same_at(left: &Unit, left_index: usize, right: &Unit, right_index: usize) -> bool {
    let value = at(left, left_index);
    value.is_some() && value == at(right, right_index)
}

fn tag_len(unit: &Unit) -> usize {
    unit.tag().chars().count()
}

/// Characters `start..end` of a tag, truncated like a string slice.
fn tag_slice(unit: &Unit, start: usize, end: usize) -> String {
    unit.tag().chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Noun with an unspecified common tag agrees with anything.
fn is_bare_noun(unit: &Unit) -> bool {
    unit.tag() == "Nc"
}

/// Adjective in positive degree agreeing in number with the noun.
fn adj_agrees(adj: &Unit, noun: &Unit) -> bool {
    is_bare_noun(noun) || (same_at(adj, 4, noun, 3) && at(adj, 2) == Some('p'))
}

/// Full passive participle agreeing in number with the noun.
fn participle_agrees(verb: &Unit, noun: &Unit) -> bool {
    verb.tag().starts_with("Vmp")
        && at(verb, 8) == Some('f')
        && (is_bare_noun(noun) || same_at(verb, 5, noun, 3))
}

/// Adjectival pronoun ("этот", "мой") agreeing in number with the noun.
fn pronoun_agrees(pronoun: &Unit, noun: &Unit) -> bool {
    tag_len(pronoun) > 6 && at(pronoun, 6) == Some('a') && same_at(pronoun, 4, noun, 3)
}

fn ordinal_agrees(quant: &Unit, noun: &Unit) -> bool {
    (at(quant, 1) == Some('o') && same_at(quant, 3, noun, 3)) || at(quant, 3) == Some('-')
}

fn is_genitive(noun_gen: &Unit) -> bool {
    tag_len(noun_gen) > 4 && at(noun_gen, 4) == Some('g')
}

fn cardinal_governs(quant: &Unit, noun_gen: &Unit) -> bool {
    at(quant, 1) == Some('c') && (is_bare_noun(noun_gen) || at(noun_gen, 4) == Some('g'))
}

/// Common noun followed by a proper noun with the same gender, number and case.
fn proper_apposition(noun: &Unit, noun_prop: &Unit) -> bool {
    (at(noun, 1) == Some('p') || at(noun_prop, 1) == Some('p'))
        && tag_len(noun) > 1
        && tag_len(noun_prop) > 1
        && tag_slice(noun, 2, 5) == tag_slice(noun_prop, 2, 5)
}

fn right_headed(left: &Unit, right: &Unit) -> Agreement {
    Agreement {
        tag: right.tag().to_string(),
        head: left.tags().len() + right.head(),
    }
}

fn adj_noun(adj: &Unit, noun: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Adjective, adj) && matches(PosFilter::Noun, noun) && adj_agrees(adj, noun))
        .then(|| right_headed(adj, noun))
}

fn vadj_noun(verb: &Unit, noun: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Verb, verb) && matches(PosFilter::Noun, noun) && participle_agrees(verb, noun))
        .then(|| right_headed(verb, noun))
}

fn pradj_noun(pronoun: &Unit, noun: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Pronoun, pronoun) && matches(PosFilter::Noun, noun) && pronoun_agrees(pronoun, noun))
        .then(|| right_headed(pronoun, noun))
}

fn quant_noun(quant: &Unit, noun: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Quantifier, quant) && matches(PosFilter::Noun, noun) && ordinal_agrees(quant, noun))
        .then(|| right_headed(quant, noun))
}

/// The numeral heads the phrase and lends it a nominal tag.
fn quant_gen(quant: &Unit, noun_gen: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Quantifier, quant)
        && matches(PosFilter::Noun, noun_gen)
        && cardinal_governs(quant, noun_gen))
    .then(|| Agreement {
        tag: format!("N{}", quant.tag().chars().skip(1).collect::<String>()),
        head: quant.head(),
    })
}

fn noun_gen(noun: &Unit, noun_gen: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Noun, noun) && matches(PosFilter::Noun, noun_gen) && is_genitive(noun_gen)).then(|| {
        Agreement {
            tag: noun.tag().to_string(),
            head: noun.head(),
        }
    })
}

fn noun_noun_prop(noun: &Unit, noun_prop: &Unit) -> Option<Agreement> {
    (matches(PosFilter::Noun, noun) && matches(PosFilter::Noun, noun_prop) && proper_apposition(noun, noun_prop))
        .then(|| right_headed(noun, noun_prop))
}

/// Grouping filters in the order they are tried.
pub(crate) const AGREEMENT_FILTERS: &[AgreementFilter] = &[
    AgreementFilter { name: "adjNoun", test: adj_noun },
    AgreementFilter { name: "vadjNoun", test: vadj_noun },
    AgreementFilter { name: "pradjNoun", test: pradj_noun },
    AgreementFilter { name: "quantNoun", test: quant_noun },
    AgreementFilter { name: "quantGen", test: quant_gen },
    AgreementFilter { name: "nounGen", test: noun_gen },
    AgreementFilter { name: "nounNounProp", test: noun_noun_prop },
];
