//! Closed pronoun lists.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Word forms of pronouns that can take part in a coreference chain:
/// personal, relative "который", reflexive and possessive "свой".
const COREF_PRONOUNS: &[&str] = &[
    // Personal
    "я", "он", "она", "оно", "они",
    "его", "ее", "её", "ей", "ему", "ею", "им", "ими", "их",
    // Personal after prepositions
    "него", "нее", "неё", "ней", "нем", "нём", "нему", "нею", "ним", "ними", "них",
    // Relative
    "который", "которая", "которое", "которые",
    "которого", "которой", "котором", "которому", "которую", "которым", "которыми", "которых",
    // Possessive reflexive
    "свой", "своя", "свое", "своё", "свои",
    "своего", "своей", "своем", "своём", "своему", "своею", "своим", "своими", "своих", "свою",
    // Reflexive
    "себе", "себя", "собой", "собою",
];

/// Lemmas of third-person and reflexive pronouns treated as anaphors.
const ANAPHOR_LEMMAS: &[&str] = &["он", "она", "оно", "они", "его", "ее", "её", "их", "себя", "свой"];

static COREF_PRONOUN_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| COREF_PRONOUNS.iter().copied().collect());

static ANAPHOR_LEMMA_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| ANAPHOR_LEMMAS.iter().copied().collect());

/// Case-insensitive membership in the coreferring pronoun list.
pub fn is_coref_pronoun_form(wordform: &str) -> bool {
    COREF_PRONOUN_SET.contains(wordform.to_lowercase().as_str())
}

pub fn is_anaphor_lemma(lemma: &str) -> bool {
    ANAPHOR_LEMMA_SET.contains(lemma.to_lowercase().as_str())
}
