//! Part-of-speech classes by tag prefix.
//!
//! MULTEXT-East tags are positional: the first character is the category
//! (`N` noun, `A` adjective, `V` verb, `P` pronoun, `M` numeral, `S`
//! adposition, `C` conjunction, `Q` particle, `I` interjection) and the
//! remaining characters are that category's attributes.

use layered_anaphora::{PosFilter, Unit};

use crate::pronouns::is_coref_pronoun_form;

/// Pronoun tag with every attribute unset, used for non-referring forms.
const BARE_PRONOUN_TAG: &str = "P-----r";

/// Judged by the head word, so a pronoun heading a longer phrase still counts.
fn head_form_is_coref_pronoun(unit: &Unit) -> bool {
    unit.head_token()
        .wordform
        .first()
        .map_or(false, |form| is_coref_pronoun_form(form))
}

pub fn matches(filter: PosFilter, unit: &Unit) -> bool {
    let tag = unit.tag();
    match filter {
        // possessive pronouns behave like nouns
        PosFilter::Noun => tag.starts_with('N') || tag.starts_with("PP"),
        PosFilter::Adjective => tag.starts_with('A'),
        PosFilter::ProperNoun => tag.starts_with("Np"),
        PosFilter::Pronoun => tag.starts_with('P') && tag != BARE_PRONOUN_TAG,
        PosFilter::ReferringPronoun => tag.starts_with('P') && head_form_is_coref_pronoun(unit),
        PosFilter::Comma => tag.starts_with(','),
        PosFilter::Preposition => tag.starts_with('S'),
        PosFilter::InsideQuote => tag.starts_with("Fra") || tag.starts_with("QuO"),
        PosFilter::CloseQuote => tag.starts_with("Frc"),
        PosFilter::Conjunction => tag.starts_with('C'),
        PosFilter::Quantifier => tag.starts_with('M'),
        PosFilter::Verb => tag.starts_with('V'),
        PosFilter::Interjection => tag.starts_with('I'),
        PosFilter::Punctuation => {
            tag == "SENT" || tag.chars().next().map_or(false, |c| !c.is_alphabetic())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_anaphora::Token;

    fn unit(form: &str, tag: &str) -> Unit {
        Token::new(form, form, tag, 0, form.chars().count()).into()
    }

    #[test]
    fn test_possessive_counts_as_noun() {
        assert!(matches(PosFilter::Noun, &unit("дом", "Ncmsnn")));
        assert!(matches(PosFilter::Noun, &unit("его", "PP")));
        assert!(!matches(PosFilter::Noun, &unit("он", "Pp3msnn")));
    }

    #[test]
    fn test_pronoun_classes() {
        let he = unit("Он", "Pp3msnn");
        assert!(matches(PosFilter::Pronoun, &he));
        assert!(matches(PosFilter::ReferringPronoun, &he));

        let we = unit("мы", "Pp1-pnn");
        assert!(matches(PosFilter::Pronoun, &we));
        assert!(!matches(PosFilter::ReferringPronoun, &we));

        assert!(!matches(PosFilter::Pronoun, &unit("что", "P-----r")));
    }

    #[test]
    fn test_punctuation() {
        assert!(matches(PosFilter::Punctuation, &unit(".", "SENT")));
        assert!(matches(PosFilter::Punctuation, &unit(",", ",")));
        assert!(!matches(PosFilter::Punctuation, &unit("и", "C")));
        assert!(!matches(PosFilter::Punctuation, &unit("", "")));
    }
}
