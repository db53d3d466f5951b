//! Mention extraction.

use crate::tagset::Tagset;
use crate::unit::Unit;

/// Whether a unit is a candidate referring expression: a noun (proper or
/// common) or a pronoun from the tagset's referring list.
pub fn is_mention<T: Tagset + ?Sized>(unit: &Unit, tagset: &T) -> bool {
    tagset.is_noun(unit) || tagset.is_referring_pronoun(unit)
}

/// Filter units down to mentions, keeping document order.
pub fn find_mentions<T: Tagset + ?Sized>(units: &[Unit], tagset: &T) -> Vec<Unit> {
    units.iter().filter(|unit| is_mention(unit, tagset)).cloned().collect()
}
