//! Agreement-based noun phrase grouping.
//!
//! Adjacent units are merged bottom-up whenever one of the tagset's
//! agreement filters accepts them:
//!
//! ```text
//! старый  друг  отца  пришёл
//! ╰A      ╰N    ╰N    ╰V
//! ╰───────────╯ adjNoun
//! ╰─────────────────╯ nounGen
//! ```

use serde::{Deserialize, Serialize};

use crate::tagset::Tagset;
use crate::unit::{Group, GroupKind, Token, Unit};

/// Options for [`find_groups`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Also merge `NP conj NP` triples into conjunction groups once no
    /// adjacent pair agrees.
    pub conjunctions: bool,
}

fn constituents(unit: &Unit) -> Vec<Unit> {
    match unit {
        Unit::Word(_) => vec![unit.clone()],
        Unit::Group(group) => group.words().to_vec(),
    }
}

/// Merge two adjacent units using the first agreement filter that accepts them.
pub fn try_group<T: Tagset + ?Sized>(left: &Unit, right: &Unit, tagset: &T) -> Option<Group> {
    let (name, agreement) = tagset
        .agreement_filters()
        .iter()
        .find_map(|filter| filter.apply(left, right).map(|agreement| (filter.name, agreement)))?;

    if agreement.tag.is_empty() {
        return None;
    }

    let mut words = constituents(left);
    words.extend(constituents(right));

    log::trace!("{} merges {} + {}", name, left, right);
    Group::new(GroupKind::Agreement, words, agreement.head, agreement.tag)
}

/// Merge `left conj right` into a coordinated noun phrase.
///
/// The head index is the number of leaf tags in `left`, i.e. the position of
/// the conjunction itself.
pub fn try_conjunction<T: Tagset + ?Sized>(
    left: &Unit,
    conj: &Unit,
    right: &Unit,
    tagset: &T,
) -> Option<Group> {
    let tag = tagset.np_conjunction(left, conj, right)?;
    if tag.is_empty() {
        return None;
    }

    let head = left.tags().len();
    let mut words = constituents(left);
    words.extend(constituents(conj));
    words.extend(constituents(right));

    Group::new(GroupKind::Conjunction, words, head, tag)
}

/// Replace the first mergeable adjacent pair, scanning from the start.
fn merge_first_pair<T: Tagset + ?Sized>(units: &mut Vec<Unit>, tagset: &T) -> bool {
    for i in 1..units.len() {
        if let Some(group) = try_group(&units[i - 1], &units[i], tagset) {
            units.splice(i - 1..=i, std::iter::once(Unit::Group(group)));
            return true;
        }
    }
    false
}

fn merge_first_conjunction<T: Tagset + ?Sized>(units: &mut Vec<Unit>, tagset: &T) -> bool {
    for i in 2..units.len() {
        if let Some(group) = try_conjunction(&units[i - 2], &units[i - 1], &units[i], tagset) {
            units.splice(i - 2..=i, std::iter::once(Unit::Group(group)));
            return true;
        }
    }
    false
}

/// Group a token sequence into noun phrases.
///
/// Every successful merge restarts the scan from the first pair rather than
/// continuing at the merge point. This changes which pairs are tried first
/// and therefore the final bracketing, so it must stay this way.
///
/// Top-level units whose tag does not start with a letter (punctuation and
/// merges anchored on it) are dropped from the result.
pub fn find_groups<T: Tagset + ?Sized>(tokens: &[Token], tagset: &T, config: &GroupingConfig) -> Vec<Unit> {
    let units: Vec<Unit> = tokens.iter().cloned().map(Unit::Word).collect();
    merge_units(units, tagset, config)
}

/// Same as [`find_groups`], starting from units that may already be groups.
pub fn merge_units<T: Tagset + ?Sized>(mut units: Vec<Unit>, tagset: &T, config: &GroupingConfig) -> Vec<Unit> {
    let mut merges = 0usize;
    loop {
        if merge_first_pair(&mut units, tagset) {
            merges += 1;
            continue;
        }
        if config.conjunctions && merge_first_conjunction(&mut units, tagset) {
            merges += 1;
            continue;
        }
        break;
    }
    log::debug!("grouping finished after {} merges, {} units", merges, units.len());

    units
        .into_iter()
        .filter(|unit| unit.tag().chars().next().map_or(false, char::is_alphabetic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagset::test_tagset::TestTagset;

    fn tok(form: &str, tag: &str, offset: usize) -> Token {
        Token::new(form, form, tag, offset, form.chars().count())
    }

    fn forms(units: &[Unit]) -> Vec<String> {
        units.iter().map(|u| u.wordform().join(" ")).collect()
    }

    #[test]
    fn adjective_noun_pairs_merge() {
        let tagset = TestTagset::new();
        let tokens = vec![
            tok("big", "Ams", 0),
            tok("house", "Nms", 4),
            tok("stands", "V", 10),
            tok(".", ".", 16),
        ];
        let groups = find_groups(&tokens, &tagset, &GroupingConfig::default());

        assert_eq!(forms(&groups), vec!["big house", "stands"]);
        assert_eq!(groups[0].kind(), GroupKind::Agreement);
        assert_eq!(groups[0].head_offset(), 4);
        assert_eq!(groups[0].tag(), "Nms");
    }

    #[test]
    fn merged_groups_stay_flat() {
        let tagset = TestTagset::new();
        let tokens = vec![tok("old", "Afs", 0), tok("kind", "Afs", 4), tok("woman", "Nfs", 9)];
        let groups = find_groups(&tokens, &tagset, &GroupingConfig::default());

        // "kind woman" merges first, then "old" + that group.
        assert_eq!(forms(&groups), vec!["old kind woman"]);
        assert_eq!(groups[0].words().len(), 3);
        assert!(groups[0].words().iter().all(|w| !w.is_group()));
        assert_eq!(groups[0].head(), 2);
        assert_eq!(groups[0].head_offset(), 9);
    }

    #[test]
    fn disagreeing_pairs_stay_apart() {
        let tagset = TestTagset::new();
        let tokens = vec![tok("big", "Amp", 0), tok("house", "Nms", 4)];
        let groups = find_groups(&tokens, &tagset, &GroupingConfig::default());
        assert_eq!(forms(&groups), vec!["big", "house"]);
    }

    #[test]
    fn punctuation_anchored_merges_are_dropped() {
        let tagset = TestTagset::new();
        let tokens = vec![tok("dog", "Nms", 0), tok(".", ".", 3), tok(".", ".", 4)];
        let groups = find_groups(&tokens, &tagset, &GroupingConfig::default());
        assert_eq!(forms(&groups), vec!["dog"]);
    }

    #[test]
    fn grouping_reaches_a_fixed_point() {
        let tagset = TestTagset::new();
        let tokens = vec![
            tok("old", "Afs", 0),
            tok("woman", "Nfs", 4),
            tok("and", "C", 10),
            tok("young", "Ams", 14),
            tok("man", "Nms", 20),
        ];
        let config = GroupingConfig::default();
        let once = find_groups(&tokens, &tagset, &config);
        let twice = merge_units(once.clone(), &tagset, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn conjunctions_merge_when_enabled() {
        let tagset = TestTagset::new();
        let tokens = vec![tok("cat", "Nfs", 0), tok("and", "C", 4), tok("dog", "Nms", 8)];

        let plain = find_groups(&tokens, &tagset, &GroupingConfig::default());
        assert_eq!(plain.len(), 3);

        let config = GroupingConfig { conjunctions: true };
        let groups = find_groups(&tokens, &tagset, &config);
        assert_eq!(forms(&groups), vec!["cat and dog"]);
        assert_eq!(groups[0].kind(), GroupKind::Conjunction);
        assert_eq!(groups[0].head(), 1);
        assert_eq!(groups[0].tag(), "Nxp");
    }
}
