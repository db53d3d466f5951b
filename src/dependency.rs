//! Noun phrase extraction from a dependency parse.
//!
//! Each token that can head a noun phrase collects its transitive
//! dependents. A dependent whose relation the tagset rejects is cut off
//! together with its whole subtree:
//!
//! ```text
//! дом   на   берегу   стоял
//! ╰N    ╰S   ╰N       ╰V
//! ╰───────────────╯ Dependency(head=0)
//!            ╰────╯ Dependency(head=0)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::tagset::Tagset;
use crate::unit::{Group, GroupKind, Token, Unit};

/// Head and relation of a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyArc {
    /// 0-based index of the head token
    pub head: usize,
    pub relation: String,
}

/// A dependency parse over a token sequence, one optional arc per token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyParse {
    arcs: Vec<Option<DependencyArc>>,
}

impl DependencyParse {
    pub fn new(arcs: Vec<Option<DependencyArc>>) -> Self {
        Self { arcs }
    }

    /// Build from parser output where heads are 1-based and `0` marks the root.
    pub fn from_conll<S: AsRef<str>>(pairs: &[(usize, S)]) -> Self {
        let arcs = pairs
            .iter()
            .map(|(head, relation)| {
                head.checked_sub(1).map(|head| DependencyArc {
                    head,
                    relation: relation.as_ref().to_string(),
                })
            })
            .collect();
        Self { arcs }
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn arc(&self, token: usize) -> Option<&DependencyArc> {
        self.arcs.get(token).and_then(Option::as_ref)
    }

    /// Map from each head index to its `(child, relation)` pairs.
    pub fn children(&self) -> BTreeMap<usize, Vec<(usize, &str)>> {
        let mut children: BTreeMap<usize, Vec<(usize, &str)>> = BTreeMap::new();
        for (child, arc) in self.arcs.iter().enumerate() {
            if let Some(arc) = arc {
                children.entry(arc.head).or_default().push((child, arc.relation.as_str()));
            }
        }
        children
    }
}

fn collect_dependents<T: Tagset + ?Sized>(
    head: usize,
    units: &[Unit],
    children: &BTreeMap<usize, Vec<(usize, &str)>>,
    tagset: &T,
    collected: &mut BTreeSet<usize>,
) {
    let Some(dependents) = children.get(&head) else {
        return;
    };
    for &(child, relation) in dependents {
        if child >= units.len() || collected.contains(&child) {
            continue;
        }
        if !tagset.is_np_dependency(&units[head], &units[child], relation) {
            continue;
        }
        collected.insert(child);
        collect_dependents(child, units, children, tagset, collected);
    }
}

/// One noun phrase group per token the tagset accepts as an NP head.
///
/// Groups may overlap or nest when one head is a dependent of another.
/// Trailing punctuation dependents are left out.
pub fn find_dependency_groups<T: Tagset + ?Sized>(
    tokens: &[Token],
    parse: &DependencyParse,
    tagset: &T,
) -> Vec<Unit> {
    let units: Vec<Unit> = tokens.iter().cloned().map(Unit::Word).collect();
    let children = parse.children();
    let mut groups = Vec::new();

    for (head, unit) in units.iter().enumerate() {
        if !tagset.is_np_head(unit) {
            continue;
        }

        let mut collected = BTreeSet::new();
        collected.insert(head);
        collect_dependents(head, &units, &children, tagset, &mut collected);

        let mut indices: Vec<usize> = collected.into_iter().collect();
        while let Some(&last) = indices.last() {
            if last != head && tagset.is_punctuation(&units[last]) {
                indices.pop();
            } else {
                break;
            }
        }

        let head_position = indices.iter().position(|&i| i == head).unwrap_or(0);
        let words: Vec<Unit> = indices.iter().map(|&i| units[i].clone()).collect();
        if let Some(group) = Group::new(GroupKind::Dependency, words, head_position, unit.tag()) {
            log::trace!("dependency group headed by {}: {} tokens", unit, group.words().len());
            groups.push(Unit::Group(group));
        }
    }

    log::debug!("{} dependency groups from {} tokens", groups.len(), tokens.len());
    groups
}
