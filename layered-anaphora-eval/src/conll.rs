//! CoNLL-2012 coreference export.
//!
//! One line per token with the document name, the document position and a
//! coreference column. A mention opens with `(<chain>` on its first token
//! and closes with `<chain>)` on its last; a one-token mention is written
//! `(<chain>)`. Several marks on one token are joined with `|`, a token
//! without marks gets `-`. Sentence-final tokens are followed by a blank
//! line.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use std::fs;
use std::path::Path;

use layered_anaphora::{conll_ids, ChainGroup, CoreferencePredicate, MentionId, MentionPairResolver, Tagset};

use crate::corpus::{Corpus, ErrorKind};
use crate::errors::{EvalError, EvalResult};
use crate::gold::GoldStandard;

/// A span to export and the chain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportGroup {
    pub chain: u32,
    pub token_offsets: Vec<usize>,
}

/// Export groups for a resolved document, singletons numbered after the
/// last linked chain.
pub fn system_groups(groups: &BTreeMap<MentionId, ChainGroup>) -> Vec<ExportGroup> {
    let ids = conll_ids(groups);
    groups
        .iter()
        .map(|(mention, group)| ExportGroup {
            chain: ids[mention],
            token_offsets: group.token_offsets.clone(),
        })
        .collect()
}

/// Export groups for a gold standard, in group id order.
///
/// Groups that belong to no chain have nothing to be scored against and
/// are left out.
pub fn gold_groups(gold: &GoldStandard) -> Vec<ExportGroup> {
    let chains = gold.chain_index();
    gold.groups
        .iter()
        .filter_map(|(id, group)| {
            let chain = chains.get(id).copied();
            if chain.is_none() {
                log::debug!("gold group {} is in no chain", id);
            }
            chain.map(|chain| ExportGroup {
                chain,
                token_offsets: group.token_offsets.clone(),
            })
        })
        .collect()
}

impl<T: Tagset> Corpus<T> {
    /// Resolve every document and turn the chains into export groups.
    pub fn export_groups<P: CoreferencePredicate>(
        &self,
        resolver: &MentionPairResolver<P>,
        heads_only: bool,
    ) -> Vec<Vec<ExportGroup>> {
        (0..self.len())
            .map(|doc| {
                self.resolve(doc, resolver, heads_only)
                    .map(|resolution| system_groups(&resolution.groups))
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Write the whole corpus to `path`.
    ///
    /// Without `system` groups the gold standard is written. Groups whose
    /// token offsets repeat an earlier group are written once; groups with
    /// offsets that are not token offsets are skipped and counted as
    /// [`ErrorKind::Export`].
    pub fn export_conll(&mut self, path: &Path, system: Option<&[Vec<ExportGroup>]>) -> EvalResult<()> {
        self.create_indices();

        let mut content = String::new();
        let mut skipped = 0;
        for doc in 0..self.len() {
            let gold;
            let groups: &[ExportGroup] = match system {
                Some(system) => system.get(doc).map_or(&[][..], Vec::as_slice),
                None => {
                    gold = self.documents()[doc].gold.as_ref().map(gold_groups).unwrap_or_default();
                    &gold
                }
            };
            skipped += self.write_conll_document(&mut content, doc, groups);
        }

        if skipped > 0 {
            log::warn!("{} groups could not be exported to {}", skipped, path.display());
        }
        self.errors.record(ErrorKind::Export, skipped);

        fs::write(path, content).map_err(|e| EvalError::io(path, e))
    }

    /// Append one document and return how many groups were skipped.
    fn write_conll_document(&self, out: &mut String, doc: usize, groups: &[ExportGroup]) -> usize {
        let (Some(document), Some(index)) = (self.document(doc), self.index(doc)) else {
            return 0;
        };

        let mut marks: Vec<Vec<String>> = vec![Vec::new(); document.tokens.len()];
        let mut seen: HashSet<&[usize]> = HashSet::new();
        let mut skipped = 0;

        for group in groups {
            if !seen.insert(&group.token_offsets) {
                continue;
            }
            let positions: Option<Vec<usize>> = group
                .token_offsets
                .iter()
                .map(|offset| index.words.get(offset).copied())
                .collect();
            let (first, last) = match positions.as_deref() {
                Some([first, .., last]) => (*first, *last),
                Some([only]) => (*only, *only),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            if first == last {
                marks[first].push(format!("({})", group.chain));
            } else {
                marks[first].push(format!("({}", group.chain));
                marks[last].push(format!("{})", group.chain));
            }
        }

        let name = format!("Doc{}", document.id);
        let _ = writeln!(out, "#begin document ({});", name);
        for (token, token_marks) in document.tokens.iter().zip(&marks) {
            let mark = if token_marks.is_empty() {
                "-".to_string()
            } else {
                token_marks.join("|")
            };
            let _ = writeln!(out, "{}\t{}\t{}", name, doc, mark);
            if self.tagset().is_sentence_end_tag(&token.tag) {
                out.push('\n');
            }
        }
        out.push_str("#end document\n");

        skipped
    }
}
