//! BRAT standoff export for manual review.
//!
//! Each document becomes `<n>.txt` with the text rebuilt from token
//! offsets and `<n>.ann` with:
//!
//! * `T` records: every mention as `NP`, then every gold group as
//!   `DiscNew` (first in its chain) or `DiscOld`;
//! * `A` records: gold group attributes, `?` for unknown values;
//! * `R` records: `Coreference` from a gold group to its parent.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use layered_anaphora::{Tagset, Token, Unit};

use crate::corpus::{Corpus, DocumentIndex, ErrorKind};
use crate::errors::{EvalError, EvalResult};
use crate::gold::{GoldGroup, GoldGroupId};

/// Rebuild the text covered by `tokens`.
///
/// Gaps shorter than three characters are spaces; longer gaps were most
/// likely paragraph breaks and start with a newline.
pub fn reconstruct_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut cursor = 0;
    for token in tokens {
        let gap = token.offset.saturating_sub(cursor);
        if gap < 3 {
            text.extend(std::iter::repeat(' ').take(gap));
        } else {
            text.push('\n');
            text.extend(std::iter::repeat(' ').take(gap - 1));
        }
        text.push_str(&token.wordform.join(" "));
        cursor = token.offset + token.length;
    }
    text
}

/// Surface text of a mention.
///
/// Some source words were split into several tokens without spaces
/// between them; when spaced text would overrun the mention, the parts
/// are glued back together.
fn mention_text(mention: &Unit) -> String {
    let spaced = mention.wordform().join(" ");
    if spaced.chars().count() > mention.length() {
        mention.wordform().concat()
    } else {
        spaced
    }
}

/// Surface text of a gold group, spaced by its token offsets.
fn gold_group_text(group: &GoldGroup, tokens: &[Token], index: &DocumentIndex) -> Option<String> {
    let words: Vec<&str> = group
        .token_offsets
        .iter()
        .map(|offset| {
            let token = tokens.get(*index.words.get(offset)?)?;
            token.wordform.first().map(String::as_str)
        })
        .collect::<Option<_>>()?;

    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        text.push_str(word);
        if let Some(next) = group.token_offsets.get(i + 1) {
            let gap = next.saturating_sub(group.token_offsets[i] + word.chars().count());
            text.extend(std::iter::repeat(' ').take(gap));
        }
    }
    Some(text)
}

impl<T: Tagset> Corpus<T> {
    /// Write `<n>.txt` and `<n>.ann` for every document into `path`,
    /// creating the directory if needed.
    ///
    /// Gold groups whose tokens are unknown and relations to groups that
    /// were not written are skipped and counted as [`ErrorKind::Export`].
    pub fn export_brat(&mut self, path: &Path) -> EvalResult<()> {
        if path.exists() && !path.is_dir() {
            return Err(EvalError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        fs::create_dir_all(path).map_err(|e| EvalError::io(path, e))?;

        self.create_indices();

        let mut skipped = 0;
        for doc in 0..self.len() {
            let text = reconstruct_text(&self.documents()[doc].tokens);
            let text_path = path.join(format!("{}.txt", doc));
            fs::write(&text_path, text).map_err(|e| EvalError::io(&text_path, e))?;

            let (annotations, doc_skipped) = self.brat_annotations(doc);
            skipped += doc_skipped;
            let ann_path = path.join(format!("{}.ann", doc));
            fs::write(&ann_path, annotations).map_err(|e| EvalError::io(&ann_path, e))?;
        }

        if skipped > 0 {
            log::warn!("{} BRAT records could not be exported", skipped);
        }
        self.errors.record(ErrorKind::Export, skipped);
        Ok(())
    }

    /// The `.ann` content of one document and the number of skipped records.
    pub fn brat_annotations(&self, doc: usize) -> (String, usize) {
        let mut out = String::new();
        let mut skipped = 0;
        let mentions = self.mentions(doc);

        for (i, mention) in mentions.iter().enumerate() {
            let _ = writeln!(
                out,
                "T{}\tNP {} {}\t{}",
                i,
                mention.offset(),
                mention.end(),
                mention_text(mention)
            );
        }

        let (Some(document), Some(index)) = (self.document(doc), self.index(doc)) else {
            return (out, skipped);
        };
        let Some(gold) = &document.gold else {
            return (out, skipped);
        };

        let mut annotation_ids: BTreeMap<GoldGroupId, usize> = BTreeMap::new();
        let mut relations = Vec::new();
        let mut attribute_id = 0;

        for (i, (&id, group)) in gold.groups.iter().enumerate() {
            let annotation_id = i + mentions.len();
            if let Some(parent) = group.parent {
                relations.push((id, parent));
            }

            let (Some(start), Some(text)) = (group.start(), gold_group_text(group, &document.tokens, index)) else {
                log::warn!("document {}: gold group {} has unknown tokens", document.id, id);
                skipped += 1;
                continue;
            };
            let kind = if group.parent.is_none() { "DiscNew" } else { "DiscOld" };
            let _ = writeln!(
                out,
                "T{}\t{} {} {}\t{}",
                annotation_id,
                kind,
                start,
                start + group.length,
                text
            );

            for (name, value) in &group.attributes {
                let value = if value.is_empty() { "?" } else { value.as_str() };
                let _ = writeln!(out, "A{}\t{} T{} {}", attribute_id, name, annotation_id, value);
                attribute_id += 1;
            }
            annotation_ids.insert(id, annotation_id);
        }

        for (i, (group, parent)) in relations.iter().enumerate() {
            match (annotation_ids.get(group), annotation_ids.get(parent)) {
                (Some(arg1), Some(arg2)) => {
                    let _ = writeln!(out, "R{}\tCoreference Arg1:T{} Arg2:T{}", i, arg1, arg2);
                }
                _ => skipped += 1,
            }
        }

        (out, skipped)
    }
}
