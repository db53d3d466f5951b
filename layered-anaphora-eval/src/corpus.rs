//! Documents with gold annotation and the indices that tie them to
//! predicted mentions.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use layered_anaphora::{
    find_dependency_groups, find_groups, find_mentions, CoreferencePredicate, DependencyParse, GroupingConfig, MentionId,
    MentionPairResolver, PairContext, Resolution, Tagset, Token, Unit,
};

use crate::gold::{GoldChainId, GoldGroupId, GoldStandard};

/// One text of a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identifier carried over from the source corpus
    pub id: u32,
    pub tokens: Vec<Token>,
    pub parse: Option<DependencyParse>,
    pub gold: Option<GoldStandard>,
}

impl Document {
    pub fn new(id: u32, tokens: Vec<Token>) -> Self {
        Self {
            id,
            tokens,
            parse: None,
            gold: None,
        }
    }

    pub fn with_parse(mut self, parse: DependencyParse) -> Self {
        self.parse = Some(parse);
        self
    }

    pub fn with_gold(mut self, gold: GoldStandard) -> Self {
        self.gold = Some(gold);
        self
    }
}

/// Kinds of data inconsistency counted while indexing and exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// A gold head offset that is not the offset of any mention
    GoldMapping,
    /// A group or relation that could not be written
    Export,
}

/// Diagnostic counters; nothing here stops processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTally {
    counts: BTreeMap<ErrorKind, usize>,
}

impl ErrorTally {
    pub fn record(&mut self, kind: ErrorKind, count: usize) {
        if count > 0 {
            *self.counts.entry(kind).or_default() += count;
        }
    }

    pub fn get(&self, kind: ErrorKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, kind: ErrorKind) {
        self.counts.remove(&kind);
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Lookups for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentIndex {
    /// Token offset to token position
    pub words: HashMap<usize, usize>,
    /// Mention offset to mention id
    pub mentions: HashMap<usize, MentionId>,
    /// Head token offset to the longest group with that head
    pub heads: BTreeMap<usize, Unit>,
    /// Gold group id to gold chain id
    pub chains: BTreeMap<GoldGroupId, GoldChainId>,
    /// Gold group id to the mentions found at its head offsets
    pub gold_mapping: BTreeMap<GoldGroupId, Vec<MentionId>>,
    /// First mapped mention of each gold group, back to the group
    pub gold_index: BTreeMap<MentionId, GoldGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    pub documents: usize,
    pub gold_documents: usize,
    pub chains: usize,
    pub chain_members: usize,
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of texts: {}", self.documents)?;
        writeln!(f, "Number of GS texts: {}", self.gold_documents)?;
        writeln!(f, "Number of chains in a corpus: {}", self.chains)?;
        write!(f, "Number of words in all chains: {}", self.chain_members)
    }
}

pub(crate) fn word_units(tokens: &[Token]) -> Vec<Unit> {
    tokens.iter().cloned().map(Unit::Word).collect()
}

/// A collection of documents processed with one tagset.
pub struct Corpus<T> {
    tagset: T,
    grouping: GroupingConfig,
    documents: Vec<Document>,
    /// Present once [`Corpus::find_groups`] has run
    groups: Option<Vec<Vec<Unit>>>,
    mentions: Vec<Vec<Unit>>,
    indices: Vec<DocumentIndex>,
    pub(crate) errors: ErrorTally,
}

impl<T: Tagset> Corpus<T> {
    pub fn new(tagset: T, documents: Vec<Document>) -> Self {
        Self {
            tagset,
            grouping: GroupingConfig::default(),
            documents,
            groups: None,
            mentions: Vec::new(),
            indices: Vec::new(),
            errors: ErrorTally::default(),
        }
    }

    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn tagset(&self) -> &T {
        &self.tagset
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, doc: usize) -> Option<&Document> {
        self.documents.get(doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn groups(&self, doc: usize) -> Option<&[Unit]> {
        self.groups.as_ref()?.get(doc).map(Vec::as_slice)
    }

    /// Mentions of a document: noun phrases once groups are found, plain
    /// nouns and pronouns before that. Empty until indexed or grouped.
    pub fn mentions(&self, doc: usize) -> &[Unit] {
        self.mentions.get(doc).map_or(&[][..], Vec::as_slice)
    }

    pub fn index(&self, doc: usize) -> Option<&DocumentIndex> {
        self.indices.get(doc)
    }

    pub fn errors(&self) -> &ErrorTally {
        &self.errors
    }

    /// Group every document and keep the noun phrases as mentions.
    ///
    /// Documents with a dependency parse are grouped along it; the others
    /// by agreement.
    pub fn find_groups(&mut self) {
        let groups: Vec<Vec<Unit>> = self
            .documents
            .iter()
            .map(|doc| match &doc.parse {
                Some(parse) => find_dependency_groups(&doc.tokens, parse, &self.tagset),
                None => find_groups(&doc.tokens, &self.tagset, &self.grouping),
            })
            .collect();
        self.mentions = groups.iter().map(|units| find_mentions(units, &self.tagset)).collect();
        log::info!(
            "found {} mentions in {} documents",
            self.mentions.iter().map(Vec::len).sum::<usize>(),
            self.documents.len()
        );
        self.groups = Some(groups);
    }

    /// Rebuild every per-document index.
    ///
    /// Gold head offsets that match no mention are counted as
    /// [`ErrorKind::GoldMapping`]; the count restarts on every call.
    pub fn create_indices(&mut self) {
        if self.groups.is_none() {
            self.mentions = self
                .documents
                .iter()
                .map(|doc| find_mentions(&word_units(&doc.tokens), &self.tagset))
                .collect();
        }

        self.errors.reset(ErrorKind::GoldMapping);
        let mut indices = Vec::with_capacity(self.documents.len());

        for (i, doc) in self.documents.iter().enumerate() {
            let mut index = DocumentIndex {
                words: doc.tokens.iter().enumerate().map(|(j, t)| (t.offset, j)).collect(),
                mentions: self.mentions[i].iter().enumerate().map(|(j, m)| (m.offset(), j)).collect(),
                ..DocumentIndex::default()
            };

            if let Some(groups) = self.groups.as_ref().and_then(|groups| groups.get(i)) {
                for unit in groups.iter().flat_map(Unit::iter_groups) {
                    let longer = index
                        .heads
                        .get(&unit.head_offset())
                        .map_or(true, |known| unit.lemma().len() > known.lemma().len());
                    if longer {
                        index.heads.insert(unit.head_offset(), unit.clone());
                    }
                }
            }

            if let Some(gold) = &doc.gold {
                let mut missing = 0;
                for (&chain, members) in &gold.chains {
                    for &group_id in members {
                        index.chains.insert(group_id, chain);
                        let Some(group) = gold.groups.get(&group_id) else {
                            continue;
                        };
                        let mapped: Vec<MentionId> = group
                            .head_offsets
                            .iter()
                            .filter_map(|offset| index.mentions.get(offset).copied())
                            .collect();
                        missing += group.head_offsets.len() - mapped.len();
                        if !mapped.is_empty() {
                            index.gold_mapping.insert(group_id, mapped);
                        }
                    }
                }
                index.gold_index = index
                    .gold_mapping
                    .iter()
                    .map(|(&group_id, mentions)| (mentions[0], group_id))
                    .collect();

                if missing > 0 {
                    log::warn!("document {}: {} gold heads match no mention", doc.id, missing);
                }
                self.errors.record(ErrorKind::GoldMapping, missing);
            }

            indices.push(index);
        }

        self.indices = indices;
    }

    /// Every mention with its document and mention id, optionally limited to
    /// some documents.
    pub fn iterate_mentions<'a>(
        &'a self,
        documents: Option<&'a [usize]>,
    ) -> impl Iterator<Item = (usize, MentionId, &'a Unit)> + 'a {
        self.mentions
            .iter()
            .enumerate()
            .filter(move |(doc, _)| documents.map_or(true, |docs| docs.contains(doc)))
            .flat_map(|(doc, mentions)| mentions.iter().enumerate().map(move |(i, m)| (doc, i, m)))
    }

    pub fn stats(&self) -> CorpusStats {
        let gold = || self.documents.iter().filter_map(|doc| doc.gold.as_ref());
        CorpusStats {
            documents: self.documents.len(),
            gold_documents: gold().count(),
            chains: gold().map(|g| g.chains.len()).sum(),
            chain_members: gold().map(GoldStandard::chain_members).sum(),
        }
    }

    /// Run mention-pair resolution over one document's mentions.
    pub fn resolve<P: CoreferencePredicate>(
        &self,
        doc: usize,
        resolver: &MentionPairResolver<P>,
        heads_only: bool,
    ) -> Option<Resolution> {
        let document = self.documents.get(doc)?;
        let words = match self.groups(doc) {
            Some(groups) => groups.to_vec(),
            None => word_units(&document.tokens),
        };

        let mut context = PairContext::new(self.mentions(doc), &words);
        if let Some(parse) = &document.parse {
            context = context.with_parse(parse);
        }
        Some(resolver.resolve(&context, heads_only))
    }
}
