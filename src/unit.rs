//! Tokens and merged groups.
//!
//! A document is a sequence of [`Token`]s. Grouping passes replace runs of
//! adjacent tokens with [`Group`]s, and both are handled uniformly through
//! the [`Unit`] variant:
//!
//! ```text
//! новый   дом   отца
//! ╰A      ╰N    ╰N(gen)
//! ╰───────────╯ Agreement(head=1)
//! ╰─────────────────╯ Agreement(head=1)
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Index of a mention in a document's mention list.
pub type MentionId = usize;

/// An atomic tagged token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface forms, usually exactly one
    pub wordform: Vec<String>,
    /// Lemmas, parallel to `wordform`
    pub lemma: Vec<String>,
    /// Part of speech followed by the morphological code
    pub tag: String,
    /// Tagger confidence
    pub prob: f64,
    /// Character offset into the source text
    pub offset: usize,
    /// Length in characters
    pub length: usize,
}

impl Token {
    /// Create a single-form token with full confidence.
    pub fn new(
        wordform: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
        offset: usize,
        length: usize,
    ) -> Self {
        Self {
            wordform: vec![wordform.into()],
            lemma: vec![lemma.into()],
            tag: tag.into(),
            prob: 1.0,
            offset,
            length,
        }
    }

    /// Set the tagger confidence.
    pub fn with_prob(mut self, prob: f64) -> Self {
        self.prob = prob;
        self
    }
}

/// How a [`Group`] came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// A plain token
    Word,
    /// Merged by an agreement filter
    Agreement,
    /// Two noun phrases joined by a conjunction or comma
    Conjunction,
    /// Extracted from a dependency tree
    Dependency,
    /// Rebuilt from a gold-standard annotation
    Annotated,
}

/// A phrase made of several constituents with one designated head.
///
/// The surface fields are derived once in [`Group::new`] and never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    wordform: Vec<String>,
    lemma: Vec<String>,
    /// Tag of the whole phrase (usually the head's tag)
    tag: String,
    /// Tags of the leaf tokens, in order
    tags: Vec<String>,
    prob: f64,
    offset: usize,
    length: usize,
    /// Index into `words` of the syntactic head
    head: usize,
    kind: GroupKind,
    /// Constituents in document order
    words: Vec<Unit>,
}

impl Group {
    /// Build a group from its constituents.
    ///
    /// Returns `None` when `words` is empty or `head` does not index into it.
    pub fn new(kind: GroupKind, words: Vec<Unit>, head: usize, tag: impl Into<String>) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;
        if head >= words.len() {
            return None;
        }

        let offset = first.offset();
        let length = last.end().saturating_sub(offset);

        let mut wordform = Vec::new();
        let mut lemma = Vec::new();
        let mut tags = Vec::new();
        for word in &words {
            wordform.extend(word.wordform().iter().cloned());
            lemma.extend(word.lemma().iter().cloned());
            tags.extend(word.tags().iter().cloned());
        }

        Some(Self {
            wordform,
            lemma,
            tag: tag.into(),
            tags,
            prob: 1.0,
            offset,
            length,
            head,
            kind,
            words,
        })
    }

    pub fn wordform(&self) -> &[String] {
        &self.wordform
    }

    pub fn lemma(&self) -> &[String] {
        &self.lemma
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn words(&self) -> &[Unit] {
        &self.words
    }
}

/// A token or a merged group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unit {
    Word(Token),
    Group(Group),
}

impl From<Token> for Unit {
    fn from(token: Token) -> Self {
        Unit::Word(token)
    }
}

impl From<Group> for Unit {
    fn from(group: Group) -> Self {
        Unit::Group(group)
    }
}

impl Unit {
    pub fn wordform(&self) -> &[String] {
        match self {
            Unit::Word(token) => &token.wordform,
            Unit::Group(group) => &group.wordform,
        }
    }

    pub fn lemma(&self) -> &[String] {
        match self {
            Unit::Word(token) => &token.lemma,
            Unit::Group(group) => &group.lemma,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Unit::Word(token) => &token.tag,
            Unit::Group(group) => &group.tag,
        }
    }

    /// Leaf tags; a word has exactly its own tag.
    pub fn tags(&self) -> &[String] {
        match self {
            Unit::Word(token) => std::slice::from_ref(&token.tag),
            Unit::Group(group) => &group.tags,
        }
    }

    pub fn prob(&self) -> f64 {
        match self {
            Unit::Word(token) => token.prob,
            Unit::Group(group) => group.prob,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Unit::Word(token) => token.offset,
            Unit::Group(group) => group.offset,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Unit::Word(token) => token.length,
            Unit::Group(group) => group.length,
        }
    }

    /// Offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset() + self.length()
    }

    pub fn span(&self) -> Range<usize> {
        self.offset()..self.end()
    }

    /// Index of the head constituent; always 0 for a word.
    pub fn head(&self) -> usize {
        match self {
            Unit::Word(_) => 0,
            Unit::Group(group) => group.head,
        }
    }

    pub fn kind(&self) -> GroupKind {
        match self {
            Unit::Word(_) => GroupKind::Word,
            Unit::Group(group) => group.kind,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Unit::Group(_))
    }

    /// Constituents. A word is its own single constituent.
    pub fn words(&self) -> &[Unit] {
        match self {
            Unit::Word(_) => std::slice::from_ref(self),
            Unit::Group(group) => &group.words,
        }
    }

    /// The token at the bottom of the head chain.
    pub fn head_token(&self) -> &Token {
        let mut current = self;
        loop {
            match current {
                Unit::Word(token) => return token,
                Unit::Group(group) => current = &group.words[group.head],
            }
        }
    }

    /// Offset of the head token, resolved through any level of nesting.
    pub fn head_offset(&self) -> usize {
        self.head_token().offset
    }

    /// Depth-first walk over this unit and every nested constituent,
    /// each unit yielded before its children.
    pub fn iter_groups(&self) -> IterGroups<'_> {
        IterGroups { stack: vec![self] }
    }

    /// Leaf tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.iter_groups().filter_map(|unit| match unit {
            Unit::Word(token) => Some(token),
            Unit::Group(_) => None,
        })
    }

    /// True when one span fully contains the other.
    pub fn intersects(&self, other: &Unit) -> bool {
        (self.offset() <= other.offset() && self.end() >= other.end())
            || (other.offset() <= self.offset() && other.end() >= self.end())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}({}, {})",
            self.wordform().join(" "),
            self.lemma().join(" "),
            self.tag(),
            self.offset()
        )
    }
}

/// Iterator returned by [`Unit::iter_groups`].
pub struct IterGroups<'a> {
    stack: Vec<&'a Unit>,
}

impl<'a> Iterator for IterGroups<'a> {
    type Item = &'a Unit;

    fn next(&mut self) -> Option<Self::Item> {
        let unit = self.stack.pop()?;
        if let Unit::Group(group) = unit {
            self.stack.extend(group.words.iter().rev());
        }
        Some(unit)
    }
}
