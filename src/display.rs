use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::chains::{ChainGroup, ChainId};
use crate::unit::{MentionId, Token, Unit};

/// Inclusive range of token indexes.
type TokenRange = (usize, usize);

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ..., AZ, BA, ...
/// Similar to Excel column naming.
fn index_to_base26_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

struct IncludedSpan {
    range: TokenRange,
    label: String,
    /// Span this one points back to, rendered as an arrow
    link: Option<(&'static str, TokenRange)>,
}

/// Renders tokens with spans underlined beneath them.
///
/// ```text
/// Anna  saw  her
/// ╰──╯[A] Chain(1)
///            ╰─╯Chain(1)
///              └─parent─>[A]
/// ```
pub struct SpanDisplay<'a> {
    tokens: &'a [Token],
    spans: Vec<IncludedSpan>,
}

impl<'a> std::fmt::Display for SpanDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut token_idx_to_start_display_char_idx = Vec::new();
        let mut token_idx_to_end_display_char_idx = Vec::new();
        let mut opening_line = String::new();
        {
            // for skipping padding at beginning
            let mut is_first = true;
            for token in self.tokens.iter() {
                if is_first {
                    is_first = false;
                } else {
                    opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
                }

                token_idx_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
                opening_line.push_str(&token.wordform.join(" "));
                token_idx_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            }
        }

        f.write_str(&opening_line)?;

        let span_labels = self.build_span_labels();

        for span in self.spans.iter() {
            f.write_char('\n')?;

            let start_char_idx = token_idx_to_start_display_char_idx[span.range.0];
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let end_char_idx = token_idx_to_end_display_char_idx[span.range.1];
            let char_len = end_char_idx - start_char_idx;
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            if let Some(label) = span_labels.get(&span.range) {
                write!(f, "{} ", label)?;
            }

            f.write_str(&span.label)?;

            if let Some((name, target)) = span.link {
                f.write_char('\n')?;
                for _ in 0..start_char_idx + 2 {
                    f.write_char(' ')?;
                }
                let target_str = span_labels
                    .get(&target)
                    .cloned()
                    .unwrap_or_else(|| format!("[{}..{}]", target.0, target.1));
                write!(f, "└─{}─>{}", name, target_str)?;
            }
        }

        Ok(())
    }
}

impl<'a> SpanDisplay<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        SpanDisplay {
            tokens,
            spans: Vec::new(),
        }
    }

    /// Labels like "[A]", "[B]" for included spans that some link points at.
    fn build_span_labels(&self) -> HashMap<TokenRange, String> {
        let included: HashSet<TokenRange> = self.spans.iter().map(|span| span.range).collect();

        let mut target_ranges: Vec<TokenRange> = self
            .spans
            .iter()
            .filter_map(|span| span.link.map(|(_, target)| target))
            .filter(|target| included.contains(target))
            .collect();
        target_ranges.sort();
        target_ranges.dedup();

        target_ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| (range, format!("[{}]", index_to_base26_label(i))))
            .collect()
    }

    /// Token indexes covered by a unit, if its bounds fall on token edges.
    fn token_range(&self, unit: &Unit) -> Option<TokenRange> {
        let start = self.tokens.iter().position(|t| t.offset == unit.offset())?;
        let end = self.tokens.iter().rposition(|t| t.offset + t.length == unit.end())?;
        (start <= end).then(|| (start, end))
    }

    /// Underline each unit, labelled with its tag (words) or kind and head (groups).
    pub fn include_units(&mut self, units: &[Unit]) {
        for unit in units {
            let Some(range) = self.token_range(unit) else {
                continue;
            };
            let label = match unit {
                Unit::Word(token) => token.tag.clone(),
                Unit::Group(group) => format!("{:?}(head={})", group.kind(), group.head()),
            };
            self.spans.push(IncludedSpan {
                range,
                label,
                link: None,
            });
        }
    }

    /// Underline each mention with its chain and an arrow to its parent.
    pub fn include_chains(&mut self, mentions: &[Unit], groups: &BTreeMap<MentionId, ChainGroup>) {
        for (&id, group) in groups {
            let Some(range) = mentions.get(id).and_then(|m| self.token_range(m)) else {
                continue;
            };
            let label = match group.chain {
                ChainId::Linked(chain) => format!("Chain({})", chain),
                ChainId::Singleton(_) => "Singleton".to_string(),
            };
            let link = group
                .parent
                .and_then(|parent| mentions.get(parent))
                .and_then(|parent| self.token_range(parent))
                .map(|target| ("parent", target));
            self.spans.push(IncludedSpan { range, label, link });
        }
    }

    /// Takes self
    pub fn with_units(mut self, units: &[Unit]) -> Self {
        self.include_units(units);
        self
    }

    /// Takes self
    pub fn with_chains(mut self, mentions: &[Unit], groups: &BTreeMap<MentionId, ChainGroup>) -> Self {
        self.include_chains(mentions, groups);
        self
    }
}
