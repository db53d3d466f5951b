#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]
//! Evaluating coreference resolution against gold-standard corpora.
//!
//! A [`Corpus`] holds tagged documents with their gold chains. From there
//! it can be grouped and indexed, resolved with any
//! [`CoreferencePredicate`](layered_anaphora::CoreferencePredicate),
//! exported to CoNLL for the reference [`Scorer`] or to BRAT for review.

mod brat;
mod config;
mod conll;
mod corpus;
mod errors;
mod gold;
mod scorer;

pub use brat::reconstruct_text;
pub use config::{EvalConfig, ScorerConfig};
pub use conll::{gold_groups, system_groups, ExportGroup};
pub use corpus::{Corpus, CorpusStats, Document, DocumentIndex, ErrorKind, ErrorTally};
pub use errors::{EvalError, EvalResult};
pub use gold::{
    predicted_with_gold_boundaries, GoldChainId, GoldCoreference, GoldGroup, GoldGroupId, GoldMentions,
    GoldStandard,
};
pub use scorer::{format_score_row, parse_report, ScoreTriple, Scorer, Scores};

#[cfg(test)]
mod tests {
    mod export;
}
