#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]
//! MULTEXT-East tagset for Russian, as produced by TreeTagger and used in
//! the RuCor corpus.

mod agreement;
mod pos;
mod pronouns;
mod tagset;

pub use pronouns::{is_anaphor_lemma, is_coref_pronoun_form};
pub use tagset::MultextTagset;
