//! Baseline antecedent resolvers.
//!
//! Unlike [`MentionPairResolver`](crate::MentionPairResolver), these work
//! anaphor by anaphor: candidates are restricted to a window of nearby
//! nouns and pronouns, ordered from the closest preceding offset, and the
//! resolver picks one of them.

use serde::{Deserialize, Serialize};

use crate::tagset::{same_grammemes, Tagset};
use crate::unit::{MentionId, Unit};

/// Allowed distance, in group positions, between an anaphor and a candidate.
///
/// A candidate qualifies when `lower < index(anaphor) - index(candidate) < upper`.
/// The default `(-10, 25)` is asymmetric and lets candidates follow the
/// anaphor; it is kept exactly as tuned on the evaluation corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateWindow {
    pub lower: i64,
    pub upper: i64,
}

impl Default for CandidateWindow {
    fn default() -> Self {
        Self { lower: -10, upper: 25 }
    }
}

impl CandidateWindow {
    pub fn contains(&self, anaphor: usize, candidate: usize) -> bool {
        let distance = anaphor as i64 - candidate as i64;
        self.lower < distance && distance < self.upper
    }
}

/// Candidate antecedents for `groups[target]`, nearest preceding offset first.
pub fn possible_antecedents<T, F>(
    tagset: &T,
    window: &CandidateWindow,
    target: MentionId,
    groups: &[Unit],
    group_fits: F,
) -> Vec<MentionId>
where
    T: Tagset + ?Sized,
    F: Fn(&Unit, &Unit) -> bool,
{
    let Some(anaphor) = groups.get(target) else {
        return Vec::new();
    };

    let mut candidates: Vec<MentionId> = groups
        .iter()
        .enumerate()
        .filter(|&(i, group)| {
            window.contains(target, i)
                && group.offset() != anaphor.offset()
                && (tagset.is_noun(group) || tagset.is_pronoun(group))
                && group_fits(group, anaphor)
        })
        .map(|(i, _)| i)
        .collect();

    candidates.sort_by(|&a, &b| groups[b].offset().cmp(&groups[a].offset()));
    candidates
}

pub trait AntecedentResolver {
    /// Pick an antecedent for `groups[target]`, if any.
    fn antecedent(&self, target: MentionId, groups: &[Unit]) -> Option<MentionId>;
}

/// Resolve every anaphor in `groups`, returning `(antecedent, anaphor)` pairs.
pub fn resolve_anaphors<R, T>(resolver: &R, tagset: &T, groups: &[Unit]) -> Vec<(MentionId, MentionId)>
where
    R: AntecedentResolver + ?Sized,
    T: Tagset + ?Sized,
{
    let pairs: Vec<(MentionId, MentionId)> = groups
        .iter()
        .enumerate()
        .filter(|(_, group)| tagset.is_anaphor(group))
        .filter_map(|(target, _)| resolver.antecedent(target, groups).map(|a| (a, target)))
        .collect();
    log::debug!("resolved {} anaphors", pairs.len());
    pairs
}

/// Takes the closest candidate in the window.
pub struct DummyResolver<T> {
    tagset: T,
    window: CandidateWindow,
}

impl<T: Tagset> DummyResolver<T> {
    pub fn new(tagset: T) -> Self {
        Self {
            tagset,
            window: CandidateWindow::default(),
        }
    }

    pub fn with_window(mut self, window: CandidateWindow) -> Self {
        self.window = window;
        self
    }
}

impl<T: Tagset> AntecedentResolver for DummyResolver<T> {
    fn antecedent(&self, target: MentionId, groups: &[Unit]) -> Option<MentionId> {
        possible_antecedents(&self.tagset, &self.window, target, groups, |_, _| true)
            .first()
            .copied()
    }
}

/// Takes the closest candidate that agrees with the anaphor in gender and number.
pub struct AgreementResolver<T> {
    tagset: T,
    window: CandidateWindow,
}

impl<T: Tagset> AgreementResolver<T> {
    pub fn new(tagset: T) -> Self {
        Self {
            tagset,
            window: CandidateWindow::default(),
        }
    }

    pub fn with_window(mut self, window: CandidateWindow) -> Self {
        self.window = window;
        self
    }

    fn agrees(&self, candidate: &Unit, anaphor: &Unit) -> bool {
        same_grammemes(&self.tagset, "gender", &[candidate, anaphor])
            && same_grammemes(&self.tagset, "number", &[candidate, anaphor])
    }
}

impl<T: Tagset> AntecedentResolver for AgreementResolver<T> {
    fn antecedent(&self, target: MentionId, groups: &[Unit]) -> Option<MentionId> {
        possible_antecedents(&self.tagset, &self.window, target, groups, |c, a| self.agrees(c, a))
            .first()
            .copied()
    }
}

/// Turns a candidate/anaphor pair into a feature vector.
pub trait FeatureExtractor {
    fn feature_vector(&self, antecedent: MentionId, anaphor: MentionId, groups: &[Unit]) -> Vec<f64>;
}

/// Single feature: character distance from the candidate to the anaphor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetDistance;

impl FeatureExtractor for OffsetDistance {
    fn feature_vector(&self, antecedent: MentionId, anaphor: MentionId, groups: &[Unit]) -> Vec<f64> {
        vec![groups[anaphor].offset() as f64 - groups[antecedent].offset() as f64]
    }
}

/// A trained binary classifier over feature vectors.
pub trait PairClassifier {
    fn predict(&self, features: &[f64]) -> bool;
}

impl<F: Fn(&[f64]) -> bool> PairClassifier for F {
    fn predict(&self, features: &[f64]) -> bool {
        self(features)
    }
}

/// Takes the closest candidate the classifier accepts.
///
/// Without a model nothing is resolved.
pub struct ClassifierResolver<T, C, X = OffsetDistance> {
    tagset: T,
    window: CandidateWindow,
    model: Option<C>,
    features: X,
}

impl<T: Tagset, C: PairClassifier> ClassifierResolver<T, C, OffsetDistance> {
    pub fn new(tagset: T) -> Self {
        Self {
            tagset,
            window: CandidateWindow::default(),
            model: None,
            features: OffsetDistance,
        }
    }
}

impl<T: Tagset, C: PairClassifier, X: FeatureExtractor> ClassifierResolver<T, C, X> {
    pub fn with_model(mut self, model: C) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_features<Y: FeatureExtractor>(self, features: Y) -> ClassifierResolver<T, C, Y> {
        ClassifierResolver {
            tagset: self.tagset,
            window: self.window,
            model: self.model,
            features,
        }
    }

    pub fn with_window(mut self, window: CandidateWindow) -> Self {
        self.window = window;
        self
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

impl<T: Tagset, C: PairClassifier, X: FeatureExtractor> AntecedentResolver for ClassifierResolver<T, C, X> {
    fn antecedent(&self, target: MentionId, groups: &[Unit]) -> Option<MentionId> {
        let model = self.model.as_ref()?;
        possible_antecedents(&self.tagset, &self.window, target, groups, |_, _| true)
            .into_iter()
            .find(|&candidate| model.predict(&self.features.feature_vector(candidate, target, groups)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagset::test_tagset::TestTagset;
    use crate::unit::Token;

    fn unit(tag: &str, offset: usize) -> Unit {
        Token::new("w", "w", tag, offset, 1).into()
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let window = CandidateWindow::default();
        assert!(window.contains(30, 6));
        assert!(!window.contains(30, 5));
        assert!(window.contains(0, 9));
        assert!(!window.contains(0, 10));
        assert!(window.contains(3, 3));
    }

    #[test]
    fn candidates_are_nouns_and_pronouns_nearest_first() {
        let tagset = TestTagset::new();
        let groups = vec![
            unit("Nms", 0),
            unit("V", 2),
            unit("Nfs", 4),
            unit("P", 6),
            unit("Nfp", 8),
        ];
        let candidates =
            possible_antecedents(&tagset, &CandidateWindow::default(), 3, &groups, |_, _| true);
        // the following noun is inside the window too
        assert_eq!(candidates, vec![4, 2, 0]);
    }

    #[test]
    fn dummy_takes_the_closest_offset() {
        let groups = vec![unit("Nms", 0), unit("Nfs", 4), unit("P", 6)];
        let resolver = DummyResolver::new(TestTagset::new());
        assert_eq!(resolver.antecedent(2, &groups), Some(1));
    }

    #[test]
    fn agreement_skips_mismatched_gender() {
        let groups = vec![unit("Nfs", 0), unit("Nms", 4), unit("Pfs", 6)];
        let resolver = AgreementResolver::new(TestTagset::new());
        assert_eq!(resolver.antecedent(2, &groups), Some(0));

        let pairs = resolve_anaphors(&resolver, &TestTagset::new(), &groups);
        assert_eq!(pairs, vec![(0, 2)]);
    }

    #[test]
    fn classifier_uses_feature_vector() {
        let groups = vec![unit("Nms", 0), unit("Nms", 20), unit("P", 25)];
        let untrained: ClassifierResolver<_, fn(&[f64]) -> bool> =
            ClassifierResolver::new(TestTagset::new());
        assert!(!untrained.is_trained());
        assert_eq!(untrained.antecedent(2, &groups), None);

        let far_only = |features: &[f64]| features[0] > 10.0;
        let resolver = ClassifierResolver::new(TestTagset::new()).with_model(far_only);
        assert_eq!(resolver.antecedent(2, &groups), Some(0));
    }
}
