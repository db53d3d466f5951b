use std::fs;
use std::path::Path;

use layered_anaphora::{MentionId, MentionPairResolver, PairContext, Token};
use layered_anaphora_multext::MultextTagset;
use tempfile::{tempdir, NamedTempFile};

use crate::{Corpus, Document, ErrorKind, EvalError, ExportGroup, GoldGroup, GoldStandard, ScoreTriple, Scorer, ScorerConfig};

fn tok(form: &str, tag: &str, offset: usize) -> Token {
    Token::new(form, form, tag, offset, form.chars().count())
}

/// "старый друг пришёл. он устал"
fn document() -> Document {
    let tokens = vec![
        tok("старый", "Afpmsnf", 0),
        tok("друг", "Ncmsny", 7),
        tok("пришёл", "Vmis-sma-p", 12),
        tok(".", "SENT", 18),
        tok("он", "Pp3msnn", 20),
        tok("устал", "Vmis-sma-p", 23),
    ];
    let mut gold = GoldStandard::new();
    gold.add_group(
        1,
        10,
        GoldGroup::new(vec![0, 7], 11)
            .with_heads(vec![7])
            .with_attribute("gender", "m")
            .with_attribute("animacy", ""),
    );
    gold.add_group(1, 11, GoldGroup::new(vec![20], 2).with_parent(10));
    gold.add_group(2, 12, GoldGroup::new(vec![12], 6));
    Document::new(5, tokens).with_gold(gold)
}

fn grouped_corpus() -> Corpus<MultextTagset> {
    let mut corpus = Corpus::new(MultextTagset::new(), vec![document()]);
    corpus.find_groups();
    corpus
}

fn conll_lines(corpus: &mut Corpus<MultextTagset>, system: Option<&[Vec<ExportGroup>]>) -> Vec<String> {
    let file = NamedTempFile::new().unwrap();
    corpus.export_conll(file.path(), system).unwrap();
    fs::read_to_string(file.path())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn link_all(_: (MentionId, MentionId), _: &PairContext<'_>) -> bool {
    true
}

#[test]
fn gold_conll_marks_span_boundaries() {
    let mut corpus = grouped_corpus();
    assert_eq!(
        conll_lines(&mut corpus, None),
        vec![
            "#begin document (Doc5);",
            "Doc5\t0\t(1",
            "Doc5\t0\t1)",
            "Doc5\t0\t(2)",
            "Doc5\t0\t-",
            "",
            "Doc5\t0\t(1)",
            "Doc5\t0\t-",
            "#end document",
        ]
    );
    assert_eq!(corpus.errors().get(ErrorKind::Export), 0);
}

#[test]
fn system_conll_from_resolution() {
    let mut corpus = grouped_corpus();
    let resolver = MentionPairResolver::new(link_all);

    let full = corpus.export_groups(&resolver, false);
    let lines = conll_lines(&mut corpus, Some(full.as_slice()));
    assert_eq!(lines[1..4], ["Doc5\t0\t(1", "Doc5\t0\t1)", "Doc5\t0\t-"]);
    assert_eq!(lines[6], "Doc5\t0\t(1)");

    // only the head noun is marked
    let heads = corpus.export_groups(&resolver, true);
    let lines = conll_lines(&mut corpus, Some(heads.as_slice()));
    assert_eq!(lines[1..3], ["Doc5\t0\t-", "Doc5\t0\t(1)"]);
}

#[test]
fn conll_skips_duplicates_and_counts_unknown_offsets() {
    let mut corpus = grouped_corpus();
    let group = |chain, token_offsets: &[usize]| ExportGroup {
        chain,
        token_offsets: token_offsets.to_vec(),
    };
    let system = vec![vec![group(3, &[0, 7]), group(4, &[0, 7]), group(5, &[99])]];

    let lines = conll_lines(&mut corpus, Some(system.as_slice()));
    assert_eq!(lines[1..3], ["Doc5\t0\t(3", "Doc5\t0\t3)"]);
    assert_eq!(corpus.errors().get(ErrorKind::Export), 1);
}

#[test]
fn brat_export_writes_text_and_annotations() {
    let mut doc = document();
    // parent 99 does not exist
    if let Some(gold) = doc.gold.as_mut() {
        gold.add_group(2, 13, GoldGroup::new(vec![23], 5).with_parent(99));
    }
    let mut corpus = Corpus::new(MultextTagset::new(), vec![doc]);
    corpus.find_groups();

    let dir = tempdir().unwrap();
    let target = dir.path().join("brat");
    corpus.export_brat(&target).unwrap();

    let text = fs::read_to_string(target.join("0.txt")).unwrap();
    assert_eq!(text, "старый друг пришёл. он устал");

    let annotations = fs::read_to_string(target.join("0.ann")).unwrap();
    let lines: Vec<&str> = annotations.lines().collect();
    assert_eq!(
        lines,
        vec![
            "T0\tNP 0 11\tстарый друг",
            "T1\tNP 20 22\tон",
            "T2\tDiscNew 0 11\tстарый друг",
            "A0\tgender T2 m",
            "A1\tanimacy T2 ?",
            "T3\tDiscOld 20 22\tон",
            "T4\tDiscNew 12 18\tпришёл",
            "T5\tDiscOld 23 28\tустал",
            "R0\tCoreference Arg1:T3 Arg2:T2",
        ]
    );
    assert_eq!(corpus.errors().get(ErrorKind::Export), 1);
}

#[test]
fn brat_rejects_a_file_target() {
    let file = NamedTempFile::new().unwrap();
    let mut corpus = grouped_corpus();

    let result = corpus.export_brat(file.path());
    assert!(matches!(result, Err(EvalError::NotADirectory { .. })));
    assert!(corpus.index(0).is_none());
}

#[cfg(unix)]
fn shell_scorer(script: &str) -> (Scorer, NamedTempFile) {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), script).unwrap();
    let scorer = Scorer::new(ScorerConfig {
        perl: "sh".into(),
        script: file.path().to_path_buf(),
        metrics: vec!["muc".into()],
    });
    (scorer, file)
}

#[cfg(unix)]
#[test]
fn scorer_runs_once_per_metric() {
    // prints a report only when both CoNLL files were written
    let (scorer, _script) = shell_scorer(
        r#"grep -q 'begin document' "$2" && grep -q 'begin document' "$3" || exit 1
printf 'METRIC %s:\n' "$1"
printf 'Coreference: Recall: (1 / 2) 50%%\tPrecision: (1 / 1) 100%%\tF1: 66.66%%\n'
"#,
    );
    let mut corpus = grouped_corpus();
    let system = corpus.export_groups(&MentionPairResolver::new(link_all), false);

    let scores = scorer
        .score(&mut corpus, &system, &["muc".to_string(), "bcub".to_string()])
        .unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores["bcub"]["Coreference"], ScoreTriple::new("50", "100", "66.66"));

    let configured = scorer.score_configured(&mut corpus, &system).unwrap();
    assert_eq!(configured.keys().collect::<Vec<_>>(), vec!["muc"]);
}

#[cfg(unix)]
#[test]
fn scorer_failure_is_an_error() {
    // reports the CoNLL paths it was given, then fails
    let (scorer, _script) = shell_scorer("printf 'broken\\n%s\\n%s\\n' \"$2\" \"$3\" >&2\nexit 3\n");
    let mut corpus = grouped_corpus();

    let result = scorer.score_configured(&mut corpus, &[]);
    match result {
        Err(EvalError::Scorer { metric, message }) => {
            assert_eq!(metric, "muc");
            assert!(message.contains("broken"));

            // the temporary gold and system files are gone
            let paths: Vec<&str> = message.lines().skip(1).collect();
            assert_eq!(paths.len(), 2);
            for path in paths {
                assert!(!Path::new(path).exists(), "{} was left behind", path);
            }
        }
        other => panic!("expected a scorer error, got {:?}", other),
    }

    let missing = Scorer::new(ScorerConfig {
        perl: "/nonexistent/perl".into(),
        ..ScorerConfig::default()
    });
    assert!(matches!(
        missing.score_configured(&mut corpus, &[]),
        Err(EvalError::Scorer { .. })
    ));
}
