use crate::tagset::test_tagset::TestTagset;
use crate::*;

fn tok(form: &str, tag: &str, offset: usize) -> Token {
    Token::new(form, form, tag, offset, form.chars().count())
}

fn sentence() -> Vec<Token> {
    vec![
        tok("old", "Afs", 0),
        tok("woman", "Nfs", 4),
        tok("met", "V", 10),
        tok("boy", "Nms", 14),
        tok(".", ".", 17),
        tok("she", "Pfs", 19),
        tok("smiled", "V", 23),
    ]
}

fn agrees(tagset: &TestTagset) -> impl Fn((MentionId, MentionId), &PairContext<'_>) -> bool + '_ {
    move |(a, m): (MentionId, MentionId), ctx: &PairContext<'_>| {
        let pair = [&ctx.mentions[a], &ctx.mentions[m]];
        same_grammemes(tagset, "gender", &pair) && same_grammemes(tagset, "number", &pair)
    }
}

#[test]
fn agreement_grouping_to_chains() {
    let tagset = TestTagset::new();
    let tokens = sentence();

    let units = find_groups(&tokens, &tagset, &GroupingConfig::default());
    let mentions = find_mentions(&units, &tagset);
    assert_eq!(mentions.len(), 3);

    let context = PairContext::new(&mentions, &units);
    let resolution = MentionPairResolver::new(agrees(&tagset)).resolve(&context, false);

    assert_eq!(resolution.decisions.accepted, vec![(0, 2)]);
    assert_eq!(resolution.decisions.discarded, vec![(0, 1), (1, 2)]);
    assert_eq!(resolution.groups[&0].token_offsets, vec![0, 4]);

    let ids = conll_ids(&resolution.groups);
    assert_eq!(ids.values().copied().collect::<Vec<_>>(), vec![1, 2, 1]);

    let display = SpanDisplay::new(&tokens).with_chains(&mentions, &resolution.groups);
    insta::assert_snapshot!(display, @r###"
    old  woman  met  boy  .  she  smiled
    ╰────────╯[A] Chain(1)
                     ╰─╯Singleton
                             ╰─╯Chain(1)
                               └─parent─>[A]
    "###);
}

#[test]
fn heads_only_export_uses_head_tokens() {
    let tagset = TestTagset::new();
    let tokens = sentence();
    let units = find_groups(&tokens, &tagset, &GroupingConfig::default());
    let mentions = find_mentions(&units, &tagset);

    let context = PairContext::new(&mentions, &units);
    let resolution = MentionPairResolver::new(agrees(&tagset)).resolve(&context, true);
    assert_eq!(resolution.groups[&0].token_offsets, vec![4]);
    assert_eq!(resolution.groups[&2].token_offsets, vec![19]);
}

#[test]
fn dependency_groups_feed_the_resolver() {
    let tagset = TestTagset::new();
    let tokens = vec![
        tok("Anna", "Npfs", 0),
        tok("read", "V", 5),
        tok("old", "Afp", 10),
        tok("books", "Nfp", 14),
        tok(".", ".", 19),
    ];
    let parse = DependencyParse::from_conll(&[
        (2, "subj"),
        (0, "ROOT"),
        (4, "amod"),
        (2, "obj"),
        (2, "punct"),
    ]);

    let units = find_dependency_groups(&tokens, &parse, &tagset);
    insta::assert_snapshot!(SpanDisplay::new(&tokens).with_units(&units), @r###"
    Anna  read  old  books  .
    ╰──╯Dependency(head=0)
                ╰────────╯Dependency(head=1)
    "###);

    let mentions = find_mentions(&units, &tagset);
    let context = PairContext::new(&mentions, &units).with_parse(&parse);
    let uses_parse = |_: (MentionId, MentionId), ctx: &PairContext<'_>| ctx.parse.is_some();
    let resolution = MentionPairResolver::new(uses_parse).resolve(&context, false);
    assert_eq!(resolution.chains.get(1), Some(&[0, 1][..]));
}

#[test]
fn resolvers_agree_on_simple_text() {
    let tagset = TestTagset::new();
    let units = find_groups(&sentence(), &tagset, &GroupingConfig::default());

    // she -> old woman, skipping the masculine boy
    let agreement = resolve_anaphors(&AgreementResolver::new(&tagset), &tagset, &units);
    assert_eq!(agreement, vec![(0, 3)]);

    // the nearest noun wins regardless of agreement
    let dummy = resolve_anaphors(&DummyResolver::new(&tagset), &tagset, &units);
    assert_eq!(dummy, vec![(2, 3)]);
}
