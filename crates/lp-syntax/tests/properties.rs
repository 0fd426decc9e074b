//! Property-based tests for the parser and the incremental re-parser.
//!
//! Documents are stitched together from realistic Lp lines plus some junk so
//! that sections, error recovery and every re-parse strategy get exercised.

use lp_syntax::{
    NodeId, ParseOptions, SyntaxKind, SyntaxTree, TextEdit, TextRange, TextSize, parse, parse_with,
};
use proptest::prelude::*;

/// One line of an Lp file, valid or not.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Section keywords
        prop_oneof![
            Just("Minimize"),
            Just("Maximize"),
            Just("Subject To"),
            Just("st"),
            Just("Bounds"),
            Just("Generals"),
            Just("Binaries"),
            Just("SOS"),
            Just("End"),
        ]
        .prop_map(str::to_string),
        // Objectives and constraints
        "( ?[a-z][0-9]?: )?[-+]?[0-9]{0,2} ?[a-z][0-9]?( [-+] [0-9]{0,2} ?[a-z][0-9]?){0,3}",
        "( ?c[0-9]: )?[a-z] [-+] [a-z] (<=|>=|=|<|>) -?[0-9]{1,3}",
        // Bounds
        "[a-z][0-9]? (free|<= [0-9]|>= -inf)",
        "-?[0-9] <= [a-z] <= [0-9]{1,2}",
        // SOS
        "s[0-9]: S[12]:: [a-z]:[0-9]( [a-z]:[0-9])?",
        "[a-z]:[0-9]( [a-z]:[0-9])?",
        "[a-z]:[0-9] [a-z]: S[12]:: [a-z]:[0-9]",
        // Comments, blanks and junk
        "\\\\ [a-z ]{0,8}",
        "\\\\\\* [a-z ]{0,5}\\*\\\\",
        "[ \t]{0,3}",
        "[a-z] [~()] [a-z]",
        "1\\.2\\.3 [a-z]",
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 0..12).prop_map(|lines| lines.join("\n"))
}

/// A document and an edit that fits it.
fn edit_strategy() -> impl Strategy<Value = (String, TextEdit)> {
    document_strategy().prop_flat_map(|text| {
        let len = text.len();
        let replacement = prop_oneof![
            Just(String::new()),
            "[a-z0-9]{1,3}",
            "[ +\\-]",
            Just("\n".to_string()),
            Just(" <= 4".to_string()),
            Just("~".to_string()),
            Just("\\*".to_string()),
            Just("Bounds\n".to_string()),
        ];
        (Just(text), 0..=len, 0..=4usize, replacement).prop_map(
            |(text, start, width, replacement)| {
                let end = (start + width).min(text.len());
                let range = TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32));
                (text, TextEdit::replace(range, replacement))
            },
        )
    })
}

fn leaf_text(tree: &SyntaxTree) -> String {
    tree.leaves(tree.root()).map(|id| tree.text_of(id)).collect()
}

/// A statement node directly under the document or a section.
fn is_statement(tree: &SyntaxTree, id: NodeId) -> bool {
    use SyntaxKind::*;
    matches!(
        tree.kind(id),
        OBJECTIVE | CONSTRAINT | BOUND | DECLARATION | SOS_SET | SOS_ENTRY
    ) && tree
        .parent_of(id)
        .is_some_and(|parent| matches!(tree.kind(parent), SECTION | DOCUMENT))
}

/// Whether `id` is the first statement of its line. Later SOS entries of a
/// line are parsed as entries whatever they look like.
fn starts_line(tree: &SyntaxTree, id: NodeId) -> bool {
    let start = tree.span_of(id).start();
    tree.leaves(tree.root())
        .take_while(|leaf| tree.span_of(*leaf).end() <= start)
        .filter(|leaf| !tree.kind(*leaf).is_trivia())
        .last()
        .is_none_or(|leaf| {
            let kind = tree.kind(leaf);
            kind == SyntaxKind::NEWLINE || kind.is_section_keyword()
        })
}

/// Kinds, child counts and ranges relative to the start of `id`.
fn shape(tree: &SyntaxTree, id: NodeId) -> Vec<(SyntaxKind, usize, TextRange)> {
    let base = tree.span_of(id).start();
    tree.descendants(id)
        .map(|node| {
            let span = tree.span_of(node);
            let relative = TextRange::new(span.start() - base, span.end() - base);
            (tree.kind(node), tree.child_count(node), relative)
        })
        .collect()
}

proptest! {
    #[test]
    fn parsing_is_lossless(text in document_strategy()) {
        let parse = parse(&text);
        prop_assert_eq!(leaf_text(parse.tree()), text);
    }

    #[test]
    fn arbitrary_input_is_lossless(text in "\\PC{0,60}") {
        let parse = parse(&text);
        prop_assert_eq!(leaf_text(parse.tree()), text);
    }

    #[test]
    fn parsing_is_deterministic(text in document_strategy()) {
        prop_assert_eq!(parse(&text), parse(&text));
    }

    #[test]
    fn child_spans_nest_in_order(text in document_strategy()) {
        let parse = parse(&text);
        let tree = parse.tree();
        for id in tree.descendants(tree.root()) {
            let span = tree.span_of(id);
            let mut offset = span.start();
            for child in tree.children(id) {
                let child_span = tree.span_of(child);
                prop_assert_eq!(child_span.start(), offset);
                prop_assert!(span.contains_range(child_span));
                offset = child_span.end();
            }
            if tree.child_count(id) > 0 {
                prop_assert_eq!(offset, span.end());
            }
        }
    }

    #[test]
    fn statements_parse_the_same_on_their_own(text in document_strategy()) {
        let whole = parse(&text);
        let tree = whole.tree();
        let statements = tree
            .descendants(tree.root())
            .filter(|id| is_statement(tree, *id) && starts_line(tree, *id));

        for id in statements {
            let keyword = tree
                .parent_of(id)
                .filter(|parent| tree.kind(*parent) == SyntaxKind::SECTION)
                .and_then(|section| tree.child_at(section, 0))
                .map(|keyword| format!("{}\n", tree.text_of(keyword)))
                .unwrap_or_default();
            let alone = parse(&format!("{keyword}{}", tree.text_of(id)));
            let alone_tree = alone.tree();
            let offset = TextSize::of(keyword.as_str());
            let copy = alone_tree.descendants(alone_tree.root()).find(|node| {
                is_statement(alone_tree, *node) && alone_tree.span_of(*node).start() == offset
            });

            prop_assert!(copy.is_some(), "no statement in {:?}", alone.text());
            if let Some(copy) = copy {
                prop_assert_eq!(shape(alone_tree, copy), shape(tree, id));
            }
        }
    }

    #[test]
    fn errors_are_sorted_and_inside_the_text(text in document_strategy()) {
        let parse = parse(&text);
        let len = TextSize::of(text.as_str());
        for pair in parse.errors().windows(2) {
            prop_assert!(pair[0].range.start() <= pair[1].range.start());
        }
        for error in parse.errors() {
            prop_assert!(error.range.end() <= len);
        }
    }

    #[test]
    fn reparse_matches_fresh_parse((text, edit) in edit_strategy()) {
        let old = parse(&text);
        let new = old.reparse(&edit).unwrap();
        let expected = parse(&edit.apply(&text).unwrap());
        prop_assert_eq!(new.tree().debug_dump(), expected.tree().debug_dump());
        prop_assert_eq!(&new, &expected);
    }

    #[test]
    fn chained_reparses_match_fresh_parse(
        (text, first) in edit_strategy(),
        insert_at in any::<prop::sample::Index>(),
    ) {
        let options = ParseOptions { max_dead_percent: 90, ..ParseOptions::default() };
        let once = parse_with(&text, &options).reparse(&first).unwrap();
        let offset = insert_at.index(once.text().len() + 1);
        let second = TextEdit::insert(TextSize::new(offset as u32), "x");
        let twice = once.reparse(&second).unwrap();
        prop_assert_eq!(twice, parse_with(&second.apply(once.text()).unwrap(), &options));
    }
}
