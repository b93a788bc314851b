use super::*;
use crate::error::SchemaError;
use crate::store::{Resource, SharedStore, StoreSnapshot};
use pretty_assertions::assert_eq;

fn fixture_store() -> StoreSnapshot {
    StoreSnapshot::new()
        .with_collection(
            "cards",
            vec![
                Resource::new("c1")
                    .with_field("title", "Abstract Notes")
                    .with_field("type", "draft"),
                Resource::new("c2").with_field("title", "Other"),
                Resource::new("c3").with_field("title", "Weekly Report"),
            ],
        )
        .with_collection(
            "agents",
            (1..=8)
                .map(|i| Resource::new(format!("a{i}")).with_field("name", format!("Agent {i}")))
                .collect(),
        )
}

fn create_test_engine() -> CompletionEngine {
    CompletionEngine::new(
        NavigationSchema::builtin(),
        BindingTable::builtin(),
        SharedStore::new(fixture_store()),
    )
    .unwrap()
}

fn paths(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.path.as_str()).collect()
}

fn input(buffer: &str) -> Intent {
    Intent::Input {
        buffer: buffer.to_string(),
        cursor: buffer.len(),
    }
}

/// Split a schema path into its parent path and last key
fn parent_and_key(path: &str) -> (&str, &str) {
    let stem = path.strip_suffix('/').unwrap_or(path);
    let split = stem.rfind('/').map_or(0, |i| i + 1);
    (&path[..split], &path[split..])
}

#[test]
fn test_every_schema_path_is_offered_at_its_parent() {
    let engine = create_test_engine();

    for prefix in Prefix::ALL {
        let all = engine.schema().paths(prefix);
        for path in &all {
            let (parent, key) = parent_and_key(path);
            let siblings = all
                .iter()
                .filter(|other| parent_and_key(other).0 == parent)
                .count();

            if siblings <= MAX_SUGGESTIONS {
                let items = engine.resolve(prefix, parent, None);
                assert!(
                    paths(&items).contains(&path.as_str()),
                    "{prefix}{path} missing at {prefix}{parent}"
                );
            }

            // Narrow wide parents with the key minus its last character
            let stem = key.strip_suffix('/').unwrap_or(key);
            let filter = &stem[..stem.len() - 1];
            let items = engine.resolve(prefix, &format!("{parent}{filter}"), None);
            assert!(
                paths(&items).contains(&path.as_str()),
                "{prefix}{path} missing at {prefix}{parent}{filter}"
            );
        }
    }
}

#[test]
fn test_never_more_than_five_items() {
    let engine = create_test_engine();
    let inputs = [
        (Prefix::Target, ""),
        (Prefix::Target, "agents/"),
        (Prefix::Target, "agents/Agent"),
        (Prefix::Target, "scheduler/"),
        (Prefix::Operation, "edit/"),
        (Prefix::Operation, "edit/agent/"),
        (Prefix::Operation, ""),
    ];

    for (prefix, raw_path) in inputs {
        assert!(engine.resolve(prefix, raw_path, None).len() <= MAX_SUGGESTIONS);
    }
    assert_eq!(engine.resolve(Prefix::Target, "agents/", None).len(), 5);
    assert_eq!(
        paths(&engine.resolve(Prefix::Target, "agents/", None)),
        vec!["agents/a1", "agents/a2", "agents/a3", "agents/a4", "agents/a5"]
    );
}

#[test]
fn test_static_matching_ignores_case() {
    let engine = create_test_engine();
    let upper = engine.resolve(Prefix::Target, "LIB", None);
    let lower = engine.resolve(Prefix::Target, "lib", None);

    assert_eq!(upper, lower);
    assert_eq!(paths(&lower), vec!["library/"]);
    assert!(!lower[0].is_terminal);
}

#[test]
fn test_dynamic_matching_is_case_sensitive_substring() {
    let engine = create_test_engine();

    assert!(engine.resolve(Prefix::Target, "cards/report", None).is_empty());
    assert_eq!(
        paths(&engine.resolve(Prefix::Target, "cards/Report", None)),
        vec!["cards/c3"]
    );
    assert!(engine.resolve(Prefix::Target, "cards/ab", None).is_empty());
    assert_eq!(
        paths(&engine.resolve(Prefix::Target, "cards/Ab", None)),
        vec!["cards/c1"]
    );
}

#[test]
fn test_create_lists_terminal_children() {
    let engine = create_test_engine();
    let items = engine.resolve(Prefix::Operation, "create/", None);

    assert_eq!(
        paths(&items),
        vec![
            "create/card",
            "create/collection",
            "create/schema",
            "create/tag",
            "create/agent"
        ]
    );
    assert!(items.iter().all(|item| item.is_terminal));
    assert_eq!(items[0].label, "Create new card");
}

#[test]
fn test_unbound_tag_fails_construction() {
    let schema = NavigationSchema::from_json(
        r##"{
            "@/": { "label": "T", "children": {
                "widgets/": { "label": "Specific widget", "dynamic": "widgets" }
            } },
            "#/": { "label": "O", "children": {} }
        }"##,
    )
    .unwrap();

    let err = CompletionEngine::new(schema, BindingTable::builtin(), SharedStore::default())
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnboundDynamicTag {
            tag: "widgets".to_string(),
            path: "@/widgets/".to_string(),
        }
    );
}

#[test]
fn test_apply_selection_in_running_text() {
    let engine = create_test_engine();
    let item = CompletionItem {
        path: "library/schemas".to_string(),
        label: "Schema definitions".to_string(),
        is_terminal: true,
    };

    let splice = engine.apply_selection("hello @/lib wor", 11, Prefix::Target, &item);
    assert_eq!(splice.buffer, "hello @/library/schemas wor");
    assert_eq!(splice.cursor, "hello @/library/schemas ".len());
    assert!(splice.buffer.starts_with("hello "));
}

#[test]
fn test_session_opens_on_trigger() {
    let engine = create_test_engine();
    let mut session = engine.session();
    assert!(!session.is_open());

    let effects = session.dispatch(input("show #/cr"), &engine);
    assert_eq!(
        effects,
        vec![
            Effect::SearchMode(false),
            Effect::Show {
                prefix: Prefix::Operation,
                path: "cr".to_string(),
                items: engine.resolve(Prefix::Operation, "cr", None),
                selected: 0,
            },
        ]
    );
    assert!(session.is_open());
    assert_eq!(session.current_selection().unwrap().path, "create/");
}

#[test]
fn test_session_input_without_trigger() {
    let engine = create_test_engine();
    let mut session = engine.session();

    assert!(session.dispatch(input("plain text"), &engine).is_empty());

    session.dispatch(input("@/"), &engine);
    assert_eq!(session.dispatch(input("@/ "), &engine), vec![Effect::Hide]);
    assert!(!session.is_open());
}

#[test]
fn test_navigation_wraps() {
    let engine = create_test_engine();
    let mut session = engine.session();
    session.dispatch(input("@/cards/"), &engine);
    assert_eq!(session.items().len(), 3);

    assert_eq!(session.navigate(Direction::Up), Some(2));
    assert_eq!(session.current_selection().unwrap().path, "cards/c3");
    assert_eq!(session.navigate(Direction::Down), Some(0));
    assert_eq!(
        session.dispatch(Intent::Navigate(Direction::Down), &engine),
        vec![Effect::Select(1)]
    );
}

#[test]
fn test_navigation_noop_when_empty_or_closed() {
    let engine = create_test_engine();
    let mut session = engine.session();
    assert_eq!(session.navigate(Direction::Down), None);

    session.dispatch(input("@/nothing"), &engine);
    assert!(session.is_open());
    assert!(session.items().is_empty());
    assert_eq!(session.navigate(Direction::Up), None);
    assert!(session.dispatch(Intent::Accept, &engine).is_empty());
}

#[test]
fn test_recompute_resets_selection() {
    let engine = create_test_engine();
    let mut session = engine.session();
    session.dispatch(input("@/cards/"), &engine);
    session.navigate(Direction::Down);
    assert_eq!(session.selected_index(), Some(1));

    session.dispatch(input("@/cards/O"), &engine);
    assert_eq!(session.selected_index(), Some(0));
}

#[test]
fn test_accept_branch_stays_open() {
    let engine = create_test_engine();
    let mut session = engine.session();
    session.dispatch(input("@/lib"), &engine);

    let effects = session.dispatch(Intent::Accept, &engine);
    assert_eq!(
        effects[0],
        Effect::Replace {
            buffer: "@/library/".to_string(),
            cursor: 10,
        }
    );
    assert!(session.is_open());
    assert_eq!(
        paths(session.items()),
        vec![
            "library/schemas",
            "library/tags",
            "library/cards",
            "library/drafts"
        ]
    );
    assert_eq!(session.request().unwrap().raw_path, "library/");
}

#[test]
fn test_accept_terminal_closes() {
    let engine = create_test_engine();
    let mut session = engine.session();
    session.dispatch(input("#/create/ca"), &engine);

    let effects = session.dispatch(Intent::Accept, &engine);
    assert_eq!(
        effects,
        vec![
            Effect::Replace {
                buffer: "#/create/card ".to_string(),
                cursor: 14,
            },
            Effect::Hide,
        ]
    );
    assert!(!session.is_open());
    assert!(session.current_selection().is_none());
}

#[test]
fn test_cancel_and_blur_close() {
    let engine = create_test_engine();
    let mut session = engine.session();

    session.dispatch(input("@/"), &engine);
    assert_eq!(session.dispatch(Intent::Cancel, &engine), vec![Effect::Hide]);
    assert!(session.dispatch(Intent::Cancel, &engine).is_empty());

    session.dispatch(input("@/"), &engine);
    assert_eq!(session.dispatch(Intent::Blur, &engine), vec![Effect::Hide]);
    assert!(!session.is_open());
}

#[test]
fn test_search_override_persists_while_prefix_unchanged() {
    let engine = create_test_engine();
    let mut session = engine.session();

    let effects = session.dispatch(input("@/cards/"), &engine);
    assert_eq!(effects[0], Effect::SearchMode(true));
    assert!(session.search_mode());

    session.dispatch(Intent::Search("Weekly".to_string()), &engine);
    assert_eq!(paths(session.items()), vec!["cards/c3"]);

    // Typing more keeps the search box value
    let effects = session.dispatch(input("@/cards/O"), &engine);
    assert!(!effects.contains(&Effect::SearchMode(true)));
    assert_eq!(paths(session.items()), vec!["cards/c3"]);

    // A different prefix starts over
    session.dispatch(input("@/cards/O #/edit/card/"), &engine);
    assert_eq!(session.request().unwrap().search_query, None);
    assert_eq!(
        paths(session.items()),
        vec!["edit/card/c1", "edit/card/c2", "edit/card/c3"]
    );
}

#[test]
fn test_search_filters_static_children_in_search_mode() {
    let engine = create_test_engine();
    let mut session = engine.session();

    let effects = session.dispatch(input("@/"), &engine);
    assert_eq!(effects[0], Effect::SearchMode(true));
    assert_eq!(session.items().len(), 5);

    let effects = session.dispatch(Intent::Search("lib".to_string()), &engine);
    assert_eq!(paths(session.items()), vec!["library/"]);
    assert_eq!(
        effects,
        vec![Effect::Show {
            prefix: Prefix::Target,
            path: String::new(),
            items: session.items().to_vec(),
            selected: 0,
        }]
    );

    session.dispatch(Intent::Search(String::new()), &engine);
    assert_eq!(session.items().len(), 5);
}

#[test]
fn test_search_ignored_outside_search_mode() {
    let engine = create_test_engine();
    let mut session = engine.session();
    session.dispatch(input("#/create/"), &engine);
    assert!(!session.search_mode());

    assert!(
        session
            .dispatch(Intent::Search("x".to_string()), &engine)
            .is_empty()
    );
    assert_eq!(session.items().len(), 5);
}

#[test]
fn test_sessions_are_independent() {
    let engine = create_test_engine();
    let mut first = engine.session();
    let second = engine.session();

    first.dispatch(input("@/"), &engine);
    assert!(first.is_open());
    assert!(!second.is_open());
}
