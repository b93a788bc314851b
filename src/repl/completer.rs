//! Completer for reedline - turns command-token completions into suggestions

use reedline::{Completer, Span, Suggestion};

use crate::completion::{CompletionEngine, CompletionSession, Intent};

/// Completer for `@/` and `#/` tokens
pub struct SymposiumCompleter {
    /// Completion engine shared with the rest of the REPL
    engine: CompletionEngine,

    /// Selection state for the token being completed
    session: CompletionSession,
}

impl SymposiumCompleter {
    /// Create a new completer
    ///
    /// # Arguments
    /// * `engine` - Completion engine
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(engine: CompletionEngine) -> Self {
        let session = engine.session();
        Self { engine, session }
    }
}

impl Completer for SymposiumCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - One suggestion per resolved item, each replacing
    ///   the token at the cursor
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        self.session.dispatch(
            Intent::Input {
                buffer: line.to_string(),
                cursor: pos,
            },
            &self.engine,
        );

        let Some(prefix) = self.session.request().map(|request| request.prefix) else {
            return Vec::new();
        };

        self.session
            .items()
            .iter()
            .map(|item| {
                let splice = self.engine.apply_selection(line, pos, prefix, item);
                Suggestion {
                    value: splice.insertion,
                    description: Some(item.label.clone()),
                    span: Span::new(splice.replaced.start, splice.replaced.end),
                    append_whitespace: false,
                    ..Default::default()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{BindingTable, NavigationSchema};
    use crate::store::{Resource, SharedStore, StoreSnapshot};

    fn create_test_completer() -> SymposiumCompleter {
        let store = SharedStore::new(StoreSnapshot::new().with_collection(
            "tags",
            vec![
                Resource::new("t1").with_field("name", "research"),
                Resource::new("t2").with_field("name", "ops"),
            ],
        ));
        let engine =
            CompletionEngine::new(NavigationSchema::builtin(), BindingTable::builtin(), store)
                .unwrap();
        SymposiumCompleter::new(engine)
    }

    #[test]
    fn test_complete_static_branch() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("see @/lib", 9);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "@/library/");
        assert_eq!(suggestions[0].description.as_deref(), Some("Library"));
        assert_eq!(suggestions[0].span, Span::new(4, 9));
    }

    #[test]
    fn test_complete_terminal_appends_space() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("#/create/ta", 11);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "#/create/tag ");
        assert!(!suggestions[0].append_whitespace);
    }

    #[test]
    fn test_complete_dynamic_resources() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("@/tags/", 7);

        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["@/tags/t1 ", "@/tags/t2 "]);
        assert!(
            suggestions[0]
                .description
                .as_deref()
                .is_some_and(|d| d.contains("research"))
        );
    }

    #[test]
    fn test_no_suggestions_outside_token() {
        let mut completer = create_test_completer();
        assert!(completer.complete("hello world", 11).is_empty());
        assert!(completer.complete("mail@/x", 7).is_empty());
    }

    #[test]
    fn test_span_covers_trailing_whitespace_for_terminal() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("#/create/ta   next", 11);

        assert_eq!(suggestions[0].span, Span::new(0, 14));
    }
}
