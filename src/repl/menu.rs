//! Completion menu that stays open across branch selections
//!
//! Accepting `@/library/` leaves the cursor on a new branch path. Instead of
//! closing, the menu reactivates and lists the children of that branch. A
//! terminal selection closes it as usual.

use std::cell::Cell;

use reedline::{
    ColumnarMenu, Completer, Editor, Menu, MenuEvent, MenuSettings, Painter, Suggestion,
};

use crate::completion::CompletionEngine;

/// Columnar menu that reopens after a branch suggestion is accepted
pub struct BranchMenu {
    inner: ColumnarMenu,
    engine: CompletionEngine,

    /// Set by `replace_in_buffer` when the accepted value opened a branch
    reopen: Cell<bool>,
}

impl BranchMenu {
    pub fn new(inner: ColumnarMenu, engine: CompletionEngine) -> Self {
        Self {
            inner,
            engine,
            reopen: Cell::new(false),
        }
    }

    /// Whether the cursor sits after a branch path that has suggestions
    fn continues_branch(&self, editor: &Editor) -> bool {
        let cursor = editor.line_buffer().insertion_point();
        self.engine
            .complete_at(editor.get_buffer(), cursor)
            .is_some_and(|(trigger, items)| trigger.path.ends_with('/') && !items.is_empty())
    }
}

impl Menu for BranchMenu {
    fn settings(&self) -> &MenuSettings {
        self.inner.settings()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn indicator(&self) -> &str {
        self.inner.indicator()
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn menu_event(&mut self, event: MenuEvent) {
        if matches!(event, MenuEvent::Deactivate) && self.reopen.replace(false) {
            self.inner.menu_event(MenuEvent::Deactivate);
            self.inner.menu_event(MenuEvent::Activate(false));
            return;
        }
        self.inner.menu_event(event);
    }

    fn can_quick_complete(&self) -> bool {
        self.inner.can_quick_complete()
    }

    fn can_partially_complete(
        &mut self,
        values_updated: bool,
        editor: &mut Editor,
        completer: &mut dyn Completer,
    ) -> bool {
        self.inner
            .can_partially_complete(values_updated, editor, completer)
    }

    fn update_values(&mut self, editor: &mut Editor, completer: &mut dyn Completer) {
        self.inner.update_values(editor, completer);
    }

    fn update_working_details(
        &mut self,
        editor: &mut Editor,
        completer: &mut dyn Completer,
        painter: &Painter,
    ) {
        self.inner.update_working_details(editor, completer, painter);
    }

    fn replace_in_buffer(&self, editor: &mut Editor) {
        self.inner.replace_in_buffer(editor);
        self.reopen.set(self.continues_branch(editor));
    }

    fn menu_required_lines(&self, terminal_columns: u16) -> u16 {
        self.inner.menu_required_lines(terminal_columns)
    }

    fn menu_string(&self, available_lines: u16, use_ansi_coloring: bool) -> String {
        self.inner.menu_string(available_lines, use_ansi_coloring)
    }

    fn min_rows(&self) -> u16 {
        self.inner.min_rows()
    }

    fn get_values(&self) -> &[Suggestion] {
        self.inner.get_values()
    }

    fn set_cursor_pos(&mut self, pos: (u16, u16)) {
        self.inner.set_cursor_pos(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{BindingTable, NavigationSchema};
    use crate::repl::SymposiumCompleter;
    use crate::store::{Resource, SharedStore, StoreSnapshot};
    use reedline::{MenuBuilder, UndoBehavior};

    fn create_test_engine() -> CompletionEngine {
        let store = SharedStore::new(StoreSnapshot::new().with_collection(
            "tags",
            vec![Resource::new("t1").with_field("name", "research")],
        ));
        CompletionEngine::new(NavigationSchema::builtin(), BindingTable::builtin(), store)
            .unwrap()
    }

    fn editor_with(line: &str) -> Editor {
        let mut editor = Editor::default();
        editor.edit_buffer(
            |buffer| buffer.set_buffer(line.to_string()),
            UndoBehavior::CreateUndoPoint,
        );
        editor
    }

    /// Activate, pick the first suggestion and accept it like reedline's Enter
    fn accept_first(line: &str) -> (BranchMenu, Editor) {
        let engine = create_test_engine();
        let mut menu = BranchMenu::new(
            ColumnarMenu::default().with_name("completion_menu"),
            engine.clone(),
        );
        let mut completer = SymposiumCompleter::new(engine);
        let mut editor = editor_with(line);

        menu.menu_event(MenuEvent::Activate(false));
        menu.update_values(&mut editor, &mut completer);
        menu.replace_in_buffer(&mut editor);
        menu.menu_event(MenuEvent::Deactivate);
        (menu, editor)
    }

    #[test]
    fn test_branch_accept_keeps_menu_open() {
        let (menu, editor) = accept_first("@/lib");
        assert_eq!(editor.get_buffer(), "@/library/");
        assert!(menu.is_active());
    }

    #[test]
    fn test_terminal_accept_closes_menu() {
        let (menu, editor) = accept_first("#/create/ta");
        assert_eq!(editor.get_buffer(), "#/create/tag ");
        assert!(!menu.is_active());
    }

    #[test]
    fn test_plain_deactivate_closes_menu() {
        let engine = create_test_engine();
        let mut menu = BranchMenu::new(ColumnarMenu::default(), engine);

        menu.menu_event(MenuEvent::Activate(false));
        assert!(menu.is_active());
        menu.menu_event(MenuEvent::Deactivate);
        assert!(!menu.is_active());
    }

    #[test]
    fn test_name_delegates() {
        let menu = BranchMenu::new(
            ColumnarMenu::default().with_name("completion_menu"),
            create_test_engine(),
        );
        assert_eq!(menu.name(), "completion_menu");
    }
}
