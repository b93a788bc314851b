//! Completion session state machine
//!
//! A session is either closed or open on a list of items with a selected
//! index. Front ends feed it [`Intent`]s and render the [`Effect`]s it
//! returns; the session never touches the terminal itself.

use tracing::trace;

use super::engine::CompletionEngine;
use super::resolver::{CompletionItem, CompletionRequest};
use super::schema::Prefix;
use super::trigger::Trigger;

/// Navigation direction through the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn step(self, index: usize, len: usize) -> usize {
        match self {
            Direction::Up => (index + len - 1) % len,
            Direction::Down => (index + 1) % len,
        }
    }
}

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Buffer or cursor changed
    Input { buffer: String, cursor: usize },
    /// Move the selection
    Navigate(Direction),
    /// Accept the selected item
    Accept,
    /// Dismiss explicitly
    Cancel,
    /// Input lost focus
    Blur,
    /// Search box changed
    Search(String),
}

/// Something the front end should render or apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a freshly computed item list
    Show {
        prefix: Prefix,
        path: String,
        items: Vec<CompletionItem>,
        selected: usize,
    },
    /// Highlight another item
    Select(usize),
    /// Replace the input buffer and move the cursor
    Replace { buffer: String, cursor: usize },
    /// Show or hide the search box
    SearchMode(bool),
    /// Close the completion list
    Hide,
}

#[derive(Debug, Clone)]
struct OpenState {
    request: CompletionRequest,
    items: Vec<CompletionItem>,
    selected: usize,
    search_mode: bool,
    buffer: String,
    cursor: usize,
}

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Closed,
    Open(OpenState),
}

/// Selection state of one input field
#[derive(Debug, Clone, Default)]
pub struct CompletionSession {
    state: SessionState,
}

impl CompletionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an intent and report what changed
    ///
    /// # Arguments
    /// * `intent` - What the user did
    /// * `engine` - Engine used to resolve and splice
    ///
    /// # Returns
    /// * `Vec<Effect>` - Effects in the order they should be applied
    pub fn dispatch(&mut self, intent: Intent, engine: &CompletionEngine) -> Vec<Effect> {
        trace!("Dispatching {:?}", intent);
        match intent {
            Intent::Input { buffer, cursor } => self.input(buffer, cursor, engine),
            Intent::Navigate(direction) => self
                .navigate(direction)
                .map(Effect::Select)
                .into_iter()
                .collect(),
            Intent::Accept => self.accept(engine),
            Intent::Cancel | Intent::Blur => self.close(),
            Intent::Search(query) => self.search(query, engine),
        }
    }

    /// Move the selection with wrap-around
    ///
    /// # Returns
    /// * `Option<usize>` - New index; `None` when closed or empty
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let SessionState::Open(open) = &mut self.state else {
            return None;
        };
        if open.items.is_empty() {
            return None;
        }
        open.selected = direction.step(open.selected, open.items.len());
        Some(open.selected)
    }

    /// Item under the selection
    pub fn current_selection(&self) -> Option<&CompletionItem> {
        match &self.state {
            SessionState::Open(open) => open.items.get(open.selected),
            SessionState::Closed => None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::Open(open) => Some(open.selected),
            SessionState::Closed => None,
        }
    }

    pub fn items(&self) -> &[CompletionItem] {
        match &self.state {
            SessionState::Open(open) => &open.items,
            SessionState::Closed => &[],
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    pub fn search_mode(&self) -> bool {
        matches!(&self.state, SessionState::Open(open) if open.search_mode)
    }

    /// Request the current items were computed from
    pub fn request(&self) -> Option<&CompletionRequest> {
        match &self.state {
            SessionState::Open(open) => Some(&open.request),
            SessionState::Closed => None,
        }
    }

    fn input(&mut self, buffer: String, cursor: usize, engine: &CompletionEngine) -> Vec<Effect> {
        let Some(trigger) = Trigger::detect(&buffer, cursor) else {
            return self.close();
        };

        let (was_searching, kept_query) = match &self.state {
            SessionState::Open(open) if open.request.prefix == trigger.prefix => {
                (Some(open.search_mode), open.request.search_query.clone())
            }
            SessionState::Open(open) => (Some(open.search_mode), None),
            SessionState::Closed => (None, None),
        };

        let search_mode = engine.needs_search(trigger.prefix, &trigger.path);
        let request = CompletionRequest {
            prefix: trigger.prefix,
            raw_path: trigger.path,
            search_query: if search_mode { kept_query } else { None },
        };
        let items = engine.resolve_request(&request);

        let mut effects = Vec::new();
        if was_searching != Some(search_mode) {
            effects.push(Effect::SearchMode(search_mode));
        }
        effects.push(Effect::Show {
            prefix: request.prefix,
            path: request.raw_path.clone(),
            items: items.clone(),
            selected: 0,
        });

        self.state = SessionState::Open(OpenState {
            request,
            items,
            selected: 0,
            search_mode,
            buffer,
            cursor,
        });
        effects
    }

    fn accept(&mut self, engine: &CompletionEngine) -> Vec<Effect> {
        let SessionState::Open(open) = &self.state else {
            return Vec::new();
        };
        let Some(item) = open.items.get(open.selected) else {
            return Vec::new();
        };

        let splice = engine.apply_selection(&open.buffer, open.cursor, open.request.prefix, item);
        let branch = item.is_branch();

        let mut effects = vec![Effect::Replace {
            buffer: splice.buffer.clone(),
            cursor: splice.cursor,
        }];
        if branch {
            effects.extend(self.input(splice.buffer, splice.cursor, engine));
        } else {
            self.state = SessionState::Closed;
            effects.push(Effect::Hide);
        }
        effects
    }

    fn search(&mut self, query: String, engine: &CompletionEngine) -> Vec<Effect> {
        let SessionState::Open(open) = &mut self.state else {
            return Vec::new();
        };
        if !open.search_mode {
            return Vec::new();
        }

        open.request.search_query = Some(query);
        open.items = engine.resolve_request(&open.request);
        open.selected = 0;

        vec![Effect::Show {
            prefix: open.request.prefix,
            path: open.request.raw_path.clone(),
            items: open.items.clone(),
            selected: 0,
        }]
    }

    fn close(&mut self) -> Vec<Effect> {
        match std::mem::take(&mut self.state) {
            SessionState::Open(_) => vec![Effect::Hide],
            SessionState::Closed => Vec::new(),
        }
    }
}
