//! Navigation hierarchy: a main stack plus a modal stack.
//!
//! Each entry pairs a location with the [`Destination`] the delegate chose for
//! it. Presentation values from the path configuration map onto stack
//! operations here; the navigator decides afterwards whether the new top needs
//! a visit.

use crate::debug_log;
use crate::path_rule::{Context, Presentation};
use url::Url;

/// What the host shows for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination<T> {
    /// The stock web screen.
    Default,
    /// A destination supplied by the delegate.
    Custom(T),
}

/// One screen in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    location: Url,
    destination: Destination<T>,
}

impl<T> Entry<T> {
    /// Create an entry.
    pub fn new(location: Url, destination: Destination<T>) -> Self {
        Self { location, destination }
    }

    /// Location shown by the entry.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Destination shown by the entry.
    pub fn destination(&self) -> &Destination<T> {
        &self.destination
    }
}

/// Stack operation performed by a hierarchy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A new entry was pushed.
    Push,
    /// The top entry was replaced.
    Replace,
    /// The top entry was removed.
    Pop,
    /// The modal stack was dismissed.
    DismissModal,
    /// The main stack was reset to a single new entry.
    ReplaceRoot,
    /// Everything above the main root was removed.
    ClearAll,
    /// Nothing changed.
    None,
}

/// Result of a hierarchy operation, like a route change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyChange {
    /// Top location before the change.
    pub from: Option<Url>,
    /// Top location after the change.
    pub to: Option<Url>,
    /// Operation performed.
    pub kind: ChangeKind,
}

/// Main and modal stacks.
#[derive(Debug, Clone)]
pub struct NavigationHierarchy<T> {
    main: Vec<Entry<T>>,
    modal: Vec<Entry<T>>,
}

impl<T> Default for NavigationHierarchy<T> {
    fn default() -> Self {
        Self {
            main: Vec::new(),
            modal: Vec::new(),
        }
    }
}

impl<T> NavigationHierarchy<T> {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of the main stack, root first.
    pub fn main(&self) -> &[Entry<T>] {
        &self.main
    }

    /// Entries of the modal stack, bottom first.
    pub fn modal(&self) -> &[Entry<T>] {
        &self.modal
    }

    /// Check if a modal stack is presented.
    pub fn is_modal_presented(&self) -> bool {
        !self.modal.is_empty()
    }

    /// Visible entry: the modal top if presented, else the main top.
    pub fn top(&self) -> Option<&Entry<T>> {
        self.modal.last().or_else(|| self.main.last())
    }

    /// Location of the visible entry.
    pub fn current_location(&self) -> Option<&Url> {
        self.top().map(Entry::location)
    }

    /// Total number of entries across both stacks.
    pub fn len(&self) -> usize {
        self.main.len() + self.modal.len()
    }

    /// Return `true` if nothing has been shown yet.
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.modal.is_empty()
    }

    /// Show `location` according to `presentation` in `context`.
    ///
    /// Handles the presentations that put a new entry on screen (`Default`,
    /// `Push`, `Replace`, `ReplaceRoot`). `Pop` and `Refresh` recede, `ClearAll`
    /// clears and `None` leaves the hierarchy untouched.
    pub fn show(
        &mut self,
        location: Url,
        destination: Destination<T>,
        presentation: Presentation,
        context: Context,
    ) -> HierarchyChange {
        let from = self.current_location().cloned();
        let kind = match (presentation, context) {
            (Presentation::Pop | Presentation::Refresh, _) => return self.recede(),
            (Presentation::ClearAll, _) => return self.clear_all(),
            (Presentation::None, _) => ChangeKind::None,
            (Presentation::ReplaceRoot, _) => {
                self.modal.clear();
                self.main.clear();
                self.main.push(Entry::new(location, destination));
                ChangeKind::ReplaceRoot
            }
            (Presentation::Default, Context::Default) => {
                self.modal.clear();
                Self::push_or_replace(&mut self.main, location, destination)
            }
            (Presentation::Default, Context::Modal) => {
                Self::push_or_replace(&mut self.modal, location, destination)
            }
            (Presentation::Push, Context::Default) => {
                self.modal.clear();
                self.main.push(Entry::new(location, destination));
                ChangeKind::Push
            }
            (Presentation::Push, Context::Modal) => {
                self.modal.push(Entry::new(location, destination));
                ChangeKind::Push
            }
            (Presentation::Replace, Context::Default) => {
                self.modal.clear();
                Self::replace_top(&mut self.main, location, destination)
            }
            (Presentation::Replace, Context::Modal) => {
                Self::replace_top(&mut self.modal, location, destination)
            }
        };

        let change = HierarchyChange {
            from,
            to: self.current_location().cloned(),
            kind,
        };
        debug_log!("Hierarchy {:?}: {:?} → {:?}", change.kind, change.from, change.to);
        change
    }

    /// Go back one level: dismiss the modal stack if presented, else pop the
    /// main stack. The main root is never popped.
    pub fn recede(&mut self) -> HierarchyChange {
        let from = self.current_location().cloned();
        let kind = if self.dismiss_modal() {
            ChangeKind::DismissModal
        } else if self.main.len() > 1 {
            self.main.pop();
            ChangeKind::Pop
        } else {
            ChangeKind::None
        };
        HierarchyChange {
            from,
            to: self.current_location().cloned(),
            kind,
        }
    }

    /// Dismiss the modal stack and pop the main stack to its root.
    pub fn clear_all(&mut self) -> HierarchyChange {
        let from = self.current_location().cloned();
        let changed = self.dismiss_modal() | (self.main.len() > 1);
        self.main.truncate(1);
        HierarchyChange {
            from,
            to: self.current_location().cloned(),
            kind: if changed { ChangeKind::ClearAll } else { ChangeKind::None },
        }
    }

    /// Point the visible entry at `to` if it currently shows `from`.
    ///
    /// Used when a visit lands somewhere other than where it was sent.
    pub fn update_top_location(&mut self, from: &Url, to: Url) -> bool {
        let top = self.modal.last_mut().or_else(|| self.main.last_mut());
        match top {
            Some(entry) if entry.location == *from => {
                debug_log!("Hierarchy top moved: '{}' → '{}'", from, to);
                entry.location = to;
                true
            }
            _ => false,
        }
    }

    /// Dismiss the modal stack. Returns `true` if one was presented.
    pub fn dismiss_modal(&mut self) -> bool {
        if self.modal.is_empty() {
            return false;
        }
        self.modal.clear();
        true
    }

    fn push_or_replace(stack: &mut Vec<Entry<T>>, location: Url, destination: Destination<T>) -> ChangeKind {
        if stack.last().map(Entry::location) == Some(&location) {
            Self::replace_top(stack, location, destination)
        } else {
            stack.push(Entry::new(location, destination));
            ChangeKind::Push
        }
    }

    fn replace_top(stack: &mut Vec<Entry<T>>, location: Url, destination: Destination<T>) -> ChangeKind {
        let entry = Entry::new(location, destination);
        match stack.last_mut() {
            Some(top) => {
                *top = entry;
                ChangeKind::Replace
            }
            None => {
                stack.push(entry);
                ChangeKind::Push
            }
        }
    }
}
