//! Non-persistent view filters over rendered items.
//!
//! # Invariants
//! - Filters only flip `VisibleItem::hidden`; store and storage are untouched.
//! - An item is shown iff it matches the search term AND the status mode.
//! - The visible set is recomputed from both predicates on every change.

use crate::view::renderer::{Renderer, VisibleItem};
use log::{debug, warn};
use regex::{Regex, RegexBuilder};

/// Completion-status filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Done,
    Pending,
}

impl StatusFilter {
    /// Parses a filter control value. `todo` is accepted for `pending`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "done" => Some(Self::Done),
            "pending" | "todo" => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Done => "done",
            Self::Pending => "pending",
        }
    }

    pub fn matches(self, done: bool) -> bool {
        match self {
            Self::All => true,
            Self::Done => done,
            Self::Pending => !done,
        }
    }
}

#[derive(Debug, Clone)]
enum SearchMatcher {
    Any,
    Pattern(Regex),
    // Used only if the escaped term exceeds the regex size limit.
    Lowercase(String),
}

impl SearchMatcher {
    fn build(term: &str) -> Self {
        if term.is_empty() {
            return Self::Any;
        }
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Self::Pattern(pattern),
            Err(err) => {
                warn!(
                    "event=search_compile module=filter status=fallback term_len={} error={err}",
                    term.chars().count()
                );
                Self::Lowercase(term.to_lowercase())
            }
        }
    }

    fn is_match(&self, label: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(pattern) => pattern.is_match(label),
            Self::Lowercase(needle) => label.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Combined search + status filter state.
#[derive(Debug, Clone)]
pub struct ViewFilter {
    term: String,
    matcher: SearchMatcher,
    status: StatusFilter,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            term: String::new(),
            matcher: SearchMatcher::Any,
            status: StatusFilter::All,
        }
    }
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    /// Sets the search term (raw, untrimmed) and recomputes visibility.
    pub fn search(&mut self, renderer: &mut Renderer, term: &str) -> usize {
        self.term = term.to_string();
        self.matcher = SearchMatcher::build(term);
        self.apply(renderer)
    }

    /// Clears the search term and recomputes visibility.
    pub fn clear_search(&mut self, renderer: &mut Renderer) -> usize {
        self.search(renderer, "")
    }

    /// Sets the status mode and recomputes visibility.
    pub fn filter_by_status(&mut self, renderer: &mut Renderer, mode: StatusFilter) -> usize {
        self.status = mode;
        self.apply(renderer)
    }

    /// Returns whether `item` passes both predicates.
    pub fn matches(&self, item: &VisibleItem) -> bool {
        self.status.matches(item.done) && self.matcher.is_match(&item.label)
    }

    /// Recomputes `hidden` for every rendered item. Returns the shown count.
    pub fn apply(&self, renderer: &mut Renderer) -> usize {
        let mut shown = 0;
        for item in renderer.items_mut() {
            item.hidden = !self.matches(item);
            if !item.hidden {
                shown += 1;
            }
        }
        debug!(
            "event=filter_apply module=filter status=ok mode={} term_len={} shown={}",
            self.status.as_str(),
            self.term.chars().count(),
            shown
        );
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::{StatusFilter, ViewFilter};
    use crate::model::task::Task;
    use crate::view::renderer::Renderer;

    fn renderer() -> Renderer {
        let mut walk = Task::new(2, "Walk dog");
        walk.done = true;
        let mut renderer = Renderer::new();
        renderer.render_all(&[Task::new(1, "Buy milk"), walk, Task::new(3, "Buy bread")]);
        renderer
    }

    fn shown_labels(renderer: &Renderer) -> Vec<&str> {
        renderer
            .visible_items()
            .map(|item| item.label.as_str())
            .collect()
    }

    #[test]
    fn search_is_case_insensitive_and_empty_matches_all() {
        let mut renderer = renderer();
        let mut filter = ViewFilter::new();

        assert_eq!(filter.search(&mut renderer, "MILK"), 1);
        assert_eq!(shown_labels(&renderer), ["Buy milk"]);

        assert_eq!(filter.search(&mut renderer, ""), 3);
    }

    #[test]
    fn search_treats_term_literally() {
        let mut renderer = Renderer::new();
        renderer.render_all(&[Task::new(1, "fix (a+b)"), Task::new(2, "fix ab")]);
        let mut filter = ViewFilter::new();

        filter.search(&mut renderer, "(a+b)");
        assert_eq!(shown_labels(&renderer), ["fix (a+b)"]);
    }

    #[test]
    fn search_keeps_untrimmed_term() {
        let mut renderer = renderer();
        let mut filter = ViewFilter::new();

        filter.search(&mut renderer, "buy ");
        assert_eq!(filter.term(), "buy ");
        assert_eq!(shown_labels(&renderer), ["Buy milk", "Buy bread"]);
    }

    #[test]
    fn status_and_search_compose() {
        let mut renderer = renderer();
        let mut filter = ViewFilter::new();

        filter.filter_by_status(&mut renderer, StatusFilter::Pending);
        assert_eq!(shown_labels(&renderer), ["Buy milk", "Buy bread"]);

        filter.search(&mut renderer, "bread");
        assert_eq!(shown_labels(&renderer), ["Buy bread"]);

        filter.filter_by_status(&mut renderer, StatusFilter::Done);
        assert!(shown_labels(&renderer).is_empty());

        filter.clear_search(&mut renderer);
        assert_eq!(shown_labels(&renderer), ["Walk dog"]);
    }

    #[test]
    fn status_filter_parses_control_values() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("Done"), Some(StatusFilter::Done));
        assert_eq!(StatusFilter::parse("todo"), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("pending"), Some(StatusFilter::Pending));
        assert_eq!(StatusFilter::parse("archived"), None);
    }
}
