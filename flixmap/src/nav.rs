//! Page navigation: search -> results -> details and back again

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::TitleSummary;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Page {
    #[default]
    Search,
    Results {
        items: Vec<TitleSummary>,
    },
    /// Keeps the result list so going back restores it.
    Details {
        items: Vec<TitleSummary>,
        title: TitleSummary,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PageKind {
    Search,
    Results,
    Details,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    SubmitResults(Vec<TitleSummary>),
    SelectTitle(TitleSummary),
    Back,
}

/// Owns the current page and the data handed between pages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Navigator {
    page: Page,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn kind(&self) -> PageKind {
        match self.page {
            Page::Search => PageKind::Search,
            Page::Results { .. } => PageKind::Results,
            Page::Details { .. } => PageKind::Details,
        }
    }

    /// Result list for the results page, or the one behind the details page.
    pub fn items(&self) -> &[TitleSummary] {
        match &self.page {
            Page::Search => &[],
            Page::Results { items } | Page::Details { items, .. } => items,
        }
    }

    pub fn selected(&self) -> Option<&TitleSummary> {
        match &self.page {
            Page::Details { title, .. } => Some(title),
            _ => None,
        }
    }

    /// Applies a transition. Returns false, leaving the page untouched, when
    /// the transition is not valid from the current page.
    pub fn dispatch(&mut self, transition: Transition) -> bool {
        let page = std::mem::take(&mut self.page);
        let (next, applied) = match (page, transition) {
            (Page::Search | Page::Results { .. }, Transition::SubmitResults(items)) => {
                (Page::Results { items }, true)
            }
            (Page::Results { items }, Transition::SelectTitle(title)) => {
                (Page::Details { items, title }, true)
            }
            (Page::Results { .. }, Transition::Back) => (Page::Search, true),
            (Page::Details { items, .. }, Transition::Back) => (Page::Results { items }, true),
            (page, _) => (page, false),
        };
        self.page = next;
        applied
    }
}
