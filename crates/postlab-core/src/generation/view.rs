//! Per-platform presentation state tracked alongside generation results.

use serde::{Deserialize, Serialize};

/// UI-facing state for one platform's result.
///
/// Lives exactly as long as the outcome it annotates: replacing a platform's
/// outcome resets its view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformViewState {
    /// Index into the drafts list, or `None` to display the final content.
    pub selected_draft: Option<usize>,
    /// The displayed content has been archived.
    pub saved: bool,
    /// An archive call is in flight.
    pub saving: bool,
}

impl PlatformViewState {
    /// The state a freshly generated outcome starts in: the last draft
    /// preselected when drafts exist, nothing saved or saving.
    pub fn for_drafts(draft_count: usize) -> Self {
        Self {
            selected_draft: draft_count.checked_sub(1),
            saved: false,
            saving: false,
        }
    }

    /// Applies a selection request, clamped to the available drafts.
    pub fn select(&mut self, index: Option<usize>, draft_count: usize) {
        self.selected_draft = match index {
            Some(_) if draft_count == 0 => None,
            Some(i) => Some(i.min(draft_count - 1)),
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_preselects_last_draft() {
        assert_eq!(PlatformViewState::for_drafts(4).selected_draft, Some(3));
        assert_eq!(PlatformViewState::for_drafts(0).selected_draft, None);
    }

    #[test]
    fn test_select_clamps_to_range() {
        let mut view = PlatformViewState::for_drafts(3);

        view.select(Some(1), 3);
        assert_eq!(view.selected_draft, Some(1));

        view.select(Some(99), 3);
        assert_eq!(view.selected_draft, Some(2));

        view.select(None, 3);
        assert_eq!(view.selected_draft, None);
    }

    #[test]
    fn test_select_without_drafts_always_lands_on_final() {
        let mut view = PlatformViewState::for_drafts(0);
        view.select(Some(2), 0);
        assert_eq!(view.selected_draft, None);
    }
}
