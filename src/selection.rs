use crate::choice::parse_choice;
use std::collections::BTreeSet;

/// Per-session chooser state: which candidates are picked, whether to enqueue
/// instead of play, and an optional command to run instead of the player.
///
/// Indices are 1-based positions into the candidate list the model was built
/// for. Values outside `1..=len` are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    len: usize,
    selected: BTreeSet<usize>,
    pub enqueue: bool,
    pub override_command: Option<String>,
}

/// What a chooser hands back to its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooserOutcome {
    pub paths: Vec<String>,
    pub enqueue: bool,
    pub override_command: Option<String>,
}

impl SelectionModel {
    pub fn new(len: usize, enqueue: bool, override_command: Option<String>) -> Self {
        SelectionModel {
            len,
            selected: BTreeSet::new(),
            enqueue,
            override_command: override_command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Set `index` to `new_state`. Out-of-range indices are ignored.
    /// Returns whether the set changed.
    pub fn toggle(&mut self, index: usize, new_state: bool) -> bool {
        if index == 0 || index > self.len {
            return false;
        }
        if new_state {
            self.selected.insert(index)
        } else {
            self.selected.remove(&index)
        }
    }

    /// Replace the whole selection with the indices parsed from `text`.
    ///
    /// Returns every diagnostic produced: grammar errors first, then one
    /// "Invalid result index" line per pick that reaches outside `1..=len`,
    /// in input order. The in-range part of such a range is still selected.
    pub fn replace_from_text(&mut self, text: &str) -> Vec<String> {
        let parsed = parse_choice(text);
        let mut diagnostics = parsed.errors;

        self.selected.clear();
        let last_valid = i64::try_from(self.len).unwrap_or(i64::MAX);
        for pick in parsed.picks {
            let (first, last) = (*pick.start(), *pick.end());
            if first < 1 || last > last_valid {
                diagnostics.push(if first == last {
                    format!("Invalid result index: {}", first)
                } else {
                    format!("Invalid result index: {}:{}", first, last)
                });
            }
            let (low, high) = (first.max(1), last.min(last_valid));
            if low <= high {
                // Both bounds lie in 1..=len here, so they fit in usize.
                self.selected.extend(low as usize..=high as usize);
            }
        }
        diagnostics
    }

    /// Look for a `q` anywhere in the raw input. If found, force enqueue mode
    /// and return the input with every `q`/`Q` removed; otherwise return it
    /// unchanged.
    ///
    /// Stripping happens inside tokens too, so `3q` still selects 3 but a bad
    /// token such as `xq` is later reported as `x`.
    pub fn apply_queue_hint(&mut self, text: &str) -> String {
        if !text.contains(['q', 'Q']) {
            return text.to_string();
        }
        self.enqueue = true;
        text.chars().filter(|c| !matches!(c, 'q' | 'Q')).collect()
    }

    /// Selected candidates in candidate-list order, whatever order they were
    /// picked in.
    pub fn ordered_selection(&self, candidates: &[String]) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|&index| candidates.get(index - 1).cloned())
            .collect()
    }

    /// Ascending, space-separated indices. Feeding this back through
    /// `replace_from_text` reproduces the same set.
    pub fn render_as_text(&self) -> String {
        self.selected
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn into_outcome(self, candidates: &[String]) -> ChooserOutcome {
        ChooserOutcome {
            paths: self.ordered_selection(candidates),
            enqueue: self.enqueue,
            override_command: self.override_command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("/music/track{:02}.ogg", i)).collect()
    }

    #[test]
    fn toggle_on_then_off_restores_prior_set() {
        let mut model = SelectionModel::new(5, false, None);
        model.toggle(2, true);
        let before = model.clone();

        assert!(model.toggle(4, true));
        assert!(model.toggle(4, false));
        assert_eq!(model, before);
    }

    #[test]
    fn toggle_rejects_out_of_range_silently() {
        let mut model = SelectionModel::new(3, false, None);
        assert!(!model.toggle(0, true));
        assert!(!model.toggle(4, true));
        assert_eq!(model.selected_count(), 0);
    }

    #[test]
    fn toggle_is_idempotent_per_state() {
        let mut model = SelectionModel::new(3, false, None);
        assert!(model.toggle(1, true));
        assert!(!model.toggle(1, true));
        assert_eq!(model.selected_count(), 1);
    }

    #[test]
    fn ordered_selection_follows_candidate_order() {
        let list = candidates(5);
        let mut model = SelectionModel::new(5, false, None);
        model.toggle(5, true);
        model.toggle(2, true);
        assert_eq!(
            model.ordered_selection(&list),
            vec![list[1].clone(), list[4].clone()]
        );
    }

    #[test]
    fn replace_from_text_replaces_prior_state() {
        let mut model = SelectionModel::new(5, false, None);
        model.toggle(1, true);
        let diagnostics = model.replace_from_text("2 3");
        assert!(diagnostics.is_empty());
        assert_eq!(model.render_as_text(), "2 3");
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut model = SelectionModel::new(5, false, None);
        let diagnostics = model.replace_from_text("9");
        assert_eq!(model.selected_count(), 0);
        assert_eq!(diagnostics, vec!["Invalid result index: 9".to_string()]);
    }

    #[test]
    fn zero_and_negative_indices_are_invalid() {
        let mut model = SelectionModel::new(5, false, None);
        let diagnostics = model.replace_from_text("0 -2 1");
        assert_eq!(model.render_as_text(), "1");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn huge_range_is_clipped_to_the_list() {
        let mut model = SelectionModel::new(5, false, None);
        let diagnostics = model.replace_from_text("4:99999999999999999");
        assert_eq!(model.render_as_text(), "4 5");
        assert_eq!(
            diagnostics,
            vec!["Invalid result index: 4:99999999999999999".to_string()]
        );
    }

    #[test]
    fn full_i64_range_selects_everything_once() {
        let mut model = SelectionModel::new(3, false, None);
        let diagnostics = model.replace_from_text(&format!("{}:{}", i64::MIN, i64::MAX));
        assert_eq!(model.render_as_text(), "1 2 3");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn range_entirely_outside_selects_nothing() {
        let mut model = SelectionModel::new(3, false, None);
        let diagnostics = model.replace_from_text("7:9 -4:0");
        assert_eq!(model.selected_count(), 0);
        assert_eq!(
            diagnostics,
            vec![
                "Invalid result index: 7:9".to_string(),
                "Invalid result index: -4:0".to_string(),
            ]
        );
    }

    #[test]
    fn render_then_replace_round_trips() {
        let list = candidates(12);
        for picks in [vec![], vec![1], vec![12, 3, 7], vec![1, 2, 3, 4, 5, 6]] {
            let mut model = SelectionModel::new(list.len(), false, None);
            for &p in &picks {
                model.toggle(p, true);
            }
            let mut restored = SelectionModel::new(list.len(), false, None);
            let diagnostics = restored.replace_from_text(&model.render_as_text());
            assert!(diagnostics.is_empty());
            assert_eq!(restored, model);
        }
    }

    #[test]
    fn queue_hint_forces_enqueue_and_strips_q() {
        let mut model = SelectionModel::new(5, false, None);
        let rest = model.apply_queue_hint("1 3 q");
        assert!(model.enqueue);
        assert_eq!(model.replace_from_text(&rest), Vec::<String>::new());
        assert_eq!(model.render_as_text(), "1 3");
    }

    #[test]
    fn queue_hint_inside_token_keeps_valid_parse() {
        let mut model = SelectionModel::new(5, false, None);
        let rest = model.apply_queue_hint("Q2 4q");
        assert!(model.enqueue);
        model.replace_from_text(&rest);
        assert_eq!(model.render_as_text(), "2 4");
    }

    #[test]
    fn queue_hint_absent_leaves_flag_alone() {
        let mut model = SelectionModel::new(5, false, None);
        assert_eq!(model.apply_queue_hint("1 2"), "1 2");
        assert!(!model.enqueue);
    }

    #[test]
    fn blank_override_command_is_none() {
        assert_eq!(SelectionModel::new(1, false, Some("  ".into())).override_command, None);
        assert_eq!(
            SelectionModel::new(1, false, Some("mpv".into())).override_command,
            Some("mpv".to_string())
        );
    }

    #[test]
    fn outcome_for_five_candidates_with_queue_hint() {
        let list = candidates(5);
        let mut model = SelectionModel::new(list.len(), false, None);
        let rest = model.apply_queue_hint("1 3 q");
        model.replace_from_text(&rest);
        let outcome = model.into_outcome(&list);
        assert_eq!(outcome.paths, vec![list[0].clone(), list[2].clone()]);
        assert!(outcome.enqueue);
    }
}
