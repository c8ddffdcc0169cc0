use crate::{common::*, DatasetError, Result, ViewState};

/// Decide which true labels of an exposed sample are revealed.
///
/// - In the CIL setup the single label is always revealed.
/// - In complete information mode, the true labels are revealed regardless
///   of the current task.
/// - In incomplete information mode, only the true labels of the current
///   task are revealed. A sample labeled `(A, Aa)` exposed by the task that
///   introduces `Aa` alone is revealed as `(Aa)`.
///
/// Incomplete information mode is undefined on a cumulative view and fails
/// with [DatasetError::AmbiguousVisibility].
pub fn resolve_labels(
    iirc: bool,
    position: usize,
    labels: &LabelTuple,
    state: &ViewState,
) -> Result<LabelTuple> {
    if !iirc {
        return Ok(LabelTuple::single(labels.first.clone()));
    }

    if state.selection().task_id().is_none() {
        return Err(DatasetError::TaskNotSelected);
    }
    if state.complete_information() {
        return Ok(labels.clone());
    }
    if state.selection().is_cumulative() {
        return Err(DatasetError::AmbiguousVisibility);
    }

    let mut visible = labels
        .iter()
        .filter(|label| state.cur_task().contains(label.as_str()))
        .cloned();
    let first = visible
        .next()
        .ok_or(DatasetError::NoVisibleLabel { position })?;
    let second = visible.next();

    Ok(LabelTuple { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Selection, TaskSchedule};

    fn schedule() -> TaskSchedule {
        TaskSchedule::new(vec![vec!["A", "B"], vec!["Aa"], vec!["Ab"]]).unwrap()
    }

    fn view_state(selection: Selection, complete_information: bool) -> ViewState {
        let schedule = schedule();
        let mut state = ViewState::new(complete_information);
        state.selection = selection;
        state.cur_task = match selection {
            Selection::Unselected => IndexSet::new(),
            Selection::SingleTask(task_id) => {
                schedule.labels_at(task_id).unwrap().iter().cloned().collect()
            }
            Selection::Cumulative(task_id) => schedule.tasks()[0..=task_id]
                .iter()
                .flatten()
                .cloned()
                .collect(),
        };
        state.seen_labels = state.cur_task.clone();
        state
    }

    #[test]
    fn cil_reveals_single_label() {
        let state = view_state(Selection::SingleTask(0), true);
        let visible =
            resolve_labels(false, 0, &LabelTuple::single("A"), &state).unwrap();
        assert_eq!(visible, LabelTuple::single("A"));
    }

    #[test]
    fn incomplete_hides_superclass() {
        let labels = LabelTuple::pair("A", "Aa");

        let state = view_state(Selection::SingleTask(1), false);
        let visible = resolve_labels(true, 0, &labels, &state).unwrap();
        assert_eq!(visible, LabelTuple::single("Aa"));
        assert_eq!(visible.second, None);

        let state = view_state(Selection::SingleTask(0), false);
        let visible = resolve_labels(true, 0, &labels, &state).unwrap();
        assert_eq!(visible, LabelTuple::single("A"));
    }

    #[test]
    fn complete_reveals_true_labels() {
        let labels = LabelTuple::pair("A", "Aa");

        for task_id in 0..3 {
            let state = view_state(Selection::SingleTask(task_id), true);
            let visible = resolve_labels(true, 0, &labels, &state).unwrap();
            assert_eq!(visible, LabelTuple::pair("A", "Aa"));
        }

        let state = view_state(Selection::SingleTask(0), true);
        let visible = resolve_labels(true, 0, &LabelTuple::single("B"), &state).unwrap();
        assert_eq!(visible, LabelTuple::single("B"));
    }

    #[test]
    fn unselected_view_is_rejected() {
        let state = view_state(Selection::Unselected, true);
        assert!(matches!(
            resolve_labels(true, 0, &LabelTuple::single("A"), &state),
            Err(DatasetError::TaskNotSelected)
        ));
    }

    #[test]
    fn incomplete_on_cumulative_view_is_ambiguous() {
        let labels = LabelTuple::pair("A", "Aa");

        let state = view_state(Selection::Cumulative(1), false);
        assert!(matches!(
            resolve_labels(true, 0, &labels, &state),
            Err(DatasetError::AmbiguousVisibility)
        ));

        let state = view_state(Selection::Cumulative(1), true);
        let visible = resolve_labels(true, 0, &labels, &state).unwrap();
        assert_eq!(visible, LabelTuple::pair("A", "Aa"));
    }

    #[test]
    fn hidden_sample_is_reported() {
        let state = view_state(Selection::SingleTask(2), false);
        assert!(matches!(
            resolve_labels(true, 7, &LabelTuple::pair("A", "Aa"), &state),
            Err(DatasetError::NoVisibleLabel { position: 7 })
        ));
    }
}
