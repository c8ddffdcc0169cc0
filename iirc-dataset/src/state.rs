use crate::{common::*, DatasetError, Exposure, IncrementalDataset, Result, Selection, ViewState};

/// A serializable snapshot of the view of an incremental dataset.
///
/// The snapshot covers the selection, the seen labels, the exposed positions
/// and the information mode. The augmentation flag and the state of the
/// sampling generator are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetState {
    pub selection: Selection,
    pub cur_task: Vec<Label>,
    pub seen_labels: Vec<Label>,
    pub exposed: Vec<Exposure>,
    pub complete_information: bool,
}

impl<I, O> IncrementalDataset<I, O> {
    pub fn state(&self) -> DatasetState {
        let state = self.view_state();
        DatasetState {
            selection: state.selection(),
            cur_task: state.cur_task().iter().cloned().collect(),
            seen_labels: state.seen_labels().iter().cloned().collect(),
            exposed: state.exposed().to_vec(),
            complete_information: state.complete_information(),
        }
    }

    /// Restore a snapshot taken from a dataset with the same pool and
    /// schedule.
    ///
    /// The snapshot is checked against the pool and the schedule before it
    /// is applied. On failure the current view is kept.
    pub fn load_state(&mut self, snapshot: DatasetState) -> Result<()> {
        self.check_state(&snapshot)?;

        let DatasetState {
            selection,
            cur_task,
            seen_labels,
            exposed,
            complete_information,
        } = snapshot;
        let augmentation_enabled = self.augmentation_enabled();

        *self.engine_mut().state_mut() = ViewState {
            selection,
            cur_task: cur_task.into_iter().collect(),
            seen_labels: seen_labels.into_iter().collect(),
            exposed,
            complete_information,
            augmentation_enabled,
        };

        info!(
            "restored view with selection {:?} and {} exposed samples",
            selection,
            self.len()
        );
        Ok(())
    }

    fn check_state(&self, snapshot: &DatasetState) -> Result<()> {
        let invalid = |message: String| Err(DatasetError::InvalidState(message));
        let DatasetState {
            selection,
            cur_task,
            seen_labels,
            exposed,
            complete_information,
        } = snapshot;

        let expected_task: Vec<&Label> = match *selection {
            Selection::Unselected => vec![],
            Selection::SingleTask(task_id) => self.schedule().labels_at(task_id)?.iter().collect(),
            Selection::Cumulative(task_id) => {
                self.schedule().labels_at(task_id)?;
                self.schedule().tasks()[0..=task_id]
                    .iter()
                    .flatten()
                    .collect()
            }
        };
        if !expected_task.iter().copied().eq(cur_task.iter()) {
            return invalid(format!(
                "current task {:?} does not match selection {:?}",
                cur_task, selection
            ));
        }

        if let Some(label) = seen_labels
            .iter()
            .find(|label| !self.hierarchy().contains(label))
        {
            return invalid(format!("unknown seen label '{}'", label));
        }
        if seen_labels.iter().unique().count() != seen_labels.len() {
            return invalid("duplicated seen labels".into());
        }
        if let Some(label) = cur_task.iter().find(|label| !seen_labels.contains(label)) {
            return invalid(format!("label '{}' of the current task is not seen", label));
        }

        if selection.is_cumulative() && self.setup().is_iirc() && !*complete_information {
            return invalid("cumulative view requires complete information mode".into());
        }

        exposed.iter().try_for_each(|exposure| {
            let Exposure { position, label } = exposure;
            let sample = match self.pool().samples().get(*position) {
                Some(sample) => sample,
                None => return invalid(format!("position {} is out of range", position)),
            };
            if !cur_task.contains(label) {
                return invalid(format!(
                    "exposed label '{}' is not part of the current task",
                    label
                ));
            }
            if !sample.labels.contains(label) {
                return invalid(format!(
                    "sample at position {} does not carry label '{}'",
                    position, label
                ));
            }
            Ok(())
        })
    }
}
