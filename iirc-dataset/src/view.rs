use crate::{common::*, DatasetError, Result, SamplePool, Setup, TaskSchedule};

/// Which tasks the current view is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "task_id")]
pub enum Selection {
    /// No task is selected and nothing is exposed.
    Unselected,
    /// The samples introduced at one task.
    SingleTask(usize),
    /// The samples introduced at tasks `0..=task_id`.
    Cumulative(usize),
}

impl Selection {
    pub fn task_id(&self) -> Option<usize> {
        match *self {
            Self::Unselected => None,
            Self::SingleTask(task_id) | Self::Cumulative(task_id) => Some(task_id),
        }
    }

    pub fn is_cumulative(&self) -> bool {
        matches!(self, Self::Cumulative(_))
    }
}

/// A pool position exposed in the current view, together with the label
/// whose introduction exposed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exposure {
    pub position: usize,
    pub label: Label,
}

/// The subsampling percentages applied when labels are introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    pub superclass_data_pct: R64,
    pub subclass_data_pct: R64,
}

impl SamplingPolicy {
    /// Get the policy for the setup, or `None` if all samples are exposed.
    pub fn new(setup: &Setup, test_mode: bool) -> Option<Self> {
        match *setup {
            Setup::Iirc {
                superclass_data_pct,
                subclass_data_pct,
            } if !test_mode => Some(Self {
                superclass_data_pct,
                subclass_data_pct,
            }),
            _ => None,
        }
    }

    pub fn pct(&self, kind: LabelKind) -> R64 {
        match kind {
            LabelKind::Superclass => self.superclass_data_pct,
            LabelKind::Subclass => self.subclass_data_pct,
        }
    }

    /// Get the number of exposed samples out of `total` samples of a label.
    pub fn sample_size(&self, kind: LabelKind, total: usize) -> usize {
        let size = (self.pct(kind).raw() * total as f64).round() as usize;
        size.min(total)
    }
}

/// The mutable state of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub(crate) selection: Selection,
    pub(crate) cur_task: IndexSet<Label>,
    pub(crate) seen_labels: IndexSet<Label>,
    pub(crate) exposed: Vec<Exposure>,
    pub(crate) complete_information: bool,
    pub(crate) augmentation_enabled: bool,
}

impl ViewState {
    pub fn new(complete_information: bool) -> Self {
        Self {
            selection: Selection::Unselected,
            cur_task: IndexSet::new(),
            seen_labels: IndexSet::new(),
            exposed: vec![],
            complete_information,
            augmentation_enabled: true,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The labels of the selected task, or of all selected tasks in a
    /// cumulative view.
    pub fn cur_task(&self) -> &IndexSet<Label> {
        &self.cur_task
    }

    /// The labels introduced so far, in order of first introduction.
    pub fn seen_labels(&self) -> &IndexSet<Label> {
        &self.seen_labels
    }

    pub fn exposed(&self) -> &[Exposure] {
        &self.exposed
    }

    pub fn complete_information(&self) -> bool {
        self.complete_information
    }

    pub fn augmentation_enabled(&self) -> bool {
        self.augmentation_enabled
    }

    /// Map an index on the view to the exposure it refers to.
    pub fn exposure(&self, index: usize) -> Result<&Exposure> {
        self.exposed.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.exposed.len(),
        })
    }
}

/// The state machine computing the exposed subset of the sample pool.
///
/// The engine does not own the pool and the schedule. Every transition reads
/// them by reference, so the engine can be reset without touching them.
#[derive(Debug, Clone)]
pub struct ViewEngine {
    state: ViewState,
    sampling: Option<SamplingPolicy>,
    iirc: bool,
    seed: u64,
    rng: StdRng,
}

impl ViewEngine {
    pub fn new(setup: &Setup, test_mode: bool, complete_information: bool, seed: u64) -> Self {
        Self {
            state: ViewState::new(complete_information),
            sampling: SamplingPolicy::new(setup, test_mode),
            iirc: setup.is_iirc(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn sampling(&self) -> Option<&SamplingPolicy> {
        self.sampling.as_ref()
    }

    /// Expose the samples introduced at a task.
    ///
    /// The seen labels are extended with the labels of the task. The indices
    /// of the previous view are invalidated.
    pub fn choose_task<I>(
        &mut self,
        pool: &SamplePool<I>,
        schedule: &TaskSchedule,
        task_id: usize,
    ) -> Result<()> {
        let labels = schedule.labels_at(task_id)?;
        let exposed = self.task_exposure(pool, labels)?;

        let state = &mut self.state;
        state.selection = Selection::SingleTask(task_id);
        state.cur_task = labels.iter().cloned().collect();
        state.seen_labels.extend(labels.iter().cloned());
        state.exposed = exposed;

        info!(
            "selected task {} with {} labels and {} exposed samples",
            task_id,
            state.cur_task.len(),
            state.exposed.len()
        );
        Ok(())
    }

    /// Expose the union of the samples introduced at tasks `0..=task_id`.
    ///
    /// Each task is sampled on its own. A pool position exposed by several
    /// tasks occurs once in the view, attributed to the earliest task.
    pub fn load_tasks_up_to<I>(
        &mut self,
        pool: &SamplePool<I>,
        schedule: &TaskSchedule,
        task_id: usize,
    ) -> Result<()> {
        if self.iirc && !self.state.complete_information {
            return Err(DatasetError::IncompatibleMode);
        }
        if task_id >= schedule.len() {
            return Err(DatasetError::UnknownTask {
                task_id,
                n_tasks: schedule.len(),
            });
        }

        let mut cur_task = IndexSet::new();
        let mut positions = HashSet::new();
        let mut exposed = vec![];

        for id in 0..=task_id {
            let labels = schedule.labels_at(id)?;
            let task_exposed = self.task_exposure(pool, labels)?;
            cur_task.extend(labels.iter().cloned());
            exposed.extend(
                task_exposed
                    .into_iter()
                    .filter(|exposure| positions.insert(exposure.position)),
            );
        }

        let state = &mut self.state;
        state.selection = Selection::Cumulative(task_id);
        state.seen_labels.extend(cur_task.iter().cloned());
        state.cur_task = cur_task;
        state.exposed = exposed;

        info!(
            "loaded tasks 0 to {} with {} labels and {} exposed samples",
            task_id,
            state.cur_task.len(),
            state.exposed.len()
        );
        Ok(())
    }

    /// Go back to the unselected state and forget the seen labels.
    ///
    /// The information mode and the augmentation flag are kept. The sampling
    /// generator is re-seeded, so the task selections after a reset repeat
    /// those of a fresh engine.
    pub fn reset(&mut self) {
        let ViewState {
            complete_information,
            augmentation_enabled,
            ..
        } = self.state;
        self.state = ViewState {
            augmentation_enabled,
            ..ViewState::new(complete_information)
        };
        self.rng = StdRng::seed_from_u64(self.seed);
        info!("view is reset");
    }

    fn task_exposure<I>(&mut self, pool: &SamplePool<I>, labels: &[Label]) -> Result<Vec<Exposure>> {
        let mut exposed = vec![];

        for label in labels {
            let positions = pool.positions_for(label)?;

            let selected: Vec<usize> = match &self.sampling {
                Some(policy) => {
                    let kind = pool.hierarchy().classify(label)?;
                    let size = policy.sample_size(kind, positions.len());
                    debug!(
                        "sample {} out of {} samples for {} '{}'",
                        size,
                        positions.len(),
                        kind,
                        label
                    );

                    if size == positions.len() {
                        positions.to_vec()
                    } else {
                        let mut selected: Vec<usize> = positions
                            .choose_multiple(&mut self.rng, size)
                            .copied()
                            .collect();
                        selected.sort_unstable();
                        selected
                    }
                }
                None => positions.to_vec(),
            };

            exposed.extend(selected.into_iter().map(|position| Exposure {
                position,
                label: label.clone(),
            }));
        }

        Ok(exposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;

    fn cil_fixture() -> (SamplePool<usize>, TaskSchedule) {
        let samples = (0..12)
            .map(|index| {
                let label = ["A", "B", "C", "D"][index % 4];
                Sample::new(index, LabelTuple::single(label))
            })
            .collect();
        let pool = SamplePool::new(samples, &Setup::Cil).unwrap();
        let schedule = TaskSchedule::new(vec![vec!["A", "B"], vec!["C", "D"]]).unwrap();
        schedule.validate(pool.hierarchy()).unwrap();
        (pool, schedule)
    }

    #[test]
    fn sample_size_rounds() {
        let policy = SamplingPolicy {
            superclass_data_pct: r64(0.5),
            subclass_data_pct: r64(0.25),
        };
        assert_eq!(policy.sample_size(LabelKind::Superclass, 30), 15);
        assert_eq!(policy.sample_size(LabelKind::Superclass, 7), 4);
        assert_eq!(policy.sample_size(LabelKind::Subclass, 10), 3);
        assert_eq!(policy.sample_size(LabelKind::Subclass, 0), 0);
    }

    #[test]
    fn no_sampling_in_test_mode_or_cil() {
        assert!(SamplingPolicy::new(&Setup::Cil, false).is_none());
        assert!(SamplingPolicy::new(&Setup::iirc(0.5, 0.5).unwrap(), true).is_none());
        assert!(SamplingPolicy::new(&Setup::iirc(0.5, 0.5).unwrap(), false).is_some());
    }

    #[test]
    fn engine_transitions() {
        let (pool, schedule) = cil_fixture();
        let mut engine = ViewEngine::new(&Setup::Cil, false, true, 0);
        assert_eq!(engine.state().selection(), Selection::Unselected);
        assert!(engine.state().exposed().is_empty());

        engine.choose_task(&pool, &schedule, 1).unwrap();
        assert_eq!(engine.state().selection(), Selection::SingleTask(1));
        assert_eq!(engine.state().exposed().len(), 6);
        assert!(engine
            .state()
            .exposed()
            .iter()
            .all(|exposure| exposure.label == "C" || exposure.label == "D"));

        engine.load_tasks_up_to(&pool, &schedule, 1).unwrap();
        assert_eq!(engine.state().selection(), Selection::Cumulative(1));
        assert_eq!(engine.state().exposed().len(), 12);

        engine.reset();
        assert_eq!(engine.state().selection(), Selection::Unselected);
        assert!(engine.state().seen_labels().is_empty());
        assert!(engine.state().exposed().is_empty());
    }

    #[test]
    fn failed_transition_keeps_state() {
        let (pool, schedule) = cil_fixture();
        let mut engine = ViewEngine::new(&Setup::Cil, false, true, 0);
        engine.choose_task(&pool, &schedule, 0).unwrap();
        let before = engine.state().clone();

        assert!(matches!(
            engine.choose_task(&pool, &schedule, 2),
            Err(DatasetError::UnknownTask { .. })
        ));
        assert!(matches!(
            engine.load_tasks_up_to(&pool, &schedule, 5),
            Err(DatasetError::UnknownTask { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn exposure_lookup() {
        let (pool, schedule) = cil_fixture();
        let mut engine = ViewEngine::new(&Setup::Cil, false, true, 0);
        engine.choose_task(&pool, &schedule, 0).unwrap();

        assert_eq!(engine.state().exposure(0).unwrap().position, 0);
        assert!(matches!(
            engine.state().exposure(6),
            Err(DatasetError::IndexOutOfRange { index: 6, len: 6 })
        ));
    }
}
