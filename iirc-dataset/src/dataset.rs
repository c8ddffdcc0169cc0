use crate::{
    common::*, resolve_labels, BoxTransform, DataRecord, DatasetError, DatasetOptions, Result,
    Sample, SamplePool, Selection, Setup, TaskSchedule, Transform, ViewEngine, ViewState,
};

/// The dataset exposing a task-dependent view of a fixed sample pool.
///
/// The pool, the label hierarchy and the schedule never change after
/// construction. Task selection, cumulative loading, reset and mode toggles
/// take `&mut self`, while reads take `&self`, so reads from many threads are
/// possible between two mutations.
///
/// Indices passed to reads are relative to the current view. The same index
/// refers to unrelated samples before and after a task change.
#[derive(Derivative)]
#[derivative(Debug(bound = "I: Debug"))]
pub struct IncrementalDataset<I, O = I> {
    setup: Setup,
    test_mode: bool,
    pool: SamplePool<I>,
    schedule: TaskSchedule,
    engine: ViewEngine,
    #[derivative(Debug = "ignore")]
    essential_transform: Option<BoxTransform<I, O>>,
    #[derivative(Debug = "ignore")]
    augmentation_transform: Option<BoxTransform<I, O>>,
}

impl<I, O> IncrementalDataset<I, O> {
    pub fn new(
        samples: Vec<Sample<I>>,
        schedule: TaskSchedule,
        options: DatasetOptions,
    ) -> Result<Self> {
        let DatasetOptions {
            setup, test_mode, seed, ..
        } = options;
        setup.validate()?;

        let pool = SamplePool::new(samples, &setup)?;
        schedule.validate(pool.hierarchy())?;

        let engine = ViewEngine::new(
            &setup,
            test_mode,
            options.initial_complete_information(),
            seed,
        );

        info!(
            "built {} dataset with {} samples, {} labels and {} tasks",
            setup.name(),
            pool.len(),
            pool.hierarchy().len(),
            schedule.len()
        );

        Ok(Self {
            setup,
            test_mode,
            pool,
            schedule,
            engine,
            essential_transform: None,
            augmentation_transform: None,
        })
    }

    /// Set the transform that is always applied when augmentation is not.
    pub fn with_essential_transform<T>(self, transform: T) -> Self
    where
        T: 'static + Transform<I, O>,
    {
        Self {
            essential_transform: Some(Box::new(transform)),
            ..self
        }
    }

    /// Set the transform that is preferred while augmentation is enabled.
    pub fn with_augmentation_transform<T>(self, transform: T) -> Self
    where
        T: 'static + Transform<I, O>,
    {
        Self {
            augmentation_transform: Some(Box::new(transform)),
            ..self
        }
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn pool(&self) -> &SamplePool<I> {
        &self.pool
    }

    pub fn hierarchy(&self) -> &LabelHierarchy {
        self.pool.hierarchy()
    }

    pub fn schedule(&self) -> &TaskSchedule {
        &self.schedule
    }

    pub fn view_state(&self) -> &ViewState {
        self.engine.state()
    }

    pub(crate) fn engine_mut(&mut self) -> &mut ViewEngine {
        &mut self.engine
    }

    pub fn n_tasks(&self) -> usize {
        self.schedule.len()
    }

    /// Get the length of the current view.
    pub fn len(&self) -> usize {
        self.engine.state().exposed().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn choose_task(&mut self, task_id: usize) -> Result<()> {
        self.engine.choose_task(&self.pool, &self.schedule, task_id)
    }

    /// Expose all samples introduced at tasks `0..=task_id`.
    ///
    /// In the IIRC setup it requires complete information mode, otherwise it
    /// fails with [DatasetError::IncompatibleMode].
    pub fn load_tasks_up_to(&mut self, task_id: usize) -> Result<()> {
        self.engine
            .load_tasks_up_to(&self.pool, &self.schedule, task_id)
    }

    pub fn reset(&mut self) {
        self.engine.reset()
    }

    pub fn selection(&self) -> Selection {
        self.engine.state().selection()
    }

    pub fn cur_task_id(&self) -> Option<usize> {
        self.selection().task_id()
    }

    pub fn is_cumulative(&self) -> bool {
        self.selection().is_cumulative()
    }

    pub fn cur_task(&self) -> &IndexSet<Label> {
        self.engine.state().cur_task()
    }

    pub fn seen_labels(&self) -> &IndexSet<Label> {
        self.engine.state().seen_labels()
    }

    /// Get the pool position of an index on the current view.
    pub fn pool_position(&self, index: usize) -> Result<usize> {
        Ok(self.engine.state().exposure(index)?.position)
    }

    /// Get the unmasked labels of an index on the current view.
    pub fn true_labels(&self, index: usize) -> Result<&LabelTuple> {
        let position = self.pool_position(index)?;
        Ok(&self.pool.sample_at(position)?.labels)
    }

    /// Get the labels of an index on the current view as revealed to the
    /// learner.
    pub fn labels(&self, index: usize) -> Result<LabelTuple> {
        let (_, _, labels) = self.read(index)?;
        Ok(labels)
    }

    /// Read the untransformed image and the revealed labels.
    pub fn get_raw(&self, index: usize) -> Result<DataRecord<&I>> {
        let (_, sample, labels) = self.read(index)?;
        Ok(DataRecord {
            image: &sample.image,
            labels,
        })
    }

    /// Read the transformed image and the revealed labels.
    ///
    /// The augmentation transform is used if it is set and augmentation is
    /// enabled, otherwise the essential transform. It fails with
    /// [DatasetError::NoTransform] if neither applies.
    pub fn get(&self, index: usize) -> Result<DataRecord<O>> {
        let (position, sample, labels) = self.read(index)?;
        let image = self
            .apply_transform(position, &sample.image)?
            .ok_or(DatasetError::NoTransform { position })?;
        Ok(DataRecord { image, labels })
    }

    fn apply_transform(&self, position: usize, image: &I) -> Result<Option<O>> {
        let transform = if self.augmentation_enabled() {
            self.augmentation_transform
                .as_ref()
                .or(self.essential_transform.as_ref())
        } else {
            self.essential_transform.as_ref()
        };

        transform
            .map(|transform| {
                transform
                    .transform(image)
                    .map_err(|source| DatasetError::Transform { position, source })
            })
            .transpose()
    }

    fn read(&self, index: usize) -> Result<(usize, &Sample<I>, LabelTuple)> {
        let position = self.pool_position(index)?;
        let sample = self.pool.sample_at(position)?;
        let labels = resolve_labels(
            self.setup.is_iirc(),
            position,
            &sample.labels,
            self.engine.state(),
        )?;
        trace!("read index {} at pool position {}", index, position);
        Ok((position, sample, labels))
    }

    /// Get the indices on the current view of the samples carrying a label.
    ///
    /// The label must be part of the current task. A label of the current
    /// task without any exposed sample gives an empty list. The indices are
    /// only valid until the next task change.
    pub fn indices_for_class(&self, label: &str) -> Result<Vec<usize>> {
        let label = self
            .pool
            .hierarchy()
            .get(label)
            .ok_or_else(|| DatasetError::UnknownLabel(label.into()))?;
        if self.selection() == Selection::Unselected {
            return Err(DatasetError::TaskNotSelected);
        }
        if !self.cur_task().contains(label) {
            return Err(DatasetError::ClassNotInCurrentTask(label.clone()));
        }

        let samples = self.pool.samples();
        let indices = self
            .engine
            .state()
            .exposed()
            .iter()
            .enumerate()
            .filter(|(_, exposure)| samples[exposure.position].labels.contains(label))
            .map(|(index, _)| index)
            .collect();
        Ok(indices)
    }

    /// Like [indices_for_class](Self::indices_for_class), but returns at most
    /// `num_samples` indices chosen at random.
    pub fn sample_indices_for_class<R>(
        &self,
        label: &str,
        num_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>>
    where
        R: Rng + ?Sized,
    {
        let indices = self.indices_for_class(label)?;
        let amount = num_samples.min(indices.len());
        Ok(indices.choose_multiple(rng, amount).copied().collect())
    }

    /// Get the number of pool samples carrying each label.
    pub fn class_counts(&self) -> IndexMap<Label, usize> {
        self.pool.class_counts()
    }

    /// Get the number of exposed samples per introducing label.
    pub fn exposed_counts(&self) -> IndexMap<Label, usize> {
        let mut counts: IndexMap<Label, usize> = self
            .cur_task()
            .iter()
            .map(|label| (label.clone(), 0))
            .collect();
        self.engine
            .state()
            .exposed()
            .iter()
            .for_each(|exposure| *counts.entry(exposure.label.clone()).or_default() += 1);
        counts
    }

    pub fn complete_information_mode(&self) -> bool {
        self.engine.state().complete_information()
    }

    pub fn enable_complete_information_mode(&mut self) {
        self.set_complete_information_mode(true);
    }

    pub fn disable_complete_information_mode(&mut self) {
        self.set_complete_information_mode(false);
    }

    fn set_complete_information_mode(&mut self, enabled: bool) {
        debug!("set complete information mode to {}", enabled);
        self.engine.state_mut().complete_information = enabled;
    }

    /// Switch the information mode until the returned guard is dropped.
    pub fn complete_information_scope(
        &mut self,
        enabled: bool,
    ) -> InformationModeGuard<'_, I, O> {
        let prior = self.complete_information_mode();
        self.set_complete_information_mode(enabled);
        InformationModeGuard {
            dataset: self,
            prior,
        }
    }

    pub fn augmentation_enabled(&self) -> bool {
        self.engine.state().augmentation_enabled()
    }

    /// Apply only the essential transform until the returned guard is
    /// dropped.
    ///
    /// The prior flag is restored on every exit path, including unwinding.
    pub fn disable_augmentations(&mut self) -> AugmentationGuard<'_, I, O> {
        let prior = self.augmentation_enabled();
        debug!("disable augmentations");
        self.engine.state_mut().augmentation_enabled = false;
        AugmentationGuard {
            dataset: self,
            prior,
        }
    }

    pub fn with_augmentations_disabled<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let mut guard = self.disable_augmentations();
        f(&mut guard)
    }
}

impl<I, O> IncrementalDataset<I, O>
where
    I: Clone + Into<O>,
{
    /// Read the transformed image and the revealed labels, converting the
    /// raw image when no transform applies.
    pub fn get_converted(&self, index: usize) -> Result<DataRecord<O>> {
        let (position, sample, labels) = self.read(index)?;
        let image = match self.apply_transform(position, &sample.image)? {
            Some(image) => image,
            None => sample.image.clone().into(),
        };
        Ok(DataRecord { image, labels })
    }
}

/// Restores the augmentation flag on drop.
pub struct AugmentationGuard<'a, I, O> {
    dataset: &'a mut IncrementalDataset<I, O>,
    prior: bool,
}

impl<'a, I, O> Deref for AugmentationGuard<'a, I, O> {
    type Target = IncrementalDataset<I, O>;

    fn deref(&self) -> &Self::Target {
        self.dataset
    }
}

impl<'a, I, O> DerefMut for AugmentationGuard<'a, I, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dataset
    }
}

impl<'a, I, O> Drop for AugmentationGuard<'a, I, O> {
    fn drop(&mut self) {
        debug!("restore augmentation flag to {}", self.prior);
        self.dataset.engine.state_mut().augmentation_enabled = self.prior;
    }
}

/// Restores the information mode on drop.
pub struct InformationModeGuard<'a, I, O> {
    dataset: &'a mut IncrementalDataset<I, O>,
    prior: bool,
}

impl<'a, I, O> Deref for InformationModeGuard<'a, I, O> {
    type Target = IncrementalDataset<I, O>;

    fn deref(&self) -> &Self::Target {
        self.dataset
    }
}

impl<'a, I, O> DerefMut for InformationModeGuard<'a, I, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dataset
    }
}

impl<'a, I, O> Drop for InformationModeGuard<'a, I, O> {
    fn drop(&mut self) {
        self.dataset.set_complete_information_mode(self.prior);
    }
}
