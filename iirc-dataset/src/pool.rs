use crate::{common::*, DatasetError, Result, Setup};

/// An image handle with the true labels of the image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample<I> {
    pub image: I,
    pub labels: LabelTuple,
}

impl<I> Sample<I> {
    pub fn new(image: I, labels: LabelTuple) -> Self {
        Self { image, labels }
    }
}

/// The immutable pool of samples indexed by label.
///
/// Positions of each label are sorted in ascending order. A sample carrying
/// a superclass and a subclass is indexed under both labels.
#[derive(Debug, Clone)]
pub struct SamplePool<I> {
    samples: Vec<Sample<I>>,
    hierarchy: LabelHierarchy,
    class_index: IndexMap<Label, Vec<usize>>,
}

impl<I> SamplePool<I> {
    pub fn new(samples: Vec<Sample<I>>, setup: &Setup) -> Result<Self> {
        let max_arity = setup.max_arity();
        if let Some((position, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, sample)| sample.labels.arity() > max_arity)
        {
            return Err(DatasetError::InvalidLabelArity {
                position,
                arity: sample.labels.arity(),
                setup: setup.name(),
            });
        }

        let hierarchy = LabelHierarchy::build(samples.iter().map(|sample| &sample.labels))?;

        let mut class_index: IndexMap<Label, Vec<usize>> = hierarchy
            .labels()
            .map(|(label, _)| (label.clone(), vec![]))
            .collect();
        samples.iter().enumerate().for_each(|(position, sample)| {
            sample.labels.iter().for_each(|label| {
                class_index[label].push(position);
            });
        });

        Ok(Self {
            samples,
            hierarchy,
            class_index,
        })
    }

    pub fn positions_for(&self, label: &str) -> Result<&[usize]> {
        self.class_index
            .get(label)
            .map(|positions| positions.as_slice())
            .ok_or_else(|| DatasetError::UnknownLabel(label.into()))
    }

    pub fn sample_at(&self, position: usize) -> Result<&Sample<I>> {
        self.samples
            .get(position)
            .ok_or(DatasetError::IndexOutOfRange {
                index: position,
                len: self.samples.len(),
            })
    }

    pub fn hierarchy(&self) -> &LabelHierarchy {
        &self.hierarchy
    }

    /// Get the number of samples carrying each label.
    pub fn class_counts(&self) -> IndexMap<Label, usize> {
        self.class_index
            .iter()
            .map(|(label, positions)| (label.clone(), positions.len()))
            .collect()
    }

    pub fn samples(&self) -> &[Sample<I>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
