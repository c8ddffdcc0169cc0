use crate::common::*;

/// The record read from a position of the current view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataRecord<T> {
    /// The image, transformed or raw depending on the read.
    pub image: T,
    /// The labels revealed to the learner.
    pub labels: LabelTuple,
}

impl<T> DataRecord<T> {
    pub fn label(&self) -> &Label {
        &self.labels.first
    }

    /// Get the second label, or `None` as the placeholder for a missing one.
    pub fn second_label(&self) -> Option<&Label> {
        self.labels.second.as_ref()
    }
}
