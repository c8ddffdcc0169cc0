use crate::{common::*, DatasetError, Result};

/// The ordered groups of labels introduced at each task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSchedule {
    tasks: Vec<Vec<Label>>,
    #[serde(skip)]
    introduced_at: IndexMap<Label, usize>,
}

impl TaskSchedule {
    /// Build a schedule, rejecting labels that occur more than once.
    pub fn new<T, L>(tasks: impl IntoIterator<Item = T>) -> Result<Self>
    where
        T: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let tasks: Vec<Vec<Label>> = tasks
            .into_iter()
            .map(|task| task.into_iter().map(Into::into).collect())
            .collect();

        let mut introduced_at = IndexMap::new();
        for (task_id, labels) in tasks.iter().enumerate() {
            for label in labels {
                if let Some(&first_task) = introduced_at.get(label) {
                    return Err(DatasetError::DuplicateLabel {
                        label: label.clone(),
                        first_task,
                        second_task: task_id,
                    });
                }
                introduced_at.insert(label.clone(), task_id);
            }
        }

        Ok(Self {
            tasks,
            introduced_at,
        })
    }

    /// Check the schedule against the labels observed in the sample pool.
    ///
    /// Every pool label must be scheduled, every scheduled label must occur in
    /// the pool, and no subclass may be introduced before its superclass.
    pub fn validate(&self, hierarchy: &LabelHierarchy) -> Result<()> {
        if let Some((label, _)) = hierarchy
            .labels()
            .find(|(label, _)| !self.introduced_at.contains_key(label.as_str()))
        {
            return Err(DatasetError::UnscheduledLabel(label.clone()));
        }

        if let Some((label, &task_id)) = self
            .introduced_at
            .iter()
            .find(|(label, _)| !hierarchy.contains(label))
        {
            return Err(DatasetError::LabelNotInPool {
                label: label.clone(),
                task_id,
            });
        }

        hierarchy.subclasses().try_for_each(|subclass| -> Result<()> {
            let superclass = hierarchy.parent_of(subclass)?;
            let subclass_task = self.introduced_at[subclass];
            let superclass_task = self.introduced_at[superclass];

            if subclass_task < superclass_task {
                return Err(DatasetError::OrderViolation {
                    subclass: subclass.clone(),
                    subclass_task,
                    superclass: superclass.clone(),
                    superclass_task,
                });
            }
            Ok(())
        })
    }

    pub fn introduced_at(&self, label: &str) -> Result<usize> {
        self.introduced_at
            .get(label)
            .copied()
            .ok_or_else(|| DatasetError::UnknownLabel(label.into()))
    }

    pub fn labels_at(&self, task_id: usize) -> Result<&[Label]> {
        self.tasks
            .get(task_id)
            .map(|labels| labels.as_slice())
            .ok_or(DatasetError::UnknownTask {
                task_id,
                n_tasks: self.tasks.len(),
            })
    }

    pub fn tasks(&self) -> &[Vec<Label>] {
        &self.tasks
    }

    /// Get the number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<'de> Deserialize<'de> for TaskSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            tasks: Vec<Vec<Label>>,
        }

        let Repr { tasks } = Repr::deserialize(deserializer)?;
        Self::new(tasks).map_err(serde::de::Error::custom)
    }
}
