use crate::common::*;
use thiserror::Error;

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;

/// The failures reported by the incremental dataset.
///
/// Construction errors are fatal and no dataset is built. Usage errors leave
/// the view untouched, so the caller may recover by choosing another
/// operation.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error("label '{0}' appears in the sample pool but in no task")]
    UnscheduledLabel(Label),
    #[error("label '{label}' is scheduled in both task {first_task} and task {second_task}")]
    DuplicateLabel {
        label: Label,
        first_task: usize,
        second_task: usize,
    },
    #[error("label '{label}' is scheduled in task {task_id} but no sample carries it")]
    LabelNotInPool { label: Label, task_id: usize },
    #[error(
        "subclass '{subclass}' is introduced at task {subclass_task} \
         before its superclass '{superclass}' at task {superclass_task}"
    )]
    OrderViolation {
        subclass: Label,
        subclass_task: usize,
        superclass: Label,
        superclass_task: usize,
    },
    #[error("sample at position {position} has {arity} labels, which is invalid for the {setup} setup")]
    InvalidLabelArity {
        position: usize,
        arity: usize,
        setup: &'static str,
    },
    #[error("{name} must be within [0, 1], but got {value}")]
    InvalidPercentage { name: &'static str, value: f64 },
    #[error("task {task_id} does not exist, the schedule has {n_tasks} tasks")]
    UnknownTask { task_id: usize, n_tasks: usize },
    #[error("no task is selected")]
    TaskNotSelected,
    #[error("index {index} is out of range for a view of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown label '{0}'")]
    UnknownLabel(Label),
    #[error("label '{0}' is not part of the current task")]
    ClassNotInCurrentTask(Label),
    #[error("cumulative task loading requires complete information mode in the IIRC setup")]
    IncompatibleMode,
    #[error("label visibility is ambiguous for a cumulative view in incomplete information mode")]
    AmbiguousVisibility,
    #[error("no label of the sample at position {position} is visible")]
    NoVisibleLabel { position: usize },
    #[error("transform failed on the sample at position {position}")]
    Transform {
        position: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("no transform applies to the sample at position {position}")]
    NoTransform { position: usize },
    #[error("invalid dataset state: {0}")]
    InvalidState(String),
}
