use crate::{Label, LabelKind, LabelTuple};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("label '{label}' is used both as {previous} and as {found}")]
    Inconsistent {
        label: Label,
        previous: LabelKind,
        found: LabelKind,
    },
    #[error("subclass '{label}' has two parents '{first_parent}' and '{second_parent}'")]
    ConflictingParent {
        label: Label,
        first_parent: Label,
        second_parent: Label,
    },
    #[error("unknown label '{0}'")]
    UnknownLabel(Label),
}

/// The registry of superclasses, subclasses and their parent relation.
///
/// It is built by scanning label tuples. The first element of a tuple is
/// registered as a superclass, and the second element, if any, is registered
/// as a subclass of the first one. Labels are kept in the order they are
/// first observed.
#[derive(Debug, Clone, Default)]
pub struct LabelHierarchy {
    kinds: IndexMap<Label, LabelKind>,
    parents: IndexMap<Label, Label>,
    children: IndexMap<Label, IndexSet<Label>>,
}

impl LabelHierarchy {
    pub fn build<'a, I>(tuples: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = &'a LabelTuple>,
    {
        let mut hierarchy = Self::default();
        tuples
            .into_iter()
            .try_for_each(|tuple| hierarchy.insert(tuple))?;

        debug!(
            "built label hierarchy with {} superclasses and {} subclasses",
            hierarchy.children.len(),
            hierarchy.parents.len()
        );
        Ok(hierarchy)
    }

    fn insert(&mut self, tuple: &LabelTuple) -> Result<(), HierarchyError> {
        let LabelTuple { first, second } = tuple;
        self.register(first, LabelKind::Superclass)?;
        self.children.entry(first.clone()).or_default();

        if let Some(second) = second {
            self.register(second, LabelKind::Subclass)?;

            match self.parents.get(second) {
                Some(parent) if parent != first => {
                    return Err(HierarchyError::ConflictingParent {
                        label: second.clone(),
                        first_parent: parent.clone(),
                        second_parent: first.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    self.parents.insert(second.clone(), first.clone());
                    self.children[first].insert(second.clone());
                }
            }
        }

        Ok(())
    }

    fn register(&mut self, label: &Label, kind: LabelKind) -> Result<(), HierarchyError> {
        match self.kinds.get(label) {
            Some(&previous) if previous != kind => Err(HierarchyError::Inconsistent {
                label: label.clone(),
                previous,
                found: kind,
            }),
            Some(_) => Ok(()),
            None => {
                self.kinds.insert(label.clone(), kind);
                Ok(())
            }
        }
    }

    pub fn classify(&self, label: &str) -> Result<LabelKind, HierarchyError> {
        self.kinds
            .get(label)
            .copied()
            .ok_or_else(|| HierarchyError::UnknownLabel(label.into()))
    }

    /// Get the parent superclass of a subclass.
    ///
    /// Superclasses are not registered subclasses, so they fail with
    /// [HierarchyError::UnknownLabel] just like unseen labels.
    pub fn parent_of(&self, label: &str) -> Result<&Label, HierarchyError> {
        self.parents
            .get(label)
            .ok_or_else(|| HierarchyError::UnknownLabel(label.into()))
    }

    pub fn subclasses_of(&self, label: &str) -> Result<&IndexSet<Label>, HierarchyError> {
        self.children
            .get(label)
            .ok_or_else(|| HierarchyError::UnknownLabel(label.into()))
    }

    /// Look up the registered label equal to the name.
    pub fn get(&self, label: &str) -> Option<&Label> {
        self.kinds.get_key_value(label).map(|(label, _)| label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.kinds.contains_key(label)
    }

    /// Iterate over all labels in the order of first observation.
    pub fn labels(&self) -> impl Iterator<Item = (&Label, LabelKind)> {
        self.kinds.iter().map(|(label, &kind)| (label, kind))
    }

    pub fn superclasses(&self) -> impl Iterator<Item = &Label> {
        self.children.keys()
    }

    pub fn subclasses(&self) -> impl Iterator<Item = &Label> {
        self.parents.keys()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
