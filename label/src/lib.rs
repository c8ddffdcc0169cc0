//! Label types shared by the incremental dataset crates.

mod hierarchy;

pub use hierarchy::*;

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, ops::Deref, sync::Arc};

/// An opaque class name.
///
/// The string is reference counted so that cloning a label is cheap. Two
/// labels are equal if their strings are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Arc<str>);

impl Label {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Label {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// The position of a label in the two-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    /// A coarse label without parent.
    Superclass,
    /// A refined label with exactly one parent superclass.
    Subclass,
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Superclass => "superclass",
            Self::Subclass => "subclass",
        };
        f.write_str(text)
    }
}

/// A label tuple of arity one or two.
///
/// For the labels carried by a sample, `first` is the superclass and `second`
/// the optional subclass. For labels revealed to a learner, `second` is `None`
/// when there is no second label to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelTuple {
    pub first: Label,
    pub second: Option<Label>,
}

impl LabelTuple {
    pub fn single(label: impl Into<Label>) -> Self {
        Self {
            first: label.into(),
            second: None,
        }
    }

    pub fn pair(first: impl Into<Label>, second: impl Into<Label>) -> Self {
        Self {
            first: first.into(),
            second: Some(second.into()),
        }
    }

    pub fn arity(&self) -> usize {
        if self.second.is_some() {
            2
        } else {
            1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.iter().any(|l| l.as_str() == label)
    }
}

impl fmt::Display for LabelTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.second {
            Some(second) => write!(f, "({}, {})", self.first, second),
            None => write!(f, "({})", self.first),
        }
    }
}
