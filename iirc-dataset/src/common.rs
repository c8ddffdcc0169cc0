pub use anyhow::{ensure, Context as _};
pub use derivative::Derivative;
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use label::{HierarchyError, Label, LabelHierarchy, LabelKind, LabelTuple};
pub use log::{debug, info, trace};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng, seq::SliceRandom};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashSet,
    fmt::Debug,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};
