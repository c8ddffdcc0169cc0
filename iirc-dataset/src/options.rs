use crate::{common::*, DatasetError, Result};

/// The percentage of superclass data used in the IIRC setup by default.
pub const DEFAULT_SUPERCLASS_DATA_PCT: f64 = 0.6;
/// The percentage of subclass data used in the IIRC setup by default.
pub const DEFAULT_SUBCLASS_DATA_PCT: f64 = 0.6;

/// The continual learning regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Setup {
    /// Class-incremental learning. Each sample has exactly one label.
    Cil,
    /// Incremental implicitly-refined classification. Each sample has a
    /// superclass and an optional subclass.
    Iirc {
        /// The fraction of a superclass's samples exposed when it is introduced.
        #[serde(default = "default_superclass_data_pct")]
        superclass_data_pct: R64,
        /// The fraction of a subclass's samples exposed when it is introduced.
        #[serde(default = "default_subclass_data_pct")]
        subclass_data_pct: R64,
    },
}

impl Setup {
    /// Create an IIRC setup. Both percentages must lie in `[0, 1]`.
    pub fn iirc(superclass_data_pct: f64, subclass_data_pct: f64) -> Result<Self> {
        let setup = Self::Iirc {
            superclass_data_pct: to_pct("superclass_data_pct", superclass_data_pct)?,
            subclass_data_pct: to_pct("subclass_data_pct", subclass_data_pct)?,
        };
        setup.validate()?;
        Ok(setup)
    }

    pub fn is_iirc(&self) -> bool {
        matches!(self, Self::Iirc { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cil => "CIL",
            Self::Iirc { .. } => "IIRC",
        }
    }

    pub fn max_arity(&self) -> usize {
        match self {
            Self::Cil => 1,
            Self::Iirc { .. } => 2,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Self::Iirc {
            superclass_data_pct,
            subclass_data_pct,
        } = *self
        {
            check_pct("superclass_data_pct", superclass_data_pct)?;
            check_pct("subclass_data_pct", subclass_data_pct)?;
        }
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::Cil
    }
}

/// Options to construct an incremental dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOptions {
    pub setup: Setup,
    /// In test mode no subsampling takes place and labels are revealed in
    /// complete information mode unless overridden.
    #[serde(default)]
    pub test_mode: bool,
    /// Overrides the initial information mode.
    #[serde(default)]
    pub complete_information_mode: Option<bool>,
    /// The seed of the random generator used for subsampling.
    #[serde(default)]
    pub seed: u64,
}

impl DatasetOptions {
    pub fn new(setup: Setup) -> Self {
        Self {
            setup,
            test_mode: false,
            complete_information_mode: None,
            seed: 0,
        }
    }

    pub fn test_mode(self, test_mode: bool) -> Self {
        Self { test_mode, ..self }
    }

    pub fn complete_information_mode(self, enabled: bool) -> Self {
        Self {
            complete_information_mode: Some(enabled),
            ..self
        }
    }

    pub fn seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// The information mode the dataset starts with.
    ///
    /// CIL has a single label per sample, so nothing is ever hidden.
    pub fn initial_complete_information(&self) -> bool {
        match self.setup {
            Setup::Cil => true,
            Setup::Iirc { .. } => self.complete_information_mode.unwrap_or(self.test_mode),
        }
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self::new(Setup::default())
    }
}

fn to_pct(name: &'static str, value: f64) -> Result<R64> {
    R64::try_new(value).ok_or(DatasetError::InvalidPercentage { name, value })
}

fn check_pct(name: &'static str, value: R64) -> Result<()> {
    if (0.0..=1.0).contains(&value.raw()) {
        Ok(())
    } else {
        Err(DatasetError::InvalidPercentage {
            name,
            value: value.raw(),
        })
    }
}

fn default_superclass_data_pct() -> R64 {
    r64(DEFAULT_SUPERCLASS_DATA_PCT)
}

fn default_subclass_data_pct() -> R64 {
    r64(DEFAULT_SUBCLASS_DATA_PCT)
}
