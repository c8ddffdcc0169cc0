//! Dataset configuration format.

use crate::{
    common::*, load_pool_csv, load_schedule_file, DatasetOptions, IncrementalDataset, Setup,
};
use anyhow::Result;

/// The dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub setup: Setup,
    /// The CSV file listing the samples.
    pub pool_file: PathBuf,
    /// The directory relative image paths are resolved against.
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    /// The JSON5 file listing the labels of each task.
    pub schedule_file: PathBuf,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub complete_information_mode: Option<bool>,
    #[serde(default)]
    pub seed: u64,
}

impl Config {
    /// Load the configuration from a JSON5 file.
    ///
    /// Relative paths in the file are resolved against the directory of the
    /// file.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&text)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let resolve = |file: PathBuf| {
            if file.is_relative() {
                base_dir.join(file)
            } else {
                file
            }
        };

        Ok(Self {
            pool_file: resolve(config.pool_file),
            image_dir: config.image_dir.map(resolve),
            schedule_file: resolve(config.schedule_file),
            ..config
        })
    }

    pub fn options(&self) -> DatasetOptions {
        DatasetOptions {
            setup: self.setup,
            test_mode: self.test_mode,
            complete_information_mode: self.complete_information_mode,
            seed: self.seed,
        }
    }

    /// Load the sample pool and the schedule, and build the dataset.
    pub fn load_dataset(&self) -> Result<IncrementalDataset<PathBuf>> {
        let samples = load_pool_csv(&self.pool_file, self.image_dir.as_deref())?;
        let schedule = load_schedule_file(&self.schedule_file)?;
        let dataset = IncrementalDataset::new(samples, schedule, self.options())
            .with_context(|| {
                format!(
                    "failed to build dataset from '{}' and '{}'",
                    self.pool_file.display(),
                    self.schedule_file.display()
                )
            })?;
        Ok(dataset)
    }
}
