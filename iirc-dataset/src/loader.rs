//! Loaders for sample pools and task schedules stored in files.

use crate::{common::*, Sample, TaskSchedule};
use anyhow::Result;
use std::fs;

/// A row of the sample pool CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct PoolRecord {
    pub image: PathBuf,
    pub superclass: String,
    pub subclass: Option<String>,
}

/// Load a sample pool from a CSV file with `image,superclass,subclass` columns.
///
/// The subclass column may be empty. Relative image paths are joined to
/// `image_dir` if it is given. Lines starting with `#` are ignored.
pub fn load_pool_csv(
    path: impl AsRef<Path>,
    image_dir: Option<&Path>,
) -> Result<Vec<Sample<PathBuf>>> {
    let path = path.as_ref();

    let records: Vec<PoolRecord> = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open pool file '{}'", path.display()))?
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to parse pool file '{}'", path.display()))?;
    ensure!(!records.is_empty(), "no samples found in '{}'", path.display());

    let samples: Vec<_> = records
        .into_iter()
        .enumerate()
        .map(|(line, record)| {
            let PoolRecord {
                image,
                superclass,
                subclass,
            } = record;
            ensure!(
                !superclass.is_empty(),
                "empty superclass at record {} in '{}'",
                line,
                path.display()
            );

            let image = match image_dir {
                Some(dir) if image.is_relative() => dir.join(image),
                _ => image,
            };
            let labels = match subclass {
                Some(subclass) if !subclass.is_empty() => LabelTuple::pair(superclass, subclass),
                _ => LabelTuple::single(superclass),
            };
            Ok(Sample::new(image, labels))
        })
        .collect::<Result<_>>()?;

    debug!("loaded {} samples from '{}'", samples.len(), path.display());
    Ok(samples)
}

/// Load a task schedule from a JSON5 array of label arrays.
pub fn load_schedule_file(path: impl AsRef<Path>) -> Result<TaskSchedule> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule file '{}'", path.display()))?;
    let tasks: Vec<Vec<String>> = json5::from_str(&text)
        .with_context(|| format!("failed to parse schedule file '{}'", path.display()))?;
    ensure!(!tasks.is_empty(), "no tasks found in '{}'", path.display());

    let schedule = TaskSchedule::new(tasks)
        .with_context(|| format!("invalid schedule file '{}'", path.display()))?;
    debug!("loaded {} tasks from '{}'", schedule.len(), path.display());
    Ok(schedule)
}
