use anyhow::Result;
use iirc_dataset::{
    config::Config, load_pool_csv, load_schedule_file, DatasetOptions, IncrementalDataset,
    LabelKind, LabelTuple, Setup,
};
use std::path::{Path, PathBuf};

lazy_static::lazy_static! {
    static ref DATA_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");
}

#[test]
fn load_pool_file() -> Result<()> {
    let samples = load_pool_csv(DATA_DIR.join("pool.csv"), None)?;
    assert_eq!(samples.len(), 12);
    assert_eq!(samples[0].image, Path::new("dog_0.jpg"));
    assert_eq!(samples[0].labels, LabelTuple::pair("dog", "poodle"));
    assert_eq!(samples[4].labels, LabelTuple::single("dog"));
    assert_eq!(samples[11].labels, LabelTuple::single("flower"));

    let samples = load_pool_csv(DATA_DIR.join("pool.csv"), Some(Path::new("/data")))?;
    assert_eq!(samples[0].image, Path::new("/data/dog_0.jpg"));
    Ok(())
}

#[test]
fn load_schedule() -> Result<()> {
    let schedule = load_schedule_file(DATA_DIR.join("schedule.json5"))?;
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.labels_at(1)?, ["poodle", "flower"]);
    assert_eq!(schedule.introduced_at("bus")?, 2);
    Ok(())
}

#[test]
fn missing_files() {
    assert!(load_pool_csv(DATA_DIR.join("missing.csv"), None).is_err());
    assert!(load_schedule_file(DATA_DIR.join("missing.json5")).is_err());
}

#[test]
fn schedule_order_violation() -> Result<()> {
    let samples = load_pool_csv(DATA_DIR.join("pool.csv"), None)?;
    let schedule = load_schedule_file(DATA_DIR.join("bad_schedule.json5"))?;
    let result: iirc_dataset::Result<IncrementalDataset<PathBuf>> = IncrementalDataset::new(
        samples,
        schedule,
        DatasetOptions::new(Setup::iirc(0.5, 0.5)?),
    );
    assert!(matches!(
        result,
        Err(iirc_dataset::DatasetError::OrderViolation { .. })
    ));
    Ok(())
}

#[test]
fn load_config() -> Result<()> {
    let config = Config::open(DATA_DIR.join("config.json5"))?;
    assert_eq!(config.setup, Setup::iirc(1.0, 1.0)?);
    assert_eq!(config.seed, 7);
    assert!(!config.test_mode);
    assert_eq!(config.pool_file, DATA_DIR.join("pool.csv"));
    assert_eq!(config.image_dir.as_deref(), Some(DATA_DIR.join("images").as_path()));

    let mut dataset = config.load_dataset()?;
    assert_eq!(dataset.n_tasks(), 3);
    assert_eq!(dataset.hierarchy().classify("poodle")?, LabelKind::Subclass);
    assert_eq!(dataset.class_counts()["dog"], 6);

    dataset.choose_task(0)?;
    assert_eq!(dataset.len(), 10);
    let record = dataset.get_converted(0)?;
    assert_eq!(record.image, DATA_DIR.join("images").join("dog_0.jpg"));
    assert_eq!(record.labels, LabelTuple::single("dog"));

    dataset.choose_task(1)?;
    assert_eq!(dataset.len(), 4);
    Ok(())
}
