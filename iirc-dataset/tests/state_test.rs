use anyhow::Result;
use iirc_dataset::{
    DatasetError, DatasetOptions, DatasetState, Exposure, IncrementalDataset, LabelTuple, Sample,
    Selection, Setup, TaskSchedule,
};

fn dataset() -> IncrementalDataset<usize> {
    let samples = (0..60)
        .map(|index| {
            let labels = match index % 3 {
                0 => LabelTuple::pair("A", "Aa"),
                1 => LabelTuple::single("A"),
                _ => LabelTuple::single("B"),
            };
            Sample::new(index, labels)
        })
        .collect();
    let schedule = TaskSchedule::new(vec![vec!["A", "B"], vec!["Aa"]]).unwrap();
    let options = DatasetOptions::new(Setup::iirc(0.5, 0.5).unwrap()).seed(5);
    IncrementalDataset::new(samples, schedule, options).unwrap()
}

#[test]
fn snapshot_restores_view() -> Result<()> {
    let mut dataset = dataset();
    dataset.choose_task(0)?;
    dataset.choose_task(1)?;
    let snapshot = dataset.state();
    let records: Vec<_> = (0..dataset.len())
        .map(|index| dataset.get(index))
        .collect::<Result<_, _>>()?;

    let text = serde_json::to_string(&snapshot)?;
    let snapshot: DatasetState = serde_json::from_str(&text)?;

    let mut restored = self::dataset();
    restored.load_state(snapshot)?;
    assert_eq!(restored.selection(), Selection::SingleTask(1));
    assert_eq!(restored.seen_labels(), dataset.seen_labels());

    let restored_records: Vec<_> = (0..restored.len())
        .map(|index| restored.get(index))
        .collect::<Result<_, _>>()?;
    assert_eq!(records, restored_records);
    Ok(())
}

#[test]
fn invalid_snapshot_is_rejected() -> Result<()> {
    let mut dataset = dataset();
    dataset.choose_task(1)?;
    let valid = dataset.state();

    let mut fresh = self::dataset();
    let before = fresh.state();

    // exposed label outside the current task
    let mut snapshot = valid.clone();
    snapshot.exposed.push(Exposure {
        position: 2,
        label: "B".into(),
    });
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::InvalidState(_))
    ));

    // position that does not carry the label
    let mut snapshot = valid.clone();
    snapshot.exposed.push(Exposure {
        position: 1,
        label: "Aa".into(),
    });
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::InvalidState(_))
    ));

    // position out of range
    let mut snapshot = valid.clone();
    snapshot.exposed.push(Exposure {
        position: 600,
        label: "Aa".into(),
    });
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::InvalidState(_))
    ));

    // current task does not match the selection
    let mut snapshot = valid.clone();
    snapshot.selection = Selection::SingleTask(0);
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::InvalidState(_))
    ));

    // unknown task
    let mut snapshot = valid.clone();
    snapshot.selection = Selection::SingleTask(9);
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::UnknownTask { .. })
    ));

    // cumulative view in incomplete information mode
    let mut snapshot = valid;
    snapshot.selection = Selection::Cumulative(1);
    snapshot.cur_task = vec!["A".into(), "B".into(), "Aa".into()];
    snapshot.seen_labels = snapshot.cur_task.clone();
    assert!(matches!(
        fresh.load_state(snapshot),
        Err(DatasetError::InvalidState(_))
    ));

    assert_eq!(fresh.state(), before);
    Ok(())
}
