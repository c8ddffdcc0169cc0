use anyhow::{Context, Result};
use clap::Parser;
use iirc_dataset::{config::Config, IncrementalDataset};
use itertools::Itertools;
use log::info;
use prettytable::{cell, row, Table};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Parser)]
/// Inspect incremental dataset configurations
enum Opts {
    /// Print the labels introduced at each task
    Info {
        /// configuration file
        config_file: PathBuf,
    },
    /// Select every task in order and print the resulting views
    Simulate {
        /// configuration file
        config_file: PathBuf,
        /// load tasks cumulatively instead of one by one
        #[clap(long)]
        cumulative: bool,
    },
}

fn main() -> Result<()> {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Info { config_file } => {
            let dataset = open(config_file)?;
            info(&dataset)?;
        }
        Opts::Simulate {
            config_file,
            cumulative,
        } => {
            let mut dataset = open(config_file)?;
            simulate(&mut dataset, cumulative)?;
        }
    }

    Ok(())
}

fn open(config_file: PathBuf) -> Result<IncrementalDataset<PathBuf>> {
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    info!("loading dataset from '{}'", config_file.display());
    config.load_dataset()
}

fn info(dataset: &IncrementalDataset<PathBuf>) -> Result<()> {
    let counts = dataset.class_counts();
    let hierarchy = dataset.hierarchy();

    let mut table = Table::new();
    table.add_row(row!["task", "label", "kind", "parent", "samples"]);

    for (task_id, labels) in dataset.schedule().tasks().iter().enumerate() {
        for label in labels {
            let kind = hierarchy.classify(label)?;
            let parent = hierarchy
                .parent_of(label)
                .map(|parent| parent.to_string())
                .unwrap_or_default();
            table.add_row(row![task_id, label, kind, parent, counts[label]]);
        }
    }

    table.printstd();
    Ok(())
}

fn simulate(dataset: &mut IncrementalDataset<PathBuf>, cumulative: bool) -> Result<()> {
    if cumulative && dataset.setup().is_iirc() {
        dataset.enable_complete_information_mode();
    }

    let mut table = Table::new();
    table.add_row(row!["task", "current labels", "exposed", "seen labels"]);

    for task_id in 0..dataset.n_tasks() {
        if cumulative {
            dataset.load_tasks_up_to(task_id)?;
        } else {
            dataset.choose_task(task_id)?;
        }

        let exposed = dataset
            .exposed_counts()
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .join(", ");
        table.add_row(row![
            task_id,
            dataset.cur_task().iter().join(", "),
            format!("{} ({})", dataset.len(), exposed),
            dataset.seen_labels().iter().join(", "),
        ]);
    }

    table.printstd();
    Ok(())
}
