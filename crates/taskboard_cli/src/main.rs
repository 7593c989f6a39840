//! Board summary CLI.
//!
//! # Responsibility
//! - Open a store from an optional JSON config path.
//! - Print the current user's dashboard and per-project column counts.
//!
//! Without a config path, an in-memory store seeded with demo data is used.
//! A config with a `remote` section only reports the remembered session.

use std::error::Error;
use std::process::ExitCode;
use taskboard_core::{open_remote, open_store, StoreConfig};

fn main() -> ExitCode {
    println!("taskboard_core version={}", taskboard_core::core_version());
    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig {
            seed_demo: true,
            ..StoreConfig::default()
        },
    };

    if config.remote.is_some() {
        let remote = open_remote(&config)?;
        let session = remote.session()?;
        println!(
            "mode=remote base_url={} session={}",
            remote.base_url(),
            if session.is_some() { "present" } else { "none" }
        );
        return Ok(());
    }

    let store = open_store(&config)?;

    let Some(user) = store.current_user()? else {
        println!("session=none");
        return Ok(());
    };

    let stats = store.dashboard(&user.id)?;
    println!(
        "user=\"{}\" projects={} tasks={} done={} in_flight={}",
        user.name,
        stats.total_projects,
        stats.total_tasks,
        stats.completed_tasks,
        stats.in_flight_tasks
    );

    for project in store.projects_for_user(&user.id)? {
        let summary = store.board_summary(&project.id)?;
        let columns = summary
            .columns
            .iter()
            .map(|column| format!("{}={}", column.status.as_str(), column.count))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "project=\"{}\" {columns} average_progress={}",
            project.name, summary.average_progress
        );
    }
    Ok(())
}
