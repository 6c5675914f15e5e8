use std::path::PathBuf;

use cc_app::{RunOptions, RunRequest, query, run_service};
use cc_project::Scenario;

fn scenario_in(dir_name: &str, seed: Option<u64>) -> PathBuf {
    let dir = std::env::temp_dir().join(dir_name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut scenario = Scenario::default();
    scenario.simulation.total_ticks = 300;
    scenario.seed = seed;

    let path = dir.join("scenario.yaml");
    cc_app::save_scenario(&path, &scenario).unwrap();
    path
}

#[test]
fn seeded_run_is_cached() {
    let path = scenario_in("cc_app_cached_run", Some(12));
    let request = RunRequest {
        scenario_path: &path,
        options: RunOptions::default(),
    };

    let first = run_service::ensure_run(&request).unwrap();
    assert!(!first.loaded_from_cache);

    let second = run_service::ensure_run(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(first.run_id, second.run_id);
    assert_eq!(first.manifest.timestamp, second.manifest.timestamp);
    assert_eq!(first.manifest.seed, Some(12));

    let runs = run_service::list_runs(&path).unwrap();
    assert_eq!(runs.len(), 1);
}

#[test]
fn run_persists_time_series() {
    let path = scenario_in("cc_app_persisted_run", Some(5));
    let request = RunRequest {
        scenario_path: &path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    };

    let response = run_service::ensure_run(&request).unwrap();
    let (manifest, records) = run_service::load_run(&path, &response.run_id).unwrap();

    assert_eq!(manifest.seed, Some(5));
    assert_eq!(records.len(), 300);
    assert!(manifest.summary.is_some());

    let summary = query::get_run_summary(&records, 108.0).unwrap();
    assert_eq!(summary.record_count, 300);
    assert_eq!(summary.time_range, (0.0, 299.0));
}

#[test]
fn unseeded_runs_get_distinct_seeds() {
    let path = scenario_in("cc_app_unseeded_run", None);
    let request = RunRequest {
        scenario_path: &path,
        options: RunOptions::default(),
    };

    let a = run_service::ensure_run(&request).unwrap();
    let b = run_service::ensure_run(&request).unwrap();

    assert!(a.manifest.seed.is_some());
    assert_ne!(a.manifest.seed, b.manifest.seed);
    assert!(!b.loaded_from_cache);
    assert_eq!(run_service::list_runs(&path).unwrap().len(), 2);
}

#[test]
fn missing_run_reported() {
    let path = scenario_in("cc_app_missing_run", Some(1));
    let err = run_service::load_run(&path, "does-not-exist").unwrap_err();
    assert!(matches!(err, cc_app::AppError::RunNotFound(_)));
}

#[test]
fn runs_listed_per_scenario_in_shared_directory() {
    let cruise = scenario_in("cc_app_shared_dir", Some(3));
    let mut slow = Scenario::default();
    slow.name = "slow".to_string();
    slow.simulation.total_ticks = 200;
    slow.simulation.target_speed_kph = 60.0;
    slow.seed = Some(3);
    let slow_path = cruise.with_file_name("slow.yaml");
    cc_app::save_scenario(&slow_path, &slow).unwrap();

    for path in [&cruise, &slow_path] {
        run_service::ensure_run(&RunRequest {
            scenario_path: path,
            options: RunOptions::default(),
        })
        .unwrap();
    }

    let cruise_runs = run_service::list_runs(&cruise).unwrap();
    let slow_runs = run_service::list_runs(&slow_path).unwrap();
    assert_eq!(cruise_runs.len(), 1);
    assert_eq!(slow_runs.len(), 1);
    assert_eq!(slow_runs[0].scenario_name, "slow");
    assert_ne!(cruise_runs[0].scenario_key, slow_runs[0].scenario_key);
}
