use std::path::PathBuf;

use crate::config::SimulationConfig;
use crate::simulator::Simulator;

fn temp_output_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chordsim-{}-{}", name, std::process::id()))
}

#[test]
fn test_run_writes_report_file() {
    let dir = temp_output_dir("run");
    let config = SimulationConfig {
        node_count: 20,
        key_count: 50,
        m: 12,
        output_dir: dir.to_string_lossy().to_string(),
        ..Default::default()
    };
    let config_path = dir.join("config.yaml");
    config.write_fs(&config_path).unwrap();
    let config = SimulationConfig::read_fs(&config_path).unwrap();

    let mut sim = Simulator::new(config.clone()).unwrap();
    sim.build().unwrap();
    let report = sim.run().unwrap();
    let path = report.write_fs(config.output_file().unwrap()).unwrap();
    assert_eq!(path, dir.join("output_20_nodes_m12.txt"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 51);
    assert!(lines[0].starts_with("key 1 ("));
    assert!(lines[0].contains(": Node "));
    assert!(lines.iter().take(50).all(|l| !l.contains("MISS")));
    assert_eq!(lines[50], report.summary_line());
    assert!(lines[50].starts_with("average hop count = "));

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_runs_are_reproducible() {
    let config = SimulationConfig {
        node_count: 30,
        key_count: 40,
        m: 16,
        ..Default::default()
    };
    let mut first = Simulator::new(config.clone()).unwrap();
    first.build().unwrap();
    let mut second = Simulator::new(config).unwrap();
    second.build().unwrap();
    assert_eq!(first.run().unwrap(), second.run().unwrap());
    assert_eq!(first.inspect().unwrap(), second.inspect().unwrap());
    assert_eq!(first.ring_line().unwrap(), second.ring_line().unwrap());
}
