use std::path::Path;

use pulse_settings::{
    config_file, saved_runs_dir, working_dir, CheckpointScheme, CheckpointStore,
    CheckpointTemplate, HistoryLog, HistoryRecord, RunConfig, RunPaths, CHECKPOINT_FILE,
    CHECKPOINT_SUBFOLDER, DRIVE_DIR, LOCAL_CHECKPOINT_FILENAME, LOG_FILE, LOG_FILENAME,
};

#[test]
fn working_dir_is_the_crate_directory() {
    let expected = Path::new(env!("CARGO_MANIFEST_DIR")).canonicalize().unwrap();
    assert_eq!(working_dir(), expected);
    assert_eq!(config_file(), expected.join("config.json"));
    assert_eq!(saved_runs_dir(), expected.join("saved_RNN_runs"));
}

#[test]
fn fixed_names() {
    assert_eq!(DRIVE_DIR, "/content/drive/My Drive/Colab_files/happiness/");
    assert_eq!(LOG_FILE, "model_history_log.csv");
    assert_eq!(LOG_FILENAME, "model_history_log.csv");
    assert_eq!(CHECKPOINT_SUBFOLDER, "checkpoints");
}

#[test]
fn epoch_two_checkpoint_names() {
    let drive = CheckpointTemplate::parse(CHECKPOINT_FILE).unwrap();
    let local = CheckpointTemplate::parse(LOCAL_CHECKPOINT_FILENAME).unwrap();
    assert_eq!(drive.file_name(2), "cp-02.ckpt");
    assert_eq!(local.file_name(2), "cp-0002.ckpt");
}

#[test]
fn a_run_end_to_end() {
    let root = std::env::temp_dir().join(format!("pulse-layout-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let paths = RunPaths::new(&root);

    let config = RunConfig {
        run_name: "pulses".to_string(),
        save_every: 2,
        ..RunConfig::default()
    };
    config.save(paths.config_file()).unwrap();
    let config = RunConfig::load_or_default(paths.config_file()).unwrap();
    paths.ensure_run_dirs(&config.run_name).unwrap();

    let log = HistoryLog::open(paths.history_log(&config.run_name)).unwrap();
    let store = CheckpointStore::new(
        paths.checkpoint_dir(&config.run_name),
        CheckpointScheme::Local.template(),
    );
    for epoch in 1..=5 {
        log.append(&HistoryRecord::new(epoch).with("loss", 1.0 / epoch as f64))
            .unwrap();
        if config.should_checkpoint(epoch) {
            std::fs::write(store.path_for(epoch), b"snapshot").unwrap();
        }
    }

    assert_eq!(log.read().unwrap().len(), 5);
    let epochs: Vec<u32> = store.list().unwrap().iter().map(|c| c.epoch).collect();
    assert_eq!(epochs, vec![2, 4]);
    assert_eq!(
        store.latest().unwrap().unwrap().path,
        paths.checkpoint_path("pulses", 4)
    );

    std::fs::remove_dir_all(&root).unwrap();
}
