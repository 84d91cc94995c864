use rl::{snapshot_path, Role, Snapshot};

fn scratch_dir(test: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("needle_rl_snapshots").join(test);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn save_load_round_trip() {
    let dir = scratch_dir("round_trip");
    let snapshot = Snapshot {
        layers: vec![vec![0.5, -1.25, 3.0], vec![0.0]],
    };
    snapshot.save(&dir, "td3_gate2", Role::Actor).unwrap();
    let restored = Snapshot::load(&dir, "td3_gate2", Role::Actor).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn filename_convention() {
    let dir = scratch_dir("convention");
    let snapshot = Snapshot {
        layers: vec![vec![1.0]],
    };
    snapshot.save(&dir, "ppo_run7", Role::Critic).unwrap();
    assert_eq!(
        snapshot_path(&dir, "ppo_run7", Role::Critic),
        dir.join("ppo_run7_critic.json")
    );
    assert!(dir.join("ppo_run7_critic.json").exists());
    assert!(!dir.join("ppo_run7_actor.json").exists());
}

#[test]
fn load_missing_snapshot_fails() {
    let dir = scratch_dir("missing");
    assert!(Snapshot::load(&dir, "nope", Role::Actor).is_err());
}
