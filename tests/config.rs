use std::sync::Mutex;

use tempfile::NamedTempFile;

use labelkit::AnnotatorConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in ["LABELKIT_CONFIG", "LABELKIT_BOX_SIZE", "LABELKIT_MOVE_STEP"] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = AnnotatorConfig::load().expect("load config");
    assert_eq!(cfg.box_size, 100);
    assert_eq!(cfg.move_step, 5);

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "box_size": 64,
        "move_step": 3
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("LABELKIT_CONFIG", file.path());
    std::env::set_var("LABELKIT_MOVE_STEP", "9");

    let cfg = AnnotatorConfig::load().expect("load config");

    assert_eq!(cfg.box_size, 64);
    assert_eq!(cfg.move_step, 9);

    clear_env();
}

#[test]
fn partial_config_files_fall_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, br#"{ "box_size": 48 }"#).expect("write config");
    std::env::set_var("LABELKIT_CONFIG", file.path());

    let cfg = AnnotatorConfig::load().expect("load config");
    assert_eq!(cfg.box_size, 48);
    assert_eq!(cfg.move_step, 5);

    clear_env();
}

#[test]
fn rejects_out_of_range_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("LABELKIT_BOX_SIZE", "0");
    assert!(AnnotatorConfig::load().is_err());

    std::env::set_var("LABELKIT_BOX_SIZE", "100");
    std::env::set_var("LABELKIT_MOVE_STEP", "-1");
    assert!(AnnotatorConfig::load().is_err());

    std::env::set_var("LABELKIT_MOVE_STEP", "not-a-number");
    assert!(AnnotatorConfig::load().is_err());

    clear_env();
}
