use std::sync::Mutex;

use tempfile::NamedTempFile;

use doorplate_labeller::config::LabellerConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "DOORPLATE_CONFIG",
        "DOORPLATE_HISTORY_CAPACITY",
        "DOORPLATE_BACKEND",
        "DOORPLATE_SAVE_IMAGES",
        "DOORPLATE_NOISE_DIR",
        "DOORPLATE_NUMBER_DIR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "history_capacity": 5,
        "backend": "stub",
        "debug_images": {
            "enabled": true,
            "noise_dir": "buckets/noise",
            "number_dir": "buckets/number"
        },
        "models": {
            "detector_confidence": 0.4,
            "classifier_input": 64
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("DOORPLATE_CONFIG", file.path());
    std::env::set_var("DOORPLATE_HISTORY_CAPACITY", "7");
    std::env::set_var("DOORPLATE_NOISE_DIR", "buckets/noise_override");

    let cfg = LabellerConfig::load().expect("load config");

    assert_eq!(cfg.history_capacity, 7);
    assert_eq!(cfg.backend, "stub");
    assert!(cfg.debug_images.enabled);
    assert_eq!(
        cfg.debug_images.noise_dir.to_str().unwrap(),
        "buckets/noise_override"
    );
    assert_eq!(
        cfg.debug_images.number_dir.to_str().unwrap(),
        "buckets/number"
    );
    assert!((cfg.models.detector_confidence - 0.4).abs() < f32::EPSILON);
    assert_eq!(cfg.models.classifier_input, 64);

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = LabellerConfig::load().expect("load config");

    assert_eq!(cfg.history_capacity, 10);
    assert_eq!(cfg.backend, "stub");
    assert!(!cfg.debug_images.enabled);
    assert_eq!(cfg.models.classifier_input, 48);
    assert_eq!(cfg.models.detector_width, 640);
}

#[test]
fn zero_capacity_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("DOORPLATE_HISTORY_CAPACITY", "0");
    let result = LabellerConfig::load();
    assert!(result.is_err());

    clear_env();
}

#[test]
fn identical_debug_buckets_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("DOORPLATE_SAVE_IMAGES", "true");
    std::env::set_var("DOORPLATE_NOISE_DIR", "buckets/same");
    std::env::set_var("DOORPLATE_NUMBER_DIR", "buckets/same");
    let result = LabellerConfig::load();
    assert!(result.is_err());

    clear_env();
}
