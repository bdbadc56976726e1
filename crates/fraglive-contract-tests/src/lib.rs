#![forbid(unsafe_code)]

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use fraglive_core::{
        load_viewer_config_from, ProgramSlot, ShaderWatch, ViewerConfig, ViewerError,
    };

    // ---- Golden fixtures (JSON contracts) ----
    const VIEWER_FULL_JSON: &str = include_str!("../fixtures/viewer_full.json");
    const VIEWER_EMPTY_JSON: &str = include_str!("../fixtures/viewer_empty.json");
    const VIEWER_UNKNOWN_KEY_JSON: &str = include_str!("../fixtures/viewer_unknown_key.json");
    const VIEWER_ZERO_SIZE_JSON: &str = include_str!("../fixtures/viewer_zero_size.json");

    fn write_temp_fixture(name: &str, contents: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        p.push(format!("fraglive_contract_tests_{name}_{ts}.json"));
        fs::write(&p, contents).expect("write fixture");
        p
    }

    #[test]
    fn golden_full_config_deserializes() {
        let path = write_temp_fixture("viewer_full", VIEWER_FULL_JSON);

        let cfg = load_viewer_config_from(&path).expect("viewer_full.json should parse");
        assert_eq!(cfg.shader, PathBuf::from("shaders/plasma.frag"));
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.title, "plasma dev");
        assert!(!cfg.vsync);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_empty_config_gives_defaults() {
        let path = write_temp_fixture("viewer_empty", VIEWER_EMPTY_JSON);

        let cfg = load_viewer_config_from(&path).expect("viewer_empty.json should parse");
        assert_eq!(cfg, ViewerConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_unknown_key_is_rejected() {
        let path = write_temp_fixture("viewer_unknown_key", VIEWER_UNKNOWN_KEY_JSON);

        let err = load_viewer_config_from(&path)
            .expect_err("viewer_unknown_key.json must fail (unknown key)");
        assert!(
            matches!(err, ViewerError::Json { .. }),
            "expected a json fault, got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_zero_size_is_rejected() {
        let path = write_temp_fixture("viewer_zero_size", VIEWER_ZERO_SIZE_JSON);

        let err = load_viewer_config_from(&path)
            .expect_err("viewer_zero_size.json must fail (zero window size)");

        // Keep this stable but not overly strict.
        let msg = err.to_string().to_lowercase();
        assert!(
            msg.contains("width") || msg.contains("height"),
            "expected error to mention width/height, got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_config_file_is_an_io_fault() {
        let err = load_viewer_config_from(std::path::Path::new("/nonexistent/fraglive.json"))
            .expect_err("must fail");
        assert!(matches!(err, ViewerError::Io { .. }));
    }

    // ---- Slot contract (single live program) ----

    #[test]
    fn slot_holds_exactly_one_program_across_a_reload_cycle() {
        let mut slot = ProgramSlot::new("first");
        let displaced = slot.install("second");
        assert_eq!(displaced, Some("first"));
        assert_eq!(slot.current(), Some(&"second"));

        assert_eq!(slot.take(), Some("second"));
        assert!(slot.current().is_none());
    }

    // ---- Watch contract (deletion is silent, recreation triggers once) ----

    #[test]
    fn watch_deletion_is_silent_and_recreation_triggers_once() {
        let mut path = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        path.push(format!("fraglive_contract_tests_watched_{ts}.frag"));
        fs::write(&path, "void main() {}").expect("write shader");

        let mut watch = ShaderWatch::new(&path);
        assert!(!watch.poll(), "freshly primed watch must not trigger");

        fs::remove_file(&path).expect("remove shader");
        assert!(!watch.poll(), "deleted file must not trigger");
        assert!(!watch.poll());

        std::thread::sleep(Duration::from_millis(50));
        fs::write(&path, "void main() { }").expect("rewrite shader");
        assert!(watch.poll(), "recreation must trigger");
        assert!(!watch.poll(), "and only once");

        let _ = fs::remove_file(path);
    }
}
