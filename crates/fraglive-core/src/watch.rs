use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Polling file-change detector for the watched shader file.
///
/// One stat per rendered frame, on the frame driver's cadence. The redundant
/// stat is the accepted cost of staying off platform watcher APIs.
///
/// Contract:
/// - an mtime different from the last observed one triggers exactly once;
/// - an inaccessible file observes as unknown and never triggers, so a
///   deleted file is silent until it reappears with a fresh mtime.
#[derive(Debug)]
pub struct ShaderWatch {
    path: PathBuf,
    last: Option<SystemTime>,
}

impl ShaderWatch {
    /// Starts watching `path`, priming the state with the current mtime.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last = mtime_of(&path);
        Self { path, last }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stats the watched file and reports whether its mtime moved since the
    /// last observation.
    pub fn poll(&mut self) -> bool {
        let stamp = mtime_of(&self.path);
        self.observe(stamp)
    }

    fn observe(&mut self, stamp: Option<SystemTime>) -> bool {
        match stamp {
            Some(t) if self.last != Some(t) => {
                self.last = Some(t);
                true
            }
            _ => false,
        }
    }
}

fn mtime_of(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn stamp(secs: u64) -> Option<SystemTime> {
        Some(UNIX_EPOCH + Duration::from_secs(secs))
    }

    #[test]
    fn unchanged_stamp_does_not_trigger() {
        let mut watch = ShaderWatch::new("unused.frag");
        watch.observe(stamp(10));
        assert!(!watch.observe(stamp(10)));
        assert!(!watch.observe(stamp(10)));
    }

    #[test]
    fn new_stamp_triggers_exactly_once() {
        let mut watch = ShaderWatch::new("unused.frag");
        watch.observe(stamp(10));
        assert!(watch.observe(stamp(11)));
        assert!(!watch.observe(stamp(11)));
    }

    #[test]
    fn unknown_stamp_never_triggers() {
        let mut watch = ShaderWatch::new("unused.frag");
        watch.observe(stamp(10));
        assert!(!watch.observe(None));
        assert!(!watch.observe(None));
    }

    #[test]
    fn reappearance_with_fresh_stamp_triggers_once() {
        let mut watch = ShaderWatch::new("unused.frag");
        watch.observe(stamp(10));
        assert!(!watch.observe(None));
        assert!(watch.observe(stamp(12)));
        assert!(!watch.observe(stamp(12)));
    }

    #[test]
    fn reappearance_with_same_stamp_is_silent() {
        let mut watch = ShaderWatch::new("unused.frag");
        watch.observe(stamp(10));
        assert!(!watch.observe(None));
        assert!(!watch.observe(stamp(10)));
    }

    #[test]
    fn poll_tracks_file_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("watched.frag");

        let mut watch = ShaderWatch::new(&path);
        assert!(!watch.poll(), "missing file must not trigger");

        fs::write(&path, "void main() {}").expect("write shader");
        assert!(watch.poll(), "first appearance must trigger");
        assert!(!watch.poll(), "unchanged file must not trigger");

        fs::remove_file(&path).expect("remove shader");
        assert!(!watch.poll(), "deleted file must not trigger");
        assert!(!watch.poll());
    }
}
