#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Column types for `tests/data/activity_log.csv`.
pub const ACTIVITY_LOG_TYPES: &str =
    "timestamp,string,zip,name,duration,duration,total-duration,string";

/// Expected output for `activity_log.csv` with a +3 hour offset.
pub const ACTIVITY_LOG_NORMALIZED: &str = "\
Timestamp,Address,ZIP,FullName,FooDuration,BarDuration,TotalDuration,Notes
2011-04-01T14:00:00,\"123 4th St, Anywhere, AA\",94121,Monkey Alberto,5012.5,5553.25,10565.75,I am the very model of a modern major general
2014-03-12T03:00:00,\"Somewhere Else, In Another Time, BB\",00001,Superman Übertan,401012.5,5553.25,406565.75,This is some Unicode right here. ü ¡! 😀
2016-02-29T15:11:11,111 Ste. #123123123,01101,Résumé Ron,113012.5,5553.25,118565.75,🏳️🏴🏳️🏴
";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory that is removed when dropped.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).expect("read temp file")
    }
}
