use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated home for one test: its own data dir and config file.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let home = Self { dir };
        let config = format!(
            "data_dir = {:?}\nbackend = \"local\"\n",
            home.data_dir().display().to_string()
        );
        fs::write(home.config_path(), config).expect("failed to write config");
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session")
    }

    pub fn blob_path(&self, owner: &str) -> PathBuf {
        self.data_dir().join("tasks").join(format!("{owner}.json"))
    }
}

pub fn tsk_cmd(home: &TestHome) -> Command {
    let mut cmd = Command::cargo_bin("tsk").expect("binary");
    cmd.current_dir(home.path());
    cmd.env("TSK_CONFIG", home.config_path());
    cmd.env_remove("TSK_OWNER");
    cmd
}
