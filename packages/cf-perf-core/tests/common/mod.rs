//! Stub `cf` executable for driving the real process runner.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cf_perf_core::{CfCli, Config};
use tempfile::TempDir;

/// Listing body with the given GUIDs.
pub fn listing(guids: &[&str]) -> String {
    let resources: Vec<String> = guids
        .iter()
        .map(|g| format!(r#"{{"guid":"{}","name":"{}.example.com"}}"#, g, g))
        .collect();
    format!(r#"{{"pagination":{{}},"resources":[{}]}}"#, resources.join(","))
}

/// A shell script standing in for `cf`. Every call appends
/// `<CF_HOME>|<args>` to a log file before running `body`.
pub struct StubCf {
    dir: TempDir,
    path: PathBuf,
    log: PathBuf,
}

impl StubCf {
    /// `body` is shell code; `$*` holds the arguments.
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cf");
        let log = dir.path().join("calls.log");
        let script = format!(
            "#!/bin/sh\necho \"$CF_HOME|$*\" >> '{}'\n{}\n",
            log.display(),
            body
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, path, log }
    }

    /// A stub that succeeds silently for every command.
    pub fn ok() -> Self {
        Self::new("exit 0")
    }

    pub fn cli(&self) -> CfCli {
        CfCli::new(&self.path)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// `(cf_home, args)` for every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.split_once('|'))
            .map(|(home, args)| (home.to_string(), args.to_string()))
            .collect()
    }

    /// Just the argument strings.
    pub fn args(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, args)| args).collect()
    }

    /// Config pointing at this stub with short timeouts.
    pub fn config(&self) -> Config {
        Config {
            api: "https://api.example.com".to_string(),
            admin_user: "admin".to_string(),
            admin_password: "admin-secret".to_string(),
            cf_binary: self.path.clone(),
            basic_timeout: Duration::from_secs(5),
            long_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            samples: 3,
            ..Default::default()
        }
    }
}

/// Drives `future` on a current-thread runtime, as the benchmark binary does.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}
