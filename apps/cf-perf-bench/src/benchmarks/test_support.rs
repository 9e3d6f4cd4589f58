//! Stub `cf` for driving benchmark cases through the real runner.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use cf_perf_core::{CfCli, Config, SuiteSetup};
use tempfile::TempDir;

pub const ORG_GUID: &str = "org-1";
pub const DOMAIN_GUID: &str = "dom-1";

/// Listing body with one resource.
pub fn listing(guid: &str) -> String {
    format!(
        r#"{{"pagination":{{}},"resources":[{{"guid":"{}","name":"{}"}}]}}"#,
        guid, guid
    )
}

/// Shell `case` arms answering the two discovery listings.
pub fn listing_arms() -> String {
    format!(
        "  \"curl --fail /v3/organizations\") echo '{}' ;;\n  \"curl --fail /v3/domains\") echo '{}' ;;\n",
        listing(ORG_GUID),
        listing(DOMAIN_GUID)
    )
}

/// A shell script standing in for `cf`. Every call appends
/// `<CF_HOME>|<args>` to a log file before matching `arms` against `$*`.
/// `$state` is the stub's directory, for marker files.
pub struct StubCf {
    _dir: TempDir,
    path: PathBuf,
    log: PathBuf,
}

impl StubCf {
    /// `arms` are `case "$*"` arms; unmatched calls exit 0.
    pub fn new(arms: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cf");
        let log = dir.path().join("calls.log");
        let script = format!(
            "#!/bin/sh\nstate=\"$(dirname \"$0\")\"\necho \"$CF_HOME|$*\" >> '{}'\ncase \"$*\" in\n{}esac\nexit 0\n",
            log.display(),
            arms
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self {
            _dir: dir,
            path,
            log,
        }
    }

    /// Answers discovery listings, succeeds for everything else.
    pub fn listings() -> Self {
        Self::new(&listing_arms())
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

    /// Argument strings of the calls made after the first `skip`.
    pub fn args_after(&self, skip: usize) -> Vec<String> {
        self.calls().into_iter().skip(skip).map(|(_, args)| args).collect()
    }

    pub fn config(&self) -> Config {
        Config {
            api: "https://api.example.com".to_string(),
            admin_user: "admin".to_string(),
            admin_password: "admin-secret".to_string(),
            cf_binary: self.path.clone(),
            basic_timeout: Duration::from_secs(5),
            long_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            samples: 2,
            ..Default::default()
        }
    }

    /// Runs suite setup against this stub; returns it with the number of
    /// calls setup made.
    pub async fn suite(&self, config: Config) -> (SuiteSetup, usize) {
        let suite = SuiteSetup::setup(CfCli::new(&self.path), config)
            .await
            .unwrap();
        let setup_calls = self.calls().len();
        (suite, setup_calls)
    }
}

/// Drives `future` on a current-thread runtime, as `main` does.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}
