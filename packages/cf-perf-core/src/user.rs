//! User identities for CLI invocations.
//!
//! Each context owns a private `CF_HOME`, so admin and regular user sessions
//! never share CLI state and switching identity is just picking a context.

use crate::cf::CfCli;
use crate::config::Config;
use crate::error::Result;
use std::fmt;
use std::path::Path;
use tempfile::TempDir;

/// Which kind of user a context represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Regular,
}

impl Role {
    /// Label used in experiment names.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Regular => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Org and space a context targets after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub org: String,
    pub space: String,
}

/// An authenticated (or authenticatable) CLI identity.
#[derive(Debug)]
pub struct UserContext {
    role: Role,
    username: String,
    password: String,
    target: Option<Target>,
    home: TempDir,
    logged_in: bool,
}

impl UserContext {
    /// Creates a context with a fresh, empty CLI home directory.
    pub fn new(role: Role, username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let home = tempfile::Builder::new()
            .prefix(&format!("cf-home-{}-", role.label()))
            .tempdir()?;
        Ok(Self {
            role,
            username: username.into(),
            password: password.into(),
            target: None,
            home,
            logged_in: false,
        })
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Directory exported as `CF_HOME` for every invocation in this context.
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Points the CLI at the API, authenticates and targets org/space.
    pub async fn login(&mut self, cli: &CfCli, config: &Config) -> Result<()> {
        let mut api_args = vec!["api", config.api.as_str()];
        if config.skip_ssl_validation {
            api_args.push("--skip-ssl-validation");
        }
        cli.run_checked(self, &api_args, config.basic_timeout).await?;
        cli.run_checked(
            self,
            &["auth", &self.username, &self.password],
            config.basic_timeout,
        )
        .await?;

        if let Some(target) = &self.target {
            cli.run_checked(
                self,
                &["target", "-o", &target.org, "-s", &target.space],
                config.basic_timeout,
            )
            .await?;
        }

        self.logged_in = true;
        tracing::info!("Logged in as {} ({})", self.username, self.role);
        Ok(())
    }

    /// Ends the CLI session. Safe to call when not logged in.
    pub async fn logout(&mut self, cli: &CfCli, config: &Config) -> Result<()> {
        if !self.logged_in {
            return Ok(());
        }
        cli.run_checked(self, &["logout"], config.basic_timeout)
            .await?;
        self.logged_in = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_get_distinct_homes() {
        let admin = UserContext::new(Role::Admin, "admin", "pw").unwrap();
        let user = UserContext::new(Role::Regular, "bob", "pw").unwrap();
        assert_ne!(admin.home(), user.home());
        assert!(admin.home().is_dir());
        assert!(!admin.is_logged_in());
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Regular.label(), "user");
    }

    #[test]
    fn test_with_target() {
        let ctx = UserContext::new(Role::Regular, "bob", "pw")
            .unwrap()
            .with_target(Target {
                org: "o".to_string(),
                space: "s".to_string(),
            });
        assert_eq!(ctx.target().map(|t| t.org.as_str()), Some("o"));
    }
}
