//! Suite bootstrap and teardown.
//!
//! Logs the admin in, provisions an org, a space and a regular user (unless
//! existing ones are configured), and removes only what it created.

use crate::cf::CfCli;
use crate::config::Config;
use crate::error::Result;
use crate::user::{Role, Target, UserContext};

const ORG_ROLE: &str = "OrgManager";
const SPACE_ROLE: &str = "SpaceDeveloper";

/// Names of the resources a run works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNames {
    pub org: String,
    pub space: String,
    pub user: String,
    pub password: String,
}

impl TestNames {
    /// Generates `<prefix>-ORG-<id>`, `<prefix>-SPACE-<id>` and
    /// `<prefix>-USER-<id>` with a shared random id.
    pub fn generate(prefix: &str) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let short = &id[..8];
        Self {
            org: format!("{}-ORG-{}", prefix, short),
            space: format!("{}-SPACE-{}", prefix, short),
            user: format!("{}-USER-{}", prefix, short),
            password: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Resources this run created and must remove.
#[derive(Debug, Default)]
struct Created {
    org: Option<String>,
    user: Option<String>,
}

impl Created {
    async fn remove(&mut self, cli: &CfCli, admin: &UserContext, config: &Config) {
        if let Some(user) = self.user.take() {
            tracing::info!("Deleting user {}", user);
            if let Err(e) = cli
                .run_checked(admin, &["delete-user", "-f", &user], config.long_timeout)
                .await
            {
                tracing::warn!("Failed to delete user {}: {}", user, e);
            }
        }

        if let Some(org) = self.org.take() {
            tracing::info!("Deleting org {}", org);
            if let Err(e) = cli
                .run_checked(admin, &["delete-org", "-f", &org], config.long_timeout)
                .await
            {
                tracing::warn!("Failed to delete org {}: {}", org, e);
            }
        }
    }
}

/// Admin and regular user contexts for one run.
#[derive(Debug)]
pub struct SuiteSetup {
    cli: CfCli,
    config: Config,
    admin: UserContext,
    regular: UserContext,
    created: Created,
}

impl SuiteSetup {
    /// Authenticates both users, creating the regular user and its org/space
    /// first when needed. Anything created before a failure is removed again.
    pub async fn setup(cli: CfCli, config: Config) -> Result<Self> {
        let names = TestNames::generate(&config.name_prefix);

        let mut admin = UserContext::new(Role::Admin, &config.admin_user, &config.admin_password)?;
        admin.login(&cli, &config).await?;

        let mut created = Created::default();
        let regular = match provision(&cli, &admin, &config, &names, &mut created).await {
            Ok(regular) => regular,
            Err(e) => {
                created.remove(&cli, &admin, &config).await;
                return Err(e);
            }
        };

        let mut setup = Self {
            cli,
            config,
            admin,
            regular,
            created,
        };
        if let Err(e) = setup.regular.login(&setup.cli, &setup.config).await {
            setup.teardown().await;
            return Err(e);
        }
        Ok(setup)
    }

    pub fn cli(&self) -> &CfCli {
        &self.cli
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn admin(&self) -> &UserContext {
        &self.admin
    }

    pub fn regular_user(&self) -> &UserContext {
        &self.regular
    }

    pub fn context(&self, role: Role) -> &UserContext {
        match role {
            Role::Admin => &self.admin,
            Role::Regular => &self.regular,
        }
    }

    /// Logs the regular user out, deletes created resources and logs the
    /// admin out. Failures are logged and do not stop the remaining steps.
    pub async fn teardown(&mut self) {
        if let Err(e) = self.regular.logout(&self.cli, &self.config).await {
            tracing::warn!("Failed to log out regular user: {}", e);
        }

        self.created
            .remove(&self.cli, &self.admin, &self.config)
            .await;

        if let Err(e) = self.admin.logout(&self.cli, &self.config).await {
            tracing::warn!("Failed to log out admin: {}", e);
        }
    }
}

/// Creates (or selects) the org, space and regular user, recording what it
/// created in `created` as it goes.
async fn provision(
    cli: &CfCli,
    admin: &UserContext,
    config: &Config,
    names: &TestNames,
    created: &mut Created,
) -> Result<UserContext> {
    let timeout = config.basic_timeout;

    let target = if config.use_existing_organization {
        Target {
            org: config.existing_organization.clone(),
            space: config.existing_space.clone(),
        }
    } else {
        tracing::info!("Creating org {} and space {}", names.org, names.space);
        cli.run_checked(admin, &["create-org", &names.org], timeout)
            .await?;
        created.org = Some(names.org.clone());
        cli.run_checked(
            admin,
            &["create-space", &names.space, "-o", &names.org],
            timeout,
        )
        .await?;
        Target {
            org: names.org.clone(),
            space: names.space.clone(),
        }
    };

    let (username, password) = if config.use_existing_user {
        (
            config.existing_user.as_str(),
            config.existing_user_password.as_str(),
        )
    } else {
        tracing::info!("Creating user {}", names.user);
        cli.run_checked(
            admin,
            &["create-user", &names.user, &names.password],
            timeout,
        )
        .await?;
        created.user = Some(names.user.clone());
        (names.user.as_str(), names.password.as_str())
    };

    // An existing user still needs roles in an org created by this run.
    if created.user.is_some() || created.org.is_some() {
        cli.run_checked(
            admin,
            &["set-org-role", username, &target.org, ORG_ROLE],
            timeout,
        )
        .await?;
        cli.run_checked(
            admin,
            &["set-space-role", username, &target.org, &target.space, SPACE_ROLE],
            timeout,
        )
        .await?;
    }

    let user = UserContext::new(Role::Regular, username, password)?;
    Ok(user.with_target(target))
}
