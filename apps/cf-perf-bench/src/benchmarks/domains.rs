use cf_perf_core::experiment::{Experiment, SamplingConfig};
use cf_perf_core::guids::{random_guid, wait_to_fail};
use cf_perf_core::{PerfError, Result, Role, SuiteSetup};

use super::REQUEST_TIME;

const DOMAINS: &str = "/v3/domains";
const ORGANIZATIONS: &str = "/v3/organizations";
const PATCH_BODY: &str = r#"{ "metadata": { "annotations": { "test": "PATCH /v3/domains/:guid" } } }"#;

/// Benchmark cases for the domains endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainCase {
    /// GET /v3/domains
    List(Role),
    /// GET /v3/domains?per_page=<large_page_size> as admin
    ListLargePage,
    /// GET /v3/organizations/:guid/domains
    OrgDomains(Role),
    /// GET /v3/domains/:guid
    Show(Role),
    /// PATCH /v3/domains/:guid as admin
    Update,
    /// DELETE /v3/domains/:guid as admin, then wait for it to 404
    Delete,
}

impl DomainCase {
    /// Cases in run order.
    pub fn all() -> Vec<Self> {
        vec![
            DomainCase::List(Role::Admin),
            DomainCase::List(Role::Regular),
            DomainCase::ListLargePage,
            DomainCase::OrgDomains(Role::Admin),
            DomainCase::OrgDomains(Role::Regular),
            DomainCase::Show(Role::Admin),
            DomainCase::Update,
            DomainCase::Delete,
            DomainCase::Show(Role::Regular),
        ]
    }

    pub fn role(&self) -> Role {
        match self {
            DomainCase::List(role) | DomainCase::OrgDomains(role) | DomainCase::Show(role) => *role,
            DomainCase::ListLargePage | DomainCase::Update | DomainCase::Delete => Role::Admin,
        }
    }

    pub fn destructive(&self) -> bool {
        matches!(self, DomainCase::Delete)
    }

    /// Experiment name, e.g. `GET /v3/domains/:guid as user`.
    pub fn name(&self, large_page_size: usize) -> String {
        let role = self.role();
        match self {
            DomainCase::List(_) => format!("GET {} as {}", DOMAINS, role),
            DomainCase::ListLargePage => format!(
                "GET {} as {} with page size {}",
                DOMAINS, role, large_page_size
            ),
            DomainCase::OrgDomains(_) => {
                format!("GET {}/:guid/domains as {}", ORGANIZATIONS, role)
            }
            DomainCase::Show(_) => format!("GET {}/:guid as {}", DOMAINS, role),
            DomainCase::Update => format!("PATCH {}/:guid as {}", DOMAINS, role),
            DomainCase::Delete => format!("DELETE {}/:guid as {}", DOMAINS, role),
        }
    }

    /// Samples this case into `experiment`.
    pub async fn run(&self, suite: &SuiteSetup, experiment: &mut Experiment) -> Result<()> {
        let cli = suite.cli();
        let config = suite.config();
        let ctx = suite.context(self.role());
        let sampling = SamplingConfig::from_config(config);
        let timeout = config.basic_timeout;

        match self {
            DomainCase::List(_) => {
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        cli.time_curl(ctx, timeout, &[DOMAINS]).await
                    })
                    .await
            }
            DomainCase::ListLargePage => {
                let path = format!("{}?per_page={}", DOMAINS, config.large_page_size);
                let path = path.as_str();
                let timeout = config.long_timeout;
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        cli.time_curl(ctx, timeout, &[path]).await
                    })
                    .await
            }
            DomainCase::OrgDomains(_) => {
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        let org = random_guid(cli, ctx, config, ORGANIZATIONS).await?;
                        let path = format!("{}/{}/domains", ORGANIZATIONS, org);
                        cli.time_curl(ctx, timeout, &[&path]).await
                    })
                    .await
            }
            DomainCase::Show(_) => {
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        let guid = random_guid(cli, ctx, config, DOMAINS).await?;
                        let path = format!("{}/{}", DOMAINS, guid);
                        cli.time_curl(ctx, timeout, &[&path]).await
                    })
                    .await
            }
            DomainCase::Update => {
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        let guid = random_guid(cli, ctx, config, DOMAINS).await?;
                        let path = format!("{}/{}", DOMAINS, guid);
                        cli.time_curl(ctx, timeout, &["-X", "PATCH", "-d", PATCH_BODY, &path])
                            .await
                    })
                    .await
            }
            DomainCase::Delete => {
                experiment
                    .sample_duration(REQUEST_TIME, sampling, move |_| async move {
                        let guid = random_guid(cli, ctx, config, DOMAINS).await?;
                        let path = format!("{}/{}", DOMAINS, guid);
                        let elapsed = cli.time_curl(ctx, timeout, &["-X", "DELETE", &path]).await?;

                        // Not timed: the next sample must not pick this domain again.
                        wait_to_fail(cli, ctx, config, &path).await?;
                        Ok::<_, PerfError>(elapsed)
                    })
                    .await
            }
        }
    }
}
