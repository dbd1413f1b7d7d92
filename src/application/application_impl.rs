use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{ManifestError, SeedManifest};
use crate::filesystem::{Repository, RepositoryError, SnapshotId};
use crate::shell::{Renderer, Shell};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();

        let manifest = match &app_config.manifest {
            Some(path) => SeedManifest::read(path).await.context(ManifestSnafu)?,
            None => {
                info!("No manifest given, seeding the demo data set");
                SeedManifest::demo()
            }
        };

        let repository = Self::seed_repository(&manifest)?;

        let color = app_config.color.enabled();
        colored::control::set_override(color);
        debug!("Colored output enabled: {color}");

        let mut shell = Shell::new(repository, Renderer::new(color));
        let mut out = io::stdout().lock();
        match &app_config.command {
            Some(line) => {
                shell.execute_line(line, &mut out).context(TerminalSnafu)?;
            }
            None => shell.run(io::stdin().lock(), &mut out).context(TerminalSnafu)?,
        }

        Ok(())
    }

    fn seed_repository(manifest: &SeedManifest) -> Result<Repository, ApplicationError> {
        let mut repository = Repository::new();
        for id in SnapshotId::ALL {
            repository
                .load(id, manifest.entries(id).iter().cloned())
                .context(SeedSnafu { snapshot: id })?;
            if repository.snapshot(id).is_empty() {
                info!("Snapshot '{id}' starts empty");
            }
        }
        Ok(repository)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading the seed manifest"))]
    ManifestError { source: ManifestError },
    #[snafu(display("Seed data for snapshot '{}' could not be loaded", snapshot))]
    SeedError {
        snapshot: SnapshotId,
        source: RepositoryError,
    },
    #[snafu(display("Failed to talk to the terminal"))]
    TerminalError { source: io::Error },
}
