// src/commands/mod.rs

//! Command flows
//!
//! Each command validates the whole batch of requested packages before it
//! mutates anything, prints its plan, asks for confirmation and then applies
//! packages one at a time, saving the ledger after every package.

mod install;
mod query;
mod remove;

pub use install::{install_packages, update_packages};
pub use query::{
    check_packages, clean_cache, if_installed, list_available, list_installed, show_untracked,
};
pub use remove::{merge_config, remove_packages};

use crate::config::Config;
use crate::db::{InstalledPackage, Ledger};
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::repository::RepositoryClient;
use crate::version::PackageRef;
use std::path::PathBuf;
use tracing::info;

/// Flags shared by install, update and remove
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Overwrite conflicting files
    pub force: bool,
    /// Stop after downloading
    pub download_only: bool,
    /// Answer yes to the confirmation prompt
    pub yes: bool,
    /// Answer no to the confirmation prompt
    pub no: bool,
    /// Skip HTTP repositories
    pub offline: bool,
    /// Skip certificate verification
    pub unverified_ssl: bool,
}

/// Everything a command needs: paths, the ledger and someone to ask
pub struct Session<'a> {
    pub config: Config,
    pub ledger: Ledger,
    pub options: Options,
    operator: &'a dyn Operator,
}

impl<'a> Session<'a> {
    /// Open the ledger under the configured root
    pub fn open(config: Config, options: Options, operator: &'a dyn Operator) -> Result<Self> {
        let ledger = Ledger::open(&config.db_path)?;
        Ok(Self {
            config,
            ledger,
            options,
            operator,
        })
    }

    pub fn operator(&self) -> &dyn Operator {
        self.operator
    }

    /// Ask whether to go ahead with the printed plan
    fn proceed(&self, default: bool) -> Result<bool> {
        if self.options.no {
            return Ok(false);
        }
        if self.options.yes {
            return Ok(true);
        }
        self.operator.confirm("continue?", default)
    }

    fn client(&self) -> Result<RepositoryClient> {
        RepositoryClient::new(self.options.unverified_ssl)
    }

    /// Download the archives in `urls`, in order
    fn fetch(&self, client: &RepositoryClient, urls: &[String]) -> Result<Vec<PathBuf>> {
        urls.iter()
            .map(|url| client.download_package_if_needed(url, &self.config.cache_dir))
            .collect()
    }

    /// Look up an installed package, matching the version if one is given
    fn installed(&self, package: &PackageRef) -> Result<&InstalledPackage> {
        let entry = self
            .ledger
            .get(&package.name)
            .ok_or_else(|| Error::NotFoundError(format!("Package {} not installed", package.name)))?;

        if let Some(version) = &package.version {
            if version != &entry.version {
                return Err(Error::NotFoundError(format!("Package {} not installed", package)));
            }
        }

        Ok(entry)
    }

    /// Requested packages, or every installed package when none are given
    fn requested_or_installed(&self, packages: &[String]) -> Vec<String> {
        if packages.is_empty() {
            self.ledger.names()
        } else {
            packages.to_vec()
        }
    }

    fn save(&self) -> Result<()> {
        self.ledger.save()?;
        info!("Saved {}", self.ledger.path().display());
        Ok(())
    }
}
