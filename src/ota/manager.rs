//! The check-and-flash cycle.

use super::checker::{Decision, VersionChecker};
use super::config::Config;
use super::error::Error;
use super::scheduler::{Clock, Scheduler};
use super::updater::{FirmwareFlasher, UpdateOutcome, Updater};
use crate::network::tls::{SecureConnect, TrustAnchor};
use rand_core::RngCore;

/// What one call to [`OtaManager::poll`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// The interval has not elapsed; nothing was done.
    NotDue,
    /// The version was checked and no update is needed (or it could not be fetched).
    UpToDate,
    /// A different version was published and the flasher ran.
    Flashed(UpdateOutcome),
}

/// Owns the scheduler, checker and updater plus the platform collaborators,
/// and runs the whole cycle from the caller's idle loop.
///
/// `S` opens TLS connections, `F` flashes firmware and `R` supplies the
/// cache-busting numbers.
#[derive(Debug)]
pub struct OtaManager<'a, S, F, R> {
    scheduler: Scheduler,
    checker: VersionChecker<'a>,
    updater: Updater<'a>,
    connector: S,
    flasher: F,
    rng: R,
}

impl<'a, S, F, R> OtaManager<'a, S, F, R>
where
    S: SecureConnect,
    F: FirmwareFlasher,
    R: RngCore,
{
    /// Validates `config` and sets up a manager whose first check is due one
    /// interval after `start`.
    pub fn new(
        config: &Config<'a>,
        trust_anchor: TrustAnchor<'a>,
        start: u32,
        connector: S,
        flasher: F,
        rng: R,
    ) -> Result<Self, Error> {
        config.validate()?;
        info!(
            "OTA: running {}, checking {} every {} ms",
            config.current_version,
            config.version_url,
            config.check_interval_ms
        );
        Ok(Self {
            scheduler: Scheduler::new(config.check_interval_ms, start),
            checker: VersionChecker::from_config(config, trust_anchor)?,
            updater: Updater::from_config(config, trust_anchor)?,
            connector,
            flasher,
            rng,
        })
    }

    /// Runs the cycle if the interval has elapsed at tick `now`.
    ///
    /// Blocks for the duration of the network round trip and, when an update
    /// is found, of the flashing attempt.
    pub fn poll(&mut self, now: u32) -> Cycle {
        if !self.scheduler.poll(now) {
            return Cycle::NotDue;
        }
        self.run_cycle()
    }

    /// [`poll`](Self::poll) with the tick read from `clock`.
    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &C) -> Cycle {
        self.poll(clock.now_ms())
    }

    /// Runs the cycle immediately and restarts the interval at `now`.
    pub fn check_now(&mut self, now: u32) -> Cycle {
        self.scheduler.reset(now);
        self.run_cycle()
    }

    fn run_cycle(&mut self) -> Cycle {
        match self.checker.check(&mut self.connector, &mut self.rng) {
            Decision::UpToDate => Cycle::UpToDate,
            Decision::UpdateAvailable => Cycle::Flashed(self.updater.run(&mut self.flasher)),
        }
    }

    /// The interval gate.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The TLS connector.
    pub fn connector(&self) -> &S {
        &self.connector
    }

    /// The firmware flasher.
    pub fn flasher(&self) -> &F {
        &self.flasher
    }

    /// Gives back the collaborators.
    pub fn into_parts(self) -> (S, F, R) {
        (self.connector, self.flasher, self.rng)
    }
}
