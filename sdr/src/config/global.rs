/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Process-wide merge configuration.
//!
//! The configuration is seeded from the environment on first use.
//! Operations read it once at entry, so changing it mid-operation
//! has no effect on that operation.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::RwLock;

use super::SdrConfig;

static CONFIG: LazyLock<RwLock<SdrConfig>> = LazyLock::new(|| RwLock::new(SdrConfig::from_env()));

/// The current configuration.
pub fn get() -> SdrConfig {
    *CONFIG.read().unwrap()
}

/// Replace the current configuration.
pub fn set(config: SdrConfig) {
    *CONFIG.write().unwrap() = config;
}

/// Reinitialize the configuration from environment variables.
pub fn init_from_env() {
    let config = SdrConfig::from_env();
    tracing::info!(?config, "sdr config initialized from environment");
    set(config);
}

/// Initialize the configuration from a YAML file.
pub fn init_from_yaml<P: AsRef<Path>>(path: P) -> Result<(), anyhow::Error> {
    let config = SdrConfig::from_yaml(path)?;
    tracing::info!(?config, "sdr config initialized from file");
    set(config);
    Ok(())
}

/// Acquire the global configuration lock.
///
/// Serializes mutations of the global configuration. Tests hold the
/// returned [`ConfigLock`] to install a temporary configuration with
/// [`ConfigLock::override_config`]; the previous value is restored
/// when the override guard drops.
///
/// # Example
/// ```rust
/// use sdr::config::SdrConfig;
/// use sdr::config::Traversal;
/// use sdr::config::global;
///
/// let lock = global::lock();
/// let _guard = lock.override_config(SdrConfig {
///     traversal: Traversal::Linear,
///     ..SdrConfig::default()
/// });
/// assert_eq!(global::get().traversal, Traversal::Linear);
/// ```
pub fn lock() -> ConfigLock {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    ConfigLock {
        _guard: MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
    }
}

/// Holds the global configuration lock.
pub struct ConfigLock {
    _guard: MutexGuard<'static, ()>,
}

impl ConfigLock {
    /// Install `config` until the returned guard is dropped.
    pub fn override_config(&self, config: SdrConfig) -> ConfigGuard<'_> {
        let previous = get();
        set(config);
        ConfigGuard {
            previous,
            _lock: PhantomData,
        }
    }
}

/// Restores the previous configuration on drop. Cannot outlive the
/// [`ConfigLock`] that created it.
pub struct ConfigGuard<'a> {
    previous: SdrConfig,
    _lock: PhantomData<&'a ConfigLock>,
}

impl Drop for ConfigGuard<'_> {
    fn drop(&mut self) {
        set(self.previous);
    }
}
