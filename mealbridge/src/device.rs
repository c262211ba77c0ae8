//! Device state snapshots for admission decisions.
//!
//! The prefetch queue gates every admission on a fresh snapshot of the
//! device's network, battery, and memory condition. This module defines the
//! snapshot value and the provider contract the platform shell implements;
//! obtaining the underlying platform readings is the shell's concern.

use std::sync::RwLock;

/// Network connectivity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkState {
    /// Connected via wifi.
    Wifi,
    /// Connected via a cellular radio.
    Cellular,
    /// No connectivity.
    Offline,
    /// Connectivity could not be determined.
    #[default]
    Unknown,
}

impl std::fmt::Display for NetworkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wifi => write!(f, "wifi"),
            Self::Cellular => write!(f, "cellular"),
            Self::Offline => write!(f, "offline"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Snapshot of device conditions relevant to prefetch admission.
///
/// Always a fresh value captured at or near admission-check time, never a
/// cached struct mutated in place. Fields that cannot be read from the
/// platform default to the conservative side (unknown network, metered).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// Current network classification.
    pub network: NetworkState,
    /// Whether the connection is metered (cellular or capped wifi).
    pub metered: bool,
    /// Whether the battery is below the platform's low threshold.
    pub low_battery: bool,
    /// Whether the platform has signalled memory pressure.
    pub low_memory: bool,
    /// Whether the device is currently charging.
    pub charging: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            network: NetworkState::Unknown,
            metered: true,
            low_battery: false,
            low_memory: false,
            charging: false,
        }
    }
}

impl DeviceState {
    /// Check whether the device is offline.
    pub fn is_offline(&self) -> bool {
        self.network == NetworkState::Offline
    }

    /// Check for an unmetered wifi connection.
    ///
    /// `Unknown` network counts as non-wifi. This is the constraint check
    /// used by the background scheduler; the admission gates use the raw
    /// `metered` flag directly.
    pub fn unmetered_wifi(&self) -> bool {
        self.network == NetworkState::Wifi && !self.metered
    }

    /// Check whether the battery can sustain background work.
    pub fn battery_ok(&self) -> bool {
        !self.low_battery || self.charging
    }
}

/// Source of device state snapshots.
///
/// Implementations read whatever platform APIs are available and map them
/// into a [`DeviceState`]. The read must be side-effect free and infallible;
/// unavailable readings fall back to the conservative defaults.
pub trait DeviceStateProvider: Send + Sync {
    /// Capture the current device state.
    fn snapshot(&self) -> DeviceState;
}

/// Provider returning a fixed, swappable device state.
///
/// Useful for tests and for shells that push state changes into the core
/// rather than having the core poll the platform.
#[derive(Debug, Default)]
pub struct StaticDeviceState {
    state: RwLock<DeviceState>,
}

impl StaticDeviceState {
    /// Create a provider with the given initial state.
    pub fn new(state: DeviceState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Convenience constructor: healthy device on unmetered wifi.
    pub fn wifi() -> Self {
        Self::new(DeviceState {
            network: NetworkState::Wifi,
            metered: false,
            ..DeviceState::default()
        })
    }

    /// Convenience constructor: metered cellular connection.
    pub fn cellular() -> Self {
        Self::new(DeviceState {
            network: NetworkState::Cellular,
            metered: true,
            ..DeviceState::default()
        })
    }

    /// Convenience constructor: no connectivity.
    pub fn offline() -> Self {
        Self::new(DeviceState {
            network: NetworkState::Offline,
            ..DeviceState::default()
        })
    }

    /// Replace the published state.
    pub fn set(&self, state: DeviceState) {
        if let Ok(mut guard) = self.state.write() {
            *guard = state;
        }
    }
}

impl DeviceStateProvider for StaticDeviceState {
    fn snapshot(&self) -> DeviceState {
        self.state.read().map(|s| *s).unwrap_or_default()
    }
}
