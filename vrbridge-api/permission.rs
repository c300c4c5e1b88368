/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#[cfg(feature = "ipc")]
use serde::{Deserialize, Serialize};

/// An OS permission the bridge can request on the engine's behalf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum Permission {
    AudioCapture,
}

const PERMISSION_COUNT: usize = 1;

impl Permission {
    /// The permission identifier delivered to the native engine.
    pub fn id(self) -> i32 {
        self as i32
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Where one permission request stands. `Granted` and `Denied` are terminal
/// for the request that produced them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum PermissionState {
    NotRequested,
    Pending,
    Granted,
    Denied,
}

/// What the caller should do after issuing a request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub enum RequestOutcome {
    /// The OS already holds the grant; the terminal notification was raised
    /// without waiting for a callback.
    AlreadyGranted,
    /// The OS dialog must be shown; a result callback will follow.
    DialogRequired,
    /// A dialog for this permission is already outstanding.
    AlreadyPending,
}

/// The one-time terminal outcome of a request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ipc", derive(Serialize, Deserialize))]
pub struct PermissionEvent {
    pub permission: Permission,
    pub granted: bool,
}

/// Tracks the outstanding OS permission queries. Requests originate from an
/// explicit engine/user action; the bridge never retries on its own, and a
/// request left unanswered by the OS stays `Pending` forever.
#[derive(Debug)]
pub struct Permissions {
    states: [PermissionState; PERMISSION_COUNT],
}

impl Permissions {
    pub fn new() -> Permissions {
        Permissions {
            states: [PermissionState::NotRequested; PERMISSION_COUNT],
        }
    }

    pub fn state(&self, permission: Permission) -> PermissionState {
        self.states[permission.slot()]
    }

    /// Issues a request. `already_granted` is the host's synchronous
    /// permission check; when set, the request skips `Pending` entirely
    /// because some OS versions never deliver a callback for an
    /// already-held grant.
    pub fn request(&mut self, permission: Permission, already_granted: bool) -> RequestOutcome {
        let slot = permission.slot();
        if self.states[slot] == PermissionState::Pending {
            return RequestOutcome::AlreadyPending;
        }
        if already_granted {
            self.states[slot] = PermissionState::Granted;
            RequestOutcome::AlreadyGranted
        } else {
            self.states[slot] = PermissionState::Pending;
            RequestOutcome::DialogRequired
        }
    }

    /// Applies an OS result callback. Only the first transition out of
    /// `Pending` produces an event; duplicate callbacks are dropped.
    pub fn resolve(&mut self, permission: Permission, granted: bool) -> Option<PermissionEvent> {
        let slot = permission.slot();
        if self.states[slot] != PermissionState::Pending {
            return None;
        }
        self.states[slot] = if granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        Some(PermissionEvent {
            permission,
            granted,
        })
    }
}

impl Default for Permissions {
    fn default() -> Permissions {
        Permissions::new()
    }
}
