/*++

Licensed under the Apache-2.0 license.

File Name:

    mutex.rs

Abstract:

    File contains the simulated engine mutex shared by the processors on
    the secure bus.

--*/

use se_registers::se::mutex::*;

pub struct MutexModel {
    owner: u8,
    tmout_action: TmoutAction,
    watchdog_tmout: u32,
    watchdog_released: bool,
    stuck: bool,
}

impl Default for MutexModel {
    fn default() -> Self {
        Self {
            owner: MUTEX_OWNER_NONE,
            tmout_action: TmoutAction::empty(),
            watchdog_tmout: MUTEX_WATCHDOG_TMOUT_DEFAULT,
            watchdog_released: false,
            stuck: false,
        }
    }
}

impl MutexModel {
    pub fn owner(&self) -> u8 {
        self.owner
    }

    pub fn tmout_action(&self) -> TmoutAction {
        self.tmout_action
    }

    /// Hand the lock to another processor
    pub fn lock_as(&mut self, owner: u8) {
        self.owner = owner;
    }

    /// Drop the lock regardless of owner
    pub fn force_unlock(&mut self) {
        self.owner = MUTEX_OWNER_NONE;
    }

    /// Ignore release requests from now on
    pub fn stick(&mut self) {
        self.stuck = true;
    }

    /// Fire the lock watchdog. Returns true if the configured action asked
    /// for a PKA reset.
    pub fn fire_watchdog(&mut self) -> bool {
        if self.owner == MUTEX_OWNER_NONE {
            return false;
        }
        if self.tmout_action.contains(TmoutAction::RELEASE_MUTEX) {
            self.owner = MUTEX_OWNER_NONE;
            self.watchdog_released = true;
        }
        self.tmout_action.contains(TmoutAction::RESET_PKA)
    }

    /// Read on behalf of `requester`
    pub fn read(&mut self, requester: u8, addr: u32) -> Option<u32> {
        let val = match addr {
            MUTEX => {
                if self.owner == MUTEX_OWNER_NONE {
                    self.owner = requester;
                    self.watchdog_released = false;
                    self.tmout_action = TmoutAction::empty();
                    MUTEX_ACQUIRED
                } else {
                    0
                }
            }
            MUTEX_TMOUT_ACTION => self.tmout_action.bits(),
            MUTEX_WATCHDOG_TMOUT => self.watchdog_tmout,
            MUTEX_STATUS => {
                let released = if self.watchdog_released {
                    MUTEX_STATUS_WATCHDOG_RELEASED
                } else {
                    0
                };
                u32::from(self.owner) | released
            }
            MUTEX_RELEASE => 0,
            _ => return None,
        };
        Some(val)
    }

    /// Write on behalf of `requester`
    pub fn write(&mut self, requester: u8, addr: u32, val: u32) -> bool {
        match addr {
            MUTEX_RELEASE => {
                if val == MUTEX_RELEASE_REQUEST && self.owner == requester && !self.stuck {
                    self.owner = MUTEX_OWNER_NONE;
                }
            }
            MUTEX_TMOUT_ACTION => {
                if self.owner == requester {
                    self.tmout_action = TmoutAction::from_bits_truncate(val);
                }
            }
            MUTEX_WATCHDOG_TMOUT => self.watchdog_tmout = val,
            MUTEX => {}
            _ => return false,
        }
        true
    }
}
