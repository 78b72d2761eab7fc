//! Fixed-window, per-IP limiters kept in process memory.
//!
//! Each limiter owns its own map; entries expire lazily when read. Updates go
//! through `DashMap::entry`, which holds the shard lock for the key, so
//! concurrent requests from one IP never lose an increment.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::{
    app::config::{LimitsConfig, SpamConfig},
    models::spam::{SpamCheck, SpamReason},
};

#[derive(Debug, Clone, Copy)]
struct LoginAttempts {
    failures: u32,
    locked_at: Option<Instant>,
}

/// Brute-force lockout for admin credentials.
#[derive(Debug)]
pub struct LoginLimiter {
    attempts: DashMap<String, LoginAttempts>,
    max_attempts: u32,
    lockout: Duration,
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::from_config(&LimitsConfig::default())
    }
}

impl LoginLimiter {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            lockout,
        }
    }

    pub fn from_config(config: &LimitsConfig) -> Self {
        Self::new(config.login_max_attempts, config.login_lockout)
    }

    pub fn record_failed_attempt(&self, ip: &str) {
        self.record_failed_attempt_at(ip, Instant::now());
    }

    pub fn record_failed_attempt_at(&self, ip: &str, now: Instant) {
        let mut entry = self.attempts.entry(ip.to_string()).or_insert(LoginAttempts {
            failures: 0,
            locked_at: None,
        });
        entry.failures = entry.failures.saturating_add(1);
        if entry.failures >= self.max_attempts {
            entry.locked_at = Some(now);
        }
    }

    pub fn is_rate_limited(&self, ip: &str) -> bool {
        self.is_rate_limited_at(ip, Instant::now())
    }

    pub fn is_rate_limited_at(&self, ip: &str, now: Instant) -> bool {
        !self.remaining_lockout_at(ip, now).is_zero()
    }

    /// Forget the IP entirely, e.g. after a successful sign-in.
    pub fn clear_attempts(&self, ip: &str) {
        self.attempts.remove(ip);
    }

    pub fn remaining_lockout(&self, ip: &str) -> Duration {
        self.remaining_lockout_at(ip, Instant::now())
    }

    /// Zero when the IP is not locked. An expired lockout is purged here.
    pub fn remaining_lockout_at(&self, ip: &str, now: Instant) -> Duration {
        let Some(locked_at) = self.attempts.get(ip).and_then(|entry| entry.locked_at) else {
            return Duration::ZERO;
        };

        let elapsed = now.saturating_duration_since(locked_at);
        if elapsed < self.lockout {
            return self.lockout - elapsed;
        }

        // Only drop the entry if nobody re-locked it in between.
        self.attempts
            .remove_if(ip, |_, entry| entry.locked_at == Some(locked_at));
        Duration::ZERO
    }

    pub fn reset(&self) {
        self.attempts.clear();
    }
}

#[derive(Debug, Clone, Copy)]
struct FloodWindow {
    count: u32,
    reset_at: Instant,
}

/// Comment flood control: at most `max_requests` accepted per window per IP.
#[derive(Debug)]
pub struct CommentFloodLimiter {
    windows: DashMap<String, FloodWindow>,
    window: Duration,
    max_requests: u32,
}

impl Default for CommentFloodLimiter {
    fn default() -> Self {
        Self::from_config(&SpamConfig::default())
    }
}

impl CommentFloodLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
        }
    }

    pub fn from_config(config: &SpamConfig) -> Self {
        Self::new(config.rate_window, config.rate_max)
    }

    pub fn check_rate_limit(&self, ip: &str) -> SpamCheck {
        self.check_rate_limit_at(ip, Instant::now())
    }

    pub fn check_rate_limit_at(&self, ip: &str, now: Instant) -> SpamCheck {
        let mut entry = self.windows.entry(ip.to_string()).or_insert(FloodWindow {
            count: 0,
            reset_at: now,
        });

        if now >= entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return SpamCheck::passed();
        }

        // Rejections leave the counter alone.
        if entry.count >= self.max_requests {
            return SpamCheck::rejected(SpamReason::RateLimit);
        }

        entry.count += 1;
        SpamCheck::passed()
    }

    pub fn reset(&self) {
        self.windows.clear();
    }
}
