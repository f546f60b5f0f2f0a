//! Process-local sliding-window rate limiting
//!
//! Counters live in process memory and reset on restart; with multiple
//! worker processes each keeps its own windows. Best-effort throttling,
//! not a hard guarantee.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::{AppError, AppResult};

/// Login attempts: 5 per 5 minutes per IP
pub const LOGIN_LIMIT: Window = Window {
    max_requests: 5,
    duration: Duration::from_secs(300),
};

/// Registration attempts: 3 per hour per IP
pub const REGISTER_LIMIT: Window = Window {
    max_requests: 3,
    duration: Duration::from_secs(3600),
};

/// One sliding window definition
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub max_requests: usize,
    pub duration: Duration,
}

/// Named limiter scopes, each with its own per-IP windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    General,
    Login,
    Register,
}

impl Scope {
    fn label(&self) -> &'static str {
        match self {
            Scope::General => "request",
            Scope::Login => "login",
            Scope::Register => "registration",
        }
    }
}

pub struct RateLimiter {
    general: Window,
    hits: DashMap<(Scope, IpAddr), Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            general: Window {
                max_requests,
                duration: Duration::from_secs(window_secs),
            },
            hits: DashMap::new(),
        }
    }

    fn window(&self, scope: Scope) -> Window {
        match scope {
            Scope::General => self.general,
            Scope::Login => LOGIN_LIMIT,
            Scope::Register => REGISTER_LIMIT,
        }
    }

    /// Record a hit for the given scope and IP, rejecting once the window
    /// is full
    pub fn check(&self, scope: Scope, ip: IpAddr) -> AppResult<()> {
        self.check_at(scope, ip, Instant::now())
    }

    fn check_at(&self, scope: Scope, ip: IpAddr, now: Instant) -> AppResult<()> {
        let window = self.window(scope);
        let mut entry = self.hits.entry((scope, ip)).or_default();

        entry.retain(|t| now.duration_since(*t) < window.duration);

        if entry.len() >= window.max_requests {
            return Err(AppError::RateLimited(format!(
                "Too many {} attempts. Please try again later.",
                scope.label()
            )));
        }

        entry.push(now);
        Ok(())
    }
}
