// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time stamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC time at millisecond precision, used for record stamps.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
