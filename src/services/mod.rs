// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod scheduler;
pub mod seed;
pub mod session;

pub use scheduler::Sm2Scheduler;
pub use seed::{SeedError, SeedFile};
pub use session::{ReviewSession, ReviewSessions, ReviewState, SessionError};
