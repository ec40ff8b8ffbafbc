//! # Core Application Logic
//!
//! This module contains sshfolio's business logic.
//! It knows nothing about terminals, SSH, or any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Content (profile)    │
//!                    │  • State (cursors)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │   Server   │
//!            │  Adapter   │◄───────────│ (russh)    │
//!            │ (ratatui)  │  sessions  │            │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`content`]: The profile being served, shared read-only by all sessions
//! - [`links`]: URL extraction from section text
//! - [`state`]: The `NavigationState` struct, one per session
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod content;
pub mod links;
pub mod state;
