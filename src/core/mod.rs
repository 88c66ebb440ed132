//! # Core Session Logic
//!
//! This module contains the selector's state machine.
//! It knows nothing about terminals or the inventory's wire format.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Selection (model)    │
//!                    │  • Session (phases)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • View (text frame)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │ Inventory  │
//!            │  Adapter   │            │ (list and  │
//!            │ (ratatui)  │            │ interrupt) │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`selection`]: candidates, cursor and checked rows
//! - [`state`]: the `Session` value and its phases
//! - [`action`]: the `Action` enum and `update()`
//! - [`view`]: the textual frame for a session
//! - [`config`]: settings and their override hierarchy
//! - [`error`]: collaborator and session errors

pub mod action;
pub mod config;
pub mod error;
pub mod selection;
pub mod state;
pub mod view;
