//! # Core Application Logic
//!
//! The chat widget's business logic. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ ChatWidget │      │   tests    │
//!     │  Adapter   │      │ (one-shot) │      │            │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and its `WidgetFlags`
//! - [`action`]: The `Action` enum, `Effect`, and `update()`
//! - [`message`]: The append-only `Conversation`
//! - [`language`]: The supported languages
//! - [`identity`]: Session/user identifiers and where they are stored
//! - [`config`]: Config file + env + CLI resolution
//! - [`widget`]: Runs whole operations (send, listen, play) against `App`

pub mod action;
pub mod config;
pub mod identity;
pub mod language;
pub mod message;
pub mod state;
pub mod widget;
