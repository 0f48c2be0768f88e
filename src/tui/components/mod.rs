//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `LandingPage`: the property site behind the chat panel
//! - `Header`: assistant name, status, language, lead status
//! - `Bubble`: one chat message
//!
//! ### Stateful Components (Event-Driven)
//!
//! Transient wrappers around persistent state held in `TuiState`:
//! - `Composer`: message input, edits `App::composer` through a reference
//! - `MessageList`: scrollable conversation with typing indicator
//!
//! Components receive external data as props rather than reaching into
//! `App`, which keeps their dependencies explicit and their tests small.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── landing.rs       (site content + launcher)
//! ├── header.rs        (panel status row)
//! ├── message.rs       (single chat bubble)
//! ├── message_list.rs  (scrollable message container)
//! └── composer.rs      (message input)
//! ```

pub mod composer;
pub mod header;
pub mod landing;
pub mod message;
pub mod message_list;

pub use composer::{COMPOSER_HEIGHT, Composer, ComposerEvent, ComposerState};
pub use header::Header;
pub use landing::LandingPage;
pub use message::Bubble;
pub use message_list::{MessageList, MessageListState};
