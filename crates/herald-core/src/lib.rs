//! # Herald Core
//!
//! The narrow interfaces the Herald dispatcher needs from the outside world,
//! plus a few in-memory implementations of them.
//!
//! The dispatcher itself never talks to a chat network or a database. It only
//! sees three collaborators:
//!
//! - [`Messenger`]: delivers a text message to an actor (fire-and-forget).
//! - [`ProfileStore`]: looks up or creates an actor's [`Profile`], records
//!   interactions and tracks whether the actor is blocked.
//! - [`TextResolver`]: resolves localized strings while commands are being
//!   registered.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Transport  │────▶│  Dispatcher  │────▶│  Messenger  │
//! │ (external)  │     │  (framework) │────▶│ ProfileStore│
//! └─────────────┘     └──────────────┘     └─────────────┘
//! ```

pub mod error;
pub mod i18n;
pub mod messenger;
pub mod profile;

pub use error::{LanguageError, SendError, SendResult, StoreError, StoreResult};
pub use i18n::{LanguageTable, TextResolver, interpolate};
pub use messenger::{BoxedMessenger, Messenger, RecordingMessenger};
pub use profile::{BoxedProfileStore, MemoryProfileStore, Profile, ProfileStore};
