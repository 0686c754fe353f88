//! Interactive paginated lists for inline-keyboard chat UIs
//!
//! A [`Paginator`] holds the items, sort and filter state of one list and
//! renders it to text plus a button grid. A [`Session`] shows it in a chat
//! and runs as its own task; the [`SessionRegistry`] routes button taps to
//! the active session of each callback-data prefix.

pub mod delivery;
pub mod error;
pub mod filtering;
pub mod list;
pub mod ordmap;
pub mod paginator;
pub mod protocol;
pub mod registry;
pub mod render;
pub mod semantics;
pub mod session;
pub mod sorting;

#[cfg(test)]
mod testing;

pub use delivery::{ChatRef, Delivery, MessageRef};
pub use error::{DeliveryError, ProtocolError, SourceError};
pub use paginator::{Paginator, Step, ViewState};
pub use protocol::Command;
pub use registry::{Dispatch, SessionHandle, SessionRegistry};
pub use render::{Button, Edit, Keyboard, Snapshot};
pub use semantics::{ActionOutcome, DataSource, ItemSemantics};
pub use session::{Session, SessionConfig, Tap};
pub use sorting::{Direction, SortHeader};
