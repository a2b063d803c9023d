//! core-actions: the modal editing engine.
//!
//! * [`edit`] - pure edit operations (`x`, `dd`, `dw`, `p`, visual `d`, ...)
//! * [`search`] - case-insensitive literal search
//! * [`Editor`] - the state machine: key translation, allow-list validation,
//!   dispatch and lesson attempt bookkeeping
//!
//! Everything is synchronous: one key is fully applied before `dispatch`
//! returns.

mod dispatcher;
pub mod edit;
mod editor;
mod key_translator;
pub mod search;

pub use dispatcher::DispatchResult;
pub use editor::{Editor, StateSnapshot};
pub use key_translator::{KeyTranslator, Translation};
