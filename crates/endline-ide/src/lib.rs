//! Automatic statement termination for Java editors.
//!
//! When the user commits a line (usually with Enter), [`AutomaticLineEnder`] decides whether
//! the statement, field or import under the caret lacks its `;`. It only inserts one after a
//! speculative parse of the completed fragment comes back clean; afterwards it opens the new
//! line and re-formats the touched statement.
//!
//! The editor side is abstracted behind [`Document`] and [`EditorOperations`];
//! [`InMemoryDocument`] implements both for hosts without a buffer model of their own and
//! for tests. Key presses are routed through an explicit [`CommandRegistry`].

pub mod command;
pub mod config;
pub mod document;
pub mod line_ender;

pub use command::{CommandContext, CommandRegistry, Dispatch, KeyCommand, KeyCommandHandler};
pub use config::{global_log_buffer, init_tracing, IdeConfig, LogBuffer, LoggingConfig};
pub use document::{Cancelled, Document, EditorOperations, InMemoryDocument};
pub use line_ender::{
    apply_formatting, check_termination, find_owning_unit, resolve_terminal_token,
    validate_location, Abstain, AutomaticLineEnder, Decision, NotApplicable, OwningUnit,
    Rejected, Veto, TERMINATOR,
};
