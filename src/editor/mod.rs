//! Editor Session Layer
//!
//! Keeps local dial-plan graph state in sync with the backend:
//! - Session with per-context graph cache and capability-driven read-only mode
//! - Node type change state machine
//! - User-facing notices for every failed action
//! - `.conf` export of generated dial plans

// Graph synchronization session
pub mod session;

// Node type change reconciliation
pub mod type_change;

// Notice sinks (toasts)
pub mod notify;

// Dial-plan file export
pub mod export;

pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use session::{EditorMode, EditorSession};
pub use type_change::{TypeChangeOutcome, TypeChangeState};
