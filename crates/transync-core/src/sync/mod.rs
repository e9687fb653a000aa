//! Sync execution
//!
//! Carries out staged and drifted pairings: content moves from the side that
//! changed to the side that did not, and every completed item records a
//! fresh watermark.

mod executor;

pub use executor::SyncExecutor;

use crate::response::ActionType;
use crate::state::FsStateKind;

/// Direction of a content transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Backend content into the store
    Pull,
    /// Store content onto the backend
    Push,
    /// Delete both sides and the tracking row
    Remove,
}

/// Processing plan: states handled in each step, in order
pub(crate) const SYNC_STEPS: &[(&[FsStateKind], ActionType, Transfer)] = &[
    (
        &[FsStateKind::FsStaged, FsStateKind::FsAhead],
        ActionType::PulledToPootle,
        Transfer::Pull,
    ),
    (
        &[FsStateKind::PootleStaged, FsStateKind::PootleAhead],
        ActionType::PushedToFs,
        Transfer::Push,
    ),
    (&[FsStateKind::Remove], ActionType::Removed, Transfer::Remove),
    (&[FsStateKind::MergeFsWins], ActionType::MergedFromFs, Transfer::Pull),
    (
        &[FsStateKind::MergePootleWins],
        ActionType::MergedFromPootle,
        Transfer::Push,
    ),
];
