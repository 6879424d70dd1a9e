//! Reasons a state transition is refused.

use crate::id::{AutoMinerId, MineralId, ProcessNode, ResearchId};

/// Why a pure transition left the state untouched.
///
/// The [`Game`](crate::engine::Game) store treats every rejection as a
/// silent no-op; the variant only reaches logs and tests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// The mineral has not been unlocked yet.
    #[error("mineral {0} is locked")]
    MineralLocked(MineralId),
    /// The mineral is already unlocked.
    #[error("mineral {0} is already unlocked")]
    MineralAlreadyUnlocked(MineralId),
    /// A job is running and auto-fab is not available to queue behind it.
    #[error("a crafting job is already in progress")]
    CraftInProgress,
    #[error("craft amount must be at least 1")]
    ZeroAmount,
    /// Stock does not cover the full cost.
    #[error("insufficient resources")]
    InsufficientResources,
    #[error("requires process node {required}, current is {current}")]
    NodeTooLow {
        required: ProcessNode,
        current: ProcessNode,
    },
    #[error("research {0} is already completed")]
    AlreadyResearched(ResearchId),
    #[error("research {research} requires {missing}")]
    PrerequisiteMissing {
        research: ResearchId,
        missing: ResearchId,
    },
    #[error("not enough FLOPS")]
    InsufficientFlops,
    /// Auto-mining has not been researched.
    #[error("auto-mining is not unlocked")]
    AutoMiningLocked,
    #[error("auto-miner {0} is locked")]
    MinerLocked(AutoMinerId),
    #[error("not enough silicon")]
    InsufficientSilicon,
    #[error("process node {0} is already unlocked")]
    NodeAlreadyUnlocked(ProcessNode),
    /// The sequential path only unlocks the node right after an unlocked one.
    #[error("process node {node} requires {previous} first")]
    NodeOutOfOrder {
        node: ProcessNode,
        previous: ProcessNode,
    },
    #[error("no crafting job is active")]
    NoActiveJob,
    #[error("the active crafting job has not finished")]
    JobNotFinished,
    /// Every queue id has been handed out.
    #[error("craft queue ids are exhausted")]
    QueueIdsExhausted,
    #[error("no queued craft with id {0}")]
    QueueItemNotFound(u64),
    #[error("no offline progress to claim")]
    NoOfflineProgress,
    /// Less time passed than the caller's minimum.
    #[error("elapsed time {elapsed_secs}s is below the {min_secs}s minimum")]
    TooSoon { elapsed_secs: f64, min_secs: f64 },
}
