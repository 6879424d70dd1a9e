//! Game events recorded by the [`Game`](crate::engine::Game) store.
//!
//! Every accepted action appends one or more events. Hosts poll them with
//! [`EventLog::drain`] (for UI notifications, sound, analytics) or peek with
//! [`EventLog::pending`]. Kinds a host does not care about can be suppressed,
//! in which case they are never recorded.

use crate::big::Big;
use crate::id::{AutoMinerId, MineralId, ProcessNode, ResearchId};
use crate::state::CraftTarget;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // -- Resources --
    Mined {
        mineral: MineralId,
        amount: Big,
    },
    MineralUnlocked {
        mineral: MineralId,
    },

    // -- Fabrication --
    CraftStarted {
        target: CraftTarget,
        amount: u32,
    },
    CraftQueued {
        id: u64,
        target: CraftTarget,
        amount: u32,
    },
    CraftCompleted {
        target: CraftTarget,
        amount: u32,
    },
    CraftCancelled {
        target: CraftTarget,
        amount: u32,
    },
    QueueItemCancelled {
        id: u64,
    },
    NodeUnlocked {
        node: ProcessNode,
    },

    // -- Progression --
    ResearchCompleted {
        research: ResearchId,
    },
    AutoMinerBought {
        miner: AutoMinerId,
        owned: u32,
    },

    // -- Session --
    OfflineProgressComputed {
        duration_secs: f64,
        flops: Big,
    },
    OfflineProgressClaimed,
    Saved,
    Reset,
}

/// Discriminant tag for event types, used for suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Mined,
    MineralUnlocked,
    CraftStarted,
    CraftQueued,
    CraftCompleted,
    CraftCancelled,
    QueueItemCancelled,
    NodeUnlocked,
    ResearchCompleted,
    AutoMinerBought,
    OfflineProgressComputed,
    OfflineProgressClaimed,
    Saved,
    Reset,
}

const EVENT_KIND_COUNT: usize = 14;

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Mined { .. } => EventKind::Mined,
            GameEvent::MineralUnlocked { .. } => EventKind::MineralUnlocked,
            GameEvent::CraftStarted { .. } => EventKind::CraftStarted,
            GameEvent::CraftQueued { .. } => EventKind::CraftQueued,
            GameEvent::CraftCompleted { .. } => EventKind::CraftCompleted,
            GameEvent::CraftCancelled { .. } => EventKind::CraftCancelled,
            GameEvent::QueueItemCancelled { .. } => EventKind::QueueItemCancelled,
            GameEvent::NodeUnlocked { .. } => EventKind::NodeUnlocked,
            GameEvent::ResearchCompleted { .. } => EventKind::ResearchCompleted,
            GameEvent::AutoMinerBought { .. } => EventKind::AutoMinerBought,
            GameEvent::OfflineProgressComputed { .. } => EventKind::OfflineProgressComputed,
            GameEvent::OfflineProgressClaimed => EventKind::OfflineProgressClaimed,
            GameEvent::Saved => EventKind::Saved,
            GameEvent::Reset => EventKind::Reset,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Pending events in emission order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    suppressed: [bool; EVENT_KIND_COUNT],
    total_recorded: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event unless its kind is suppressed.
    pub fn push(&mut self, event: GameEvent) {
        if self.suppressed[event.kind() as usize] {
            return;
        }
        self.events.push(event);
        self.total_recorded += 1;
    }

    /// Stop recording `kind`. Already pending events stay.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind as usize] = true;
    }

    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed[kind as usize] = false;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind as usize]
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events recorded since creation, drained or not.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_order() {
        let mut log = EventLog::new();
        log.push(GameEvent::MineralUnlocked {
            mineral: MineralId::Gold,
        });
        log.push(GameEvent::Reset);
        assert_eq!(log.len(), 2);
        let drained = log.drain();
        assert_eq!(drained[1], GameEvent::Reset);
        assert!(log.is_empty());
        assert_eq!(log.total_recorded(), 2);
    }

    #[test]
    fn suppressed_kinds_are_not_recorded() {
        let mut log = EventLog::new();
        log.suppress(EventKind::Mined);
        log.push(GameEvent::Mined {
            mineral: MineralId::Silicon,
            amount: Big::ONE,
        });
        log.push(GameEvent::Saved);
        assert_eq!(log.pending(), &[GameEvent::Saved]);
        assert!(log.is_suppressed(EventKind::Mined));

        log.unsuppress(EventKind::Mined);
        log.push(GameEvent::Mined {
            mineral: MineralId::Silicon,
            amount: Big::ONE,
        });
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn kind_matches_variant() {
        let event = GameEvent::QueueItemCancelled { id: 3 };
        assert_eq!(event.kind(), EventKind::QueueItemCancelled);
        assert_eq!(GameEvent::OfflineProgressClaimed.kind(), EventKind::OfflineProgressClaimed);
    }
}
