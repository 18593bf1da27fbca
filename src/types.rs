//! Common types used throughout the matchmaking engine

use crate::error::{MatchmakingError, Result};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players; `0` marks an empty slot
pub type PlayerId = u64;

/// Unique identifier for produced matches
pub type MatchId = Uuid;

/// Ordinal rank tier of a player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Challenger,
}

impl Rank {
    /// All tiers in ascending order
    pub const ALL: [Rank; 6] = [
        Rank::Bronze,
        Rank::Silver,
        Rank::Gold,
        Rank::Platinum,
        Rank::Diamond,
        Rank::Challenger,
    ];

    /// Numeric tier value (bronze = 0 .. challenger = 5)
    pub fn tier(self) -> u8 {
        self as u8
    }

    /// Number of tiers between two ranks
    pub fn gap(self, other: Rank) -> u8 {
        self.tier().abs_diff(other.tier())
    }
}

/// Bitmap of lane roles a player is eligible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Roles(pub u32);

impl Roles {
    pub const NONE: Roles = Roles(0);
    pub const TOP: Roles = Roles(1 << 0);
    pub const BOT: Roles = Roles(1 << 1);
    pub const MID: Roles = Roles(1 << 2);
    pub const JUNGLE: Roles = Roles(1 << 3);
    pub const SUPPORT: Roles = Roles(1 << 4);

    /// Role flag for a slot index (slot 0 = top, 1 = bot, ...)
    pub fn for_slot(index: usize) -> Roles {
        Roles(1 << index)
    }

    /// Bitwise union with another role set
    pub fn union(self, other: Roles) -> Roles {
        Roles(self.0 | other.0)
    }

    /// True if any role flag is shared with `other`
    pub fn overlaps(self, other: Roles) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A player occupying (or eligible for) one group slot
///
/// Immutable once placed into a slot; the engine only ever copies players
/// between slots during merges, it never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub rank: Rank,
    pub score: f64,
    pub roles: Roles,
}

impl Player {
    /// The empty-slot placeholder (`id == 0`)
    pub fn empty() -> Self {
        Self {
            id: 0,
            rank: Rank::Bronze,
            score: 0.0,
            roles: Roles::NONE,
        }
    }

    /// True if this slot holds a real player
    pub fn is_occupied(&self) -> bool {
        self.id > 0
    }
}

/// A partially or fully filled team sharing one queue position
///
/// Slots are role-indexed: slot 0 is top lane, slot 1 bottom lane, and so
/// on. Unoccupied slots hold the `id == 0` placeholder. Invariant:
/// `0 < len <= cap` with exactly `len` occupied slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    slots: Vec<Player>,
    len: usize,
    created_at: DateTime<Utc>,
}

impl Group {
    /// Create an empty group shell with `cap` slots
    ///
    /// The shell violates the `len > 0` invariant until at least one player
    /// is placed; the engine rejects empty groups at push time.
    pub fn new(cap: usize) -> Result<Self> {
        if cap == 0 {
            return Err(MatchmakingError::InvalidGroup {
                reason: "group capacity must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(Self {
            slots: vec![Player::empty(); cap],
            len: 0,
            created_at: current_timestamp(),
        })
    }

    /// Create a group from pre-assembled slots
    ///
    /// `slots` must already be role-indexed; empty positions hold the id-0
    /// placeholder.
    pub fn from_slots(slots: Vec<Player>) -> Result<Self> {
        if slots.is_empty() {
            return Err(MatchmakingError::InvalidGroup {
                reason: "group capacity must be greater than 0".to_string(),
            }
            .into());
        }
        let len = slots.iter().filter(|p| p.is_occupied()).count();
        Ok(Self {
            slots,
            len,
            created_at: current_timestamp(),
        })
    }

    /// Place a player into a specific role slot
    pub fn place(&mut self, slot: usize, player: Player) -> Result<()> {
        if !player.is_occupied() {
            return Err(MatchmakingError::InvalidGroup {
                reason: "cannot place an empty player into a slot".to_string(),
            }
            .into());
        }
        if slot >= self.cap() {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!("slot {} out of range for capacity {}", slot, self.cap()),
            }
            .into());
        }
        if self.slots[slot].is_occupied() {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!("slot {} is already occupied", slot),
            }
            .into());
        }
        self.slots[slot] = player;
        self.len += 1;
        Ok(())
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// Total slot capacity (the target team size)
    pub fn cap(&self) -> usize {
        self.slots.len()
    }

    /// True if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once every slot is occupied
    pub fn is_full(&self) -> bool {
        self.len == self.cap()
    }

    /// All slots in role order, empty placeholders included
    pub fn players(&self) -> &[Player] {
        &self.slots
    }

    /// When this group was assembled
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Bitwise OR of role flags across occupied slots
    pub fn role_bitmap(&self) -> Roles {
        self.slots
            .iter()
            .filter(|p| p.is_occupied())
            .fold(Roles::NONE, |acc, p| acc.union(p.roles))
    }

    /// Inclusive (min, max) rank among occupied slots
    pub fn rank_range(&self) -> Option<(Rank, Rank)> {
        let mut range: Option<(Rank, Rank)> = None;
        for p in self.slots.iter().filter(|p| p.is_occupied()) {
            range = Some(match range {
                None => (p.rank, p.rank),
                Some((lo, hi)) => (lo.min(p.rank), hi.max(p.rank)),
            });
        }
        range
    }

    /// Check the occupancy invariants hold
    pub fn validate(&self) -> Result<()> {
        let occupied = self.slots.iter().filter(|p| p.is_occupied()).count();
        if occupied != self.len {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!(
                    "group tracks len {} but {} slots are occupied",
                    self.len, occupied
                ),
            }
            .into());
        }
        if self.len == 0 || self.len > self.cap() {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!("group len {} outside (0, {}]", self.len, self.cap()),
            }
            .into());
        }
        Ok(())
    }

    /// Absorb `other`'s occupied slots into this group's empty slots
    ///
    /// Two-pointer walk: each occupied slot of `other` lands in the next
    /// empty slot of `self`, in order. Only valid when the occupancies sum
    /// exactly to capacity; the result is a full group.
    pub(crate) fn absorb(&mut self, other: &Group) -> Result<()> {
        if self.len + other.len != self.cap() {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!(
                    "cannot merge groups of sizes {} and {} into capacity {}",
                    self.len,
                    other.len,
                    self.cap()
                ),
            }
            .into());
        }
        let mut i = 0;
        let mut j = 0;
        while i < self.cap() && j < other.cap() {
            if self.slots[i].is_occupied() {
                i += 1;
            } else if !other.slots[j].is_occupied() {
                j += 1;
            } else {
                self.slots[i] = other.slots[j];
                i += 1;
                j += 1;
            }
        }
        self.len += other.len;
        debug_assert!(self.is_full());
        Ok(())
    }
}

/// A transient pairing of two full groups produced by the pairing scan
///
/// The engine holds no reference to it after returning it to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedMatch {
    pub match_id: MatchId,
    pub blue: Group,
    pub red: Group,
}

/// What `push` did with a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushOutcome {
    /// Group was already full and went straight to the ready queue
    Ready,
    /// Group merged with a complement-size partner, now awaiting pairing
    Merged,
    /// Group is waiting in the queue for its size
    Queued,
}

impl std::fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushOutcome::Ready => write!(f, "Ready"),
            PushOutcome::Merged => write!(f, "Merged"),
            PushOutcome::Queued => write!(f, "Queued"),
        }
    }
}
