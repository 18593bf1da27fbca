//! The matchmaking engine: size-indexed queues, group merging, pairing scan
//!
//! The engine owns `n` queues where queue `i` holds groups with `len == i+1`
//! and queue `n-1` is the "ready" queue of full groups awaiting pairing.
//! Pushing a partial group may merge it with a complement-size partner
//! (their occupancies summing exactly to the team size); the pairing scan
//! pulls balanced pairs of ready groups back out. Every skill or
//! compatibility judgment is delegated to the installed decision policy.

use crate::config::{validate_config, EngineConfig, PairingFairness};
use crate::error::{MatchmakingError, Result};
use crate::policy::{DecisionPolicy, RulePolicy};
use crate::queue::list::{Entry, GroupKey, QueueList};
use crate::types::{Group, PairedMatch, PushOutcome};
use crate::utils::generate_match_id;
use slab::Slab;
use std::path::Path;
use tracing::{debug, info};

/// Matchmaking queue engine
///
/// Single-threaded in its algorithms: each operation assumes exclusive
/// access for its duration and never suspends mid-operation. Wrap it in
/// [`SharedMatchmaker`](crate::queue::shared::SharedMatchmaker) when
/// multiple callers are involved.
pub struct Matchmaker {
    team_size: usize,
    backpressure: usize,
    fairness: PairingFairness,
    policy: Box<dyn DecisionPolicy>,
    arena: Slab<Entry<Group>>,
    queues: Vec<QueueList>,
    ready_len: usize,
}

/// Advance one step through the ready queue in scan order
fn scan_step(
    arena: &Slab<Entry<Group>>,
    fairness: PairingFairness,
    key: GroupKey,
) -> Option<GroupKey> {
    match fairness {
        PairingFairness::NewestFirst => arena[key].prev(),
        PairingFairness::OldestFirst => arena[key].next(),
    }
}

impl Matchmaker {
    /// Open an engine with the given configuration and decision policy
    pub fn open(config: EngineConfig, policy: Box<dyn DecisionPolicy>) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self {
            team_size: config.team_size,
            backpressure: config.backpressure_threshold,
            fairness: config.fairness,
            policy,
            arena: Slab::new(),
            queues: vec![QueueList::new(); config.team_size],
            ready_len: 0,
        })
    }

    /// Replace the decision policy with one loaded from a TOML definition
    ///
    /// A failed load leaves the currently installed policy untouched.
    pub fn load_policy<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let policy = RulePolicy::from_file(path)?;
        self.policy = Box::new(policy);
        Ok(())
    }

    /// Replace the decision policy with an already-built implementation
    pub fn install_policy(&mut self, policy: Box<dyn DecisionPolicy>) {
        self.policy = policy;
    }

    /// Target team size (every group's capacity)
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// The currently installed decision policy
    ///
    /// Exposed so callers can reuse the engine's policy for score and
    /// win-probability reporting on groups they have already taken out.
    pub fn policy(&self) -> &dyn DecisionPolicy {
        self.policy.as_ref()
    }

    /// Number of full groups awaiting pairing
    pub fn ready_len(&self) -> usize {
        self.ready_len
    }

    /// Number of groups of occupancy `size` currently waiting
    pub fn waiting_len(&self, size: usize) -> usize {
        if size == 0 || size > self.team_size {
            return 0;
        }
        self.queues[size - 1].len()
    }

    /// True iff the ready queue holds no groups, O(1)
    pub fn is_empty(&self) -> bool {
        self.queues[self.team_size - 1].is_empty()
    }

    /// Push a group into the engine
    ///
    /// A full group goes straight to the ready queue. A partial group first
    /// searches its complement queue tail-to-head for a compatible partner
    /// to merge with (skipped entirely once the ready pool has reached the
    /// backpressure threshold); otherwise it waits in the queue for its
    /// size. At most one merge happens per push; partial merges are never
    /// chained.
    pub fn push(&mut self, group: Group) -> Result<PushOutcome> {
        group.validate().map_err(|e| MatchmakingError::InvalidGroup {
            reason: format!("rejected at push: {}", e),
        })?;
        if group.cap() != self.team_size {
            return Err(MatchmakingError::InvalidGroup {
                reason: format!(
                    "group capacity {} does not match team size {}",
                    group.cap(),
                    self.team_size
                ),
            }
            .into());
        }

        let ready_idx = self.team_size - 1;

        // Already full: no merge attempted
        if group.is_full() {
            let key = self.arena.insert(Entry::new(group));
            self.queues[ready_idx].push_tail(&mut self.arena, key);
            self.ready_len += 1;
            debug!(ready = self.ready_len, "full group queued as ready");
            return Ok(PushOutcome::Ready);
        }

        // Ready pool saturated: merging is not worth the scan latency
        if self.ready_len >= self.backpressure {
            let idx = group.len() - 1;
            let key = self.arena.insert(Entry::new(group));
            self.queues[idx].push_tail(&mut self.arena, key);
            debug!(
                ready = self.ready_len,
                threshold = self.backpressure,
                "backpressure active, merge search skipped"
            );
            return Ok(PushOutcome::Queued);
        }

        // Scan the complement queue tail-to-head: most recently queued
        // candidates are tried first.
        let complement_idx = self.team_size - group.len() - 1;
        let mut cursor = self.queues[complement_idx].tail();
        while let Some(key) = cursor {
            let compatible = self
                .policy
                .is_compatible(&group, &self.arena[key].value)
                .map_err(MatchmakingError::Policy)?;
            if compatible {
                // Absorb first: its size precondition makes the merge
                // all-or-nothing before any relinking happens.
                self.arena[key].value.absorb(&group)?;
                self.queues[complement_idx].unlink(&mut self.arena, key);
                self.queues[ready_idx].push_tail(&mut self.arena, key);
                self.ready_len += 1;
                debug!(
                    merged_len = self.arena[key].value.len(),
                    ready = self.ready_len,
                    "merged complement groups into a ready team"
                );
                return Ok(PushOutcome::Merged);
            }
            cursor = self.arena[key].prev();
        }

        // No compatible partner: wait as a partial group
        let idx = group.len() - 1;
        let key = self.arena.insert(Entry::new(group));
        self.queues[idx].push_tail(&mut self.arena, key);
        debug!(size = idx + 1, "partial group queued");
        Ok(PushOutcome::Queued)
    }

    /// Remove and return the most recently readied group
    pub fn pop(&mut self) -> Result<Group> {
        let ready_idx = self.team_size - 1;
        let key = self.queues[ready_idx]
            .tail()
            .ok_or(MatchmakingError::ReadyQueueEmpty)?;
        self.queues[ready_idx].unlink(&mut self.arena, key);
        self.ready_len -= 1;
        Ok(self.arena.remove(key).value)
    }

    /// Scan the ready queue for the first compatible pair
    ///
    /// The outer index walks the ready queue in the configured fairness
    /// order; the inner index continues strictly past it in the same
    /// direction. The first compatible pair becomes (blue, red) and both
    /// leave the queue. `Ok(None)` means no pair exists right now, a
    /// legitimate try-again-later outcome; a policy failure is an error and
    /// leaves the queue untouched.
    pub fn find_match(&mut self) -> Result<Option<PairedMatch>> {
        let ready_idx = self.team_size - 1;
        let ready = &self.queues[ready_idx];
        let mut outer = match self.fairness {
            PairingFairness::NewestFirst => ready.tail(),
            PairingFairness::OldestFirst => ready.head(),
        };

        while let Some(blue_key) = outer {
            let mut inner = scan_step(&self.arena, self.fairness, blue_key);
            while let Some(red_key) = inner {
                let compatible = self
                    .policy
                    .is_compatible(&self.arena[blue_key].value, &self.arena[red_key].value)
                    .map_err(MatchmakingError::Policy)?;
                if compatible {
                    self.queues[ready_idx].unlink(&mut self.arena, blue_key);
                    self.queues[ready_idx].unlink(&mut self.arena, red_key);
                    self.ready_len -= 2;
                    let blue = self.arena.remove(blue_key).value;
                    let red = self.arena.remove(red_key).value;
                    let match_id = generate_match_id();
                    info!(%match_id, ready = self.ready_len, "paired two ready groups");
                    return Ok(Some(PairedMatch {
                        match_id,
                        blue,
                        red,
                    }));
                }
                inner = scan_step(&self.arena, self.fairness, red_key);
            }
            outer = scan_step(&self.arena, self.fairness, blue_key);
        }

        Ok(None)
    }
}

impl std::fmt::Debug for Matchmaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matchmaker")
            .field("team_size", &self.team_size)
            .field("backpressure", &self.backpressure)
            .field("fairness", &self.fairness)
            .field("ready_len", &self.ready_len)
            .finish_non_exhaustive()
    }
}
