//! Failed-attempt escalation policy.
//!
//! Each failed credential raises the attempt counter, and the counter maps to
//! a cumulative set of responses. Every tier starts with the denial sequence
//! and adds to what the tier below does:
//!
//! | Attempts | Added response |
//! |---|---|
//! | 1 | denial sequence |
//! | 2 | external notification |
//! | 3 | reader cooldown |
//! | 4+ | audible alarm burst |

use serde::{Deserialize, Serialize};

/// Attempt count at which escalation stops growing.
pub const MAX_TIER: u32 = 4;

/// One response to a failed credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    /// Red LED, denial screen, and denial tone.
    DenialSequence,
    /// Push the attempt count to the failed-attempts channel.
    NotifyExternal,
    /// Disable the reader for the cooldown window, then reinitialize it.
    ReaderCooldown,
    /// Five 500 ms alarm tones.
    AlarmBurst,
}

/// Ordered set of responses for one attempt count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscalationPlan(Vec<EscalationAction>);

impl EscalationPlan {
    pub fn actions(&self) -> &[EscalationAction] {
        &self.0
    }

    pub fn contains(&self, action: EscalationAction) -> bool {
        self.0.contains(&action)
    }

    /// Whether every action of `other` is also in this plan.
    pub fn is_superset_of(&self, other: &EscalationPlan) -> bool {
        other.0.iter().all(|action| self.contains(*action))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a EscalationPlan {
    type Item = &'a EscalationAction;
    type IntoIter = std::slice::Iter<'a, EscalationAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Responses owed for the given cumulative attempt count.
///
/// Zero attempts yields an empty plan; counts above [`MAX_TIER`] yield the
/// same plan as [`MAX_TIER`].
///
/// # Examples
///
/// ```
/// use doorward_controller::escalation::{tier, EscalationAction};
///
/// let plan = tier(3);
/// assert_eq!(
///     plan.actions(),
///     &[
///         EscalationAction::DenialSequence,
///         EscalationAction::NotifyExternal,
///         EscalationAction::ReaderCooldown,
///     ]
/// );
/// assert_eq!(tier(9), tier(4));
/// ```
pub fn tier(attempts: u32) -> EscalationPlan {
    const LADDER: [EscalationAction; MAX_TIER as usize] = [
        EscalationAction::DenialSequence,
        EscalationAction::NotifyExternal,
        EscalationAction::ReaderCooldown,
        EscalationAction::AlarmBurst,
    ];

    let level = attempts.min(MAX_TIER) as usize;
    EscalationPlan(LADDER[..level].to_vec())
}
