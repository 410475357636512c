//! Savings challenges and badges

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::{BadgeKind, Challenge, ChallengeStatus, NewChallenge};
use crate::store::ChallengeStore;

/// A badge and the user totals that unlock it
struct BadgeRule {
    kind: BadgeKind,
    min_total_saved: f64,
    min_completed: usize,
}

/// Evaluated in order; a user earns every row whose minimums they meet
const BADGE_RULES: [BadgeRule; 6] = [
    BadgeRule {
        kind: BadgeKind::FirstStep,
        min_total_saved: f64::MIN_POSITIVE,
        min_completed: 0,
    },
    BadgeRule {
        kind: BadgeKind::HundredClub,
        min_total_saved: 100.0,
        min_completed: 0,
    },
    BadgeRule {
        kind: BadgeKind::FiveHundredClub,
        min_total_saved: 500.0,
        min_completed: 0,
    },
    BadgeRule {
        kind: BadgeKind::Thousandaire,
        min_total_saved: 1000.0,
        min_completed: 0,
    },
    BadgeRule {
        kind: BadgeKind::ChallengeChampion,
        min_total_saved: 0.0,
        min_completed: 1,
    },
    BadgeRule {
        kind: BadgeKind::SerialSaver,
        min_total_saved: 0.0,
        min_completed: 3,
    },
];

/// Result of contributing to a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionOutcome {
    pub challenge: Challenge,
    /// Badges unlocked by this contribution
    pub unlocked: Vec<BadgeKind>,
}

/// Challenge progress and badge awards
#[derive(Debug, Clone, Default)]
pub struct GamificationService;

impl GamificationService {
    pub fn new() -> Self {
        Self
    }

    /// Badges earned at the given totals, in table order
    pub fn badges_earned(total_saved: f64, completed_challenges: usize) -> Vec<BadgeKind> {
        BADGE_RULES
            .iter()
            .filter(|rule| {
                total_saved >= rule.min_total_saved && completed_challenges >= rule.min_completed
            })
            .map(|rule| rule.kind)
            .collect()
    }

    pub fn start_challenge<S: ChallengeStore + ?Sized>(
        &self,
        store: &S,
        user_id: i64,
        challenge: &NewChallenge,
    ) -> Result<Challenge> {
        let challenge = store.create_challenge(user_id, challenge)?;
        info!(user_id, challenge_id = challenge.id, "Challenge started");
        Ok(challenge)
    }

    /// Add savings to an active challenge, completing it at its target and
    /// awarding any newly earned badges
    pub fn contribute<S: ChallengeStore + ?Sized>(
        &self,
        store: &S,
        challenge_id: i64,
        amount: f64,
    ) -> Result<ContributionOutcome> {
        let challenge = store.add_to_challenge(challenge_id, amount)?;
        if challenge.status == ChallengeStatus::Completed {
            info!(
                user_id = challenge.user_id,
                challenge_id, "Challenge completed"
            );
        }

        let unlocked = self.award_earned_badges(store, challenge.user_id)?;
        Ok(ContributionOutcome {
            challenge,
            unlocked,
        })
    }

    fn award_earned_badges<S: ChallengeStore + ?Sized>(
        &self,
        store: &S,
        user_id: i64,
    ) -> Result<Vec<BadgeKind>> {
        let challenges = store.list_challenges(user_id)?;
        let total_saved: f64 = challenges.iter().map(|c| c.saved_amount).sum();
        let completed = challenges
            .iter()
            .filter(|c| c.status == ChallengeStatus::Completed)
            .count();

        let mut unlocked = Vec::new();
        for kind in Self::badges_earned(total_saved, completed) {
            if store.award_badge(user_id, kind)? {
                info!(user_id, badge = kind.as_str(), "Badge unlocked");
                unlocked.push(kind);
            }
        }
        Ok(unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;

    fn start(store: &MemoryStore, target: f64) -> Challenge {
        GamificationService::new()
            .start_challenge(
                store,
                1,
                &NewChallenge {
                    title: "Skip coffee".to_string(),
                    target_amount: target,
                },
            )
            .unwrap()
    }

    #[test]
    fn test_badge_table() {
        assert!(GamificationService::badges_earned(0.0, 0).is_empty());
        assert_eq!(
            GamificationService::badges_earned(5.0, 0),
            vec![BadgeKind::FirstStep]
        );
        assert_eq!(
            GamificationService::badges_earned(100.0, 1),
            vec![
                BadgeKind::FirstStep,
                BadgeKind::HundredClub,
                BadgeKind::ChallengeChampion
            ]
        );
        assert_eq!(GamificationService::badges_earned(1000.0, 3).len(), 6);
    }

    #[test]
    fn test_contribution_completes_challenge_and_unlocks_once() {
        let store = MemoryStore::new();
        let service = GamificationService::new();
        let challenge = start(&store, 50.0);

        let first = service.contribute(&store, challenge.id, 20.0).unwrap();
        assert_eq!(first.challenge.status, ChallengeStatus::Active);
        assert_eq!(first.unlocked, vec![BadgeKind::FirstStep]);

        let second = service.contribute(&store, challenge.id, 40.0).unwrap();
        assert_eq!(second.challenge.status, ChallengeStatus::Completed);
        assert_eq!(second.challenge.saved_amount, 60.0);
        assert!(second.challenge.completed_at.is_some());
        assert_eq!(second.unlocked, vec![BadgeKind::ChallengeChampion]);

        // Completed challenges take no more contributions
        assert!(matches!(
            service.contribute(&store, challenge.id, 10.0),
            Err(Error::InvalidData(_))
        ));

        // A second completed challenge does not re-award the champion badge
        let other = start(&store, 10.0);
        let outcome = service.contribute(&store, other.id, 10.0).unwrap();
        assert!(!outcome.unlocked.contains(&BadgeKind::ChallengeChampion));

        let held: Vec<BadgeKind> = store
            .list_badges(1)
            .unwrap()
            .into_iter()
            .map(|b| b.kind)
            .collect();
        assert_eq!(
            held.iter()
                .filter(|k| **k == BadgeKind::ChallengeChampion)
                .count(),
            1
        );
    }

    #[test]
    fn test_contribution_validation() {
        let store = MemoryStore::new();
        let service = GamificationService::new();
        let challenge = start(&store, 50.0);

        assert!(matches!(
            service.contribute(&store, challenge.id, 0.0),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            service.contribute(&store, challenge.id, f64::NAN),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            service.contribute(&store, 404, 10.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_savings_thresholds_across_challenges() {
        let store = MemoryStore::new();
        let service = GamificationService::new();
        let a = start(&store, 1000.0);
        let b = start(&store, 1000.0);

        service.contribute(&store, a.id, 300.0).unwrap();
        let outcome = service.contribute(&store, b.id, 250.0).unwrap();
        assert_eq!(outcome.unlocked, vec![BadgeKind::FiveHundredClub]);
    }
}
