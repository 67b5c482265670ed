//! Property-based tests for session expiry evaluation

use chrono::Duration;
use proptest::prelude::*;

use crate::core::session::{evaluate, SessionPolicy, SessionRecord, SessionStatus};
use crate::tests::common::fixed_start;

proptest! {
    #[test]
    fn evaluation_respects_both_deadlines(
        remember_me in any::<bool>(),
        idle_after_start in 0i64..(40 * 24 * 60),
        check_after_activity in 0i64..(40 * 24 * 60),
    ) {
        let policy = SessionPolicy::default();
        let mut record = SessionRecord::start(fixed_start(), remember_me, &policy);
        record.touch(fixed_start() + Duration::minutes(idle_after_start));
        let now = record.last_activity_at + Duration::minutes(check_after_activity);

        let absolute_left = record.expires_at - now;
        let idle_left = record.inactivity_deadline(&policy) - now;

        match evaluate(&record, now, &policy) {
            SessionStatus::Expired { .. } => {
                prop_assert!(absolute_left <= Duration::zero() || idle_left <= Duration::zero());
            }
            SessionStatus::Warning { remaining, .. } => {
                prop_assert!(absolute_left > Duration::zero() && idle_left > Duration::zero());
                prop_assert!(remaining > Duration::zero());
                prop_assert!(remaining <= policy.warning_threshold);
            }
            SessionStatus::Active => {
                prop_assert!(absolute_left > policy.warning_threshold);
                prop_assert!(idle_left > policy.warning_threshold);
            }
            SessionStatus::NoSession => prop_assert!(false, "evaluate never reports NoSession"),
        }
    }
}
