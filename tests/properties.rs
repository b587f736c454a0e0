mod common;

use circuit_gate::{Breaker, BreakerError, Kinded, StrategyKind};
use common::{Kind, RecordingStrategy, TestError};
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn any_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Runtime), Just(Kind::Standard), Just(Kind::Timeout)]
}

fn breaker_ignoring(
    strategy: &Arc<RecordingStrategy>,
    ignore: &HashSet<Kind>,
) -> circuit_gate::BreakerBuilder<u32, TestError> {
    Breaker::<u32, TestError>::builder()
        .strategy(StrategyKind::Custom(strategy.clone()))
        .ignore_all(ignore.iter().copied())
}

proptest! {
    #[test]
    fn open_breaker_never_runs_operation(kinds in vec(any_kind(), 1..20), ignore in hash_set(any_kind(), 0..3)) {
        let strategy = Arc::new(RecordingStrategy::full());
        strategy.set_open(true);
        let breaker = breaker_ignoring(&strategy, &ignore).build();
        let ran = AtomicUsize::new(0);

        for kind in kinds {
            let result = breaker.run(|| {
                ran.fetch_add(1, Ordering::SeqCst);
                Err(TestError::new(kind, "unreachable"))
            });
            prop_assert!(matches!(result, Err(BreakerError::Open)));
        }

        prop_assert_eq!(ran.load(Ordering::SeqCst), 0);
        prop_assert_eq!(strategy.count_calls(), 0);
        prop_assert_eq!(strategy.error_calls(), 0);
    }

    #[test]
    fn default_handler_records_exactly_non_ignored(kinds in vec(any_kind(), 0..50), ignore in hash_set(any_kind(), 0..3)) {
        let strategy = Arc::new(RecordingStrategy::full());
        let breaker = breaker_ignoring(&strategy, &ignore).build();

        for (i, kind) in kinds.iter().enumerate() {
            let before = strategy.error_calls();
            let raised = TestError::new(*kind, &i.to_string());
            let expected = raised.clone();

            let result = breaker.run(move || Err(raised));
            prop_assert_eq!(result.unwrap_err().into_operation(), Some(expected));

            let recorded = strategy.error_calls() - before;
            prop_assert_eq!(recorded, usize::from(!ignore.contains(kind)));
        }

        let expected_total = kinds.iter().filter(|k| !ignore.contains(*k)).count();
        prop_assert_eq!(strategy.error_calls(), expected_total);
    }

    #[test]
    fn direct_raise_never_records(kinds in vec(any_kind(), 0..50), ignore in hash_set(any_kind(), 0..3)) {
        let strategy = Arc::new(RecordingStrategy::full());
        let breaker = breaker_ignoring(&strategy, &ignore)
            .error_handler(|err, _proceed| Err(err))
            .build();

        for kind in kinds {
            let result = breaker.run(|| Err(TestError::new(kind, "raised")));
            let propagated = result.unwrap_err().into_operation();
            prop_assert_eq!(propagated.map(|e| e.kind()), Some(kind));
        }

        prop_assert_eq!(strategy.error_calls(), 0);
    }

    #[test]
    fn substituted_values_are_returned(kinds in vec(any_kind(), 0..50), fallback in any::<u32>()) {
        let strategy = Arc::new(RecordingStrategy::full());
        let breaker = Breaker::<u32, TestError>::builder()
            .strategy(StrategyKind::Custom(strategy.clone()))
            .error_handler(move |_err, _proceed| Ok(fallback))
            .build();

        for kind in kinds {
            let result = breaker.run(|| Err(TestError::new(kind, "suppressed")));
            prop_assert_eq!(result.ok(), Some(fallback));
        }

        prop_assert_eq!(strategy.error_calls(), 0);
    }

    #[test]
    fn continuation_matches_default_handler(kinds in vec(any_kind(), 0..50), ignore in hash_set(any_kind(), 0..3)) {
        let via_default = Arc::new(RecordingStrategy::full());
        let via_proceed = Arc::new(RecordingStrategy::full());

        let default_breaker = breaker_ignoring(&via_default, &ignore).build();
        let proceed_breaker = breaker_ignoring(&via_proceed, &ignore)
            .error_handler(|err, proceed| proceed.apply(err))
            .build();

        for kind in kinds {
            let a = default_breaker.run(|| Err(TestError::new(kind, "same")));
            let b = proceed_breaker.run(|| Err(TestError::new(kind, "same")));
            prop_assert_eq!(a.unwrap_err().into_operation(), b.unwrap_err().into_operation());
        }

        prop_assert_eq!(via_default.error_calls(), via_proceed.error_calls());
    }

    #[test]
    fn successes_never_trip_rolling_window(calls in 1usize..200, threshold in 1u64..10) {
        let breaker = Breaker::<usize, TestError>::builder()
            .threshold(threshold)
            .build();

        for i in 0..calls {
            prop_assert_eq!(breaker.run(|| Ok(i)).ok(), Some(i));
        }

        prop_assert!(!breaker.is_open());
    }
}
