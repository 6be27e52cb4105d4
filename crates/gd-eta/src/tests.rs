//! Unit tests for gd-eta.

// ── Estimator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod estimator {
    use crate::{EtaEstimator, UpdateSignals};

    fn cmd(secs: f64) -> UpdateSignals {
        UpdateSignals { command_reported_secs: Some(secs), ..Default::default() }
    }

    #[test]
    fn takes_minimum_candidate() {
        let mut e = EtaEstimator::new();
        let s = UpdateSignals {
            to_next_maneuver_secs: Some(20.0),
            rest_of_route_secs:    Some(100.0),
            command_reported_secs: Some(140.0),
            engine_reported_secs:  Some(130.0),
        };
        assert_eq!(e.update(&s, 0.0, true), Some(120.0));
        assert_eq!(e.target(), Some(120.0));
    }

    #[test]
    fn rest_without_to_next_is_not_a_candidate() {
        let s = UpdateSignals { rest_of_route_secs: Some(50.0), ..Default::default() };
        assert_eq!(s.fused(), None);
    }

    #[test]
    fn bad_candidates_are_filtered() {
        let mut e = EtaEstimator::new();
        let s = UpdateSignals {
            to_next_maneuver_secs: Some(f64::NAN),
            rest_of_route_secs:    None,
            command_reported_secs: Some(-4.0),
            engine_reported_secs:  Some(90.0),
        };
        assert_eq!(e.update(&s, 0.0, true), Some(90.0));
    }

    #[test]
    fn no_usable_candidate_keeps_previous() {
        let mut e = EtaEstimator::new();
        e.update(&cmd(80.0), 0.0, true);
        let before = *e.estimate();
        assert_eq!(e.update(&cmd(0.0), 0.0, true), None);
        assert_eq!(e.update(&UpdateSignals::default(), 0.0, true), None);
        assert_eq!(*e.estimate(), before);
        assert_eq!(e.target(), Some(80.0));
        assert_eq!(e.last_published(), Some(80.0));
    }

    #[test]
    fn nothing_before_first_update() {
        let e = EtaEstimator::new();
        assert_eq!(e.target(), None);
        assert_eq!(e.last_published(), None);
    }

    #[test]
    fn clamps_to_total_duration() {
        let mut e = EtaEstimator::new();
        let v = e.update(&cmd(9_000.0), 600.0, true).unwrap();
        assert!(v <= 600.0);
    }

    #[test]
    fn zero_total_does_not_clamp() {
        let mut e = EtaEstimator::new();
        assert_eq!(e.update(&cmd(9_000.0), 0.0, true), Some(9_000.0));
    }

    #[test]
    fn monotonic_while_guiding() {
        let mut e = EtaEstimator::new();
        let inputs = [300.0, 280.0, 310.0, 250.0, 400.0, 251.0, 100.0];
        let mut prev = f64::INFINITY;
        for s in inputs {
            let v = e.update(&cmd(s), 0.0, true).unwrap();
            assert!(v <= prev, "{v} > {prev}");
            prev = v;
        }
        assert_eq!(prev, 100.0);
    }

    #[test]
    fn non_monotonic_mode_follows_signal() {
        let mut e = EtaEstimator::new();
        e.update(&cmd(100.0), 0.0, true);
        assert_eq!(e.update(&cmd(200.0), 0.0, false), Some(200.0));
    }

    #[test]
    fn reset_lifts_monotonic_bound() {
        let mut e = EtaEstimator::new();
        e.update(&cmd(100.0), 0.0, true);
        assert_eq!(e.update(&cmd(500.0), 0.0, true), Some(100.0));

        e.reset();
        assert_eq!(e.last_published(), None);
        assert_eq!(e.target(), Some(100.0));
        assert_eq!(e.update(&cmd(500.0), 0.0, true), Some(500.0));
    }

    #[test]
    fn clear_forgets_target() {
        let mut e = EtaEstimator::new();
        e.update(&cmd(100.0), 0.0, true);
        e.clear();
        assert_eq!(e.target(), None);
    }
}

// ── Countdown ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod countdown {
    use std::time::{Duration, Instant};

    use crate::CountdownClock;

    #[test]
    fn idle_clock_has_no_text() {
        let mut c = CountdownClock::new();
        let now = Instant::now();
        assert!(!c.is_running());
        assert_eq!(c.tick(now), None);
        assert_eq!(c.text(), None);
    }

    #[test]
    fn rejects_bad_targets() {
        let mut c = CountdownClock::new();
        let now = Instant::now();
        assert!(!c.retarget(0.0, now));
        assert!(!c.retarget(-10.0, now));
        assert!(!c.retarget(f64::NAN, now));
        assert!(!c.retarget(f64::INFINITY, now));
        assert!(!c.is_running());
    }

    #[test]
    fn render_boundaries() {
        let mut c = CountdownClock::new();
        let now = Instant::now();

        c.retarget(0.5, now);
        assert_eq!(c.text(), Some("Now"));

        c.retarget(61.0, now);
        assert_eq!(c.text(), Some("2 min"));

        c.retarget(3_660.0, now);
        assert_eq!(c.text(), Some("1 h 1 min"));
    }

    #[test]
    fn counts_down_between_retargets() {
        let mut c = CountdownClock::new();
        let t0 = Instant::now();
        c.retarget(125.0, t0);
        assert_eq!(c.text(), Some("3 min"));

        assert_eq!(c.tick(t0 + Duration::from_secs(6)), Some("2 min"));
        assert_eq!(c.tick(t0 + Duration::from_secs(100)), Some("1 min"));
        assert_eq!(c.tick(t0 + Duration::from_secs(124)), Some("Now"));
        assert_eq!(c.tick(t0 + Duration::from_secs(200)), Some("Now"));
        assert_eq!(c.remaining_secs(t0 + Duration::from_secs(200)), Some(0.0));
    }

    #[test]
    fn retarget_moves_deadline() {
        let mut c = CountdownClock::new();
        let t0 = Instant::now();
        c.retarget(600.0, t0);
        c.retarget(60.0, t0 + Duration::from_secs(10));
        assert_eq!(c.deadline(), Some(t0 + Duration::from_secs(70)));
    }

    #[test]
    fn stop_clears() {
        let mut c = CountdownClock::new();
        let now = Instant::now();
        c.retarget(90.0, now);
        c.stop();
        assert!(!c.is_running());
        assert_eq!(c.text(), None);
        assert_eq!(c.tick(now), None);
    }
}
