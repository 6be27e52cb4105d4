//! Unit tests for gd-sim.

#[cfg(test)]
mod helpers {
    use gd_route::{Instruction, NavigationResult};

    pub const MARKER: &str = "REACHED_YOUR_DESTINATION";

    /// 3 s + 2 s, 500 m, ending in the marker instruction.
    pub fn short_route() -> NavigationResult {
        NavigationResult::new(vec![
            Instruction::new("Head north", 3.0, 300.0),
            Instruction::new("Turn right", 2.0, 200.0),
            Instruction::new(MARKER, 0.0, 0.0),
        ])
    }

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use gd_route::{Instruction, NavigationResult};

    use super::helpers::{MARKER, approx, short_route};
    use crate::build_timeline;

    #[test]
    fn one_step_per_second_then_marker() {
        let steps = build_timeline(&short_route(), MARKER);
        let texts: Vec<&str> = steps.iter().map(|s| s.command.description.as_str()).collect();
        assert_eq!(
            texts,
            ["Head north", "Head north", "Head north", "Turn right", "Turn right", MARKER]
        );
    }

    #[test]
    fn counts_down_time_and_distance() {
        let steps = build_timeline(&short_route(), MARKER);

        let first = &steps[0];
        assert_eq!(first.command.time_to_maneuver_secs, Some(3.0));
        assert_eq!(first.remaining_time_secs(), 5.0);
        assert!(approx(first.command.distance_to_maneuver_m, 300.0));
        assert!(approx(first.distance_to_target_m, 500.0));

        let second = &steps[1];
        assert_eq!(second.command.time_to_maneuver_secs, Some(2.0));
        assert_eq!(second.remaining_time_secs(), 4.0);
        assert!(approx(second.command.distance_to_maneuver_m, 200.0));
        assert!(approx(second.distance_to_target_m, 400.0));

        let turn = &steps[4];
        assert_eq!(turn.command.time_to_maneuver_secs, Some(1.0));
        assert_eq!(turn.remaining_time_secs(), 1.0);
        assert!(approx(turn.distance_to_target_m, 100.0));

        let last = steps.last().unwrap();
        assert_eq!(last.remaining_time_secs(), 0.0);
        assert_eq!(last.distance_to_target_m, 0.0);
    }

    #[test]
    fn fractional_duration_rounds_up() {
        let route = NavigationResult::new(vec![Instruction::new("Keep left", 2.5, 50.0)]);
        let steps = build_timeline(&route, MARKER);
        let ttm: Vec<Option<f64>> = steps[..3].iter().map(|s| s.command.time_to_maneuver_secs).collect();
        assert_eq!(ttm, [Some(2.5), Some(1.5), Some(0.5)]);
        assert_eq!(steps.len(), 4);
    }

    #[test]
    fn zero_duration_still_emits_once() {
        let route = NavigationResult::new(vec![
            Instruction::new("Enter roundabout", 0.0, 0.0),
            Instruction::new("Exit roundabout", -4.0, 20.0),
        ]);
        let steps = build_timeline(&route, MARKER);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].command.time_to_maneuver_secs, Some(0.0));
    }

    #[test]
    fn marker_emitted_once_even_without_marker_instruction() {
        let route = NavigationResult::new(vec![Instruction::new("Head north", 1.0, 10.0)]);
        let steps = build_timeline(&route, MARKER);
        assert_eq!(steps.iter().filter(|s| s.command.description == MARKER).count(), 1);

        let steps = build_timeline(&short_route(), MARKER);
        assert_eq!(steps.iter().filter(|s| s.command.description == MARKER).count(), 1);
    }

    #[test]
    fn empty_route_is_just_the_marker() {
        let steps = build_timeline(&NavigationResult::default(), MARKER);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].command.description, MARKER);
    }
}

// ── Noise ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod noise {
    use crate::{NoiseConfig, SimError, perturb};

    fn config(seed: u64, duplicate: f64, drop: f64, swap: f64) -> NoiseConfig {
        NoiseConfig { seed, duplicate_prob: duplicate, drop_prob: drop, swap_prob: swap }
    }

    #[test]
    fn quiet_config_is_identity() {
        let items: Vec<u32> = (0..20).collect();
        assert_eq!(perturb(items.clone(), &NoiseConfig::default()), items);
    }

    #[test]
    fn same_seed_same_output() {
        let items: Vec<u32> = (0..200).collect();
        let cfg = config(42, 0.2, 0.2, 0.2);
        assert_eq!(perturb(items.clone(), &cfg), perturb(items, &cfg));
    }

    #[test]
    fn different_seeds_diverge() {
        let items: Vec<u32> = (0..200).collect();
        let a = perturb(items.clone(), &config(1, 0.3, 0.3, 0.3));
        let b = perturb(items, &config(2, 0.3, 0.3, 0.3));
        assert_ne!(a, b);
    }

    #[test]
    fn certain_drop_keeps_only_last() {
        let out = perturb(vec![1, 2, 3, 4], &config(0, 0.0, 1.0, 0.0));
        assert_eq!(out, [4]);
    }

    #[test]
    fn certain_duplicate_doubles_all_but_last() {
        let out = perturb(vec![1, 2, 3], &config(0, 1.0, 0.0, 0.0));
        assert_eq!(out, [1, 1, 2, 2, 3]);
    }

    #[test]
    fn certain_swap_exchanges_pairs() {
        let out = perturb(vec![0, 1, 2, 3, 4], &config(0, 0.0, 0.0, 1.0));
        assert_eq!(out, [1, 0, 3, 2, 4]);
    }

    #[test]
    fn last_element_never_moves() {
        let items: Vec<u32> = (0..100).collect();
        for seed in 0..20 {
            let out = perturb(items.clone(), &config(seed, 0.3, 0.3, 0.5));
            assert_eq!(out.last(), Some(&99));
            assert_eq!(out.iter().filter(|&&x| x == 99).count(), 1);
        }
    }

    #[test]
    fn out_of_range_probability_rejected() {
        assert!(config(0, 0.5, 0.5, 0.5).validate().is_ok());
        let err = config(0, 1.5, 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, SimError::Config(ref m) if m.contains("duplicate_prob")));
        assert!(config(0, 0.0, -0.1, 0.0).validate().is_err());
    }

    #[test]
    fn noise_config_from_json_uses_defaults() {
        let cfg: NoiseConfig = serde_json::from_str(r#"{ "seed": 9, "drop_prob": 0.1 }"#).unwrap();
        assert_eq!(cfg, config(9, 0.0, 0.1, 0.0));
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use gd_core::RouteGeneration;
    use gd_route::ManeuverIcon;
    use gd_session::{GuidanceObserver, GuidanceSnapshot, SessionState};

    use crate::TraceRecorder;

    const HEADER: &str = "seq,state,generation,instruction,icon,maneuver_distance,remaining_distance,eta";

    fn guiding_snapshot() -> GuidanceSnapshot {
        GuidanceSnapshot {
            state:                    SessionState::Guiding,
            generation:               RouteGeneration { run: 2, revision: 1 },
            is_guiding:               true,
            current_instruction_text: Some("Turn right".into()),
            current_icon:             Some(ManeuverIcon::TurnRight),
            maneuver_distance_text:   Some("420 m".into()),
            remaining_distance_text:  Some("1.2 km".into()),
            eta_text:                 Some("2 min".into()),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut rec = TraceRecorder::new(Vec::new());
        rec.on_snapshot(&GuidanceSnapshot::default());
        rec.on_snapshot(&guiding_snapshot());
        assert_eq!(rec.rows(), 2);

        let text = String::from_utf8(rec.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "0,idle,R0.0,,,,,");
        assert_eq!(lines[2], "1,guiding,R2.1,Turn right,turn_right,420 m,1.2 km,2 min");
    }

    #[test]
    fn records_transitions_and_unmatched() {
        let mut rec = TraceRecorder::new(Vec::new());
        rec.on_transition(SessionState::Idle, SessionState::Calculating, RouteGeneration::INITIAL);
        rec.on_unmatched_command("MYSTERY");
        assert_eq!(rec.transitions(), [(SessionState::Idle, SessionState::Calculating)]);
        assert_eq!(rec.unmatched(), ["MYSTERY".to_string()]);
        assert_eq!(rec.rows(), 0);
    }

    #[test]
    fn create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");

        let mut rec = TraceRecorder::create(&path).unwrap();
        rec.on_snapshot(&guiding_snapshot());
        assert!(rec.take_error().is_none());
        rec.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(HEADER));
        assert!(text.contains("Turn right"));
    }
}

// ── ScriptedEngine ────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::{Instant, sleep_until};

    use gd_core::{GeoPoint, GuidanceConfig};
    use gd_route::{Instruction, NavigationResult};
    use gd_runtime::{GuidanceHandle, GuidanceService, NavigationEngine};
    use gd_session::SessionState;
    use tokio::task::JoinHandle;

    use super::helpers::{MARKER, short_route};
    use crate::{NoiseConfig, Recalculation, ScriptedEngine, TraceRecorder};

    type Recorder = TraceRecorder<Vec<u8>>;

    fn spawn(engine: ScriptedEngine) -> (GuidanceHandle, Arc<ScriptedEngine>, JoinHandle<Recorder>) {
        let engine = Arc::new(engine);
        let (handle, task) = GuidanceService::spawn(
            GuidanceConfig::default(),
            Arc::clone(&engine),
            TraceRecorder::new(Vec::new()),
        )
        .unwrap();
        (handle, engine, task)
    }

    async fn start(handle: &GuidanceHandle) -> Instant {
        handle
            .start(GeoPoint::new(39.920, 32.850), GeoPoint::new(39.930, 32.850))
            .await
            .unwrap();
        Instant::now()
    }

    async fn at(t0: Instant, ms: u64) {
        sleep_until(t0 + Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn replays_route_to_arrival() {
        let (handle, engine, task) = spawn(ScriptedEngine::new(short_route(), MARKER));
        let t0 = start(&handle).await;
        assert_eq!(handle.snapshot().state, SessionState::Guiding);

        at(t0, 1_500).await;
        assert_eq!(handle.snapshot().current_instruction_text.as_deref(), Some("Navigation started"));

        at(t0, 2_500).await;
        let snap = handle.snapshot();
        assert_eq!(snap.current_instruction_text.as_deref(), Some("Head north"));
        assert_eq!(snap.maneuver_distance_text.as_deref(), Some("300 m"));
        assert_eq!(snap.remaining_distance_text.as_deref(), Some("500 m"));

        // Marker at 7 s, grace expires at 9 s.
        at(t0, 7_500).await;
        assert_eq!(handle.snapshot().state, SessionState::Arrived);
        assert!(engine.is_playing());

        at(t0, 12_000).await;
        assert_eq!(handle.snapshot().state, SessionState::Stopped);
        assert_eq!(engine.emitted(), 6);
        assert!(!engine.is_playing());

        handle.shutdown();
        let recorder = task.await.unwrap();
        assert!(recorder.unmatched().is_empty());
        assert!(recorder.transitions().contains(&(SessionState::Guiding, SessionState::Arrived)));
        assert!(recorder.transitions().contains(&(SessionState::Arrived, SessionState::Stopped)));

        let text = String::from_utf8(recorder.finish().unwrap()).unwrap();
        assert!(text.contains("arrived"));
        assert!(text.contains("You have reached your destination"));
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_recalculation_swaps_route() {
        let detour = NavigationResult::new(vec![Instruction::new("TURN_LEFT", 4.0, 100.0)]);
        let engine = ScriptedEngine::new(short_route(), MARKER).recalculation(Recalculation {
            after_commands: 2,
            route:          Some(detour),
        });
        let (handle, _engine, _task) = spawn(engine);
        let t0 = start(&handle).await;

        at(t0, 3_500).await;
        let snap = handle.snapshot();
        assert_eq!(snap.state, SessionState::Recalculating);
        assert_eq!(snap.generation.revision, 1);

        at(t0, 4_500).await;
        let snap = handle.snapshot();
        assert_eq!(snap.state, SessionState::Guiding);
        assert_eq!(snap.current_instruction_text.as_deref(), Some("Route updated"));
        assert_eq!(snap.remaining_distance_text.as_deref(), Some("100 m"));

        at(t0, 5_500).await;
        assert_eq!(handle.snapshot().current_instruction_text.as_deref(), Some("Turn left"));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_playback() {
        let (handle, engine, _task) = spawn(ScriptedEngine::new(short_route(), MARKER));
        let t0 = start(&handle).await;

        at(t0, 2_500).await;
        assert_eq!(engine.emitted(), 1);
        assert!(handle.stop().await.unwrap());
        assert!(!engine.is_playing());
        assert_eq!(engine.remaining_time_secs(), None);

        at(t0, 6_000).await;
        assert_eq!(engine.emitted(), 1);
        assert_eq!(handle.snapshot().state, SessionState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicated_commands_still_arrive() {
        let noise = NoiseConfig { seed: 7, duplicate_prob: 1.0, ..NoiseConfig::default() };
        let (handle, engine, task) = spawn(ScriptedEngine::new(short_route(), MARKER).noise(noise));
        let t0 = start(&handle).await;

        at(t0, 16_000).await;
        assert_eq!(engine.emitted(), 11);
        assert_eq!(handle.snapshot().state, SessionState::Stopped);

        handle.shutdown();
        let recorder = task.await.unwrap();
        assert!(recorder.unmatched().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_route_is_rejected() {
        let (handle, engine, _task) = spawn(ScriptedEngine::new(NavigationResult::default(), MARKER));
        let err = handle
            .start(GeoPoint::new(39.920, 32.850), GeoPoint::new(39.930, 32.850))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            gd_runtime::ServiceError::Session(gd_session::SessionError::NoRoute)
        ));
        assert!(!engine.is_playing());
    }
}
