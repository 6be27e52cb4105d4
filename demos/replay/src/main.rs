//! replay — drives the guidance engine with a scripted route.
//!
//! Loads a route CSV (or the embedded one), runs a `GuidanceService` against
//! a `ScriptedEngine` with a little seeded noise and one scripted detour, and
//! writes every published snapshot to `output/replay/trace.csv`.
//!
//! ```text
//! replay [route.csv] [config.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see discarded and unmatched events.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tracing::info;

use gd_core::{GeoPoint, GuidanceConfig};
use gd_route::{NavigationResult, load_instructions_csv, load_instructions_reader};
use gd_runtime::{GuidanceService, init_logging};
use gd_session::SessionState;
use gd_sim::{NoiseConfig, Recalculation, ScriptedEngine, TraceRecorder};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64      = 42;
const STEP:           Duration = Duration::from_millis(250); // one simulated second
const DUPLICATE_PROB: f64      = 0.05;
const DROP_PROB:      f64      = 0.05;
const SWAP_PROB:      f64      = 0.02;
const DETOUR_AFTER:   usize    = 12; // commands before the scripted recalculation
const RUN_TIMEOUT:    Duration = Duration::from_secs(300);
const OUTPUT_DIR:     &str     = "output/replay";

// Kızılay → Ulus, Ankara.
const FROM: GeoPoint = GeoPoint { lat: 39.9208, lon: 32.8541 };
const TO:   GeoPoint = GeoPoint { lat: 39.9420, lon: 32.8543 };

// ── Embedded routes ───────────────────────────────────────────────────────────

const ROUTE_CSV: &str = "\
text,duration_secs,distance_m\n\
GO_STRAIGHT,10,150\n\
TURN_RIGHT,14,420\n\
TAKE_SECOND_EXIT_ON_ROUNDABOUT,12,380\n\
STAY_LEFT,8,260\n\
TURN_LEFT,9,310\n\
WILL_REACH_YOUR_DESTINATION,5,60\n\
REACHED_YOUR_DESTINATION,0,0\n\
";

const DETOUR_CSV: &str = "\
text,duration_secs,distance_m\n\
UTURN,6,40\n\
TURN_RIGHT_AT_THE_END_OF_ROAD,11,350\n\
TURN_LEFT,9,310\n\
WILL_REACH_YOUR_DESTINATION,5,60\n\
REACHED_YOUR_DESTINATION,0,0\n\
";

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info")?;
    println!("=== replay — guidance engine against a scripted route ===");

    let mut args = std::env::args().skip(1);
    let route_path = args.next().map(PathBuf::from);
    let config_path = args.next().map(PathBuf::from);

    // 1. Configuration.
    let config = match &config_path {
        Some(p) => GuidanceConfig::from_json_path(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => GuidanceConfig::default(),
    };
    config.validate()?;

    // 2. Routes.
    let route = match &route_path {
        Some(p) => load_instructions_csv(p).with_context(|| format!("loading route {}", p.display()))?,
        None => load_instructions_reader(Cursor::new(ROUTE_CSV))?,
    };
    let detour = load_instructions_reader(Cursor::new(DETOUR_CSV))?;
    print_route("Route", &route);
    print_route("Detour", &detour);

    // 3. Engine.
    let noise = NoiseConfig {
        seed:           SEED,
        duplicate_prob: DUPLICATE_PROB,
        drop_prob:      DROP_PROB,
        swap_prob:      SWAP_PROB,
    };
    noise.validate()?;
    let engine = ScriptedEngine::new(route, config.reached_marker.clone())
        .step(STEP)
        .noise(noise)
        .recalculation(Recalculation { after_commands: DETOUR_AFTER, route: Some(detour) });
    let engine = Arc::new(engine);

    // 4. Trace output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let trace_path = Path::new(OUTPUT_DIR).join("trace.csv");
    let recorder = TraceRecorder::create(&trace_path)?;

    // 5. Run.
    let (handle, task) = GuidanceService::spawn(config, Arc::clone(&engine), recorder)?;
    let t0 = Instant::now();

    let generation = handle.start(FROM, TO).await?;
    info!(%generation, "guidance started");

    let mut snapshots = handle.subscribe();
    let finished = tokio::time::timeout(RUN_TIMEOUT, async {
        snapshots
            .wait_for(|s| s.state == SessionState::Stopped)
            .await
            .map(|_| ())
    })
    .await;

    let last = handle.snapshot();
    handle.shutdown();
    let recorder = task.await?;

    match finished {
        Ok(Ok(())) => {}
        Ok(Err(_)) => bail!("guidance service exited before the route finished"),
        Err(_) => bail!("route did not finish within {} s (last state: {})", RUN_TIMEOUT.as_secs(), last.state),
    }

    // 6. Summary.
    let elapsed = t0.elapsed();
    let transitions: Vec<String> = recorder
        .transitions()
        .iter()
        .map(|(from, to)| format!("{from}→{to}"))
        .collect();
    let unmatched = recorder.unmatched().len();
    let rows = recorder.rows();
    recorder.finish()?;

    println!();
    println!("Replay complete in {:.1} s", elapsed.as_secs_f64());
    println!("  commands emitted    : {}", engine.emitted());
    println!("  unmatched commands  : {unmatched}");
    println!("  snapshot rows       : {rows}  ({})", trace_path.display());
    println!("  transitions         : {}", transitions.join(", "));

    Ok(())
}

fn print_route(label: &str, route: &NavigationResult) {
    println!(
        "{label}: {} instructions, {:.0} m, {:.0} s",
        route.instructions.len(),
        route.total_distance_m,
        route.effective_total_secs()
    );
    for (i, instruction) in route.instructions.iter().enumerate() {
        println!(
            "  {:>2}  {:<34} {:>5.0} s {:>6.0} m",
            i, instruction.text, instruction.segment_duration_secs, instruction.segment_distance_m
        );
    }
}
