#![forbid(unsafe_code)]

//! Scripted walkthrough of the screen flow.
//!
//! Boots a four-screen UI with one well-behaved subsystem, one that
//! acknowledges late, and one that never acknowledges; then runs a short
//! session of activations including a simulated competing patch hiding the
//! active screen, which the health monitor heals. Time is virtual: the
//! script steps a clock instead of sleeping, so the run is instant and
//! deterministic.
//!
//! Run with `RUST_LOG=debug` for the full decision log.

use std::time::{Duration, Instant};

use runegate_core::{GameHooks, HeadlessView, ScreenId, ScreenRegistry};
use runegate_runtime::{
    CoordinatorEvent, FlowConfig, FlowRuntime, HealthVerdict, ManagerConfig, StartOutcome,
    Subsystem,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Hooks for a session where character creation happens on the rune screen.
#[derive(Debug, Default)]
struct DemoHooks {
    character_created: bool,
}

impl GameHooks for DemoHooks {
    fn has_active_character(&self) -> bool {
        self.character_created
    }

    fn enter_default_area(&mut self) {
        info!("entering the default area");
    }
}

/// A subsystem that starts as soon as it is signaled.
struct Prompt(&'static str);

impl Subsystem for Prompt {
    fn name(&self) -> &str {
        self.0
    }

    fn start(&mut self) -> StartOutcome {
        StartOutcome::Ready
    }
}

/// A subsystem that starts in the background and acknowledges later.
struct Slow(&'static str);

impl Subsystem for Slow {
    fn name(&self) -> &str {
        self.0
    }

    fn start(&mut self) -> StartOutcome {
        StartOutcome::Pending
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let registry = ScreenRegistry::from_ids(["runeSelect", "game", "areaSelect", "battle"])?;
    let config = FlowConfig::new(ManagerConfig::new("runeSelect", "game", "runeSelect"));
    let mut rt = FlowRuntime::new(registry, HeadlessView::new(), DemoHooks::default(), config)?;

    rt.register_subsystem(Box::new(Prompt("screenManager")));
    rt.register_subsystem(Box::new(Slow("combatLog")));
    rt.register_subsystem(Box::new(Slow("portraits")));

    let t0 = Instant::now();
    let mut clock = t0;
    let step = Duration::from_millis(500);

    info!("booting");
    let mut steps = 0u32;
    while !rt.boot_complete() {
        let tick = rt.tick_at(clock);
        match &tick.coordinator {
            CoordinatorEvent::Waiting => {}
            event => info!(?event, elapsed = ?clock.duration_since(t0), "boot"),
        }
        // combatLog comes up after a couple of seconds; portraits never does
        // and gets degraded by the watchdog.
        steps += 1;
        if steps == 4 {
            rt.acknowledge("combatLog");
        }
        clock += step;
    }
    for status in rt.coordinator().statuses() {
        info!(
            subsystem = %status.name,
            state = ?status.state,
            attempts = status.attempts,
            forced = status.forced,
            "boot status"
        );
    }

    // A short session: pick runes, start playing, browse areas, go back.
    clock += step;
    rt.activate_at("runeSelect", clock)?;
    rt.manager_mut().hooks_mut().character_created = true;

    clock += step;
    rt.tick_at(clock);
    rt.activate_at("game", clock)?;

    clock += step;
    rt.tick_at(clock);
    rt.activate_at("areaSelect", clock)?;

    clock += step;
    rt.tick_at(clock);
    let returned = rt.go_back_at(clock)?;
    info!(screen = %returned, "went back");

    // A competing patch hides the active screen behind the flow's back.
    let active = rt.active().unwrap_or_else(|| ScreenId::new("runeSelect"));
    rt.manager_mut().view_mut().force_hide(&active);
    info!(screen = %active, "simulated a rogue patch hiding the active screen");

    let mut healed = false;
    for _ in 0..16 {
        clock += step;
        let tick = rt.tick_at(clock);
        if let HealthVerdict::Restored(screen) = &tick.health {
            info!(screen = %screen, "health monitor restored the screen");
            healed = true;
            break;
        }
    }
    if !healed {
        return Err("health monitor never ran".into());
    }

    info!(active = %rt.active().map(|s| s.to_string()).unwrap_or_default(), "session done");
    Ok(())
}
