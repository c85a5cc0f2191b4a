//! Desktop server for trying the admin API without a gate.
//!
//! Runs the real [`GateRunner`] against a simulated single-button gate
//! operator, with the axum admin API on top:
//! - Watch the status at http://localhost:8080/api/state
//! - `POST /api/pulse` to open or close the simulated gate
//! - `POST /api/maintenance` / `POST /api/emergency` with `{"enabled": true}`
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_server --features web
//! ```
//!
//! ```sh
//! curl -X POST http://localhost:8080/api/pulse
//! curl http://localhost:8080/api/state
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use rs_gatekeeper::services::{run_server, SharedGateState, WebAdmin, WebServerConfig};
use rs_gatekeeper::traits::{Clock, EventLog, GateInputs, GateOutputs, InputSnapshot, OutputFrame};
use rs_gatekeeper::{Config, GateRunner, Offline};

/// Full travel time of the simulated gate.
const TRAVEL_MS: u32 = 8_000;

// ============================================================================
// Simulated hardware
// ============================================================================

struct SystemClock {
    start: Instant,
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// A gate operator that starts, stops and reverses on each relay pulse.
struct Yard {
    /// 0 = closed, TRAVEL_MS = open
    position: u32,
    /// +1 opening, -1 closing, 0 stopped
    motion: i8,
    last_direction: i8,
    relay: bool,
    last_step: Instant,
}

impl Yard {
    fn new() -> Self {
        Self {
            position: 0,
            motion: 0,
            last_direction: -1,
            relay: false,
            last_step: Instant::now(),
        }
    }

    fn step(&mut self) {
        let dt = self.last_step.elapsed().as_millis() as u32;
        self.last_step = Instant::now();
        match self.motion {
            1 => self.position = (self.position + dt).min(TRAVEL_MS),
            -1 => self.position = self.position.saturating_sub(dt),
            _ => {}
        }
        if (self.motion == 1 && self.position == TRAVEL_MS) || (self.motion == -1 && self.position == 0) {
            println!("[yard] gate reached {}", if self.position == 0 { "closed" } else { "open" });
            self.motion = 0;
        }
    }

    fn pulse(&mut self) {
        self.motion = if self.motion != 0 {
            0
        } else if self.position == 0 {
            1
        } else if self.position == TRAVEL_MS {
            -1
        } else {
            -self.last_direction
        };
        if self.motion != 0 {
            self.last_direction = self.motion;
        }
        println!("[yard] pulse, motion {}", self.motion);
    }
}

type SharedYard = Arc<Mutex<Yard>>;

struct YardInputs(SharedYard);

impl GateInputs for YardInputs {
    type Error = ();

    fn read(&mut self) -> Result<InputSnapshot, ()> {
        let mut yard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        yard.step();
        Ok(InputSnapshot {
            closed_limit: yard.position == 0,
            open_limit: yard.position == TRAVEL_MS,
            ..InputSnapshot::default()
        })
    }
}

struct YardOutputs(SharedYard);

impl GateOutputs for YardOutputs {
    type Error = ();

    fn write(&mut self, frame: &OutputFrame) -> Result<(), ()> {
        let mut yard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if frame.relay && !yard.relay {
            yard.pulse();
        }
        yard.relay = frame.relay;
        Ok(())
    }
}

struct PrintLog;

impl EventLog for PrintLog {
    fn record(&mut self, message: &str, actor: &str) {
        println!("[event] {} ({})", message, actor);
    }

    fn clear(&mut self) {
        println!("[event] log cleared");
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    println!("=================================");
    println!("  rs-gatekeeper Desktop Server");
    println!("=================================");
    println!();

    let config = Config::default();
    let web_config = WebServerConfig::from_config(&config.web);

    let state = Arc::new(SharedGateState::new());
    let yard = Arc::new(Mutex::new(Yard::new()));

    let admin = WebAdmin::new(Arc::clone(&state));
    let mut runner = GateRunner::new(
        &config,
        SystemClock { start: Instant::now() },
        YardInputs(Arc::clone(&yard)),
        YardOutputs(yard),
        PrintLog,
        Offline,
        admin,
    );
    runner.begin();
    thread::spawn(move || runner.run_forever());

    println!("Starting web server...");
    println!("  API: http://{}/api/state", web_config.addr);
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    rt.block_on(run_server(state, web_config))?;
    Ok(())
}
