//! Fixed-rate control loop binding the controller to hardware and services.
//!
//! [`GateRunner`] owns a [`GateController`] together with everything it
//! talks to: the clock, the input and output boundary, the event log, the
//! network manager and the administration interface. Each call to
//! [`GateRunner::run_cycle`] performs exactly one read and one write of the
//! hardware.
//!
//! # Example
//!
//! ```rust
//! use rs_gatekeeper::{GateRunner, Config, InputSnapshot};
//! use rs_gatekeeper::hal::{
//!     MockAdmin, MockClock, MockConnectivity, MockEventLog, MockInputs, MockOutputs,
//! };
//!
//! let mut runner = GateRunner::new(
//!     &Config::default(),
//!     MockClock::new(),
//!     MockInputs::with_snapshot(InputSnapshot::closed()),
//!     MockOutputs::new(),
//!     MockEventLog::new(),
//!     MockConnectivity::new(),
//!     MockAdmin::new(),
//! );
//! runner.begin();
//!
//! let frame = runner.run_cycle().unwrap();
//! assert!(frame.green);
//! assert_eq!(runner.outputs().frames.len(), 1);
//! ```

use core::fmt;

use crate::config::Config;
use crate::controller::{GateController, GateStatus};
use crate::effects::Notice;
use crate::traits::{
    AdminInterface, Clock, Connectivity, EventLog, GateInputs, GateOutputs, OutputFrame,
};

/// Error from one control cycle.
///
/// Neither variant stops the loop; [`GateRunner::run_forever`] logs it and
/// carries on with the next cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleError<IE, OE> {
    /// Inputs could not be read. The fail-safe frame was written instead.
    Input(IE),
    /// The output frame could not be written.
    Output(OE),
}

impl<IE: fmt::Debug, OE: fmt::Debug> fmt::Display for CycleError<IE, OE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::Input(e) => write!(f, "input read failed: {:?}", e),
            CycleError::Output(e) => write!(f, "output write failed: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<IE: fmt::Debug, OE: fmt::Debug> std::error::Error for CycleError<IE, OE> {}

/// The control loop.
///
/// # Type Parameters
///
/// - `C`: [`Clock`]
/// - `I`: [`GateInputs`]
/// - `O`: [`GateOutputs`]
/// - `L`: [`EventLog`]
/// - `N`: [`Connectivity`]
/// - `A`: [`AdminInterface`]
pub struct GateRunner<C, I, O, L, N, A> {
    controller: GateController,
    clock: C,
    inputs: I,
    outputs: O,
    log: L,
    network: N,
    admin: A,
    cycle_interval_ms: u32,
}

impl<C, I, O, L, N, A> GateRunner<C, I, O, L, N, A>
where
    C: Clock,
    I: GateInputs,
    O: GateOutputs,
    L: EventLog,
    N: Connectivity,
    A: AdminInterface,
{
    /// Create a runner around a fresh controller.
    pub fn new(config: &Config, clock: C, inputs: I, outputs: O, log: L, network: N, admin: A) -> Self {
        Self {
            controller: GateController::new(config.timing.clone()),
            clock,
            inputs,
            outputs,
            log,
            network,
            admin,
            cycle_interval_ms: config.timing.cycle_interval_ms,
        }
    }

    /// Initialize the controller and bring up the collaborators.
    pub fn begin(&mut self) {
        self.controller.begin();
        self.network.begin();
        self.admin.begin();
        log::info!("runner: started, cycle {} ms", self.cycle_interval_ms);
    }

    /// Run one cycle: read, tick, write, then service the collaborators.
    ///
    /// Returns the frame that was written.
    pub fn run_cycle(&mut self) -> Result<OutputFrame, CycleError<I::Error, O::Error>> {
        let now = self.clock.now_ms();

        let snapshot = match self.inputs.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                if self.outputs.write_fail_safe().is_err() {
                    log::error!("runner: fail-safe write failed");
                }
                self.service(now);
                return Err(CycleError::Input(e));
            }
        };

        let frame = self.controller.tick(&snapshot, now);
        let written = self.outputs.write(&frame);

        self.forward_notices();
        self.service(now);

        written.map(|()| frame).map_err(CycleError::Output)
    }

    /// Loop forever at the configured cycle interval.
    #[cfg(feature = "std")]
    pub fn run_forever(&mut self) -> !
    where
        I::Error: fmt::Debug,
        O::Error: fmt::Debug,
    {
        let interval = std::time::Duration::from_millis(u64::from(self.cycle_interval_ms));
        loop {
            if let Err(e) = self.run_cycle() {
                log::error!("runner: {}", e);
            }
            std::thread::sleep(interval);
        }
    }

    /// Snapshot for display.
    pub fn status(&self) -> GateStatus {
        self.controller.status(self.clock.now_ms())
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Mutable access to the input source.
    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    /// The output sink.
    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    /// The event log.
    pub fn event_log(&self) -> &L {
        &self.log
    }

    /// The network manager.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Mutable access to the administration interface.
    pub fn admin_mut(&mut self) -> &mut A {
        &mut self.admin
    }

    fn service(&mut self, now: u32) {
        self.network.poll();

        if let Some(command) = self.admin.poll() {
            self.controller.apply_admin(command, now);
            self.forward_notices();
        }

        let status = self.controller.status(now);
        self.admin.report(&status);
    }

    fn forward_notices(&mut self) {
        for notice in self.controller.take_notices() {
            match notice {
                Notice::Event { event, actor } => self.log.record(event.message(), actor.as_str()),
                Notice::ResetCredentials => self.network.reset_credentials(),
                Notice::ResetStorage => self.log.clear(),
                Notice::FactoryReset => {
                    self.network.reset_credentials();
                    self.log.clear();
                }
            }
        }
    }
}
