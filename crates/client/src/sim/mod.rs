// Simulation state machine and scene synchronization
//
// Everything in this module tree is wasm-free: the controller talks to the
// renderer through `SceneAdapter` and to the socket through `ActionSink`,
// so the state machine and diff engine are tested natively.
use thiserror::Error;

use protocol::{ClientAction, ServerMessage};

use crate::scene::SceneAdapter;

pub mod diff;
pub mod registry;
#[cfg(test)]
pub(crate) mod testing;

use registry::CellRegistry;

/// Delay between reconciling a generation and requesting the next one,
/// letting the render visibly complete.
pub const SETTLE_DELAY_MS: i32 = 500;

/// Camera distance per configured lattice layer (visual heuristic).
const CAMERA_DISTANCE_PER_LAYER: f32 = 2.5;

/// Where the controller is in a run. Initial state is `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Stopped,
    Playing,
    Paused,
}

/// Run parameters captured from the UI when a run starts. Immutable for the
/// duration of that run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub layers: u32,
    pub fill_percent: f64,
}

impl RunConfig {
    pub fn camera_distance(&self) -> f32 {
        self.layers as f32 * CAMERA_DISTANCE_PER_LAYER
    }
}

/// The controller's outbound seam; implemented by the websocket connection
/// and by a recording sink in tests.
pub trait ActionSink {
    fn send(&mut self, action: &ClientAction) -> Result<(), SendError>;
}

#[derive(Debug, Error)]
#[error("failed to send action: {0}")]
pub struct SendError(pub String);

/// What the caller should do after a server message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A generation was reconciled; schedule one settle delay, after which
    /// [`SimulationController::settle_elapsed`] decides whether to tick.
    ScheduleSettle,
    /// Nothing to do.
    Ignored,
}

/// The play/pause/stop state machine.
///
/// Owns the cell registry and the active run config; emits protocol actions
/// through the sink and mutates visuals only through the scene adapter.
/// The UI is driven as a projection of [`SimulationController::state`],
/// never read back as state.
pub struct SimulationController<S: SceneAdapter, A: ActionSink> {
    scene: S,
    sink: A,
    registry: CellRegistry<S::Handle>,
    state: SimulationState,
    run: Option<RunConfig>,
}

impl<S: SceneAdapter, A: ActionSink> SimulationController<S, A> {
    pub fn new(scene: S, sink: A) -> Self {
        Self {
            scene,
            sink,
            registry: CellRegistry::new(),
            state: SimulationState::Stopped,
            run: None,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn run_config(&self) -> Option<RunConfig> {
        self.run
    }

    /// Begin a new run. No-op unless currently `Stopped`.
    ///
    /// The previous generation's scene and registry are cleared and the
    /// camera repositioned before the `start` action goes out.
    pub fn start(&mut self, config: RunConfig) {
        if self.state != SimulationState::Stopped {
            return;
        }
        diff::clear_all(&mut self.registry, &mut self.scene);
        self.scene.position_camera(config.camera_distance());
        self.send(ClientAction::Start {
            layers: config.layers,
            fill_percent: config.fill_percent,
        });
        self.run = Some(config);
        self.state = SimulationState::Playing;
        log::info!("run started: {config:?}");
    }

    /// End the current run. The last generation stays visible until the
    /// next start. No-op when already `Stopped`.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.send(ClientAction::Stop);
        self.state = SimulationState::Stopped;
        log::info!("run stopped");
    }

    /// Suspend tick requests. Does not cancel a tick already in flight; a
    /// reply that is already on the wire will still be applied.
    pub fn pause(&mut self) {
        if self.state == SimulationState::Playing {
            self.state = SimulationState::Paused;
        }
    }

    /// Resume a paused run, requesting the next generation immediately.
    pub fn resume(&mut self) {
        if self.state == SimulationState::Paused {
            self.state = SimulationState::Playing;
            self.send(ClientAction::Tick);
        }
    }

    /// The start/stop toggle control.
    pub fn toggle_run(&mut self, config: RunConfig) {
        match self.state {
            SimulationState::Stopped => self.start(config),
            SimulationState::Playing | SimulationState::Paused => self.stop(),
        }
    }

    /// The pause/resume toggle control. No-op while `Stopped`.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SimulationState::Playing => self.pause(),
            SimulationState::Paused => self.resume(),
            SimulationState::Stopped => {}
        }
    }

    /// Handle one decoded server message.
    ///
    /// Coordinate snapshots are reconciled regardless of state: a reply
    /// already in flight when the user stopped or paused is still applied.
    /// The settle delay is always scheduled for a reconciled snapshot; the
    /// `Playing` check happens at fire time, not here.
    pub fn handle_message(&mut self, message: ServerMessage) -> MessageOutcome {
        match message {
            ServerMessage::Coordinates { data } => {
                let stats = diff::reconcile(&data, &mut self.registry, &mut self.scene);
                log::debug!(
                    "reconciled generation: +{} -{} ({} live)",
                    stats.added,
                    stats.removed,
                    self.registry.len(),
                );
                self.scene.render_frame();
                MessageOutcome::ScheduleSettle
            }
            ServerMessage::Unknown => {
                log::warn!("ignoring unrecognized server message");
                MessageOutcome::Ignored
            }
        }
    }

    /// Fired when a settle delay elapses. The delay itself is never
    /// cancelled; the tick request is simply suppressed unless the state is
    /// still `Playing` right now (honoring a pause or stop requested while
    /// the delay was pending).
    pub fn settle_elapsed(&mut self) {
        if self.state != SimulationState::Playing {
            log::debug!("settle delay elapsed while {:?}; tick suppressed", self.state);
            return;
        }
        self.send(ClientAction::Tick);
    }

    /// The socket closed. Logged only; the state machine is left as-is and
    /// the simulation silently stalls.
    pub fn socket_closed(&self) {
        log::warn!("websocket closed; simulation stalled in {:?}", self.state);
    }

    /// Render one frame (driven by the animation loop).
    pub fn render(&mut self) {
        self.scene.render_frame();
    }

    pub fn registry(&self) -> &CellRegistry<S::Handle> {
        &self.registry
    }

    fn send(&mut self, action: ClientAction) {
        if let Err(e) = self.sink.send(&action) {
            log::error!("{e}");
        }
    }
}
