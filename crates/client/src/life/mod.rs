// Client application state - glue between socket callbacks, the DOM and
// the simulation controller
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{WebSocket, window};

use protocol::ServerMessage;

use crate::network::Connection;
use crate::scene::{JsScene, SceneBridge};
use crate::sim::{MessageOutcome, SimulationController, SimulationState};
use crate::ui::Ui;

/// The running client: one controller instance, its UI projection, and the
/// queues the websocket callbacks write into.
///
/// Socket callbacks only queue; all handling happens on the animation-frame
/// tick, one message at a time in receipt order, so a message handler can
/// never re-enter another.
pub struct LifeApp {
    controller: SimulationController<JsScene, Connection>,
    ui: Ui,
    ws: WebSocket,
    message_queue: Rc<RefCell<Vec<String>>>,
    ws_close_flag: Rc<Cell<bool>>,
}

impl LifeApp {
    pub fn new(bridge: SceneBridge) -> Result<Self, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let connection = Connection::from_window()?;
        let ws = connection.websocket().clone();
        let ui = Ui::new(document);
        let controller = SimulationController::new(JsScene::new(bridge), connection);
        ui.project_state(controller.state());

        Ok(Self {
            controller,
            ui,
            ws,
            message_queue: Rc::new(RefCell::new(Vec::new())),
            ws_close_flag: Rc::new(Cell::new(false)),
        })
    }

    pub fn state(&self) -> SimulationState {
        self.controller.state()
    }

    pub(crate) fn websocket(&self) -> WebSocket {
        self.ws.clone()
    }

    /// The inbound message queue (for the websocket handler to push into).
    pub(crate) fn message_queue(&self) -> Rc<RefCell<Vec<String>>> {
        self.message_queue.clone()
    }

    pub(crate) fn ws_close_flag(&self) -> Rc<Cell<bool>> {
        self.ws_close_flag.clone()
    }

    /// Runs once per animation frame: drains the close flag and the queued
    /// messages in receipt order, renders a frame, and returns how many
    /// settle delays the caller should schedule.
    pub fn update(&mut self) -> usize {
        if self.ws_close_flag.get() {
            self.ws_close_flag.set(false);
            self.controller.socket_closed();
        }

        let messages: Vec<String> = self.message_queue.borrow_mut().drain(..).collect();
        let mut settles = 0;
        for text in messages {
            match serde_json::from_str::<ServerMessage>(&text) {
                Ok(message) => {
                    if self.controller.handle_message(message) == MessageOutcome::ScheduleSettle {
                        settles += 1;
                    }
                }
                // Malformed payloads are a local failure: log and drop.
                Err(e) => log::warn!("dropping malformed server message: {e}"),
            }
        }

        self.controller.render();
        settles
    }

    /// A settle delay fired.
    pub fn settle_elapsed(&mut self) {
        self.controller.settle_elapsed();
    }

    /// The start/stop toggle was pressed.
    pub fn toggle_run(&mut self) {
        let config = self.ui.read_run_config();
        self.controller.toggle_run(config);
        self.ui.project_state(self.controller.state());
    }

    /// The pause/resume toggle was pressed.
    pub fn toggle_pause(&mut self) {
        self.controller.toggle_pause();
        self.ui.project_state(self.controller.state());
    }

    /// The reset control was pressed: restore default inputs. Only
    /// meaningful while stopped (the inputs are disabled during a run).
    pub fn reset(&mut self) {
        if self.controller.state() == SimulationState::Stopped {
            self.ui.reset_controls();
        }
    }
}
