// WASM entry point for the lattice-life client
//
// The browser page hands us a scene bridge (the 3D renderer's boundary
// object); everything else - socket, state machine, scene sync, DOM
// controls - is wired up here.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, window};

// Module structure - each module handles a specific concern
mod life; // app state, controller/DOM/socket glue
mod network; // WebSocket connection, JSON transport
mod scene; // scene adapter boundary, JS rendering bridge
mod sim; // state machine, cell registry, diff engine
mod ui; // DOM controls projection
mod utils; // console logger

pub use life::LifeApp;
pub use scene::{SceneAdapter, SceneBridge};
pub use sim::{RunConfig, SimulationController, SimulationState};

use sim::SETTLE_DELAY_MS;

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    utils::init_logging();
}

/// The client handle JS interacts with.
#[wasm_bindgen]
pub struct LifeClient {
    app: Rc<RefCell<LifeApp>>,
}

#[wasm_bindgen]
impl LifeClient {
    /// Create the client: opens the socket, wires the DOM controls and
    /// starts the animation loop.
    #[wasm_bindgen(constructor)]
    pub fn new(bridge: SceneBridge) -> Result<LifeClient, JsValue> {
        init();

        let app = LifeApp::new(bridge)?;
        let app_rc = Rc::new(RefCell::new(app));

        setup_socket_handlers(app_rc.clone())?;
        setup_control_handlers(app_rc.clone())?;
        setup_animation_loop(app_rc.clone())?;

        Ok(LifeClient { app: app_rc })
    }

    /// Current simulation state, for JS-side diagnostics.
    pub fn state(&self) -> String {
        format!("{:?}", self.app.borrow().state())
    }
}

fn setup_socket_handlers(app: Rc<RefCell<LifeApp>>) -> Result<(), JsValue> {
    let ws = app.borrow().websocket();
    let queue = app.borrow().message_queue();
    let close_flag = app.borrow().ws_close_flag();

    // onmessage only queues; the animation loop handles messages one at a
    // time in receipt order.
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Some(text) = event.data().as_string() {
            queue.borrow_mut().push(text);
        } else {
            log::warn!("dropping non-text server message");
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    // onclose - log and flag; no reconnect.
    let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
        web_sys::console::log_1(&format!("websocket closed: {}", event.code()).into());
        close_flag.set(true);
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    let onerror = Closure::wrap(Box::new(move |e: JsValue| {
        web_sys::console::error_1(&format!("websocket error: {:?}", e).into());
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    Ok(())
}

fn setup_control_handlers(app: Rc<RefCell<LifeApp>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let bind_click = |id: &str, mut f: Box<dyn FnMut()>| -> Result<(), JsValue> {
        let el = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("{id} control not found")))?;
        let closure = Closure::wrap(Box::new(move |_: JsValue| f()) as Box<dyn FnMut(JsValue)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    };

    {
        let app = app.clone();
        bind_click("start", Box::new(move || app.borrow_mut().toggle_run()))?;
    }
    {
        let app = app.clone();
        bind_click("pause", Box::new(move || app.borrow_mut().toggle_pause()))?;
    }
    {
        let app = app.clone();
        bind_click("reset", Box::new(move || app.borrow_mut().reset()))?;
    }

    Ok(())
}

fn setup_animation_loop(app: Rc<RefCell<LifeApp>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;

    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let app_clone = app.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let settles = app_clone.borrow_mut().update();
        for _ in 0..settles {
            schedule_settle(app_clone.clone());
        }

        if let Some(win) = web_sys::window() {
            win.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
                .ok();
        }
    }) as Box<dyn FnMut()>));

    window.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

/// One-shot settle delay between a reconciled generation and the next tick
/// request. The timeout always fires; whether a tick actually goes out is
/// decided at fire time by the controller's state check.
fn schedule_settle(app: Rc<RefCell<LifeApp>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::wrap(Box::new(move || {
        app.borrow_mut().settle_elapsed();
    }) as Box<dyn FnMut()>);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            SETTLE_DELAY_MS,
        )
        .is_err()
    {
        log::error!("failed to schedule settle delay");
    }
    callback.forget();
}
