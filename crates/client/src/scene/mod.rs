// Scene adapter boundary - the only surface the core uses to touch rendering
use thiserror::Error;
use wasm_bindgen::prelude::*;

use protocol::Coord;

/// Errors surfaced by a scene adapter.
///
/// A failed visual creation is fatal to that cell only; reconciliation
/// logs it and keeps going.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to create visual at {coord}: {reason}")]
    CreateFailed { coord: Coord, reason: String },
}

/// What the simulation core needs from the rendering side.
///
/// The renderer itself (scene graph, geometry, camera controls) lives
/// outside this crate; the core never manipulates rendering primitives
/// directly.
pub trait SceneAdapter {
    /// Opaque handle to one rendered cell.
    type Handle;

    fn create_visual(&mut self, at: Coord) -> Result<Self::Handle, SceneError>;
    fn add_to_scene(&mut self, handle: &Self::Handle);
    fn remove_from_scene(&mut self, handle: &Self::Handle);
    fn clear_scene(&mut self);
    fn position_camera(&mut self, distance: f32);
    fn render_frame(&mut self);
}

#[wasm_bindgen]
unsafe extern "C" {
    /// The JS rendering bridge object handed to the client at construction.
    pub type SceneBridge;

    #[wasm_bindgen(method, catch, js_name = createVisual)]
    fn bridge_create_visual(this: &SceneBridge, x: i32, y: i32, z: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = addToScene)]
    fn bridge_add_to_scene(this: &SceneBridge, handle: &JsValue);

    #[wasm_bindgen(method, js_name = removeFromScene)]
    fn bridge_remove_from_scene(this: &SceneBridge, handle: &JsValue);

    #[wasm_bindgen(method, js_name = clearScene)]
    fn bridge_clear_scene(this: &SceneBridge);

    #[wasm_bindgen(method, js_name = positionCamera)]
    fn bridge_position_camera(this: &SceneBridge, distance: f32);

    #[wasm_bindgen(method, js_name = renderFrame)]
    fn bridge_render_frame(this: &SceneBridge);
}

/// [`SceneAdapter`] backed by the JS rendering bridge.
pub struct JsScene {
    bridge: SceneBridge,
}

impl JsScene {
    pub fn new(bridge: SceneBridge) -> Self {
        Self { bridge }
    }
}

impl SceneAdapter for JsScene {
    type Handle = JsValue;

    fn create_visual(&mut self, at: Coord) -> Result<JsValue, SceneError> {
        self.bridge
            .bridge_create_visual(at.x(), at.y(), at.z())
            .map_err(|e| SceneError::CreateFailed {
                coord: at,
                reason: format!("{e:?}"),
            })
    }

    fn add_to_scene(&mut self, handle: &JsValue) {
        self.bridge.bridge_add_to_scene(handle);
    }

    fn remove_from_scene(&mut self, handle: &JsValue) {
        self.bridge.bridge_remove_from_scene(handle);
    }

    fn clear_scene(&mut self) {
        self.bridge.bridge_clear_scene();
    }

    fn position_camera(&mut self, distance: f32) {
        self.bridge.bridge_position_camera(distance);
    }

    fn render_frame(&mut self) {
        self.bridge.bridge_render_frame();
    }
}
