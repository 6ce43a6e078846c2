// DOM control wiring - inputs and toggle buttons
//
// The UI here is written purely as a projection of the controller's state;
// button attributes are never read back as state.
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

use crate::sim::{RunConfig, SimulationState};

const DEFAULT_LAYERS: u32 = 10;
const DEFAULT_FILL_PERCENT: f64 = 42.0;

pub struct Ui {
    document: Document,
}

impl Ui {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn get_el(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn input_value(&self, id: &str) -> Option<String> {
        self.get_el(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn set_input_value(&self, id: &str, value: &str) {
        if let Some(input) = self
            .get_el(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    fn set_input_disabled(&self, id: &str, disabled: bool) {
        if let Some(input) = self
            .get_el(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_disabled(disabled);
        }
    }

    /// Capture the run parameters from the two numeric inputs.
    ///
    /// A missing or non-numeric field is a boundary validation failure:
    /// logged, and the default substituted.
    pub fn read_run_config(&self) -> RunConfig {
        let layers = match self.input_value("layers").map(|v| v.parse::<u32>()) {
            Some(Ok(layers)) if layers > 0 => layers,
            Some(Ok(_)) | Some(Err(_)) => {
                log::warn!("invalid layers input; using default {DEFAULT_LAYERS}");
                DEFAULT_LAYERS
            }
            None => DEFAULT_LAYERS,
        };
        let fill_percent = match self.input_value("fill-percent").map(|v| v.parse::<f64>()) {
            Some(Ok(percent)) => percent,
            Some(Err(_)) => {
                log::warn!("invalid fill-percent input; using default {DEFAULT_FILL_PERCENT}");
                DEFAULT_FILL_PERCENT
            }
            None => DEFAULT_FILL_PERCENT,
        };
        RunConfig {
            layers,
            fill_percent,
        }
    }

    /// Restore the default input values (the reset control).
    pub fn reset_controls(&self) {
        self.set_input_value("layers", &DEFAULT_LAYERS.to_string());
        self.set_input_value("fill-percent", &DEFAULT_FILL_PERCENT.to_string());
    }

    /// Drive the start/pause controls and the numeric inputs from the
    /// current state.
    pub fn project_state(&self, state: SimulationState) {
        match state {
            SimulationState::Stopped => {
                self.set_button("start", "Start", "red", "green", false);
                self.set_button("pause", "Pause", "", "", true);
                self.set_input_disabled("layers", false);
                self.set_input_disabled("fill-percent", false);
            }
            SimulationState::Playing => {
                self.set_button("start", "Stop", "green", "red", false);
                self.set_button("pause", "Pause", "", "", false);
                self.set_input_disabled("layers", true);
                self.set_input_disabled("fill-percent", true);
            }
            SimulationState::Paused => {
                self.set_button("pause", "Resume", "", "", false);
            }
        }
    }

    fn set_button(&self, id: &str, label: &str, remove_class: &str, add_class: &str, disabled: bool) {
        let Some(el) = self.get_el(id) else {
            return;
        };
        el.set_text_content(Some(label));
        if !remove_class.is_empty() {
            el.class_list()
                .remove(&js_sys::Array::of1(&JsValue::from(remove_class)))
                .ok();
        }
        if !add_class.is_empty() {
            el.class_list()
                .add(&js_sys::Array::of1(&JsValue::from(add_class)))
                .ok();
        }
        if let Ok(button) = el.dyn_into::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        }
    }
}
