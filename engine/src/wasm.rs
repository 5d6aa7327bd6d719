//! WebAssembly bindings for the coin oracle
//!
//! The page owns the scene graph, the toss button and the result panel.
//! It calls `frame(elapsed)` from `requestAnimationFrame`, copies
//! `coinMatrices()` onto its three coin meshes and reads the trigger and
//! reading strings back after every call.

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::game::display::reading_body;
use crate::game::{LatestDisplay, OracleConfig, Simulation};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser-facing toss simulation.
#[wasm_bindgen]
pub struct CoinTossApp {
    sim: Simulation,
    display: LatestDisplay,
}

#[wasm_bindgen]
impl CoinTossApp {
    /// Default scene, seeded from the browser's entropy source.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CoinTossApp, JsValue> {
        Self::build(OracleConfig::default())
    }

    /// Reproducible scene. JS numbers above 2^53 lose precision.
    #[wasm_bindgen(js_name = "withSeed")]
    pub fn with_seed(seed: f64) -> Result<CoinTossApp, JsValue> {
        let config = OracleConfig {
            seed: Some(seed as u64),
            ..OracleConfig::default()
        };
        Self::build(config)
    }

    /// Scene from a JSON configuration string.
    #[wasm_bindgen(js_name = "fromConfigJson")]
    pub fn from_config_json(json: &str) -> Result<CoinTossApp, JsValue> {
        let config: OracleConfig = serde_json::from_str(json).map_err(to_js)?;
        Self::build(config)
    }

    fn build(config: OracleConfig) -> Result<CoinTossApp, JsValue> {
        let sim = Simulation::new(config).map_err(to_js)?;
        console::log_1(&format!("coin oracle ready ({} engine)", sim.engine_name()).into());
        Ok(Self {
            sim,
            display: LatestDisplay::new(),
        })
    }

    /// Returns false when a toss is already in progress.
    #[wasm_bindgen(js_name = "requestToss")]
    pub fn request_toss(&mut self) -> bool {
        self.sim.request_toss(&mut self.display)
    }

    /// Advance one animation frame. Returns true on the frame a reading appears.
    pub fn frame(&mut self, elapsed: f32) -> bool {
        match self.sim.frame(elapsed, &mut self.display) {
            Some(reading) => {
                if !reading.is_recognized() {
                    console::error_1(&format!("no hexagram for {}", reading.key).into());
                }
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> String {
        self.sim.phase().name().to_string()
    }

    #[wasm_bindgen(js_name = "triggerLabel")]
    pub fn trigger_label(&self) -> String {
        self.display.trigger.label.to_string()
    }

    #[wasm_bindgen(js_name = "triggerEnabled")]
    pub fn trigger_enabled(&self) -> bool {
        self.display.trigger.enabled
    }

    /// Headline of the reading on screen, empty while none is shown.
    #[wasm_bindgen(js_name = "readingText")]
    pub fn reading_text(&self) -> String {
        self.display
            .current
            .as_ref()
            .map(|r| r.title())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "readingMeaning")]
    pub fn reading_meaning(&self) -> String {
        self.display
            .current
            .as_ref()
            .map(|r| reading_body(r).to_string())
            .unwrap_or_default()
    }

    /// Three column-major 4x4 model matrices, 48 floats in coin order.
    #[wasm_bindgen(js_name = "coinMatrices")]
    pub fn coin_matrices(&self) -> Vec<f32> {
        self.sim
            .coin_instances()
            .iter()
            .flat_map(|instance| instance.model.iter().flatten().copied())
            .collect()
    }
}
