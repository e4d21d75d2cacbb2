//! JavaScript-facing game handle
//!
//! The page owns one `WebGame`, forwards clicks and animation frames to it,
//! and renders from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{self, GameState, Surface, TickInput};

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// Start on a random catalog level sized to the play area element
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsValue> {
        let seed = super::time_seed();
        let state = GameState::from_catalog(seed, Surface::new(width, height), Settings::load())
            .map_err(js_err)?;
        log::info!("Started '{}' with seed {}", state.word(), seed);
        Ok(Self {
            state,
            input: TickInput::default(),
        })
    }

    /// Queue a token click for the next frame
    pub fn select(&mut self, token_id: usize) {
        self.input.select = Some(token_id);
    }

    pub fn reset(&mut self) {
        self.input.reset = true;
    }

    pub fn next_level(&mut self) {
        self.input.next_level = true;
    }

    /// Container was resized; takes effect on the next level
    pub fn resize(&mut self, width: f32, height: f32) {
        sim::resize(&mut self.state, Surface::new(width, height));
    }

    /// Advance by `dt` seconds, consuming queued input
    pub fn frame(&mut self, dt: f32) {
        let input = std::mem::take(&mut self.input);
        sim::tick(&mut self.state, &input, dt.min(0.1));
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(js_err)
    }

    /// Events since the last call, as a JSON array
    pub fn events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events()).map_err(js_err)
    }
}
