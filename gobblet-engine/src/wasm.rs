//! WASM bindings for gobblet-engine
//!
//! Lets a browser front end drive the engine with the same intents as the
//! Rust API. Snapshots cross the boundary as plain JS objects; rejected
//! intents reject with the error's message.

use wasm_bindgen::prelude::*;

use crate::{CellCoord, EngineConfig, EngineError, EngineState, GameEngine, Size, Source};

/// WASM-friendly wrapper around GameEngine
#[wasm_bindgen]
pub struct WasmEngine {
    inner: GameEngine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Create an engine. `first` is "A" or "B"; anything else means A.
    #[wasm_bindgen(constructor)]
    pub fn new(first: Option<String>) -> WasmEngine {
        let starting_color = first.and_then(|s| s.parse().ok()).unwrap_or(crate::Color::A);
        let config = EngineConfig::default().with_starting_color(starting_color);
        WasmEngine {
            inner: GameEngine::new(config),
        }
    }

    /// Pick up a piece of the current player from reserve (size 1=S, 2=M, 3=L)
    #[wasm_bindgen(js_name = pickUpReserve)]
    pub fn pick_up_reserve(&mut self, size: u8) -> Result<JsValue, JsValue> {
        let size = match size.checked_sub(1).and_then(|idx| Size::from_index(idx as usize)) {
            Some(size) => size,
            None => return Err(JsValue::from_str(&EngineError::InvalidSource.to_string())),
        };
        let color = self.inner.current_player();
        to_js(self.inner.pick_up(Source::Reserve { color, size }))
    }

    /// Pick up the top piece of a cell
    #[wasm_bindgen(js_name = pickUpCell)]
    pub fn pick_up_cell(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        to_js(self.inner.pick_up(Source::Cell(CellCoord::new(row, col))))
    }

    /// Drop the piece in hand
    pub fn drop(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        to_js(self.inner.drop(CellCoord::new(row, col)))
    }

    /// Return the piece in hand to where it came from
    pub fn cancel(&mut self) -> Result<JsValue, JsValue> {
        to_js(self.inner.cancel())
    }

    /// Restart the game
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        to_js(Ok(self.inner.reset()))
    }

    /// Current state for rendering
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(Ok(self.inner.snapshot()))
    }

    /// Cells where the piece in hand may be dropped, as [[row, col], ...]
    #[wasm_bindgen(js_name = legalDestinations)]
    pub fn legal_destinations(&self) -> Result<JsValue, JsValue> {
        let cells: Vec<[u8; 2]> = self
            .inner
            .legal_destinations()
            .into_iter()
            .map(|c| [c.row, c.col])
            .collect();
        serde_wasm_bindgen::to_value(&cells).map_err(JsValue::from)
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

fn to_js(result: Result<EngineState, EngineError>) -> Result<JsValue, JsValue> {
    let state = result.map_err(|err| JsValue::from_str(&err.to_string()))?;
    serde_wasm_bindgen::to_value(&state).map_err(JsValue::from)
}
