//! Browser bindings
//!
//! Exposes a `Session` to JavaScript. Every call returns the new state as a
//! JSON snapshot; rejected actions throw with the error message.

use wasm_bindgen::prelude::*;

use crate::bet::BetAdjust;
use crate::session::Session;

fn to_js(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct LadderGame {
    session: Session,
}

#[wasm_bindgen]
impl LadderGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LadderGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Ladder initialized with seed: {}", seed);
        LadderGame {
            session: Session::with_seed(seed),
        }
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.session.snapshot_json().map_err(to_js)
    }

    /// JSON array of board rows, top level first
    pub fn board(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.board()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Rewards per level in coins
    pub fn rewards(&self) -> Vec<f64> {
        self.session
            .reward_table()
            .into_iter()
            .map(|r| r.to_coins())
            .collect()
    }

    pub fn button_label(&self) -> String {
        self.session.control().label().to_string()
    }

    pub fn increase_bet(&mut self) -> Result<String, JsValue> {
        self.session.adjust_bet(BetAdjust::Increase);
        self.snapshot()
    }

    pub fn decrease_bet(&mut self) -> Result<String, JsValue> {
        self.session.adjust_bet(BetAdjust::Decrease);
        self.snapshot()
    }

    pub fn min_bet(&mut self) -> Result<String, JsValue> {
        self.session.adjust_bet(BetAdjust::Min);
        self.snapshot()
    }

    pub fn max_bet(&mut self) -> Result<String, JsValue> {
        self.session.adjust_bet(BetAdjust::Max);
        self.snapshot()
    }

    /// Bet box lost focus
    pub fn set_bet(&mut self, raw: &str) -> Result<String, JsValue> {
        self.session.set_bet_from_input(raw);
        self.snapshot()
    }

    /// "left" or "right"
    pub fn choose(&mut self, side: &str) -> Result<String, JsValue> {
        self.session.choose_side_named(side).map_err(to_js)?;
        self.snapshot()
    }

    pub fn main_button(&mut self) -> Result<String, JsValue> {
        self.session.primary_action().map_err(to_js)?;
        self.snapshot()
    }
}

impl Default for LadderGame {
    fn default() -> Self {
        Self::new()
    }
}
