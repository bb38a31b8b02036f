//! Browser glue
//!
//! Listeners and timers are owned by Rust values and torn down in `Drop`.
//! `WebCabinet` holds them only while a game is selected.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, KeyboardEvent};

use super::PUMP_INTERVAL_MS;
use crate::catalog::CATALOG;
use crate::config::GameConfig;
use crate::identity::ProfileForm;
use crate::session::Cabinet;
use crate::sim::KeyOutcome;

type Shared = Rc<RefCell<Cabinet>>;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger was already initialized");
    }
    log::info!("Arcade hub loaded");
}

/// `keydown` listener on the document, removed on drop
pub struct KeyboardSubscription {
    target: EventTarget,
    callback: Closure<dyn FnMut(KeyboardEvent)>,
}

impl KeyboardSubscription {
    pub fn new(cabinet: Shared) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let callback = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // a re-entrant event while the cabinet is busy is dropped
            let Ok(mut cabinet) = cabinet.try_borrow_mut() else {
                return;
            };
            if cabinet.key_down(&event.key()).prevent_default() {
                event.prevent_default();
            }
        });
        document.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())?;
        log::debug!("keyboard subscribed");

        Ok(Self {
            target: document.into(),
            callback,
        })
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref());
        log::debug!("keyboard unsubscribed");
    }
}

/// `setInterval` timer advancing the cabinet clock, cleared on drop
pub struct IntervalPump {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalPump {
    pub fn new(cabinet: Shared) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut cabinet) = cabinet.try_borrow_mut() {
                cabinet.advance_to(now_ms());
            }
        });
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            PUMP_INTERVAL_MS,
        )?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for IntervalPump {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// The hub as seen from JavaScript. Every state is handed back as JSON.
#[wasm_bindgen]
pub struct WebCabinet {
    cabinet: Shared,
    keyboard: Option<KeyboardSubscription>,
    pump: Option<IntervalPump>,
}

#[wasm_bindgen]
impl WebCabinet {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebCabinet, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(|err| {
                log::warn!("rejected config: {err}");
                js_error(err)
            })?,
            None => GameConfig::default(),
        };
        Ok(Self {
            cabinet: Rc::new(RefCell::new(Cabinet::new(config))),
            keyboard: None,
            pump: None,
        })
    }

    pub fn catalog_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&CATALOG).map_err(js_error)
    }

    /// Open a game by catalog id and hook up keyboard and clock
    pub fn select(&mut self, id: &str) -> Result<(), JsValue> {
        {
            let mut cabinet = self.cabinet.borrow_mut();
            cabinet.advance_to(now_ms());
            // an unknown id leaves the current game and its hooks in place
            cabinet.select_by_name(id).map_err(js_error)?;
        }
        self.detach();
        self.keyboard = Some(KeyboardSubscription::new(self.cabinet.clone())?);
        self.pump = Some(IntervalPump::new(self.cabinet.clone())?);
        Ok(())
    }

    pub fn start(&mut self) -> bool {
        let mut cabinet = self.cabinet.borrow_mut();
        cabinet.advance_to(now_ms());
        cabinet.active_mut().is_some_and(|session| session.start())
    }

    pub fn reset(&mut self) {
        if let Some(session) = self.cabinet.borrow_mut().active_mut() {
            session.reset();
        }
    }

    pub fn back(&mut self) {
        self.detach();
        self.cabinet.borrow_mut().back_to_catalog();
    }

    /// Feed a key from an on-screen control. Returns whether it was consumed.
    pub fn key(&mut self, key: &str) -> bool {
        let mut cabinet = self.cabinet.borrow_mut();
        cabinet.advance_to(now_ms());
        !matches!(cabinet.key_down(key), KeyOutcome::Ignored)
    }

    pub fn snapshot_json(&self) -> Result<Option<String>, JsValue> {
        self.cabinet
            .borrow()
            .snapshot()
            .map(|snapshot| serde_json::to_string(&snapshot).map_err(js_error))
            .transpose()
    }

    pub fn login(&mut self, username: String, email: String, password: String) -> Result<String, JsValue> {
        let mut form = ProfileForm::new(username, email, password);
        let mut cabinet = self.cabinet.borrow_mut();
        serde_json::to_string(cabinet.identity_mut().login(&mut form)).map_err(js_error)
    }

    pub fn register(&mut self, username: String, email: String, password: String) -> Result<String, JsValue> {
        let mut form = ProfileForm::new(username, email, password);
        let mut cabinet = self.cabinet.borrow_mut();
        serde_json::to_string(cabinet.identity_mut().register(&mut form)).map_err(js_error)
    }

    pub fn logout(&mut self) {
        self.cabinet.borrow_mut().identity_mut().logout();
    }

    pub fn identity_json(&self) -> Result<Option<String>, JsValue> {
        self.cabinet
            .borrow()
            .identity()
            .current()
            .map(|identity| serde_json::to_string(identity).map_err(js_error))
            .transpose()
    }
}

impl WebCabinet {
    fn detach(&mut self) {
        self.keyboard = None;
        self.pump = None;
    }
}
