use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use stagehand_animation_core::{
    decode_asset, AudioError, AudioSink, BoneMap, ClipPlayer, Config, LoadError, LoadRequest,
    ModelStatus, NullAudio, Stage,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

thread_local! {
    /// One handler for the module's lifetime; pending promises may outlive any sink.
    static ON_AUDIO_REJECTED: Closure<dyn FnMut(JsValue)> = Closure::new(|err: JsValue| {
        log::warn!("stagehand: audio playback rejected: {err:?}");
    });
}

/// Audio sink backed by a JS callback (typically `() => audio.play()`).
/// Synchronous throws become errors; rejected promises are logged and dropped.
struct JsAudio {
    restart: Function,
}

impl AudioSink for JsAudio {
    fn restart(&mut self) -> Result<(), AudioError> {
        let ret = self
            .restart
            .call0(&JsValue::UNDEFINED)
            .map_err(|e| AudioError::Unavailable(format!("{e:?}")))?;
        if let Some(promise) = ret.dyn_ref::<Promise>() {
            ON_AUDIO_REJECTED.with(|on_rejected| {
                let _ = promise.catch(on_rejected);
            });
        }
        Ok(())
    }
}

#[wasm_bindgen]
pub struct StagehandStage {
    stage: Stage,
    on_model_loaded: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl StagehandStage {
    /// Create a stage. Both arguments are optional:
    ///   new StagehandStage({ fade_duration: 0.5 }, { hips_JNT: "J_Bip_C_Hips" })
    /// An omitted bone map means the standard table.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, bone_map: JsValue) -> Result<StagehandStage, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let bones: BoneMap = if jsvalue_is_undefined_or_null(&bone_map) {
            BoneMap::standard()
        } else {
            swb::from_value(bone_map)
                .map_err(|e| JsError::new(&format!("bone map error: {e}")))?
        };

        let on_model_loaded: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));
        let mut stage = Stage::new(cfg, bones, Box::new(NullAudio));
        let callback = on_model_loaded.clone();
        stage.set_model_loaded_listener(move |status: &ModelStatus| {
            if let Some(f) = callback.borrow().as_ref() {
                let message = status
                    .message
                    .as_deref()
                    .map(JsValue::from_str)
                    .unwrap_or(JsValue::UNDEFINED);
                let success = JsValue::from_bool(status.success);
                if let Err(e) = f.call2(&JsValue::UNDEFINED, &success, &message) {
                    log::warn!("stagehand: onModelLoaded threw: {e:?}");
                }
            }
        });

        Ok(StagehandStage {
            stage,
            on_model_loaded,
        })
    }

    /// Register `callback(success: boolean, message?: string)`.
    #[wasm_bindgen(js_name = set_on_model_loaded)]
    pub fn set_on_model_loaded(&mut self, callback: Function) {
        *self.on_model_loaded.borrow_mut() = Some(callback);
    }

    /// Register the soundtrack restart callback. It may return a promise.
    #[wasm_bindgen(js_name = set_audio)]
    pub fn set_audio(&mut self, restart: Function) {
        self.stage
            .playback_mut()
            .set_audio(Box::new(JsAudio { restart }));
    }

    /// Relative asset paths the host should fetch: `{ character, motion, audio, video }`.
    #[wasm_bindgen(js_name = asset_paths)]
    pub fn asset_paths(&self) -> Result<JsValue, JsError> {
        to_js(&self.stage.config().assets, "asset paths")
    }

    /// Returns false when a load is already in flight; the host must not fetch again.
    #[wasm_bindgen(js_name = begin_load)]
    pub fn begin_load(&mut self) -> bool {
        self.stage.begin_load() == LoadRequest::Started
    }

    /// Hand over the fetched character and motion bytes. Decode failures are
    /// reported through the model-loaded callback like any other load error.
    #[wasm_bindgen(js_name = complete_load)]
    pub fn complete_load(&mut self, character: &[u8], motion: &[u8]) -> Result<JsValue, JsError> {
        let paths = self.stage.config().assets.clone();
        let decoded = decode_asset(&paths.character, character)
            .and_then(|c| decode_asset(&paths.motion, motion).map(|m| (c, m)));
        let status = match decoded {
            Ok((character, motion)) => self.stage.complete_load(character, motion),
            Err(e) => self.stage.fail_load(e),
        };
        to_js(&status, "model status")
    }

    /// Report a failed fetch. `not_found` selects the friendlier missing-file message.
    #[wasm_bindgen(js_name = fail_load)]
    pub fn fail_load(
        &mut self,
        path: String,
        message: String,
        not_found: bool,
    ) -> Result<JsValue, JsError> {
        let err = if not_found {
            LoadError::NotFound { path: path.into() }
        } else {
            LoadError::Host(format!("{path}: {message}"))
        };
        let status = self.stage.fail_load(err);
        to_js(&status, "model status")
    }

    #[wasm_bindgen(js_name = load_state)]
    pub fn load_state(&self) -> Result<JsValue, JsError> {
        to_js(self.stage.load_state(), "load state")
    }

    /// Crossfade to motion clip `index`. Returns the playback status object.
    #[wasm_bindgen(js_name = play_clip)]
    pub fn play_clip(&mut self, index: u32) -> Result<JsValue, JsError> {
        let status = self.stage.play_clip(index as usize);
        to_js(&status, "playback status")
    }

    #[wasm_bindgen(js_name = play_action)]
    pub fn play_action(&mut self, name: String) -> Result<JsValue, JsError> {
        let status = self.stage.play_action(&name);
        to_js(&status, "playback status")
    }

    #[wasm_bindgen(js_name = stop_all)]
    pub fn stop_all(&mut self) {
        self.stage.stop_all();
    }

    /// Restart only the soundtrack (e.g. after the reference video closes).
    #[wasm_bindgen(js_name = restart_audio)]
    pub fn restart_audio(&mut self) -> Result<JsValue, JsError> {
        let status = self.stage.restart_audio();
        to_js(&status, "audio status")
    }

    /// Advance by `dt` seconds. Returns the pose, or null before a model is loaded.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        match self.stage.update(dt) {
            Some(pose) => to_js(pose, "pose"),
            None => Ok(JsValue::NULL),
        }
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
