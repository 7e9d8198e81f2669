//! Web Audio playback.
//!
//! Each player is an `<audio>` element routed through its own gain node, so
//! volume moves are sample-accurate ramps on the audio thread while the
//! element handles buffering and looping. Players are created muted; the
//! engine ramps them up once they should be heard.

use std::cell::Cell;
use std::rc::Rc;

use undertone_core::{db_to_gain, AudioBackend, PlayerError, PlayerHandle, PlayerRole, PlayerSpec};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::{Settlement, SettlementSink};

pub struct WebAudioBackend {
    ctx: web::AudioContext,
    sink: SettlementSink,
}

impl WebAudioBackend {
    pub fn new(ctx: web::AudioContext, sink: SettlementSink) -> Self {
        Self { ctx, sink }
    }
}

impl AudioBackend for WebAudioBackend {
    type Handle = WebPlayer;

    fn create(&self, role: PlayerRole, url: &str, spec: PlayerSpec) -> Result<WebPlayer, PlayerError> {
        let element = web::HtmlAudioElement::new_with_src(url).map_err(|e| PlayerError::LoadFailed {
            url: url.to_string(),
            reason: format!("{e:?}"),
        })?;
        element.set_loop(spec.looping);
        element.set_preload("auto");
        element.set_cross_origin(Some("anonymous"));

        let source = self
            .ctx
            .create_media_element_source(&element)
            .map_err(|e| PlayerError::OutputUnavailable(format!("{e:?}")))?;
        let gain = web::GainNode::new(&self.ctx)
            .map_err(|e| PlayerError::OutputUnavailable(format!("{e:?}")))?;
        gain.gain().set_value(0.0);
        source
            .connect_with_audio_node(&gain)
            .map_err(|e| PlayerError::OutputUnavailable(format!("{e:?}")))?;
        gain.connect_with_audio_node(&self.ctx.destination())
            .map_err(|e| PlayerError::OutputUnavailable(format!("{e:?}")))?;

        match role {
            PlayerRole::Entity { key } => {
                // A one-shot that errors mid-play still has to report back,
                // or the sequencer would hold its lock forever. Stale keys
                // are dropped on arrival, so doubling up is harmless.
                let sink = self.sink.clone();
                let done = Closure::wrap(Box::new(move |_: web::Event| {
                    sink.dispatch(Settlement::Finished { key });
                }) as Box<dyn FnMut(_)>);
                _ = element.add_event_listener_with_callback("ended", done.as_ref().unchecked_ref());
                _ = element.add_event_listener_with_callback("error", done.as_ref().unchecked_ref());
                done.forget();
            }
            PlayerRole::Ambient { paragraph } => {
                let failed = Closure::wrap(Box::new(move |_: web::Event| {
                    log::warn!("[audio] ambient {paragraph} element error");
                }) as Box<dyn FnMut(_)>);
                _ = element.add_event_listener_with_callback("error", failed.as_ref().unchecked_ref());
                failed.forget();
            }
        }

        log::debug!("[audio] created {:?} for {}", role, url);
        Ok(WebPlayer {
            ctx: self.ctx.clone(),
            element,
            source,
            gain,
            level: Cell::new(1.0),
            generation: Rc::new(Cell::new(0)),
            fade_in: spec.fade_in_secs,
            fade_out: spec.fade_out_secs,
        })
    }
}

pub struct WebPlayer {
    ctx: web::AudioContext,
    element: web::HtmlAudioElement,
    source: web::MediaElementAudioSourceNode,
    gain: web::GainNode,
    /// Linear gain the player should sit at once ramps finish.
    level: Cell<f32>,
    /// Bumped on every start/stop so a deferred pause can tell whether the
    /// player was restarted underneath it.
    generation: Rc<Cell<u32>>,
    fade_in: f64,
    fade_out: f64,
}

impl PlayerHandle for WebPlayer {
    fn start(&self) {
        self.generation.set(self.generation.get() + 1);
        let now = self.ctx.current_time();
        let gain = self.gain.gain();
        _ = gain.cancel_scheduled_values(now);
        _ = gain.set_value_at_time(0.0, now);
        _ = gain.linear_ramp_to_value_at_time(self.level.get(), now + self.fade_in);
        self.element.set_current_time(0.0);
        _ = self.element.play();
    }

    fn stop(&self) {
        self.generation.set(self.generation.get() + 1);
        let stamp = self.generation.get();
        let now = self.ctx.current_time();
        let gain = self.gain.gain();
        _ = gain.cancel_scheduled_values(now);
        _ = gain.set_value_at_time(gain.value(), now);
        _ = gain.linear_ramp_to_value_at_time(0.0, now + self.fade_out);

        // Pause the element once the fade has run out, unless it was
        // restarted in the meantime.
        let generation = self.generation.clone();
        let element = self.element.clone();
        let pause = Closure::once_into_js(move || {
            if generation.get() == stamp {
                _ = element.pause();
            }
        });
        if let Some(window) = web::window() {
            _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                pause.unchecked_ref(),
                (self.fade_out * 1000.0) as i32,
            );
        }
    }

    fn set_volume(&self, db: f32, ramp_secs: f64) {
        let target = db_to_gain(db);
        self.level.set(target);
        let now = self.ctx.current_time();
        let gain = self.gain.gain();
        _ = gain.cancel_scheduled_values(now);
        _ = gain.set_value_at_time(gain.value(), now);
        _ = gain.linear_ramp_to_value_at_time(target, now + ramp_secs);
    }

    fn dispose(self) {
        let now = self.ctx.current_time();
        _ = self.gain.gain().cancel_scheduled_values(now);
        _ = self.element.pause();
        self.element.set_src("");
        _ = self.source.disconnect();
        _ = self.gain.disconnect();
    }
}
