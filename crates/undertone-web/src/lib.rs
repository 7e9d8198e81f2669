#![cfg(target_arch = "wasm32")]
//! Browser driver: wires the soundscape engine to a scroll container, the
//! Web Audio API and the static sound catalog.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use undertone_core::{EngineTuning, EntityKey, SoundscapeEngine};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod catalog;
mod content;
mod dom;
mod geometry;
mod resolver;

use audio::WebAudioBackend;
use geometry::DomGeometry;
use resolver::CatalogResolver;

type WebEngine = SoundscapeEngine<WebAudioBackend, CatalogResolver, DomGeometry>;

/// A resolver or playback outcome on its way back to the engine. Everything
/// here arrives from a microtask or a DOM event, never during a tick.
pub(crate) enum Settlement {
    Ambient { index: usize, url: Option<String> },
    Entity { key: EntityKey, url: Option<String> },
    Finished { key: EntityKey },
}

/// Late-bound route from the async world into the engine. Connected once the
/// engine exists; dispatches before that are dropped.
#[derive(Clone, Default)]
pub(crate) struct SettlementSink {
    target: Rc<RefCell<Option<Box<dyn Fn(Settlement)>>>>,
}

impl SettlementSink {
    pub fn connect(&self, target: impl Fn(Settlement) + 'static) {
        *self.target.borrow_mut() = Some(Box::new(target));
    }

    pub fn dispatch(&self, settlement: Settlement) {
        if let Some(target) = self.target.borrow().as_ref() {
            target(settlement);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("undertone-web loaded");
}

/// Scroll-synchronized soundscape for one reading view.
#[wasm_bindgen]
pub struct Soundscape {
    engine: Rc<RefCell<WebEngine>>,
    muted: Rc<Cell<bool>>,
    audio_ctx: web::AudioContext,
}

#[wasm_bindgen]
impl Soundscape {
    /// Fetch the book behind `content_url` and attach the engine to
    /// `container`, the scrollable reading surface. Playback stays muted
    /// until `set_muted(false)`.
    pub async fn attach(content_url: String, container: web::Element) -> Result<Soundscape, JsValue> {
        let book = content::fetch_book(&content_url)
            .await
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        log::info!(
            "[driver] attached '{}' with {} paragraphs",
            book.title.as_deref().unwrap_or("untitled"),
            book.paragraphs.len()
        );

        let audio_ctx =
            web::AudioContext::new().map_err(|e| JsValue::from_str(&format!("{e:?}")))?;
        let sink = SettlementSink::default();
        let backend = WebAudioBackend::new(audio_ctx.clone(), sink.clone());
        let resolver = CatalogResolver::new(sink.clone());
        let geometry = DomGeometry::new(container.clone());

        let engine = Rc::new(RefCell::new(SoundscapeEngine::new(
            backend,
            resolver,
            geometry,
            book.paragraphs,
            EngineTuning::default(),
        )));

        // Weak here, or the engine would hold its own keep-alive through the
        // backend's sink.
        let weak = Rc::downgrade(&engine);
        sink.connect(move |settlement| {
            let Some(engine) = weak.upgrade() else { return };
            let mut engine = engine.borrow_mut();
            match settlement {
                Settlement::Ambient { index, url } => engine.ambient_settled(index, url),
                Settlement::Entity { key, url } => engine.entity_settled(key, url),
                Settlement::Finished { key } => engine.one_shot_finished(key),
            }
        });

        let muted = Rc::new(Cell::new(true));
        {
            let engine = engine.clone();
            let muted = muted.clone();
            dom::add_scroll_listener(&container, move || {
                engine.borrow_mut().evaluate(muted.get());
            });
        }

        Ok(Soundscape { engine, muted, audio_ctx })
    }

    /// Ref-callback style registration: passing no element forgets the index.
    pub fn register_paragraph(&self, index: usize, element: Option<web::Element>) {
        let mut engine = self.engine.borrow_mut();
        match element {
            Some(element) => engine.register_element(index, element),
            None => engine.unregister_element(index),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
        if !muted {
            // A fresh AudioContext stays suspended until resumed from a
            // user gesture; unmuting is that gesture.
            _ = self.audio_ctx.resume();
        }
        self.engine.borrow_mut().evaluate(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    /// Run one evaluation tick outside a scroll event, e.g. right after
    /// layout settles: browsers emit no scroll notification at load time.
    pub fn refresh(&self) {
        self.engine.borrow_mut().evaluate(self.muted.get());
    }

    pub fn paragraph_count(&self) -> usize {
        self.engine.borrow().paragraphs().len()
    }

    /// Full content as JSON for the page renderer (text, tags, entities).
    pub fn paragraphs_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.borrow().paragraphs())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Dispose every player and stop reacting to scroll.
    pub fn detach(&self) {
        self.engine.borrow_mut().detach();
        _ = self.audio_ctx.close();
    }
}
