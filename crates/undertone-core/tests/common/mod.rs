// Shared recording fakes for the engine test suite. Everything is Rc-backed
// so a test can keep a handle on what it passed into the engine.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use undertone_core::*;

/// Every call the engine makes on the audio seam, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Created {
        role: PlayerRole,
        url: String,
        spec: PlayerSpec,
    },
    Start(PlayerRole),
    Stop(PlayerRole),
    Volume {
        role: PlayerRole,
        db: f32,
        ramp_secs: f64,
    },
    Dispose(PlayerRole),
}

#[derive(Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl CallLog {
    pub fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn snapshot(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn starts(&self) -> Vec<PlayerRole> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Start(role) => Some(*role),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> Vec<PlayerRole> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Stop(role) => Some(*role),
                _ => None,
            })
            .collect()
    }

    pub fn disposals(&self) -> Vec<PlayerRole> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Dispose(role) => Some(*role),
                _ => None,
            })
            .collect()
    }

    /// `(db, ramp_secs)` of every volume ramp issued to `role`, in order.
    pub fn volumes_for(&self, role: PlayerRole) -> Vec<(f32, f64)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Volume {
                    role: r,
                    db,
                    ramp_secs,
                } if *r == role => Some((*db, *ramp_secs)),
                _ => None,
            })
            .collect()
    }
}

pub struct FakePlayer {
    role: PlayerRole,
    log: CallLog,
}

impl PlayerHandle for FakePlayer {
    fn start(&self) {
        self.log.push(Call::Start(self.role));
    }

    fn stop(&self) {
        self.log.push(Call::Stop(self.role));
    }

    fn set_volume(&self, db: f32, ramp_secs: f64) {
        self.log.push(Call::Volume {
            role: self.role,
            db,
            ramp_secs,
        });
    }

    fn dispose(self) {
        self.log.push(Call::Dispose(self.role));
    }
}

/// Backend whose `create` succeeds unless the url was scripted to break.
#[derive(Clone, Default)]
pub struct FakeAudio {
    pub log: CallLog,
    broken: Rc<RefCell<Vec<String>>>,
}

impl FakeAudio {
    pub fn break_url(&self, url: &str) {
        self.broken.borrow_mut().push(url.to_string());
    }
}

impl AudioBackend for FakeAudio {
    type Handle = FakePlayer;

    fn create(
        &self,
        role: PlayerRole,
        url: &str,
        spec: PlayerSpec,
    ) -> Result<FakePlayer, PlayerError> {
        if self.broken.borrow().iter().any(|u| u == url) {
            return Err(PlayerError::LoadFailed {
                url: url.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        self.log.push(Call::Created {
            role,
            url: url.to_string(),
            spec,
        });
        Ok(FakePlayer {
            role,
            log: self.log.clone(),
        })
    }
}

/// Records resolution requests; tests deliver outcomes explicitly, which is
/// exactly the "outcomes arrive after the tick" contract.
#[derive(Clone, Default)]
pub struct FakeResolver {
    pub ambient_requests: Rc<RefCell<Vec<(usize, AmbientTag)>>>,
    pub entity_requests: Rc<RefCell<Vec<(EntityKey, String)>>>,
}

impl FakeResolver {
    pub fn ambient_count(&self) -> usize {
        self.ambient_requests.borrow().len()
    }

    pub fn entity_count(&self) -> usize {
        self.entity_requests.borrow().len()
    }

    pub fn entity_keys(&self) -> Vec<EntityKey> {
        self.entity_requests.borrow().iter().map(|(k, _)| *k).collect()
    }
}

impl AssetResolver for FakeResolver {
    fn resolve_ambient(&self, paragraph: usize, tag: &AmbientTag) {
        self.ambient_requests.borrow_mut().push((paragraph, tag.clone()));
    }

    fn resolve_entity(&self, key: EntityKey, kind: &str) {
        self.entity_requests.borrow_mut().push((key, kind.to_string()));
    }
}

/// Scriptable geometry. The element type is the paragraph index itself, so
/// registration in tests is `register_element(i, i)`.
#[derive(Clone, Default)]
pub struct FakeGeometry {
    viewport: Rc<RefCell<Option<Rect>>>,
    rects: Rc<RefCell<HashMap<usize, Rect>>>,
}

impl FakeGeometry {
    pub fn with_viewport(height: f64) -> Self {
        let geometry = Self::default();
        geometry.set_viewport(Some(Rect::new(0.0, height)));
        geometry
    }

    pub fn set_viewport(&self, rect: Option<Rect>) {
        *self.viewport.borrow_mut() = rect;
    }

    pub fn place(&self, index: usize, top: f64, height: f64) {
        self.rects.borrow_mut().insert(index, Rect::new(top, height));
    }

    pub fn remove(&self, index: usize) {
        self.rects.borrow_mut().remove(&index);
    }
}

impl GeometryProvider for FakeGeometry {
    type Element = usize;

    fn viewport(&self) -> Option<Rect> {
        *self.viewport.borrow()
    }

    fn bounding_box(&self, element: &usize) -> Option<Rect> {
        self.rects.borrow().get(element).copied()
    }
}

pub fn paragraph(age: &str, sense: &str) -> Paragraph {
    Paragraph {
        text: "The engine room hummed far below the waterline.".to_string(),
        ambient_tag: AmbientTag::new(age, sense),
        entities: Vec::new(),
    }
}

pub fn entity(kind: &str, sample: &str, start_offset: usize) -> Entity {
    Entity {
        kind: kind.to_string(),
        sample: sample.to_string(),
        start_offset,
    }
}

pub fn paragraph_with_entities(age: &str, sense: &str, entities: Vec<Entity>) -> Paragraph {
    Paragraph {
        text: "Thunder rolled while the carriage rattled over the bridge.".to_string(),
        ambient_tag: AmbientTag::new(age, sense),
        entities,
    }
}

pub fn ambient(paragraph: usize) -> PlayerRole {
    PlayerRole::Ambient { paragraph }
}

pub fn one_shot(paragraph: usize, offset: usize) -> PlayerRole {
    PlayerRole::Entity {
        key: EntityKey::new(paragraph, offset),
    }
}

/// Full engine rig over the fakes, with every paragraph's element
/// pre-registered under its own index.
pub struct Rig {
    pub audio: FakeAudio,
    pub resolver: FakeResolver,
    pub geometry: FakeGeometry,
    pub engine: SoundscapeEngine<FakeAudio, FakeResolver, FakeGeometry>,
}

/// Viewport used by `rig`: reading line at y=200, audible radius 600.
pub const RIG_VIEWPORT_HEIGHT: f64 = 800.0;

pub fn rig(paragraphs: Vec<Paragraph>) -> Rig {
    let audio = FakeAudio::default();
    let resolver = FakeResolver::default();
    let geometry = FakeGeometry::with_viewport(RIG_VIEWPORT_HEIGHT);
    let count = paragraphs.len();
    let mut engine = SoundscapeEngine::new(
        audio.clone(),
        resolver.clone(),
        geometry.clone(),
        paragraphs,
        EngineTuning::default(),
    );
    for index in 0..count {
        engine.register_element(index, index);
    }
    Rig {
        audio,
        resolver,
        geometry,
        engine,
    }
}

impl Rig {
    /// Place a paragraph's box (100px tall) so its center sits `distance`
    /// pixels below the reading line. Negative distances sit above it.
    pub fn place_at_distance(&self, index: usize, distance: f64) {
        let reading_line = RIG_VIEWPORT_HEIGHT * 0.25;
        self.geometry.place(index, reading_line + distance - 50.0, 100.0);
    }
}
