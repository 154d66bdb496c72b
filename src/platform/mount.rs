//! Mounting a game onto a canvas
//!
//! A mount owns one game session plus every browser subscription it made.
//! Dropping the mount (via `unmount_game`) removes the listeners, disconnects
//! the resize observer and cancels the running loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

use super::canvas::CanvasSurface;
use super::listeners::{Listener, ResizeWatch};
use super::scheduler::WebScheduler;
use super::storage::LocalStore;
use crate::error::ArcadeError;
use crate::games::{Game, GameKind, scene_for};
use crate::input::{self, Intent};
use crate::lifecycle::Lifecycle;
use crate::renderer::Scene;
use crate::sim::GameRng;
use crate::tuning::Tuning;

thread_local! {
    static MOUNTS: RefCell<Vec<Mount>> = const { RefCell::new(Vec::new()) };
}

/// Text nodes tagged `data-field="<name>"` inside the game's root
struct Hud {
    root: Element,
    fields: Vec<(String, Element, String)>,
}

impl Hud {
    fn collect(root: Element) -> Self {
        let mut fields = Vec::new();
        if let Ok(nodes) = root.query_selector_all("[data-field]") {
            for i in 0..nodes.length() {
                let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                if let Some(name) = el.get_attribute("data-field") {
                    fields.push((name, el, String::new()));
                }
            }
        }
        Self { root, fields }
    }

    fn update(&mut self, game: &dyn Game) {
        let status = game.status().as_str();
        if self.root.get_attribute("data-status").as_deref() != Some(status) {
            let _ = self.root.set_attribute("data-status", status);
        }
        let stats = game.stats();
        for (name, el, shown) in &mut self.fields {
            let value = match name.as_str() {
                "score" => game.score().to_string(),
                "best" => game.best().to_string(),
                "status" => status.to_string(),
                other => match stats.iter().find(|(key, _)| *key == other) {
                    Some((_, value)) => value.clone(),
                    None => continue,
                },
            };
            if *shown != value {
                el.set_text_content(Some(&value));
                *shown = value;
            }
        }
    }
}

/// Everything one mounted game mutates from callbacks
struct Session {
    kind: GameKind,
    game: Box<dyn Game>,
    life: Lifecycle<WebScheduler>,
    surface: CanvasSurface,
    scene: Scene,
    hud: Hud,
}

impl Session {
    fn render(&mut self) {
        self.scene.clear();
        self.game.paint(&mut self.scene);
        if let Err(e) = self.surface.draw(&self.scene) {
            log::warn!("{}: draw failed: {e}", self.kind);
        }
        self.hud.update(self.game.as_ref());
    }

    fn dispatch(&mut self, intent: Intent) {
        self.life.dispatch(self.game.as_mut(), intent);
        self.render();
    }

    fn tick(&mut self, now_ms: f64) {
        self.life.tick(self.game.as_mut(), now_ms);
        self.render();
    }

    fn suspend(&mut self, reason: &str) {
        if self.game.status().is_playing() {
            log::info!("{}: auto-paused ({reason})", self.kind);
        }
        self.life.suspend(self.game.as_mut());
        self.render();
    }

    fn resize(&mut self, device_ratio: f64) {
        self.surface.resize(device_ratio);
        self.render();
    }

    fn pointer_x(&self, client_x: f64) -> f32 {
        let (width, _) = self.kind.world_size();
        self.surface.world_x(client_x, width)
    }
}

type Shared = Rc<RefCell<Session>>;

/// A live game plus its subscriptions. Field order is drop order:
/// listeners go first, the session (and its scheduler) last.
struct Mount {
    canvas_id: String,
    _listeners: Vec<Listener>,
    _resize: Option<ResizeWatch>,
    session: Shared,
}

impl Drop for Mount {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.life.teardown();
        }
        log::info!("Unmounted {}", self.canvas_id);
    }
}

/// Console logger and panic hook; safe to call more than once
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialised");
    }
}

fn window() -> Result<Window, ArcadeError> {
    web_sys::window().ok_or(ArcadeError::MissingElement("window"))
}

fn document(window: &Window) -> Result<Document, ArcadeError> {
    window.document().ok_or(ArcadeError::MissingElement("document"))
}

fn with_session(weak: &Weak<RefCell<Session>>, f: impl FnOnce(&mut Session)) {
    let Some(session) = weak.upgrade() else {
        return;
    };
    // A re-entrant callback (e.g. blur fired from inside a handler) is skipped
    if let Ok(mut guard) = session.try_borrow_mut() {
        f(&mut guard);
    }
}

fn build_session(
    window: &Window,
    kind: GameKind,
    canvas: HtmlCanvasElement,
    root: Element,
) -> Result<Shared, ArcadeError> {
    let tuning = Tuning::load();
    let mut surface = CanvasSurface::new(canvas, tuning.engine.max_pixel_ratio)?;
    surface.resize(window.device_pixel_ratio());

    let seed = js_sys::Date::now() as u64;
    let game = kind.create(&tuning, Box::new(GameRng::new(seed)), Box::new(LocalStore));
    let scene = scene_for(game.as_ref());
    log::info!("{kind}: mounted (seed {seed}, best {})", game.best());

    let session = Rc::new_cyclic(|weak: &Weak<RefCell<Session>>| {
        let weak = weak.clone();
        let on_tick: Rc<dyn Fn(f64)> = Rc::new(move |now: f64| with_session(&weak, |s| s.tick(now)));
        RefCell::new(Session {
            kind,
            game,
            life: Lifecycle::new(
                WebScheduler::new(window.clone(), on_tick),
                tuning.engine.max_frame_dt,
            ),
            surface,
            scene,
            hud: Hud::collect(root),
        })
    });
    session.borrow_mut().render();
    Ok(session)
}

fn subscribe(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    root: &Element,
    session: &Shared,
) -> Result<Vec<Listener>, ArcadeError> {
    let kind = session.borrow().kind;
    let mut listeners = Vec::new();

    let weak = Rc::downgrade(session);
    listeners.push(Listener::new(window, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if let Some(intent) = input::key_down(kind, &event.key()) {
            event.prevent_default();
            with_session(&weak, |s| s.dispatch(intent));
        }
    })?);

    let weak = Rc::downgrade(session);
    listeners.push(Listener::new(window, "keyup", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if let Some(intent) = input::key_up(kind, &event.key()) {
            with_session(&weak, |s| s.dispatch(intent));
        }
    })?);

    let weak = Rc::downgrade(session);
    listeners.push(Listener::new(canvas, "pointerdown", move |event| {
        let Some(event) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        event.prevent_default();
        let client_x = event.client_x() as f64;
        with_session(&weak, |s| {
            let x = s.pointer_x(client_x);
            s.dispatch(Intent::PointerDown { x });
        });
    })?);

    let weak = Rc::downgrade(session);
    listeners.push(Listener::new(canvas, "pointermove", move |event| {
        let Some(event) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        let client_x = event.client_x() as f64;
        with_session(&weak, |s| {
            let x = s.pointer_x(client_x);
            s.dispatch(Intent::PointerMove { x });
        });
    })?);

    for name in ["resize", "orientationchange"] {
        let weak = Rc::downgrade(session);
        let win = window.clone();
        listeners.push(Listener::new(window, name, move |_| {
            with_session(&weak, |s| s.resize(win.device_pixel_ratio()));
        })?);
    }

    let weak = Rc::downgrade(session);
    let doc = document.clone();
    listeners.push(Listener::new(document, "visibilitychange", move |_| {
        if doc.hidden() {
            with_session(&weak, |s| s.suspend("tab hidden"));
        }
    })?);

    let weak = Rc::downgrade(session);
    listeners.push(Listener::new(window, "blur", move |_| {
        with_session(&weak, |s| s.suspend("window blur"));
    })?);

    // Touch controls: same dispatch path as the keyboard
    let buttons = root.query_selector_all("[data-intent]")?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(intent) = button
            .get_attribute("data-intent")
            .and_then(|name| Intent::from_name(&name))
        else {
            log::warn!("{kind}: ignoring unknown data-intent");
            continue;
        };
        let weak = Rc::downgrade(session);
        listeners.push(Listener::new(&button, "pointerdown", move |event| {
            event.prevent_default();
            with_session(&weak, |s| s.dispatch(intent));
        })?);
    }

    Ok(listeners)
}

/// Mount the game named by the canvas's `data-game` attribute
#[wasm_bindgen]
pub fn mount_game(canvas_id: &str) -> Result<(), JsValue> {
    init_logging();
    mount(canvas_id).map_err(|e| {
        log::error!("Mount of {canvas_id} failed: {e}");
        JsValue::from(e)
    })
}

fn mount(canvas_id: &str) -> Result<(), ArcadeError> {
    unmount(canvas_id);

    let window = window()?;
    let document = document(&window)?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or(ArcadeError::MissingElement("canvas"))?
        .dyn_into()
        .map_err(|_| ArcadeError::MissingElement("canvas"))?;
    let kind: GameKind = canvas
        .get_attribute("data-game")
        .ok_or(ArcadeError::MissingElement("data-game attribute"))?
        .parse()?;
    let root = canvas
        .closest("[data-arcade]")?
        .or_else(|| canvas.parent_element())
        .ok_or(ArcadeError::MissingElement("game root"))?;

    let session = build_session(&window, kind, canvas.clone(), root.clone())?;
    let listeners = subscribe(&window, &document, &canvas, &root, &session)?;

    let weak = Rc::downgrade(&session);
    let win = window.clone();
    let resize = match ResizeWatch::new(&root, move || {
        with_session(&weak, |s| s.resize(win.device_pixel_ratio()));
    }) {
        Ok(watch) => Some(watch),
        Err(e) => {
            log::warn!("{kind}: no ResizeObserver, relying on window resize ({e})");
            None
        }
    };

    MOUNTS.with(|mounts| {
        mounts.borrow_mut().push(Mount {
            canvas_id: canvas_id.to_string(),
            _listeners: listeners,
            _resize: resize,
            session,
        })
    });
    Ok(())
}

/// Tear down the game on `canvas_id`; a no-op if nothing is mounted there
#[wasm_bindgen]
pub fn unmount_game(canvas_id: &str) {
    unmount(canvas_id);
}

fn unmount(canvas_id: &str) {
    let removed: Vec<Mount> = MOUNTS.with(|mounts| {
        let mut mounts = mounts.borrow_mut();
        let (gone, kept): (Vec<Mount>, Vec<Mount>) =
            mounts.drain(..).partition(|m| m.canvas_id == canvas_id);
        *mounts = kept;
        gone
    });
    drop(removed);
}

/// Mount every `canvas[data-game]` that has an id
pub fn mount_all() -> Result<usize, ArcadeError> {
    let window = window()?;
    let document = document(&window)?;
    let canvases = document.query_selector_all("canvas[data-game]")?;
    let mut mounted = 0;
    for i in 0..canvases.length() {
        let Some(el) = canvases.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let id = el.id();
        if id.is_empty() {
            log::warn!("Skipping canvas[data-game] without an id");
            continue;
        }
        match mount(&id) {
            Ok(()) => mounted += 1,
            Err(e) => log::error!("Mount of {id} failed: {e}"),
        }
    }
    Ok(mounted)
}
