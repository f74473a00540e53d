//! Browser shell: DOM construction, timers, canvas rendering, audio and
//! high-score storage.
//!
//! Owns the two scheduled callbacks that drive a round — the spawn interval
//! and the animation-frame loop — and keeps their handles so both can be
//! cancelled deterministically when the round ends. All game logic lives in
//! [`crate::game`]; this module only wires it to `web-sys`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlInputElement, Window,
    window,
};

use crate::game::{AudioPlayer, Cue, Game, GameConfig, InputOutcome, Randomness, ScoreStore};
use crate::presenter;

// Audio assets served next to the page.
const POP_SOUND: &str = "/typefast/assets/mixkit-bubble-pop-up-alert-notification-2357.wav";
const GAME_OVER_SOUND: &str = "/typefast/assets/mixkit-sad-game-over-trombone-471.wav";
const MUSIC_TRACK: &str = "/typefast/assets/mixkit-game-level-music-689.wav";

const HIGH_SCORE_KEY: &str = "typefast.highScore";

const OVERLAY_STYLE: &str = "position:fixed; left:50%; top:45%; transform:translate(-50%,-50%); text-align:center; font-family:'Fira Code', monospace; color:#fff; background:rgba(0,0,0,0.72); padding:28px 48px; border:1px solid #333; border-radius:12px; z-index:50;";
const HUD_STYLE: &str = "position:fixed; top:10px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;";

// --- Injected capabilities (audio, persistence) -------------------------------

/// Audio backed by `HtmlAudioElement`. One retained element loops the
/// background track; one-shot cues get a fresh element per play. Everything
/// is fire-and-forget: a missing or failing element never disturbs the game.
struct DomAudio {
    music: Option<HtmlAudioElement>,
}

impl DomAudio {
    fn new() -> Self {
        let music = HtmlAudioElement::new_with_src(MUSIC_TRACK).ok();
        if let Some(m) = &music {
            m.set_loop(true);
            m.set_volume(0.3);
        }
        Self { music }
    }
}

impl AudioPlayer for DomAudio {
    fn play(&self, cue: Cue) {
        let src = match cue {
            Cue::WordPopped => POP_SOUND,
            Cue::GameOver => GAME_OVER_SOUND,
        };
        if let Ok(audio) = HtmlAudioElement::new_with_src(src) {
            let _ = audio.play();
        }
    }

    fn music(&self, on: bool) {
        let Some(m) = &self.music else { return };
        if on {
            let _ = m.play();
        } else {
            let _ = m.pause();
            m.set_current_time(0.0);
        }
    }
}

/// High score in `localStorage`, read once at mount and written on increase.
struct LocalStore;

impl ScoreStore for LocalStore {
    fn load(&self) -> Option<u32> {
        let store = window()?.local_storage().ok()??;
        store.get_item(HIGH_SCORE_KEY).ok()??.parse().ok()
    }

    fn save(&self, score: u32) {
        if let Some(win) = window() {
            if let Ok(Some(store)) = win.local_storage() {
                store.set_item(HIGH_SCORE_KEY, &score.to_string()).ok();
            }
        }
    }
}

// --- Randomness ---------------------------------------------------------------

/// Small stateful LCG for word picks and spawn positions; not crypto secure.
/// Seeded from browser entropy when the `rng` feature is on, otherwise from
/// `performance.now()`.
struct Lcg(u64);

impl Lcg {
    fn seeded() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self(u64::from_le_bytes(buf) | 1);
            }
        }
        Self(performance_now().to_bits().wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }
}

impl Randomness for Lcg {
    fn unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

// --- Application state ----------------------------------------------------------

struct App {
    game: Game,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    input: HtmlInputElement,
    rng: Lcg,
    // Spawn interval: closure kept alive for reuse across rounds and level
    // changes, id kept so the pending timer can be cancelled.
    spawn_closure: Closure<dyn FnMut()>,
    spawn_interval_id: Option<i32>,
    // Animation-frame loop: id of the most recently requested frame, None
    // while no loop is active.
    raf_id: Option<i32>,
}

// RefCell::new isn't const on this toolchain; allow Clippy lint until a const initializer is feasible.
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// --- Mounting -------------------------------------------------------------------

pub(crate) fn mount() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    // Full-viewport canvas for the falling words (reused if already present).
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("tf-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("tf-canvas");
        c.set_width(viewport_width(&win) as u32);
        c.set_height(viewport_height(&win) as u32);
        c.set_attribute(
            "style",
            "position:fixed; left:0; top:0; background:#10101a; z-index:10;",
        )
        .ok();
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_baseline("top");

    // HUD overlays (score top-left, level top-right).
    if doc.get_element_by_id("tf-score").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("tf-score");
        div.set_text_content(Some("Score: 0 | High Score: 0"));
        div.set_attribute("style", &format!("{HUD_STYLE} left:12px;")).ok();
        body.append_child(&div)?;
    }
    if doc.get_element_by_id("tf-level").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("tf-level");
        div.set_text_content(Some("Level: 1"));
        div.set_attribute("style", &format!("{HUD_STYLE} right:12px;")).ok();
        body.append_child(&div)?;
    }

    // Typing box, enabled only while a round runs.
    let input: HtmlInputElement = if let Some(el) = doc.get_element_by_id("tf-input") {
        el.dyn_into()?
    } else {
        let i: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        i.set_id("tf-input");
        i.set_placeholder("Type here...");
        i.set_disabled(true);
        i.set_attribute("autocomplete", "off").ok();
        i.set_attribute("style", "position:fixed; bottom:24px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:20px; padding:8px 14px; background:rgba(0,0,0,0.55); border:1px solid #444; border-radius:8px; color:#ffd166; text-align:center; z-index:40;").ok();
        body.append_child(&i)?;
        i
    };

    // Start screen.
    if doc.get_element_by_id("tf-start").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("tf-start");
        div.set_inner_html(
            "<h1>Typing Drop Game</h1><p>Type the words before they hit the ground!</p>",
        );
        div.set_attribute("style", OVERLAY_STYLE).ok();
        let btn = doc.create_element("button")?;
        btn.set_id("tf-start-btn");
        btn.set_text_content(Some("Start Game"));
        div.append_child(&btn)?;
        body.append_child(&div)?;
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            begin_round();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Game-over screen (hidden until a round ends).
    if doc.get_element_by_id("tf-over").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("tf-over");
        div.set_inner_html("<h1>GAME OVER</h1><h2 id=\"tf-final\"></h2>");
        div.set_attribute("style", &format!("{OVERLAY_STYLE} display:none;"))
            .ok();
        let btn = doc.create_element("button")?;
        btn.set_id("tf-restart-btn");
        btn.set_text_content(Some("Restart"));
        div.append_child(&btn)?;
        body.append_child(&div)?;
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            begin_round();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Input listener: every change of the box goes through the controller.
    {
        let input_el = input.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let value = input_el.value();
            let now = performance_now();
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    if let InputOutcome::Matched { leveled_up } =
                        app.game.submit_input(&value, now)
                    {
                        input_el.set_value("");
                        if leveled_up {
                            // Shorter period takes effect immediately.
                            schedule_spawn(app);
                        }
                        hud_update(app);
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let spawn_closure = Closure::wrap(Box::new(|| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                let vw = window().map(|w| viewport_width(&w)).unwrap_or(800.0);
                app.game.spawn_tick(vw, &mut app.rng);
            }
        });
    }) as Box<dyn FnMut()>);

    let app = App {
        game: Game::new(
            GameConfig::default(),
            Box::new(DomAudio::new()),
            Box::new(LocalStore),
        ),
        canvas,
        ctx,
        input,
        rng: Lcg::seeded(),
        spawn_closure,
        spawn_interval_id: None,
        raf_id: None,
    };
    APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        // Second mount keeps the existing state.
        if slot.is_none() {
            *slot = Some(app);
        }
        if let Some(app) = slot.as_ref() {
            hud_update(app);
        }
    });
    Ok(())
}

// --- Round control ----------------------------------------------------------

fn begin_round() {
    let started = APP.with(|cell| {
        let mut app_ref = cell.borrow_mut();
        let Some(app) = app_ref.as_mut() else {
            return false;
        };
        if app.game.is_running() {
            return false;
        }
        app.game.start();
        app.input.set_disabled(false);
        app.input.set_value("");
        let _ = app.input.focus();
        schedule_spawn(app);
        hud_update(app);
        true
    });
    if started {
        set_overlay_visible("tf-start", false);
        set_overlay_visible("tf-over", false);
        start_frame_loop();
    }
}

/// (Re)registers the spawn interval with the controller's current period,
/// cancelling any pending timer first.
fn schedule_spawn(app: &mut App) {
    let Some(win) = window() else { return };
    if let Some(id) = app.spawn_interval_id.take() {
        win.clear_interval_with_handle(id);
    }
    let period = app.game.spawn_period_ms() as i32;
    if let Ok(id) = win.set_interval_with_callback_and_timeout_and_arguments_0(
        app.spawn_closure.as_ref().unchecked_ref(),
        period,
    ) {
        app.spawn_interval_id = Some(id);
    }
}

/// Post-`Ended` teardown: cancel the pending spawn timer, disable typing and
/// show the game-over screen. The frame loop stops itself on the same tick.
fn finish_round(app: &mut App) {
    if let Some(win) = window() {
        if let Some(id) = app.spawn_interval_id.take() {
            win.clear_interval_with_handle(id);
        }
    }
    app.input.set_disabled(true);
    app.input.set_value("");
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("tf-final") {
            el.set_text_content(Some(&format!(
                "Your Score: {} | High Score: {}",
                app.game.score(),
                app.game.high_score()
            )));
        }
    }
    set_overlay_visible("tf-over", true);
}

fn start_frame_loop() {
    let already_running = APP.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|app| app.raf_id.is_some())
            .unwrap_or(true)
    });
    if already_running {
        return;
    }
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let keep_going = APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                frame(app, ts);
                app.game.is_running()
            } else {
                false
            }
        });
        if keep_going {
            if let Some(w) = window() {
                if let Ok(id) = w
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
                {
                    APP.with(|cell| {
                        if let Some(app) = cell.borrow_mut().as_mut() {
                            app.raf_id = Some(id);
                        }
                    });
                }
            }
        } else {
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.raf_id = None;
                }
            });
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        if let Ok(id) =
            w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        {
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.raf_id = Some(id);
                }
            });
        }
    }
}

// --- Per-frame work ----------------------------------------------------------

fn frame(app: &mut App, now: f64) {
    let Some(win) = window() else { return };
    let vw = viewport_width(&win);
    let vh = viewport_height(&win);
    // Keep the canvas backing store in step with the window.
    if app.canvas.width() != vw as u32 {
        app.canvas.set_width(vw as u32);
    }
    if app.canvas.height() != vh as u32 {
        app.canvas.set_height(vh as u32);
    }
    let ended = app.game.frame_tick(now, vh);
    render(app, now, vw, vh);
    hud_update(app);
    if ended {
        finish_round(app);
    }
}

fn render(app: &App, now: f64, vw: f64, vh: f64) {
    let ctx = &app.ctx;
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str("#10101a");
    ctx.fill_rect(0.0, 0.0, vw, vh);

    // Ground line the words must not cross.
    let ground = vh - app.game.config().ground_margin;
    ctx.set_stroke_style_str("rgba(255,255,255,0.22)");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, ground);
    ctx.line_to(vw, ground);
    ctx.stroke();

    let level = app.game.level();
    let grace = app.game.config().grace_ms;
    for word in app.game.words() {
        let v = presenter::word_visual(word, level, now, grace);
        ctx.set_global_alpha(v.alpha);
        ctx.set_font(&format!(
            "{}px 'Fira Code', monospace",
            (presenter::BASE_FONT_PX * v.scale).round()
        ));
        ctx.set_fill_style_str(v.color);
        ctx.fill_text(word.text, v.x, v.y).ok();
    }
    ctx.set_global_alpha(1.0);
}

fn hud_update(app: &App) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("tf-score") {
            el.set_text_content(Some(&format!(
                "Score: {} | High Score: {}",
                app.game.score(),
                app.game.high_score()
            )));
        }
        if let Some(el) = doc.get_element_by_id("tf-level") {
            el.set_text_content(Some(&format!("Level: {}", app.game.level())));
        }
    }
}

// --- Small helpers -------------------------------------------------------------

fn set_overlay_visible(id: &str, visible: bool) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id(id) {
            let style = if visible {
                OVERLAY_STYLE.to_string()
            } else {
                format!("{OVERLAY_STYLE} display:none;")
            };
            el.set_attribute("style", &style).ok();
        }
    }
}

fn viewport_width(win: &Window) -> f64 {
    win.inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0)
}

fn viewport_height(win: &Window) -> f64 {
    win.inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0)
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
