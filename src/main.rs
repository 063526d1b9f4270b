//! Gravity Rift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use gravity_rift::platform::canvas::CanvasFrontend;
    use gravity_rift::platform::input;
    use gravity_rift::platform::storage::LocalStore;
    use gravity_rift::sim::Field;
    use gravity_rift::{Command, Game, Settings, Tuning};

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStore>,
        frontend: CanvasFrontend,
        /// An animation frame is scheduled
        running: bool,
    }

    type Shared = Rc<RefCell<App>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Gravity Rift starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let mut tuning = match canvas.get_attribute("data-mode").as_deref() {
            Some("bounce") => Tuning::bounce(),
            _ => Tuning::rift(),
        };
        if let Some(overrides) = canvas.get_attribute("data-tuning") {
            tuning = tuning.with_overrides(&overrides);
        }
        let settings = Settings::load();

        let Some(mut frontend) = CanvasFrontend::new(canvas.clone(), document.clone(), settings.clone())
        else {
            log::error!("2D canvas context unavailable");
            return;
        };
        let (width, height) = frontend.fit(window.device_pixel_ratio());

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(tuning, &settings, seed, Field::new(width, height), LocalStore::new());
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            frontend,
            running: false,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(&document, app.clone());
        setup_resize(app.clone());

        // Draw the title screen once
        ensure_running(app);
        log::info!("Gravity Rift running!");
    }

    fn send(app: &Shared, command: Command) {
        app.borrow_mut().game.send(command);
        ensure_running(app.clone());
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Shared) {
        // Pointer (mouse, touch, pen)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if let Some(command) = input::command_for_pointer(&event.pointer_type(), event.button()) {
                    event.prevent_default();
                    send(&app, command);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if input::is_fps_toggle(&event.code()) {
                    app.borrow_mut().frontend.toggle_fps();
                    return;
                }
                if let Some(command) = input::command_for_key(&event.code()) {
                    event.prevent_default();
                    send(&app, command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &web_sys::Document, app: Shared) {
        for id in ["startBtn", "restartBtn"] {
            let Some(command) = input::command_for_button(id) else {
                continue;
            };
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    event.stop_propagation();
                    send(&app, command);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (width, height) = app.borrow_mut().frontend.fit(dpr);
            send(&app, Command::ViewportResized { width, height });
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule frames unless a loop is already running
    fn ensure_running(app: Shared) {
        {
            let mut a = app.borrow_mut();
            if a.running {
                return;
            }
            a.running = true;
        }
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Shared, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            let App { game, frontend, .. } = &mut *a;
            let keep_going = game.frame(time, frontend);
            a.running = keep_going;
            keep_going
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gravity Rift (native) starting...");
    log::info!("Native mode runs a headless autopilot round - run with `trunk serve` for the web version");

    let mut seed = 1u64;
    let mut tuning = gravity_rift::Tuning::rift();
    let mut settings = gravity_rift::Settings::default();
    let mut overrides = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "rift" => tuning = gravity_rift::Tuning::rift(),
            "bounce" => tuning = gravity_rift::Tuning::bounce(),
            json if json.starts_with('{') => overrides = Some(arg.clone()),
            other => {
                if let Ok(value) = other.parse() {
                    seed = value;
                } else if let Ok(preset) = other.parse::<gravity_rift::QualityPreset>() {
                    settings = gravity_rift::Settings::from_preset(preset);
                } else {
                    log::warn!("Ignoring argument {:?}", other);
                }
            }
        }
    }
    if let Some(json) = overrides {
        tuning = tuning.with_overrides(&json);
    }

    let summary = headless::run(tuning, &settings, seed);
    println!(
        "seed {}: score {}, best {}, {:.0} frames, {} gates",
        seed, summary.score, summary.best_score, summary.frames, summary.gates
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use gravity_rift::persistence::MemoryStore;
    use gravity_rift::sim::{Field, GameEvent, GamePhase, autopilot};
    use gravity_rift::{Command, FrameView, Frontend, Game, Settings, Tuning};

    /// Give up after two minutes of simulated play
    const MAX_FRAMES: u32 = 60 * 120;

    pub struct Summary {
        pub score: u64,
        pub best_score: u64,
        pub frames: f32,
        pub gates: u32,
    }

    /// Logs notifications instead of drawing
    #[derive(Default)]
    struct LogFrontend {
        gates: u32,
    }

    impl Frontend for LogFrontend {
        fn render(&mut self, _view: &FrameView<'_>) {}

        fn notify(&mut self, event: &GameEvent) {
            match event {
                GameEvent::GatePassed { .. } => {
                    self.gates += 1;
                    log::debug!("{:?}", event);
                }
                GameEvent::Crash { .. } | GameEvent::StreakBanner { .. } | GameEvent::GameOver { .. } => {
                    log::info!("{:?}", event);
                }
                _ => log::trace!("{:?}", event),
            }
        }
    }

    pub fn run(tuning: Tuning, settings: &Settings, seed: u64) -> Summary {
        let field = Field::new(
            gravity_rift::consts::DEFAULT_FIELD_WIDTH,
            gravity_rift::consts::DEFAULT_FIELD_HEIGHT,
        );
        let mut game = Game::new(tuning, settings, seed, field, MemoryStore::new());
        let mut frontend = LogFrontend::default();

        game.send(Command::StartRound);
        let mut now = 0.0;
        let mut frames = 0;
        loop {
            let state = game.state();
            if state.phase == GamePhase::Playing && autopilot::wants_activate(state) {
                game.send(Command::Activate);
            }
            if !game.frame(now, &mut frontend) || frames >= MAX_FRAMES {
                break;
            }
            now += gravity_rift::consts::REFERENCE_FRAME_MS;
            frames += 1;
        }

        let state = game.state();
        Summary {
            score: state.score,
            best_score: state.best_score,
            frames: state.frame_count,
            gates: frontend.gates,
        }
    }
}
