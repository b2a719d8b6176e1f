//! Brickwave entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use brickwave::audio::AudioManager;
    use brickwave::highscores::format_age;
    use brickwave::music::MusicSequencer;
    use brickwave::render::CanvasRenderer;
    use brickwave::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use brickwave::{HighScores, Settings};

    /// Touch drags move the paddle a little faster than the finger
    const TOUCH_DRAG_GAIN: f32 = 1.2;
    /// Music sequencer step per animation frame
    const FRAME_SECONDS: f32 = 1.0 / 60.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        renderer: CanvasRenderer,
        audio: AudioManager,
        music: MusicSequencer,
        settings: Settings,
        highscores: HighScores,
        /// Previous touch x, for relative paddle drags
        last_touch_x: Option<f32>,
        /// Track phase transitions for score submission
        last_phase: GamePhase,
    }

    impl Game {
        fn new(width: f32, height: f32, seed: u64, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            audio.set_muted(settings.muted);
            Self {
                state: GameState::new(width, height, seed),
                input: TickInput::default(),
                renderer,
                audio,
                music: MusicSequencer::new(),
                settings,
                highscores: HighScores::load(),
                last_touch_x: None,
                last_phase: GamePhase::Start,
            }
        }

        /// Advance one animation frame
        fn frame(&mut self) {
            let input = self.input;
            tick(&mut self.state, &input);

            // Clear one-shot inputs; the absolute pointer target persists
            self.input.start = false;
            self.input.paddle_dx = None;

            for event in self.state.take_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play(cue),
                    GameEvent::MusicStart => self.music.start(),
                    GameEvent::MusicStop => self.music.stop(),
                }
            }
            if let Some(freq) = self.music.advance(FRAME_SECONDS) {
                self.audio.play_note(freq);
            }

            // Submit the final score once, on entering game over
            if self.state.phase == GamePhase::GameOver && self.last_phase != GamePhase::GameOver {
                let timestamp = js_sys::Date::now();
                if let Some(rank) =
                    self.highscores
                        .add_score(self.state.score, self.state.round, timestamp)
                {
                    log::info!("New high score, rank {}", rank);
                    self.highscores.save();
                }
            }
            self.last_phase = self.state.phase;

            self.renderer.draw(&self.state, self.highscores.top_score());
            self.update_overlays();
        }

        /// Toggle the DOM start/game-over screens to match the phase
        fn update_overlays(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("start-screen") {
                if self.state.phase == GamePhase::Start {
                    let _ = el.set_attribute("class", "overlay");
                } else {
                    let _ = el.set_attribute("class", "overlay hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "overlay");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(round_el) = document.get_element_by_id("final-round") {
                        round_el.set_text_content(Some(&self.state.round.to_string()));
                    }
                    if let Some(list_el) = document.get_element_by_id("highscore-list") {
                        let lines: Vec<String> = self
                            .highscores
                            .entries
                            .iter()
                            .take(5)
                            .enumerate()
                            .map(|(i, e)| {
                                format!(
                                    "{}. {} - round {} - {}",
                                    i + 1,
                                    e.score,
                                    e.round,
                                    format_age(e.timestamp)
                                )
                            })
                            .collect();
                        list_el.set_text_content(Some(&lines.join("\n")));
                    }
                } else {
                    let _ = el.set_attribute("class", "overlay hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brickwave starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1280.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let renderer = CanvasRenderer::new(&canvas).expect("no 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(width, height, seed, renderer)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_window_handlers(game.clone());

        request_animation_frame(game);

        log::info!("Brickwave running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute paddle target
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.paddle_x = Some(event.offset_x() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - start a run, unlock audio
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.start = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - relative paddle drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let mut g = game.borrow_mut();
                    if let Some(last) = g.last_touch_x {
                        // Accumulate across events that land in the same frame
                        let dx = (x - last) * TOUCH_DRAG_GAIN;
                        g.input.paddle_dx = Some(g.input.paddle_dx.unwrap_or(0.0) + dx);
                    }
                    g.last_touch_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - start a run, anchor the drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.start = true;
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    g.last_touch_x = Some(touch.client_x() as f32 - rect.left() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - drop the drag anchor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().last_touch_x = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - space/enter starts a run, M toggles the mute preference
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "Enter" => {
                        let mut g = game.borrow_mut();
                        g.input.start = true;
                        g.audio.resume();
                    }
                    "m" | "M" => {
                        let mut g = game.borrow_mut();
                        g.settings.muted = !g.settings.muted;
                        let muted = g.settings.muted;
                        g.audio.set_muted(muted);
                        g.settings.save();
                        log::info!("Audio muted: {}", muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Resize - retune the playfield and the canvas backing store
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let window = web_sys::window().unwrap();
                let document = window.document().unwrap();
                let width = window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1280.0) as f32;
                let height = window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(800.0) as f32;
                if let Some(canvas) = document.get_element_by_id("canvas") {
                    if let Ok(canvas) = canvas.dyn_into::<HtmlCanvasElement>() {
                        canvas.set_width(width as u32);
                        canvas.set_height(height as u32);
                    }
                }
                game.borrow_mut().state.resize(width, height);
                log::info!("Resized to {}x{}", width, height);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Blur/focus - optional auto-mute
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                // Back to the player's persisted preference
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brickwave::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Brickwave (native) starting...");
    log::info!("The playable build targets the browser; running a headless simulation instead");

    let seed = 0xB71C;
    let mut state = GameState::new(1280.0, 800.0, seed);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    // Drive the paddle under the first active ball, ten minutes of frames max
    let mut frames = 0u32;
    for _ in 0..36_000 {
        let target = state
            .balls
            .iter()
            .find(|b| b.active)
            .map(|b| b.pos.x);
        let input = TickInput {
            paddle_x: target,
            ..Default::default()
        };
        tick(&mut state, &input);
        state.take_events();
        frames += 1;
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Headless run (seed {:#x}): {} frames, score {}, round {}, lives {}",
        seed,
        frames,
        state.score,
        state.round,
        state.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
