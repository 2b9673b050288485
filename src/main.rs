//! Bug Smash entry point
//!
//! The browser build drives a virtual clock from `requestAnimationFrame` and
//! projects the round onto DOM elements inside `#game-area`. The native build
//! plays a headless round with a simple auto-clicker, for logging and balance
//! checks.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlImageElement, MouseEvent};

    use bug_smash::sim::{Catalog, EntityId, GameSession, PlayField, RoundSummary, advance};
    use bug_smash::view::{Hud, Sprite};
    use bug_smash::{DisplaySurface, GameConfig, Presenter, VirtualClock};

    /// Longest stretch simulated in one frame (tab switches, debugger pauses)
    const MAX_FRAME_MS: f64 = 1000.0;

    /// DOM-backed display surface
    struct DomSurface {
        document: Document,
        area: HtmlElement,
        score: Option<HtmlElement>,
        timer: Option<HtmlElement>,
        elements: HashMap<EntityId, HtmlElement>,
    }

    impl DomSurface {
        fn new(document: Document, area: HtmlElement) -> Self {
            let score = document
                .get_element_by_id("score")
                .and_then(|e| e.dyn_into::<HtmlElement>().ok());
            let timer = document
                .get_element_by_id("timer")
                .and_then(|e| e.dyn_into::<HtmlElement>().ok());
            Self {
                document,
                area,
                score,
                timer,
                elements: HashMap::new(),
            }
        }

        fn build(&self, sprite: &Sprite) -> Result<HtmlElement, JsValue> {
            let container: HtmlElement = self.document.create_element("div")?.dyn_into()?;
            container.set_class_name("bug-container");
            if sprite.bonus {
                container.class_list().add_1("shining-bug")?;
            }
            container.set_attribute("data-id", &sprite.id.to_string())?;

            let image: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
            image.set_src(sprite.image.as_str());
            image.set_alt(&sprite.name);
            image.set_class_name("bug-image");
            container.append_child(&image)?;

            let style = container.style();
            style.set_property("width", &format!("{}px", sprite.size))?;
            style.set_property("height", &format!("{}px", sprite.size))?;
            Ok(container)
        }

        fn place(element: &HtmlElement, sprite: &Sprite) {
            let style = element.style();
            let _ = style.set_property("left", &format!("{}px", sprite.pos.x));
            let _ = style.set_property("top", &format!("{}px", sprite.pos.y));
            if sprite.fading {
                let _ = style.set_property("opacity", "0");
            }
            if !sprite.interactive {
                let _ = style.set_property("pointer-events", "none");
            }
        }
    }

    impl DisplaySurface for DomSurface {
        fn create(&mut self, sprite: &Sprite) {
            match self.build(sprite) {
                Ok(element) => {
                    Self::place(&element, sprite);
                    if self.area.append_child(&element).is_ok() {
                        self.elements.insert(sprite.id, element);
                    }
                }
                Err(e) => log::warn!("Failed to create element for #{}: {:?}", sprite.id, e),
            }
        }

        fn update(&mut self, sprite: &Sprite) {
            if let Some(element) = self.elements.get(&sprite.id) {
                Self::place(element, sprite);
            }
        }

        fn remove(&mut self, id: EntityId) {
            if let Some(element) = self.elements.remove(&id) {
                element.remove();
            }
        }

        fn show_hud(&mut self, hud: &Hud) {
            if let Some(el) = &self.score {
                el.set_text_content(Some(&hud.score.to_string()));
                let color = if hud.boosted { "gold" } else { "#000" };
                let _ = el.style().set_property("color", color);
            }
            if let Some(el) = &self.timer {
                el.set_text_content(Some(&hud.seconds_remaining.to_string()));
            }
        }

        fn show_summary(&mut self, summary: &RoundSummary) {
            let Ok(message) = self.document.create_element("div") else {
                return;
            };
            message.set_class_name("game-over");
            message.set_inner_html(&format!(
                "GAME OVER! <br>Final Score: <strong>{}</strong>",
                summary.final_score
            ));
            let _ = self.area.append_child(&message);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        clock: VirtualClock,
        presenter: Presenter,
        surface: DomSurface,
        last_time: f64,
    }

    impl Game {
        fn field(&self) -> PlayField {
            PlayField::new(
                self.surface.area.offset_width() as f32,
                self.surface.area.offset_height() as f32,
            )
        }

        /// Run the clock forward to `time` and redraw
        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            let field = self.field();
            self.session.resize(field);
            advance(&mut self.session, &mut self.clock, elapsed.round() as u64);

            for event in self.session.drain_events() {
                log::debug!("{:?}", event);
            }
            self.presenter.present(&self.session, &mut self.surface);
        }

        fn click(&mut self, id: EntityId) {
            if let Some(earned) = self.session.smash(id, &mut self.clock) {
                log::debug!("+{} (score {})", earned, self.session.score.total);
            }
        }
    }

    /// Optional JSON overrides on the game area element
    fn load_config(area: &Element) -> GameConfig {
        let Some(json) = area.get_attribute("data-config") else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config overrides");
                config
            }
            Err(e) => {
                log::warn!("Ignoring data-config: {}", e);
                GameConfig::default()
            }
        }
    }

    fn load_catalog(area: &Element) -> Catalog {
        let Some(json) = area.get_attribute("data-catalog") else {
            return Catalog::builtin();
        };
        match Catalog::from_json(&json) {
            Ok(catalog) => {
                log::info!("Loaded {} creatures", catalog.definitions().len());
                catalog
            }
            Err(e) => {
                log::warn!("Ignoring data-catalog: {}", e);
                Catalog::builtin()
            }
        }
    }

    /// Creature id under a click, if any
    fn clicked_creature(event: &MouseEvent) -> Option<EntityId> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let container = target.closest(".bug-container").ok()??;
        container.get_attribute("data-id")?.parse().ok()
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Bug Smash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let area: HtmlElement = document
            .get_element_by_id("game-area")
            .ok_or("no #game-area")?
            .dyn_into()?;

        let config = load_config(&area);
        let catalog = load_catalog(&area);
        let field = PlayField::new(area.offset_width() as f32, area.offset_height() as f32);

        let seed = js_sys::Date::now() as u64;
        let mut clock = VirtualClock::new();
        let session = GameSession::start(config, catalog, field, seed, &mut clock);

        let game = Rc::new(RefCell::new(Game {
            session,
            clock,
            presenter: Presenter::new(),
            surface: DomSurface::new(document, area.clone()),
            last_time: 0.0,
        }));

        setup_click_handler(&area, game.clone());
        request_animation_frame(game);

        log::info!("Bug Smash running with seed {}", seed);
        Ok(())
    }

    fn setup_click_handler(area: &HtmlElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(id) = clicked_creature(&event) {
                game.borrow_mut().click(id);
            }
        });
        let _ = area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = {
            let mut g = game.borrow_mut();
            g.frame(time);
            // Fading creatures still need their detach after the round ends
            g.session.is_running() || g.clock.pending() > 0
        };

        if running {
            request_animation_frame(game);
        } else {
            log::info!("Render loop stopped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Bug Smash (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", path, e);
                return std::process::ExitCode::FAILURE;
            }
        },
        None => bug_smash::GameConfig::default(),
    };

    let seed = std::env::var("BUG_SMASH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);

    let summary = headless::play(config, seed);
    println!("{}", summary.message());
    println!(
        "smashed {} of {} ({} bonus), {} left on the field",
        summary.smashed, summary.spawned, summary.bonus_smashed, summary.left_on_field
    );
    std::process::ExitCode::SUCCESS
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> Result<bug_smash::GameConfig, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    bug_smash::GameConfig::from_json(&json).map_err(|e| e.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bug_smash::sim::{Catalog, GameSession, PlayField, RoundSummary, advance};
    use bug_smash::{GameConfig, VirtualClock};

    /// Phone-sized play field
    const FIELD: (f32, f32) = (380.0, 530.0);
    /// Simulated frame length
    const FRAME_MS: u64 = 16;
    /// Auto-clicker reaction time
    const CLICK_EVERY_MS: u64 = 700;

    /// Play one round: every reaction window, smash a random live creature,
    /// always going for the bonus first
    pub fn play(config: GameConfig, seed: u64) -> RoundSummary {
        let mut clock = VirtualClock::new();
        let mut session = GameSession::start(
            config,
            Catalog::builtin(),
            PlayField::new(FIELD.0, FIELD.1),
            seed,
            &mut clock,
        );
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut since_click = 0;

        while session.is_running() {
            advance(&mut session, &mut clock, FRAME_MS);
            since_click += FRAME_MS;

            for event in session.drain_events() {
                log::debug!("{:?}", event);
            }

            if since_click < CLICK_EVERY_MS {
                continue;
            }
            since_click = 0;

            let alive: Vec<_> = session
                .creatures
                .iter()
                .filter(|c| c.is_alive())
                .collect();
            let target = alive
                .iter()
                .find(|c| c.is_bonus())
                .or_else(|| alive.get(player.random_range(0..alive.len().max(1))))
                .map(|c| c.id);
            if let Some(id) = target {
                session.smash(id, &mut clock);
            }
        }

        session.summary.clone().unwrap_or(RoundSummary {
            final_score: session.score.total,
            spawned: session.spawned,
            smashed: session.smashed,
            bonus_smashed: session.bonus_smashed,
            left_on_field: 0,
        })
    }
}
