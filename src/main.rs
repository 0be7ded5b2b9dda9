//! Canvas Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use canvas_invaders::platform::assets::load_images;
    use canvas_invaders::platform::{LocalStorage, MemoryStorage, SpriteSet, Storage};
    use canvas_invaders::renderer::{CanvasRenderer, build_scene};
    use canvas_invaders::sim::GamePhase;
    use canvas_invaders::ui::{HudView, ShopView};
    use canvas_invaders::{Session, Settings, ShopItem, VariantKind};

    type WebSession = Session<Box<dyn Storage>>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        renderer: Option<CanvasRenderer>,
        sprites: SpriteSet,
        /// An animation frame is scheduled
        running: bool,
        shop_open: bool,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                self.fps = (60000.0 / (time - oldest)).round() as u32;
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&build_scene(self.session.state(), self.sprites));
            }
        }

        /// Copy HUD, overlay and shop state into the DOM
        fn update_hud(&self, document: &Document) {
            let hud = HudView::from_state(self.session.state());
            set_text(document, "scoreDisplay", &hud.score);
            set_text(document, "livesDisplay", &hud.lives);
            set_text(document, "levelDisplay", &hud.level);
            if self.settings.show_fps {
                set_text(document, "fpsDisplay", &format!("FPS: {}", self.fps));
            }

            match &hud.game_over {
                Some(final_score) => {
                    set_text(document, "finalScore", final_score);
                    set_visible(document, "gameOverScreen", true);
                    set_visible(document, "restartInstructions", true);
                }
                None => {
                    set_visible(document, "gameOverScreen", false);
                    set_visible(document, "restartInstructions", false);
                }
            }

            set_visible(document, "shopModal", self.shop_open);
            if self.shop_open {
                let shop = ShopView::build(self.session.save_data(), self.session.variant());
                set_text(document, "currentScoreDisplay", &shop.bank);
                for item in &shop.items {
                    let id = format!("buy-{}", item.item.slug());
                    if let Some(btn) = document
                        .get_element_by_id(&id)
                        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
                    {
                        btn.set_text_content(Some(&item.label));
                        btn.set_disabled(!item.enabled());
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let display = if visible { "block" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{e}, progress will not be saved");
                Box::new(MemoryStorage::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Canvas Invaders starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, cannot start");
            return;
        };

        let storage = open_storage();
        let settings = Settings::load(&storage);
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let session = Session::new(storage, settings.variant, seed);

        // Both images must finish (or fail) before the first frame
        let (gate, images) = load_images().await;

        let renderer = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|canvas| match CanvasRenderer::new(&canvas, images) {
                Ok(renderer) => Some(renderer),
                Err(e) => {
                    log::error!("Canvas unavailable: {e}");
                    None
                }
            });

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            sprites: gate.sprites(),
            running: false,
            shop_open: false,
            settings,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        setup_input_handlers(game.clone());
        setup_buttons(&document, game.clone());
        setup_mode_selector(&document, game.clone());
        refresh_shop_buttons(&document, &game.borrow());

        start_loop(&game);

        log::info!("Canvas Invaders running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: movement flags, fire, restart
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let restarted = {
                    let mut g = game.borrow_mut();
                    let over = g.session.phase() == GamePhase::GameOver;
                    match event.key().as_str() {
                        "ArrowLeft" => {
                            g.session.input.left = true;
                            false
                        }
                        "ArrowRight" => {
                            g.session.input.right = true;
                            false
                        }
                        " " if !over => {
                            event.prevent_default();
                            g.session.input.fire = true;
                            false
                        }
                        "r" | "R" if over => g.session.restart(js_sys::Date::now() as u64),
                        _ => false,
                    }
                };
                // Loop is restarted after the borrow is released
                if restarted {
                    start_loop(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release movement flags
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.session.input.left = false,
                    "ArrowRight" => g.session.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "restartButton", move || {
                let restarted = game
                    .borrow_mut()
                    .session
                    .restart(js_sys::Date::now() as u64);
                if restarted {
                    start_loop(&game);
                }
            });
        }
        {
            let game = game.clone();
            on_click(document, "shopButton", move || {
                game.borrow_mut().shop_open = true;
                redraw_overlays(&game);
            });
        }
        {
            let game = game.clone();
            on_click(document, "closeShop", move || {
                game.borrow_mut().shop_open = false;
                redraw_overlays(&game);
            });
        }

        // Every item gets a handler; visibility follows the current mode
        for item in ShopItem::ALL {
            let game = game.clone();
            on_click(document, &format!("buy-{}", item.slug()), move || {
                if let Err(e) = game.borrow_mut().session.purchase(item) {
                    log::info!("Purchase refused: {e}");
                }
                redraw_overlays(&game);
            });
        }
    }

    /// Show only the buy buttons the current mode sells
    fn refresh_shop_buttons(document: &Document, game: &Game) {
        let variant = game.session.variant();
        for item in ShopItem::ALL {
            set_visible(document, &format!("buy-{}", item.slug()), variant.offers(item));
        }
    }

    /// One `mode-<name>` button per variant: switch, remember, start over
    fn setup_mode_selector(document: &Document, game: Rc<RefCell<Game>>) {
        for kind in VariantKind::ALL {
            let game = game.clone();
            let id = format!("mode-{}", kind.as_str().to_lowercase());
            on_click(document, &id, move || {
                {
                    let mut g = game.borrow_mut();
                    let g = &mut *g;
                    g.session.switch_variant(kind, js_sys::Date::now() as u64);
                    if let Err(e) = g.settings.remember_variant(kind, g.session.storage_mut()) {
                        log::warn!("Could not save settings: {e}");
                    }
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        refresh_shop_buttons(&document, g);
                    }
                }
                redraw_overlays(&game);
                start_loop(&game);
            });
        }
    }

    /// HUD refresh outside the animation loop (the loop is halted on game over)
    fn redraw_overlays(game: &Rc<RefCell<Game>>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            game.borrow().update_hud(&document);
        }
    }

    fn start_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_running = {
            let mut g = game.borrow_mut();
            let now = js_sys::Date::now();

            g.session.frame(now);
            g.track_fps(now);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }

            // Halt the callback chain once the run is over
            let playing = g.session.phase() == GamePhase::Playing;
            g.running = playing;
            playing
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use canvas_invaders::consts::SIM_DT_MS;
    use canvas_invaders::platform::{FileStorage, Storage};
    use canvas_invaders::sim::{GamePhase, Owner};
    use canvas_invaders::ui::HudView;
    use canvas_invaders::{Session, Settings, ShopItem, VariantKind};

    /// Longest autopilot run (simulated ms)
    const MAX_RUN_MS: f64 = 5.0 * 60.0 * 1000.0;

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or_default()
    }

    /// Spend the bank on whatever the shop sells, cheapest first
    fn spend_bank<S: Storage>(session: &mut Session<S>) {
        loop {
            let upgrades = &session.save_data().upgrades;
            let cheapest = session
                .variant()
                .shop
                .iter()
                .filter_map(|&item| upgrades.next_cost(item).map(|cost| (cost, item)))
                .min_by_key(|(cost, _)| *cost);
            let Some((_, item)) = cheapest else {
                return;
            };
            if session.purchase(item).is_err() {
                return;
            }
        }
    }

    /// Chase the lowest enemy, dodge bullets falling onto the ship, keep firing
    fn steer<S: Storage>(session: &mut Session<S>) {
        let state = session.state();
        let ship = state.player.rect();
        let danger = state
            .bullets_of(Owner::Enemy)
            .filter(|b| b.rect().bottom() > ship.top() - 120.0)
            .map(|b| b.rect().center().x)
            .find(|&x| (x - ship.center().x).abs() < ship.size.x);
        let target_x = match danger {
            Some(x) if x > ship.center().x => ship.center().x - ship.size.x,
            Some(_) => ship.center().x + ship.size.x,
            None => state
                .enemies
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|e| e.rect().center().x)
                .unwrap_or(ship.center().x),
        };

        let speed = state.player.speed;
        let dx = target_x - ship.center().x;
        session.input.left = dx < -speed;
        session.input.right = dx > speed;
        session.input.fire = true;
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Canvas Invaders (native) starting...");
        log::info!("Native mode runs a headless autopilot");
        log::info!("Run with `trunk serve` for the web version");

        let mut args = std::env::args().skip(1);
        let variant_arg = args.next();
        let dir = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("canvas-invaders"));

        let mut storage = FileStorage::new(&dir);
        let mut settings = Settings::load(&storage);
        // A mode named on the command line becomes the new default
        match variant_arg.as_deref().map(|arg| (arg, VariantKind::parse(arg))) {
            Some((_, Some(kind))) => {
                if let Err(e) = settings.remember_variant(kind, &mut storage) {
                    log::warn!("Could not save settings: {e}");
                }
            }
            Some((arg, None)) => {
                log::warn!("Unknown mode '{arg}', using {}", settings.variant.as_str());
            }
            None => {}
        }
        let variant = settings.variant;
        let seed = settings.seed_or(now_ms() as u64);
        log::info!("Saves in {}", dir.display());

        let mut session = Session::new(storage, variant, seed);
        spend_bank(&mut session);

        // Feed the session synthetic frame timestamps
        let mut clock = now_ms();
        let start = clock;
        while session.phase() == GamePhase::Playing && clock - start < MAX_RUN_MS {
            steer(&mut session);
            clock += SIM_DT_MS;
            session.frame(clock);
        }

        let hud = HudView::from_state(session.state());
        println!("{} | {} | {}", hud.score, hud.lives, hud.level);
        if let Some(rank) = session.last_rank() {
            println!("New high score! Rank {rank}");
        }
        spend_bank(&mut session);
        session.flush();
        let bank = session.save_data().score;
        let fire_rate = session.save_data().upgrades.level(ShopItem::FireRate);
        println!("Bank: {bank} (fire rate level {fire_rate})");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}
