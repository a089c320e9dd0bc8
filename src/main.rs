//! Plinko entry point
//!
//! The web build runs the board in a canvas with a DOM overlay. The native
//! build is a headless runner that drops balls and reports where they land.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use plinko::consts::*;
    use plinko::renderer::{RenderState, scene};
    use plinko::sim::{GameEvent, GameState, TickInput, tick};
    use plinko::ui::editor::layout;
    use plinko::ui::{EditorAction, Letterbox, Rect};
    use plinko::{PlinkoError, Settings};

    const TITLE: &str = "Kitdy's Dawg Pound";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Board → CSS pixel mapping for clicks and DOM overlays
        letterbox: Letterbox,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings {
                seed: Some(seed),
                ..Default::default()
            };
            let state = GameState::new(&settings);
            let letterbox = Letterbox::fit(state.board_size, state.board_size);
            Self {
                state,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                letterbox,
            }
        }

        fn set_client_size(&mut self, w: f32, h: f32) {
            self.letterbox = Letterbox::fit(Vec2::new(w, h), scene::view_size(&self.state));
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, document: &Document) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                let events = tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in &events {
                    self.handle_event(event, document);
                }
            }
        }

        fn handle_event(&mut self, event: &GameEvent, document: &Document) {
            match event {
                GameEvent::BoardRebuilt { .. } => {
                    let view = scene::view_size(&self.state);
                    self.letterbox = Letterbox::fit(self.letterbox.screen, view);
                    if let Some(render_state) = self.render_state.as_mut() {
                        render_state.set_view(view);
                    }
                    build_bin_labels(document, &self.state);
                    build_label_inputs(document, &self.state);
                }
                GameEvent::ModeChanged { editing } => {
                    if *editing {
                        build_label_inputs(document, &self.state);
                    }
                    set_hidden(document, "editor", !*editing);
                }
                GameEvent::BallLanded { .. } | GameEvent::BallDropped | GameEvent::PopupDismissed => {}
            }
        }

        fn render(&mut self) {
            let vertices = scene::build(&self.state);
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Position the text overlays over the letterboxed board
        fn update_overlay(&self, document: &Document) {
            let lb = &self.letterbox;
            let font_px = |px: f32| format!("font-size: {:.0}px;", px * lb.scale);

            if let Some(el) = document.get_element_by_id("title") {
                let pos = lb.board_to_screen(Vec2::new(20.0, 20.0));
                let _ = el.set_attribute(
                    "style",
                    &format!("left: {:.0}px; top: {:.0}px; {}", pos.x, pos.y, font_px(24.0)),
                );
            }

            let geometry = &self.state.geometry;
            for bin in 0..self.state.bins.len() {
                let Some(el) = document.get_element_by_id(&format!("bin-label-{bin}")) else {
                    continue;
                };
                let face = scene::bin_face_rect(geometry, &self.state.bins, bin);
                place(&el, face, lb, &font_px((face.w / 5.0).clamp(7.0, 14.0)));
            }

            let popup = &self.state.popup;
            set_hidden(document, "popup", !popup.active);
            if let Some(el) = document.get_element_by_id("popup").filter(|_| popup.active) {
                el.set_text_content(Some(&popup.message));
                place(&el, popup.rect, lb, &font_px(POPUP_FONT_PX));
            }

            let board = self.state.board_size;
            let controls = [
                ("edit-btn", layout::edit_button(board)),
                ("play-btn", layout::play_button(board)),
                ("apply-btn", layout::apply_button(board)),
                ("rows-input", layout::ROWS_BOX),
            ];
            for (id, rect) in controls {
                if let Some(el) = document.get_element_by_id(id) {
                    place(&el, rect, lb, &font_px(18.0));
                }
            }
            if self.state.editor.edit_mode {
                for index in 0..self.state.editor.labels().len() {
                    let selector = format!("#label-inputs input[data-index='{index}']");
                    if let Some(el) = document.query_selector(&selector).ok().flatten() {
                        place(&el, layout::label_box(index), lb, &font_px(16.0));
                    }
                }
            }
        }
    }

    /// Absolutely position an overlay element over a board-space rectangle
    fn place(el: &Element, rect: Rect, lb: &Letterbox, extra_style: &str) {
        let min = lb.board_to_screen(rect.min());
        let size = Vec2::new(rect.w, rect.h) * lb.scale;
        let _ = el.set_attribute(
            "style",
            &format!(
                "left: {:.0}px; top: {:.0}px; width: {:.0}px; height: {:.0}px; {}",
                min.x, min.y, size.x, size.y, extra_style
            ),
        );
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn create_child(document: &Document, parent: &Element, tag: &str) -> Option<Element> {
        let el = document.create_element(tag).ok()?;
        parent.append_child(&el).ok()?;
        Some(el)
    }

    /// One absolutely positioned label per bin
    fn build_bin_labels(document: &Document, state: &GameState) {
        let Some(container) = document.get_element_by_id("bin-labels") else {
            return;
        };
        container.set_inner_html("");
        for (bin, label) in state.bins.labels().iter().enumerate() {
            if let Some(el) = create_child(document, &container, "div") {
                el.set_id(&format!("bin-label-{bin}"));
                let _ = el.set_attribute("class", "bin-label");
                el.set_text_content(Some(label));
            }
        }
    }

    /// Editor text boxes, one per bin label
    fn build_label_inputs(document: &Document, state: &GameState) {
        if let Some(rows) = document
            .get_element_by_id("rows-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            rows.set_value(&state.editor.rows_text);
        }

        let Some(container) = document.get_element_by_id("label-inputs") else {
            return;
        };
        container.set_inner_html("");
        for (index, label) in state.editor.labels().iter().enumerate() {
            let Some(input) = create_child(document, &container, "input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            let _ = input.set_attribute("data-index", &index.to_string());
            input.set_value(label);
        }
    }

    /// Fallible WebGPU setup
    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        view: Vec2,
    ) -> Result<RenderState, PlinkoError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, view).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Plinko starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("style", &plinko::colors::css_custom_properties());
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut()
            .set_client_size(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let view = scene::view_size(&game.borrow().state);
        match init_renderer(canvas.clone(), width, height, view).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("WebGPU unavailable: {}", e);
                if let Some(el) = document.get_element_by_id("loading") {
                    el.set_text_content(Some(&format!("Could not start renderer: {e}")));
                }
                return;
            }
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(title) = document.get_element_by_id("title") {
            title.set_text_content(Some(TITLE));
        }
        {
            let g = game.borrow();
            build_bin_labels(&document, &g.state);
            build_label_inputs(&document, &g.state);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_editor_handlers(&document, game.clone());
        setup_resize(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Plinko running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Canvas clicks, converted to board space
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let screen = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                if let Some(board) = g.letterbox.screen_to_board(screen) {
                    g.input.click = Some(board);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Typing in the editor is not a drop
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        game.borrow_mut().input.drop_ball = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_editor_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("edit-btn", EditorAction::Edit),
            ("play-btn", EditorAction::Play),
            ("apply-btn", EditorAction::Apply),
        ];
        for (id, action) in buttons {
            let Some(button) = document.get_element_by_id(id) else {
                log::warn!("missing #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.editor.push(action.clone());
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Row count box
        if let Some(rows) = document.get_element_by_id("rows-input") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                {
                    game.borrow_mut()
                        .input
                        .editor
                        .push(EditorAction::SetRows(input.value()));
                }
            });
            let _ = rows.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Label boxes are rebuilt with the board, so listen on their container
        if let Some(container) = document.get_element_by_id("label-inputs") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let Some(index) = input
                    .get_attribute("data-index")
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    return;
                };
                game.borrow_mut().input.editor.push(EditorAction::SetLabel {
                    index,
                    text: input.value(),
                });
            });
            let _ = container.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.set_client_size(client_w as f32, client_h as f32);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, &document);
            g.render();
            g.update_overlay(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::io::Write;
    use std::path::PathBuf;

    use anyhow::{Context, Result, ensure};
    use clap::Parser;
    use serde::Serialize;

    use plinko::Settings;
    use plinko::consts::{MAX_PIN_ROWS, MIN_PIN_ROWS};
    use plinko::sim::{Ball, BinIndex, GameEvent, GameState, TickInput, tick};

    /// Drop balls through a Plinko board without a window
    #[derive(Parser, Debug)]
    #[command(name = "plinko", version, about)]
    pub struct Cli {
        /// Settings file (JSON); missing fields use defaults
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// RNG seed (random when neither this nor the config sets one)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Number of pin rows
        #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_PIN_ROWS as i64..=MAX_PIN_ROWS as i64))]
        pub rows: Option<u32>,

        /// Number of balls to drop
        #[arg(long, default_value_t = 100)]
        pub drops: u32,

        /// Print the report as JSON
        #[arg(long)]
        pub json: bool,

        /// Print one JSON line per tick with the ball state
        #[arg(long)]
        pub trace: bool,
    }

    #[derive(Debug, Serialize)]
    struct BinCount {
        bin: BinIndex,
        label: String,
        count: u64,
    }

    #[derive(Debug, Serialize)]
    struct Report {
        seed: u64,
        rows: u32,
        drops: u64,
        ticks: u64,
        bins: Vec<BinCount>,
    }

    #[derive(Serialize)]
    struct TraceLine<'a> {
        tick: u64,
        drop: u32,
        ball: Option<&'a Ball>,
        #[serde(skip_serializing_if = "Option::is_none")]
        landed: Option<BinIndex>,
    }

    fn landed_bin(events: &[GameEvent]) -> Option<BinIndex> {
        events.iter().find_map(|e| match e {
            GameEvent::BallLanded { bin, .. } => Some(*bin),
            _ => None,
        })
    }

    pub fn run(cli: Cli) -> Result<()> {
        let mut settings = match &cli.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }
        if settings.seed.is_none() {
            settings.seed = Some(rand::random());
        }
        if let Some(rows) = cli.rows {
            settings.pin_rows = rows;
        }
        settings.validate().context("invalid settings")?;

        let mut state = GameState::new(&settings);
        let mut counts = vec![0u64; state.bins.len()];
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        for drop in 0..cli.drops {
            let mut input = TickInput {
                drop_ball: true,
                ..Default::default()
            };
            loop {
                let events = tick(&mut state, &input);
                if input.drop_ball {
                    ensure!(
                        events.contains(&GameEvent::BallDropped),
                        "drop {} was refused",
                        drop
                    );
                    input = TickInput::default();
                }

                let landed = landed_bin(&events);
                if cli.trace {
                    let line = TraceLine {
                        tick: state.time_ticks,
                        drop,
                        ball: state.ball.as_ref(),
                        landed,
                    };
                    writeln!(out, "{}", serde_json::to_string(&line)?)?;
                }

                // Flight timeouts resolve in the tick, so this always ends
                if let Some(bin) = landed {
                    counts[bin] += 1;
                    break;
                }
            }
        }

        let report = Report {
            seed: state.seed,
            rows: state.geometry.rows,
            drops: state.drops,
            ticks: state.time_ticks,
            bins: counts
                .iter()
                .enumerate()
                .map(|(bin, &count)| BinCount {
                    bin,
                    label: state.bins.label(bin).to_string(),
                    count,
                })
                .collect(),
        };

        if cli.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            print_histogram(&mut out, &report)?;
        }
        Ok(())
    }

    fn print_histogram(out: &mut impl Write, report: &Report) -> Result<()> {
        writeln!(
            out,
            "{} drops, {} rows, seed {} ({} ticks)",
            report.drops, report.rows, report.seed, report.ticks
        )?;

        let max = report.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let width = report.bins.iter().map(|b| b.label.len()).max().unwrap_or(0);
        for b in &report.bins {
            let pct = 100.0 * b.count as f64 / report.drops.max(1) as f64;
            let bar = "#".repeat((b.count * 40 / max) as usize);
            writeln!(
                out,
                "{:>2}  {:<width$}  {:>6}  {:>5.1}%  {}",
                b.bin, b.label, b.count, pct, bar
            )?;
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    cli::run(cli::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
