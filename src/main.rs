//! Pull Card entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_card {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Event, HtmlCanvasElement, TouchEvent};

    use pull_card::consts::MAX_DT;
    use pull_card::platform::{self, WebEffects, listen, pointer_input};
    use pull_card::renderer::{CordCanvas, DomRenderer};
    use pull_card::sim::{CardSession, CardState, Target, Transition};
    use pull_card::{Layout, ResizeDebounce, Tuning};

    const INTRO_TEXT: &str = "Hi You! Pull the cord.";

    /// Card instance holding all page state
    struct App {
        session: CardSession,
        dom: DomRenderer,
        canvas: Option<CordCanvas>,
        effects: WebEffects,
        resize: ResizeDebounce,
        card: Element,
        last_time: f64,
    }

    impl App {
        fn layout(&self) -> Option<Layout> {
            let viewport = platform::viewport()?;
            Some(Layout::new(viewport, platform::rect_of(&self.card)))
        }

        /// React to a state change caused by input
        fn on_transition(&mut self, transition: Option<Transition>) {
            let Some(transition) = transition else { return };
            if transition.to == CardState::Opened {
                self.dom.add_class(Target::Card, "open");
            }
            self.flush_effects();
        }

        fn flush_effects(&mut self) {
            self.session.drain_effects(&mut self.effects);
        }

        /// Run one animation frame
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            if self.resize.poll(platform::now_ms()).is_some() {
                if let Some(layout) = self.layout() {
                    self.session.on_resize(layout);
                    if let Some(canvas) = &self.canvas {
                        canvas.resize(layout.viewport);
                    }
                }
            }

            let frame = self.session.step(dt.min(MAX_DT));
            self.dom.apply(&frame);
            if let Some(canvas) = &self.canvas {
                canvas.draw(self.session.chain());
            }
            self.flush_effects();
        }
    }

    fn tuning_for(card: &Element) -> Tuning {
        match card.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring bad data-tuning: {e}");
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    fn create_canvas(document: &Document) -> Option<CordCanvas> {
        let container = document.get_element_by_id("canvas-container")?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        container.append_child(&canvas).ok()?;
        CordCanvas::new(canvas)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        // Fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pull Card starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to do");
            return;
        };
        let Some(card) = document.query_selector(".card").ok().flatten() else {
            log::error!("No .card element - nothing to do");
            return;
        };

        if let Some(intro) = document.query_selector(".text-intro").ok().flatten() {
            intro.set_inner_html(INTRO_TEXT);
        }

        let Some(viewport) = platform::viewport() else {
            log::error!("Could not read the viewport size");
            return;
        };
        let layout = Layout::new(viewport, platform::rect_of(&card));
        let seed = js_sys::Date::now() as u64;
        let session = CardSession::create(layout, tuning_for(&card), seed);

        let canvas = create_canvas(&document);
        match &canvas {
            Some(canvas) => canvas.resize(viewport),
            None => log::warn!("No cord canvas - drawing ribbon only"),
        }

        let app = Rc::new(RefCell::new(App {
            session,
            dom: DomRenderer::new(&document),
            canvas,
            effects: WebEffects::default(),
            resize: ResizeDebounce::default(),
            card,
            last_time: 0.0,
        }));

        setup_drag_handlers(&document, app.clone());
        setup_answer_buttons(&document, app.clone());
        setup_resize(app.clone());
        setup_touch_guards(&document, app.clone());

        request_animation_frame(app);

        log::info!("Pull Card running!");
    }

    fn setup_drag_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let Some(plug) = document.query_selector(".plug").ok().flatten() else {
            log::warn!("No .plug element - cord cannot be pulled");
            return;
        };

        let start = {
            let app = app.clone();
            move |event: Event| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let input = pointer_input(&event);
                let transition = a.session.on_drag_start(input.as_ref());
                if a.session.is_dragging() {
                    a.dom.set_cursor(Target::Plug, "grabbing");
                }
                a.on_transition(transition);
            }
        };
        listen(&plug, "mousedown", None, start.clone());
        listen(&plug, "touchstart", Some(false), start);

        let drag = {
            let app = app.clone();
            move |event: Event| {
                let mut a = app.borrow_mut();
                if !a.session.is_dragging() {
                    return;
                }
                event.prevent_default();
                let Some(input) = pointer_input(&event) else { return };
                // Card can move (shake, scroll) so measure it on every move
                let card = platform::rect_of(&a.card);
                a.session.set_card_rect(card);
                let transition = a.session.on_drag_move(&input);
                a.on_transition(transition);
            }
        };
        listen(document, "mousemove", None, drag.clone());
        listen(document, "touchmove", Some(false), drag);

        let end = move |event: Event| {
            let mut a = app.borrow_mut();
            if !a.session.is_dragging() {
                return;
            }
            event.prevent_default();
            let transition = a.session.on_drag_end();
            a.dom.set_cursor(Target::Plug, "grab");
            a.on_transition(transition);
        };
        listen(document, "mouseup", None, end.clone());
        listen(document, "touchend", Some(false), end);
    }

    fn setup_answer_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(yes) = document.query_selector(".buttons .yes").ok().flatten() {
            let affirm = {
                let app = app.clone();
                move |event: Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    let mut a = app.borrow_mut();
                    let transition = a.session.select_affirm();
                    a.on_transition(transition);
                }
            };
            listen(&yes, "click", None, affirm.clone());
            listen(&yes, "touchend", Some(false), affirm);
        } else {
            log::warn!("No yes button");
        }

        let Some(no) = document.query_selector(".buttons .no").ok().flatten() else {
            log::warn!("No no button");
            return;
        };

        // Desktop dodges on hover, mobile on touch before any click can land
        let approach = {
            let app = app.clone();
            let no = no.clone();
            move |_event: Event| {
                let mut a = app.borrow_mut();
                let rect = platform::rect_of(&no);
                a.session.on_approach_decline(rect);
            }
        };
        listen(&no, "mouseenter", None, approach.clone());
        listen(&no, "touchstart", Some(true), approach);

        let decline = move |event: Event| {
            let mut a = app.borrow_mut();
            if !a.session.decline_armed() {
                return;
            }
            event.prevent_default();
            event.stop_propagation();
            let transition = a.session.select_decline();
            a.on_transition(transition);
        };
        listen(&no, "click", None, decline.clone());
        listen(&no, "touchend", Some(false), decline);
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        listen(&window, "resize", None, move |_event: Event| {
            if let Some(viewport) = platform::viewport() {
                app.borrow_mut().resize.notify(platform::now_ms(), viewport);
            }
        });
    }

    fn setup_touch_guards(document: &Document, app: Rc<RefCell<App>>) {
        // Belt and braces for browsers that ignore the drag handler's preventDefault
        {
            let app = app.clone();
            listen(document, "touchmove", Some(false), move |event: Event| {
                if app.borrow().session.should_prevent_default() {
                    event.prevent_default();
                }
            });
        }

        // Pull-to-refresh
        if let Some(body) = document.body() {
            listen(&body, "touchstart", Some(false), move |event: Event| {
                let single = event
                    .dyn_ref::<TouchEvent>()
                    .is_some_and(|t| t.touches().length() == 1);
                if single && platform::scroll_y() == 0.0 {
                    event.prevent_default();
                }
            });
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            card_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn card_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if a.session.is_disposed() {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_card::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pull Card (native) starting...");
    log::info!("The card itself runs in the browser - build for wasm32 and serve the page");

    println!("\nRunning a scripted card session...");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Pull, dodge twenty times, then decline: a smoke run of the whole flow
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use pull_card::sim::{CardSession, CardState, PointerInput, SideEffect};
    use pull_card::{Layout, Rect, Tuning, Viewport};

    const DT: f32 = 1.0 / 60.0;

    let layout = Layout::new(
        Viewport::new(1024.0, 768.0),
        Rect::new(312.0, 200.0, 400.0, 260.0),
    );
    let mut session = CardSession::create(layout, Tuning::default(), 2024);
    let mut effects: Vec<SideEffect> = Vec::new();

    session.on_drag_start(None);
    for i in 0..=40 {
        let y = 350.0 + i as f32 * 4.0;
        session.on_drag_move(&PointerInput::Mouse { x: 512.0, y });
        session.step(DT);
    }
    session.on_drag_end();
    assert_eq!(session.state(), CardState::Opened, "Card should open");
    println!("✓ Card opened after pulling");

    // Hover again a few frames into each slide, as an impatient pointer would
    let base = Rect::new(560.0, 420.0, 90.0, 44.0);
    let mut button = base;
    while let Some(dodge) = session.on_approach_decline(base.translated(session.decline_shown())) {
        button = dodge.rect;
        for _ in 0..8 {
            session.step(DT);
        }
    }
    println!(
        "✓ Decline button dodged {} times, ended at ({:.0}, {:.0})",
        session.dodge_budget().used(),
        button.x,
        button.y
    );

    session.select_decline();
    for _ in 0..120 {
        session.step(DT);
    }
    session.drain_effects(&mut effects);
    assert_eq!(session.state(), CardState::AnsweredSad);
    println!("✓ Answered sad with {} side effects", effects.len());

    session.dispose();
}
