//! Ball Brawl entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlCanvasElement, MouseEvent};

    use ball_brawl::consts::PALETTE;
    use ball_brawl::driver::client_to_arena;
    use ball_brawl::renderer::{RenderState, VertexCanvas};
    use ball_brawl::{CancelToken, Session, SessionEvent};

    const TOGGLE_RUNNING_LABEL: &str = "Stop balls";
    const TOGGLE_PAUSED_LABEL: &str = "Back to game";

    /// Everything the frame loop and event handlers share
    struct App {
        session: Session,
        canvas: VertexCanvas,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.session.advance(elapsed, &mut self.canvas);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.canvas.vertices()) {
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

        /// Reflect session events in the DOM
        fn sync_dom(&mut self, document: &Document) {
            for event in self.session.drain_events() {
                match event {
                    SessionEvent::BodySelected { id } => {
                        log::debug!("Opening color menu for body {}", id);
                        set_class(document, "color-menu", "modal");
                    }
                    SessionEvent::BodyRecolored { .. } => {
                        set_class(document, "color-menu", "modal hidden");
                    }
                    SessionEvent::Paused => set_text(document, "toggle-btn", TOGGLE_PAUSED_LABEL),
                    SessionEvent::Resumed => set_text(document, "toggle-btn", TOGGLE_RUNNING_LABEL),
                }
            }
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// An event listener that is removed from its target when dropped
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach(
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Option<Self> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .ok()?;
            Some(Self {
                target: target.clone(),
                kind,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    /// Owns the running session's timer and listeners. Dropping it cancels
    /// the frame loop and detaches every handler.
    struct BrowserSession {
        app: Rc<RefCell<App>>,
        token: CancelToken,
        _listeners: Vec<Listener>,
    }

    impl Drop for BrowserSession {
        fn drop(&mut self) {
            self.token.cancel();
            if let Ok(mut app) = self.app.try_borrow_mut() {
                app.session.stop();
            }
            log::info!("Browser session torn down");
        }
    }

    thread_local! {
        static ACTIVE: RefCell<Option<BrowserSession>> = const { RefCell::new(None) };
    }

    /// Tear down the running session (timer + listeners)
    pub fn shutdown() {
        let session = ACTIVE.with(|cell| cell.borrow_mut().take());
        drop(session);
    }

    /// Pointer position over the canvas in arena coordinates
    fn pointer_in_arena(canvas: &HtmlCanvasElement, event: &MouseEvent, arena_size: Vec2) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let offset = Vec2::new(
            (event.client_x() as f64 - rect.left()) as f32,
            (event.client_y() as f64 - rect.top()) as f32,
        );
        let client = Vec2::new(rect.width() as f32, rect.height() as f32);
        client_to_arena(offset, client, arena_size)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Ball Brawl starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed);
        let arena_size = session.arena().size();
        canvas.set_width(arena_size.x as u32);
        canvas.set_height(arena_size.y as u32);

        let token = session.cancel_token();
        let app = Rc::new(RefCell::new(App {
            session,
            canvas: VertexCanvas::new(),
            render_state: None,
            last_time: 0.0,
        }));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                match instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await
                {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let size = (arena_size.x as u32, arena_size.y as u32);
                        match RenderState::new(surface, &adapter, size.0, size.1, (arena_size.x, arena_size.y)).await {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("No suitable adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        let listeners = setup_listeners(&document, &canvas, app.clone(), arena_size);

        ACTIVE.with(|cell| {
            *cell.borrow_mut() = Some(BrowserSession {
                app: app.clone(),
                token: token.clone(),
                _listeners: listeners,
            });
        });

        request_animation_frame(app, token);
        log::info!("Ball Brawl running!");
    }

    fn setup_listeners(
        document: &Document,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
        arena_size: Vec2,
    ) -> Vec<Listener> {
        let mut listeners = Vec::new();

        // Pointer move - last position wins, read once per tick
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listeners.extend(Listener::attach(canvas, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let pos = pointer_in_arena(&canvas_clone, event, arena_size);
                    app.borrow_mut().session.set_pointer(pos);
                }
            }));
        }

        // Click - select a body for recoloring
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            listeners.extend(Listener::attach(canvas, "click", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let pos = pointer_in_arena(&canvas_clone, event, arena_size);
                    app.borrow_mut().session.click(pos);
                }
            }));
        }

        // Start/stop button
        if let Some(btn) = document.get_element_by_id("toggle-btn") {
            btn.set_text_content(Some(TOGGLE_RUNNING_LABEL));
            let app = app.clone();
            listeners.extend(Listener::attach(&btn, "click", move |_event| {
                app.borrow_mut().session.toggle_active();
            }));
        }

        // Color menu - one button per palette entry
        if let Some(menu) = document.get_element_by_id("color-menu") {
            let _ = menu.set_attribute("class", "modal hidden");
            for (label, color) in PALETTE {
                let Ok(btn) = document.create_element("button") else {
                    continue;
                };
                btn.set_text_content(Some(label));
                let _ = btn.set_attribute("class", "modal__button");
                let _ = btn.set_attribute("data-color", color);
                if menu.append_child(&btn).is_err() {
                    continue;
                }

                let app = app.clone();
                listeners.extend(Listener::attach(&btn, "click", move |_event| {
                    app.borrow_mut().session.recolor_selected(color.into());
                }));
            }
        }

        // Leaving the page ends the session deterministically
        if let Some(window) = web_sys::window() {
            listeners.extend(Listener::attach(&window, "pagehide", move |_event| {
                // Deferred: dropping the session here would drop this closure
                // while it is still running
                let closure = Closure::once_into_js(shutdown);
                if let Some(window) = web_sys::window() {
                    let _ = window.set_timeout_with_callback(closure.unchecked_ref());
                }
            }));
        }

        listeners
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, token: CancelToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, token, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, token: CancelToken, time: f64) {
        if token.is_cancelled() {
            log::info!("Frame loop halted");
            return;
        }

        {
            let mut a = app.borrow_mut();
            a.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.sync_dom(&document);
            }
        }

        request_animation_frame(app, token);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Stop the running session and detach all of its event listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_session() {
    wasm_app::shutdown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ball_brawl::Session;
    use ball_brawl::consts::TICK_RATE;
    use ball_brawl::driver::run_blocking;
    use ball_brawl::renderer::VertexCanvas;

    env_logger::init();
    log::info!("Ball Brawl (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    let mut session = Session::new(seed);
    let mut canvas = VertexCanvas::new();

    // Park the pointer in the middle so the bodies have something to avoid
    let center = session.arena().size() / 2.0;
    session.set_pointer(center);
    if let Some(body) = session.arena().hit_test(center).map(|b| b.id()) {
        log::info!("Body {} starts under the pointer", body);
    }

    run_blocking(&mut session, &mut canvas, 2 * TICK_RATE as u64);
    session.stop();

    for body in session.arena().bodies() {
        log::info!(
            "{} at ({:.1}, {:.1}) moving {:?}",
            body.id(),
            body.pos.x,
            body.pos.y,
            body.vel
        );
    }
    println!(
        "Ran {} ticks, {} frames painted, {} bodies",
        session.arena().time_ticks,
        canvas.frames(),
        session.arena().bodies().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
