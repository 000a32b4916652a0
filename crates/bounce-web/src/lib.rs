pub mod runner;

pub use bounce_engine;
pub use runner::{GameRunner, Phase};

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` and `start_runner()` helpers, usable by extra exports in the game crate
/// - the lifecycle, asset, input and render buffer exports
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyScene;
///
/// bounce_web::export_game!(MyScene, "my-scene");
/// ```
///
/// The game crate must depend on `wasm-bindgen`, `log`, `console_log` and
/// `console_error_panic_hook`. `$game_type` must provide `fn new() -> Self`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use $crate::bounce_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Run `f` against the live runner. Returns `None` (and logs) before `game_init`.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::error!("{}: not initialized, call game_init() first", $game_name);
                        None
                    }
                }
            })
        }

        fn init_logging() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        /// Replace any running scene with `game` and boot it.
        fn start_runner(game: $game_type) {
            init_logging();
            RUNNER.with(|cell| {
                let mut slot = cell.borrow_mut();
                if let Some(old) = slot.as_mut() {
                    old.shutdown();
                }
                let mut runner = $crate::GameRunner::new(game);
                runner.boot();
                *slot = Some(runner);
            });
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_init() {
            start_runner(<$game_type>::new());
        }

        #[wasm_bindgen]
        pub fn game_shutdown() {
            with_runner(|r| r.shutdown());
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Assets ----

        /// JSON `{ "assets": [{ key, url, kind }] }` the host must fetch.
        #[wasm_bindgen]
        pub fn game_pending_assets() -> String {
            with_runner(|r| r.manifest_json().to_string()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn game_image_loaded(key: &str, width: u32, height: u32) {
            with_runner(|r| r.image_loaded(key, width, height));
        }

        #[wasm_bindgen]
        pub fn game_image_failed(key: &str) {
            with_runner(|r| r.image_failed(key));
        }

        /// Apply a whole load report. Returns false if the JSON was rejected.
        #[wasm_bindgen]
        pub fn game_load_report(json: &str) -> bool {
            with_runner(|r| match r.apply_load_report(json) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("{}: load report rejected: {}", $game_name, e);
                    false
                }
            })
            .unwrap_or(false)
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn game_pointer_down(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { id, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { id, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { id, x, y }));
        }

        /// Pointer left the canvas, or a touch ended or was cancelled.
        #[wasm_bindgen]
        pub fn game_pointer_leave(id: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerLeave { id }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_blur() {
            with_runner(|r| r.push_input(InputEvent::Blur));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_instance_floats() -> u32 {
            $crate::bounce_engine::RenderInstance::FLOATS as u32
        }

        /// JSON array of labels referenced by instance `label` indices.
        #[wasm_bindgen]
        pub fn get_labels_json() -> String {
            with_runner(|r| r.labels_json()).unwrap_or_else(|| String::from("[]"))
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        /// 0 idle, 1 loading, 2 running, 3 stopped.
        #[wasm_bindgen]
        pub fn get_phase() -> u32 {
            with_runner(|r| r.phase() as u32).unwrap_or(0)
        }
    };
}
