use bounce_engine::systems::render::build_render_buffer;
use bounce_engine::{
    AssetError, EngineContext, FixedTimestep, Game, GameConfig, Input, InputEvent, InputQueue,
    LoadQueue, LoadReport, RenderBuffer,
};

/// Where the runner is in the scene lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; `boot` not called yet.
    Idle,
    /// `preload` ran; waiting for the host to report assets.
    Loading,
    /// `create` ran; frames are ticking.
    Running,
    /// `shutdown` ran; frames are ignored.
    Stopped,
}

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    queue: InputQueue,
    input: Input,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    phase: Phase,
    manifest_json: String,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            queue: InputQueue::new(),
            input: Input::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep: FixedTimestep::new(config.fixed_dt, config.max_steps_per_frame),
            config,
            game,
            phase: Phase::Idle,
            manifest_json: String::from(r#"{"assets":[]}"#),
        }
    }

    /// Run `preload`. Starts the scene straight away if nothing needs loading.
    pub fn boot(&mut self) {
        if self.phase != Phase::Idle {
            log::warn!("runner: boot called twice, ignoring");
            return;
        }
        let mut load = LoadQueue::new();
        self.game.preload(&mut load);
        self.ctx.assets.expect(load.entries());

        let manifest = load.into_manifest();
        match manifest.to_json() {
            Ok(json) => self.manifest_json = json,
            Err(e) => log::error!("runner: could not serialize load manifest: {}", e),
        }
        log::info!("runner: preload declared {} asset(s)", manifest.assets.len());

        self.phase = Phase::Loading;
        self.start_if_settled();
    }

    /// JSON list of assets the host has to fetch.
    pub fn manifest_json(&self) -> &str {
        &self.manifest_json
    }

    pub fn image_loaded(&mut self, key: &str, width: u32, height: u32) {
        if let Err(e) = self.ctx.assets.mark_loaded(key, width, height) {
            log::warn!("runner: {}", e);
        }
        self.start_if_settled();
    }

    pub fn image_failed(&mut self, key: &str) {
        if let Err(e) = self.ctx.assets.mark_failed(key) {
            log::warn!("runner: {}", e);
        }
        self.start_if_settled();
    }

    /// Apply a whole JSON load report from the host.
    pub fn apply_load_report(&mut self, json: &str) -> Result<(), AssetError> {
        let report = LoadReport::from_json(json)?;
        for e in self.ctx.assets.apply_report(&report) {
            log::warn!("runner: {}", e);
        }
        self.start_if_settled();
        Ok(())
    }

    fn start_if_settled(&mut self) {
        if self.phase != Phase::Loading || !self.ctx.assets.is_settled() {
            return;
        }
        self.game.create(&mut self.ctx);
        self.timestep.reset();
        self.phase = Phase::Running;
        log::info!("runner: scene created with {} entities", self.ctx.scene.len());
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Run one frame: resolve input, run fixed steps of update + physics, build the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if self.phase != Phase::Running {
            return;
        }

        // Frames too short to step leave their events queued for the next one.
        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            let events = self.queue.drain();
            self.input.begin_frame(events, &self.ctx.scene);
            for _ in 0..steps {
                self.game.update(&mut self.ctx, &self.input);
                self.ctx.step_physics();
                // Catch-up steps see held keys only.
                self.input.end_frame();
            }
        }

        build_render_buffer(self.ctx.scene.by_depth(), &mut self.render_buffer);
    }

    /// Tear the scene down. The runner ignores ticks afterwards.
    pub fn shutdown(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        if self.phase == Phase::Running {
            self.game.shutdown(&mut self.ctx);
        }
        self.ctx.clear();
        self.input.reset();
        self.queue.drain();
        self.render_buffer.clear();
        self.phase = Phase::Stopped;
        log::info!("runner: scene shut down");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Accessors for the TypeScript side ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn labels_json(&self) -> String {
        self.render_buffer.labels_json()
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }
}
