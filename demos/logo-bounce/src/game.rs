use bounce_engine::api::game::GameConfig;
use bounce_engine::*;
use glam::Vec2;

use crate::tuning::{Revision, Tuning};

const WORLD_W: f32 = 1024.0;
const WORLD_H: f32 = 768.0;

const BACKGROUND_POS: Vec2 = Vec2::new(512.0, 384.0);
const LOGO_POS: Vec2 = Vec2::new(512.0, 350.0);
const LOGO_SCALE: f32 = 0.5;
const TEXT_POS: Vec2 = Vec2::new(512.0, 490.0);
const BODY_DEPTH: f32 = 100.0;
const LABEL: &str = "サッカーやろうぜ!\n俺がボールな!";

const BUTTON_RADIUS: f32 = 60.0;
const BUTTON_ALPHA: f32 = 0.5;
const BUTTON_DEPTH: f32 = 200.0;
const LEFT_BUTTON_POS: Vec2 = Vec2::new(120.0, 648.0);
const RIGHT_BUTTON_POS: Vec2 = Vec2::new(904.0, 648.0);

/// Movement requested through the on-screen buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

/// What the logo does this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Jump,
    Left,
    Right,
    Idle,
}

/// First match wins: jump, then left, then right.
/// Holding both buttons is a jump, not a cancel.
pub fn steer(jump_key: bool, left_key: bool, right_key: bool, intent: MoveIntent) -> Steer {
    if jump_key || (intent.left && intent.right) {
        Steer::Jump
    } else if left_key || intent.left {
        Steer::Left
    } else if right_key || intent.right {
        Steer::Right
    } else {
        Steer::Idle
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchButtons {
    left: EntityId,
    right: EntityId,
}

/// The scene: a bouncing logo you steer, and a text label it can knock around.
pub struct GameScene {
    tuning: Tuning,
    logo: Option<EntityId>,
    text: Option<EntityId>,
    cursors: Option<CursorKeys>,
    buttons: Option<TouchButtons>,
    intent: MoveIntent,
}

impl GameScene {
    pub fn new() -> Self {
        Self::from_revision(Revision::default())
    }

    pub fn from_revision(revision: Revision) -> Self {
        Self::from_tuning(Tuning::for_revision(revision))
    }

    pub fn from_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            logo: None,
            text: None,
            cursors: None,
            buttons: None,
            intent: MoveIntent::default(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn logo(&self) -> Option<EntityId> {
        self.logo
    }

    pub fn text(&self) -> Option<EntityId> {
        self.text
    }

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    fn spawn_button(ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let id = ctx.add_circle(pos, BUTTON_RADIUS, Color::WHITE, BUTTON_ALPHA);
        ctx.set_depth(id, BUTTON_DEPTH);
        ctx.set_interactive(id);
        id
    }

    /// Press latches an intent; release and drag-out clear it.
    fn apply_button_signals(&mut self, input: &Input) {
        let Some(buttons) = self.buttons else {
            return;
        };
        let targets = [
            (buttons.left, &mut self.intent.left),
            (buttons.right, &mut self.intent.right),
        ];
        for (button, flag) in targets {
            for signal in input.signals_for(button) {
                match signal.kind {
                    PointerSignalKind::Down => *flag = true,
                    PointerSignalKind::Up | PointerSignalKind::Out => *flag = false,
                    PointerSignalKind::Over => {}
                }
            }
        }
    }
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GameScene {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            world_width: WORLD_W,
            world_height: WORLD_H,
            gravity: Vec2::new(0.0, 300.0),
            ..GameConfig::default()
        }
    }

    fn preload(&mut self, load: &mut LoadQueue) {
        load.set_path("assets");
        for (key, file) in [("background", "bg.png"), ("logo", "logo.png")] {
            if let Err(e) = load.image(key, file) {
                log::warn!("logo-bounce: {}", e);
            }
        }
    }

    fn create(&mut self, ctx: &mut EngineContext) {
        ctx.add_image(BACKGROUND_POS, "background");

        let logo = ctx.add_physics_image(LOGO_POS, "logo", LOGO_SCALE);
        ctx.set_depth(logo, BODY_DEPTH);
        ctx.set_bounce(logo, self.tuning.logo_bounce);
        ctx.set_collide_world_bounds(logo, true);

        let style = TextStyle::new("Arial Black", 38.0)
            .with_color(Color::WHITE)
            .with_stroke(Color::BLACK, 8.0)
            .with_align(TextAlign::Center);
        let text = ctx.add_text(TEXT_POS, LABEL, style);
        ctx.set_origin(text, Vec2::splat(0.5));
        ctx.set_depth(text, BODY_DEPTH);
        ctx.enable_body(text);
        ctx.set_bounce(text, self.tuning.text_bounce);
        ctx.set_collide_world_bounds(text, true);

        ctx.add_collider(logo, text);

        self.logo = Some(logo);
        self.text = Some(text);
        self.cursors = Some(CursorKeys::default());
        self.intent = MoveIntent::default();

        if self.tuning.touch_buttons {
            self.buttons = Some(TouchButtons {
                left: Self::spawn_button(ctx, LEFT_BUTTON_POS),
                right: Self::spawn_button(ctx, RIGHT_BUTTON_POS),
            });
        }

        log::info!(
            "logo-bounce: scene ready (speed {}, buttons {})",
            self.tuning.run_speed,
            self.tuning.touch_buttons
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &Input) {
        self.apply_button_signals(input);

        let (Some(cursors), Some(logo)) = (self.cursors, self.logo) else {
            return;
        };
        if !ctx.has_body(logo) {
            return;
        }

        if self.tuning.tap_to_jump && input.any_pointer_down() {
            ctx.set_velocity_y(logo, self.tuning.jump_velocity);
            if let Some(text) = self.text {
                ctx.set_velocity_y(text, self.tuning.jump_velocity);
            }
        }

        let keyboard = input.keyboard();
        let jump_key = self.tuning.keyboard_jump && cursors.up.is_down(keyboard);
        match steer(jump_key, cursors.left.is_down(keyboard), cursors.right.is_down(keyboard), self.intent) {
            Steer::Jump => ctx.set_velocity_y(logo, self.tuning.jump_velocity),
            Steer::Left => ctx.set_velocity_x(logo, -self.tuning.run_speed),
            Steer::Right => ctx.set_velocity_x(logo, self.tuning.run_speed),
            Steer::Idle => ctx.set_velocity_x(logo, 0.0),
        }
    }

    fn shutdown(&mut self, _ctx: &mut EngineContext) {
        self.logo = None;
        self.text = None;
        self.cursors = None;
        self.buttons = None;
        self.intent = MoveIntent::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        scene: GameScene,
        ctx: EngineContext,
        input: Input,
    }

    impl Harness {
        fn new(revision: Revision) -> Self {
            let mut scene = GameScene::from_revision(revision);
            let mut ctx = EngineContext::from_config(&scene.config());
            let mut load = LoadQueue::new();
            scene.preload(&mut load);
            ctx.assets.expect(load.entries());
            ctx.assets.mark_loaded("background", 1024, 768).unwrap();
            ctx.assets.mark_loaded("logo", 400, 200).unwrap();
            scene.create(&mut ctx);
            Self { scene, ctx, input: Input::new() }
        }

        /// One `update` with `events` delivered, no physics step.
        fn frame(&mut self, events: Vec<InputEvent>) {
            self.input.begin_frame(events, &self.ctx.scene);
            self.scene.update(&mut self.ctx, &self.input);
            self.input.end_frame();
        }

        fn logo_velocity(&self) -> Vec2 {
            self.ctx.velocity(self.scene.logo().unwrap())
        }
    }

    fn key_down(key_code: u32) -> InputEvent {
        InputEvent::KeyDown { key_code }
    }

    fn press(id: u32, at: Vec2) -> InputEvent {
        InputEvent::PointerDown { id, x: at.x, y: at.y }
    }

    fn release(id: u32, at: Vec2) -> InputEvent {
        InputEvent::PointerUp { id, x: at.x, y: at.y }
    }

    #[test]
    fn preload_declares_both_images() {
        let mut load = LoadQueue::new();
        GameScene::new().preload(&mut load);
        let urls: Vec<&str> = load.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["assets/bg.png", "assets/logo.png"]);
    }

    #[test]
    fn preloading_twice_keeps_the_first_declarations() {
        let mut scene = GameScene::new();
        let mut load = LoadQueue::new();
        scene.preload(&mut load);
        scene.preload(&mut load);
        assert_eq!(load.entries().len(), 2);
    }

    #[test]
    fn create_builds_the_scene() {
        let h = Harness::new(Revision::Touch);
        let logo = h.ctx.scene.get(h.scene.logo().unwrap()).unwrap();
        let text = h.ctx.scene.get(h.scene.text().unwrap()).unwrap();

        assert_eq!(logo.center(), LOGO_POS);
        assert_eq!(logo.display_size(), Vec2::new(200.0, 100.0));
        assert_eq!(logo.depth, BODY_DEPTH);
        assert_eq!(text.center(), TEXT_POS);
        assert_eq!(text.depth, BODY_DEPTH);

        let physics = &h.ctx.physics;
        assert_eq!(physics.bounce(logo.body.as_ref().unwrap()), Some(0.6));
        assert_eq!(physics.bounce(text.body.as_ref().unwrap()), Some(0.9));
        assert!(physics.collides_world_bounds(logo.id));
        assert!(physics.collides_world_bounds(text.id));
        assert!(physics.has_collider(logo.id, text.id));

        // background, logo, text, two buttons
        assert_eq!(h.ctx.scene.len(), 5);
        assert!(h.ctx.scene.find_by_tag("background").unwrap().body.is_none());
    }

    #[test]
    fn earlier_revisions_have_no_buttons() {
        let h = Harness::new(Revision::Classic);
        assert_eq!(h.ctx.scene.len(), 3);
        let logo = h.ctx.scene.get(h.scene.logo().unwrap()).unwrap();
        assert_eq!(h.ctx.physics.bounce(logo.body.as_ref().unwrap()), Some(0.8));
    }

    #[test]
    fn no_input_stops_horizontal_motion() {
        let mut h = Harness::new(Revision::Touch);
        h.ctx.set_velocity(h.scene.logo().unwrap(), Vec2::new(123.0, 0.0));
        h.frame(Vec::new());
        assert_eq!(h.logo_velocity().x, 0.0);
    }

    #[test]
    fn arrow_keys_set_run_speed() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![key_down(key_codes::LEFT)]);
        assert_eq!(h.logo_velocity().x, -300.0);

        h.frame(vec![InputEvent::KeyUp { key_code: key_codes::LEFT }, key_down(key_codes::RIGHT)]);
        assert_eq!(h.logo_velocity().x, 300.0);
    }

    #[test]
    fn classic_runs_slower_and_ignores_up() {
        let mut h = Harness::new(Revision::Classic);
        h.frame(vec![key_down(key_codes::LEFT), key_down(key_codes::UP)]);
        let v = h.logo_velocity();
        assert_eq!(v.x, -200.0);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn up_jumps_with_priority_over_left() {
        let mut h = Harness::new(Revision::Jump);
        h.ctx.set_velocity_x(h.scene.logo().unwrap(), 50.0);
        h.frame(vec![key_down(key_codes::UP), key_down(key_codes::LEFT)]);
        let v = h.logo_velocity();
        assert_eq!(v.y, -400.0);
        assert_eq!(v.x, 50.0);
    }

    #[test]
    fn left_button_moves_until_released() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(1, LEFT_BUTTON_POS)]);
        assert!(h.scene.intent().left);
        assert_eq!(h.logo_velocity().x, -300.0);

        // Held: still moving on a frame with no events.
        h.frame(Vec::new());
        assert_eq!(h.logo_velocity().x, -300.0);

        h.frame(vec![release(1, LEFT_BUTTON_POS)]);
        assert!(!h.scene.intent().left);
        assert_eq!(h.logo_velocity().x, 0.0);
    }

    #[test]
    fn dragging_off_a_button_clears_it() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(1, RIGHT_BUTTON_POS)]);
        assert_eq!(h.logo_velocity().x, 300.0);

        h.frame(vec![InputEvent::PointerMove { id: 1, x: 600.0, y: 100.0 }]);
        assert!(!h.scene.intent().right);
        assert_eq!(h.logo_velocity().x, 0.0);
    }

    #[test]
    fn touch_ending_off_canvas_clears_intent() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(2, LEFT_BUTTON_POS)]);
        h.frame(vec![InputEvent::PointerLeave { id: 2 }]);
        assert_eq!(h.scene.intent(), MoveIntent::default());
    }

    #[test]
    fn both_buttons_jump_instead_of_cancelling() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(1, LEFT_BUTTON_POS), press(2, RIGHT_BUTTON_POS)]);
        let v = h.logo_velocity();
        assert_eq!(v.y, -400.0);
        assert_eq!(v.x, 0.0);
    }

    #[test]
    fn tap_anywhere_jumps_logo_and_text_in_classic() {
        let mut h = Harness::new(Revision::Classic);
        h.frame(vec![press(0, Vec2::new(900.0, 50.0))]);
        assert_eq!(h.logo_velocity().y, -400.0);
        assert_eq!(h.ctx.velocity(h.scene.text().unwrap()).y, -400.0);
    }

    #[test]
    fn tap_outside_buttons_does_nothing_in_touch() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(0, Vec2::new(900.0, 50.0))]);
        assert_eq!(h.logo_velocity(), Vec2::ZERO);
        assert_eq!(h.scene.intent(), MoveIntent::default());
    }

    #[test]
    fn update_before_create_is_a_no_op() {
        let mut scene = GameScene::new();
        let mut ctx = EngineContext::new();
        let scene_entities = ctx.scene.len();
        let mut input = Input::new();
        input.begin_frame(vec![key_down(key_codes::LEFT)], &ctx.scene);
        scene.update(&mut ctx, &input);
        assert_eq!(ctx.scene.len(), scene_entities);
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn update_without_logo_body_mutates_nothing() {
        let mut h = Harness::new(Revision::Jump);
        h.ctx.despawn(h.scene.logo().unwrap());
        h.frame(vec![key_down(key_codes::UP), press(0, Vec2::new(10.0, 10.0))]);
        assert_eq!(h.ctx.velocity(h.scene.text().unwrap()), Vec2::ZERO);
    }

    #[test]
    fn shutdown_forgets_handles() {
        let mut h = Harness::new(Revision::Touch);
        h.frame(vec![press(1, LEFT_BUTTON_POS)]);
        h.scene.shutdown(&mut h.ctx);
        assert_eq!(h.scene.logo(), None);
        assert_eq!(h.scene.intent(), MoveIntent::default());
    }

    #[test]
    fn logo_stays_inside_world_bounds() {
        let mut h = Harness::new(Revision::Touch);
        let logo = h.scene.logo().unwrap();
        for _ in 0..600 {
            h.frame(vec![key_down(key_codes::RIGHT)]);
            h.ctx.step_physics();
        }
        let entity = h.ctx.scene.get(logo).unwrap();
        let right_edge = entity.center().x + entity.display_size().x / 2.0;
        assert!(right_edge <= WORLD_W + 6.0, "logo escaped: right edge {}", right_edge);
    }

    #[test]
    fn steer_priorities() {
        let none = MoveIntent::default();
        let both = MoveIntent { left: true, right: true };
        assert_eq!(steer(false, false, false, none), Steer::Idle);
        assert_eq!(steer(false, true, true, none), Steer::Left);
        assert_eq!(steer(false, false, true, none), Steer::Right);
        assert_eq!(steer(true, true, false, none), Steer::Jump);
        assert_eq!(steer(false, false, false, both), Steer::Jump);
        assert_eq!(steer(false, false, false, MoveIntent { left: false, right: true }), Steer::Right);
    }
}
