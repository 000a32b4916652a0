use wasm_bindgen::prelude::*;

mod game;
mod tuning;

pub use game::{steer, GameScene, MoveIntent, Steer};
pub use tuning::{Revision, Tuning, UnknownRevision};

bounce_web::export_game!(GameScene, "logo-bounce");

/// Start a specific revision (`"classic"`, `"jump"` or `"touch"`).
/// An unknown name logs an error and starts the latest revision.
#[wasm_bindgen]
pub fn game_init_revision(name: &str) {
    init_logging();
    let revision = name.parse::<Revision>().unwrap_or_else(|e| {
        log::error!("logo-bounce: {}", e);
        Revision::default()
    });
    start_runner(GameScene::from_revision(revision));
}

/// Start with tuning read from JSON. Missing fields take the latest revision's values;
/// malformed JSON logs an error and uses those values outright.
#[wasm_bindgen]
pub fn game_init_with_tuning(json: &str) {
    init_logging();
    let tuning = Tuning::from_json(json).unwrap_or_else(|e| {
        log::error!("logo-bounce: bad tuning JSON: {}", e);
        Tuning::default()
    });
    start_runner(GameScene::from_tuning(tuning));
}
