pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{Color, EntityId};
pub use assets::AssetError;
pub use assets::cache::{AssetCache, MISSING_IMAGE_SIZE};
pub use assets::loader::LoadQueue;
pub use assets::manifest::{LoadManifest, LoadReport};
pub use components::entity::{Entity, Visual};
pub use components::text::{TextAlign, TextStyle};
pub use crate::core::physics::{ArcadeBody, CollisionPair, PhysicsBody, PhysicsWorld, WorldBounds};
pub use crate::core::scene::Scene;
pub use crate::core::time::FixedTimestep;
pub use input::Input;
pub use input::keyboard::{key_codes, CursorKeys, KeyBinding, Keyboard};
pub use input::pointer::{HitArea, PointerSignal, PointerSignalKind};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{RenderBuffer, RenderInstance, RenderLabel};
