pub mod render;
pub mod scene;

pub use render::{RenderStats, SkiaRenderer};
pub use scene::Scene;
