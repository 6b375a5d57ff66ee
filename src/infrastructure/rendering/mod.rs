//! Rendering of the generated Python modules

pub mod template_renderer;

pub use template_renderer::TeraModuleRenderer;
