//! Success envelopes and the rendering middleware that applies them

pub mod formatter;
pub mod renderer;
pub mod success;

pub use formatter::{
    format_error, format_success, is_success_envelope, ErrorEnvelope, Meta, SuccessEnvelope,
};
pub use renderer::{render_unified, RenderSettings};
pub use success::ApiSuccess;
