//! Renderer port - HUD フレームの描画先

use crate::app::status::HudFrame;
use crate::error::HudError;

pub trait Renderer {
    fn render(&mut self, frame: &HudFrame) -> Result<(), HudError>;
}
