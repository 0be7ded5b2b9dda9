//! Canvas 2D backend

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::DrawCmd;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::platform::assets::LoadedImages;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: LoadedImages,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, images: LoadedImages) -> Result<Self, String> {
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("get_context failed: {e:?}"))?
            .ok_or_else(|| "2d context unavailable".to_string())?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "not a 2d context".to_string())?;
        Ok(Self { ctx, images })
    }

    /// Clear and draw one frame
    pub fn draw(&self, cmds: &[DrawCmd]) {
        self.ctx
            .clear_rect(0.0, 0.0, ARENA_WIDTH as f64, ARENA_HEIGHT as f64);

        for cmd in cmds {
            match *cmd {
                DrawCmd::Fill { rect, color } => {
                    self.ctx.set_fill_style_str(color.css());
                    self.ctx.fill_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::Sprite { rect, sprite } => {
                    if let Some(image) = self.images.images.get(&sprite) {
                        if let Err(e) = self
                            .ctx
                            .draw_image_with_html_image_element_and_dw_and_dh(
                                image,
                                rect.pos.x as f64,
                                rect.pos.y as f64,
                                rect.size.x as f64,
                                rect.size.y as f64,
                            )
                        {
                            log::warn!("drawImage failed: {:?}", e);
                        }
                    }
                }
            }
        }
    }
}
