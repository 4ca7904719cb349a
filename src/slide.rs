use raylib::prelude::*;
use crate::layout::fit_scale;

/// A decoded slide image ready to be painted.
pub struct Slide {
    image: Texture2D,
}

impl Slide {
    pub fn new(image: Texture2D) -> Self {
        Self { image }
    }

    /// Draws the image centered in the view, shrunk to fit, at `alpha` opacity.
    pub fn draw(&self, d: &mut RaylibDrawHandle, view_width: f32, view_height: f32, alpha: f32) {
        let tex_width = self.image.width() as f32;
        let tex_height = self.image.height() as f32;

        let scale = fit_scale(tex_width, tex_height, view_width, view_height);
        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        let dest = Rectangle::new(
            (view_width - scaled_width) * 0.5,
            (view_height - scaled_height) * 0.5,
            scaled_width,
            scaled_height,
        );
        let tint = Color::new(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0) as u8);

        d.draw_texture_pro(
            &self.image,
            Rectangle::new(0.0, 0.0, tex_width, tex_height), // Source rect uses original texture size
            dest,
            Vector2::new(0.0, 0.0),
            0.0,
            tint,
        );
    }
}
