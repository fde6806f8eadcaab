//! "Pretty" image generation to display generated skeletons

use crate::{vec_utils, Beam, Float, Leaf, Skeleton};
use glam::Vec3;
use image::{ImageBuffer, Rgba};
use imageproc::drawing::{self, Blend};

/// Creates a color from the provided RGBA integer
///
/// See also: [`rgb`].
///
/// ## Examples
///
/// ```
/// let transparent = rgba(0x00000000);
/// let green_tint = rgba(0x00ff0077);
/// ```
pub fn rgba(int: u32) -> Color {
    let r = ((int >> 24) & 0xff) as u8;
    let g = ((int >> 16) & 0xff) as u8;
    let b = ((int >> 8) & 0xff) as u8;
    let a = (int & 0xff) as u8;

    Rgba([r, g, b, a])
}

/// Creates a fully opaque color from the provided RGB integer
///
/// See also: [`rgba`].
///
/// ## Panics
///
/// This function panics if the provided integer is greater than `0xffffff`.
pub fn rgb(int: u32) -> Color {
    assert!(int <= 0xffffff);

    rgba((int << 8) + 0xff)
}

/// The color type we're using
pub type Color = Rgba<u8>;

/// Type alias to represent a number of pixels. This is only provided so that the meaning behind
/// types can be more clear.
pub type PixelCount = u32;

/// Orthographic view used to flatten the 3-D skeleton onto the image plane
///
/// The image plane is spanned by the tree's growth direction (vertical) and
/// the deterministic orthogonal resolved from it (horizontal), so the
/// preview always looks at the tree "from the side" no matter which way it
/// was grown.
#[derive(Copy, Clone, Debug)]
pub struct Projection {
    /// World direction mapped to the image's horizontal axis
    side: Vec3,
    /// World direction mapped to the image's vertical axis
    up: Vec3,
}

impl Projection {
    /// Creates the view for a tree grown in the given direction
    ///
    /// ## Panics
    ///
    /// This function panics if `growth_direction` is the zero vector.
    pub fn facing(growth_direction: Vec3) -> Self {
        let up = growth_direction
            .try_normalize()
            .expect("cannot view a tree grown in the zero direction");

        Projection {
            side: vec_utils::orthogonal(up),
            up,
        }
    }

    /// Flattens a world position onto the view plane
    pub fn project(&self, pos: Vec3) -> (Float, Float) {
        (pos.dot(self.side), pos.dot(self.up))
    }
}

/// Configuration items for making an image
#[derive(Debug)]
pub struct ImageConfig {
    /// The view the skeleton is flattened with
    pub projection: Projection,

    /// The projected-plane point at the center of the image
    pub centered_at: (Float, Float),

    /// The width of the produced image
    pub width: PixelCount,
    /// The height of the produced image
    pub height: PixelCount,

    /// The scale at which to produce the image
    ///
    /// This value is equivalent to the pixel size that a region size of 1 unit is converted to.
    pub scale: Float,

    /// Background color of the image
    pub background: Color,
    /// Color of beams
    pub beam_color: Color,
    /// Color of terminal leaf spheres
    pub leaf_color: Color,
}

/// Helper type alias
type ImageCanvas = Blend<ImageBuffer<Color, Vec<u8>>>;

impl ImageConfig {
    /// Creates an `ImageBuffer` representing the provided skeleton, using the available
    /// configuration options
    ///
    /// Beams are drawn in emission order (roots first), so deeper branches
    /// end up painted over their parents.
    pub fn make_image(&self, skeleton: &Skeleton) -> ImageBuffer<Color, Vec<u8>> {
        let mut buf = Blend(ImageBuffer::from_pixel(
            self.width,
            self.height,
            self.background,
        ));

        let ctx = DrawContext {
            bot_left: (
                self.centered_at.0 - (self.width as Float / self.scale / 2.0),
                self.centered_at.1 - (self.height as Float / self.scale / 2.0),
            ),
            scale: self.scale,
            height: self.height,
        };

        for beam in skeleton.beams() {
            self.draw_beam(&mut buf, &ctx, beam);
        }

        for leaf in skeleton.leaves() {
            self.draw_leaf(&mut buf, &ctx, leaf);
        }

        buf.0
    }

    /// Draws a single beam as a tapered quadrilateral
    fn draw_beam(&self, canvas: &mut ImageCanvas, ctx: &DrawContext, beam: &Beam) {
        let (sx, sy) = self.projection.project(beam.start);
        let (ex, ey) = self.projection.project(beam.end);

        let (dx, dy) = (ex - sx, ey - sy);
        let len = (dx * dx + dy * dy).sqrt();

        // A beam seen end-on flattens to (nearly) a point; draw its cross
        // section instead of a degenerate polygon.
        if len * self.scale < 1.0 {
            let radius = beam.start_radius.max(beam.end_radius);
            let radius_px = ((radius * self.scale).round() as i32).max(1);
            drawing::draw_filled_circle_mut(
                canvas,
                ctx.point_to_coords(sx, sy),
                radius_px,
                self.beam_color,
            );
            return;
        }

        // Unit normal of the projected segment; offsetting each endpoint by
        // its own radius produces the taper.
        let (nx, ny) = (-dy / len, dx / len);

        let corners = [
            ctx.point_to_coords(sx + nx * beam.start_radius, sy + ny * beam.start_radius),
            ctx.point_to_coords(sx - nx * beam.start_radius, sy - ny * beam.start_radius),
            ctx.point_to_coords(ex - nx * beam.end_radius, ey - ny * beam.end_radius),
            ctx.point_to_coords(ex + nx * beam.end_radius, ey + ny * beam.end_radius),
        ];

        // `draw_polygon_mut` requires the first and last vertices to differ;
        // rounding can collapse a sub-pixel quad, in which case a plain line
        // is all there is to see anyway.
        if corners[0] == corners[3] {
            let (psx, psy) = ctx.point_to_coords(sx, sy);
            let (pex, pey) = ctx.point_to_coords(ex, ey);
            drawing::draw_line_segment_mut(
                canvas,
                (psx as Float, psy as Float),
                (pex as Float, pey as Float),
                self.beam_color,
            );
            return;
        }

        let poly_points = corners.map(|(x, y)| imageproc::point::Point { x, y });

        drawing::draw_polygon_mut(canvas, &poly_points, self.beam_color);
    }

    /// Draws a terminal leaf sphere as a filled circle
    fn draw_leaf(&self, canvas: &mut ImageCanvas, ctx: &DrawContext, leaf: &Leaf) {
        let (x, y) = self.projection.project(leaf.pos);
        let radius_px = ((leaf.radius * self.scale).round() as i32).max(1);

        drawing::draw_filled_circle_mut(
            canvas,
            ctx.point_to_coords(x, y),
            radius_px,
            self.leaf_color,
        );
    }
}

#[derive(Copy, Clone, Debug)]
struct DrawContext {
    /// The projected-plane point corresponding to the bottom-left corner of the image
    bot_left: (Float, Float),

    /// The amount scale is multiplied, from the projected coordinates to the image itself
    scale: Float,

    /// The height of the image. We need this because drawing has the origin at the top-left
    /// corner, so we need to flip the image to get it at the bottom-left.
    height: PixelCount,
}

impl DrawContext {
    /// Converts a projected point to its corresponding location in the image
    ///
    /// The values returned are signed because it's possible for points outside the image to still
    /// provide value (e.g. as the vertices in a polygon).
    fn point_to_coords(&self, x: Float, y: Float) -> (i32, i32) {
        let px = ((x - self.bot_left.0) * self.scale).round() as i32;
        let py = ((y - self.bot_left.1) * self.scale).round() as i32;
        (px, self.height as i32 - py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_basis_is_orthonormal() {
        let projection = Projection::facing(Vec3::new(0.0, 0.0, 3.0));

        assert!((projection.up.length() - 1.0).abs() < 1e-6);
        assert!((projection.side.length() - 1.0).abs() < 1e-6);
        assert!(projection.up.dot(projection.side).abs() < 1e-6);
    }

    #[test]
    fn growth_direction_maps_to_the_vertical_axis() {
        let direction = Vec3::new(1.0, 2.0, -0.5).normalize();
        let projection = Projection::facing(direction);

        // A point along the growth direction has no horizontal component.
        let (x, y) = projection.project(direction * 7.0);
        assert!(x.abs() < 1e-5);
        assert!((y - 7.0).abs() < 1e-5);
    }
}
