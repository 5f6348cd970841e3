use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Capacity of the point light array in [`GlobalUbo`].
pub const MAX_POINT_LIGHTS: usize = 8;

/// Ambient light used when nothing else is configured. `w` is the intensity.
pub const DEFAULT_AMBIENT: [f32; 4] = [1.0, 1.0, 1.0, 0.05];

/// One point light as laid out in the uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    /// `w` is unused and written as 1.
    pub position: [f32; 4],
    /// `w` carries the intensity.
    pub color: [f32; 4],
}

/// Per-frame uniform block shared by every shading stage.
///
/// std140 layout: three column-major `mat4`, one `vec4`, eight lights of two
/// `vec4` each, then an `int` padded out to a 16-byte boundary (480 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobalUbo {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub inverse_view: [[f32; 4]; 4],
    pub ambient_color: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub point_light_count: i32,
    _pad: [i32; 3],
}

const _: () = assert!(std::mem::size_of::<PointLightUniform>() == 32);
const _: () = assert!(std::mem::size_of::<GlobalUbo>() == 480);
const _: () = assert!(std::mem::offset_of!(GlobalUbo, ambient_color) == 192);
const _: () = assert!(std::mem::offset_of!(GlobalUbo, point_lights) == 208);
const _: () = assert!(std::mem::offset_of!(GlobalUbo, point_light_count) == 464);

impl Default for GlobalUbo {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            projection: identity,
            view: identity,
            inverse_view: identity,
            ambient_color: DEFAULT_AMBIENT,
            point_lights: [PointLightUniform::default(); MAX_POINT_LIGHTS],
            point_light_count: 0,
            _pad: [0; 3],
        }
    }
}

impl GlobalUbo {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    pub fn inverse_view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inverse_view)
    }

    pub fn ambient(&self) -> Vec4 {
        Vec4::from_array(self.ambient_color)
    }

    /// The lights actually written this frame.
    pub fn active_lights(&self) -> &[PointLightUniform] {
        let count = (self.point_light_count.max(0) as usize).min(MAX_POINT_LIGHTS);
        &self.point_lights[..count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_identity_with_dim_white_ambient() {
        let ubo = GlobalUbo::default();
        assert_eq!(ubo.projection(), Mat4::IDENTITY);
        assert_eq!(ubo.inverse_view(), Mat4::IDENTITY);
        assert_eq!(ubo.ambient(), Vec4::new(1.0, 1.0, 1.0, 0.05));
        assert!(ubo.active_lights().is_empty());
    }

    #[test]
    fn bytes_follow_field_order() {
        let mut ubo = GlobalUbo::default();
        ubo.point_light_count = 3;
        ubo.point_lights[0].color = [0.5, 0.25, 1.0, 2.0];
        let bytes = ubo.as_bytes();
        assert_eq!(bytes.len(), 480);

        let count = i32::from_ne_bytes(bytes[464..468].try_into().unwrap());
        assert_eq!(count, 3);
        let intensity = f32::from_ne_bytes(bytes[208 + 28..208 + 32].try_into().unwrap());
        assert_eq!(intensity, 2.0);
        // Projection is column-major: element [3][3] of identity sits at byte 60.
        let w = f32::from_ne_bytes(bytes[60..64].try_into().unwrap());
        assert_eq!(w, 1.0);
    }
}
