use std::fmt::Write as _;

use glam::{Mat3, Mat4, Vec3, Vec4};
use lumen_common::EntityId;

use crate::orchestrator::FrameContext;

/// A consumer of one in-flight frame. Passes only read the frame; the
/// registry and uniform block are borrowed immutably for the whole call.
pub trait RenderPass {
    type Output;

    fn name(&self) -> &'static str;

    fn render(&self, ctx: &FrameContext<'_>) -> Self::Output;
}

/// One indexed draw of a mesh-carrying entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshDraw {
    pub entity: EntityId,
    /// Model matrix: translate * rotate(Y, X, Z) * scale.
    pub model: Mat4,
    pub normal: Mat3,
    pub index_count: u32,
}

/// Records one draw per entity with a transform and a mesh.
#[derive(Debug, Default)]
pub struct MeshDrawPass;

impl MeshDrawPass {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPass for MeshDrawPass {
    type Output = Vec<MeshDraw>;

    fn name(&self) -> &'static str {
        "mesh"
    }

    fn render(&self, ctx: &FrameContext<'_>) -> Vec<MeshDraw> {
        ctx.registry
            .renderables()
            .map(|(entity, transform, mesh)| MeshDraw {
                entity,
                model: transform.mat4(),
                normal: transform.normal_matrix(),
                index_count: mesh.index_count() as u32,
            })
            .collect()
    }
}

/// Camera-facing quad drawn at a point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBillboard {
    pub entity: EntityId,
    pub position: Vec4,
    /// `w` carries the intensity.
    pub color: Vec4,
    pub radius: f32,
}

/// Emits a billboard for every point light.
#[derive(Debug, Default)]
pub struct BillboardPass;

impl BillboardPass {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPass for BillboardPass {
    type Output = Vec<LightBillboard>;

    fn name(&self) -> &'static str {
        "billboard"
    }

    fn render(&self, ctx: &FrameContext<'_>) -> Vec<LightBillboard> {
        ctx.registry
            .point_lights()
            .map(|view| LightBillboard {
                entity: view.entity,
                position: view.transform.position.extend(1.0),
                color: view.color.extend(view.light.intensity),
                radius: view.transform.scale.x,
            })
            .collect()
    }
}

/// Human-readable summary of a frame, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextPass;

impl DebugTextPass {
    pub fn new() -> Self {
        Self
    }
}

impl RenderPass for DebugTextPass {
    type Output = String;

    fn name(&self) -> &'static str {
        "debug_text"
    }

    fn render(&self, ctx: &FrameContext<'_>) -> String {
        let mut out = String::new();
        let eye: Vec3 = ctx.ubo.inverse_view().w_axis.truncate();
        let _ = writeln!(
            out,
            "=== Frame {} (slot {}, dt={:.4}s) ===",
            ctx.info.frame_number, ctx.info.slot_index, ctx.info.frame_time
        );
        let _ = writeln!(out, "Entities: {}", ctx.registry.len());
        let _ = writeln!(out, "Camera: eye=({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);
        let _ = writeln!(out, "Point lights: {}", ctx.ubo.point_light_count);
        for (entity, transform, mesh) in ctx.registry.renderables() {
            let p = transform.position;
            let _ = writeln!(
                out,
                "  [{entity}] mesh pos=({:.2}, {:.2}, {:.2}) tris={}",
                p.x,
                p.y,
                p.z,
                mesh.triangle_count()
            );
        }
        for light in ctx.ubo.active_lights() {
            let [x, y, z, _] = light.position;
            let [_, _, _, intensity] = light.color;
            let _ = writeln!(
                out,
                "  light pos=({x:.2}, {y:.2}, {z:.2}) intensity={intensity:.2}"
            );
        }
        out
    }
}
