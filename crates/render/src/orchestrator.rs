use glam::Vec4;
use lumen_common::EngineConfig;
use lumen_ecs::Registry;
use tracing::{info_span, trace, warn};

use crate::camera::CameraMatrices;
use crate::clock::FrameInfo;
use crate::error::FrameError;
use crate::frame::{FrameRing, FrameToken, SlotBinding};
use crate::presenter::FramePresenter;
use crate::ubo::{DEFAULT_AMBIENT, GlobalUbo, MAX_POINT_LIGHTS, PointLightUniform};

/// Everything a render pass may read while its frame is in flight.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub info: FrameInfo,
    pub ubo: &'a GlobalUbo,
    pub binding: &'a SlotBinding,
    pub registry: &'a Registry,
}

/// Outcome of writing point lights into a uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightAggregate {
    pub written: usize,
    /// Lights past the capacity, dropped in iteration order.
    pub skipped: usize,
}

/// Copy camera matrices and the registry's point lights into `ubo`.
///
/// Lights are taken in entity creation order; once the block is full the
/// rest are skipped.
pub fn aggregate(
    ubo: &mut GlobalUbo,
    camera: &CameraMatrices,
    ambient: Vec4,
    registry: &Registry,
) -> LightAggregate {
    ubo.projection = camera.projection.to_cols_array_2d();
    ubo.view = camera.view.to_cols_array_2d();
    ubo.inverse_view = camera.inverse_view.to_cols_array_2d();
    ubo.ambient_color = ambient.to_array();

    let mut result = LightAggregate::default();
    for view in registry.point_lights() {
        if result.written == MAX_POINT_LIGHTS {
            result.skipped += 1;
            continue;
        }
        ubo.point_lights[result.written] = PointLightUniform {
            position: view.transform.position.extend(1.0).to_array(),
            color: view.color.extend(view.light.intensity).to_array(),
        };
        result.written += 1;
    }
    ubo.point_lights[result.written..].fill(PointLightUniform::default());
    ubo.point_light_count = result.written as i32;
    result
}

/// Drives the frame slot ring: picks the slot for each frame, fills its
/// uniform block and hands it to the render passes.
#[derive(Debug)]
pub struct FrameOrchestrator {
    ring: FrameRing,
    frame_counter: u64,
    ambient: Vec4,
    truncation_reported: bool,
}

impl FrameOrchestrator {
    pub fn new(frames_in_flight: usize) -> Result<Self, FrameError> {
        Ok(Self {
            ring: FrameRing::new(frames_in_flight)?,
            frame_counter: 0,
            ambient: Vec4::from_array(DEFAULT_AMBIENT),
            truncation_reported: false,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, FrameError> {
        Ok(Self::new(config.frames_in_flight)?.with_ambient(Vec4::from_array(config.ambient_color)))
    }

    pub fn with_ambient(mut self, ambient: Vec4) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn frames_in_flight(&self) -> usize {
        self.ring.len()
    }

    /// Number of frames begun so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Slot the next call to [`begin_frame`](Self::begin_frame) will use.
    pub fn next_slot(&self) -> usize {
        self.ring.slot_index_for(self.frame_counter)
    }

    pub fn ring(&self) -> &FrameRing {
        &self.ring
    }

    pub fn ring_mut(&mut self) -> &mut FrameRing {
        &mut self.ring
    }

    /// Aggregate this frame's uniforms into the next slot and mark it in
    /// flight.
    ///
    /// The slot must have been retired by the presentation side; otherwise
    /// this returns [`FrameError::SlotInFlight`] and the frame counter does
    /// not advance.
    pub fn begin_frame(
        &mut self,
        camera: &CameraMatrices,
        registry: &Registry,
        frame_time: f32,
    ) -> Result<FrameToken, FrameError> {
        let frame_number = self.frame_counter;
        let slot_index = self.ring.slot_index_for(frame_number);
        let _span = info_span!("begin_frame", frame = frame_number, slot = slot_index).entered();

        let ubo = self.ring.begin_write(slot_index, frame_number)?;
        let lights = aggregate(ubo, camera, self.ambient, registry);
        let token = self.ring.submit(slot_index, frame_time)?;
        self.frame_counter += 1;

        if lights.skipped > 0 && !self.truncation_reported {
            warn!(
                written = lights.written,
                skipped = lights.skipped,
                "more point lights than the uniform block holds; extra lights are ignored"
            );
            self.truncation_reported = true;
        }
        trace!(lights = lights.written, "frame aggregated");
        Ok(token)
    }

    /// Read view of an in-flight frame for the render passes.
    pub fn context<'a>(
        &'a self,
        token: &FrameToken,
        registry: &'a Registry,
    ) -> Result<FrameContext<'a>, FrameError> {
        let slot = self.ring.in_flight_slot(token)?;
        Ok(FrameContext {
            info: FrameInfo {
                frame_number: token.frame_number(),
                slot_index: slot.index(),
                frame_time: slot.frame_time(),
            },
            ubo: slot.ubo(),
            binding: slot.binding(),
            registry,
        })
    }

    /// Wait for the next slot through `presenter`, then begin the frame.
    pub fn acquire<P: FramePresenter + ?Sized>(
        &mut self,
        presenter: &mut P,
        camera: &CameraMatrices,
        registry: &Registry,
        frame_time: f32,
    ) -> Result<FrameToken, FrameError> {
        let slot = self.next_slot();
        presenter.wait_for_slot(&mut self.ring, slot)?;
        self.begin_frame(camera, registry, frame_time)
    }
}
