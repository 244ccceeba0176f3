//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::color::srgb_to_linear;
use super::vertex::{Vertex, colors};

/// GPU state for drawing the arena onto a surface
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Vertex buffer from the last non-empty frame, grown on demand
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    /// Scratch space for NDC vertices, reused across frames
    scratch: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Arena extent (width, height) for coordinate mapping
    pub arena_size: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        arena_size: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("arena"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        log::info!("Arena surface format: {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = circle_pipeline(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer: None,
            vertex_count: 0,
            scratch: Vec::new(),
            size: (width, height),
            arena_size,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Map arena-space vertices to NDC and copy them to the GPU
    fn upload(&mut self, vertices: &[Vertex]) {
        self.scratch.clear();
        self.scratch.extend(vertices.iter().map(|v| {
            let [x, y] = arena_to_ndc(v.position, self.arena_size, self.size);
            v.moved_to(x, y)
        }));
        self.vertex_count = self.scratch.len() as u32;
        if self.scratch.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(&self.scratch);
        if let Some(buffer) = self
            .vertex_buffer
            .as_ref()
            .filter(|b| b.size() >= bytes.len() as u64)
        {
            self.queue.write_buffer(buffer, 0, bytes);
            return;
        }
        self.vertex_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("circles"),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            },
        ));
    }

    /// Clear to the background and draw one frame of circles
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("arena"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = self.vertex_buffer.as_ref().filter(|_| self.vertex_count > 0) {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }
}

/// Arena background as a linear clear color
fn background() -> wgpu::Color {
    let [r, g, b, a] = srgb_to_linear(colors::BACKGROUND).map(f64::from);
    wgpu::Color { r, g, b, a }
}

/// Alpha-blended triangle list pipeline for filled circles
fn circle_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("circles"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("circles"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Fans are wound either way depending on y-flip, so no culling
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Map arena coordinates (y down, origin top-left) to normalized device
/// coordinates, letterboxing so the arena keeps its aspect ratio
pub fn arena_to_ndc(pos: [f32; 2], arena_size: (f32, f32), viewport: (u32, u32)) -> [f32; 2] {
    let (aw, ah) = arena_size;
    let view_aspect = viewport.0 as f32 / viewport.1.max(1) as f32;
    let arena_aspect = aw / ah;

    let (sx, sy) = if view_aspect > arena_aspect {
        (arena_aspect / view_aspect, 1.0)
    } else {
        (1.0, view_aspect / arena_aspect)
    };

    let x = (pos[0] / aw * 2.0 - 1.0) * sx;
    let y = (1.0 - pos[1] / ah * 2.0) * sy;
    [x, y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_corners_map_to_ndc_corners() {
        let arena = (500.0, 500.0);
        assert_eq!(arena_to_ndc([0.0, 0.0], arena, (500, 500)), [-1.0, 1.0]);
        assert_eq!(arena_to_ndc([500.0, 500.0], arena, (500, 500)), [1.0, -1.0]);
        assert_eq!(arena_to_ndc([250.0, 250.0], arena, (1000, 1000)), [0.0, 0.0]);
    }

    #[test]
    fn test_background_is_opaque_linear() {
        let color = background();
        assert_eq!(color.a, 1.0);
        // Linearizing darkens mid-range channels
        assert!(color.r < f64::from(colors::BACKGROUND[0]));
    }

    #[test]
    fn test_wide_viewport_letterboxes_horizontally() {
        let [x, y] = arena_to_ndc([500.0, 0.0], (500.0, 500.0), (1000, 500));
        assert!((x - 0.5).abs() < 1e-6);
        assert_eq!(y, 1.0);
    }
}
