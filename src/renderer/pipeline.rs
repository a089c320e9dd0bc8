//! WebGPU render state
//!
//! One flat-color pipeline draws the whole board. Scene vertices arrive in
//! board space and are letterboxed into NDC on upload, so the shader never
//! needs a uniform.

use glam::Vec2;

use super::vertex::Vertex;
use crate::colors::palette;
use crate::error::Result;
use crate::ui::Letterbox;

/// Vertex capacity of the first buffer; the default board needs a few thousand
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Main render state
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the current buffer can hold
    vertex_capacity: usize,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Board → screen mapping for the current size and view
    pub letterbox: Letterbox,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        view: Vec2,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("plinko-device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        // Vertex colors are linear, so prefer an sRGB target
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        log::info!("Renderer ready: {}x{} ({:?})", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            size: (width, height),
            letterbox: Letterbox::fit(Vec2::new(width as f32, height as f32), view),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.size = (new_width, new_height);
        self.config.width = new_width;
        self.config.height = new_height;
        self.surface.configure(&self.device, &self.config);
        self.letterbox = Letterbox::fit(
            Vec2::new(new_width as f32, new_height as f32),
            self.letterbox.base,
        );
    }

    /// Change the board-space area that is letterboxed into the window
    pub fn set_view(&mut self, view: Vec2) {
        if view != self.letterbox.base {
            self.letterbox = Letterbox::fit(self.letterbox.screen, view);
        }
    }

    /// Letterbox board-space vertices into NDC, upload them and draw
    pub fn render(&mut self, vertices: &[Vertex]) -> std::result::Result<(), wgpu::SurfaceError> {
        let ndc: Vec<Vertex> = vertices
            .iter()
            .map(|v| Vertex::at(self.letterbox.board_to_ndc(Vec2::from(v.position)), v.color))
            .collect();

        if ndc.len() > self.vertex_capacity {
            self.vertex_capacity = grown_capacity(self.vertex_capacity, ndc.len());
            log::debug!("vertex buffer grown to {} vertices", self.vertex_capacity);
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc));

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("board"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Whatever the board does not cover is letterbox bar
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });

            if !ndc.is_empty() {
                let bytes = (ndc.len() * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress;
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..bytes));
                pass.draw(0..ndc.len() as u32, 0..1);
            }
        }

        self.queue.submit([encoder.finish()]);
        frame.present();

        Ok(())
    }
}

fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("board"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("board"),
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
            // The editor dims the board with a translucent quad
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Triangle list, no culling: shapes are wound either way
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("board vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Smallest power-of-two multiple of `current` that holds `needed` vertices
fn grown_capacity(current: usize, needed: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = palette::BACKGROUND.to_linear().map(f64::from);
    wgpu::Color { r, g, b, a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_doubles_until_it_fits() {
        assert_eq!(grown_capacity(4096, 4097), 8192);
        assert_eq!(grown_capacity(4096, 20_000), 32_768);
        assert_eq!(grown_capacity(4096, 100), 4096);
        assert_eq!(grown_capacity(0, 3), 4);
    }

    #[test]
    fn test_letterbox_bars_use_background() {
        let color = clear_color();
        let [r, g, b, _] = palette::BACKGROUND.to_linear();
        assert_eq!((color.r, color.g, color.b, color.a), (r as f64, g as f64, b as f64, 1.0));
    }
}
