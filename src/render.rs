use crate::camera::Camera;
use crate::constants::{CLEAR_BASE, CLEAR_BREATH_BOOST, MAX_INSTANCES};
use crate::core::{hsl_to_rgb, SceneGraph, BUBBLE_LIGHTNESS, BUBBLE_SATURATION, MATERIAL_OPACITY};
use web_sys as web;

mod bubbles;
mod depth;

use bubbles::{create_bubble_resources, create_instance_buffer, BubbleInstance, BubbleResources, BubbleUniforms};

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    bubbles: BubbleResources,
    instances: Vec<(f32, BubbleInstance)>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    time_accum: f32,
    ambient_energy: f32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let bubbles = create_bubble_resources(&device, format, 256);
        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            bubbles,
            instances: Vec::new(),
            width,
            height,
            clear_color: wgpu::Color::BLACK,
            time_accum: 0.0,
            ambient_energy: 0.0,
        };
        state.set_ambient_clear(0.0);
        Ok(state)
    }

    /// Brighten the backdrop with the breath envelope.
    pub fn set_ambient_clear(&mut self, energy01: f32) {
        let e = energy01.clamp(0.0, 1.0);
        let boost = CLEAR_BREATH_BOOST * e;
        self.clear_color = wgpu::Color {
            r: (CLEAR_BASE[0] + boost * 0.6) as f64,
            g: (CLEAR_BASE[1] + boost * 0.8) as f64,
            b: (CLEAR_BASE[2] + boost) as f64,
            a: 1.0,
        };
        self.ambient_energy = e;
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(
        &mut self,
        dt_sec: f32,
        camera: &Camera,
        scene: &SceneGraph,
    ) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += dt_sec.max(0.0);
        self.pack_instances(camera, scene);

        let count = self.instances.len();
        if count > self.bubbles.instance_capacity {
            let capacity = count.next_power_of_two().min(MAX_INSTANCES);
            self.bubbles.instance_buffer = create_instance_buffer(&self.device, capacity);
            self.bubbles.instance_capacity = capacity;
            log::debug!("[gpu] instance buffer grown to {}", capacity);
        }
        if count > 0 {
            let packed: Vec<BubbleInstance> =
                self.instances[..count].iter().map(|(_, i)| *i).collect();
            self.queue.write_buffer(
                &self.bubbles.instance_buffer,
                0,
                bytemuck::cast_slice(&packed),
            );
        }

        let (right, up) = camera.basis();
        let u = BubbleUniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
            time: self.time_accum,
            ambient: self.ambient_energy,
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.bubbles.uniform_buffer, 0, bytemuck::bytes_of(&u));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bubbles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if count > 0 {
                rpass.set_pipeline(&self.bubbles.pipeline);
                rpass.set_bind_group(0, &self.bubbles.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.bubbles.instance_buffer.slice(..));
                rpass.draw(0..6, 0..count as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl<'a> GpuState<'a> {
    // Transparent films need back-to-front order. Over capacity, the
    // farthest bubbles are the ones left out.
    fn pack_instances(&mut self, camera: &Camera, scene: &SceneGraph) {
        self.instances.clear();
        self.instances.reserve(scene.len());
        for (_, r) in scene.iter() {
            let depth = camera.view_depth(r.position);
            if depth <= camera.znear {
                continue;
            }
            let [cr, cg, cb] = hsl_to_rgb(r.hue, BUBBLE_SATURATION, BUBBLE_LIGHTNESS);
            let age = (1.0 - r.opacity / MATERIAL_OPACITY).clamp(0.0, 1.0);
            self.instances.push((
                depth,
                BubbleInstance {
                    center_radius: [r.position.x, r.position.y, r.position.z, r.radius * r.scale],
                    color_opacity: [cr, cg, cb, r.opacity],
                    params: [r.rotation.x + r.rotation.y, age, 0.0, 0.0],
                },
            ));
        }
        depth::nearest_back_to_front(&mut self.instances, MAX_INSTANCES);
    }
}
