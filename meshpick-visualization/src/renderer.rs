//! wgpu renderer for a [`SceneGraph`] with an egui overlay for text

use crate::scene::{ObjectKind, SceneGraph, Style, TextAnchor};
use crate::shaders::{POINT_SHADER, SCENE_SHADER};
use bytemuck::{Pod, Zeroable};
use meshpick_core::{to_array, Error, Point3f, Result, Vector3f};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const EDGE_COLOR: [f32; 3] = [0.1, 0.1, 0.1];

/// Position and RGBA color of a triangle or line vertex
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColorVertex {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// One point sprite, drawn as an instanced quad
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub color: [f32; 4],
    /// Diameter in pixels
    pub size: f32,
}

impl PointInstance {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    /// Width and height in pixels, then padding
    viewport: [f32; 4],
}

/// Text overlay extracted from the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub text: String,
    pub anchor: TextAnchor,
    pub color: [f32; 3],
    pub background: [f32; 3],
}

/// CPU-side draw lists built from a scene graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGeometry {
    pub opaque: Vec<ColorVertex>,
    pub translucent: Vec<ColorVertex>,
    pub lines: Vec<ColorVertex>,
    pub points: Vec<PointInstance>,
    pub overlays: Vec<Overlay>,
}

impl SceneGeometry {
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let mut geometry = Self::default();
        for (_, object) in graph.iter() {
            let style = &object.style;
            match &object.kind {
                ObjectKind::Mesh(mesh) => {
                    let normals = mesh.calculate_face_normals();
                    let target = if style.opacity < 1.0 {
                        &mut geometry.translucent
                    } else {
                        &mut geometry.opaque
                    };
                    for (face, normal) in mesh.faces.iter().zip(&normals) {
                        let color = rgba(shade(style.color, normal), style.opacity);
                        target.extend(face.iter().map(|&i| ColorVertex {
                            position: to_array(&mesh.vertices[i]),
                            color,
                        }));
                    }
                    if style.show_edges {
                        let color = rgba(EDGE_COLOR, style.opacity);
                        geometry.push_lines(&mesh.vertices, &mesh.edges(), color);
                    }
                }
                ObjectKind::Wireframe { vertices, edges } => {
                    geometry.push_lines(vertices, edges, rgba(style.color, style.opacity));
                }
                ObjectKind::Points(cloud) => {
                    let color = rgba(style.color, style.opacity);
                    geometry.points.extend(cloud.iter().map(|point| PointInstance {
                        position: to_array(point),
                        color,
                        size: style.point_size,
                    }));
                }
                ObjectKind::Text {
                    text,
                    anchor,
                    background,
                } => geometry.overlays.push(Overlay {
                    text: text.clone(),
                    anchor: *anchor,
                    color: style.color,
                    background: *background,
                }),
            }
        }
        geometry
    }

    fn push_lines(&mut self, vertices: &[Point3f], edges: &[[usize; 2]], color: [f32; 4]) {
        for edge in edges {
            self.lines.extend(edge.iter().map(|&i| ColorVertex {
                position: to_array(&vertices[i]),
                color,
            }));
        }
    }
}

fn rgba(color: [f32; 3], opacity: f32) -> [f32; 4] {
    [color[0], color[1], color[2], opacity.clamp(0.0, 1.0)]
}

/// Flat shading against a fixed light, lit from either side of the face
fn shade(color: [f32; 3], normal: &Vector3f) -> [f32; 3] {
    let light = Vector3f::new(0.3, 0.5, 1.0).normalize();
    let intensity = 0.35 + 0.65 * normal.dot(&light).abs();
    color.map(|c| c * intensity)
}

/// A vertex or instance buffer with its element count
struct GpuBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

#[derive(Default)]
struct GpuGeometry {
    opaque: Option<GpuBuffer>,
    translucent: Option<GpuBuffer>,
    lines: Option<GpuBuffer>,
    points: Option<GpuBuffer>,
}

/// Draws a scene graph into a window surface
pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    background: wgpu::Color,
    geometry: GpuGeometry,
    overlays: Vec<Overlay>,
    uploaded_revision: Option<u64>,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, background_color: [f64; 4]) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| Error::Gpu(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Gpu("Failed to find suitable adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("meshpick device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| Error::Gpu(format!("Failed to create device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface has no supported formats".to_string()))?;

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, &surface_config);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });
        let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(POINT_SHADER.into()),
        });

        let pipeline = |label: &str, shader: &wgpu::ShaderModule, entry: (&str, &str), buffer, topology, depth_write| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: entry.0,
                    buffers: &[buffer],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: entry.1,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            })
        };

        let triangles = wgpu::PrimitiveTopology::TriangleList;
        let opaque_pipeline = pipeline("Opaque Pipeline", &scene_shader, ("vs_main", "fs_main"), ColorVertex::desc(), triangles, true);
        let translucent_pipeline =
            pipeline("Translucent Pipeline", &scene_shader, ("vs_main", "fs_main"), ColorVertex::desc(), triangles, false);
        let line_pipeline = pipeline(
            "Line Pipeline",
            &scene_shader,
            ("vs_main", "fs_main"),
            ColorVertex::desc(),
            wgpu::PrimitiveTopology::LineList,
            true,
        );
        let point_pipeline = pipeline("Point Pipeline", &point_shader, ("vs_point", "fs_point"), PointInstance::desc(), triangles, true);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &*window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_config.format, None, 1);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            camera_buffer,
            camera_bind_group,
            opaque_pipeline,
            translucent_pipeline,
            line_pipeline,
            point_pipeline,
            background: wgpu::Color {
                r: background_color[0],
                g: background_color[1],
                b: background_color[2],
                a: background_color[3],
            },
            geometry: GpuGeometry::default(),
            overlays: Vec::new(),
            uploaded_revision: None,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_view = create_depth_view(&self.device, &self.surface_config);
        }
    }

    /// Let the overlay track scale factor and focus changes
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.egui_state.on_window_event(window, event);
    }

    fn upload(&mut self, graph: &SceneGraph) {
        let geometry = SceneGeometry::from_graph(graph);
        self.geometry = GpuGeometry {
            opaque: self.create_buffer("Opaque Vertex Buffer", &geometry.opaque),
            translucent: self.create_buffer("Translucent Vertex Buffer", &geometry.translucent),
            lines: self.create_buffer("Line Vertex Buffer", &geometry.lines),
            points: self.create_buffer("Point Instance Buffer", &geometry.points),
        };
        self.overlays = geometry.overlays;
        self.uploaded_revision = Some(graph.revision());
    }

    fn create_buffer<T: Pod>(&self, label: &str, data: &[T]) -> Option<GpuBuffer> {
        if data.is_empty() {
            return None;
        }
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Some(GpuBuffer {
            buffer,
            count: data.len() as u32,
        })
    }

    fn update_camera(&self, graph: &SceneGraph) {
        let viewport = graph.viewport();
        let uniform = CameraUniform {
            view_proj: graph.camera().view_projection().into(),
            viewport: [viewport.width, viewport.height, 0.0, 0.0],
        };
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Draw one frame
    pub fn render(&mut self, graph: &SceneGraph, window: &Window) -> Result<()> {
        if self.uploaded_revision != Some(graph.revision()) {
            self.upload(graph);
        }
        self.update_camera(graph);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_state.take_egui_input(window);
        let overlays = &self.overlays;
        let full_output = self.egui_ctx.run(raw_input, |ctx| draw_overlays(ctx, overlays));
        self.egui_state
            .handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Render Encoder"),
        });
        let egui_commands = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Opaque geometry first; translucent surfaces last without depth writes
            let passes = [
                (&self.opaque_pipeline, &self.geometry.opaque),
                (&self.line_pipeline, &self.geometry.lines),
            ];
            for (pipeline, buffer) in passes {
                if let Some(buffer) = buffer {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_vertex_buffer(0, buffer.buffer.slice(..));
                    render_pass.draw(0..buffer.count, 0..1);
                }
            }
            if let Some(points) = &self.geometry.points {
                render_pass.set_pipeline(&self.point_pipeline);
                render_pass.set_vertex_buffer(0, points.buffer.slice(..));
                render_pass.draw(0..6, 0..points.count);
            }
            if let Some(translucent) = &self.geometry.translucent {
                render_pass.set_pipeline(&self.translucent_pipeline);
                render_pass.set_vertex_buffer(0, translucent.buffer.slice(..));
                render_pass.draw(0..translucent.count, 0..1);
            }
        }

        {
            let mut overlay_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer
                .render(&mut overlay_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue
            .submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn draw_overlays(ctx: &egui::Context, overlays: &[Overlay]) {
    for (index, overlay) in overlays.iter().enumerate() {
        let (align, offset): (egui::Align2, [f32; 2]) = match overlay.anchor {
            TextAnchor::TopLeft => (egui::Align2::LEFT_TOP, [10.0, 10.0]),
            TextAnchor::TopRight => (egui::Align2::RIGHT_TOP, [-10.0, 10.0]),
            TextAnchor::BottomLeft => (egui::Align2::LEFT_BOTTOM, [10.0, -10.0]),
            TextAnchor::BottomRight => (egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0]),
        };
        egui::Area::new(egui::Id::new(("overlay", index)))
            .anchor(align, offset)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(color32(overlay.background))
                    .inner_margin(egui::Margin::same(6.0))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&overlay.text)
                                .monospace()
                                .color(color32(overlay.color)),
                        );
                    });
            });
    }
}

fn color32(color: [f32; 3]) -> egui::Color32 {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    egui::Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneObject};
    use meshpick_core::{PointCloud3f, TriangleMesh};

    fn unit_cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_geometry_sorts_by_opacity() {
        let mut graph = SceneGraph::default();
        graph.add(SceneObject::mesh(unit_cube()));
        graph.add(SceneObject::mesh(unit_cube()).styled(Style::default().with_opacity(0.5)));

        let geometry = SceneGeometry::from_graph(&graph);
        assert_eq!(geometry.opaque.len(), 36);
        assert_eq!(geometry.translucent.len(), 36);
        assert!(geometry.translucent.iter().all(|v| v.color[3] == 0.5));
        assert!(geometry.lines.is_empty());
    }

    #[test]
    fn test_geometry_mesh_edges_and_points() {
        let mut graph = SceneGraph::default();
        graph.add(SceneObject::mesh(unit_cube()).styled(Style::default().with_edges(true)));
        let cloud = PointCloud3f::from_points(vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)]);
        graph.add(SceneObject::points(cloud).styled(Style::new([1.0, 0.0, 0.0]).with_point_size(15.0)));

        let geometry = SceneGeometry::from_graph(&graph);
        assert_eq!(geometry.lines.len(), unit_cube().edges().len() * 2);
        assert_eq!(geometry.points.len(), 2);
        assert_eq!(geometry.points[1].size, 15.0);
        assert_eq!(geometry.points[1].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_geometry_collects_overlays() {
        let mut graph = SceneGraph::default();
        graph.add(SceneObject::text("Press z", TextAnchor::BottomLeft, [0.0, 0.5, 0.0]));
        let geometry = SceneGeometry::from_graph(&graph);
        assert_eq!(geometry.overlays.len(), 1);
        assert_eq!(geometry.overlays[0].text, "Press z");
        assert_eq!(geometry.overlays[0].background, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_shading_is_brighter_facing_light() {
        let facing = shade([1.0, 1.0, 1.0], &Vector3f::new(0.3, 0.5, 1.0).normalize());
        let grazing = shade([1.0, 1.0, 1.0], &Vector3f::new(-0.5, 0.3, 0.0).normalize());
        assert!((facing[0] - 1.0).abs() < 1e-5);
        assert!(grazing[0] < facing[0]);
        assert!(grazing[0] >= 0.35);
    }
}
