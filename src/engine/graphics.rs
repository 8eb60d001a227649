// src/engine/graphics.rs
use std::collections::HashMap;
use std::time::Instant;

use anyhow::Context;
use image::GenericImageView;
use wgpu::util::DeviceExt;
use wgpu::{Device, Queue, Surface};

// A simple struct to help with timing
pub struct Timer {
    last_instant: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
        }
    }

    // Calculate the delta time since the last call
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        dt.as_secs_f32()
    }
}

// Represents a loaded texture. The raw wgpu texture stays alive through the
// view reference; only what the bind group needs is kept here.
pub struct Texture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    // Create a texture from encoded image bytes (PNG in practice)
    pub fn from_bytes(
        device: &Device,
        queue: &Queue,
        bytes: &[u8],
        label: &str,
    ) -> anyhow::Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("failed to decode image {label:?}"))?;
        let rgba = img.to_rgba8();
        let dimensions = img.dimensions();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // Upload the pixel data
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest, // Pixel art style
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            view,
            sampler,
            width: dimensions.0,
            height: dimensions.1,
        })
    }
}

// A vertex for textured sprites
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteVertex {
    position: [f32; 2],
    tex_coords: [f32; 2],
}

impl SpriteVertex {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// A vertex for flat-colored overlay quads (the win/lose banner)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FlatVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl FlatVertex {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FlatVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

struct SpriteDraw {
    texture_id: &'static str,
    vertices: [SpriteVertex; 6],
}

// Everything a single frame wants drawn, in submission order. Positions are
// given in game pixels; the batch converts them to clip space against the
// logical screen size, so the result is independent of the physical surface
// resolution.
pub struct FrameBatch {
    screen_width: f32,
    screen_height: f32,
    sprites: Vec<SpriteDraw>,
    overlays: Vec<[FlatVertex; 6]>,
}

impl FrameBatch {
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            screen_width,
            screen_height,
            sprites: Vec::new(),
            overlays: Vec::new(),
        }
    }

    fn corners(&self, x: f32, y: f32, width: f32, height: f32) -> (f32, f32, f32, f32) {
        let left = x / self.screen_width * 2.0 - 1.0;
        let right = (x + width) / self.screen_width * 2.0 - 1.0;
        let top = 1.0 - y / self.screen_height * 2.0;
        let bottom = 1.0 - (y + height) / self.screen_height * 2.0;
        (left, right, top, bottom)
    }

    pub fn push_sprite(&mut self, texture_id: &'static str, x: f32, y: f32, width: f32, height: f32) {
        let (left, right, top, bottom) = self.corners(x, y, width, height);
        let v0 = SpriteVertex { position: [left, top], tex_coords: [0.0, 0.0] };
        let v1 = SpriteVertex { position: [right, top], tex_coords: [1.0, 0.0] };
        let v2 = SpriteVertex { position: [right, bottom], tex_coords: [1.0, 1.0] };
        let v3 = SpriteVertex { position: [left, bottom], tex_coords: [0.0, 1.0] };
        self.sprites.push(SpriteDraw {
            texture_id,
            vertices: [v0, v2, v1, v0, v3, v2],
        });
    }

    pub fn push_overlay(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        let (left, right, top, bottom) = self.corners(x, y, width, height);
        let v0 = FlatVertex { position: [left, top], color };
        let v1 = FlatVertex { position: [right, top], color };
        let v2 = FlatVertex { position: [right, bottom], color };
        let v3 = FlatVertex { position: [left, bottom], color };
        self.overlays.push([v0, v2, v1, v0, v3, v2]);
    }
}

// The renderer owns the two pipelines and the texture table. Each frame is
// flushed as a single render pass: clear, sprites in submission order, then
// overlay quads on top.
pub struct Renderer {
    sprite_pipeline: wgpu::RenderPipeline,
    flat_pipeline: wgpu::RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_groups: HashMap<String, wgpu::BindGroup>,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat) -> Self {
        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });
        let flat_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/flat.wgsl").into()),
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("texture_bind_group_layout"),
            });

        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite pipeline layout"),
            bind_group_layouts: &[&texture_bind_group_layout],
            push_constant_ranges: &[],
        });
        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite pipeline"),
            layout: Some(&sprite_layout),
            vertex: wgpu::VertexState {
                module: &sprite_shader,
                entry_point: "vs_main",
                buffers: &[SpriteVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &sprite_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let flat_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flat pipeline layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let flat_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("flat pipeline"),
            layout: Some(&flat_layout),
            vertex: wgpu::VertexState {
                module: &flat_shader,
                entry_point: "vs_main",
                buffers: &[FlatVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &flat_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            sprite_pipeline,
            flat_pipeline,
            texture_bind_group_layout,
            texture_bind_groups: HashMap::new(),
            clear_color: wgpu::Color::WHITE,
        }
    }

    // Decode and upload a texture, and build its bind group
    pub fn load_texture(
        &mut self,
        device: &Device,
        queue: &Queue,
        id: &str,
        bytes: &[u8],
    ) -> anyhow::Result<()> {
        let texture = Texture::from_bytes(device, queue, bytes, id)?;

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(&format!("{}_bind_group", id)),
        });

        log::debug!("loaded texture {:?} ({}x{})", id, texture.width, texture.height);
        self.texture_bind_groups.insert(id.to_string(), bind_group);

        Ok(())
    }

    // Draw one frame: clear, all queued sprites, then overlay quads
    pub fn flush(
        &self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        batch: FrameBatch,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut sprite_vertices: Vec<SpriteVertex> = Vec::new();
        let mut runs: Vec<(&'static str, std::ops::Range<u32>)> = Vec::new();
        for draw in &batch.sprites {
            if !self.texture_bind_groups.contains_key(draw.texture_id) {
                log::warn!("skipping sprite with unloaded texture {:?}", draw.texture_id);
                continue;
            }
            let start = sprite_vertices.len() as u32;
            sprite_vertices.extend_from_slice(&draw.vertices);
            runs.push((draw.texture_id, start..start + 6));
        }
        let sprite_buffer = if sprite_vertices.is_empty() {
            None
        } else {
            Some(
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("sprite vertex buffer"),
                    contents: bytemuck::cast_slice(&sprite_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            )
        };

        let overlay_vertices: Vec<FlatVertex> =
            batch.overlays.iter().flatten().copied().collect();
        let overlay_buffer = if overlay_vertices.is_empty() {
            None
        } else {
            Some(
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("overlay vertex buffer"),
                    contents: bytemuck::cast_slice(&overlay_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            )
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            if let Some(buffer) = sprite_buffer.as_ref() {
                render_pass.set_pipeline(&self.sprite_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for (id, range) in &runs {
                    render_pass.set_bind_group(0, &self.texture_bind_groups[*id], &[]);
                    render_pass.draw(range.clone(), 0..1);
                }
            }

            if let Some(buffer) = overlay_buffer.as_ref() {
                render_pass.set_pipeline(&self.flat_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..overlay_vertices.len() as u32, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
