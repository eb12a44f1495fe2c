use crate::coords::{PixelRect, PixelSize};

use super::OffscreenTarget;

/// Screen quadrant, named as seen on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QuadrantPosition {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Destination of one attachment copy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quadrant {
    pub attachment: usize,
    pub position: QuadrantPosition,
    /// Destination rectangle, top-left origin.
    pub rect: PixelRect,
}

/// Attachment `i` lands in `QUADRANT_ORDER[i]`.
pub const QUADRANT_ORDER: [QuadrantPosition; 4] = [
    QuadrantPosition::BottomLeft,
    QuadrantPosition::BottomRight,
    QuadrantPosition::TopLeft,
    QuadrantPosition::TopRight,
];

/// Splits a destination into four quadrants.
///
/// The split is at `width / 2` and `height / 2` measured from the bottom-left
/// corner, so on odd sizes the extra row goes to the top half and the extra
/// column to the right half. The four rectangles tile the destination exactly.
pub fn quadrant_layout(dest: PixelSize) -> [Quadrant; 4] {
    let (w, h) = (dest.width, dest.height);
    let (hw, hh) = (w / 2, h / 2);

    // Bottom-up corners, flipped into top-down pixel rows.
    let flip =
        |x0: u32, y0: u32, x1: u32, y1: u32| PixelRect::from_corners(x0, h - y1, x1, h - y0);

    std::array::from_fn(|attachment| {
        let position = QUADRANT_ORDER[attachment];
        let rect = match position {
            QuadrantPosition::BottomLeft => flip(0, 0, hw, hh),
            QuadrantPosition::BottomRight => flip(hw, 0, w, hh),
            QuadrantPosition::TopLeft => flip(0, hh, hw, h),
            QuadrantPosition::TopRight => flip(hw, hh, w, h),
        };
        Quadrant {
            attachment,
            position,
            rect,
        }
    })
}

/// Copies each offscreen attachment, scaled with linear filtering, into one
/// quadrant of a destination view.
pub struct BlitCompositor {
    pipeline: wgpu::RenderPipeline,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl BlitCompositor {
    pub fn new(
        device: &wgpu::Device,
        target: &OffscreenTarget,
        dest_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mrt blit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mrt blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mrt blit sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_groups = target
            .views()
            .iter()
            .enumerate()
            .map(|(slot, view)| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("mrt blit bind group {slot}")),
                    layout: &bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                })
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mrt blit pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mrt blit pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: dest_format,
                    blend: None,
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
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_groups,
        }
    }

    /// Copies attachment `i` into `quadrant_layout(dest_size)[i]`.
    ///
    /// The destination is loaded, not cleared. Empty quadrants are skipped.
    pub fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest_view: &wgpu::TextureView,
        dest_size: PixelSize,
    ) {
        if dest_size.is_empty() {
            return;
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mrt blit pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dest_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);

        for quadrant in quadrant_layout(dest_size) {
            let Some(bind_group) = self.bind_groups.get(quadrant.attachment) else {
                continue;
            };
            let r = quadrant.rect;
            if r.is_empty() {
                continue;
            }
            rpass.set_viewport(r.x as f32, r.y as f32, r.width as f32, r.height as f32, 0.0, 1.0);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_of(layout: &[Quadrant; 4], position: QuadrantPosition) -> PixelRect {
        layout
            .iter()
            .find(|q| q.position == position)
            .map(|q| q.rect)
            .expect("every position is present")
    }

    #[test]
    fn attachments_map_to_fixed_quadrants() {
        let layout = quadrant_layout(PixelSize::new(400, 400));
        let order: Vec<(usize, QuadrantPosition)> =
            layout.iter().map(|q| (q.attachment, q.position)).collect();
        assert_eq!(
            order,
            vec![
                (0, QuadrantPosition::BottomLeft),
                (1, QuadrantPosition::BottomRight),
                (2, QuadrantPosition::TopLeft),
                (3, QuadrantPosition::TopRight),
            ]
        );
    }

    #[test]
    fn square_window_splits_in_half() {
        let layout = quadrant_layout(PixelSize::new(400, 400));
        let expected = [
            (QuadrantPosition::TopLeft, PixelRect::new(0, 0, 200, 200)),
            (QuadrantPosition::TopRight, PixelRect::new(200, 0, 200, 200)),
            (QuadrantPosition::BottomLeft, PixelRect::new(0, 200, 200, 200)),
            (QuadrantPosition::BottomRight, PixelRect::new(200, 200, 200, 200)),
        ];
        for (position, rect) in expected {
            assert_eq!(rect_of(&layout, position), rect, "{position:?}");
        }
    }

    #[test]
    fn split_follows_destination_size() {
        let layout = quadrant_layout(PixelSize::new(1000, 600));
        assert_eq!(
            rect_of(&layout, QuadrantPosition::BottomLeft),
            PixelRect::new(0, 300, 500, 300)
        );
        assert_eq!(
            rect_of(&layout, QuadrantPosition::TopRight),
            PixelRect::new(500, 0, 500, 300)
        );
    }

    #[test]
    fn odd_sizes_tile_exactly() {
        for (w, h) in [(401, 399), (1, 1), (3, 2), (799, 601)] {
            let layout = quadrant_layout(PixelSize::new(w, h));
            let area: u64 = layout.iter().map(|q| q.rect.size().area()).sum();
            assert_eq!(area, PixelSize::new(w, h).area(), "{w}x{h}");

            for q in &layout {
                assert!(q.rect.right() <= w && q.rect.bottom() <= h, "{w}x{h} {q:?}");
            }

            // Bottom-left keeps the GL split: floor(w/2) columns, floor(h/2) rows.
            let bl = rect_of(&layout, QuadrantPosition::BottomLeft);
            assert_eq!((bl.width, bl.height), (w / 2, h / 2));
            assert_eq!(bl.bottom(), h);
        }
    }

    #[test]
    fn quadrants_do_not_overlap() {
        let layout = quadrant_layout(PixelSize::new(7, 5));
        for y in 0..5 {
            for x in 0..7 {
                let hits = layout.iter().filter(|q| q.rect.contains(x, y)).count();
                assert_eq!(hits, 1, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn one_pixel_destination_leaves_three_empty_quadrants() {
        let layout = quadrant_layout(PixelSize::new(1, 1));
        let non_empty: Vec<QuadrantPosition> = layout
            .iter()
            .filter(|q| !q.rect.is_empty())
            .map(|q| q.position)
            .collect();
        assert_eq!(non_empty, vec![QuadrantPosition::TopRight]);
    }
}
