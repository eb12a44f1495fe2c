use std::fmt;

use crate::coords::PixelSize;

/// Description of an offscreen multiple-render-target set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetDesc {
    pub size: PixelSize,
    pub format: wgpu::TextureFormat,
    /// Number of color attachments (slots `0..attachments`).
    pub attachments: u32,
}

impl TargetDesc {
    /// Color formats in slot order, as a pipeline's fragment targets expect them.
    pub fn color_formats(&self) -> Vec<wgpu::TextureFormat> {
        vec![self.format; self.attachments as usize]
    }
}

impl Default for TargetDesc {
    fn default() -> Self {
        Self {
            size: PixelSize::new(400, 400),
            format: wgpu::TextureFormat::Rgba8Unorm,
            attachments: 4,
        }
    }
}

/// What the completeness check needs to know about one attachment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub size: PixelSize,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

impl AttachmentInfo {
    pub fn of(texture: &wgpu::Texture) -> Self {
        Self {
            size: PixelSize::new(texture.width(), texture.height()),
            format: texture.format(),
            usage: texture.usage(),
        }
    }
}

/// Reason an attachment set cannot be rendered to as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    NoAttachments,
    TooManyAttachments { count: usize, max: u32 },
    MissingAttachment { slot: usize },
    ZeroSize { slot: usize },
    SizeMismatch {
        slot: usize,
        expected: PixelSize,
        found: PixelSize,
    },
    FormatMismatch {
        slot: usize,
        expected: wgpu::TextureFormat,
        found: wgpu::TextureFormat,
    },
    NotRenderable { slot: usize },
    TooLarge { size: PixelSize, max: u32 },
    /// The format lacks a usage or the linear filtering the blit pass needs.
    UnsupportedFormat { format: wgpu::TextureFormat },
    TooManyBytesPerSample { bytes: u32, max: u32 },
    /// The device rejected the allocation.
    Allocation { message: String },
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offscreen target incomplete: ")?;
        match self {
            Self::NoAttachments => write!(f, "no color attachments"),
            Self::TooManyAttachments { count, max } => {
                write!(f, "{count} color attachments exceed the device limit of {max}")
            }
            Self::MissingAttachment { slot } => write!(f, "color attachment {slot} is missing"),
            Self::ZeroSize { slot } => write!(f, "color attachment {slot} has zero size"),
            Self::SizeMismatch { slot, expected, found } => write!(
                f,
                "color attachment {slot} is {}x{}, expected {}x{}",
                found.width, found.height, expected.width, expected.height
            ),
            Self::FormatMismatch { slot, expected, found } => write!(
                f,
                "color attachment {slot} has format {found:?}, expected {expected:?}"
            ),
            Self::NotRenderable { slot } => {
                write!(f, "color attachment {slot} lacks RENDER_ATTACHMENT usage")
            }
            Self::TooLarge { size, max } => write!(
                f,
                "{}x{} exceeds the device texture limit of {max}",
                size.width, size.height
            ),
            Self::UnsupportedFormat { format } => {
                write!(f, "{format:?} cannot be blitted with linear filtering")
            }
            Self::TooManyBytesPerSample { bytes, max } => write!(
                f,
                "{bytes} bytes per sample across all attachments, device allows {max}"
            ),
            Self::Allocation { message } => write!(f, "allocation failed: {message}"),
        }
    }
}

impl std::error::Error for TargetError {}

/// Checks that an attachment set is complete.
///
/// Slot 0 defines the expected size and format; every other slot must match it.
/// The first offending slot is reported.
pub fn check_completeness(
    attachments: &[Option<AttachmentInfo>],
    max_color_attachments: u32,
) -> Result<(), TargetError> {
    if attachments.is_empty() {
        return Err(TargetError::NoAttachments);
    }
    if attachments.len() > max_color_attachments as usize {
        return Err(TargetError::TooManyAttachments {
            count: attachments.len(),
            max: max_color_attachments,
        });
    }

    let mut reference: Option<AttachmentInfo> = None;
    for (slot, info) in attachments.iter().enumerate() {
        let Some(info) = info else {
            return Err(TargetError::MissingAttachment { slot });
        };
        if info.size.is_empty() {
            return Err(TargetError::ZeroSize { slot });
        }
        if !info.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
            return Err(TargetError::NotRenderable { slot });
        }

        let expected = *reference.get_or_insert(*info);
        if info.size != expected.size {
            return Err(TargetError::SizeMismatch {
                slot,
                expected: expected.size,
                found: info.size,
            });
        }
        if info.format != expected.format {
            return Err(TargetError::FormatMismatch {
                slot,
                expected: expected.format,
                found: info.format,
            });
        }
    }

    Ok(())
}

/// Offscreen color attachments written by one MRT pass.
///
/// All attachments share one size and format. Textures are sampled by the blit
/// pass and can be copied out for readback.
pub struct OffscreenTarget {
    desc: TargetDesc,
    textures: Vec<wgpu::Texture>,
    views: Vec<wgpu::TextureView>,
}

impl OffscreenTarget {
    pub const USAGE: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
        .union(wgpu::TextureUsages::TEXTURE_BINDING)
        .union(wgpu::TextureUsages::COPY_SRC);

    /// Validates `desc` against the device, then allocates `desc.attachments` textures.
    ///
    /// Nothing is allocated for a description the device cannot honor.
    pub fn new(device: &wgpu::Device, desc: TargetDesc) -> Result<Self, TargetError> {
        validate(device, &desc)?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let textures: Vec<wgpu::Texture> = (0..desc.attachments)
            .map(|slot| {
                device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(&format!("mrt color attachment {slot}")),
                    size: wgpu::Extent3d {
                        width: desc.size.width,
                        height: desc.size.height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: desc.format,
                    usage: Self::USAGE,
                    view_formats: &[],
                })
            })
            .collect();
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(TargetError::Allocation {
                message: err.to_string(),
            });
        }

        let infos: Vec<Option<AttachmentInfo>> =
            textures.iter().map(|t| Some(AttachmentInfo::of(t))).collect();
        check_completeness(&infos, device.limits().max_color_attachments)?;

        let views = textures
            .iter()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
            .collect();

        log::debug!(
            "allocated {} {:?} attachments of {}x{}",
            desc.attachments,
            desc.format,
            desc.size.width,
            desc.size.height
        );

        Ok(Self {
            desc,
            textures,
            views,
        })
    }

    pub fn size(&self) -> PixelSize {
        self.desc.size
    }

    pub fn textures(&self) -> &[wgpu::Texture] {
        &self.textures
    }

    pub fn views(&self) -> &[wgpu::TextureView] {
        &self.views
    }
}

// Checks a description against device limits and format features.
fn validate(device: &wgpu::Device, desc: &TargetDesc) -> Result<(), TargetError> {
    let limits = device.limits();
    let features = desc.format.guaranteed_format_features(device.features());

    let planned = AttachmentInfo {
        size: desc.size,
        format: desc.format,
        usage: OffscreenTarget::USAGE & features.allowed_usages,
    };
    let infos = vec![Some(planned); desc.attachments as usize];
    check_completeness(&infos, limits.max_color_attachments)?;

    let max = limits.max_texture_dimension_2d;
    if desc.size.width > max || desc.size.height > max {
        return Err(TargetError::TooLarge {
            size: desc.size,
            max,
        });
    }

    if !features.allowed_usages.contains(OffscreenTarget::USAGE)
        || !features
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::FILTERABLE)
    {
        return Err(TargetError::UnsupportedFormat {
            format: desc.format,
        });
    }

    let per_pixel = desc.format.target_pixel_byte_cost().unwrap_or(0);
    let bytes = per_pixel * desc.attachments;
    if bytes > limits.max_color_attachment_bytes_per_sample {
        return Err(TargetError::TooManyBytesPerSample {
            bytes,
            max: limits.max_color_attachment_bytes_per_sample,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RGBA8: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn info(w: u32, h: u32, format: wgpu::TextureFormat) -> Option<AttachmentInfo> {
        Some(AttachmentInfo {
            size: PixelSize::new(w, h),
            format,
            usage: OffscreenTarget::USAGE,
        })
    }

    fn four() -> Vec<Option<AttachmentInfo>> {
        vec![info(400, 400, RGBA8); 4]
    }

    #[test]
    fn four_matching_attachments_are_complete() {
        assert_eq!(check_completeness(&four(), 8), Ok(()));
    }

    #[test]
    fn omitted_attachment_is_incomplete() {
        for slot in 0..4 {
            let mut set = four();
            set[slot] = None;
            assert_eq!(
                check_completeness(&set, 8),
                Err(TargetError::MissingAttachment { slot })
            );
        }
    }

    #[test]
    fn size_mismatch_is_incomplete() {
        let mut set = four();
        set[2] = info(200, 400, RGBA8);
        assert_eq!(
            check_completeness(&set, 8),
            Err(TargetError::SizeMismatch {
                slot: 2,
                expected: PixelSize::new(400, 400),
                found: PixelSize::new(200, 400),
            })
        );
    }

    #[test]
    fn format_mismatch_is_incomplete() {
        let mut set = four();
        set[3] = info(400, 400, wgpu::TextureFormat::Rgba16Float);
        assert_eq!(
            check_completeness(&set, 8),
            Err(TargetError::FormatMismatch {
                slot: 3,
                expected: RGBA8,
                found: wgpu::TextureFormat::Rgba16Float,
            })
        );
    }

    #[test]
    fn zero_sized_attachment_is_incomplete() {
        let mut set = four();
        set[0] = info(0, 400, RGBA8);
        assert_eq!(check_completeness(&set, 8), Err(TargetError::ZeroSize { slot: 0 }));
    }

    #[test]
    fn non_renderable_attachment_is_incomplete() {
        let mut set = four();
        set[1] = Some(AttachmentInfo {
            size: PixelSize::new(400, 400),
            format: RGBA8,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
        });
        assert_eq!(check_completeness(&set, 8), Err(TargetError::NotRenderable { slot: 1 }));
    }

    #[test]
    fn device_limit_is_enforced() {
        assert_eq!(
            check_completeness(&four(), 3),
            Err(TargetError::TooManyAttachments { count: 4, max: 3 })
        );
        assert_eq!(check_completeness(&[], 8), Err(TargetError::NoAttachments));
    }

    #[test]
    fn errors_name_the_slot() {
        let msg = TargetError::MissingAttachment { slot: 2 }.to_string();
        assert_eq!(msg, "offscreen target incomplete: color attachment 2 is missing");
    }

    #[test]
    fn default_desc_lists_one_format_per_slot() {
        assert_eq!(TargetDesc::default().color_formats(), vec![RGBA8; 4]);
    }
}
