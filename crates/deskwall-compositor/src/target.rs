use deskwall_core::{cover_region, scale_box, scale_region, Rect, Region, Size};

/// Where a batch of instructions draws.
///
/// `geometry` is the logical area the target shows, in the coordinate space
/// its damage is expressed in. It is stretched over `subbuffer` (framebuffer
/// pixels), or over the whole framebuffer when there is no subbuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Opaque framebuffer handle owned by the GPU layer.
    pub framebuffer: u32,
    pub geometry: Rect,
    pub size: Size,
    pub subbuffer: Option<Rect>,
}

impl RenderTarget {
    pub fn new(framebuffer: u32, geometry: Rect, size: Size) -> Self {
        Self {
            framebuffer,
            geometry,
            size,
            subbuffer: None,
        }
    }

    /// Framebuffer pixels this target may touch.
    pub fn framebuffer_box(&self) -> Rect {
        self.subbuffer.unwrap_or_else(|| Rect::from_size(self.size))
    }

    pub fn framebuffer_box_from_geometry_box(&self, bbox: Rect) -> Rect {
        scale_box(self.geometry, self.framebuffer_box(), bbox)
    }

    pub fn framebuffer_region_from_geometry_region(&self, region: &Region) -> Region {
        scale_region(self.geometry, self.framebuffer_box(), region)
    }

    /// The smallest part of `geometry` whose drawing reaches every pixel of
    /// `framebuffer_region`. Pixels must lie inside [`Self::framebuffer_box`].
    pub fn geometry_region_covering(&self, framebuffer_region: &Region) -> Region {
        cover_region(self.framebuffer_box(), self.geometry, framebuffer_region)
    }

    /// The same target with its logical geometry shifted; the pixels it
    /// covers do not move.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            geometry: self.geometry.translate(dx, dy),
            ..self.clone()
        }
    }

    /// A target covering `pixels` of the same framebuffer and showing
    /// `geometry` there.
    pub fn subtarget(&self, geometry: Rect, pixels: Rect) -> Self {
        Self {
            framebuffer: self.framebuffer,
            geometry,
            size: self.size,
            subbuffer: Some(pixels),
        }
    }
}
