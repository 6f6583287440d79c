//! Panel size, placement and the drag-resize gesture.

pub const MIN_PANEL_EXTENT: f64 = 300.0;
pub const MAX_VIEWPORT_FRACTION: f64 = 0.9;
/// Side length of the bottom-right square that starts a resize drag.
pub const CORNER_HIT_ZONE: f64 = 20.0;
pub const DEFAULT_PANEL_WIDTH: u32 = 400;
pub const DEFAULT_PANEL_HEIGHT: u32 = 500;
pub const DEFAULT_RIGHT_OFFSET: f64 = 20.0;
pub const DEFAULT_BOTTOM_OFFSET: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains_rect(&self, rect: &PanelRect) -> bool {
        rect.left >= 0.0
            && rect.top >= 0.0
            && rect.right() <= self.width
            && rect.bottom() <= self.height
    }
}

/// Persisted panel size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_PANEL_WIDTH,
            height: DEFAULT_PANEL_HEIGHT,
        }
    }
}

/// Panel bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// True when `point` falls in the bottom-right resize hit-zone.
    pub fn in_resize_corner(&self, point: Point) -> bool {
        self.contains(point)
            && point.x >= self.right() - CORNER_HIT_ZONE
            && point.y >= self.bottom() - CORNER_HIT_ZONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalAnchor {
    Left(f64),
    Right(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalAnchor {
    Top(f64),
    Bottom(f64),
}

/// Viewport edges the panel is pinned to, with their offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelAnchor {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Default for PanelAnchor {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAnchor::Right(DEFAULT_RIGHT_OFFSET),
            vertical: VerticalAnchor::Bottom(DEFAULT_BOTTOM_OFFSET),
        }
    }
}

impl PanelAnchor {
    pub fn place(&self, width: f64, height: f64, viewport: Viewport) -> PanelRect {
        let left = match self.horizontal {
            HorizontalAnchor::Left(offset) => offset,
            HorizontalAnchor::Right(offset) => viewport.width - offset - width,
        };
        let top = match self.vertical {
            VerticalAnchor::Top(offset) => offset,
            VerticalAnchor::Bottom(offset) => viewport.height - offset - height,
        };
        PanelRect {
            left,
            top,
            width,
            height,
        }
    }

    /// Flips to the left/top edge when a panel of this size would leave the viewport there.
    pub fn keep_on_screen(self, width: f64, height: f64, viewport: Viewport) -> Self {
        let rect = self.place(width, height, viewport);
        let horizontal = if rect.left < 0.0 {
            HorizontalAnchor::Left(0.0)
        } else {
            self.horizontal
        };
        let vertical = if rect.top < 0.0 {
            VerticalAnchor::Top(0.0)
        } else {
            self.vertical
        };
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Clamps one panel extent to `[MIN_PANEL_EXTENT, MAX_VIEWPORT_FRACTION * viewport_extent]`.
///
/// On viewports too small for the range the minimum wins.
pub fn clamp_extent(value: f64, viewport_extent: f64) -> f64 {
    value
        .min(viewport_extent * MAX_VIEWPORT_FRACTION)
        .max(MIN_PANEL_EXTENT)
}

/// An in-progress resize drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDrag {
    origin: Point,
    start_width: f64,
    start_height: f64,
    width: f64,
    height: f64,
}

impl ResizeDrag {
    pub fn begin(origin: Point, start_width: f64, start_height: f64) -> Self {
        Self {
            origin,
            start_width,
            start_height,
            width: start_width,
            height: start_height,
        }
    }

    /// Follows the pointer and returns the clamped `(width, height)`.
    pub fn track(&mut self, pointer: Point, viewport: Viewport) -> (f64, f64) {
        self.width = clamp_extent(
            self.start_width + pointer.x - self.origin.x,
            viewport.width,
        );
        self.height = clamp_extent(
            self.start_height + pointer.y - self.origin.y,
            viewport.height,
        );
        (self.width, self.height)
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Integer-rounded size to persist.
    pub fn finish(&self) -> PanelGeometry {
        PanelGeometry {
            width: self.width.round().max(0.0) as u32,
            height: self.height.round().max(0.0) as u32,
        }
    }
}
