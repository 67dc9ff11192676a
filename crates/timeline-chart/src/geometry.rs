// File: crates/timeline-chart/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

/// Margins around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    // Top leaves room for the title, right for the legend column.
    fn default() -> Self {
        Self::new(72, 180, 56, 64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectI32 {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectI32 {
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn width(&self) -> i32 { self.right - self.left }
    pub const fn height(&self) -> i32 { self.bottom - self.top }

    /// Plot area left over once `insets` are removed from a `width` x `height` surface.
    /// Degenerate surfaces collapse to a 1px rect instead of inverting.
    pub fn plot_area(width: i32, height: i32, insets: &Insets) -> Self {
        let left = insets.left as i32;
        let top = insets.top as i32;
        let right = (width - insets.right as i32).max(left + 1);
        let bottom = (height - insets.bottom as i32).max(top + 1);
        Self::from_ltrb(left, top, right, bottom)
    }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_area_respects_insets() {
        let r = RectI32::plot_area(1000, 600, &Insets::new(70, 30, 20, 50));
        assert_eq!(r, RectI32::from_ltrb(70, 20, 970, 550));
        assert_eq!(r.width(), 900);
        assert_eq!(r.height(), 530);
    }

    #[test]
    fn plot_area_never_inverts() {
        let r = RectI32::plot_area(10, 10, &Insets::new(70, 30, 20, 50));
        assert!(r.width() >= 1);
        assert!(r.height() >= 1);
    }

    #[test]
    fn default_insets_fit_the_default_surface() {
        let r = RectI32::plot_area(crate::chart::WIDTH, crate::chart::HEIGHT, &Insets::default());
        assert_eq!(r, RectI32::from_ltrb(72, 56, 1024 - 180, 640 - 64));
    }
}
