//! Physical unit conversions between centimeters, pixels and PDF points.

use crate::error::{ProcessingError, Result};

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// PDF points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Default print resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Largest canvas accepted for a poster, in pixels (width × height).
///
/// One gibipixel, 4 GiB as RGBA.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 30;

/// Pixel length of `cm` at `dpi` before truncation.
fn cm_to_px_exact(cm: f64, dpi: u32) -> f64 {
    cm / CM_PER_INCH * dpi as f64
}

/// Convert centimeters to pixels at the given resolution.
///
/// The fractional pixel is dropped, so a length never rounds up past the
/// physical size it was asked for. Lengths beyond `u32::MAX` saturate; use
/// [`PhysicalSize::new`] to validate user input.
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    cm_to_px_exact(cm, dpi) as u32
}

/// Convert centimeters to PDF points.
pub fn cm_to_pt(cm: f64) -> f32 {
    (cm / CM_PER_INCH * PT_PER_INCH) as f32
}

/// A physical sheet size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl SheetSize {
    /// ISO A4 portrait, 21.0 × 29.7 cm.
    pub const A4: SheetSize = SheetSize {
        width_cm: 21.0,
        height_cm: 29.7,
    };

    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        Self { width_cm, height_cm }
    }

    /// Size in PDF points.
    pub fn to_pt(&self) -> (f32, f32) {
        (cm_to_pt(self.width_cm), cm_to_pt(self.height_cm))
    }

    /// Size in pixels at `dpi`.
    pub fn to_px(&self, dpi: u32) -> (u32, u32) {
        (cm_to_px(self.width_cm, dpi), cm_to_px(self.height_cm, dpi))
    }
}

impl Default for SheetSize {
    fn default() -> Self {
        SheetSize::A4
    }
}

/// Target poster size: centimeters plus the resolution used to rasterize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
    pub dpi: u32,
}

impl PhysicalSize {
    /// Create a size, rejecting values that do not give a usable canvas.
    ///
    /// Both sides must be positive and finite, at least one pixel long, and
    /// the canvas may hold at most [`MAX_CANVAS_PIXELS`] pixels.
    pub fn new(width_cm: f64, height_cm: f64, dpi: u32) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_cm) || !valid(height_cm) {
            return Err(ProcessingError::InvalidDimensions(format!(
                "physical size must be positive, got {} x {} cm",
                width_cm, height_cm
            ))
            .into());
        }
        if dpi == 0 {
            let msg = "DPI must be positive".to_string();
            return Err(ProcessingError::InvalidDimensions(msg).into());
        }

        let (w, h) = (cm_to_px_exact(width_cm, dpi), cm_to_px_exact(height_cm, dpi));
        if w < 1.0 || h < 1.0 {
            return Err(ProcessingError::InvalidDimensions(format!(
                "{} x {} cm at {} DPI is smaller than one pixel",
                width_cm, height_cm, dpi
            ))
            .into());
        }
        if w > u32::MAX as f64 || h > u32::MAX as f64 {
            return Err(too_large(width_cm, height_cm, dpi));
        }

        let pixels = (w as u64).checked_mul(h as u64);
        if pixels.is_none_or(|p| p > MAX_CANVAS_PIXELS) {
            return Err(too_large(width_cm, height_cm, dpi));
        }

        Ok(Self { width_cm, height_cm, dpi })
    }

    /// Pixel dimensions at this size's resolution.
    pub fn to_px(&self) -> (u32, u32) {
        (cm_to_px(self.width_cm, self.dpi), cm_to_px(self.height_cm, self.dpi))
    }
}

fn too_large(width_cm: f64, height_cm: f64, dpi: u32) -> crate::error::PosterkitError {
    ProcessingError::InvalidDimensions(format!(
        "{} x {} cm at {} DPI exceeds the canvas limit of {} pixels",
        width_cm, height_cm, dpi, MAX_CANVAS_PIXELS
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PosterkitError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cm_to_px() {
        assert_eq!(cm_to_px(2.54, 300), 300);
        assert_eq!(cm_to_px(40.0, 300), 4724);
        assert_eq!(cm_to_px(30.0, 300), 3543);
        assert_eq!(cm_to_px(42.0, 300), 4960);
    }

    #[test]
    fn test_cm_to_px_double_precision() {
        // Single precision lands on 1116 here.
        assert_eq!(cm_to_px(39.37, 72), 1115);
        assert_eq!(cm_to_px(29.7, 300), 3507);
    }

    #[test]
    fn test_a4_sizes() {
        assert_eq!(SheetSize::A4.to_px(300), (2480, 3507));

        let (w, h) = SheetSize::A4.to_pt();
        assert!((w - 595.2756).abs() < 0.01);
        assert!((h - 841.8898).abs() < 0.01);
    }

    #[test]
    fn test_physical_size_validation() {
        assert!(PhysicalSize::new(40.0, 30.0, 300).is_ok());
        assert!(PhysicalSize::new(0.0, 30.0, 300).is_err());
        assert!(PhysicalSize::new(40.0, -1.0, 300).is_err());
        assert!(PhysicalSize::new(40.0, f64::NAN, 300).is_err());
        assert!(PhysicalSize::new(40.0, f64::INFINITY, 300).is_err());
        assert!(PhysicalSize::new(40.0, 30.0, 0).is_err());
        assert!(PhysicalSize::new(0.001, 0.001, 1).is_err());
    }

    #[test]
    fn test_physical_size_rejects_huge_canvas() {
        // Wider than u32::MAX pixels.
        let err = PhysicalSize::new(2e9, 1.0, 300).unwrap_err();
        assert!(matches!(
            err,
            PosterkitError::Processing(ProcessingError::InvalidDimensions(_))
        ));

        // Each side fits in u32, the area does not fit the limit.
        assert!(PhysicalSize::new(1000.0, 1000.0, 300).is_err());

        // A 2 x 2 m poster at 300 DPI is fine.
        assert!(PhysicalSize::new(200.0, 200.0, 300).is_ok());
    }
}
