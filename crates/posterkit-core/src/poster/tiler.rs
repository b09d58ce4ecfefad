//! Scaling, centering and grid partition of a poster canvas.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::units::{PhysicalSize, SheetSize};

use super::{Page, PageGrid};

/// Resize `image` to the largest size that fits inside the target box.
///
/// The aspect ratio is kept. One side always matches the box exactly.
pub fn scale_to_fit(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions("source image is empty".to_string()).into());
    }
    if target_width == 0 || target_height == 0 {
        return Err(ProcessingError::InvalidDimensions(format!(
            "target box {}x{} is empty",
            target_width, target_height
        ))
        .into());
    }

    let image_ratio = width as f64 / height as f64;
    let target_ratio = target_width as f64 / target_height as f64;

    let (new_width, new_height) = if image_ratio > target_ratio {
        let h = (target_width as f64 / image_ratio) as u32;
        (target_width, h.clamp(1, target_height))
    } else {
        let w = (target_height as f64 * image_ratio) as u32;
        (w.clamp(1, target_width), target_height)
    };

    debug!(
        "Scaling {}x{} -> {}x{} (box {}x{})",
        width, height, new_width, new_height, target_width, target_height
    );

    Ok(image.resize_exact(new_width, new_height, FilterType::Lanczos3))
}

/// Offsets that center a `scaled` extent inside a `target` extent.
pub fn centering_offset(scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    (
        target.0.saturating_sub(scaled.0) / 2,
        target.1.saturating_sub(scaled.1) / 2,
    )
}

/// Center `scaled` on a white canvas of exactly `target_width × target_height`.
///
/// Sources with an alpha channel get a transparent white canvas and are
/// alpha-composited onto it; opaque sources are pasted onto opaque white.
pub fn compose_canvas(
    scaled: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> Result<DynamicImage> {
    if target_width == 0 || target_height == 0 {
        return Err(ProcessingError::InvalidDimensions(format!(
            "canvas {}x{} is empty",
            target_width, target_height
        ))
        .into());
    }

    let (x, y) = centering_offset(scaled.dimensions(), (target_width, target_height));
    debug!("Centering at offset ({}, {})", x, y);

    let canvas = if scaled.color().has_alpha() {
        let clear = Rgba([255, 255, 255, 0]);
        let mut canvas = RgbaImage::from_pixel(target_width, target_height, clear);
        imageops::overlay(&mut canvas, &scaled.to_rgba8(), x as i64, y as i64);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = RgbImage::from_pixel(target_width, target_height, Rgb([255, 255, 255]));
        imageops::replace(&mut canvas, &scaled.to_rgb8(), x as i64, y as i64);
        DynamicImage::ImageRgb8(canvas)
    };

    Ok(canvas)
}

/// Cut `canvas` into a row-major grid of page-sized crops.
///
/// Edge pages are clipped at the canvas boundary rather than padded.
pub fn partition_into_pages(
    canvas: &DynamicImage,
    page_width: u32,
    page_height: u32,
) -> Result<PageGrid> {
    if page_width == 0 || page_height == 0 {
        return Err(ProcessingError::InvalidDimensions(format!(
            "page {}x{} is empty",
            page_width, page_height
        ))
        .into());
    }

    let (canvas_width, canvas_height) = canvas.dimensions();
    let pages_x = canvas_width.div_ceil(page_width);
    let pages_y = canvas_height.div_ceil(page_height);
    let page_count = pages_x.checked_mul(pages_y).ok_or_else(|| {
        ProcessingError::InvalidDimensions(format!("{} x {} pages is too many", pages_x, pages_y))
    })?;

    let mut pages = Vec::with_capacity(page_count as usize);
    for row in 0..pages_y {
        for col in 0..pages_x {
            let left = col * page_width;
            let upper = row * page_height;
            let right = (left + page_width).min(canvas_width);
            let lower = (upper + page_height).min(canvas_height);

            pages.push(Page {
                row,
                col,
                left,
                upper,
                image: canvas.crop_imm(left, upper, right - left, lower - upper),
            });
        }
    }

    Ok(PageGrid {
        pages,
        pages_x,
        pages_y,
        page_size: (page_width, page_height),
        canvas_size: (canvas_width, canvas_height),
    })
}

/// Scale `image` to `size`, center it and split it into `sheet`-sized pages.
pub fn tile_poster(image: &DynamicImage, size: PhysicalSize, sheet: SheetSize) -> Result<PageGrid> {
    let (target_width, target_height) = size.to_px();
    let (page_width, page_height) = sheet.to_px(size.dpi);

    info!(
        "Scaling to {} x {} cm at {} DPI ({} x {} px)",
        size.width_cm, size.height_cm, size.dpi, target_width, target_height
    );

    let scaled = scale_to_fit(image, target_width, target_height)?;
    let canvas = compose_canvas(&scaled, target_width, target_height)?;
    drop(scaled);

    let grid = partition_into_pages(&canvas, page_width, page_height)?;
    info!(
        "Pages needed: {} x {} = {} sheets of {} x {} cm",
        grid.pages_x,
        grid.pages_y,
        grid.pages.len(),
        sheet.width_cm,
        sheet.height_cm
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solid_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 10, 10])))
    }

    #[test]
    fn test_scale_to_fit_wide_image() {
        // 3000x2000 into 40x30 cm at 300 DPI.
        let scaled = scale_to_fit(&solid_rgb(300, 200), 4724, 3543).unwrap();
        assert_eq!(scaled.dimensions(), (4724, 3149));
    }

    #[test]
    fn test_scale_to_fit_tall_image() {
        let scaled = scale_to_fit(&solid_rgb(100, 400), 300, 300).unwrap();
        assert_eq!(scaled.dimensions(), (75, 300));
    }

    #[test]
    fn test_scale_to_fit_is_tight_and_bounded() {
        let boxes = [(100, 100), (123, 457), (640, 31), (7, 9)];
        let sources = [(50, 50), (10, 30), (300, 7), (1, 1), (1000, 999)];
        for &(tw, th) in &boxes {
            for &(sw, sh) in &sources {
                let (w, h) = scale_to_fit(&solid_rgb(sw, sh), tw, th).unwrap().dimensions();
                assert!(w <= tw && h <= th, "{sw}x{sh} in {tw}x{th} gave {w}x{h}");
                assert!(w == tw || h == th, "{sw}x{sh} in {tw}x{th} gave {w}x{h}");
            }
        }
    }

    #[test]
    fn test_scale_to_fit_rejects_empty_box() {
        assert!(scale_to_fit(&solid_rgb(10, 10), 0, 10).is_err());
    }

    #[test]
    fn test_centering_offset() {
        assert_eq!(centering_offset((4724, 3149), (4724, 3543)), (0, 197));
        for &(scaled, target) in &[((3, 5), (10, 10)), ((10, 9), (10, 10)), ((1, 1), (2, 2))] {
            let (x, y) = centering_offset(scaled, target);
            assert!(x * 2 + scaled.0 <= target.0);
            assert!(y * 2 + scaled.1 <= target.1);
            assert!(target.0 - (x * 2 + scaled.0) <= 1);
        }
    }

    #[test]
    fn test_compose_canvas_opaque() {
        let canvas = compose_canvas(&solid_rgb(4, 2), 4, 6).unwrap();
        assert_eq!(canvas.dimensions(), (4, 6));
        assert!(!canvas.color().has_alpha());

        let rgb = canvas.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(0, 2), &Rgb([200, 10, 10]));
        assert_eq!(rgb.get_pixel(3, 3), &Rgb([200, 10, 10]));
        assert_eq!(rgb.get_pixel(0, 4), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_compose_canvas_with_alpha() {
        let mut src = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        src.put_pixel(1, 1, Rgba([0, 0, 255, 0]));
        let canvas = compose_canvas(&DynamicImage::ImageRgba8(src), 4, 2).unwrap();
        assert!(canvas.color().has_alpha());

        let rgba = canvas.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
        assert_eq!(rgba.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(rgba.get_pixel(2, 1)[3], 0);
        assert_eq!(rgba.get_pixel(3, 0)[3], 0);
    }

    #[test]
    fn test_paletted_png_with_transparency_keeps_alpha() {
        // 2x1 indexed PNG, palette [red, blue], tRNS makes entry 1 transparent.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexed.png");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            encoder.set_trns(vec![255, 0]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1]).unwrap();
            writer.finish().unwrap();
        }

        let image = crate::files::load_image(&path).unwrap();
        assert!(image.color().has_alpha());

        let canvas = compose_canvas(&image, 4, 1).unwrap();
        assert!(canvas.color().has_alpha());
        let rgba = canvas.to_rgba8();
        assert_eq!(rgba.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(rgba.get_pixel(2, 0)[3], 0);
    }

    #[test]
    fn test_partition_covers_canvas_exactly() {
        let canvas = solid_rgb(10, 7);
        let grid = partition_into_pages(&canvas, 4, 3).unwrap();
        assert_eq!((grid.pages_x, grid.pages_y), (3, 3));
        assert_eq!(grid.pages.len(), 9);

        let mut hits = vec![0u32; 10 * 7];
        for page in &grid.pages {
            let (w, h) = page.image.dimensions();
            for y in page.upper..page.upper + h {
                for x in page.left..page.left + w {
                    hits[(y * 10 + x) as usize] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_partition_row_major_with_clipped_edges() {
        let grid = partition_into_pages(&solid_rgb(10, 7), 4, 3).unwrap();
        let order: Vec<(u32, u32)> = grid.pages.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
        assert_eq!(grid.pages[2].image.dimensions(), (2, 3));
        assert_eq!(grid.pages[8].image.dimensions(), (2, 1));
        assert_eq!(grid.pages[8].label(), "Row 3, Col 3");
    }

    #[test]
    fn test_page_counts_follow_pixel_sizes() {
        let sheet = SheetSize::A4;
        let cases = [(40.0, 30.0, 100), (100.0, 70.0, 50), (5.0, 5.0, 72), (63.0, 89.1, 20)];
        for &(w_cm, h_cm, dpi) in &cases {
            let size = PhysicalSize::new(w_cm, h_cm, dpi).unwrap();
            let grid = tile_poster(&solid_rgb(30, 20), size, sheet).unwrap();
            let (cw, ch) = size.to_px();
            let (pw, ph) = sheet.to_px(dpi);
            assert_eq!(grid.pages_x, cw.div_ceil(pw));
            assert_eq!(grid.pages_y, ch.div_ceil(ph));
            assert_eq!(grid.canvas_size, (cw, ch));
        }
    }

    #[test]
    fn test_single_a4_poster() {
        let size = PhysicalSize::new(21.0, 29.7, 300).unwrap();
        let grid = tile_poster(&solid_rgb(21, 30), size, SheetSize::A4).unwrap();
        assert_eq!((grid.pages_x, grid.pages_y), (1, 1));
    }

    #[test]
    fn test_double_a4_poster() {
        let size = PhysicalSize::new(42.0, 29.7, 300).unwrap();
        let grid = tile_poster(&solid_rgb(42, 30), size, SheetSize::A4).unwrap();
        assert_eq!((grid.pages_x, grid.pages_y), (2, 1));
        assert!(grid.pages.iter().all(|p| p.image.dimensions() == (2480, 3507)));
    }
}
