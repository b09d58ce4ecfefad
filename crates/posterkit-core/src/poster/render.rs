//! Rendering poster pages into a multi-page PDF.

use image::GenericImageView;
use lopdf::Document;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::pdf::{encode_jpeg, flatten_onto_white, PageContent, SheetWriter};
use crate::units::SheetSize;

use super::PageGrid;

/// Horizontal distance of the assembly label from the left sheet edge, in points.
const LABEL_INSET_X: f32 = 20.0;
/// Distance of the label baseline below the top sheet edge, in points.
const LABEL_INSET_Y: f32 = 25.0;

/// Print decoration and encoding settings for poster sheets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetStyle {
    /// JPEG quality for embedded tiles.
    pub jpeg_quality: u8,
    /// Leg length of each corner registration mark, in points.
    pub mark_length_pt: f32,
    /// Stroke width of registration marks, in points.
    pub mark_line_width_pt: f32,
    /// Font size of the row/column label, in points.
    pub label_font_size_pt: f32,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            mark_length_pt: 20.0,
            mark_line_width_pt: 0.5,
            label_font_size_pt: 12.0,
        }
    }
}

/// L-shaped marks at the four corners of a `width × height` sheet.
pub(crate) fn registration_marks(
    width: f32,
    height: f32,
    length: f32,
) -> Vec<((f32, f32), (f32, f32))> {
    vec![
        ((0.0, 0.0), (length, 0.0)),
        ((0.0, 0.0), (0.0, length)),
        ((width, 0.0), (width - length, 0.0)),
        ((width, 0.0), (width, length)),
        ((0.0, height), (length, height)),
        ((0.0, height), (0.0, height - length)),
        ((width, height), (width - length, height)),
        ((width, height), (width, height - length)),
    ]
}

/// Render every page of `grid` as one sheet, in row-major order.
///
/// Tiles are flattened onto white and stretched over the whole sheet with
/// no margins, clipped edge pages included. Each sheet gets corner
/// registration marks and a `Row R, Col C` label.
pub fn render_pages_to_document(
    grid: &PageGrid,
    sheet: SheetSize,
    style: &SheetStyle,
) -> Result<Document> {
    let mut writer = SheetWriter::new(sheet);
    let (sheet_width, sheet_height) = writer.sheet_size_pt();

    for page in &grid.pages {
        let (width_px, height_px) = page.image.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(ProcessingError::InvalidDimensions(format!(
                "sheet {} is empty",
                page.label()
            ))
            .into());
        }

        let image_id = {
            let rgb = flatten_onto_white(&page.image);
            let jpeg = encode_jpeg(&rgb, style.jpeg_quality)?;
            writer.add_jpeg(jpeg, width_px, height_px)
        };

        let mut content = PageContent::new();
        content.draw_image(image_id, 0.0, 0.0, sheet_width, sheet_height);
        content.stroke_lines(
            &registration_marks(sheet_width, sheet_height, style.mark_length_pt),
            style.mark_line_width_pt,
        );
        content.text(
            &page.label(),
            LABEL_INSET_X,
            sheet_height - LABEL_INSET_Y,
            style.label_font_size_pt,
        );
        writer.add_page(content)?;

        debug!("Rendered sheet {} ({}x{} px)", page.label(), width_px, height_px);
    }

    Ok(writer.finish())
}
