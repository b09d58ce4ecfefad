//! Poster tiling: scale an image to a physical size and split it into
//! printable sheets with registration marks and assembly labels.

mod render;
mod tiler;

pub use render::{render_pages_to_document, SheetStyle};
pub use tiler::{centering_offset, compose_canvas, partition_into_pages, scale_to_fit, tile_poster};

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use tracing::info;

use crate::error::Result;
use crate::files;
use crate::pdf;
use crate::units::{PhysicalSize, SheetSize};

/// One sheet-sized crop of the poster canvas.
#[derive(Debug, Clone)]
pub struct Page {
    /// Grid row, 0-based.
    pub row: u32,
    /// Grid column, 0-based.
    pub col: u32,
    /// Left edge of the crop on the canvas, in pixels.
    pub left: u32,
    /// Top edge of the crop on the canvas, in pixels.
    pub upper: u32,
    /// Cropped pixels. Edge pages may be smaller than a full sheet.
    pub image: DynamicImage,
}

impl Page {
    /// Grid row as printed on the sheet, 1-based.
    pub fn row_number(&self) -> u32 {
        self.row + 1
    }

    /// Grid column as printed on the sheet, 1-based.
    pub fn col_number(&self) -> u32 {
        self.col + 1
    }

    /// Assembly label printed on the sheet, e.g. `"Row 1, Col 2"`.
    pub fn label(&self) -> String {
        format!("Row {}, Col {}", self.row_number(), self.col_number())
    }
}

/// Pages covering a canvas, in row-major order.
#[derive(Debug, Clone)]
pub struct PageGrid {
    pub pages: Vec<Page>,
    /// Number of columns.
    pub pages_x: u32,
    /// Number of rows.
    pub pages_y: u32,
    /// Full page size in pixels.
    pub page_size: (u32, u32),
    /// Canvas size in pixels.
    pub canvas_size: (u32, u32),
}

impl PageGrid {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Options for [`create_poster`].
#[derive(Debug, Clone, Copy)]
pub struct PosterOptions {
    pub size: PhysicalSize,
    pub sheet: SheetSize,
    pub style: SheetStyle,
}

/// What [`create_poster`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterSummary {
    pub source_size: (u32, u32),
    pub canvas_size: (u32, u32),
    pub pages_x: u32,
    pub pages_y: u32,
}

impl PosterSummary {
    pub fn page_count(&self) -> u32 {
        self.pages_x * self.pages_y
    }
}

/// Default output path: `<stem>_poster.pdf`.
pub fn default_output_path(input: &Path) -> std::path::PathBuf {
    files::sibling_path(input, "_poster.pdf")
}

/// Load `input`, tile it and write the poster PDF to `output`.
///
/// The output file only appears once the whole document has been rendered.
pub fn create_poster(
    input: &Path,
    output: &Path,
    options: &PosterOptions,
) -> Result<PosterSummary> {
    let image = files::load_image(input)?;
    let source_size = image.dimensions();

    let grid = tile_poster(&image, options.size, options.sheet)?;
    drop(image);

    let summary = PosterSummary {
        source_size,
        canvas_size: grid.canvas_size,
        pages_x: grid.pages_x,
        pages_y: grid.pages_y,
    };

    let document = render_pages_to_document(&grid, options.sheet, &options.style)?;
    let bytes = pdf::to_bytes(document)?;
    files::write_atomically(output, &bytes)?;

    info!("Poster saved as {} ({} pages)", output.display(), summary.page_count());
    Ok(summary)
}
