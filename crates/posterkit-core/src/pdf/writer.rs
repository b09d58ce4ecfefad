//! Multi-page PDF assembly using lopdf.
//!
//! Every page shares one sheet size. Coordinates are PDF points with the
//! origin at the bottom-left corner of the sheet.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::Result;
use crate::units::SheetSize;

/// Resource name of the label font.
const FONT_NAME: &str = "F1";

/// Builds a PDF document out of equally sized sheets.
pub struct SheetWriter {
    document: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width_pt: f32,
    height_pt: f32,
}

/// Drawing operations for one sheet.
#[derive(Debug, Default)]
pub struct PageContent {
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

impl SheetWriter {
    /// Start an empty document with sheets of the given size.
    pub fn new(sheet: SheetSize) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let (width_pt, height_pt) = sheet.to_pt();

        Self {
            document,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            width_pt,
            height_pt,
        }
    }

    /// Sheet size in points.
    pub fn sheet_size_pt(&self) -> (f32, f32) {
        (self.width_pt, self.height_pt)
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Embed a baseline JPEG as an image XObject.
    ///
    /// The JPEG data is stored as-is with the DCT filter; it is not
    /// re-compressed.
    pub fn add_jpeg(&mut self, jpeg: Vec<u8>, width_px: u32, height_px: u32) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width_px as i64,
            "Height" => height_px as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        self.document
            .add_object(Stream::new(dict, jpeg).with_compression(false))
    }

    /// Append a page with the given content.
    pub fn add_page(&mut self, content: PageContent) -> Result<ObjectId> {
        let stream = Content {
            operations: content.operations,
        }
        .encode()?;
        let content_id = self.document.add_object(Stream::new(dictionary! {}, stream));

        let resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
            "XObject" => content.xobjects,
        };

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), self.width_pt.into(), self.height_pt.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Close the page tree and return the document.
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.compress();

        debug!("Finished PDF with {} pages", count);
        self.document
    }
}

impl PageContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an embedded image into the rectangle with lower-left corner `(x, y)`.
    pub fn draw_image(&mut self, image_id: ObjectId, x: f32, y: f32, width: f32, height: f32) {
        let name = format!("Im{}", image_id.0);
        self.xobjects.set(name.clone(), image_id);

        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Stroke straight black line segments.
    pub fn stroke_lines(&mut self, segments: &[((f32, f32), (f32, f32))], line_width: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("w", vec![line_width.into()]),
        ]);
        for &((x1, y1), (x2, y2)) in segments {
            self.operations.push(Operation::new("m", vec![x1.into(), y1.into()]));
            self.operations.push(Operation::new("l", vec![x2.into(), y2.into()]));
        }
        self.operations.push(Operation::new("S", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Draw black Helvetica text with its baseline starting at `(x, y)`.
    pub fn text(&mut self, text: &str, x: f32, y: f32, size: f32) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("Tf", vec![FONT_NAME.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }
}
