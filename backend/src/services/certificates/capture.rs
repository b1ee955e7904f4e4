//! Capture and encoding capabilities behind the exporter.
//!
//! `SurfaceCapture` turns a rendered certificate surface into pixels at a given
//! scale; `DocumentEncoder` wraps those pixels into a one-page document. The
//! shipped implementations decode a PNG snapshot of the surface with `image`
//! and lay it out on a landscape A4 page with `genpdf`.

use crate::services::certificates::export::ExportError;
use genpdf::elements::Image as PdfImage;
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{Document, Scale, Size};
use image::imageops::FilterType;
use image::{load_from_memory, DynamicImage, GenericImageView, RgbaImage};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Landscape A4, in millimetres.
const PAGE_WIDTH_MM: f64 = 297.0;
const PAGE_HEIGHT_MM: f64 = 210.0;
/// Keeps the scaled image strictly inside the page so genpdf never spills it
/// onto a second one.
const FIT_SLACK: f64 = 0.999;
/// Largest edge accepted for a surface before scaling.
pub const MAX_SURFACE_EDGE: u32 = 2400;
/// Density cap for rasters placed on a document page. genpdf embeds pixels
/// uncompressed, so every pixel above this costs three bytes of output.
pub const MAX_DOCUMENT_DPI: f64 = 200.0;

/// A rendered certificate, borrowed from the view layer for one export call.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    png: &'a [u8],
}

impl<'a> Surface<'a> {
    pub fn from_png(png: &'a [u8]) -> Self {
        Self { png }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.png
    }
}

/// Captured pixels.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub pixels: RgbaImage,
}

impl RasterImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

pub trait SurfaceCapture: Send + Sync {
    fn capture(&self, surface: &Surface<'_>, scale: u32) -> Result<RasterImage, ExportError>;
}

pub trait DocumentEncoder: Send + Sync {
    fn encode_document(&self, raster: &RasterImage) -> Result<Vec<u8>, ExportError>;
}

/// Captures a PNG snapshot of the surface, upscaled with Lanczos filtering.
#[derive(Debug, Default, Clone)]
pub struct RasterCapture;

impl SurfaceCapture for RasterCapture {
    fn capture(&self, surface: &Surface<'_>, scale: u32) -> Result<RasterImage, ExportError> {
        let img = load_from_memory(surface.bytes())
            .map_err(|e| ExportError::Failed(format!("surface is not a readable image: {}", e)))?;
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 || w.max(h) > MAX_SURFACE_EDGE {
            return Err(ExportError::Failed(format!(
                "surface size {}x{} outside 1..={}",
                w, h, MAX_SURFACE_EDGE
            )));
        }
        let scaled = if scale > 1 {
            img.resize_exact(w * scale, h * scale, FilterType::Lanczos3)
        } else {
            img
        };
        Ok(RasterImage {
            pixels: scaled.to_rgba8(),
        })
    }
}

/// 8-bit RGBA PNG of the raster.
pub fn encode_png(raster: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let (w, h) = raster.dimensions();
    let mut out = Vec::new();
    {
        let mut encoder = PngEncoder::new(&mut out, w, h);
        encoder.set_color(PngColorType::Rgba);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Failed(e.to_string()))?;
        writer
            .write_image_data(raster.pixels.as_raw())
            .map_err(|e| ExportError::Failed(e.to_string()))?;
    }
    Ok(out)
}

/// Downscales `raster` so it fits the page at `MAX_DOCUMENT_DPI`, keeping
/// its aspect ratio. Smaller rasters are used as-is.
fn page_pixels(raster: &RasterImage) -> Cow<'_, RgbaImage> {
    let (w, h) = raster.dimensions();
    let max_w = (PAGE_WIDTH_MM / 25.4 * MAX_DOCUMENT_DPI) as u32;
    let max_h = (PAGE_HEIGHT_MM / 25.4 * MAX_DOCUMENT_DPI) as u32;
    if w <= max_w && h <= max_h {
        return Cow::Borrowed(&raster.pixels);
    }
    let ratio = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
    let new_w = ((f64::from(w) * ratio).round() as u32).clamp(1, max_w);
    let new_h = ((f64::from(h) * ratio).round() as u32).clamp(1, max_h);
    Cow::Owned(image::imageops::resize(
        &raster.pixels,
        new_w,
        new_h,
        FilterType::Lanczos3,
    ))
}

/// Flattens alpha over a white background; genpdf only embeds opaque images.
fn flatten_to_rgb(pixels: &RgbaImage) -> (u32, u32, Vec<u8>) {
    let (w, h) = pixels.dimensions();
    let mut background = RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, pixels, 0, 0);
    let rgb = DynamicImage::ImageRgba8(background).to_rgb8();
    (w, h, rgb.into_raw())
}

/// Loads the family used for document metadata. genpdf needs one even for
/// image-only pages.
pub fn load_font(dir: &Path) -> Result<FontFamily<FontData>, ExportError> {
    if let Ok(family) = genpdf::fonts::from_files(dir, "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(dir, "LiberationSans", None).map_err(|e| {
        ExportError::Unavailable(format!("no usable font in {}: {}", dir.display(), e))
    })
}

/// Single landscape A4 page holding the raster edge to edge.
pub struct GenPdfEncoder {
    fonts: FontFamily<FontData>,
}

impl GenPdfEncoder {
    pub fn new(fonts_dir: &Path) -> Result<Self, ExportError> {
        Ok(Self {
            fonts: load_font(fonts_dir)?,
        })
    }
}

impl DocumentEncoder for GenPdfEncoder {
    fn encode_document(&self, raster: &RasterImage) -> Result<Vec<u8>, ExportError> {
        let (w, h, rgb) = flatten_to_rgb(&page_pixels(raster));

        // genpdf reads images from disk; keep the file alive until rendering ends.
        let mut tmp = NamedTempFile::new().map_err(|e| ExportError::Failed(e.to_string()))?;
        {
            let file = tmp.as_file_mut();
            let mut encoder = PngEncoder::new(&mut *file, w, h);
            encoder.set_color(PngColorType::Rgb);
            encoder.set_depth(PngBitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| ExportError::Failed(e.to_string()))?;
            writer
                .write_image_data(&rgb)
                .map_err(|e| ExportError::Failed(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| ExportError::Failed(e.to_string()))?;
            file.flush().map_err(|e| ExportError::Failed(e.to_string()))?;
        }

        // Width fills the page at this density; height is stretched to match.
        let dpi = f64::from(w) * 25.4 / (PAGE_WIDTH_MM * FIT_SLACK);
        let natural_height_mm = f64::from(h) * 25.4 / dpi;
        let y_scale = PAGE_HEIGHT_MM * FIT_SLACK / natural_height_mm;

        let mut img_elem =
            PdfImage::from_path(tmp.path()).map_err(|e| ExportError::Failed(e.to_string()))?;
        img_elem.set_dpi(dpi);
        img_elem.set_scale(Scale::new(1.0, y_scale));

        let mut doc = Document::new(self.fonts.clone());
        doc.set_title("Certificate");
        doc.set_paper_size(Size::new(PAGE_WIDTH_MM, PAGE_HEIGHT_MM));
        doc.push(img_elem);

        let mut out = Vec::new();
        doc.render(&mut out)
            .map_err(|e| ExportError::Failed(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small opaque PNG standing in for a rendered certificate.
    pub(crate) fn sample_surface_png(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 120, 255])
        });
        encode_png(&RasterImage { pixels: img }).unwrap()
    }

    #[test]
    fn capture_scales_every_edge() {
        let png = sample_surface_png(40, 28);
        let raster = RasterCapture
            .capture(&Surface::from_png(&png), 3)
            .unwrap();
        assert_eq!(raster.dimensions(), (120, 84));
    }

    #[test]
    fn unreadable_surface_fails_capture() {
        let err = RasterCapture
            .capture(&Surface::from_png(b"not a png"), 3)
            .unwrap_err();
        assert!(matches!(err, ExportError::Failed(_)));
    }

    #[test]
    fn oversized_surface_is_refused() {
        let png = sample_surface_png(MAX_SURFACE_EDGE + 1, 1);
        let err = RasterCapture.capture(&Surface::from_png(&png), 3).unwrap_err();
        assert!(matches!(err, ExportError::Failed(_)));
    }

    #[test]
    fn encoded_png_decodes_to_same_size() {
        let png = sample_surface_png(10, 7);
        let decoded = load_from_memory(&png).unwrap();
        assert_eq!(decoded.dimensions(), (10, 7));
    }

    #[test]
    fn flatten_drops_alpha_over_white() {
        let transparent = RasterImage {
            pixels: RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0])),
        };
        let (_, _, rgb) = flatten_to_rgb(&transparent.pixels);
        assert_eq!(rgb.len(), 2 * 2 * 3);
        assert!(rgb.iter().all(|&b| b == 255));
    }

    #[test]
    fn missing_fonts_make_documents_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = GenPdfEncoder::new(dir.path()).err().unwrap();
        assert!(matches!(err, ExportError::Unavailable(_)));
    }

    #[test]
    fn document_raster_is_capped_at_page_density() {
        let small = RasterImage {
            pixels: RgbaImage::new(300, 212),
        };
        assert!(matches!(page_pixels(&small), Cow::Borrowed(_)));

        // 1123x794 surface captured at 3x.
        let large = RasterImage {
            pixels: RgbaImage::new(3369, 2382),
        };
        let capped = page_pixels(&large);
        let (w, h) = capped.dimensions();
        assert!(w <= 2338 && h <= 1653, "{}x{}", w, h);
        assert!(w == 2338 || h == 1653);
    }

    /// Directory holding a usable font family under the name the encoder looks
    /// for, built from whichever system TTF is installed.
    fn font_dir() -> Option<tempfile::TempDir> {
        let source = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]
        .iter()
        .map(Path::new)
        .find(|p| p.exists())?;
        let dir = tempfile::TempDir::new().unwrap();
        for style in ["Regular", "Bold", "Italic", "BoldItalic"] {
            std::fs::copy(source, dir.path().join(format!("LiberationSans-{}.ttf", style)))
                .unwrap();
        }
        Some(dir)
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn document_is_one_landscape_a4_page() {
        let Some(fonts) = font_dir() else {
            eprintln!("no system TTF found, skipping document encoding check");
            return;
        };
        let encoder = GenPdfEncoder::new(fonts.path()).unwrap();
        for (w, h) in [(40, 28), (100, 400), (400, 20)] {
            let png = sample_surface_png(w, h);
            let raster = RasterCapture.capture(&Surface::from_png(&png), 3).unwrap();
            let pdf = encoder.encode_document(&raster).unwrap();
            assert!(pdf.starts_with(b"%PDF"));
            let pages = count(&pdf, b"/Type /Page") - count(&pdf, b"/Type /Pages");
            assert_eq!(pages, 1, "surface {}x{}", w, h);
            assert!(count(&pdf, b"MediaBox[0 0 841.89 595.28]") >= 1);
        }
    }
}
