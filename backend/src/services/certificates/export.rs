//! Certificate export as a raster image or a single-page document.

use crate::services::certificates::capture::{
    encode_png, DocumentEncoder, RasterImage, Surface, SurfaceCapture,
};
use common::model::error::ErrorKind;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Print-quality capture factor.
pub const CAPTURE_SCALE: u32 = 3;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("export capability unavailable: {0}")]
    Unavailable(String),
    #[error("export failed: {0}")]
    Failed(String),
    #[error("an export of this certificate is already running")]
    InProgress,
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::Unavailable(_) => ErrorKind::ExportUnavailable,
            ExportError::Failed(_) => ErrorKind::ExportFailed,
            ExportError::InProgress => ErrorKind::ExportInProgress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Busy flag of one certificate instance.
///
/// Cloning shares the flag. A second `try_begin` while a permit is alive fails;
/// the flag clears when the permit drops.
#[derive(Debug, Clone, Default)]
pub struct ExportLock(Arc<AtomicBool>);

pub struct ExportPermit(Arc<AtomicBool>);

impl ExportLock {
    pub fn try_begin(&self) -> Result<ExportPermit, ExportError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ExportPermit(self.0.clone()))
            .map_err(|_| ExportError::InProgress)
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// `<label>-<personName>.<ext>`, with path separators removed from the name.
pub fn artifact_name(label: &str, person_name: &str, ext: &str) -> String {
    let person: String = person_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '"') { '_' } else { c })
        .collect();
    format!("{}-{}.{}", label, person, ext)
}

pub struct ArtifactExporter {
    capture: Option<Arc<dyn SurfaceCapture>>,
    encoder: Option<Arc<dyn DocumentEncoder>>,
    label: String,
}

impl ArtifactExporter {
    pub fn new(
        capture: Option<Arc<dyn SurfaceCapture>>,
        encoder: Option<Arc<dyn DocumentEncoder>>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            capture,
            encoder,
            label: label.into(),
        }
    }

    fn capture(&self, surface: &Surface<'_>) -> Result<RasterImage, ExportError> {
        let capture = self
            .capture
            .as_ref()
            .ok_or_else(|| ExportError::Unavailable("no surface capture backend".to_string()))?;
        capture.capture(surface, CAPTURE_SCALE)
    }

    pub fn export_image(
        &self,
        surface: &Surface<'_>,
        person_name: &str,
    ) -> Result<Artifact, ExportError> {
        let raster = self.capture(surface)?;
        let bytes = encode_png(&raster)?;
        let file_name = artifact_name(&self.label, person_name, "png");
        info!("Exported image {} ({} bytes)", file_name, bytes.len());
        Ok(Artifact {
            file_name,
            content_type: "image/png",
            bytes,
        })
    }

    pub fn export_document(
        &self,
        surface: &Surface<'_>,
        person_name: &str,
    ) -> Result<Artifact, ExportError> {
        // Check both capabilities before doing any capture work.
        let encoder = self
            .encoder
            .as_ref()
            .ok_or_else(|| ExportError::Unavailable("no document encoder".to_string()))?;
        let raster = self.capture(surface)?;
        let bytes = encoder.encode_document(&raster)?;
        let file_name = artifact_name(&self.label, person_name, "pdf");
        info!("Exported document {} ({} bytes)", file_name, bytes.len());
        Ok(Artifact {
            file_name,
            content_type: "application/pdf",
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::certificates::capture::tests::sample_surface_png;
    use crate::services::certificates::capture::RasterCapture;

    struct FailingEncoder;

    impl DocumentEncoder for FailingEncoder {
        fn encode_document(&self, _raster: &RasterImage) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Failed("encoder exploded".to_string()))
        }
    }

    /// Records the raster size instead of building a real PDF.
    struct SizeEncoder;

    impl DocumentEncoder for SizeEncoder {
        fn encode_document(&self, raster: &RasterImage) -> Result<Vec<u8>, ExportError> {
            let (w, h) = raster.dimensions();
            Ok(format!("{}x{}", w, h).into_bytes())
        }
    }

    fn exporter(encoder: Option<Arc<dyn DocumentEncoder>>) -> ArtifactExporter {
        ArtifactExporter::new(Some(Arc::new(RasterCapture)), encoder, "شهادة")
    }

    #[test]
    fn image_export_is_named_and_upscaled() {
        let png = sample_surface_png(20, 14);
        let artifact = exporter(None)
            .export_image(&Surface::from_png(&png), "ماريا نبيل")
            .unwrap();
        assert_eq!(artifact.file_name, "شهادة-ماريا نبيل.png");
        assert_eq!(artifact.content_type, "image/png");
        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (60, 42));
    }

    #[test]
    fn document_export_uses_captured_raster() {
        let png = sample_surface_png(20, 14);
        let artifact = exporter(Some(Arc::new(SizeEncoder)))
            .export_document(&Surface::from_png(&png), "Mina")
            .unwrap();
        assert_eq!(artifact.file_name, "شهادة-Mina.pdf");
        assert_eq!(artifact.bytes, b"60x42");
    }

    #[test]
    fn missing_capabilities_are_unavailable() {
        let png = sample_surface_png(4, 4);
        let no_capture = ArtifactExporter::new(None, None, "cert");
        let err = no_capture
            .export_image(&Surface::from_png(&png), "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExportUnavailable);

        let err = exporter(None)
            .export_document(&Surface::from_png(&png), "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExportUnavailable);
    }

    #[test]
    fn encoder_failure_is_export_failed() {
        let png = sample_surface_png(4, 4);
        let err = exporter(Some(Arc::new(FailingEncoder)))
            .export_document(&Surface::from_png(&png), "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExportFailed);
    }

    #[test]
    fn second_export_is_rejected_while_first_runs() {
        let lock = ExportLock::default();
        let permit = lock.try_begin().unwrap();
        assert!(lock.is_busy());
        assert!(matches!(lock.clone().try_begin(), Err(ExportError::InProgress)));
        drop(permit);
        assert!(!lock.is_busy());
        assert!(lock.try_begin().is_ok());
    }

    #[test]
    fn names_never_contain_path_separators() {
        assert_eq!(artifact_name("cert", "a/b\\c", "png"), "cert-a_b_c.png");
    }
}
