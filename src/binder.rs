//! Directory-to-document conversion.
//!
//! [`DirectoryBinder`] is the seam between the scheduling pipeline and the
//! actual document format. The pipeline only ever sees "directory in,
//! document path out", which keeps it testable with stub binders and leaves
//! page assembly swappable.
//!
//! [`PdfBinder`] is the default implementation: one PDF page per image,
//! sized to the image's native pixel dimensions (1 px = 1 pt), pages
//! collated by filename. Binders are called from `spawn_blocking` — image
//! decoding and PDF serialisation are CPU-bound and must stay off the async
//! worker threads.

use crate::classify;
use crate::error::BinderyError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Converts one source directory into a single document file.
///
/// Implementations write the produced document into `work_dir` under a
/// collision-free name and return its path; the pipeline moves it to its
/// final destination afterwards.
pub trait DirectoryBinder: Send + Sync {
    /// Bind every image in `source_dir` into one document in `work_dir`.
    ///
    /// Must fail with a descriptive error if any contained image cannot be
    /// decoded.
    fn bind(&self, source_dir: &Path, work_dir: &Path) -> Result<PathBuf, BinderyError>;
}

/// Read the pixel dimensions of a single image without decoding its pixels.
pub fn decode_image_dimensions(path: &Path) -> Result<(u32, u32), BinderyError> {
    image::image_dimensions(path).map_err(|err| BinderyError::ImageDecode {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}

/// One document page: an image and its native size.
#[derive(Debug, Clone)]
struct Page {
    image_path: PathBuf,
    width: u32,
    height: u32,
}

/// The default binder: images become PDF pages via `printpdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfBinder;

impl PdfBinder {
    pub fn new() -> Self {
        Self
    }

    /// Enumerate and measure the directory's images, collated by filename.
    ///
    /// Collation is a plain byte-wise path sort, so `page10` comes before
    /// `page9`; zero-padded names (`page09`) collate as expected. Callers
    /// needing numeric or locale-aware ordering should implement their own
    /// [`DirectoryBinder`].
    fn collect_pages(&self, source_dir: &Path) -> Result<Vec<Page>, BinderyError> {
        let entries = fs::read_dir(source_dir).map_err(|err| BinderyError::Bind {
            dir: source_dir.to_path_buf(),
            detail: format!("cannot list directory: {err}"),
        })?;

        let mut image_paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| !path.is_dir() && classify::is_supported_image(path))
            .collect();
        image_paths.sort();

        if image_paths.is_empty() {
            return Err(BinderyError::EmptyDirectory {
                dir: source_dir.to_path_buf(),
            });
        }

        image_paths
            .into_iter()
            .map(|image_path| {
                let (width, height) = decode_image_dimensions(&image_path)?;
                Ok(Page {
                    image_path,
                    width,
                    height,
                })
            })
            .collect()
    }
}

/// 1 px = 1 pt; printpdf pages are sized in Mm.
fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 * 25.4 / 72.0)
}

impl DirectoryBinder for PdfBinder {
    fn bind(&self, source_dir: &Path, work_dir: &Path) -> Result<PathBuf, BinderyError> {
        let pages = self.collect_pages(source_dir)?;
        let stem = source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bound".to_string());

        info!(
            "Binding {} ({} pages)",
            source_dir.display(),
            pages.len()
        );

        let mut doc = PdfDocument::new(&stem);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        // Decode one image at a time; only the re-encoded XObject stays
        // resident in the document.
        for page in &pages {
            let decoded =
                image::open(&page.image_path).map_err(|err| BinderyError::ImageDecode {
                    path: page.image_path.clone(),
                    detail: err.to_string(),
                })?;
            let rgb = decoded.to_rgb8();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: page.width as usize,
                height: page.height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Page sized to the image; the image fills it edge to edge.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(px_to_mm(page.width), px_to_mm(page.height), ops));

            debug!(
                "Added page {} ({}x{} px)",
                page.image_path.display(),
                page.width,
                page.height
            );
        }

        doc.with_pages(pdf_pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            debug!("printpdf: {warning:?}");
        }

        // Unique name in the work directory; parallel tasks may bind
        // same-named directories from different parents.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(".pdf")
            .tempfile_in(work_dir)
            .map_err(|err| BinderyError::Bind {
                dir: source_dir.to_path_buf(),
                detail: format!("cannot create work file: {err}"),
            })?;
        tmp.write_all(&bytes).map_err(|err| BinderyError::Bind {
            dir: source_dir.to_path_buf(),
            detail: format!("cannot write work file: {err}"),
        })?;
        let (_, produced) = tmp.keep().map_err(|err| BinderyError::Bind {
            dir: source_dir.to_path_buf(),
            detail: format!("cannot persist work file: {err}"),
        })?;

        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([120, 30, 200]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn dimensions_come_from_the_image_header() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("p.png");
        write_png(&img, 7, 11);
        assert_eq!(decode_image_dimensions(&img).unwrap(), (7, 11));
    }

    #[test]
    fn bind_produces_a_pdf_in_the_work_dir() {
        let src = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        write_png(&src.path().join("01.png"), 4, 6);
        write_png(&src.path().join("02.png"), 8, 8);

        let produced = PdfBinder::new().bind(src.path(), work.path()).unwrap();
        assert!(produced.starts_with(work.path()));

        let bytes = fs::read(&produced).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "not a PDF header");
    }

    #[test]
    fn pages_collate_bytewise_by_filename() {
        let src = TempDir::new().unwrap();
        write_png(&src.path().join("page9.png"), 2, 2);
        write_png(&src.path().join("page10.png"), 2, 2);
        write_png(&src.path().join("cover.png"), 2, 2);

        let pages = PdfBinder::new().collect_pages(src.path()).unwrap();
        let names: Vec<&str> = pages
            .iter()
            .map(|p| p.image_path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["cover.png", "page10.png", "page9.png"]);
    }

    #[test]
    fn undecodable_image_fails_with_its_path() {
        let src = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        write_png(&src.path().join("01.png"), 4, 4);
        fs::write(src.path().join("02.jpg"), b"definitely not a jpeg").unwrap();

        let err = PdfBinder::new().bind(src.path(), work.path()).unwrap_err();
        match err {
            BinderyError::ImageDecode { path, .. } => {
                assert!(path.ends_with("02.jpg"));
            }
            other => panic!("expected ImageDecode, got {other:?}"),
        }
    }

    #[test]
    fn directory_without_images_fails() {
        let src = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        fs::write(src.path().join("notes.txt"), b"x").unwrap();

        let err = PdfBinder::new().bind(src.path(), work.path()).unwrap_err();
        assert!(matches!(err, BinderyError::EmptyDirectory { .. }));
    }
}
