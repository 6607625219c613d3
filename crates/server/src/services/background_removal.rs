//! Background removal for product photos.
//!
//! The actual segmentation model runs in a separate service; this module
//! sends it the raw upload, gets back a PNG with a transparent
//! background, composites that over a white canvas, and re-encodes as
//! JPEG. Callers fall back to the original bytes whenever any part of
//! this fails.

use thiserror::Error;

/// JPEG quality used for re-encoded images.
const JPEG_QUALITY: u8 = 90;

/// MIME types eligible for background removal.
const SUPPORTED_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Errors that can occur during background removal.
#[derive(Debug, Error)]
pub enum BackgroundRemovalError {
    /// No removal service endpoint is configured.
    #[error("background removal service is not configured")]
    NotConfigured,

    /// HTTP request to the removal service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Removal service returned an error response.
    #[error("service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Decoding or re-encoding the image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A processed image ready for storage.
#[derive(Debug)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Checks whether the given MIME type is eligible for background removal.
#[must_use]
pub fn is_supported_image_type(mime_type: &str) -> bool {
    SUPPORTED_TYPES.contains(&mime_type.to_lowercase().as_str())
}

/// Substitute a filename's extension with `.jpg` ("photo.png" -> "photo.jpg").
#[must_use]
pub fn jpeg_filename(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => format!("{base}.jpg"),
        _ => format!("{original}.jpg"),
    }
}

/// Client for the background-removal service.
#[derive(Clone)]
pub struct BackgroundRemovalClient {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl BackgroundRemovalClient {
    /// Create a client. With no endpoint configured, every call reports
    /// [`BackgroundRemovalError::NotConfigured`], which callers treat as
    /// an ordinary removal failure (store the original bytes).
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Remove the background from an image and flatten it onto white.
    ///
    /// Sends the original bytes to the removal service, expects a PNG
    /// with transparency back, and returns the flattened JPEG.
    ///
    /// # Errors
    ///
    /// Returns `BackgroundRemovalError` if the service is unconfigured or
    /// unreachable, responds non-2xx, or the result cannot be re-encoded.
    pub async fn remove_background(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<ProcessedImage, BackgroundRemovalError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(BackgroundRemovalError::NotConfigured)?;

        let response = self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, mime_type.to_owned())
            .body(image_bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackgroundRemovalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let transparent = response.bytes().await?;
        let bytes = flatten_onto_white(&transparent)?;

        Ok(ProcessedImage {
            bytes,
            mime_type: "image/jpeg",
        })
    }
}

/// Composite an image (usually a transparent PNG) over a white canvas and
/// encode the result as JPEG.
///
/// # Errors
///
/// Returns `image::ImageError` if the input cannot be decoded or the
/// JPEG cannot be encoded.
pub fn flatten_onto_white(image_bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(image_bytes)?.to_rgba8();
    let (width, height) = decoded.dimensions();

    let mut flattened = image::RgbImage::new(width, height);
    for (x, y, pixel) in decoded.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        // Straight alpha over an opaque white background.
        let blend = |c: u8| -> u8 {
            let c = u16::from(c);
            let out = (c * alpha + 255 * (255 - alpha)) / 255;
            #[allow(clippy::cast_possible_truncation)] // result is <= 255 by construction
            {
                out as u8
            }
        };
        flattened.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut out = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut out);
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    image::DynamicImage::ImageRgb8(flattened).write_with_encoder(encoder)?;

    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types_cover_uploadable_images() {
        assert!(is_supported_image_type("image/png"));
        assert!(is_supported_image_type("image/jpeg"));
        assert!(is_supported_image_type("IMAGE/WEBP"));
        assert!(!is_supported_image_type("application/pdf"));
        assert!(!is_supported_image_type("image/gif"));
    }

    #[test]
    fn test_jpeg_filename_substitutes_extension() {
        assert_eq!(jpeg_filename("photo.png"), "photo.jpg");
        assert_eq!(jpeg_filename("archive.tar.webp"), "archive.tar.jpg");
        assert_eq!(jpeg_filename("no-extension"), "no-extension.jpg");
        assert_eq!(jpeg_filename(".hidden"), ".hidden.jpg");
    }

    #[test]
    fn test_flatten_turns_transparency_white() {
        // 2x1 PNG: one opaque red pixel, one fully transparent pixel.
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([200, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let jpeg = flatten_onto_white(&png).unwrap();
        let result = image::load_from_memory(&jpeg).unwrap().to_rgb8();

        // JPEG is lossy; allow a generous tolerance.
        let transparent_side = result.get_pixel(1, 0).0;
        assert!(transparent_side.iter().all(|&c| c > 240), "expected near-white, got {transparent_side:?}");

        let red_side = result.get_pixel(0, 0).0;
        assert!(red_side[0] > 150 && red_side[1] < 100, "expected red-ish, got {red_side:?}");
    }

    #[test]
    fn test_flatten_rejects_garbage() {
        assert!(flatten_onto_white(b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_not_configured() {
        let client = BackgroundRemovalClient::new(None);
        let result = client.remove_background(b"bytes", "image/png").await;
        assert!(matches!(result, Err(BackgroundRemovalError::NotConfigured)));
    }
}
