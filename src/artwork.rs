//! Backdrop artwork: URL construction, decoding and the texture cache

use std::collections::{HashMap, VecDeque};

use eframe::egui;

use crate::api::FetchError;

/// Size token used when none is requested
pub const ORIGINAL_SIZE: &str = "original";

/// Largest edge kept after decoding; bigger images are scaled down
pub const MAX_TEXTURE_EDGE: u32 = 1920;

/// Textures kept before the oldest is released
pub const MAX_TEXTURES: usize = 200;

/// Build `{base}/{size}/{path}`. An absent or blank path gives an empty string
/// so callers can render a placeholder instead.
pub fn make_image_path(base_url: &str, path: Option<&str>, size: Option<&str>) -> String {
    let path = match path.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return String::new(),
    };
    let size = size.filter(|s| !s.is_empty()).unwrap_or(ORIGINAL_SIZE);

    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        size,
        path.trim_start_matches('/')
    )
}

/// Texture coordinates that crop an image of `image_size` to fill `target`
/// without stretching (centre crop)
pub fn cover_uv(image_size: egui::Vec2, target: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }
    let image_aspect = image_size.x / image_size.y;
    let target_aspect = target.x / target.y;
    if image_aspect > target_aspect {
        let w = target_aspect / image_aspect;
        egui::Rect::from_min_max(egui::pos2((1.0 - w) / 2.0, 0.0), egui::pos2((1.0 + w) / 2.0, 1.0))
    } else {
        let h = image_aspect / target_aspect;
        egui::Rect::from_min_max(egui::pos2(0.0, (1.0 - h) / 2.0), egui::pos2(1.0, (1.0 + h) / 2.0))
    }
}

/// RGBA pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Decode JPEG/PNG/WebP bytes, shrinking anything larger than `max_edge`
pub fn decode_image(bytes: &[u8], max_edge: u32) -> Result<DecodedImage, FetchError> {
    let mut img = image::load_from_memory(bytes)
        .map_err(|e| FetchError::Malformed(format!("image: {}", e)))?;
    if img.width() > max_edge || img.height() > max_edge {
        img = img.thumbnail(max_edge, max_edge);
    }
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        size: [rgba.width() as usize, rgba.height() as usize],
        rgba: rgba.into_raw(),
    })
}

/// Anything that can download raw image bytes
pub trait ImageSource: Send + Sync {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone)]
pub enum ImageState {
    Loading,
    Loaded(egui::TextureHandle),
    Failed,
}

/// Textures keyed by image URL. Each URL is requested at most once until it
/// is evicted or the cache is cleared.
pub struct ArtworkCache {
    images: HashMap<String, ImageState>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for ArtworkCache {
    fn default() -> Self {
        Self::with_capacity(MAX_TEXTURES)
    }
}

impl ArtworkCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            images: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, url: &str) -> Option<&ImageState> {
        self.images.get(url)
    }

    /// Texture for `url` if it has finished loading
    pub fn texture(&self, url: &str) -> Option<&egui::TextureHandle> {
        match self.images.get(url) {
            Some(ImageState::Loaded(texture)) => Some(texture),
            _ => None,
        }
    }

    /// Marks `url` as loading. Returns true when the caller should start a
    /// download (unknown, non-empty URL).
    pub fn begin(&mut self, url: &str) -> bool {
        if url.is_empty() || self.images.contains_key(url) {
            return false;
        }
        self.insert(url.to_string(), ImageState::Loading);
        true
    }

    /// Upload a finished download. Results for URLs no longer tracked are dropped.
    pub fn finish(
        &mut self,
        ctx: &egui::Context,
        url: &str,
        result: Result<DecodedImage, FetchError>,
    ) -> bool {
        let Some(state) = self.images.get_mut(url) else {
            return false;
        };
        *state = match result {
            Ok(decoded) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(decoded.size, &decoded.rgba);
                ImageState::Loaded(ctx.load_texture(url, image, egui::TextureOptions::LINEAR))
            }
            Err(_) => ImageState::Failed,
        };
        true
    }

    fn insert(&mut self, url: String, state: ImageState) {
        if self.images.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.images.remove(&oldest);
            }
        }
        self.order.push_back(url.clone());
        self.images.insert(url, state);
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p";

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_sized_image() {
        assert_eq!(
            make_image_path(BASE, Some("/abc.jpg"), Some("w500")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_default_size_is_original() {
        assert_eq!(
            make_image_path("https://image.tmdb.org/t/p/", Some("abc.jpg"), None),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn test_absent_path_degrades_to_empty() {
        assert_eq!(make_image_path(BASE, None, Some("w500")), "");
        assert_eq!(make_image_path(BASE, Some("  "), None), "");
    }

    #[test]
    fn test_cover_crops_the_long_side() {
        let wide = cover_uv(egui::vec2(200.0, 100.0), egui::vec2(100.0, 100.0));
        assert_eq!(wide.min, egui::pos2(0.25, 0.0));
        assert_eq!(wide.max, egui::pos2(0.75, 1.0));

        let tall = cover_uv(egui::vec2(100.0, 200.0), egui::vec2(100.0, 100.0));
        assert_eq!(tall.min, egui::pos2(0.0, 0.25));
        assert_eq!(tall.max, egui::pos2(1.0, 0.75));

        let empty = cover_uv(egui::vec2(0.0, 0.0), egui::vec2(10.0, 10.0));
        assert_eq!(empty.max, egui::pos2(1.0, 1.0));
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&png_bytes(4, 3), MAX_TEXTURE_EDGE).unwrap();
        assert_eq!(decoded.size, [4, 3]);
        assert_eq!(decoded.rgba.len(), 4 * 3 * 4);
        assert_eq!(&decoded.rgba[..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn test_decode_shrinks_large_images() {
        let decoded = decode_image(&png_bytes(40, 20), 10).unwrap();
        assert_eq!(decoded.size, [10, 5]);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode_image(b"<html>not found</html>", MAX_TEXTURE_EDGE).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_each_url_requested_once() {
        let mut cache = ArtworkCache::default();
        assert!(cache.begin("https://x/a.jpg"));
        assert!(!cache.begin("https://x/a.jpg"));
        assert!(!cache.begin(""));
        assert!(matches!(cache.get("https://x/a.jpg"), Some(ImageState::Loading)));
        assert!(cache.texture("https://x/a.jpg").is_none());
    }

    #[test]
    fn test_finish_uploads_texture() {
        let ctx = egui::Context::default();
        let mut cache = ArtworkCache::default();
        cache.begin("https://x/a.jpg");
        let decoded = decode_image(&png_bytes(2, 2), MAX_TEXTURE_EDGE).unwrap();

        assert!(cache.finish(&ctx, "https://x/a.jpg", Ok(decoded)));
        let texture = cache.texture("https://x/a.jpg").unwrap();
        assert_eq!(texture.size(), [2, 2]);
    }

    #[test]
    fn test_failed_download_is_not_retried() {
        let ctx = egui::Context::default();
        let mut cache = ArtworkCache::default();
        cache.begin("https://x/missing.jpg");
        cache.finish(&ctx, "https://x/missing.jpg", Err(FetchError::Status(404)));

        assert!(matches!(cache.get("https://x/missing.jpg"), Some(ImageState::Failed)));
        assert!(!cache.begin("https://x/missing.jpg"));
    }

    #[test]
    fn test_untracked_result_is_dropped() {
        let ctx = egui::Context::default();
        let mut cache = ArtworkCache::default();
        cache.begin("https://x/a.jpg");
        cache.clear();
        assert!(!cache.finish(&ctx, "https://x/a.jpg", Err(FetchError::Status(500))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted() {
        let mut cache = ArtworkCache::with_capacity(2);
        cache.begin("a");
        cache.begin("b");
        cache.begin("c");
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.begin("a"));
    }
}
