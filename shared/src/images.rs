// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::upload::UploadFile;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageResult};

pub const COMPRESSED_MIME_TYPE: &str = "image/jpeg";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompressionSettings {
	/// Pictures at or below this many bytes are uploaded as they are
	pub threshold_bytes: usize,
	pub max_dimension: u32,
	pub jpeg_quality: u8,
}

impl Default for CompressionSettings {
	fn default() -> Self {
		Self {
			threshold_bytes: 500 * 1024,
			max_dimension: 1200,
			jpeg_quality: 80,
		}
	}
}

impl CompressionSettings {
	pub fn should_compress(&self, picture: &UploadFile) -> bool {
		picture.size() > self.threshold_bytes
	}
}

/// Shrinks large pictures before upload by scaling them down and re-encoding them as JPEG.
///
/// The original picture is returned if it's already small, if it can't be decoded, or if compressing it doesn't
/// make it any smaller.
pub fn compress_for_upload(picture: UploadFile, settings: &CompressionSettings) -> UploadFile {
	if !settings.should_compress(&picture) {
		return picture;
	}

	let compressed = match image::load_from_memory(&picture.bytes).and_then(|image| encode_scaled(&image, settings)) {
		Ok(bytes) => bytes,
		Err(error) => {
			log::warn!("Couldn't compress {}; uploading the original: {}", picture.file_name, error);
			return picture;
		}
	};
	if compressed.len() >= picture.size() {
		log::info!(
			"Compressing {} didn't reduce its size; uploading the original",
			picture.file_name
		);
		return picture;
	}

	log::info!(
		"Compressed {} from {} to {} bytes",
		picture.file_name,
		picture.size(),
		compressed.len()
	);
	UploadFile::new(
		jpeg_file_name(&picture.file_name),
		String::from(COMPRESSED_MIME_TYPE),
		compressed,
	)
}

fn encode_scaled(image: &DynamicImage, settings: &CompressionSettings) -> ImageResult<Vec<u8>> {
	let (width, height) = scaled_dimensions(image.width(), image.height(), settings.max_dimension);
	let scaled = if (width, height) == (image.width(), image.height()) {
		image.to_rgb8()
	} else {
		image.resize_exact(width, height, FilterType::Triangle).to_rgb8()
	};

	let mut bytes = Vec::new();
	JpegEncoder::new_with_quality(&mut bytes, settings.jpeg_quality).encode(
		scaled.as_raw(),
		width,
		height,
		ColorType::Rgb8,
	)?;
	Ok(bytes)
}

/// Dimensions that fit within `max_dimension` on the longest side, keeping the aspect ratio
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
	if width <= max_dimension && height <= max_dimension {
		return (width, height);
	}
	let scale = |side: u32, longest: u32| -> u32 {
		let scaled = (side as u64 * max_dimension as u64 + longest as u64 / 2) / longest as u64;
		(scaled as u32).max(1)
	};
	if width >= height {
		(max_dimension, scale(height, width))
	} else {
		(scale(width, height), max_dimension)
	}
}

fn jpeg_file_name(file_name: &str) -> String {
	match file_name.rsplit_once('.') {
		Some((stem, _)) if !stem.is_empty() => format!("{}.jpg", stem),
		_ => format!("{}.jpg", file_name),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageBuffer, ImageOutputFormat, Rgb};
	use std::io::Cursor;

	fn noisy_png(width: u32, height: u32) -> Vec<u8> {
		let mut state: u32 = 0x2545_f491;
		let buffer = ImageBuffer::from_fn(width, height, |_, _| {
			state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
			let [r, g, b, _] = state.to_le_bytes();
			Rgb([r, g, b])
		});
		let mut bytes = Vec::new();
		DynamicImage::ImageRgb8(buffer)
			.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
			.unwrap();
		bytes
	}

	#[test]
	fn dimensions_fit_longest_side() {
		assert_eq!(scaled_dimensions(4000, 3000, 1200), (1200, 900));
		assert_eq!(scaled_dimensions(3000, 4000, 1200), (900, 1200));
		assert_eq!(scaled_dimensions(800, 600, 1200), (800, 600));
		assert_eq!(scaled_dimensions(5000, 2, 1200), (1200, 1));
	}

	#[test]
	fn file_names_get_jpg_extension() {
		assert_eq!(jpeg_file_name("selfie.png"), "selfie.jpg");
		assert_eq!(jpeg_file_name("my.photo.webp"), "my.photo.jpg");
		assert_eq!(jpeg_file_name("photo"), "photo.jpg");
	}

	#[test]
	fn large_pictures_are_scaled_and_reencoded() {
		let original = UploadFile::new(
			String::from("selfie.png"),
			String::from("image/png"),
			noisy_png(1400, 1000),
		);
		let original_size = original.size();
		let compressed = compress_for_upload(original, &CompressionSettings::default());

		assert_eq!(compressed.file_name, "selfie.jpg");
		assert_eq!(compressed.mime_type, COMPRESSED_MIME_TYPE);
		assert!(compressed.size() < original_size);
		let decoded = image::load_from_memory(&compressed.bytes).unwrap();
		assert_eq!((decoded.width(), decoded.height()), (1200, 857));
	}

	#[test]
	fn small_pictures_are_left_alone() {
		let bytes = noisy_png(40, 40);
		let original = UploadFile::new(String::from("tiny.png"), String::from("image/png"), bytes);
		assert_eq!(
			compress_for_upload(original.clone(), &CompressionSettings::default()),
			original
		);
	}

	#[test]
	fn undecodable_pictures_fall_back_to_the_original() {
		let original = UploadFile::new(
			String::from("broken.jpg"),
			String::from("image/jpeg"),
			vec![0x42; 600 * 1024],
		);
		assert_eq!(
			compress_for_upload(original.clone(), &CompressionSettings::default()),
			original
		);
	}
}
