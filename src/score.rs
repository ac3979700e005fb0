//! Focus scoring for decoded frames.
//!
//! The focus measure is the variance of a discrete Laplacian response:
//! defocused images carry little high-frequency energy, so their
//! second-derivative response is near-zero everywhere and has low variance,
//! while sharp edges produce large-magnitude responses of both signs and a
//! high variance. Higher score = sharper frame.

use image::DynamicImage;

/// Compute the Laplacian-variance focus score of a frame.
///
/// The frame is converted to 8-bit luma (a derived copy — the input is never
/// mutated), the interior is convolved with the 4-neighbour Laplacian kernel
///
/// ```text
///  0  1  0
///  1 -4  1
///  0  1  0
/// ```
///
/// in `f64`, and the population variance of the response map is returned.
/// Deterministic: the same frame always yields the same score.
///
/// A fully uniform frame scores `0.0` — a valid minimum, not an error.
/// Frames narrower or shorter than 3 pixels have no interior and also score
/// `0.0`.
///
/// The convolution is done by hand because `image`'s `filter3x3` clamps its
/// output to `u8`, which discards the negative half of the response.
pub fn laplacian_variance(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let pixels = gray.as_raw();
    let stride = width as usize;
    let response_count = ((width - 2) as usize) * ((height - 2) as usize);
    let mut responses = Vec::with_capacity(response_count);

    for row in 1..(height as usize - 1) {
        for column in 1..(width as usize - 1) {
            let center = pixels[row * stride + column] as f64;
            let above = pixels[(row - 1) * stride + column] as f64;
            let below = pixels[(row + 1) * stride + column] as f64;
            let left = pixels[row * stride + column - 1] as f64;
            let right = pixels[row * stride + column + 1] as f64;
            responses.push(above + below + left + right - 4.0 * center);
        }
    }

    variance(&responses)
}

/// Population variance of a slice of samples.
fn variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    samples
        .iter()
        .map(|sample| {
            let diff = sample - mean;
            diff * diff
        })
        .sum::<f64>()
        / count
}
