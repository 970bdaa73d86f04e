// Blockwise DCT round-trip for the emulated learned image transform.
//
// The learned model's operating point supplies the per-coefficient
// quantization table; the transform itself is a plain 8x8 DCT-II/IDCT pair
// applied per channel with edge replication on partial blocks.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use image::RgbImage;

use crate::model::{ImageModel, QUANT_BLOCK};

const N: usize = QUANT_BLOCK;

fn basis(u: usize, x: usize) -> f32 {
    (((2 * x + 1) as f32) * (u as f32) * PI / (2.0 * N as f32)).cos()
}

fn alpha(u: usize) -> f32 {
    if u == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// 2D DCT-II of one 8x8 block
fn dct_block(input: &[f32; 64], out: &mut [f32; 64]) {
    for u in 0..N {
        for v in 0..N {
            let mut sum = 0.0;
            for x in 0..N {
                for y in 0..N {
                    sum += input[x * N + y] * basis(u, x) * basis(v, y);
                }
            }
            out[u * N + v] = 0.25 * alpha(u) * alpha(v) * sum;
        }
    }
}

/// 2D DCT-III (inverse) of one 8x8 block
fn idct_block(coef: &[f32; 64], out: &mut [f32; 64]) {
    for x in 0..N {
        for y in 0..N {
            let mut sum = 0.0;
            for u in 0..N {
                for v in 0..N {
                    sum += alpha(u) * alpha(v) * coef[u * N + v] * basis(u, x) * basis(v, y);
                }
            }
            out[x * N + y] = 0.25 * sum;
        }
    }
}

/// Lossy encode/decode cycle over the whole frame.
///
/// Coefficients are snapped to the model's quantization steps, which is
/// where the fidelity loss happens; the requested output quality does not
/// influence this stage.
pub fn reconstruct(frame: &RgbImage, model: &ImageModel) -> RgbImage {
    let (width, height) = frame.dimensions();
    let mut recon = frame.clone();

    let mut block = [0.0f32; 64];
    let mut coef = [0.0f32; 64];
    let mut pixels = [0.0f32; 64];

    for channel in 0..3 {
        for block_x in (0..height).step_by(N) {
            for block_y in (0..width).step_by(N) {
                // Gather with edge replication
                for x in 0..N {
                    for y in 0..N {
                        let px = (block_x + x as u32).min(height - 1);
                        let py = (block_y + y as u32).min(width - 1);
                        block[x * N + y] = frame.get_pixel(py, px).0[channel] as f32 - 128.0;
                    }
                }

                dct_block(&block, &mut coef);
                for u in 0..N {
                    for v in 0..N {
                        let step = model.step(u, v);
                        coef[u * N + v] = (coef[u * N + v] / step).round() * step;
                    }
                }
                idct_block(&coef, &mut pixels);

                // Scatter valid pixels only
                for x in 0..N {
                    for y in 0..N {
                        let px = block_x + x as u32;
                        let py = block_y + y as u32;
                        if px < height && py < width {
                            let value = (pixels[x * N + y] + 128.0).round().clamp(0.0, 255.0);
                            recon.get_pixel_mut(py, px).0[channel] = value as u8;
                        }
                    }
                }
            }
        }
    }
    recon
}
