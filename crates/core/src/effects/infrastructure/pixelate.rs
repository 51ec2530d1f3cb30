/// Replace each `block`×`block` tile of a packed buffer with its mean colour.
///
/// Tiles along the right and bottom edges may be partial; they average only
/// the pixels that exist, so the buffer keeps its exact dimensions.
pub fn pixelate(data: &mut [u8], width: usize, height: usize, channels: usize, block: usize) {
    if block == 0 || width == 0 || height == 0 {
        return;
    }
    let mut sums = vec![0u32; channels];

    for ty in (0..height).step_by(block) {
        let th = block.min(height - ty);
        for tx in (0..width).step_by(block) {
            let tw = block.min(width - tx);

            sums.iter_mut().for_each(|s| *s = 0);
            for y in ty..ty + th {
                for x in tx..tx + tw {
                    let i = (y * width + x) * channels;
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += data[i + c] as u32;
                    }
                }
            }

            let count = (tw * th) as u32;
            let mean: Vec<u8> = sums
                .iter()
                .map(|&s| ((s + count / 2) / count) as u8)
                .collect();
            for y in ty..ty + th {
                for x in tx..tx + tw {
                    let i = (y * width + x) * channels;
                    data[i..i + channels].copy_from_slice(&mean);
                }
            }
        }
    }
}
