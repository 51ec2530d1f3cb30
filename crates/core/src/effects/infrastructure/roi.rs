use crate::shared::region::Region;

/// ROI rectangle in `usize` frame coordinates, used to pass region geometry
/// to the pixel loops without many arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl From<Region> for RoiRect {
    fn from(region: Region) -> Self {
        Self {
            x: region.x as usize,
            y: region.y as usize,
            w: region.width as usize,
            h: region.height as usize,
        }
    }
}

/// Copy the rows covered by `rect` out of frame data into a packed buffer.
pub fn extract_roi(data: &[u8], frame_width: usize, channels: usize, rect: RoiRect) -> Vec<u8> {
    let row_len = rect.w * channels;
    let mut roi = vec![0u8; row_len * rect.h];
    for row in 0..rect.h {
        let src_offset = ((rect.y + row) * frame_width + rect.x) * channels;
        let dst_offset = row * row_len;
        roi[dst_offset..dst_offset + row_len]
            .copy_from_slice(&data[src_offset..src_offset + row_len]);
    }
    roi
}

/// Write a packed ROI buffer back into frame data. Only bytes inside `rect`
/// are touched.
pub fn write_roi_back(data: &mut [u8], roi: &[u8], frame_width: usize, channels: usize, rect: RoiRect) {
    let row_len = rect.w * channels;
    for row in 0..rect.h {
        let dst_offset = ((rect.y + row) * frame_width + rect.x) * channels;
        let src_offset = row * row_len;
        data[dst_offset..dst_offset + row_len]
            .copy_from_slice(&roi[src_offset..src_offset + row_len]);
    }
}

/// Rec. 601 luma of an RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}
