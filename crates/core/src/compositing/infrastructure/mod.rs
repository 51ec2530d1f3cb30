pub mod bitmap_font;
pub mod drawing;
pub mod frame_compositor;
pub mod overlay;
