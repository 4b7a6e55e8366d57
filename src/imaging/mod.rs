pub mod blur;
pub mod png_io;
pub mod resize;

pub use blur::{gaussian_blur, gaussian_kernel, kernel_size};
pub use png_io::{decode_png, encode_png, flatten, optimize_png, read_png, write_png};
pub use resize::{bilinear_resize, scaled_dim};
