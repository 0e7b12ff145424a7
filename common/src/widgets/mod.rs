//! Widget components shared by the rotating screens and the overlay.
//!
//! - [`header`]: Title with rule and the "Screen i/n" footer
//! - [`popups`]: Notification popup and the no-data placeholder
//! - [`primitives`]: Word wrapping and multi-line text helpers
//!
//! All widgets are generic over `DrawTarget<Color = BinaryColor>` so they
//! draw into a [`Frame`](crate::Frame) in production and tests alike.

mod header;
mod popups;
mod primitives;

pub use header::{draw_footer, draw_title};
pub use popups::{draw_no_data_banner, draw_notification_popup};
pub use primitives::{WrappedLine, draw_text_rows, wrap_words};
