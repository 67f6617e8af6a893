//! Configuration section definitions.
//!
//! | Module   | TOML Section | Purpose                               |
//! |----------|--------------|---------------------------------------|
//! | `site`   | `[site]`     | Site title, language, author, date    |
//! | `layout` | `[layout]`   | Preview/export/asset directories      |
//! | `export` | `[export]`   | Exported page file name               |
//! | `image`  | `[image]`    | Image bounding boxes and minimum size |
//! | `assets` | `[assets]`   | CSS/JS hrefs per tree                 |

mod assets;
mod export;
mod image;
mod layout;
mod site;

pub use assets::{AssetSet, AssetsConfig};
pub use export::ExportConfig;
pub use image::ImageConfig;
pub use layout::LayoutConfig;
pub use site::SiteConfig;
