//! Post model and the append-only HTML document builder.
//!
//! # Module Structure
//!
//! ```text
//! post/
//! ├── block.rs     # Block variants + validation
//! ├── meta.rs      # PostMeta (header fields)
//! ├── render.rs    # Post → marked HTML fragments, per tree
//! ├── parse.rs     # marked HTML → Post (resume)
//! ├── builder.rs   # Composer trait, DocumentBuilder
//! └── session.rs   # Session: builder + image pipeline + export lock
//! ```
//!
//! # Flow
//!
//! ```text
//! start ──► head fragment ──► temp/post.html
//! append ─► block fragment ─► temp/post.html (+ in-memory Post)
//! resume ◄─ temp/post.html or exp/post/<name>.html
//! export ─► head + blocks + tail ─► exp/post/<name>.html (written once)
//! ```

mod block;
mod builder;
mod meta;
mod parse;
mod render;
mod session;


pub use block::Block;
pub use meta::PostMeta;
pub use session::{NewPost, Session};

use serde::{Deserialize, Serialize};

use crate::image::ImageRef;

/// A post: header data plus ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub meta: PostMeta,
    blocks: Vec<Block>,
}

impl Post {
    pub fn new(meta: PostMeta) -> Self {
        Self::with_blocks(meta, Vec::new())
    }

    pub fn with_blocks(meta: PostMeta, blocks: Vec<Block>) -> Self {
        Self { meta, blocks }
    }

    /// Blocks in insertion order, which is also rendering order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Every image the post references, header first, without repeats.
    pub fn images(&self) -> Vec<ImageRef> {
        let mut images = vec![self.meta.header_image.clone()];
        for block in &self.blocks {
            if let Block::Image { image, .. } = block
                && !images.contains(image)
            {
                images.push(image.clone());
            }
        }
        images
    }
}
