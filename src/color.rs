//! Deterministic per-author display colors.
//!
//! Each chat session owns one `ColorAssigner`; the cache lives and dies with
//! the panel it belongs to rather than being a process-wide singleton, so
//! tearing a panel down releases its palette claims.

use std::collections::HashMap;

/// An RGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AuthorColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `"#ff6666"`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed display palette. Distinct authors are spread across it with low
/// collision likelihood for small author counts.
pub const PALETTE: [AuthorColor; 12] = [
    AuthorColor::from_rgb(0xFF, 0x66, 0x66),
    AuthorColor::from_rgb(0x66, 0xCC, 0xFF),
    AuthorColor::from_rgb(0xFF, 0xCC, 0x66),
    AuthorColor::from_rgb(0x99, 0xCC, 0x99),
    AuthorColor::from_rgb(0xCC, 0x99, 0xFF),
    AuthorColor::from_rgb(0xFF, 0x99, 0xCC),
    AuthorColor::from_rgb(0x66, 0x99, 0xFF),
    AuthorColor::from_rgb(0xFF, 0x99, 0x66),
    AuthorColor::from_rgb(0x99, 0xFF, 0x99),
    AuthorColor::from_rgb(0xFF, 0xCC, 0x99),
    AuthorColor::from_rgb(0xCC, 0xFF, 0xFF),
    AuthorColor::from_rgb(0xCC, 0xCC, 0x66),
];

/// Session-scoped author-color cache.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    assigned: HashMap<String, AuthorColor>,
    claimed: [bool; PALETTE.len()],
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for an author, stable across repeated calls within the session.
    ///
    /// The author id hashes to a palette slot. While unclaimed slots remain,
    /// a collision probes forward to the next unclaimed one, keeping small
    /// author sets on distinct colors; once the palette is exhausted the
    /// hashed slot is reused as-is.
    pub fn color_for(&mut self, author_id: &str) -> AuthorColor {
        if let Some(color) = self.assigned.get(author_id) {
            return *color;
        }
        let mut index = hash_author(author_id) as usize % PALETTE.len();
        if self.claimed.iter().any(|claimed| !claimed) {
            while self.claimed[index] {
                index = (index + 1) % PALETTE.len();
            }
        }
        self.claimed[index] = true;
        let color = PALETTE[index];
        self.assigned.insert(author_id.to_string(), color);
        color
    }
}

/// FNV-1a over the author id bytes.
fn hash_author(author_id: &str) -> u64 {
    let mut hash: u64 = 1469598103934665603;
    for byte in author_id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}
