//! Pixel-art images and the three sprite slots the renderer draws from.
//!
//! Sprites are plain text: a palette header of `key=#rrggbb` lines, one
//! blank line, then equal-length rows of palette keys. `.` is transparent.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::AssetError;
use crate::render::Rgb;

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub w: usize,
    pub h: usize,
    px: Vec<Option<Rgb>>,
}

impl Sprite {
    pub fn parse(src: &str) -> Result<Self, AssetError> {
        let err = |line: usize, reason: String| AssetError::Sprite { line, reason };

        let mut palette = HashMap::new();
        let mut lines = src.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

        for (n, line) in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            let (key, hex) = line
                .split_once('=')
                .ok_or_else(|| err(n, format!("expected key=#rrggbb, got {line:?}")))?;
            let mut keys = key.chars();
            let key = match (keys.next(), keys.next()) {
                (Some(k), None) if k != '.' => k,
                _ => return Err(err(n, format!("bad palette key {key:?}"))),
            };
            let rgb = parse_hex(hex).ok_or_else(|| err(n, format!("bad colour {hex:?}")))?;
            palette.insert(key, rgb);
        }

        let mut w = 0;
        let mut h = 0;
        let mut px = Vec::new();
        for (n, row) in lines {
            if row.is_empty() {
                continue;
            }
            let len = row.chars().count();
            if h == 0 {
                w = len;
            } else if len != w {
                return Err(err(n, format!("row is {len} wide, expected {w}")));
            }
            for c in row.chars() {
                if c == '.' {
                    px.push(None);
                } else {
                    let rgb = palette
                        .get(&c)
                        .ok_or_else(|| err(n, format!("unknown palette key {c:?}")))?;
                    px.push(Some(*rgb));
                }
            }
            h += 1;
        }
        if w == 0 || h == 0 {
            return Err(err(src.lines().count(), "no pixel rows".into()));
        }
        Ok(Sprite { w, h, px })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let src = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&src)
    }

    /// `None` for transparent or out-of-range pixels.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.w && y < self.h {
            self.px[y * self.w + x]
        } else {
            None
        }
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let s = s.trim().strip_prefix('#')?;
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let v = u32::from_str_radix(s, 16).ok()?;
    Some(Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
}

// ── Slots ───────────────────────────────────────────────────────────────────

/// The renderer's images. An empty slot draws as flat colour instead.
#[derive(Clone, Debug, Default)]
pub struct Images {
    pub zula: Option<Sprite>,
    pub tower_top: Option<Sprite>,
    pub tower_bottom: Option<Sprite>,
}

impl Images {
    pub fn none() -> Self {
        Images::default()
    }

    pub fn builtin() -> Self {
        Images {
            zula: slot("zula", Sprite::parse(ZULA_ART)),
            tower_top: slot("tower_top", Sprite::parse(TOWER_TOP_ART)),
            tower_bottom: slot("tower_bottom", Sprite::parse(TOWER_BOTTOM_ART)),
        }
    }

    /// Loads `zula.txt`, `tower_top.txt` and `tower_bottom.txt` from `dir`.
    pub fn load(dir: &Path) -> Self {
        let images = Images {
            zula: slot("zula", Sprite::load(&dir.join("zula.txt"))),
            tower_top: slot("tower_top", Sprite::load(&dir.join("tower_top.txt"))),
            tower_bottom: slot("tower_bottom", Sprite::load(&dir.join("tower_bottom.txt"))),
        };
        info!("sprites loaded from {}", dir.display());
        images
    }
}

fn slot(name: &str, loaded: Result<Sprite, AssetError>) -> Option<Sprite> {
    match loaded {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("sprite {name} unavailable, drawing fallback: {e}");
            None
        }
    }
}

const ZULA_ART: &str = "\
o=#f29a38
d=#c46f1c
p=#f6a5b5
w=#fff4e6
k=#1e1e1e

..........d...d.
.........dpd.dpd
d........ooooooo
od.......okoooko
.o.......ooopooo
.od.ooooooowwwo.
..oooodoooooooo.
..ooodooodoooo..
..oooooooooooo..
...oo.oo..oo.oo.
...kk.kk..kk.kk.
";

const TOWER_TOP_ART: &str = "\
l=#4a7a1a
m=#64aa28
h=#91d73e
r=#73bf2e
c=#3c6414

lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
cccccccc
cmmhhrrc
";

const TOWER_BOTTOM_ART: &str = "\
l=#4a7a1a
m=#64aa28
h=#91d73e
r=#73bf2e
c=#3c6414

cmmhhrrc
cccccccc
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
lmmhhrrl
";
