//! Label font resolution.
//!
//! The chart draws its labels with whatever TrueType font it can find: an
//! explicitly configured path first, then a list of common system
//! locations. When nothing resolves, the chart still renders its geometry
//! and the caller gets a warning instead of a failure.

use std::path::Path;

use ab_glyph::FontVec;

/// Common system font locations, tried in order.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a label font from `explicit` or the first readable system path.
#[must_use]
pub fn load_font(explicit: Option<&Path>) -> Option<FontVec> {
    let candidates = explicit
        .into_iter()
        .map(Path::to_path_buf)
        .chain(SYSTEM_FONT_PATHS.iter().map(Into::into));

    for path in candidates {
        if let Ok(data) = std::fs::read(&path) {
            match FontVec::try_from_vec(data) {
                Ok(font) => {
                    log::debug!("chart labels use font {}", path.display());
                    return Some(font);
                }
                Err(_) => log::debug!("skipping unreadable font {}", path.display()),
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_path_falls_through_without_panic() {
        // Whatever the host has installed, a bogus explicit path must not
        // break resolution.
        let _ = load_font(Some(Path::new("/nonexistent/font.ttf")));
    }
}
