//! Manifest-driven imagery: hero backgrounds, logo band, portfolio carousel.

pub const HERO_FOLDER: &str = "home-page/hero-images";
pub const LOGOS_FOLDER: &str = "home-page/logos";
pub const PORTFOLIO_FOLDER: &str = "portfolio";

/// Shown while the portfolio folder is still empty.
pub const PORTFOLIO_PLACEHOLDERS: [&str; 4] = [
    "https://images.unsplash.com/photo-1490481651871-ab68de25d43d?q=80&w=2070",
    "https://images.unsplash.com/photo-1488161628813-04466f872be2?q=80&w=2070",
    "https://images.unsplash.com/photo-1539109132314-347f08b526d0?q=80&w=2070",
    "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?q=80&w=2070",
];

fn asset_paths(folder: &str, files: &[String]) -> Vec<String> {
    files
        .iter()
        .map(|file| format!("assets/images/{}/{}", folder, file))
        .collect()
}

pub fn hero_images(files: &[String]) -> Vec<String> {
    asset_paths(HERO_FOLDER, files)
}

pub fn logo_images(files: &[String]) -> Vec<String> {
    asset_paths(LOGOS_FOLDER, files)
}

pub fn portfolio_images(files: &[String]) -> Vec<String> {
    if files.is_empty() {
        return PORTFOLIO_PLACEHOLDERS.iter().map(|s| s.to_string()).collect();
    }
    asset_paths(PORTFOLIO_FOLDER, files)
}
