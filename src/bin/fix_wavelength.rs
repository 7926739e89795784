use glass_catalog::add_wavelength_to_rays;
use std::{env, fs};

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "gen-ray-cross-finite.js".to_string());
    let content = fs::read_to_string(&path)?;
    fs::write(&path, add_wavelength_to_rays(&content))?;
    println!("Fixed wavelength properties in {path}");
    Ok(())
}
