mod agf;
pub use agf::{GlassCatalog, GlassEntry, Sellmeier};
mod js;
pub use js::{add_wavelength_to_rays, scan_manufacturers, DuplicateManufacturer, ManufacturerScan};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read data file")]
    Read(#[from] std::io::Error),
    #[error("NM record for glass `{name}` has no {field} field")]
    MissingHeaderField { name: String, field: &'static str },
    #[error("failed to parse {field} `{value}` in NM record for glass `{name}`")]
    MalformedHeaderField {
        name: String,
        field: &'static str,
        value: String,
    },
    #[error("failed to serialize glass data")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
