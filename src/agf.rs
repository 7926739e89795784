//! ZEMAX AGF glass catalog parsing.

use super::{Error, Result};
use flate2::read::GzDecoder;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Fixed token positions in a NM record:
// NM <name> <formula> <MIL> <nd> <vd> <TCE> <density> <CR>
const NM_NAME: usize = 1;
const NM_ND: usize = 4;
const NM_VD: usize = 5;

/// Sellmeier dispersion coefficients of one glass.
///
/// A CD record carries the coefficients interleaved as
/// `K1 L1 K2 L2 K3 L3`; they are stored here as A1..A3 (the K terms)
/// and B1..B3 (the L terms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Sellmeier {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
}

impl Sellmeier {
    /// Returns the index of refraction at `wavelength` (in micrometers)
    pub fn refractive_index(&self, wavelength: f64) -> f64 {
        let w2 = wavelength * wavelength;
        let n2 = 1.
            + self.a1 * w2 / (w2 - self.b1)
            + self.a2 * w2 / (w2 - self.b2)
            + self.a3 * w2 / (w2 - self.b3);
        n2.sqrt()
    }
}

/// One optical material from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlassEntry {
    pub name: String,
    pub nd: f64,
    pub vd: f64,
    pub sellmeier: Sellmeier,
}

/// A glass whose NM record has been read but whose entry is not closed yet.
///
/// The coefficient set stays `None` until a valid CD record is seen; a glass
/// closed without one yields no entry.
#[derive(Debug)]
struct OpenGlass {
    name: String,
    nd: f64,
    vd: f64,
    sellmeier: Option<Sellmeier>,
}

impl OpenGlass {
    fn from_header(parts: &[&str]) -> Result<Self> {
        let name = parts[NM_NAME].to_string();
        let nd = header_float(&name, "nd", parts, NM_ND)?;
        let vd = header_float(&name, "vd", parts, NM_VD)?;
        Ok(Self {
            name,
            nd,
            vd,
            sellmeier: None,
        })
    }

    fn close(self) -> Option<GlassEntry> {
        self.sellmeier.map(|sellmeier| GlassEntry {
            name: self.name,
            nd: self.nd,
            vd: self.vd,
            sellmeier,
        })
    }
}

fn header_float(name: &str, field: &'static str, parts: &[&str], position: usize) -> Result<f64> {
    let token = parts
        .get(position)
        .ok_or_else(|| Error::MissingHeaderField {
            name: name.to_string(),
            field,
        })?;
    token.parse().map_err(|_| Error::MalformedHeaderField {
        name: name.to_string(),
        field,
        value: token.to_string(),
    })
}

/// The glasses of one catalog file, in encounter order.
#[derive(Debug, Default)]
pub struct GlassCatalog {
    pub entries: Vec<GlassEntry>,
}

impl GlassCatalog {
    /// Loads a catalog from `path`, gunzipping `.gz` files transparently
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        let mut file = File::open(path)?;
        if path.extension().map_or(false, |ext| ext == "gz") {
            GzDecoder::new(file).read_to_end(&mut bytes)?;
        } else {
            file.read_to_end(&mut bytes)?;
        }
        // Malformed byte sequences are dropped rather than aborting the run.
        let text = match String::from_utf8_lossy(&bytes) {
            Cow::Borrowed(text) => Cow::Borrowed(text),
            Cow::Owned(text) => Cow::Owned(text.replace('\u{FFFD}', "")),
        };
        Self::parse(&text)
    }

    /// Parses the two record kinds handled here: NM opens a glass, CD
    /// assigns its coefficients. Every other line is passed over.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut current: Option<OpenGlass> = None;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("NM ") {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 5 {
                    continue;
                }
                // The previous glass is flushed before the next one opens.
                if let Some(entry) = current.take().and_then(OpenGlass::close) {
                    entries.push(entry);
                }
                current = Some(OpenGlass::from_header(&parts)?);
            } else if let Some(record) = line.strip_prefix("CD ") {
                if let Some(glass) = current.as_mut() {
                    read_coefficients(glass, record);
                }
            }
        }
        if let Some(entry) = current.and_then(OpenGlass::close) {
            entries.push(entry);
        }
        Ok(Self { entries })
    }
}

/// Assigns the first six coefficients of a CD record to `glass`.
///
/// A record that does not yield six numeric values is only warned about;
/// the glass keeps whatever coefficient set it had and later records in
/// the catalog are unaffected.
fn read_coefficients(glass: &mut OpenGlass, record: &str) {
    let mut coefficients = Vec::new();
    for token in record.split_whitespace() {
        match token.parse::<f64>() {
            Ok(value) => coefficients.push(value),
            Err(_) => {
                eprintln!(
                    "Warning: could not parse CD record for {}: invalid value `{}`",
                    glass.name, token
                );
                return;
            }
        }
    }
    match coefficients[..] {
        [a1, b1, a2, b2, a3, b3, ..] => {
            glass.sellmeier = Some(Sellmeier {
                a1,
                a2,
                a3,
                b1,
                b2,
                b3,
            });
        }
        _ => eprintln!(
            "Warning: could not parse CD record for {}: expected 6 coefficients, found {}",
            glass.name,
            coefficients.len()
        ),
    }
}
