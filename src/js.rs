//! Emission and upkeep of the JavaScript data modules consumed by the
//! lens-design front end.

use super::{GlassCatalog, Result};
use regex::Regex;
use std::sync::OnceLock;

static GLASS_OBJECT: OnceLock<Regex> = OnceLock::new();
static RAY_DIR_TAIL: OnceLock<Regex> = OnceLock::new();
static RAY_POS_DIR_BLOCK: OnceLock<Regex> = OnceLock::new();

/// Returns the cached regex matching one glass object literal in `glass.js`.
///
/// The match runs from the opening brace through the first closing brace
/// after the name, which is enough to cover the scalar fields where
/// duplication happens.
fn glass_object_regex() -> &'static Regex {
    GLASS_OBJECT.get_or_init(|| {
        Regex::new(r#"\{\s*\n\s*"name":\s*"([^"]+)"[^}]*?\}"#)
            .expect("invalid glass object pattern")
    })
}

impl GlassCatalog {
    /// Renders the catalog as an ES module binding the entries to `var_name`.
    pub fn to_js_module(&self, var_name: &str) -> Result<String> {
        let entries = serde_json::to_string_pretty(&self.entries)?;
        Ok(format!("export const {var_name} = {entries};\n"))
    }
}

/// A glass object carrying more than one `"manufacturer"` field.
#[derive(Debug, PartialEq, Eq)]
pub struct DuplicateManufacturer {
    pub name: String,
    pub count: usize,
    /// 1-based line of the object start.
    pub line: usize,
}

/// Outcome of scanning a generated `glass.js` for duplicated fields.
#[derive(Debug, Default)]
pub struct ManufacturerScan {
    pub total_glasses: usize,
    pub duplicates: Vec<DuplicateManufacturer>,
}

/// Scans `content` for glass objects with duplicated `"manufacturer"` fields.
pub fn scan_manufacturers(content: &str) -> ManufacturerScan {
    let mut scan = ManufacturerScan::default();
    for caps in glass_object_regex().captures_iter(content) {
        scan.total_glasses += 1;
        let object = caps.get(0).unwrap();
        let count = object.as_str().matches(r#""manufacturer":"#).count();
        if count > 1 {
            scan.duplicates.push(DuplicateManufacturer {
                name: caps[1].to_string(),
                count,
                line: content[..object.start()].matches('\n').count() + 1,
            });
        }
    }
    scan
}

/// Adds a `wavelength: wavelength` property to ray literals that carry
/// `pos`/`dir` fields but no wavelength yet.
///
/// Two literal shapes occur in the generated tracing code: a standalone
/// `const ray = {...};` statement and a ray object passed straight to a
/// `traceRay({...},` call. Already patched literals match neither pattern,
/// so reapplying is harmless.
pub fn add_wavelength_to_rays(content: &str) -> String {
    let dir_tail = RAY_DIR_TAIL.get_or_init(|| {
        Regex::new(r"(dir: \{ x: [^}]+, y: [^}]+, z: [^}]+ \})\n(\s+)\};")
            .expect("invalid ray statement pattern")
    });
    let patched = dir_tail.replace_all(content, "${1},\n${2}wavelength: wavelength\n${2}};");
    let pos_dir_block = RAY_POS_DIR_BLOCK.get_or_init(|| {
        Regex::new(r"(\{\s*\n\s+pos: \{[^}]+\},\s*\n\s+dir: \{[^}]+\}\s*\n\s+)\},")
            .expect("invalid ray argument pattern")
    });
    pos_dir_block
        .replace_all(&patched, "${1}wavelength: wavelength\n            },")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> GlassCatalog {
        GlassCatalog::parse(
            "NM N-BK7 2 517642.251 1.5168 64.166073\n\
             CD 1.03961212 0.00600069867 0.231792344 0.0200179144 1.01046945 103.560653\n",
        )
        .unwrap()
    }

    #[test]
    fn module_frame_and_keys() {
        let module = catalog().to_js_module("glassCatalog").unwrap();
        assert!(module.starts_with("export const glassCatalog = [\n"));
        assert!(module.ends_with("];\n"));
        assert!(module.contains("\"name\": \"N-BK7\""));
        assert!(module.contains("\"nd\": 1.5168"));
        assert!(module.contains("\"A1\": 1.03961212"));
        assert!(module.contains("\"B3\": 103.560653"));
    }

    #[test]
    fn module_body_round_trips_with_all_coefficient_keys() {
        let module = catalog().to_js_module("g").unwrap();
        let body = module
            .strip_prefix("export const g = ")
            .and_then(|s| s.trim_end().strip_suffix(';'))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        let sellmeier = &value[0]["sellmeier"];
        for key in ["A1", "B1", "A2", "B2", "A3", "B3"] {
            assert!(sellmeier[key].is_f64(), "missing {key}");
        }
        assert_eq!(sellmeier["B2"].as_f64(), Some(0.0200179144));
    }

    #[test]
    fn empty_catalog_emits_an_empty_array() {
        let module = GlassCatalog::default().to_js_module("empty").unwrap();
        assert_eq!(module, "export const empty = [];\n");
    }

    #[test]
    fn duplicate_manufacturers_are_reported_with_lines() {
        let content = "export const glass = [\n  {\n    \"name\": \"A\",\n    \
                       \"manufacturer\": \"Schott\",\n    \"nd\": 1.5\n  },\n  {\n    \
                       \"name\": \"B\",\n    \"manufacturer\": \"Schott\",\n    \
                       \"manufacturer\": \"Hoya\",\n    \"nd\": 1.6\n  }\n];\n";
        let scan = scan_manufacturers(content);
        assert_eq!(scan.total_glasses, 2);
        assert_eq!(
            scan.duplicates,
            vec![DuplicateManufacturer {
                name: "B".to_string(),
                count: 2,
                line: 7,
            }]
        );
    }

    #[test]
    fn clean_file_scans_clean() {
        let content = "{\n  \"name\": \"A\",\n  \"manufacturer\": \"Schott\"\n}";
        let scan = scan_manufacturers(content);
        assert_eq!(scan.total_glasses, 1);
        assert!(scan.duplicates.is_empty());
    }

    #[test]
    fn wavelength_added_to_ray_statement() {
        let source = "        const ray = {\n            pos: { x: px, y: py, z: 0 },\n            dir: { x: dx, y: dy, z: dz }\n        };\n";
        let patched = add_wavelength_to_rays(source);
        assert_eq!(
            patched,
            "        const ray = {\n            pos: { x: px, y: py, z: 0 },\n            dir: { x: dx, y: dy, z: dz },\n        wavelength: wavelength\n        };\n"
        );
    }

    #[test]
    fn wavelength_added_to_trace_ray_argument() {
        let source = "        traceRay({\n            pos: {x: 0, y: 1, z: 2},\n            dir: {x: 0, y: 0, z: 1}\n            },\n";
        let patched = add_wavelength_to_rays(source);
        assert_eq!(
            patched,
            "        traceRay({\n            pos: {x: 0, y: 1, z: 2},\n            dir: {x: 0, y: 0, z: 1}\n            wavelength: wavelength\n            },\n"
        );
    }

    #[test]
    fn patched_source_is_left_untouched() {
        let source = "        const ray = {\n            pos: { x: px, y: py, z: 0 },\n            dir: { x: dx, y: dy, z: dz },\n        wavelength: wavelength\n        };\n";
        assert_eq!(add_wavelength_to_rays(source), source);
    }
}
