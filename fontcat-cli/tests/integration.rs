use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn record(family: &str, category: &str, variants: &[&str], axes: Option<Value>) -> Value {
    let slug = family.to_lowercase().replace(' ', "-");
    let files: serde_json::Map<String, Value> = variants
        .iter()
        .map(|v| (v.to_string(), json!(format!("https://fonts/{slug}-{v}.ttf"))))
        .collect();
    let mut item = json!({
        "family": family,
        "variants": variants,
        "subsets": ["latin"],
        "version": "v1",
        "lastModified": "2025-01-01",
        "files": files,
        "category": category,
        "kind": "webfonts#webfont",
        "menu": format!("https://fonts/{slug}-menu.ttf"),
    });
    if let Some(axes) = axes {
        item["axes"] = axes;
    }
    item
}

struct Fixture {
    dir: TempDir,
    variable: PathBuf,
    statics: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("tempdir");
    let wght = json!([{"tag": "wght", "start": 100, "end": 900}]);

    let variable = json!({
        "kind": "webfonts#webfontList",
        "items": [
            record("Open Sans", "sans-serif", &["regular", "italic"], Some(wght.clone())),
            record("Lora", "serif", &["regular"], Some(wght.clone())),
            record("Roboto Mono", "monospace", &["regular"], Some(wght)),
            record("Abel", "sans-serif", &["regular"], None),
        ]
    });
    let statics = json!({
        "kind": "webfonts#webfontList",
        "items": [
            record("Open Sans", "sans-serif", &["300", "regular", "700italic"], None),
            record("Abel", "sans-serif", &["regular"], None),
        ]
    });

    let variable_path = dir.path().join("webfonts-vf.json");
    let static_path = dir.path().join("webfonts.json");
    fs::write(&variable_path, variable.to_string()).expect("write variable catalog");
    fs::write(&static_path, statics.to_string()).expect("write static catalog");

    Fixture {
        dir,
        variable: variable_path,
        statics: static_path,
    }
}

impl Fixture {
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_fontcat"))
            .args(args)
            .arg("--variable-catalog")
            .arg(&self.variable)
            .arg("--static-catalog")
            .arg(&self.statics)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("run fontcat")
    }
}

fn assert_success(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_family(root: &Path, folder: &str, family: &str, faces: &[(&str, &str, &str)]) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).expect("mkdir");
    let mut metadata = format!("name: \"{family}\"\nlicense: \"OFL\"\n");
    for (filename, style, weight) in faces {
        metadata.push_str(&format!(
            "fonts {{\n  name: \"{family}\"\n  style: \"{style}\"\n  weight: {weight}\n  filename: \"{filename}\"\n}}\n"
        ));
        fs::write(dir.join(filename), b"font").expect("font file");
    }
    fs::write(dir.join("METADATA.pb"), metadata).expect("metadata");
}

#[test]
fn search_json_reports_pagination_and_filters() {
    let fx = fixture();
    let output = fx.run(&["search", "sans", "--property", "variable", "--json"]);
    let stdout = assert_success(&output);

    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["total"], 1);
    assert_eq!(json["fontlist_count"], 4);
    assert_eq!(json["fonts"][0]["family"], "Open Sans");
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 100);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["hasNextPage"], false);
    assert_eq!(json["query"], "sans");
    assert_eq!(json["filters"]["property"], "variable");
}

#[test]
fn search_plain_lists_one_family_per_line() {
    let fx = fixture();
    let output = fx.run(&["search", "--category", "sans-serif", "--color", "never"]);
    let stdout = assert_success(&output);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Open Sans", "Abel"]);
}

#[test]
fn search_ndjson_pages_through_results() {
    let fx = fixture();
    let output = fx.run(&["search", "--limit", "3", "--page", "2", "--ndjson"]);
    let stdout = assert_success(&output);

    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("ndjson line"))
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["family"], "Abel");
}

#[test]
fn show_prints_combined_record() {
    let fx = fixture();
    let output = fx.run(&["show", "open-sans"]);
    let stdout = assert_success(&output);

    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["family"], "Open Sans");
    assert_eq!(json["axes"][0]["tag"], "wght");
    assert_eq!(json["static"]["variants"], json!(["300", "regular", "700italic"]));
}

#[test]
fn show_unknown_font_fails() {
    let fx = fixture();
    let output = fx.run(&["show", "comic-sans"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: font not found: comic-sans"), "{stderr}");
}

#[test]
fn css_uses_static_files_when_available() {
    let fx = fixture();
    let output = fx.run(&["css", "open-sans"]);
    let stdout = assert_success(&output);

    assert_eq!(stdout.matches("@font-face").count(), 3);
    assert!(stdout.contains("src: url(\"https://fonts/open-sans-700italic.ttf\");"));
    assert!(stdout.contains("font-weight: 300;"));
    assert!(stdout.contains("font-display: swap;"));
}

#[test]
fn css_falls_back_to_variable_files() {
    let fx = fixture();
    let output = fx.run(&["css", "lora"]);
    let stdout = assert_success(&output);

    assert_eq!(stdout.matches("@font-face").count(), 1);
    assert!(stdout.contains("font-family: \"Lora\";"));
}

#[test]
fn missing_catalog_is_reported_with_path() {
    let fx = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_fontcat"))
        .args(["search", "--static-catalog"])
        .arg(fx.dir.path().join("missing.json"))
        .arg("--variable-catalog")
        .arg(&fx.variable)
        .env_remove("RUST_LOG")
        .output()
        .expect("run fontcat");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.json"), "{stderr}");
}

#[test]
fn validate_writes_csv_and_summary() {
    let fx = fixture();
    let ofl = fx.dir.path().join("ofl");
    write_family(&ofl, "abel", "Abel", &[("Abel-Regular.ttf", "normal", "400")]);
    write_family(
        &ofl,
        "opensans",
        "Open Sans",
        &[
            ("OpenSans-Regular.ttf", "normal", "400"),
            ("OpenSans-Bold.ttf", "normal", "700"),
        ],
    );
    fs::create_dir_all(ofl.join("orphan")).expect("mkdir");

    let csv_path = fx.dir.path().join("invalid.csv");
    let output = fx.run(&[
        "validate",
        "--fonts-dir",
        ofl.to_str().expect("utf8 path"),
        "--output",
        csv_path.to_str().expect("utf8 path"),
    ]);
    let stdout = assert_success(&output);

    assert!(stdout.contains("Total fonts: 3"), "{stdout}");
    assert!(stdout.contains("Valid fonts: 1"), "{stdout}");
    assert!(stdout.contains("Invalid fonts: 2"), "{stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR]"), "{stderr}");

    let csv = fs::read_to_string(&csv_path).expect("csv written");
    assert_eq!(
        csv,
        "folder,font family name,reason(s)\r\n\
         opensans,Open Sans,variant 700 not found in catalog for OpenSans-Bold.ttf\r\n\
         orphan,,METADATA.pb not found\r\n"
    );
}

#[test]
fn validate_clean_tree_skips_csv() {
    let fx = fixture();
    let ofl = fx.dir.path().join("ofl");
    write_family(&ofl, "abel", "Abel", &[("Abel-Regular.ttf", "normal", "400")]);

    let csv_path = fx.dir.path().join("clean.csv");
    let output = fx.run(&[
        "validate",
        "--fonts-dir",
        ofl.to_str().expect("utf8 path"),
        "--output",
        csv_path.to_str().expect("utf8 path"),
    ]);
    let stdout = assert_success(&output);

    assert!(stdout.contains("Valid fonts: 1"), "{stdout}");
    assert!(stdout.contains("All fonts validated successfully!"), "{stdout}");
    assert!(!csv_path.exists());
}

#[test]
fn css_json_describes_preview() {
    let fx = fixture();
    let output = fx.run(&["css", "open-sans", "--json"]);
    let stdout = assert_success(&output);

    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["stylesheetId"], "font-stylesheet-open-sans");
    assert_eq!(json["previewSvg"], "opensans.svg");
    assert_eq!(json["faces"][2]["className"], "font-open-sans-700-italic");
    assert_eq!(json["faces"][2]["url"], "https://fonts/open-sans-700italic.ttf");
}

#[test]
fn missing_svg_lists_families_without_previews() {
    let fx = fixture();
    let svg_dir = fx.dir.path().join("svg");
    fs::create_dir_all(&svg_dir).expect("mkdir");
    for name in ["opensans.svg", "lora.svg", "abel.svg"] {
        fs::write(svg_dir.join(name), b"<svg/>").expect("svg");
    }

    let output = fx.run(&["missing-svg", "--svg-dir", svg_dir.to_str().expect("utf8 path")]);
    let stdout = assert_success(&output);
    assert_eq!(
        stdout,
        "Missing previews:\nRoboto Mono (robotomono.svg)\n\nTotal missing previews: 1\n"
    );

    fs::write(svg_dir.join("robotomono.svg"), b"<svg/>").expect("svg");
    let output = fx.run(&["missing-svg", "--svg-dir", svg_dir.to_str().expect("utf8 path")]);
    assert_eq!(assert_success(&output), "All fonts are present.\n");
}
