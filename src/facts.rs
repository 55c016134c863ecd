//! Project fact gathering.
//!
//! [`gather`] performs the run's single I/O pass: it reads every artifact the
//! check registry cares about and folds the results into a [`ProjectFacts`]
//! bag. Check predicates are pure functions over this bag, so a run's verdict
//! depends only on on-disk state at gather time. Parse failures never abort
//! the pass; they are carried as [`ManifestState::ParseFailed`] and surface
//! later as check failures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::contracts;
use crate::paths;

/// Branch assumed when project metadata omits or blanks `releaseBranch`.
pub const DEFAULT_RELEASE_BRANCH: &str = "main";

/// State of a manifest file on disk: absent, unreadable, or parsed.
#[derive(Debug, Clone)]
pub enum ManifestState<T> {
    Missing,
    ParseFailed(String),
    Parsed(T),
}

impl<T> ManifestState<T> {
    /// The parsed value, if the manifest parsed.
    pub fn parsed(&self) -> Option<&T> {
        match self {
            ManifestState::Parsed(value) => Some(value),
            _ => None,
        }
    }

    /// True when the file was present, whether or not it parsed.
    pub fn exists(&self) -> bool {
        !matches!(self, ManifestState::Missing)
    }
}

/// Typed view of package.json.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    /// Script command names under `scripts`.
    pub scripts: BTreeSet<String>,
    /// Raw `scripts.test` value when it is a string.
    pub test_script: Option<String>,
    /// The `main` entry field.
    pub main_entry: Option<String>,
    /// Merged runtime and development dependency names.
    pub dependencies: BTreeSet<String>,
}

/// App configuration source, resolved exactly once per run from the
/// `useAppConfigTs` metadata flag. Each variant carries the facts its mode
/// needs, so mode-dependent checks branch on this union instead of
/// re-deriving the flag.
#[derive(Debug, Clone)]
pub enum AppConfig {
    /// `useAppConfigTs` disabled: app.json is authoritative.
    Manifest {
        /// The `expo.plugins` list from app.json.
        plugins: ManifestState<Value>,
    },
    /// `useAppConfigTs` enabled: app.config.ts is authoritative.
    InlineConfig {
        /// Raw script text, when the file exists.
        text: Option<String>,
    },
}

/// Parsed view of the project metadata manifest.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Release branch the CI workflow must target.
    pub release_branch: String,
    /// Feature-flag name to enabled state.
    pub modules: BTreeMap<String, bool>,
    /// Resolved app configuration mode with its mode-specific facts.
    pub app_config: AppConfig,
}

/// Everything the evaluator needs, gathered in one pass. Discarded after
/// the run; nothing persists across invocations.
#[derive(Debug, Clone)]
pub struct ProjectFacts {
    /// Resolved project directory.
    pub project_dir: PathBuf,
    pub dir_exists: bool,
    pub package_manifest: ManifestState<PackageManifest>,
    pub tsconfig_exists: bool,
    pub smoke_test_exists: bool,
    /// App config contract violations (mode-independent; app.json preferred).
    pub app_config_violations: Vec<String>,
    /// EAS build-profile contract violations.
    pub eas_violations: Vec<String>,
    /// Source-control ignore policy violations.
    pub gitignore_violations: Vec<String>,
    /// CI workflow text, when the workflow file exists.
    pub workflow_text: Option<String>,
    pub metadata: ManifestState<Metadata>,
}

impl ProjectFacts {
    /// Release branch from metadata, or the default when metadata is
    /// unreadable.
    pub fn release_branch(&self) -> &str {
        match &self.metadata {
            ManifestState::Parsed(meta) => &meta.release_branch,
            _ => DEFAULT_RELEASE_BRANCH,
        }
    }

    /// True when the named feature flag is enabled. Unreadable metadata and
    /// absent flags both count as disabled.
    pub fn flag_enabled(&self, key: &str) -> bool {
        match &self.metadata {
            ManifestState::Parsed(meta) => meta.modules.get(key).copied().unwrap_or(false),
            _ => false,
        }
    }
}

/// Read a file as UTF-8 text, tolerating a leading byte-order marker.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    fs::File::open(path)?.read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    Ok(text
        .strip_prefix('\u{feff}')
        .map(str::to_owned)
        .unwrap_or(text))
}

/// Parse a JSON file whose root must be a keyed object.
pub fn load_json_object(path: &Path) -> Result<Map<String, Value>, String> {
    let text = read_text(path)
        .map_err(|err| format!("Failed to parse JSON at {}: {}", path.display(), err))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|err| format!("Failed to parse JSON at {}: {}", path.display(), err))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("JSON root must be an object at {}", path.display())),
    }
}

/// JSON truthiness matching the metadata flag semantics: false, null, zero,
/// and empty strings/arrays/objects are disabled.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn load_manifest(path: &Path) -> ManifestState<Map<String, Value>> {
    if !path.exists() {
        return ManifestState::Missing;
    }
    match load_json_object(path) {
        Ok(doc) => ManifestState::Parsed(doc),
        Err(err) => ManifestState::ParseFailed(err),
    }
}

fn package_facts(doc: &Map<String, Value>) -> PackageManifest {
    let scripts_obj = doc.get("scripts").and_then(Value::as_object);
    let scripts = scripts_obj
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();
    let test_script = scripts_obj
        .and_then(|s| s.get("test"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let main_entry = doc.get("main").and_then(Value::as_str).map(str::to_owned);

    let mut dependencies = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = doc.get(section).and_then(Value::as_object) {
            dependencies.extend(deps.keys().cloned());
        }
    }

    PackageManifest {
        scripts,
        test_script,
        main_entry,
        dependencies,
    }
}

fn metadata_facts(
    doc: &Map<String, Value>,
    app_manifest: &ManifestState<Map<String, Value>>,
    inline_config_text: &Option<String>,
) -> Metadata {
    let release_branch = doc
        .get("releaseBranch")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .unwrap_or(DEFAULT_RELEASE_BRANCH)
        .to_string();

    let modules: BTreeMap<String, bool> = doc
        .get("modules")
        .and_then(Value::as_object)
        .map(|map| map.iter().map(|(k, v)| (k.clone(), truthy(v))).collect())
        .unwrap_or_default();

    let app_config = if modules.get("useAppConfigTs").copied().unwrap_or(false) {
        AppConfig::InlineConfig {
            text: inline_config_text.clone(),
        }
    } else {
        let plugins = match app_manifest {
            ManifestState::Missing => ManifestState::Missing,
            ManifestState::ParseFailed(err) => ManifestState::ParseFailed(err.clone()),
            ManifestState::Parsed(doc) => {
                let plugins = doc
                    .get("expo")
                    .and_then(Value::as_object)
                    .and_then(|expo| expo.get("plugins"))
                    .cloned()
                    .unwrap_or(Value::Array(vec![]));
                ManifestState::Parsed(plugins)
            }
        };
        AppConfig::Manifest { plugins }
    };

    Metadata {
        release_branch,
        modules,
        app_config,
    }
}

/// Gather all project facts in one pass.
pub fn gather(project_dir: &Path) -> ProjectFacts {
    let project_dir = fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    let dir_exists = project_dir.is_dir();

    let package_manifest = match load_manifest(&project_dir.join(paths::PACKAGE_MANIFEST)) {
        ManifestState::Missing => ManifestState::Missing,
        ManifestState::ParseFailed(err) => ManifestState::ParseFailed(err),
        ManifestState::Parsed(doc) => ManifestState::Parsed(package_facts(&doc)),
    };

    let app_manifest = load_manifest(&project_dir.join(paths::APP_MANIFEST));
    let inline_config_path = project_dir.join(paths::APP_CONFIG_SCRIPT);
    let inline_config_text = if inline_config_path.exists() {
        read_text(&inline_config_path).ok()
    } else {
        None
    };

    // Mode-independent app config contract: app.json is preferred when both
    // forms are present.
    let app_config_violations = match &app_manifest {
        ManifestState::Parsed(doc) => contracts::app_manifest_violations(doc),
        ManifestState::ParseFailed(err) => vec![err.clone()],
        ManifestState::Missing => match &inline_config_text {
            Some(text) => contracts::inline_config_violations(text),
            None => vec!["Neither app.json nor app.config.ts was found.".to_string()],
        },
    };

    let eas_violations = match load_manifest(&project_dir.join(paths::EAS_MANIFEST)) {
        ManifestState::Parsed(doc) => contracts::eas_violations(&doc),
        ManifestState::ParseFailed(err) => vec![err],
        ManifestState::Missing => vec!["eas.json is missing.".to_string()],
    };

    let gitignore_path = project_dir.join(".gitignore");
    let gitignore_violations = if gitignore_path.exists() {
        match read_text(&gitignore_path) {
            Ok(text) => contracts::gitignore_violations(&text),
            Err(err) => vec![format!("Cannot read .gitignore: {}", err)],
        }
    } else {
        vec![".gitignore is missing.".to_string()]
    };

    let workflow_path = project_dir.join(paths::CI_WORKFLOW);
    let workflow_text = if workflow_path.exists() {
        read_text(&workflow_path).ok()
    } else {
        None
    };

    let metadata = match load_manifest(&project_dir.join(paths::PROJECT_METADATA)) {
        ManifestState::Missing => ManifestState::Missing,
        ManifestState::ParseFailed(err) => ManifestState::ParseFailed(err),
        ManifestState::Parsed(doc) => {
            ManifestState::Parsed(metadata_facts(&doc, &app_manifest, &inline_config_text))
        }
    };

    ProjectFacts {
        dir_exists,
        package_manifest,
        tsconfig_exists: project_dir.join(paths::TSCONFIG).exists(),
        smoke_test_exists: project_dir.join(paths::SMOKE_TEST).exists(),
        app_config_violations,
        eas_violations,
        gitignore_violations,
        workflow_text,
        metadata,
        project_dir,
    }
}
