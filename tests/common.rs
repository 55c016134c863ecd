//! Common test helpers for integration tests.

use std::fs;
use std::path::Path;

/// Write a file under the project root, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}

/// Scaffold a fully compliant Expo project in manifest mode with no feature
/// flags enabled. Individual tests break specific artifacts from here.
pub fn scaffold_compliant_project(root: &Path) {
    write_file(
        root,
        "package.json",
        r#"{
  "main": "expo-router/entry",
  "scripts": {
    "lint": "eslint .",
    "typecheck": "tsc --noEmit",
    "test": "jest --ci"
  },
  "dependencies": {
    "expo": "51.0.0",
    "expo-router": "3.5.0"
  },
  "devDependencies": {
    "typescript": "5.3.0"
  }
}
"#,
    );
    write_file(
        root,
        "app.json",
        r#"{
  "expo": {
    "name": "demo",
    "ios": { "bundleIdentifier": "com.example.demo" },
    "plugins": ["expo-router"]
  }
}
"#,
    );
    write_file(
        root,
        "eas.json",
        r#"{
  "build": {
    "preview": { "distribution": "internal" },
    "production": {}
  }
}
"#,
    );
    write_file(root, "tsconfig.json", "{\n  \"extends\": \"expo/tsconfig.base\"\n}\n");
    write_file(root, ".gitignore", "node_modules/\n.expo/\n.expo-shared/\n");
    write_file(
        root,
        ".github/workflows/eas-ios.yml",
        "on:\n  push:\n    branches:\n      - main\njobs:\n  build:\n    if: github.ref == 'refs/heads/main'\n",
    );
    write_file(root, "__tests__/app-shell.test.tsx", "test('renders', () => {});\n");
    write_file(
        root,
        "skill.modules.json",
        r#"{ "releaseBranch": "main", "modules": {} }"#,
    );
}
