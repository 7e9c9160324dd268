//! Checks that the unit test tree mirrors `src` and is wired into the harness

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    /// Relative paths of every directory and `.rs` file below `base`
    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();
        if !dir.is_dir() {
            return Ok(paths);
        }

        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();
            let relative_path = path
                .strip_prefix(base)
                .map_err(|error| io::Error::other(format!("Failed to strip prefix: {error}")))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.insert(relative_path);
                paths.extend(collect_relative_paths(&path, base)?);
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative_path);
            }
        }

        Ok(paths)
    }

    fn tree(root: &str) -> HashSet<String> {
        let dir = Path::new(root);
        collect_relative_paths(dir, dir).unwrap_or_else(|error| {
            assert!(!dir.exists(), "Failed to read {root}: {error}");
            HashSet::new()
        })
    }

    fn is_module_file(path: &str) -> bool {
        path == "main.rs" || path == "lib.rs" || path.ends_with("mod.rs")
    }

    fn report(header: &str, lines: &BTreeSet<String>) -> String {
        let body: Vec<String> = lines.iter().map(|line| format!("  - {line}")).collect();
        format!("{header}:\n{}", body.join("\n"))
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_paths = tree(SRC_DIR);
        let test_paths = tree(UNIT_DIR);

        let missing: BTreeSet<String> = src_paths
            .iter()
            .filter(|path| !is_module_file(path) && !test_paths.contains(*path))
            .map(|path| format!("src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "{}",
            report("Source files without unit test counterparts", &missing)
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_paths = tree(SRC_DIR);
        let test_paths = tree(UNIT_DIR);

        let orphaned: BTreeSet<String> = test_paths
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(*path))
            .map(|path| format!("tests/unit/{path} -> src/{path} (missing)"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "{}",
            report("Unit test files without source counterparts", &orphaned)
        );
    }

    /// Unit test files are only compiled when declared in the harness root
    #[test]
    fn test_all_unit_tests_are_declared() {
        let root = fs::read_to_string(Path::new(UNIT_DIR).join("mod.rs")).unwrap_or_default();

        let undeclared: BTreeSet<String> = tree(UNIT_DIR)
            .iter()
            .filter(|path| path.ends_with(".rs") && !path.ends_with("mod.rs"))
            .filter(|path| {
                let stem = Path::new(path.as_str())
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                !root.contains(&format!("mod {stem};"))
            })
            .map(|path| format!("tests/unit/{path}"))
            .collect();

        assert!(
            undeclared.is_empty(),
            "{}",
            report("Unit test files missing from tests/unit/mod.rs", &undeclared)
        );
    }

    fn check_test_files(
        dir: &Path,
        base_dir: &Path,
        without_tests: &mut BTreeSet<String>,
    ) -> Result<(), io::Error> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, base_dir, without_tests)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            // Harness roots only declare modules
            if (path.parent() == Some(base_dir) && file_name == "main.rs")
                || file_name == "mod.rs"
            {
                continue;
            }

            if !fs::read_to_string(&path)?.contains("#[test]") {
                without_tests.insert(path.display().to_string());
            }
        }

        Ok(())
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut without_tests = BTreeSet::new();

        if let Err(error) = check_test_files(tests_dir, tests_dir, &mut without_tests) {
            assert!(!tests_dir.exists(), "Failed to scan tests directory: {error}");
        }

        assert!(
            without_tests.is_empty(),
            "{}",
            report("Test files without any #[test] function", &without_tests)
        );
    }
}
