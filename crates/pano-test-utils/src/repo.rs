//! [`TestRepo`] builder for model repository test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary model repository with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use pano_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.add_dataset("sales", "sales");
/// repo.add_model("sales", "orders", "db.sales.orders");
/// repo.assert_file_exists("sales/orders.model.yaml");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Write `pano.yaml` binding the repository to `company_slug`.
    pub fn init_context(&self, company_slug: &str) {
        self.write(
            "pano.yaml",
            &format!("company_slug: {company_slug}\napi_version: v1\n"),
        );
    }

    /// Write `<package>/dataset.yaml`.
    pub fn add_dataset(&self, package: &str, dataset_slug: &str) {
        self.write(
            &format!("{package}/dataset.yaml"),
            &format!("api_version: v1\ndataset_slug: {dataset_slug}\ndisplay_name: {dataset_slug}\n"),
        );
    }

    /// Write `<package>/<name>.model.yaml` with a single `id` field.
    pub fn add_model(&self, package: &str, name: &str, table: &str) {
        self.write(
            &format!("{package}/{name}.model.yaml"),
            &format!(
                "api_version: v1\nmodel_name: {name}\ndata_source: {table}\nfields:\n- field_map:\n  - id\n  data_reference: '\"ID\"'\n  data_type: integer\n"
            ),
        );
    }

    /// Write a field definition, company scoped when `package` is `None`.
    pub fn add_field(&self, package: Option<&str>, slug: &str) {
        let relative = match package {
            Some(package) => format!("{package}/fields/{slug}.field.yaml"),
            None => format!("fields/{slug}.field.yaml"),
        };
        self.write(
            &relative,
            &format!(
                "api_version: v1\ndata_type: text\ndisplay_name: {slug}\nfield_type: dimension\ngroup: CLI\nslug: {slug}\n"
            ),
        );
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(full_path.exists(), "Expected file to exist: {}", full_path.display());
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(!full_path.exists(), "Expected file NOT to exist: {}", full_path.display());
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
