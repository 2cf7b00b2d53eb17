//! Paths of documents inside a model repository

use pano_fs::{FileExtension, NormalizedPath, PanoPath, io};

use crate::Result;

/// A package directory found in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Directory name, relative to the repository root
    pub name: String,
    pub dir: NormalizedPath,
}

/// Path scheme of a model repository rooted at one directory.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: NormalizedPath,
}

impl RepoLayout {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn package_dir(&self, package: &str) -> NormalizedPath {
        self.root.join(package)
    }

    pub fn dataset_file(&self, package: &str) -> NormalizedPath {
        self.package_dir(package).join(PanoPath::DatasetFile)
    }

    pub fn model_file(&self, package: &str, model_name: &str) -> NormalizedPath {
        self.package_dir(package)
            .join(FileExtension::Model.file_name(model_name))
    }

    /// `fields/` of a package, or of the repository root for company scope.
    pub fn fields_dir(&self, package: Option<&str>) -> NormalizedPath {
        match package {
            Some(package) => self.package_dir(package).join(PanoPath::FieldsDir),
            None => self.root.join(PanoPath::FieldsDir),
        }
    }

    pub fn field_file(&self, package: Option<&str>, slug: &str) -> NormalizedPath {
        self.fields_dir(package)
            .join(FileExtension::Field.file_name(slug))
    }

    pub fn scanned_dir(&self) -> NormalizedPath {
        self.root.join(PanoPath::ScannedDir)
    }

    pub fn scanned_model_file(&self, model_name: &str) -> NormalizedPath {
        self.scanned_dir()
            .join(FileExtension::Model.file_name(model_name))
    }

    /// Package directories: non-system directories holding a `dataset.yaml`.
    pub fn packages(&self) -> Result<Vec<Package>> {
        let mut packages = Vec::new();
        for dir in io::list_dir(&self.root)? {
            let Some(name) = dir.file_name().map(str::to_string) else {
                continue;
            };
            if !dir.is_dir() || PanoPath::is_system_dir(&name) {
                continue;
            }
            if !dir.join(PanoPath::DatasetFile).is_file() {
                continue;
            }
            packages.push(Package { name, dir });
        }
        Ok(packages)
    }

    /// Model documents directly inside a package directory.
    pub fn model_files(&self, package: &Package) -> Result<Vec<NormalizedPath>> {
        documents_in(&package.dir, FileExtension::Model)
    }

    /// Field documents in a `fields/` directory.
    pub fn field_files(&self, package: Option<&str>) -> Result<Vec<NormalizedPath>> {
        documents_in(&self.fields_dir(package), FileExtension::Field)
    }
}

fn documents_in(dir: &NormalizedPath, extension: FileExtension) -> Result<Vec<NormalizedPath>> {
    let files = io::list_dir(dir)?
        .into_iter()
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| extension.strip(name))
                    .is_some()
        })
        .collect();
    Ok(files)
}
