//! Typed `package.json` records.
//!
//! A [`PackageManifest`] exposes the fields the release tooling cares about
//! (`name`, `version` and the three dependency maps) as named, validated
//! fields, while keeping the full JSON document so that every other field
//! and the original key order survive a rewrite.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Dependency name to version-or-URL specifier, in declaration order.
pub type DependencyMap = IndexMap<String, String>;

/// The dependency fields of a manifest that may reference workspace packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
    /// `peerDependencies`
    PeerDependencies,
}

impl DependencyKind {
    /// All dependency kinds, in the order they are rewritten.
    pub const ALL: [Self; 3] = [
        Self::Dependencies,
        Self::DevDependencies,
        Self::PeerDependencies,
    ];

    /// The JSON field name for this kind.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
            Self::PeerDependencies => "peerDependencies",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// A parsed workspace package manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    /// Declared package name, e.g. `@scope/pkg`.
    pub name: String,
    /// Declared package version.
    pub version: String,
    /// `dependencies`, if the field is present.
    pub dependencies: Option<DependencyMap>,
    /// `devDependencies`, if the field is present.
    pub dev_dependencies: Option<DependencyMap>,
    /// `peerDependencies`, if the field is present.
    pub peer_dependencies: Option<DependencyMap>,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// Reads and validates the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation (see [`PackageManifest::parse`]).
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::io(e, path, "reading package manifest"))?;
        Self::parse(&content, path)
    }

    /// Parses manifest `content`; `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Fails when the content is not a JSON object, when `name` or `version`
    /// is missing or not a string, or when a dependency field is not an
    /// object of strings.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| Error::Json {
            source: e,
            path: Some(path.to_path_buf()),
        })?;
        let Value::Object(document) = value else {
            return Err(Error::manifest(path, "manifest must be a JSON object"));
        };

        let name = required_string(&document, "name", path)?;
        let version = required_string(&document, "version", path)?;

        Ok(Self {
            name,
            version,
            dependencies: parse_dependency_map(&document, DependencyKind::Dependencies, path)?,
            dev_dependencies: parse_dependency_map(&document, DependencyKind::DevDependencies, path)?,
            peer_dependencies: parse_dependency_map(&document, DependencyKind::PeerDependencies, path)?,
            document,
        })
    }

    /// Returns the dependency map of the given kind, if present.
    #[must_use]
    pub fn dependency_map(&self, kind: DependencyKind) -> Option<&DependencyMap> {
        match kind {
            DependencyKind::Dependencies => self.dependencies.as_ref(),
            DependencyKind::DevDependencies => self.dev_dependencies.as_ref(),
            DependencyKind::PeerDependencies => self.peer_dependencies.as_ref(),
        }
    }

    /// Returns the dependency map of the given kind mutably, if present.
    pub fn dependency_map_mut(&mut self, kind: DependencyKind) -> Option<&mut DependencyMap> {
        match kind {
            DependencyKind::Dependencies => self.dependencies.as_mut(),
            DependencyKind::DevDependencies => self.dev_dependencies.as_mut(),
            DependencyKind::PeerDependencies => self.peer_dependencies.as_mut(),
        }
    }

    /// Serializes the manifest with 2-space indentation and a trailing newline.
    ///
    /// Fields other than the dependency maps are written back untouched, in
    /// their original order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        let mut document = self.document.clone();
        document.insert("name".to_string(), Value::String(self.name.clone()));
        document.insert("version".to_string(), Value::String(self.version.clone()));
        for kind in DependencyKind::ALL {
            if let Some(map) = self.dependency_map(kind) {
                let object = map
                    .iter()
                    .map(|(dep, spec)| (dep.clone(), Value::String(spec.clone())))
                    .collect::<Map<_, _>>();
                document.insert(kind.field().to_string(), Value::Object(object));
            }
        }

        let mut out = serde_json::to_string_pretty(&Value::Object(document))?;
        out.push('\n');
        Ok(out)
    }

    /// Writes the manifest to `path`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string()?;
        fs::write(path, content).map_err(|e| Error::io(e, path, "writing package manifest"))
    }
}

fn required_string(document: &Map<String, Value>, field: &str, path: &Path) -> Result<String> {
    match document.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Error::manifest(path, format!("\"{field}\" must be a string"))),
        None => Err(Error::manifest(path, format!("missing \"{field}\" field"))),
    }
}

fn parse_dependency_map(
    document: &Map<String, Value>,
    kind: DependencyKind,
    path: &Path,
) -> Result<Option<DependencyMap>> {
    let Some(value) = document.get(kind.field()) else {
        return Ok(None);
    };
    let Value::Object(object) = value else {
        return Err(Error::manifest(
            path,
            format!("\"{kind}\" must be an object"),
        ));
    };

    object
        .iter()
        .map(|(dep, spec)| match spec {
            Value::String(s) => Ok((dep.clone(), s.clone())),
            _ => Err(Error::manifest(
                path,
                format!("\"{kind}\".\"{dep}\" must be a string"),
            )),
        })
        .collect::<Result<DependencyMap>>()
        .map(Some)
}
