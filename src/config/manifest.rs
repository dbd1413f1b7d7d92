use std::{borrow::Cow, path::Path};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::{Item, SnapshotId};

/// Initial contents for both snapshots of a repository.
///
/// The manifest is only ever read. Snapshots are not written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedManifest {
    pub before: Vec<(String, Item)>,
    pub after: Vec<(String, Item)>,
}

impl SeedManifest {
    pub async fn read(path: &Path) -> Result<Self, ManifestError> {
        debug!("Reading seed manifest: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read seed manifest: {} bytes", contents.len());

        contents.as_str().try_into()
    }

    /// The data set the tool starts with when no manifest is given.
    pub fn demo() -> Self {
        let item = |name: &str, mtime, size| Item::new(name, mtime, size);
        let shared = [
            ("/folder1/file2.txt", item("file2.txt", 1628112367, 512)),
            (
                "/folder2/subfolder/file3.txt",
                item("file3.txt", 1628112367, 2048),
            ),
        ];

        let before = [("/folder1/file1.txt", item("file1.txt", 1628112367, 1024))]
            .into_iter()
            .chain(shared.clone())
            .map(|(path, item)| (path.to_string(), item))
            .collect();
        let after = [
            ("/folder1/file1.txt", item("file1.txt", 1631558367, 1024)),
            ("/folder3/file4.txt", item("file4.txt", 1630752367, 512)),
        ]
        .into_iter()
        .chain(shared)
        .map(|(path, item)| (path.to_string(), item))
        .collect();

        Self { before, after }
    }

    pub fn entries(&self, id: SnapshotId) -> &[(String, Item)] {
        match id {
            SnapshotId::Before => &self.before,
            SnapshotId::After => &self.after,
        }
    }

    fn parse_snapshot(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        id: SnapshotId,
    ) -> Result<Vec<(String, Item)>, ManifestError> {
        let Some(section) = top_level.get(&string_key(&id.to_string())) else {
            debug!("No '{id}' section in manifest, snapshot starts empty");
            return Ok(Vec::new());
        };

        if matches!(section, Yaml::Value(Scalar::Null)) {
            return Ok(Vec::new());
        }

        section
            .as_mapping()
            .context(SnapshotNotMapSnafu { snapshot: id })?
            .iter()
            .map(|(key, value)| {
                let path = key
                    .as_str()
                    .context(PathNotStringSnafu { snapshot: id })?
                    .to_string();
                let item = Self::parse_item(id, &path, value)?;
                Ok::<_, ManifestError>((path, item))
            })
            .collect()
    }

    fn parse_item(id: SnapshotId, path: &str, value: &Yaml) -> Result<Item, ManifestError> {
        let fields = value.as_mapping().context(ItemNotMapSnafu {
            snapshot: id,
            path,
        })?;

        let integer_field = |field: &'static str| match fields.get(&string_key(field)) {
            Some(Yaml::Value(Scalar::Integer(number))) => Ok(*number),
            _ => InvalidFieldSnafu {
                snapshot: id,
                path,
                field,
            }
            .fail(),
        };

        let mtime = integer_field("mtime")?;
        let size = u64::try_from(integer_field("size")?)
            .ok()
            .context(InvalidFieldSnafu {
                snapshot: id,
                path,
                field: "size",
            })?;

        let name = match fields.get(&string_key("name")) {
            None => default_name(path),
            Some(value) => value
                .as_str()
                .context(InvalidFieldSnafu {
                    snapshot: id,
                    path,
                    field: "name",
                })?
                .to_string(),
        };

        Ok(Item::new(name, mtime, size))
    }
}

impl TryFrom<&str> for SeedManifest {
    type Error = ManifestError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            // an empty file seeds nothing
            return Ok(Self::default());
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        Ok(Self {
            before: Self::parse_snapshot(top_level, SnapshotId::Before)?,
            after: Self::parse_snapshot(top_level, SnapshotId::After)?,
        })
    }
}

fn string_key(key: &str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Owned(key.to_string())))
}

fn default_name(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("Failed to read the manifest file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Manifest file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the manifest file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the manifest should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Section '{}' should map paths to items", snapshot))]
    SnapshotNotMap { snapshot: SnapshotId },
    #[snafu(display("Section '{}' contains a path that is not a string", snapshot))]
    PathNotString { snapshot: SnapshotId },
    #[snafu(display("Item '{}' in section '{}' should be a map", path, snapshot))]
    ItemNotMap { snapshot: SnapshotId, path: String },
    #[snafu(display(
        "Item '{}' in section '{}' has a missing or invalid '{}'",
        path,
        snapshot,
        field
    ))]
    InvalidField {
        snapshot: SnapshotId,
        path: String,
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_both_sections() {
        let yaml = r#"
before:
  /folder1/file1.txt:
    mtime: 1628112367
    size: 1024
after:
  /folder1/file1.txt: { mtime: 1631558367, size: 1024 }
  /folder3/file4.txt: { mtime: 1630752367, size: 512, name: renamed.txt }
"#;
        let manifest = SeedManifest::try_from(yaml).unwrap();

        assert_eq!(
            manifest.before,
            vec![(
                "/folder1/file1.txt".to_string(),
                Item::new("file1.txt", 1628112367, 1024)
            )]
        );
        assert_eq!(manifest.after.len(), 2);
        assert_eq!(manifest.after[1].1.name, "renamed.txt");
    }

    #[rstest]
    #[case("")]
    #[case("other: value")]
    #[case("before:\nafter:")]
    fn missing_sections_seed_empty_snapshots(#[case] yaml: &str) {
        let manifest = SeedManifest::try_from(yaml).unwrap();
        assert!(manifest.before.is_empty());
        assert!(manifest.after.is_empty());
    }

    #[test]
    fn rejects_invalid_yaml() {
        let result = SeedManifest::try_from("before: [unclosed");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn rejects_non_map_top_level() {
        let result = SeedManifest::try_from("- item1\n- item2");
        assert!(matches!(result, Err(ManifestError::TopLevelNotMap)));
    }

    #[test]
    fn rejects_sequence_section() {
        let result = SeedManifest::try_from("after:\n  - /a");
        assert!(matches!(
            result,
            Err(ManifestError::SnapshotNotMap {
                snapshot: SnapshotId::After
            })
        ));
    }

    #[test]
    fn rejects_scalar_item() {
        let result = SeedManifest::try_from("before:\n  /a: 12");
        assert!(matches!(result, Err(ManifestError::ItemNotMap { .. })));
    }

    #[rstest]
    #[case("before:\n  /a: { size: 1 }", "mtime")]
    #[case("before:\n  /a: { mtime: 1 }", "size")]
    #[case("before:\n  /a: { mtime: 1, size: -4 }", "size")]
    #[case("before:\n  /a: { mtime: soon, size: 1 }", "mtime")]
    #[case("before:\n  /a: { mtime: 1, size: 1, name: [x] }", "name")]
    fn rejects_invalid_fields(#[case] yaml: &str, #[case] expected_field: &str) {
        let result = SeedManifest::try_from(yaml);
        match result {
            Err(ManifestError::InvalidField { field, path, .. }) => {
                assert_eq!(field, expected_field);
                assert_eq!(path, "/a");
            }
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn name_defaults_to_last_segment() {
        let manifest = SeedManifest::try_from("after:\n  /docs/report.pdf: { mtime: 0, size: 3 }")
            .unwrap();
        assert_eq!(manifest.after[0].1.name, "report.pdf");
    }

    #[test]
    fn demo_matches_the_documented_data_set() {
        let demo = SeedManifest::demo();
        assert_eq!(demo.entries(SnapshotId::Before).len(), 3);
        assert_eq!(demo.entries(SnapshotId::After).len(), 4);
        assert!(
            demo.after
                .iter()
                .any(|(path, item)| path == "/folder1/file1.txt" && item.mtime == 1631558367)
        );
    }

    #[compio::test]
    async fn reads_manifest_from_disk() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "before:\n  /a: {{ mtime: 1, size: 2 }}").expect("Failed to write manifest");

        let manifest = SeedManifest::read(file.path())
            .await
            .expect("Failed to read manifest");
        assert_eq!(manifest.before, vec![("/a".to_string(), Item::new("a", 1, 2))]);
    }

    #[compio::test]
    async fn reports_missing_file() {
        let result = SeedManifest::read(Path::new("nonexistent-manifest.yaml")).await;
        assert!(matches!(result, Err(ManifestError::ReadError { .. })));
    }
}
