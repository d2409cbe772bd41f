//! Preset store backed by `config.json`

use crate::input::prompt::{Field, Prompter};
use crate::models::{Container, Quality};
use crate::utils::error::TubeloaderError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Output directory used when neither the user nor the preset names one
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Name of the preset written on first run
pub const DEFAULT_TEMPLATE_NAME: &str = "default";

/// Named bundle of download defaults; missing fields fall back to the fixed defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_subs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Preset {
    pub fn quality(&self) -> Quality {
        self.quality.unwrap_or_default()
    }

    pub fn container(&self) -> Container {
        self.format.unwrap_or_default()
    }

    pub fn download_subs(&self) -> bool {
        self.download_subs.unwrap_or(false)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Preset mapping that remembers the order names appear in the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates(Vec<(String, Preset)>);

impl Templates {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add or replace a preset; a replaced preset keeps its position
    pub fn insert(&mut self, name: impl Into<String>, preset: Preset) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = preset,
            None => self.0.push((name, preset)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, preset)| preset)
    }

    /// 0-based positional lookup
    pub fn get_index(&self, index: usize) -> Option<(&str, &Preset)> {
        self.0
            .get(index)
            .map(|(name, preset)| (name.as_str(), preset))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Templates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, preset) in &self.0 {
            map.serialize_entry(name, preset)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Templates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TemplatesVisitor;

        impl<'de> Visitor<'de> for TemplatesVisitor {
            type Value = Templates;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of template names to presets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Templates, A::Error> {
                let mut templates = Templates::new();
                while let Some((name, preset)) = access.next_entry::<String, Preset>()? {
                    templates.insert(name, preset);
                }
                Ok(templates)
            }
        }

        deserializer.deserialize_map(TemplatesVisitor)
    }
}

/// Top-level contents of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub templates: Templates,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        let mut templates = Templates::new();
        templates.insert(
            DEFAULT_TEMPLATE_NAME,
            Preset {
                quality: Some(Quality::Best),
                format: Some(Container::Mp4),
                download_subs: Some(false),
                output_dir: None,
            },
        );
        Self { templates }
    }
}

/// Write the one-preset default document to `path`
pub fn write_default_config(path: &Path) -> Result<ConfigDocument, TubeloaderError> {
    let document = ConfigDocument::default();
    let json = serde_json::to_string_pretty(&document).map_err(|source| {
        TubeloaderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    std::fs::write(path, json).map_err(|source| {
        error!("Failed to create configuration file {:?}: {}", path, source);
        TubeloaderError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!("Default configuration written to {:?}", path);
    Ok(document)
}

/// Parse a configuration document; any malformed input is rejected as a whole
pub fn read_config(path: &Path) -> Result<ConfigDocument, TubeloaderError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TubeloaderError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: ConfigDocument =
        serde_json::from_str(&contents).map_err(|source| {
            error!("Error parsing configuration file {:?}: {}", path, source);
            TubeloaderError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

    debug!(
        "Loaded {} template(s) from {:?}",
        document.templates.len(),
        path
    );
    Ok(document)
}

/// Load the configuration, creating the default file first when it is missing
pub fn load_config(path: &Path) -> Result<ConfigDocument, TubeloaderError> {
    if !path.exists() {
        println!(
            "Configuration file not found. Creating a default {}...",
            path.display()
        );
        write_default_config(path)?;
        println!("Default configuration file created: {}", path.display());
    }

    read_config(path)
}

/// List presets with 1-based numbers and ask until a valid number is given
///
/// Invalid choices never end the selection; only closed input does.
pub fn select_template<'a, R: BufRead, W: Write>(
    document: &'a ConfigDocument,
    prompter: &mut Prompter<R, W>,
) -> Result<(&'a str, &'a Preset), TubeloaderError> {
    let templates = &document.templates;
    if templates.is_empty() {
        return Err(TubeloaderError::NoTemplates);
    }

    prompter.say("Available templates:")?;
    for (i, name) in templates.names().enumerate() {
        prompter.say(&format!("{}. {}", i + 1, name))?;
    }

    let field = Field::new(
        "template",
        "Select a template (enter number): ",
        "Invalid choice. Please enter a number from the list.",
    );
    let index = prompter.prompt_until_valid(&field, |answer| {
        answer
            .parse::<usize>()
            .ok()
            .filter(|choice| (1..=templates.len()).contains(choice))
    })?;

    let (name, preset) = templates
        .get_index(index - 1)
        .ok_or(TubeloaderError::NoTemplates)?;
    info!("Selected template '{}'", name);
    Ok((name, preset))
}
