use crate::config::MuseumConfig;
use crate::core::placeholder::{template_source, TokenValues};
use crate::utils::error::{Result, SurveyError};
use serde::Serialize;
use std::path::Path;

/// The artifacts every museum deployment needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    AppsScript,
    Manifest,
    ScriptConfig,
    MuseumInfoSection,
    DeploymentInstructions,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::AppsScript,
        TemplateKind::Manifest,
        TemplateKind::ScriptConfig,
        TemplateKind::MuseumInfoSection,
        TemplateKind::DeploymentInstructions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::AppsScript => "appsScript",
            TemplateKind::Manifest => "manifest",
            TemplateKind::ScriptConfig => "scriptConfig",
            TemplateKind::MuseumInfoSection => "museumInfoSection",
            TemplateKind::DeploymentInstructions => "deploymentInstructions",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::AppsScript => "apps-script.js",
            TemplateKind::Manifest => "manifest.json",
            TemplateKind::ScriptConfig => "script-config.js",
            TemplateKind::MuseumInfoSection => "museum-info.html",
            TemplateKind::DeploymentInstructions => "DEPLOYMENT.md",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            TemplateKind::AppsScript => include_str!("../../templates/apps-script.js.tpl"),
            TemplateKind::Manifest => include_str!("../../templates/manifest.json.tpl"),
            TemplateKind::ScriptConfig => include_str!("../../templates/script-config.js.tpl"),
            TemplateKind::MuseumInfoSection => include_str!("../../templates/museum-info.html.tpl"),
            TemplateKind::DeploymentInstructions => {
                include_str!("../../templates/DEPLOYMENT.md.tpl")
            }
        }
    }

    pub fn template(self) -> Template {
        Template {
            name: self.name().to_string(),
            file_name: self.file_name().to_string(),
            source: self.source().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub file_name: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    pub name: String,
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: TemplateKind::ALL.into_iter().map(TemplateKind::template).collect(),
        }
    }

    /// Adds extra templates from a TOML table of `file_name = "template"`
    /// entries. Non-string entries are rejected as malformed.
    pub fn with_extra_toml(mut self, content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;

        for (file_name, value) in table {
            validate_file_name(&file_name)?;
            let source = template_source(&file_name, value)?;
            tracing::debug!("Registering extra template '{}'", file_name);
            self.insert(Template {
                name: file_name.clone(),
                file_name,
                source,
            });
        }

        Ok(self)
    }

    pub fn with_extra_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        self.with_extra_toml(&content)
    }

    /// Replaces a template with the same output file name, else appends.
    pub fn insert(&mut self, template: Template) {
        match self
            .templates
            .iter_mut()
            .find(|t| t.file_name == template.file_name)
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn render_all(&self, config: &MuseumConfig) -> Vec<RenderedArtifact> {
        let values = TokenValues::from_config(config);

        self.templates
            .iter()
            .map(|t| RenderedArtifact {
                name: t.name.clone(),
                file_name: t.file_name.clone(),
                content: values.apply(&t.source),
            })
            .collect()
    }
}

/// Extra template keys become output file names, so they must stay inside
/// the output directory.
fn validate_file_name(file_name: &str) -> Result<()> {
    let reason = if file_name.trim().is_empty() {
        Some("file name is empty")
    } else if file_name.contains(['/', '\\']) {
        Some("file name must not contain path separators")
    } else if file_name == "." || file_name == ".." {
        Some("file name must not refer to a directory")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SurveyError::InvalidConfigValueError {
            field: "templates".to_string(),
            value: file_name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
