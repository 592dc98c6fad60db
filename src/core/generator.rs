use crate::config::MuseumConfig;
use crate::core::catalog::{RenderedArtifact, TemplateCatalog};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub artifacts: Vec<String>,
    pub bundle: Option<String>,
}

/// Renders the template catalog for one museum and writes the results.
pub struct ArtifactGenerator<S: Storage> {
    storage: S,
    catalog: TemplateCatalog,
}

impl<S: Storage> ArtifactGenerator<S> {
    pub fn new(storage: S) -> Self {
        Self::with_catalog(storage, TemplateCatalog::builtin())
    }

    pub fn with_catalog(storage: S, catalog: TemplateCatalog) -> Self {
        Self { storage, catalog }
    }

    pub async fn generate(&self, config: &MuseumConfig, bundle: bool) -> Result<GenerationReport> {
        let artifacts = self.catalog.render_all(config);
        tracing::info!(
            "Rendered {} artifacts for '{}'",
            artifacts.len(),
            config.museum_name()
        );

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            self.storage
                .write_file(&artifact.file_name, artifact.content.as_bytes())
                .await?;
            let location = self.storage.location(&artifact.file_name);
            tracing::debug!("Wrote {} ({} bytes)", location, artifact.content.len());
            written.push(location);
        }

        let bundle = if bundle {
            let file_name = bundle_file_name(config);
            let zip_data = zip_artifacts(&artifacts)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&file_name, &zip_data).await?;
            Some(self.storage.location(&file_name))
        } else {
            None
        };

        Ok(GenerationReport {
            artifacts: written,
            bundle,
        })
    }
}

/// `<short-name>-survey.zip`, lower-cased with non-alphanumerics collapsed
/// to single dashes.
pub fn bundle_file_name(config: &MuseumConfig) -> String {
    let short_name = config.museum_short_name().to_lowercase();
    let slug = short_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "museum-survey.zip".to_string()
    } else {
        format!("{}-survey.zip", slug)
    }
}

fn zip_artifacts(artifacts: &[RenderedArtifact]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for artifact in artifacts {
        zip.start_file::<_, ()>(artifact.file_name.as_str(), FileOptions::default())?;
        zip.write_all(artifact.content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
