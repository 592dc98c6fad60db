use anyhow::Result;
use museum_survey::utils::validation::Validate;
use museum_survey::{ArtifactGenerator, LocalStorage, MuseumConfig, TemplateCatalog, Token};
use std::io::Read;
use tempfile::TempDir;

fn live_config() -> Result<MuseumConfig> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("museum.toml");
    Ok(MuseumConfig::from_file(path)?)
}

#[tokio::test]
async fn test_generate_writes_every_artifact_and_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = live_config()?;
    config.validate()?;

    let generator = ArtifactGenerator::new(LocalStorage::new(temp_dir.path()));
    let report = generator.generate(&config, true).await?;

    assert_eq!(report.artifacts.len(), 5);
    for name in [
        "apps-script.js",
        "manifest.json",
        "script-config.js",
        "museum-info.html",
        "DEPLOYMENT.md",
    ] {
        assert!(temp_dir.path().join(name).exists(), "{} missing", name);
    }

    let bundle = report.bundle.expect("bundle requested");
    assert!(bundle.ends_with("finestrat-survey.zip"));

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&bundle)?)?;
    assert_eq!(archive.len(), 5);
    let mut header = String::new();
    archive.by_name("museum-info.html")?.read_to_string(&mut header)?;
    assert!(header.contains("<h1>MUSEU DE FINESTRAT</h1>"));
    assert!(header.contains("museum@finestrat.org</p>"));

    Ok(())
}

#[tokio::test]
async fn test_rendered_files_have_no_known_placeholders() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = live_config()?;

    ArtifactGenerator::new(LocalStorage::new(temp_dir.path()))
        .generate(&config, false)
        .await?;

    for entry in std::fs::read_dir(temp_dir.path())? {
        let content = std::fs::read_to_string(entry?.path())?;
        for token in Token::ALL {
            assert!(!content.contains(&token.placeholder()));
        }
    }

    let deployment = std::fs::read_to_string(temp_dir.path().join("DEPLOYMENT.md"))?;
    assert!(deployment.starts_with("# Museu de Finestrat Survey - Deployment Instructions"));
    assert!(deployment.contains("Supports languages: es, en, ca"));
    assert!(deployment.contains("**Email Frequency:** Every submission"));
    assert!(deployment.contains("Email alerts for ratings below 3/5"));

    Ok(())
}

#[tokio::test]
async fn test_generation_is_repeatable() -> Result<()> {
    let config = live_config()?;
    let first = TemplateCatalog::builtin().render_all(&config);
    let second = TemplateCatalog::builtin().render_all(&config);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_extra_templates_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let templates_path = temp_dir.path().join("extra.toml");
    std::fs::write(
        &templates_path,
        "\"sheet.txt\" = \"https://docs.google.com/spreadsheets/d/{{GOOGLE_SHEET_ID}}/edit\"\n",
    )?;

    let catalog = TemplateCatalog::builtin().with_extra_file(&templates_path)?;
    let output = temp_dir.path().join("dist");
    ArtifactGenerator::with_catalog(LocalStorage::new(&output), catalog)
        .generate(&live_config()?, false)
        .await?;

    let sheet = std::fs::read_to_string(output.join("sheet.txt"))?;
    assert_eq!(
        sheet,
        "https://docs.google.com/spreadsheets/d/1B60DryosMAg9RTZXcbIxRxXIWFFPVGZSFw1icMm4DM8/edit"
    );

    std::fs::write(&templates_path, "\"broken.txt\" = [1, 2]\n")?;
    assert!(TemplateCatalog::builtin()
        .with_extra_file(&templates_path)
        .is_err());

    Ok(())
}
