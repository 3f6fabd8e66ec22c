use anyhow::Result;
use domain_rank::{normalize_file, read_domains, LocalStorage, Normalizer, StrategyKind, ToolError};
use tempfile::TempDir;

const ASSETS: &str = "\
http://www.Example.com/path?x=1
https://example.com:8443/login

192.168.1.1
10.0.0.1:8080
api.example.com
shop.example.co.uk
https://zeta.org/
not a domain
alpha.net
";

#[tokio::test]
async fn test_normalize_file_dedups_and_sorts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zichan.txt"), ASSETS)?;

    let storage = LocalStorage::new(temp_dir.path());
    let normalizer = Normalizer::from_kind(StrategyKind::PublicSuffix);

    let report = normalize_file(&storage, &normalizer, "zichan.txt", "url.txt").await?;

    let output = std::fs::read_to_string(temp_dir.path().join("url.txt"))?;
    assert_eq!(output, "alpha.net\nexample.co.uk\nexample.com\nzeta.org");
    assert_eq!(report.unique_domains, 4);
    assert_eq!(report.lines_read, 9);
    assert_eq!(report.rejected, 3);
    assert_eq!(report.output_path, "url.txt");
    Ok(())
}

#[tokio::test]
async fn test_normalize_file_overwrites_previous_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zichan.txt"), "b.com\na.com\n")?;
    std::fs::write(temp_dir.path().join("url.txt"), "stale.com\nolder.com\nother.com\n")?;

    let storage = LocalStorage::new(temp_dir.path());
    let normalizer = Normalizer::from_kind(StrategyKind::Regex);
    normalize_file(&storage, &normalizer, "zichan.txt", "url.txt").await?;

    let output = std::fs::read_to_string(temp_dir.path().join("url.txt"))?;
    assert_eq!(output, "a.com\nb.com");
    Ok(())
}

#[tokio::test]
async fn test_missing_input_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    let normalizer = Normalizer::default();

    let err = normalize_file(&storage, &normalizer, "zichan.txt", "url.txt")
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InputNotFound { ref path } if path == "zichan.txt"));
    assert!(!temp_dir.path().join("url.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_normalized_output_feeds_rank_input() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("zichan.txt"), ASSETS)?;
    let storage = LocalStorage::new(temp_dir.path());

    normalize_file(&storage, &Normalizer::default(), "zichan.txt", "url.txt").await?;
    let domains = read_domains(&storage, "url.txt").await?;

    assert_eq!(
        domains,
        vec!["alpha.net", "example.co.uk", "example.com", "zeta.org"]
    );
    Ok(())
}

#[tokio::test]
async fn test_read_domains_rejects_empty_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("url.txt"), "\n   \n")?;
    let storage = LocalStorage::new(temp_dir.path());

    let err = read_domains(&storage, "url.txt").await.unwrap_err();
    assert!(matches!(err, ToolError::NoDomains { .. }));

    let err = read_domains(&storage, "absent.txt").await.unwrap_err();
    assert!(matches!(err, ToolError::InputNotFound { .. }));
    Ok(())
}
