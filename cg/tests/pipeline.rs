//! Brief to document, end to end, with a scripted LLM

use std::sync::Arc;

use chrono::NaiveDate;
use campaigngen::config::Config;
use campaigngen::llm::MockLlmClient;
use campaigngen::planner::{NO_RESPONSE, Planner};
use campaigngen::prompts::PromptLoader;
use plandoc::{Block, JsonExporter, OutputFormat};

const REPLY: &str = "### Campaign Overview\r\nA spring push for the new oat latte.\r\n\r\n### KPIs\r\n* 2% CTR\r\n• 10k signups\r\n\r\n### Budget Breakdown (USD)\r\nSearch ads  $4,000\r\nPodcasts  $2,000\r\nSwag\r\n";

fn planner(client: Arc<MockLlmClient>, config: &Config) -> Planner {
    Planner::new(client, Arc::new(PromptLoader::embedded_only()), &config.llm)
}

#[tokio::test]
async fn test_brief_to_json_document() {
    let config = Config::default();
    let client = Arc::new(MockLlmClient::new(vec![REPLY]));

    let plan = planner(client.clone(), &config).generate("oat latte launch").await.unwrap();
    assert_eq!(client.call_count(), 1);

    let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
    let doc = plandoc::build_document(&plan, &config.document.branding(), date);

    assert_eq!(doc.cover().unwrap().generated, "4/2/2025");
    let headings: Vec<_> = doc.sections().map(|s| s.heading.as_str()).collect();
    assert_eq!(headings, ["Campaign Overview", "KPIs", "Budget Breakdown (USD)"]);

    let bars: Vec<_> = doc
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Bar(bar) => Some((bar.label.clone(), bar.units)),
            _ => None,
        })
        .collect();
    assert_eq!(
        bars,
        [
            ("Search ads: $4,000".to_string(), 28),
            ("Podcasts: $2,000".to_string(), 14),
            ("Swag: ".to_string(), 1),
        ]
    );

    let bytes = plandoc::render(&plan, &config.document.branding(), date, &JsonExporter).unwrap();
    let again = plandoc::render(&plan, &config.document.branding(), date, &JsonExporter).unwrap();
    assert_eq!(bytes, again);
}

#[tokio::test]
async fn test_brief_to_docx_bytes() {
    let config = Config::default();
    let client = Arc::new(MockLlmClient::new(vec![REPLY]));

    let plan = planner(client, &config).generate("oat latte launch").await.unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
    let exporter = OutputFormat::Docx.exporter(config.document.theme());
    let bytes = plandoc::render(&plan, &config.document.branding(), date, exporter.as_ref()).unwrap();

    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_empty_reply_still_renders() {
    let config = Config::default();
    let client = Arc::new(MockLlmClient::new(vec![""]));

    let plan = planner(client, &config).generate("anything").await.unwrap();
    assert_eq!(plan, NO_RESPONSE);

    let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
    let doc = plandoc::build_document(&plan, &config.document.branding(), date);
    let sections: Vec<_> = doc.sections().collect();

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].heading, "Campaign Overview");
    assert!(doc.table().is_none());
}
