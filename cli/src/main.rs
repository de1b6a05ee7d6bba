use std::path::PathBuf;

use anyhow::Context;
use ccda_core::{CcdaConfig, DocumentResult, LocalZone, SectionContent, SectionKey};
use ccda_extract::{care_team, encounter, extract_document, social_history, Document};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "ccda-cli",
    about = "Trích xuất các section của tài liệu C-CDA thành JSON."
)]
struct Args {
    /// Đường dẫn tới file XML C-CDA.
    #[arg(short, long)]
    input: PathBuf,

    /// Độ lệch múi giờ của người xem (phút); mặc định dùng múi giờ máy.
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    /// Chỉ trích xuất section này (ví dụ RESULTS_SECTION); lặp lại để chọn nhiều section.
    #[arg(long = "section", value_name = "KEY")]
    sections: Vec<SectionKey>,

    /// In tóm tắt từng section thay vì JSON.
    #[arg(long)]
    summary: bool,

    /// Bật log mức debug.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_directive = if args.verbose { "ccda=debug" } else { "ccda=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let config = CcdaConfig {
        local_zone: args
            .utc_offset
            .map(|offset_minutes| LocalZone::Fixed { offset_minutes })
            .unwrap_or_default(),
        sections: (!args.sections.is_empty()).then_some(args.sections),
    };
    let document = Document::parse(&data)
        .with_context(|| format!("Không đọc được XML trong {:?}", args.input))?;
    let result = extract_document(&document, &config);
    tracing::info!(sections = result.len(), "extracted {:?}", args.input);

    if args.summary {
        print_summary(&result, &document, &config.local_zone);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn print_summary(result: &DocumentResult, document: &Document<'_>, zone: &LocalZone) {
    for (key, content) in result.iter() {
        println!("{key}: {}", describe(content, zone));
    }

    let social = social_history(document);
    if !social.items.is_empty() {
        println!("social history: {} items", social.items.len());
    }
    if let Some(encounter) = encounter(document) {
        println!(
            "encounter: {} ({}), {} diagnoses",
            encounter.title,
            when(encounter.start(zone), zone),
            encounter.diagnoses.len()
        );
    }
    if let Some(team) = care_team(document) {
        println!("care team: {}, {} members", team.title, team.members.len());
    }
}

fn describe(content: &SectionContent, zone: &LocalZone) -> String {
    match content {
        SectionContent::Raw(markup) => format!("narrative ({} bytes)", markup.len()),
        SectionContent::Results(results) => {
            let items: usize = results.panels.iter().map(|panel| panel.items.len()).sum();
            let flagged = results
                .panels
                .iter()
                .flat_map(|panel| &panel.items)
                .filter(|item| item.is_out_of_range)
                .count();
            format!(
                "{} panels, {items} results, {flagged} out of range",
                results.panels.len()
            )
        }
        SectionContent::Vitals(vitals) => {
            let readings: usize = vitals.items.values().map(Vec::len).sum();
            format!("{} vital signs, {readings} readings", vitals.items.len())
        }
        SectionContent::HistoryOfPresentIllness(Some(hpi)) => {
            format!("{} ({})", hpi.title, when(hpi.recorded_at(zone), zone))
        }
        SectionContent::HistoryOfPresentIllness(None) => "no LOINC-coded entry".to_string(),
    }
}

fn when(
    timestamp: Result<Option<ccda_core::Timestamp>, ccda_core::CcdaError>,
    zone: &LocalZone,
) -> String {
    match timestamp {
        Ok(Some(ts)) => ts.display(zone),
        Ok(None) => "no date".to_string(),
        Err(err) => err.to_string(),
    }
}
