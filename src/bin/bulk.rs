use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use stresformance::{read_bulk, Assessment, Error, Thresholds};

/// Score a CSV of completed surveys: one respondent per row, an id field
/// followed by 11 answer fields (scores 1-5 or plain labels).
#[derive(Parser)]
struct Args {
    path: String,
    /// Put the low/moderate boundary at 2.5 instead of 2.0.
    #[arg(long)]
    wide_low: bool,
    /// Emit one JSON object per respondent instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Row<'a> {
    id: &'a str,
    #[serde(flatten)]
    assessment: &'a Assessment,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();
    let thresholds = if args.wide_low {
        Thresholds::WIDE_LOW
    } else {
        Thresholds::CANONICAL
    };
    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_bulk(reader) {
        let (id, sheet) = match row {
            Ok(row) => row,
            Err(e) => {
                log::warn!("skipping row: {e}");
                continue;
            }
        };
        match sheet.to_assessment(&thresholds) {
            Ok(assessment) => {
                if args.json {
                    println!(
                        "{}",
                        serde_json::to_string(&Row {
                            id: &id,
                            assessment: &assessment
                        })?
                    );
                } else {
                    println!(
                        "id = {}, stress = {:.2} ({}), performance = {:.2} ({}), advice = {}",
                        id,
                        assessment.stress.mean,
                        assessment.stress.category,
                        assessment.performance.mean,
                        assessment.performance.category,
                        assessment.advice_text()
                    );
                }
            }
            Err(e) => log::warn!("skipping {id}: {e}"),
        }
    }
    Ok(())
}
