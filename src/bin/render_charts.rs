#![cfg(not(tarpaulin_include))]
use ecfr_dashboard::graph::render_summary_charts;
use ecfr_dashboard::model::StructuralSummary;
use ecfr_dashboard::summary::SummaryView;
use std::env;
use std::fs;
use std::path::Path;

// Renders the upload-view charts for a saved analysis response, e.g.
// `render_charts summary.json out/`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <summary.json> [output-dir]", args[0]);
        std::process::exit(2);
    }
    let out_dir = Path::new(args.get(2).map(String::as_str).unwrap_or("."));
    fs::create_dir_all(out_dir)?;

    let summary: StructuralSummary = serde_json::from_str(&fs::read_to_string(&args[1])?)?;
    let charts = render_summary_charts(&SummaryView::from_summary(&summary))?;

    let named = [
        ("elements", charts.elements),
        ("sections", charts.sections),
        ("text-stats", charts.text_stats),
        ("element-share", charts.element_share),
    ];
    for (name, svg) in named {
        match svg {
            Some(svg) => {
                let file_path = out_dir.join(format!("{}.svg", name));
                fs::write(&file_path, svg)?;
                println!("Created {} chart at {}", name, file_path.display());
            }
            None => println!("Skipped {} chart: no data", name),
        }
    }

    Ok(())
}
