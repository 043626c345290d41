use std::path::PathBuf;

use anyhow::{Context, Result};

use exsoviet_ranking::dataset::{self, season_label};
use exsoviet_ranking::nation_coefficient::RankingWeights;
use exsoviet_ranking::ranking_export;
use exsoviet_ranking::rankings;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let nations_path = parse_path_arg(&args, "--nations");
    let clubs_path = parse_path_arg(&args, "--clubs");
    let out_path =
        parse_path_arg(&args, "--out").unwrap_or_else(|| PathBuf::from("exsoviet_ranking.xlsx"));
    let json_path = parse_path_arg(&args, "--json");

    let tables = dataset::load_tables(nations_path.as_deref(), clubs_path.as_deref())
        .context("load ranking tables")?;
    let weights = RankingWeights::from_env();
    let snapshot = rankings::compute_snapshot(&tables.nations, &tables.clubs, weights);

    println!("Ex-Soviet ranking export");
    println!(
        "Nations: {} ({})",
        snapshot.nations.len(),
        tables.nations_source
    );
    println!("Clubs: {} ({})", snapshot.clubs.len(), tables.clubs_source);
    let window: Vec<String> = snapshot
        .window_years
        .iter()
        .map(|year| season_label(*year))
        .collect();
    println!("Club window: {}", window.join(", "));
    println!();

    for nation in &snapshot.nations {
        println!(
            "{:>3}. {}  {:<14} {:>10.3}",
            nation.rank, nation.country_code, nation.country, nation.coefficient
        );
    }
    println!();

    let report = ranking_export::write_snapshot_xlsx(&out_path, &snapshot)?;
    println!(
        "Workbook: {} ({} nations, {} clubs)",
        out_path.display(),
        report.nations,
        report.clubs
    );

    if let Some(json_path) = json_path {
        ranking_export::write_snapshot_json(&json_path, &snapshot)?;
        println!("Snapshot: {}", json_path.display());
    }

    Ok(())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
            if !value.trim().is_empty() {
                return Some(PathBuf::from(value.trim()));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next.trim()));
        }
    }
    None
}
