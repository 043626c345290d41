use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dataset::season_label;
use crate::rankings::{RankedClub, RankedNation, RankingSnapshot};

pub struct ExportReport {
    pub nations: usize,
    pub clubs: usize,
}

pub fn write_snapshot_xlsx(path: &Path, snapshot: &RankingSnapshot) -> Result<ExportReport> {
    let mut nations_rows = vec![vec![
        "Rank".to_string(),
        "Code".to_string(),
        "Country".to_string(),
        "UEFA (5y)".to_string(),
        "AFC (5y)".to_string(),
        "FIFA (5y)".to_string(),
        "Coefficient".to_string(),
    ]];
    for nation in &snapshot.nations {
        nations_rows.push(nation_row(nation));
    }

    let mut clubs_header = vec![
        "Rank".to_string(),
        "Club".to_string(),
        "Code".to_string(),
        "Nation".to_string(),
    ];
    clubs_header.extend(snapshot.window_years.iter().map(|year| season_label(*year)));
    clubs_header.push("Coefficient".to_string());
    let mut clubs_rows = vec![clubs_header];
    for club in &snapshot.clubs {
        clubs_rows.push(club_row(club));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Nations")?;
        write_rows(sheet, &nations_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Clubs")?;
        write_rows(sheet, &clubs_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        nations: snapshot.nations.len(),
        clubs: snapshot.clubs.len(),
    })
}

/// Serialize the snapshot as pretty JSON for downstream tooling. On the
/// same inputs the output is byte-identical across runs.
pub fn write_snapshot_json(path: &Path, snapshot: &RankingSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serialize ranking snapshot")?;
    fs::write(path, json).with_context(|| format!("failed writing snapshot to {}", path.display()))?;
    Ok(())
}

fn nation_row(nation: &RankedNation) -> Vec<String> {
    vec![
        nation.rank.to_string(),
        nation.country_code.clone(),
        nation.country.clone(),
        format!("{:.3}", nation.uefa_total),
        format!("{:.3}", nation.afc_total),
        format!("{:.1}", nation.fifa_total),
        format!("{:.3}", nation.coefficient),
    ]
}

fn club_row(club: &RankedClub) -> Vec<String> {
    let mut row = vec![
        club.rank.to_string(),
        club.team.clone(),
        club.team_code.clone(),
        club.country_code.clone(),
    ];
    row.extend(
        club.season_values
            .iter()
            .map(|(_, value)| format!("{value:.3}")),
    );
    row.push(format!("{:.3}", club.coefficient));
    row
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
