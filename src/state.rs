use std::collections::VecDeque;

use crate::dataset::NationRecord;
use crate::rankings::{RankedNation, RankingSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Nations,
    Clubs,
    Breakdown,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownMetric {
    Final,
    Uefa,
    Afc,
    Fifa,
}

pub struct AppState {
    pub screen: Screen,
    pub snapshot: RankingSnapshot,
    /// Raw nation table behind the snapshot; the history view plots its
    /// per-season series directly.
    pub nations: Vec<NationRecord>,
    pub nations_source: String,
    pub clubs_source: String,
    pub selected: usize,
    pub metric: BreakdownMetric,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Nations,
            snapshot: RankingSnapshot::default(),
            nations: Vec::new(),
            nations_source: String::new(),
            clubs_source: String::new(),
            selected: 0,
            metric: BreakdownMetric::Final,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn set_snapshot(
        &mut self,
        snapshot: RankingSnapshot,
        nations: Vec<NationRecord>,
        nations_source: String,
        clubs_source: String,
    ) {
        self.snapshot = snapshot;
        self.nations = nations;
        self.nations_source = nations_source;
        self.clubs_source = clubs_source;
        self.clamp_selection();
    }

    /// Length of the list the selection moves over on the current screen.
    pub fn active_len(&self) -> usize {
        match self.screen {
            Screen::Clubs => self.snapshot.clubs.len(),
            Screen::Nations | Screen::Breakdown | Screen::History => self.snapshot.nations.len(),
        }
    }

    pub fn select_next(&mut self) {
        let total = self.active_len();
        if total == 0 {
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.active_len();
        if total == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            total - 1
        } else {
            self.selected - 1
        };
    }

    pub fn clamp_selection(&mut self) {
        let total = self.active_len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn selected_nation(&self) -> Option<&RankedNation> {
        self.snapshot.nations.get(self.selected)
    }

    pub fn cycle_metric(&mut self) {
        self.metric = match self.metric {
            BreakdownMetric::Final => BreakdownMetric::Uefa,
            BreakdownMetric::Uefa => BreakdownMetric::Afc,
            BreakdownMetric::Afc => BreakdownMetric::Fifa,
            BreakdownMetric::Fifa => BreakdownMetric::Final,
        };
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Nations => "Nations",
        Screen::Clubs => "Clubs",
        Screen::Breakdown => "Breakdown",
        Screen::History => "History",
    }
}

pub fn metric_label(metric: BreakdownMetric) -> &'static str {
    match metric {
        BreakdownMetric::Final => "Final score",
        BreakdownMetric::Uefa => "UEFA total",
        BreakdownMetric::Afc => "AFC total",
        BreakdownMetric::Fifa => "FIFA total",
    }
}

pub fn metric_value(metric: BreakdownMetric, nation: &RankedNation) -> f64 {
    match metric {
        BreakdownMetric::Final => nation.coefficient,
        BreakdownMetric::Uefa => nation.uefa_total,
        BreakdownMetric::Afc => nation.afc_total,
        BreakdownMetric::Fifa => nation.fifa_total,
    }
}
