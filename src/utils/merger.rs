use rayon::prelude::*;
use tracing::{debug, info};

use crate::history::H2hRecord;
use crate::models::{
    ExternalFixture, MergeOutcome, MergedRecord, PredictionRow, SideInjuries, UnmatchedRow,
};
use crate::utils::fixture_linker::FixtureLinker;
use crate::utils::odds_extractor::OddsExtractor;
use crate::utils::team_names::{NameMatcher, DEFAULT_MATCH_THRESHOLD};

/// Pairs every prediction row with at most one provider fixture
#[derive(Debug, Clone, Default)]
pub struct Merger {
    linker: FixtureLinker,
    extractor: OddsExtractor,
}

impl Merger {
    pub fn new(linker: FixtureLinker, extractor: OddsExtractor) -> Self {
        Self { linker, extractor }
    }

    /// One record per input row, in input order. Rows are linked independently,
    /// so two rows may link to the same fixture.
    pub fn merge<'a>(
        &self,
        rows: &[PredictionRow],
        fixtures: &'a [ExternalFixture],
    ) -> MergeOutcome<'a> {
        let records: Vec<MergedRecord<'a>> = rows
            .par_iter()
            .enumerate()
            .map(|(index, row)| self.merge_row(index, row, fixtures))
            .collect();

        let unmatched: Vec<UnmatchedRow> = records
            .iter()
            .filter(|r| !r.has_external_data())
            .map(UnmatchedRow::from)
            .collect();

        for row in &unmatched {
            debug!("Unmatched prediction row {}: {}", row.index, row.format());
        }
        info!(
            "Merged {} prediction rows against {} fixtures: {} linked, {} unmatched",
            rows.len(),
            fixtures.len(),
            records.len() - unmatched.len(),
            unmatched.len()
        );

        MergeOutcome { records, unmatched }
    }

    fn merge_row<'a>(
        &self,
        index: usize,
        row: &PredictionRow,
        fixtures: &'a [ExternalFixture],
    ) -> MergedRecord<'a> {
        let link = self.linker.link(index, row, fixtures);
        let Some(fixture) = link.external_ref.and_then(|i| fixtures.get(i)) else {
            return MergedRecord::unlinked(index, row);
        };

        let matcher = self.linker.matcher();
        let h2h = if fixture.h2h_payload.is_empty() {
            None
        } else {
            Some(H2hRecord::from_raw_matches(
                &fixture.home_name,
                fixture.home_id,
                &fixture.away_name,
                &fixture.h2h_payload,
                matcher,
            ))
        };

        MergedRecord {
            row: row.clone(),
            link,
            fixture: Some(fixture),
            odds: self.extractor.extract(&fixture.odds_payload),
            injuries: resolve_injuries(fixture, matcher),
            h2h,
        }
    }
}

/// Attribute each injury to the fixture side whose name it matches; unmatched ones are dropped
pub fn resolve_injuries(fixture: &ExternalFixture, matcher: &NameMatcher) -> SideInjuries {
    let mut sides = SideInjuries::default();
    for injury in &fixture.injuries {
        if matcher.is_match(&injury.team, &fixture.home_name, DEFAULT_MATCH_THRESHOLD) {
            sides.home.push(injury.clone());
        } else if matcher.is_match(&injury.team, &fixture.away_name, DEFAULT_MATCH_THRESHOLD) {
            sides.away.push(injury.clone());
        } else {
            debug!(
                "Dropping injury for {} ({}): team not in fixture {}",
                injury.player,
                injury.team,
                fixture.label()
            );
        }
    }
    sides
}
