//! Turns raw ratings into normalized 0-100 scores.
//!
//! Every backend hands raw [`RatingSample`]s to these functions, so the
//! formula, bucketing and ordering rules exist exactly once.
//!
//! Score of a set of ratings:
//! `round(avg(rating * weight + rating) / avg(MAX_RATING * weight + MAX_RATING) * 100)`
//!
//! A bucket without ratings has no score. Sequence outputs omit such buckets;
//! scalar outputs and diff operands read them as 0.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::{Decimal, FromPrimitive, RoundingStrategy, ToPrimitive};

use crate::models::{
    CategoryCount, CategoryDiff, Granularity, PeriodLabel, PeriodScore, RatingCategory,
    RatingSample, TicketScore, TimeRange,
};

/// Highest value a single rating can take.
pub const MAX_RATING: i32 = 5;

/// Ranges longer than one calendar month are bucketed by ISO week,
/// everything else by day.
pub fn granularity_for(range: &TimeRange) -> Granularity {
    let month_later = range
        .from()
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);

    if range.to() > month_later {
        Granularity::Week
    } else {
        Granularity::Day
    }
}

/// Running sums of achieved and possible weighted points. Kept in decimal so
/// that the sum is exact and does not depend on row order.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    achieved: Decimal,
    possible: Decimal,
    // Set once a weight cannot be represented or a sum overflows.
    invalid: bool,
}

impl Tally {
    fn add(&mut self, sample: &RatingSample) {
        let added = Decimal::from_f64(sample.weight)
            .and_then(|weight| weight.checked_add(Decimal::ONE))
            .and_then(|factor| {
                let achieved = Decimal::from(sample.rating).checked_mul(factor)?;
                let possible = Decimal::from(MAX_RATING).checked_mul(factor)?;
                Some((
                    self.achieved.checked_add(achieved)?,
                    self.possible.checked_add(possible)?,
                ))
            });

        match added {
            Some((achieved, possible)) => {
                self.achieved = achieved;
                self.possible = possible;
            }
            None => self.invalid = true,
        }
    }

    // Both averages run over the same rows, so the ratio of sums equals the
    // ratio of averages.
    fn score(&self) -> Option<i32> {
        if self.invalid || self.possible.is_zero() {
            return None;
        }
        self.achieved
            .checked_mul(Decimal::ONE_HUNDRED)?
            .checked_div(self.possible)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i32()
    }
}

/// Score of an arbitrary set of ratings, `None` when there is nothing to score.
pub fn normalized_score<'a>(samples: impl IntoIterator<Item = &'a RatingSample>) -> Option<i32> {
    let mut tally = Tally::default();
    let mut seen = false;
    for sample in samples {
        tally.add(sample);
        seen = true;
    }
    if seen { tally.score() } else { None }
}

/// Per category scores bucketed by day or ISO week, ordered by period and
/// then by category id.
pub fn period_scores(samples: &[RatingSample], granularity: Granularity) -> Vec<PeriodScore> {
    let mut buckets: BTreeMap<(PeriodLabel, RatingCategory), Tally> = BTreeMap::new();
    for sample in samples {
        let period = PeriodLabel::for_date(sample.created_on, granularity);
        buckets
            .entry((period, sample.category()))
            .or_default()
            .add(sample);
    }

    buckets
        .into_iter()
        .filter_map(|((period, category), tally)| {
            tally.score().map(|score| PeriodScore {
                category,
                period,
                score,
            })
        })
        .collect()
}

/// Number of ratings per category, ordered by category id.
pub fn rating_counts(samples: &[RatingSample]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<RatingCategory, i64> = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.category()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

/// Per ticket and category scores over the whole sample set.
pub fn ticket_scores(samples: &[RatingSample]) -> Vec<TicketScore> {
    let mut tickets: BTreeMap<(i64, RatingCategory), Tally> = BTreeMap::new();
    for sample in samples {
        tickets
            .entry((sample.ticket_id, sample.category()))
            .or_default()
            .add(sample);
    }

    tickets
        .into_iter()
        .filter_map(|((ticket_id, category), tally)| {
            tally.score().map(|score| TicketScore {
                ticket_id,
                category,
                score,
            })
        })
        .collect()
}

/// Range-wide score across all categories and tickets, 0 without ratings.
pub fn overall_score(samples: &[RatingSample]) -> i32 {
    normalized_score(samples).unwrap_or(0)
}

fn scores_by_category(samples: &[RatingSample]) -> BTreeMap<i64, (RatingCategory, i32)> {
    let mut tallies: BTreeMap<i64, (RatingCategory, Tally)> = BTreeMap::new();
    for sample in samples {
        tallies
            .entry(sample.category_id)
            .or_insert_with(|| (sample.category(), Tally::default()))
            .1
            .add(sample);
    }

    tallies
        .into_iter()
        .map(|(id, (category, tally))| (id, (category, tally.score().unwrap_or(0))))
        .collect()
}

/// `second - first` per category, matched by category id. A category rated
/// in only one of the ranges scores 0 in the other.
pub fn period_over_period(first: &[RatingSample], second: &[RatingSample]) -> Vec<CategoryDiff> {
    let first = scores_by_category(first);
    let mut second = scores_by_category(second);

    let mut diffs: BTreeMap<i64, CategoryDiff> = BTreeMap::new();
    for (id, (category, before)) in first {
        let after = second.remove(&id).map_or(0, |(_, score)| score);
        diffs.insert(
            id,
            CategoryDiff {
                category,
                diff: after - before,
            },
        );
    }
    for (id, (category, after)) in second {
        diffs.insert(
            id,
            CategoryDiff {
                category,
                diff: after,
            },
        );
    }

    diffs.into_values().collect()
}

/// Category names ordered by category id.
pub fn category_names(categories: &[RatingCategory]) -> Vec<String> {
    let mut sorted: Vec<&RatingCategory> = categories.iter().collect();
    sorted.sort_by_key(|category| category.id);
    sorted.into_iter().map(|category| category.name.clone()).collect()
}
