use chrono::{Datelike, Month};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Destination, Tourist, Visit};
use crate::presentation::format_display_time;
use crate::store::Snapshot;

pub const RECENT_ACTIVITY_LIMIT: usize = 10;
pub const TOP_DESTINATIONS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub tourists: usize,
    pub destinations: usize,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationalityCount {
    pub nationality: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationRating {
    pub destination_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    /// `None` when every visit to the destination is unrated.
    pub avg_rating: Option<f64>,
    pub visit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub visit_id: i64,
    pub tourist_name: String,
    pub destination_name: String,
    pub city: String,
    pub country: String,
    pub rating: Option<i64>,
    pub visit_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationRevenue {
    pub destination_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub visit_count: usize,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyVisits {
    pub month_number: u32,
    pub month: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationVisits {
    pub destination_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub visit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouristSummary {
    pub id: i64,
    pub name: String,
    pub nationality: String,
    pub age: Option<i64>,
    pub visit_count: usize,
    pub destinations_visited: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TouristSegments {
    pub all: Vec<TouristSummary>,
    pub single_destination: Vec<TouristSummary>,
    pub multiple_destinations: Vec<TouristSummary>,
    /// Tourists with at least one visit; the denominator of `percentage`.
    pub visiting_tourists: usize,
    pub percentage: f64,
}

/// Every dashboard figure, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub totals: Totals,
    pub return_rate: f64,
    pub avg_rating: f64,
    pub nationality_distribution: Vec<NationalityCount>,
    pub destination_ratings: Vec<DestinationRating>,
    pub recent_activity: Vec<Activity>,
    pub top_destinations: Vec<DestinationRevenue>,
    pub seasonal_trends: Vec<MonthlyVisits>,
    /// Ranked single destinations, not co-visited pairs. See [`most_visited_destinations`].
    pub destination_pairs: Vec<DestinationVisits>,
    pub segments: TouristSegments,
}

impl Dashboard {
    /// Every figure here is computed from the snapshot alone. Ratios over an
    /// empty denominator come out as 0.
    pub fn build(snapshot: &Snapshot) -> Self {
        Self {
            totals: totals(snapshot),
            return_rate: return_rate(snapshot),
            avg_rating: average_rating(snapshot),
            nationality_distribution: nationality_distribution(snapshot),
            destination_ratings: destination_ratings(snapshot),
            recent_activity: recent_activity(snapshot),
            top_destinations: top_destinations_by_revenue(snapshot),
            seasonal_trends: seasonal_trends(snapshot),
            destination_pairs: most_visited_destinations(snapshot),
            segments: tourist_segments(snapshot),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Visits grouped by destination id, ascending.
fn visits_by_destination(visits: &[Visit]) -> BTreeMap<i64, Vec<&Visit>> {
    let mut grouped: BTreeMap<i64, Vec<&Visit>> = BTreeMap::new();
    for visit in visits {
        grouped.entry(visit.destination_id).or_default().push(visit);
    }
    grouped
}

/// Destinations that have at least one visit, paired with those visits.
fn visited_destinations(snapshot: &Snapshot) -> Vec<(&Destination, Vec<&Visit>)> {
    let by_id: HashMap<i64, &Destination> =
        snapshot.destinations.iter().map(|d| (d.id, d)).collect();

    visits_by_destination(&snapshot.visits)
        .into_iter()
        .filter_map(|(id, visits)| by_id.get(&id).map(|d| (*d, visits)))
        .collect()
}

pub fn totals(snapshot: &Snapshot) -> Totals {
    Totals {
        tourists: snapshot.tourists.len(),
        destinations: snapshot.destinations.len(),
        visits: snapshot.visits.len(),
    }
}

/// Percentage of tourists with more than one visit, rounded to one decimal.
pub fn return_rate(snapshot: &Snapshot) -> f64 {
    let mut visit_counts: HashMap<i64, usize> = HashMap::new();
    for visit in &snapshot.visits {
        *visit_counts.entry(visit.tourist_id).or_default() += 1;
    }

    let returning = snapshot
        .tourists
        .iter()
        .filter(|t| visit_counts.get(&t.id).copied().unwrap_or(0) > 1)
        .count();

    round_one_decimal(percentage(returning, snapshot.tourists.len()))
}

/// Mean of all non-null ratings, 0 when there are none.
pub fn average_rating(snapshot: &Snapshot) -> f64 {
    mean(snapshot.visits.iter().filter_map(|v| v.rating)).unwrap_or(0.0)
}

fn mean(ratings: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = ratings.fold((0i64, 0usize), |(sum, count), r| (sum + r, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Tourist counts per nationality, in order of first appearance.
pub fn nationality_distribution(snapshot: &Snapshot) -> Vec<NationalityCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<NationalityCount> = Vec::new();

    for tourist in &snapshot.tourists {
        match positions.get(tourist.nationality.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(&tourist.nationality, counts.len());
                counts.push(NationalityCount {
                    nationality: tourist.nationality.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Mean rating and visit count for every destination that has been visited.
///
/// Unrated visits count toward `visit_count` but not toward the mean.
pub fn destination_ratings(snapshot: &Snapshot) -> Vec<DestinationRating> {
    visited_destinations(snapshot)
        .into_iter()
        .map(|(destination, visits)| DestinationRating {
            destination_id: destination.id,
            name: destination.name.clone(),
            city: destination.city.clone(),
            country: destination.country.clone(),
            avg_rating: mean(visits.iter().filter_map(|v| v.rating)),
            visit_count: visits.len(),
        })
        .collect()
}

/// The latest visits, newest first, with tourist and destination resolved.
///
/// Ties on visit date fall back to visit id, descending.
pub fn recent_activity(snapshot: &Snapshot) -> Vec<Activity> {
    let tourists: HashMap<i64, &Tourist> = snapshot.tourists.iter().map(|t| (t.id, t)).collect();
    let destinations: HashMap<i64, &Destination> =
        snapshot.destinations.iter().map(|d| (d.id, d)).collect();

    let mut visits: Vec<&Visit> = snapshot.visits.iter().collect();
    visits.sort_by(|a, b| b.visit_date.cmp(&a.visit_date).then(b.id.cmp(&a.id)));

    visits
        .into_iter()
        .filter_map(|visit| {
            let tourist = tourists.get(&visit.tourist_id)?;
            let destination = destinations.get(&visit.destination_id)?;
            Some(Activity {
                visit_id: visit.id,
                tourist_name: tourist.name.clone(),
                destination_name: destination.name.clone(),
                city: destination.city.clone(),
                country: destination.country.clone(),
                rating: visit.rating,
                visit_date: format_display_time(visit.visit_date),
            })
        })
        .take(RECENT_ACTIVITY_LIMIT)
        .collect()
}

/// Destinations ranked by revenue proxy: the price counted once per visit.
pub fn top_destinations_by_revenue(snapshot: &Snapshot) -> Vec<DestinationRevenue> {
    let mut ranked: Vec<DestinationRevenue> = visited_destinations(snapshot)
        .into_iter()
        .map(|(destination, visits)| DestinationRevenue {
            destination_id: destination.id,
            name: destination.name.clone(),
            city: destination.city.clone(),
            country: destination.country.clone(),
            visit_count: visits.len(),
            total_revenue: visits.iter().map(|_| destination.price).sum(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then(a.destination_id.cmp(&b.destination_id))
    });
    ranked.truncate(TOP_DESTINATIONS_LIMIT);
    ranked
}

/// Visit counts per calendar month, for months with at least one visit.
pub fn seasonal_trends(snapshot: &Snapshot) -> Vec<MonthlyVisits> {
    let mut by_month: BTreeMap<u32, usize> = BTreeMap::new();
    for visit in &snapshot.visits {
        *by_month.entry(visit.visit_date.month()).or_default() += 1;
    }

    by_month
        .into_iter()
        .filter_map(|(month_number, count)| {
            let month = Month::try_from(u8::try_from(month_number).ok()?).ok()?;
            Some(MonthlyVisits {
                month_number,
                month: month.name(),
                count,
            })
        })
        .collect()
}

/// Destinations ranked by visit count.
///
/// This feeds the dashboard's "destination pairs" panel but ranks single
/// destinations; it does not look at which destinations share tourists.
pub fn most_visited_destinations(snapshot: &Snapshot) -> Vec<DestinationVisits> {
    let mut ranked: Vec<DestinationVisits> = visited_destinations(snapshot)
        .into_iter()
        .map(|(destination, visits)| DestinationVisits {
            destination_id: destination.id,
            name: destination.name.clone(),
            city: destination.city.clone(),
            country: destination.country.clone(),
            visit_count: visits.len(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.visit_count
            .cmp(&a.visit_count)
            .then(a.destination_id.cmp(&b.destination_id))
    });
    ranked.truncate(TOP_DESTINATIONS_LIMIT);
    ranked
}

/// Split tourists by how many distinct destinations they have visited.
///
/// Tourists without visits appear only in `all`.
pub fn tourist_segments(snapshot: &Snapshot) -> TouristSegments {
    let mut visit_counts: HashMap<i64, usize> = HashMap::new();
    let mut distinct: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for visit in &snapshot.visits {
        *visit_counts.entry(visit.tourist_id).or_default() += 1;
        distinct
            .entry(visit.tourist_id)
            .or_default()
            .insert(visit.destination_id);
    }

    let all: Vec<TouristSummary> = snapshot
        .tourists
        .iter()
        .map(|t| TouristSummary {
            id: t.id,
            name: t.name.clone(),
            nationality: t.nationality.clone(),
            age: t.age,
            visit_count: visit_counts.get(&t.id).copied().unwrap_or(0),
            destinations_visited: distinct.get(&t.id).map_or(0, BTreeSet::len),
        })
        .collect();

    let single_destination: Vec<TouristSummary> = all
        .iter()
        .filter(|t| t.destinations_visited == 1)
        .cloned()
        .collect();
    let multiple_destinations: Vec<TouristSummary> = all
        .iter()
        .filter(|t| t.destinations_visited > 1)
        .cloned()
        .collect();

    let visiting_tourists = single_destination.len() + multiple_destinations.len();
    let percentage = percentage(multiple_destinations.len(), visiting_tourists);

    TouristSegments {
        all,
        single_destination,
        multiple_destinations,
        visiting_tourists,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[derive(Default)]
    struct Fixture {
        snapshot: Snapshot,
    }

    impl Fixture {
        fn tourist(mut self, name: &str, nationality: &str) -> Self {
            let id = self.snapshot.tourists.len() as i64 + 1;
            self.snapshot.tourists.push(Tourist {
                id,
                name: name.to_string(),
                nationality: nationality.to_string(),
                age: None,
                created_at: at(2024, 1, 1, 0),
            });
            self
        }

        fn destination(mut self, name: &str, price: f64) -> Self {
            let id = self.snapshot.destinations.len() as i64 + 1;
            self.snapshot.destinations.push(Destination {
                id,
                name: name.to_string(),
                city: format!("{name} City"),
                country: "India".to_string(),
                price,
            });
            self
        }

        fn visit(
            mut self,
            tourist_id: i64,
            destination_id: i64,
            date: NaiveDateTime,
            rating: Option<i64>,
        ) -> Self {
            let id = self.snapshot.visits.len() as i64 + 1;
            self.snapshot.visits.push(Visit {
                id,
                tourist_id,
                destination_id,
                visit_date: date,
                rating,
            });
            self
        }

        fn build(self) -> Snapshot {
            self.snapshot
        }
    }

    #[test]
    fn empty_store() {
        let snapshot = Snapshot::default();
        let dashboard = Dashboard::build(&snapshot);

        assert_eq!(
            dashboard.totals,
            Totals {
                tourists: 0,
                destinations: 0,
                visits: 0
            }
        );
        assert_eq!(dashboard.return_rate, 0.0);
        assert_eq!(dashboard.avg_rating, 0.0);
        assert!(dashboard.nationality_distribution.is_empty());
        assert!(dashboard.seasonal_trends.is_empty());
        assert!(dashboard.recent_activity.is_empty());
        assert_eq!(dashboard.segments.percentage, 0.0);
    }

    #[test]
    fn single_visit_scenario() {
        let snapshot = Fixture::default()
            .tourist("Alice", "US")
            .destination("Beach", 100.0)
            .visit(1, 1, at(2024, 1, 10, 0), Some(5))
            .build();
        let dashboard = Dashboard::build(&snapshot);

        assert_eq!(
            dashboard.totals,
            Totals {
                tourists: 1,
                destinations: 1,
                visits: 1
            }
        );
        assert_eq!(dashboard.avg_rating, 5.0);
        assert_eq!(
            dashboard.nationality_distribution,
            vec![NationalityCount {
                nationality: "US".to_string(),
                count: 1
            }]
        );
        assert_eq!(dashboard.top_destinations[0].total_revenue, 100.0);
        assert_eq!(dashboard.seasonal_trends[0].month, "January");
        assert_eq!(dashboard.seasonal_trends[0].count, 1);
        assert_eq!(dashboard.segments.single_destination[0].name, "Alice");
        assert!(dashboard.segments.multiple_destinations.is_empty());
        assert_eq!(dashboard.return_rate, 0.0);
    }

    #[test]
    fn two_distinct_destinations_make_a_returning_tourist() {
        let snapshot = Fixture::default()
            .tourist("Alice", "US")
            .destination("Beach", 100.0)
            .destination("Fort", 40.0)
            .visit(1, 1, at(2024, 1, 10, 0), Some(5))
            .visit(1, 2, at(2024, 2, 3, 0), Some(3))
            .build();

        assert_eq!(return_rate(&snapshot), 100.0);
        let segments = tourist_segments(&snapshot);
        assert_eq!(segments.multiple_destinations[0].name, "Alice");
        assert!(segments.single_destination.is_empty());
        assert_eq!(segments.percentage, 100.0);
    }

    #[test]
    fn return_rate_rounds_to_one_decimal() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .tourist("B", "US")
            .tourist("C", "UK")
            .destination("Beach", 10.0)
            .visit(1, 1, at(2024, 3, 1, 0), None)
            .visit(1, 1, at(2024, 3, 2, 0), None)
            .build();

        assert_eq!(return_rate(&snapshot), 33.3);
    }

    #[test]
    fn repeat_visits_to_one_destination_stay_single() {
        let snapshot = Fixture::default()
            .tourist("Bob", "UK")
            .destination("Beach", 10.0)
            .visit(1, 1, at(2024, 3, 1, 0), None)
            .visit(1, 1, at(2024, 4, 1, 0), None)
            .build();

        let segments = tourist_segments(&snapshot);
        assert_eq!(segments.single_destination.len(), 1);
        assert_eq!(segments.all[0].visit_count, 2);
        assert_eq!(segments.all[0].destinations_visited, 1);
        assert_eq!(return_rate(&snapshot), 100.0);
    }

    #[test]
    fn tourists_without_visits_are_in_no_segment() {
        let snapshot = Fixture::default()
            .tourist("Idle", "FR")
            .tourist("Busy", "FR")
            .destination("Beach", 10.0)
            .visit(2, 1, at(2024, 3, 1, 0), None)
            .build();

        let segments = tourist_segments(&snapshot);
        assert_eq!(segments.all.len(), 2);
        assert_eq!(segments.visiting_tourists, 1);
        assert!(segments.single_destination.iter().all(|t| t.name != "Idle"));
        assert!(segments.multiple_destinations.is_empty());
    }

    #[test]
    fn nationality_distribution_sums_to_tourist_count() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .tourist("B", "India")
            .tourist("C", "US")
            .tourist("D", "UK")
            .build();

        let distribution = nationality_distribution(&snapshot);
        let labels: Vec<_> = distribution.iter().map(|n| n.nationality.as_str()).collect();
        assert_eq!(labels, vec!["US", "India", "UK"]);
        let sum: i64 = distribution.iter().map(|n| n.count).sum();
        assert_eq!(sum, 4);
    }

    #[test]
    fn destination_ratings_exclude_unvisited_and_null_ratings() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .destination("Beach", 10.0)
            .destination("Empty", 10.0)
            .destination("Unrated", 10.0)
            .visit(1, 1, at(2024, 5, 1, 0), Some(4))
            .visit(1, 1, at(2024, 5, 2, 0), None)
            .visit(1, 1, at(2024, 5, 3, 0), Some(2))
            .visit(1, 3, at(2024, 5, 4, 0), None)
            .build();

        let ratings = destination_ratings(&snapshot);
        assert_eq!(ratings.len(), 2);
        assert!(ratings.iter().all(|r| r.name != "Empty"));

        let beach = &ratings[0];
        assert_eq!(beach.avg_rating, Some(3.0));
        assert_eq!(beach.visit_count, 3);

        let unrated = &ratings[1];
        assert_eq!(unrated.avg_rating, None);
        assert_eq!(unrated.visit_count, 1);
    }

    #[test]
    fn recent_activity_is_newest_first_and_capped() {
        let mut fixture = Fixture::default()
            .tourist("Alice", "US")
            .destination("Beach", 10.0);
        for day in 1..=12 {
            fixture = fixture.visit(1, 1, at(2024, 6, day, 12), Some(4));
        }
        let snapshot = fixture.build();

        let activity = recent_activity(&snapshot);
        assert_eq!(activity.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(activity[0].visit_date, "2024-06-12 17:30 IST");
        assert_eq!(activity[9].visit_date, "2024-06-03 17:30 IST");
        assert_eq!(activity[0].tourist_name, "Alice");
        assert_eq!(activity[0].city, "Beach City");
    }

    #[test]
    fn recent_activity_breaks_ties_by_id_descending() {
        let snapshot = Fixture::default()
            .tourist("Alice", "US")
            .destination("Beach", 10.0)
            .destination("Fort", 10.0)
            .visit(1, 1, at(2024, 6, 1, 0), None)
            .visit(1, 2, at(2024, 6, 1, 0), None)
            .build();

        let activity = recent_activity(&snapshot);
        assert_eq!(activity[0].visit_id, 2);
        assert_eq!(activity[1].visit_id, 1);
    }

    #[test]
    fn revenue_counts_price_once_per_visit() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .destination("Cheap", 10.0)
            .destination("Pricey", 100.0)
            .visit(1, 1, at(2024, 7, 1, 0), None)
            .visit(1, 1, at(2024, 7, 2, 0), None)
            .visit(1, 1, at(2024, 7, 3, 0), None)
            .visit(1, 2, at(2024, 7, 4, 0), None)
            .build();

        let ranked = top_destinations_by_revenue(&snapshot);
        assert_eq!(ranked[0].name, "Pricey");
        assert_eq!(ranked[0].total_revenue, 100.0);
        assert_eq!(ranked[1].name, "Cheap");
        assert_eq!(ranked[1].total_revenue, 30.0);
        assert_eq!(ranked[1].visit_count, 3);
    }

    #[test]
    fn rankings_keep_top_five() {
        let mut fixture = Fixture::default().tourist("A", "US");
        for i in 1..=7 {
            fixture = fixture.destination(&format!("D{i}"), i as f64);
        }
        for i in 1..=7 {
            fixture = fixture.visit(1, i, at(2024, 8, 1, 0), None);
        }
        let snapshot = fixture.build();

        let revenue = top_destinations_by_revenue(&snapshot);
        assert_eq!(revenue.len(), TOP_DESTINATIONS_LIMIT);
        assert_eq!(revenue[0].name, "D7");

        let popular = most_visited_destinations(&snapshot);
        assert_eq!(popular.len(), TOP_DESTINATIONS_LIMIT);
        assert_eq!(popular[0].name, "D1");
    }

    #[test]
    fn most_visited_ranks_by_visit_count() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .destination("Beach", 500.0)
            .destination("Fort", 1.0)
            .visit(1, 1, at(2024, 9, 1, 0), None)
            .visit(1, 2, at(2024, 9, 2, 0), None)
            .visit(1, 2, at(2024, 9, 3, 0), None)
            .build();

        let popular = most_visited_destinations(&snapshot);
        assert_eq!(popular[0].name, "Fort");
        assert_eq!(popular[0].visit_count, 2);
        assert_eq!(popular[1].name, "Beach");
    }

    #[test]
    fn seasonal_trends_sorted_and_sum_to_visit_count() {
        let snapshot = Fixture::default()
            .tourist("A", "US")
            .destination("Beach", 10.0)
            .visit(1, 1, at(2023, 12, 25, 0), None)
            .visit(1, 1, at(2024, 3, 1, 0), None)
            .visit(1, 1, at(2025, 3, 9, 0), None)
            .visit(1, 1, at(2024, 1, 2, 0), None)
            .build();

        let trends = seasonal_trends(&snapshot);
        let months: Vec<_> = trends.iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["January", "March", "December"]);
        assert_eq!(trends[1].count, 2);
        let sum: usize = trends.iter().map(|m| m.count).sum();
        assert_eq!(sum, snapshot.visits.len());
        assert!(trends.iter().all(|m| (1..=12).contains(&m.month_number)));
    }
}
