use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::Record;

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline numbers for the current view. All zero / empty for an empty view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    pub mode_role: String,
}

impl KpiSummary {
    pub fn compute(records: &[&Record]) -> Self {
        KpiSummary {
            mean_salary: mean_salary(records),
            max_salary: max_salary(records),
            record_count: record_count(records),
            mode_role: mode_role(records),
        }
    }
}

pub fn mean_salary(records: &[&Record]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| r.salary_usd).sum::<f64>() / records.len() as f64
}

pub fn max_salary(records: &[&Record]) -> f64 {
    records
        .iter()
        .map(|r| r.salary_usd)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

pub fn record_count(records: &[&Record]) -> usize {
    records.len()
}

/// Most frequent role; among equally frequent roles the one seen first wins.
pub fn mode_role(records: &[&Record]) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, r) in records.iter().enumerate() {
        counts.entry(r.role.as_str()).or_insert((0, pos)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(role, _)| role.to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Grouped aggregates (one per chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSalary {
    pub role: String,
    pub mean_salary: f64,
}

/// The `n` roles with the highest mean salary, returned in ascending order of
/// mean so a horizontal bar chart draws the best-paid role on top.
///
/// Ties in mean salary keep role-name order.
pub fn top_roles_by_salary(records: &[&Record], n: usize) -> Vec<RoleSalary> {
    let mut groups: Vec<RoleSalary> =
        group_mean(records.iter().map(|r| (r.role.as_str(), r.salary_usd)))
            .into_iter()
            .map(|(role, mean_salary)| RoleSalary {
                role: role.to_string(),
                mean_salary,
            })
            .collect();

    groups.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    groups.truncate(n);
    groups.sort_by(|a, b| a.mean_salary.total_cmp(&b.mean_salary));
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Exclusive upper edge, inclusive for the last bucket.
    pub upper: f64,
    pub count: usize,
}

/// Split the observed salary range into `bin_count` equal-width buckets.
///
/// An empty view (or zero bins) has no buckets. When every salary is the
/// same the width is 1, so everything lands in the first bucket.
pub fn salary_histogram(records: &[&Record], bin_count: usize) -> Vec<HistogramBucket> {
    if records.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = records.iter().map(|r| r.salary_usd).fold(f64::INFINITY, f64::min);
    let max = records.iter().map(|r| r.salary_usd).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let width = if range > 0.0 {
        range / bin_count as f64
    } else {
        1.0
    };

    let mut buckets: Vec<HistogramBucket> = (0..bin_count)
        .map(|i| HistogramBucket {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for r in records {
        let slot = (((r.salary_usd - min) / width).floor() as usize).min(bin_count - 1);
        buckets[slot].count += 1;
    }
    buckets
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Record count per work arrangement, largest first. Equal counts keep the
/// order in which the categories first appear in the view.
pub fn remote_ratio_breakdown(records: &[&Record]) -> Vec<CategoryCount> {
    let mut out: Vec<CategoryCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for r in records {
        let slot = *slots.entry(r.remote_ratio.as_str()).or_insert_with(|| {
            out.push(CategoryCount {
                category: r.remote_ratio.clone(),
                count: 0,
            });
            out.len() - 1
        });
        out[slot].count += 1;
    }
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySalary {
    pub country: String,
    pub mean_salary: f64,
}

/// Mean salary per residence country for one role, sorted by country code.
/// Countries without a matching record are absent.
pub fn mean_salary_by_country(records: &[&Record], role: &str) -> Vec<CountrySalary> {
    group_mean(
        records
            .iter()
            .filter(|r| r.role == role)
            .map(|r| (r.residence_country_code.as_str(), r.salary_usd)),
    )
    .into_iter()
    .map(|(country, mean_salary)| CountrySalary {
        country: country.to_string(),
        mean_salary,
    })
    .collect()
}

fn group_mean<'a, I>(pairs: I) -> BTreeMap<&'a str, f64>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Everything the dashboard draws, computed in one pass
// ---------------------------------------------------------------------------

/// Knobs for the grouped aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSettings {
    pub top_roles: usize,
    pub histogram_bins: usize,
    pub country_role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub kpis: KpiSummary,
    pub top_roles: Vec<RoleSalary>,
    pub histogram: Vec<HistogramBucket>,
    pub remote_ratio: Vec<CategoryCount>,
    pub salary_by_country: Vec<CountrySalary>,
}

impl Aggregates {
    pub fn compute(records: &[&Record], settings: &AggregateSettings) -> Self {
        Aggregates {
            kpis: KpiSummary::compute(records),
            top_roles: top_roles_by_salary(records, settings.top_roles),
            histogram: salary_histogram(records, settings.histogram_bins),
            remote_ratio: remote_ratio_breakdown(records),
            salary_by_country: mean_salary_by_country(records, &settings.country_role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn with_remote(mut r: Record, remote: &str, country: &str) -> Record {
        r.remote_ratio = remote.to_string();
        r.residence_country_code = country.to_string();
        r
    }

    #[test]
    fn empty_view_has_zero_kpis() {
        let kpis = KpiSummary::compute(&[]);
        assert_eq!(kpis.mean_salary, 0.0);
        assert_eq!(kpis.max_salary, 0.0);
        assert_eq!(kpis.record_count, 0);
        assert_eq!(kpis.mode_role, "");
        assert_eq!(
            Aggregates::compute(
                &[],
                &AggregateSettings {
                    top_roles: 10,
                    histogram_bins: 30,
                    country_role: "Data Scientist".into(),
                }
            ),
            Aggregates::default()
        );
    }

    #[test]
    fn kpis_over_view() {
        let a = record(2023, "Senior", "FT", "L", "Data Scientist", 150_000.0);
        let b = record(2022, "Junior", "FT", "S", "Analyst", 60_000.0);
        let kpis = KpiSummary::compute(&[&a, &b]);
        assert_eq!(kpis.mean_salary, 105_000.0);
        assert_eq!(kpis.max_salary, 150_000.0);
        assert_eq!(kpis.record_count, 2);

        let kpis = KpiSummary::compute(&[&a]);
        assert_eq!(kpis.mean_salary, 150_000.0);
        assert_eq!(kpis.mode_role, "Data Scientist");
    }

    #[test]
    fn mode_role_ties_go_to_first_seen() {
        let recs = [
            record(2023, "S", "FT", "L", "Engineer", 1.0),
            record(2023, "S", "FT", "L", "Analyst", 1.0),
            record(2023, "S", "FT", "L", "Analyst", 1.0),
            record(2023, "S", "FT", "L", "Engineer", 1.0),
        ];
        let view: Vec<&Record> = recs.iter().collect();
        assert_eq!(mode_role(&view), "Engineer");
        assert_eq!(mode_role(&view[1..]), "Analyst");
    }

    #[test]
    fn top_roles_are_top_n_in_ascending_order() {
        let recs = [
            record(2023, "S", "FT", "L", "A", 50.0),
            record(2023, "S", "FT", "L", "B", 200.0),
            record(2023, "S", "FT", "L", "A", 150.0),
        ];
        let view: Vec<&Record> = recs.iter().collect();

        let top1 = top_roles_by_salary(&view, 1);
        assert_eq!(
            top1,
            vec![RoleSalary { role: "B".into(), mean_salary: 200.0 }]
        );

        let top2 = top_roles_by_salary(&view, 2);
        assert_eq!(
            top2,
            vec![
                RoleSalary { role: "A".into(), mean_salary: 100.0 },
                RoleSalary { role: "B".into(), mean_salary: 200.0 },
            ]
        );
        assert!(top_roles_by_salary(&view, 0).is_empty());
    }

    #[test]
    fn histogram_with_single_salary_uses_unit_width() {
        let recs = [
            record(2023, "S", "FT", "L", "A", 50_000.0),
            record(2023, "S", "FT", "L", "B", 50_000.0),
            record(2022, "S", "FT", "L", "C", 50_000.0),
        ];
        let view: Vec<&Record> = recs.iter().collect();
        let buckets = salary_histogram(&view, 1);
        assert_eq!(
            buckets,
            vec![HistogramBucket { lower: 50_000.0, upper: 50_001.0, count: 3 }]
        );
        assert!(salary_histogram(&[], 30).is_empty());
    }

    #[test]
    fn histogram_puts_max_in_last_bucket() {
        let recs = [
            record(2023, "S", "FT", "L", "A", 0.0),
            record(2023, "S", "FT", "L", "A", 49.0),
            record(2023, "S", "FT", "L", "A", 50.0),
            record(2023, "S", "FT", "L", "A", 100.0),
        ];
        let view: Vec<&Record> = recs.iter().collect();
        let counts: Vec<usize> = salary_histogram(&view, 2).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2]);
    }

    #[test]
    fn remote_breakdown_sorted_by_count() {
        let base = record(2023, "S", "FT", "L", "A", 1.0);
        let recs = [
            with_remote(base.clone(), "presencial", "USA"),
            with_remote(base.clone(), "remoto", "USA"),
            with_remote(base.clone(), "remoto", "USA"),
            with_remote(base.clone(), "hibrido", "USA"),
        ];
        let view: Vec<&Record> = recs.iter().collect();
        let categories: Vec<(String, usize)> = remote_ratio_breakdown(&view)
            .into_iter()
            .map(|c| (c.category, c.count))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("remoto".to_string(), 2),
                ("presencial".to_string(), 1),
                ("hibrido".to_string(), 1),
            ]
        );
    }

    #[test]
    fn country_means_only_for_requested_role() {
        let recs = [
            with_remote(record(2023, "S", "FT", "L", "Data Scientist", 100.0), "remoto", "USA"),
            with_remote(record(2023, "S", "FT", "L", "Data Scientist", 300.0), "remoto", "USA"),
            with_remote(record(2023, "S", "FT", "L", "Data Scientist", 50.0), "remoto", "BRA"),
            with_remote(record(2023, "S", "FT", "L", "Analyst", 999.0), "remoto", "DEU"),
        ];
        let view: Vec<&Record> = recs.iter().collect();
        let by_country = mean_salary_by_country(&view, "Data Scientist");
        assert_eq!(
            by_country,
            vec![
                CountrySalary { country: "BRA".into(), mean_salary: 50.0 },
                CountrySalary { country: "USA".into(), mean_salary: 200.0 },
            ]
        );
        assert!(mean_salary_by_country(&view, "Engineer").is_empty());
    }
}
