//! Statistics Accumulator

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Return the global statistics accumulator.
pub fn stats_accumulator() -> &'static Mutex<StatsAccumulator> {
    static DATA: OnceLock<Mutex<StatsAccumulator>> = OnceLock::new();
    DATA.get_or_init(|| Mutex::new(StatsAccumulator::new()))
}

/// Aggregate different types of statistics.
#[derive(Default)]
pub struct StatsAccumulator {
    /// Counters.
    counters: HashMap<String, i64>,

    /// Memory counters.
    memory_counters: HashMap<String, u64>,

    /// Percentages.
    percentages: HashMap<String, (i64, i64)>,
}

impl StatsAccumulator {
    /// Create a new instance of `StatsAccumulator`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates a counter value.
    ///
    /// * `name` - Statistic name.
    /// * `val`  - Counter value.
    pub fn report_counter(&mut self, name: &str, val: i64) {
        *self.counters.entry(name.to_string()).or_insert(0) += val;
    }

    /// Accumulates a memory counter value.
    ///
    /// * `name` - Statistic name.
    /// * `val`  - Memory counter value.
    pub fn report_memory_counter(&mut self, name: &str, val: u64) {
        *self.memory_counters.entry(name.to_string()).or_insert(0) += val;
    }

    /// Accumulates a percentage value.
    ///
    /// * `name`  - Statistic name.
    /// * `num`   - Numerator (actual count).
    /// * `denom` - Denominator (total count).
    pub fn report_percentage(&mut self, name: &str, num: i64, denom: i64) {
        let v = self.percentages.entry(name.to_string()).or_insert((0, 0));
        v.0 += num;
        v.1 += denom;
    }

    /// Returns the accumulated value of a counter.
    ///
    /// * `name` - Statistic name.
    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.get(name).copied()
    }

    /// Returns the accumulated value of a memory counter in bytes.
    ///
    /// * `name` - Statistic name.
    pub fn memory_counter(&self, name: &str) -> Option<u64> {
        self.memory_counters.get(name).copied()
    }

    /// Returns the accumulated numerator and denominator of a percentage.
    ///
    /// * `name` - Statistic name.
    pub fn percentage(&self, name: &str) -> Option<(i64, i64)> {
        self.percentages.get(name).copied()
    }

    /// Prints the report.
    pub fn print(&self) {
        println!("{}", self);
    }

    /// Clear the accumulated statistics.
    pub fn clear(&mut self) {
        self.counters.clear();
        self.memory_counters.clear();
        self.percentages.clear();
    }

    /// Group non-empty statistics into formatted lines by category.
    fn lines_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut to_print: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (k, v) in self.counters.iter().filter(|(_, v)| **v != 0) {
            let (category, title) = get_category_and_title(k);
            to_print
                .entry(category)
                .or_default()
                .push(format!("{title:-42}               {v:12}"));
        }

        for (k, v) in self.memory_counters.iter().filter(|(_, v)| **v != 0) {
            let (category, title) = get_category_and_title(k);
            let kb = *v as f64 / 1024.0;
            let s = if kb < 1024.0 {
                format!("{title:-42}                  {kb:9.2} kB")
            } else if kb < 1024.0 * 1024.0 {
                format!("{title:-42}                  {:9.2} MiB", kb / 1024.0)
            } else {
                format!("{title:-42}                  {:9.2} GiB", kb / (1024.0 * 1024.0))
            };
            to_print.entry(category).or_default().push(s);
        }

        for (k, &(num, denom)) in self.percentages.iter().filter(|(_, v)| v.1 != 0) {
            let (category, title) = get_category_and_title(k);
            to_print.entry(category).or_default().push(format!(
                "{title:-42}{num:12} / {denom:12} ({:.2}%)",
                (100.0 * num as f64) / denom as f64,
            ));
        }

        for items in to_print.values_mut() {
            items.sort();
        }
        to_print
    }
}

impl fmt::Display for StatsAccumulator {
    /// Formats the statistics report grouped by category.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Statistics:")?;
        for (category, items) in self.lines_by_category() {
            write!(f, "\n  {category}")?;
            for item in items {
                write!(f, "\n    {item}")?;
            }
        }
        Ok(())
    }
}

/// Splits a statistic name at the first `/` as the separator and returns category and title. If there is no `/`, then
/// category is the empty string.
///
/// * `s` - The statistic name to split.
fn get_category_and_title(s: &str) -> (String, String) {
    match s.split_once('/') {
        Some((category, title)) => (category.to_string(), title.to_string()),
        None => ("".to_string(), s.to_string()),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_by_name() {
        let mut accum = StatsAccumulator::new();
        accum.report_counter("BxDF/Samples", 2);
        accum.report_counter("BxDF/Samples", 3);
        accum.report_memory_counter("Memory/Tables", 4096);
        accum.report_percentage("BxDF/Refraction failures", 1, 10);
        accum.report_percentage("BxDF/Refraction failures", 0, 10);

        assert_eq!(accum.counter("BxDF/Samples"), Some(5));
        assert_eq!(accum.memory_counter("Memory/Tables"), Some(4096));
        assert_eq!(accum.percentage("BxDF/Refraction failures"), Some((1, 20)));
        assert_eq!(accum.counter("Missing"), None);

        let report = accum.to_string();
        assert!(report.starts_with("Statistics:"));
        assert!(report.contains("Refraction failures"));
        assert!(report.contains("4.00 kB"));
        assert!(report.contains("(5.00%)"));

        accum.clear();
        assert_eq!(accum.counter("BxDF/Samples"), None);
    }

    #[test]
    fn empty_statistics_are_skipped() {
        let mut accum = StatsAccumulator::new();
        accum.report_percentage("BxDF/Never", 0, 0);
        accum.report_counter("BxDF/Zero", 0);
        assert_eq!(accum.to_string(), "Statistics:");
    }

    #[test]
    fn category_split() {
        assert_eq!(
            get_category_and_title("Memory/Measured BRDF data"),
            ("Memory".to_string(), "Measured BRDF data".to_string())
        );
        assert_eq!(
            get_category_and_title("Plain"),
            ("".to_string(), "Plain".to_string())
        );
    }
}
