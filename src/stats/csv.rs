//! HAProxy CSV stats parsing.
//!
//! # Responsibilities
//! - Locate columns by name from the `# pxname,svname,...` header
//! - Split rows into frontends, backend aggregates and listeners
//! - Extract response-code counters and member status
//!
//! # Design Decisions
//! - Column order is never assumed; HAProxy versions append columns
//! - Empty numeric cells are zero (HAProxy leaves them blank for TCP proxies)
//! - Frontend rows are skipped entirely

use crate::stats::types::{ListenerStatus, ResponseCounters, StatsError, StatsResult};

const FRONTEND: &str = "FRONTEND";
const BACKEND: &str = "BACKEND";

/// A parsed stats page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsPage {
    /// `(backend name, counters)` for every `BACKEND` aggregate row.
    pub backends: Vec<(String, ResponseCounters)>,
    /// Every server row.
    pub listeners: Vec<ListenerStatus>,
}

impl StatsPage {
    /// Iterate backend counters by name.
    pub fn backend_counters(&self) -> impl Iterator<Item = (&str, ResponseCounters)> {
        self.backends.iter().map(|(name, counters)| (name.as_str(), *counters))
    }
}

#[derive(Debug)]
struct Columns {
    pxname: usize,
    svname: usize,
    status: usize,
    hrsp: [usize; 6],
}

impl Columns {
    fn from_header(header: &str) -> StatsResult<Self> {
        let names: Vec<&str> = header
            .trim_start_matches('#')
            .trim()
            .split(',')
            .map(str::trim)
            .collect();

        let find = |name: &str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| StatsError::Parse(format!("missing column '{}'", name)))
        };

        Ok(Self {
            pxname: find("pxname")?,
            svname: find("svname")?,
            status: find("status")?,
            hrsp: [
                find("hrsp_1xx")?,
                find("hrsp_2xx")?,
                find("hrsp_3xx")?,
                find("hrsp_4xx")?,
                find("hrsp_5xx")?,
                find("hrsp_other")?,
            ],
        })
    }
}

fn cell<'a>(fields: &[&'a str], index: usize, line_no: usize) -> StatsResult<&'a str> {
    fields.get(index).copied().ok_or_else(|| {
        StatsError::Parse(format!(
            "line {}: expected at least {} fields",
            line_no,
            index + 1
        ))
    })
}

fn counter(fields: &[&str], index: usize, line_no: usize) -> StatsResult<u64> {
    let raw = cell(fields, index, line_no)?.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>().map_err(|e| {
        StatsError::Parse(format!(
            "line {}: invalid counter '{}': {}",
            line_no, raw, e
        ))
    })
}

/// Parse the body served by `/;csv`.
pub fn parse_stats(body: &str) -> StatsResult<StatsPage> {
    let mut lines = body
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| StatsError::Parse("empty stats response".to_string()))?;

    if !header.starts_with('#') {
        return Err(StatsError::Parse(
            "stats response is not HAProxy CSV (missing '#' header)".to_string(),
        ));
    }

    let columns = Columns::from_header(header)?;
    let mut page = StatsPage::default();

    for (index, line) in lines {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split(',').collect();
        let pxname = cell(&fields, columns.pxname, line_no)?;
        let svname = cell(&fields, columns.svname, line_no)?;

        match svname {
            FRONTEND => continue,
            BACKEND => {
                let [c1, c2, c3, c4, c5, other] = columns.hrsp;
                let counters = ResponseCounters::new(
                    counter(&fields, c1, line_no)?,
                    counter(&fields, c2, line_no)?,
                    counter(&fields, c3, line_no)?,
                    counter(&fields, c4, line_no)?,
                    counter(&fields, c5, line_no)?,
                    counter(&fields, other, line_no)?,
                );
                page.backends.push((pxname.to_string(), counters));
            }
            _ => {
                let status = cell(&fields, columns.status, line_no)?;
                page.listeners.push(ListenerStatus::from_status(pxname, status));
            }
        }
    }

    tracing::debug!(
        backends = page.backends.len(),
        listeners = page.listeners.len(),
        "Parsed HAProxy stats page"
    );

    Ok(page)
}
