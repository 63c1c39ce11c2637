//! Wildlife catalog and detection bookkeeping.
//!
//! The catalog is fixed at start-up. A detection marks one record and
//! moves the "currently displayed" pointer onto it; flags on other
//! records stay as they were.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildlifeRecord {
    pub label: &'static str,
    /// Opaque pointer to the captured evidence (camera trap image).
    pub evidence: &'static str,
    pub detected: bool,
    /// Only meaningful while `detected` is set on the current record.
    pub detected_at_ms: u32,
}

impl WildlifeRecord {
    const fn new(label: &'static str, evidence: &'static str) -> Self {
        Self {
            label,
            evidence,
            detected: false,
            detected_at_ms: 0,
        }
    }
}

pub const CATALOG_LEN: usize = 6;

pub const CATALOG: [WildlifeRecord; CATALOG_LEN] = [
    WildlifeRecord::new("Jaguar", "trailcam/cam-01/capture-0007.jpg"),
    WildlifeRecord::new("Maned wolf", "trailcam/cam-02/capture-0112.jpg"),
    WildlifeRecord::new("Giant anteater", "trailcam/cam-01/capture-0154.jpg"),
    WildlifeRecord::new("Jaguar", "trailcam/cam-03/capture-0021.jpg"),
    WildlifeRecord::new("Tapir", "trailcam/cam-04/capture-0089.jpg"),
    WildlifeRecord::new("Ocelot", "trailcam/cam-02/capture-0230.jpg"),
];

pub struct WildlifeMonitor {
    records: [WildlifeRecord; CATALOG_LEN],
    current: Option<usize>,
}

impl Default for WildlifeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WildlifeMonitor {
    pub fn new() -> Self {
        Self {
            records: CATALOG,
            current: None,
        }
    }

    /// Roll once with probability `p`. On a hit picks a record uniformly,
    /// stamps it and makes it current.
    pub fn roll<R: Rng + ?Sized>(&mut self, now_ms: u32, p: f64, rng: &mut R) -> Option<usize> {
        if !rng.gen_bool(p) {
            return None;
        }
        let idx = rng.gen_range(0..CATALOG_LEN);
        let rec = &mut self.records[idx];
        rec.detected = true;
        rec.detected_at_ms = now_ms;
        self.current = Some(idx);
        Some(idx)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_record(&self) -> Option<&WildlifeRecord> {
        self.current.map(|i| &self.records[i])
    }

    pub fn record(&self, idx: usize) -> &WildlifeRecord {
        &self.records[idx % CATALOG_LEN]
    }

    pub fn records(&self) -> &[WildlifeRecord] {
        &self.records
    }

    /// The current record's alert window has run out.
    pub fn expired(&self, now_ms: u32, alert_ms: u32) -> bool {
        self.current_record()
            .is_some_and(|r| now_ms.wrapping_sub(r.detected_at_ms) >= alert_ms)
    }

    /// Clear the current record's flag and drop the pointer.
    pub fn clear_current(&mut self) -> Option<WildlifeRecord> {
        let idx = self.current.take()?;
        self.records[idx].detected = false;
        Some(self.records[idx])
    }
}
