//! # Tabular display of an event
//!
//! Human-readable rendering of an [`EventCache`] through [`std::fmt::Display`]:
//!
//! ```text
//! Event 3: 41 hits, total energy 41.000
//! ┌───────┬──────┬────────┬─────────┬─────────┬───────────────┬───────────────┬───────┐
//! │ Layer ┆ Hits ┆ E sum  ┆ x̄ [mm]  ┆ ȳ [mm]  ┆ x mean ± σ    ┆ y mean ± σ    ┆ Valid │
//! ╞═══════╪══════╪════════╪═════════╪═════════╪═══════════════╪═══════════════╪═══════╡
//! ...
//! Fit: axis x = 10.667 mm, y = 9.333 mm, residual = 5.3333 (3 points, closed form, converged)
//! ```
//!
//! Empty layers print `-` in place of the sentinel statistics. The alternate form (`{:#}`) adds
//! the depth of each layer in radiation lengths and the shower maximum.
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
    layers::{AxisStats, LayerStats},
    navigation::event_cache::EventCache,
};

fn axis_cell(stats: &AxisStats) -> Cell {
    let text = if stats.is_sentinel() {
        "-".to_string()
    } else {
        format!("{:.3} ± {:.3}", stats.mean, stats.sigma)
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn centroid_cells(stats: &LayerStats) -> [Cell; 2] {
    match stats.centroid {
        Some(c) => [
            Cell::new(format!("{:.3}", c.x)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", c.y)).set_alignment(CellAlignment::Right),
        ],
        None => [
            Cell::new("-").set_alignment(CellAlignment::Right),
            Cell::new("-").set_alignment(CellAlignment::Right),
        ],
    }
}

impl EventCache {
    fn layer_table(&self, with_profile: bool) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![
            Cell::new("Layer"),
            Cell::new("Hits"),
            Cell::new("E sum"),
            Cell::new("x̄ [mm]"),
            Cell::new("ȳ [mm]"),
            Cell::new("x mean ± σ"),
            Cell::new("y mean ± σ"),
            Cell::new("Valid"),
        ];
        if with_profile {
            header.push(Cell::new("Depth [X0]"));
        }
        table.set_header(header);

        for stats in &self.layer_stats {
            let [cx, cy] = centroid_cells(stats);
            let mut cells = vec![
                Cell::new(stats.layer).set_alignment(CellAlignment::Right),
                Cell::new(stats.hit_count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", stats.energy_sum)).set_alignment(CellAlignment::Right),
                cx,
                cy,
                axis_cell(&stats.x),
                axis_cell(&stats.y),
                Cell::new(if self.is_valid_layer(stats.layer) { "yes" } else { "" }),
            ];
            if with_profile {
                let depth = self
                    .profile
                    .points
                    .get(stats.layer)
                    .map_or_else(|| "-".to_string(), |p| format!("{:.2}", p.depth_x0));
                cells.push(Cell::new(depth).set_alignment(CellAlignment::Right));
            }
            table.add_row(Row::from(cells));
        }
        table
    }
}

impl fmt::Display for EventCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Event {}: {} hits, total energy {:.3}",
            self.event_index,
            self.hit_count(),
            self.total_energy
        )?;
        writeln!(f, "{}", self.layer_table(f.alternate()))?;

        match &self.fit {
            Some(fit) => write!(f, "Fit: {fit}")?,
            None => write!(
                f,
                "Fit: skipped ({} valid layer(s))",
                self.valid_layers.len()
            )?,
        }

        if f.alternate() {
            match self.profile.shower_max() {
                Some(max) => write!(
                    f,
                    "\nShower max: layer {} at {:.2} X0, E = {:.3}",
                    max.layer, max.depth_x0, max.energy
                )?,
                None => write!(f, "\nShower max: -")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod display_test {
    use super::*;
    use crate::{
        display_params::DisplayParams,
        hits::{event_store::EventEntry, Hit},
    };

    fn cache(hits: Vec<Hit>) -> EventCache {
        EventCache::compute(3, EventEntry::from_hits(hits), &DisplayParams::default()).unwrap()
    }

    #[test]
    fn test_skipped_fit() {
        let out = format!("{}", cache(vec![Hit::new(1.0, 2.0, 0.5, 0, 2.0)]));
        assert!(out.starts_with("Event 3: 1 hits, total energy 2.000\n"));
        assert!(out.contains("Layer"));
        assert!(out.ends_with("Fit: skipped (0 valid layer(s))"));
        assert!(!out.contains("Shower max"));
    }

    #[test]
    fn test_alternate_form() {
        let hits: Vec<Hit> = (0..2)
            .flat_map(|layer| {
                (0..11).map(move |i| {
                    Hit::new(i as f64, (i % 2) as f64, 0.5 + 15.0 * layer as f64, layer, 1.0)
                })
            })
            .collect();
        let out = format!("{:#}", cache(hits));
        assert!(out.contains("Depth [X0]"));
        assert!(out.contains("Fit: axis x = 5.000 mm"));
        assert!(out.contains("converged"));
        assert!(out.contains("Shower max: layer "));
    }
}
