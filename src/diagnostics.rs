//! Human-readable registry report, printed on demand.

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::registry::BodyRegistry;

/// Severity of a report line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
}

/// One line of a registry report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportLine {
    pub level: ReportLevel,
    pub text: String,
}

impl ReportLine {
    fn info(text: String) -> Self {
        Self {
            level: ReportLevel::Info,
            text,
        }
    }

    fn warning(text: String) -> Self {
        Self {
            level: ReportLevel::Warning,
            text,
        }
    }
}

/// Describe every registered body and flag problems.
pub fn registry_report(registry: &BodyRegistry, config: &SimulationConfig) -> Vec<ReportLine> {
    let mut lines = Vec::with_capacity(registry.len() + 2);

    if registry.is_empty() {
        lines.push(ReportLine::warning("No bodies registered".to_string()));
        return lines;
    }

    lines.push(ReportLine::info(format!(
        "{} bodies registered, G = {}, interaction = {:?}",
        registry.len(),
        config.g,
        config.interaction
    )));

    for body in registry.iter() {
        let tag = if body.is_central(config.central_mass_threshold) {
            " central"
        } else {
            ""
        };
        lines.push(ReportLine::info(format!(
            "  {}{}: mass {:.3}, {:?}, speed {:.3}",
            body.id,
            tag,
            body.mass,
            body.motion,
            body.speed()
        )));
        if !body.has_valid_mass() {
            lines.push(ReportLine::warning(format!(
                "  {} has non-positive mass {} and is excluded from gravity",
                body.id, body.mass
            )));
        }
    }

    lines
}

/// Log a registry report line by line.
pub fn log_registry_report(registry: &BodyRegistry, config: &SimulationConfig) {
    for line in registry_report(registry, config) {
        match line.level {
            ReportLevel::Info => info!("{}", line.text),
            ReportLevel::Warning => warn!("{}", line.text),
        }
    }
}
